//! TerrainParams - immutable inputs of the procedural field.
//!
//! Wavelengths are fractions of the planet radius. Amplitudes and depths are
//! in meters. Mask thresholds live on the continent scale [0, 1].

use serde::{Deserialize, Serialize};

use super::noise::{Octaves, Warp};
use super::shaping::saturate;
use crate::constants::{EPSILON, MAX_OCTAVES};

/// Field parameters shared read-only by every evaluation of one planet.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TerrainParams {
  /// Base seed; each layer derives its own stream from it.
  pub seed: u32,

  // Continents
  pub continent_wavelength: f64,
  pub continent_lacunarity: f64,
  pub continent_persistence: f64,
  pub continent_octaves: u32,
  pub continent_warp_amplitude: f64,
  pub continent_warp_frequency: f64,

  // Coastline
  /// Continent value separating sea from land, in [0, 1].
  pub sea_level: f64,
  /// Width of the coast band on the sea side of `sea_level`.
  pub sea_coast_width: f64,
  /// Width of the coast band on the land side of `sea_level`.
  pub land_coast_width: f64,
  /// Land height reached once the land mask saturates (meters).
  pub base_land_level: f64,

  // Ocean floor
  pub shelf_depth: f64,
  /// Fraction of the ocean factor range covered by the continental shelf.
  pub shelf_portion: f64,
  /// Exponent of the shelf-to-plateau transition (floored at 1).
  pub shelf_sharpness: f64,
  pub ocean_plateau_depth: f64,

  // Hills
  /// Continent distance above the land coast limit over which hills fade in.
  pub hills_ramp_width: f64,
  pub hills_wavelength: f64,
  pub hills_octaves: u32,
  pub hills_persistence: f64,
  pub hills_lacunarity: f64,
  pub hills_warp_amplitude: f64,
  pub hills_warp_frequency: f64,
  pub hills_amplitude_meters: f64,

  // Mountains (ridged)
  /// Continent value where mountains begin; also the snow-cap color threshold.
  pub mountain_start: f64,
  pub mountain_ramp: f64,
  pub mountain_wavelength: f64,
  pub mountain_octaves: u32,
  pub mountain_gain: f64,
  pub mountain_lacunarity: f64,
  pub mountain_warp_amplitude: f64,
  pub mountain_warp_frequency: f64,
  pub mountain_amplitude_meters: f64,
}

impl Default for TerrainParams {
  fn default() -> Self {
    Self {
      seed: 0,

      continent_wavelength: 2.5,
      continent_lacunarity: 2.0,
      continent_persistence: 0.5,
      continent_octaves: 4,
      continent_warp_amplitude: 0.2,
      continent_warp_frequency: 0.15,

      sea_level: 0.5,
      sea_coast_width: 0.08,
      land_coast_width: 0.08,
      base_land_level: 10.0,

      shelf_depth: 10.0,
      shelf_portion: 0.30,
      shelf_sharpness: 3.0,
      ocean_plateau_depth: 75.0,

      hills_ramp_width: 0.15,
      hills_wavelength: 0.20,
      hills_octaves: 4,
      hills_persistence: 0.5,
      hills_lacunarity: 2.0,
      hills_warp_amplitude: 0.20,
      hills_warp_frequency: 1.7,
      hills_amplitude_meters: 25.0,

      mountain_start: 0.7,
      mountain_ramp: 0.05,
      mountain_wavelength: 0.06,
      mountain_octaves: 5,
      mountain_gain: 0.5,
      mountain_lacunarity: 2.0,
      mountain_warp_amplitude: 0.15,
      mountain_warp_frequency: 2.3,
      mountain_amplitude_meters: 180.0,
    }
  }
}

impl TerrainParams {
  /// Lower edge of the land mask ramp.
  #[inline]
  pub fn sea_coast_limit(&self) -> f64 {
    saturate(self.sea_level - 0.5 * self.sea_coast_width)
  }

  /// Upper edge of the land mask ramp; the land mask is 1 from here on.
  #[inline]
  pub fn land_coast_limit(&self) -> f64 {
    saturate(self.sea_level + 0.5 * self.land_coast_width)
  }

  /// Continent value where hills reach full strength.
  #[inline]
  pub fn land_hill_ramp_limit(&self) -> f64 {
    self.land_coast_limit() + self.hills_ramp_width
  }

  /// Continent value where mountains reach full strength.
  #[inline]
  pub fn mountain_ramp_limit(&self) -> f64 {
    self.mountain_start + self.mountain_ramp
  }

  pub fn continent_octaves(&self) -> Octaves {
    Octaves::new(
      self.continent_octaves,
      self.continent_lacunarity,
      self.continent_persistence,
    )
  }

  pub fn continent_warp(&self) -> Warp {
    Warp::new(self.continent_warp_amplitude, self.continent_warp_frequency)
  }

  pub fn hills_octaves(&self) -> Octaves {
    Octaves::new(self.hills_octaves, self.hills_lacunarity, self.hills_persistence)
  }

  pub fn hills_warp(&self) -> Warp {
    Warp::new(self.hills_warp_amplitude, self.hills_warp_frequency)
  }

  pub fn mountain_octaves(&self) -> Octaves {
    Octaves::new(self.mountain_octaves, self.mountain_lacunarity, self.mountain_gain)
  }

  pub fn mountain_warp(&self) -> Warp {
    Warp::new(self.mountain_warp_amplitude, self.mountain_warp_frequency)
  }

  /// Copy with degenerate values clamped into a safe domain.
  ///
  /// Non-finite numbers fall back to the defaults, wavelengths are floored
  /// at [`EPSILON`], octave counts are capped at [`MAX_OCTAVES`] and widths,
  /// depths and ramps are made non-negative.
  pub fn sanitized(&self) -> Self {
    let defaults = Self::default();
    let finite = |value: f64, fallback: f64| if value.is_finite() { value } else { fallback };
    let wavelength = |value: f64, fallback: f64| finite(value, fallback).max(EPSILON);
    let non_negative = |value: f64, fallback: f64| finite(value, fallback).max(0.0);

    let sanitized = Self {
      seed: self.seed,

      continent_wavelength: wavelength(self.continent_wavelength, defaults.continent_wavelength),
      continent_lacunarity: non_negative(self.continent_lacunarity, defaults.continent_lacunarity),
      continent_persistence: non_negative(
        self.continent_persistence,
        defaults.continent_persistence,
      ),
      continent_octaves: self.continent_octaves.min(MAX_OCTAVES),
      continent_warp_amplitude: finite(
        self.continent_warp_amplitude,
        defaults.continent_warp_amplitude,
      ),
      continent_warp_frequency: finite(
        self.continent_warp_frequency,
        defaults.continent_warp_frequency,
      ),

      sea_level: saturate(finite(self.sea_level, defaults.sea_level)),
      sea_coast_width: non_negative(self.sea_coast_width, defaults.sea_coast_width),
      land_coast_width: non_negative(self.land_coast_width, defaults.land_coast_width),
      base_land_level: finite(self.base_land_level, defaults.base_land_level),

      shelf_depth: finite(self.shelf_depth, defaults.shelf_depth),
      shelf_portion: saturate(finite(self.shelf_portion, defaults.shelf_portion)),
      shelf_sharpness: finite(self.shelf_sharpness, defaults.shelf_sharpness).max(1.0),
      ocean_plateau_depth: finite(self.ocean_plateau_depth, defaults.ocean_plateau_depth),

      hills_ramp_width: non_negative(self.hills_ramp_width, defaults.hills_ramp_width),
      hills_wavelength: wavelength(self.hills_wavelength, defaults.hills_wavelength),
      hills_octaves: self.hills_octaves.min(MAX_OCTAVES),
      hills_persistence: non_negative(self.hills_persistence, defaults.hills_persistence),
      hills_lacunarity: non_negative(self.hills_lacunarity, defaults.hills_lacunarity),
      hills_warp_amplitude: finite(self.hills_warp_amplitude, defaults.hills_warp_amplitude),
      hills_warp_frequency: finite(self.hills_warp_frequency, defaults.hills_warp_frequency),
      hills_amplitude_meters: finite(
        self.hills_amplitude_meters,
        defaults.hills_amplitude_meters,
      ),

      mountain_start: finite(self.mountain_start, defaults.mountain_start),
      mountain_ramp: non_negative(self.mountain_ramp, defaults.mountain_ramp),
      mountain_wavelength: wavelength(self.mountain_wavelength, defaults.mountain_wavelength),
      mountain_octaves: self.mountain_octaves.min(MAX_OCTAVES),
      mountain_gain: non_negative(self.mountain_gain, defaults.mountain_gain),
      mountain_lacunarity: non_negative(self.mountain_lacunarity, defaults.mountain_lacunarity),
      mountain_warp_amplitude: finite(
        self.mountain_warp_amplitude,
        defaults.mountain_warp_amplitude,
      ),
      mountain_warp_frequency: finite(
        self.mountain_warp_frequency,
        defaults.mountain_warp_frequency,
      ),
      mountain_amplitude_meters: finite(
        self.mountain_amplitude_meters,
        defaults.mountain_amplitude_meters,
      ),
    };

    if sanitized != *self {
      tracing::warn!("terrain parameters contained degenerate values and were clamped");
    }
    sanitized
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_coast_limits() {
    let params = TerrainParams::default();
    assert!((params.sea_coast_limit() - 0.46).abs() < 1e-12);
    assert!((params.land_coast_limit() - 0.54).abs() < 1e-12);
    assert!(params.land_hill_ramp_limit() > params.land_coast_limit());
    assert!(params.mountain_ramp_limit() > params.mountain_start);
  }

  #[test]
  fn defaults_survive_sanitizing() {
    let params = TerrainParams::default();
    assert_eq!(params.sanitized(), params);
  }

  #[test]
  fn sanitizing_floors_wavelengths() {
    let params = TerrainParams {
      continent_wavelength: 0.0,
      hills_wavelength: -3.0,
      mountain_wavelength: f64::NAN,
      ..Default::default()
    };
    let clean = params.sanitized();
    assert_eq!(clean.continent_wavelength, EPSILON);
    assert_eq!(clean.hills_wavelength, EPSILON);
    assert_eq!(clean.mountain_wavelength, TerrainParams::default().mountain_wavelength);
  }

  #[test]
  fn sanitizing_caps_octaves_and_sharpness() {
    let params = TerrainParams {
      continent_octaves: 500,
      shelf_sharpness: 0.1,
      shelf_portion: 4.0,
      ..Default::default()
    };
    let clean = params.sanitized();
    assert_eq!(clean.continent_octaves, MAX_OCTAVES);
    assert_eq!(clean.shelf_sharpness, 1.0);
    assert_eq!(clean.shelf_portion, 1.0);
  }
}
