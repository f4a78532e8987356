//! TerrainField - deterministic elevation and color for points on a planet.
//!
//! Layers, evaluated in order:
//! 1. continent: warped FBM at a planet-scale wavelength
//! 2. coastline breaker: small FBM perturbation of the continent value
//! 3. land mask: smoothstep across the coast band
//! 4. ocean floor: shelf, then a power curve down to the plateau
//! 5. land: base level, hills and ridged mountains behind their own masks
//!
//! Elevation is continuous everywhere; only the class/color is discrete.

use glam::DVec3;

use super::class::TerrainClass;
use super::noise::{to_noise_space, NoiseSource, Octaves, Warp};
use super::params::TerrainParams;
use super::shaping::{lerp, saturate, smoothstep};
use crate::constants::{
  seed_offsets, COAST_BREAKER_OCTAVES, COAST_BREAKER_STRENGTH, COAST_BREAKER_WARP,
  COAST_BREAKER_WAVELENGTH, EPSILON,
};

/// Everything the field knows about one point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldSample {
  /// Raw continent value in [0, 1].
  pub continent: f64,
  /// Continent value after the coastline breaker.
  pub continent_with_coastline: f64,
  /// 0 = open ocean, 1 = full land.
  pub land_mask: f64,
  pub hills_mask: f64,
  pub mountain_mask: f64,
  /// Signed offset from the base radius in meters.
  pub elevation: f64,
  pub class: TerrainClass,
  pub color: [f32; 4],
}

/// Procedural field of one planet. Immutable and `Sync`; share it via `Arc`.
#[derive(Clone, Debug)]
pub struct TerrainField {
  params: TerrainParams,
  radius: f64,
  continent: NoiseSource,
  coast_breaker: NoiseSource,
  hills: NoiseSource,
  mountains: NoiseSource,
}

impl TerrainField {
  /// Build a field for a planet of `radius` meters.
  ///
  /// Parameters are sanitized first; a non-positive or non-finite radius is
  /// floored at [`EPSILON`].
  pub fn new(params: TerrainParams, radius: f64) -> Self {
    let params = params.sanitized();
    let radius = if radius.is_finite() { radius.max(EPSILON) } else { EPSILON };
    let seed = params.seed;
    Self {
      continent: NoiseSource::new(seed.wrapping_add(seed_offsets::CONTINENT)),
      coast_breaker: NoiseSource::new(seed.wrapping_add(seed_offsets::COAST_BREAKER)),
      hills: NoiseSource::new(seed.wrapping_add(seed_offsets::HILLS)),
      mountains: NoiseSource::new(seed.wrapping_add(seed_offsets::MOUNTAINS)),
      params,
      radius,
    }
  }

  #[inline]
  pub fn params(&self) -> &TerrainParams {
    &self.params
  }

  #[inline]
  pub fn radius(&self) -> f64 {
    self.radius
  }

  /// Evaluate the field at a planet-space position.
  ///
  /// Only the direction from the planet center matters; the position is
  /// projected onto the base sphere before sampling. The zero vector reads
  /// as the +Y pole.
  pub fn evaluate(&self, position: DVec3) -> FieldSample {
    let p = self.project(position);
    let continent = self.continent_value(p);
    let continent_with_coastline =
      continent + COAST_BREAKER_STRENGTH * (self.coast_breaker_value(p) - 0.5);
    self.compose_with(
      continent,
      continent_with_coastline,
      || self.hills_value(p),
      || self.ridge_value(p),
    )
  }

  /// Displaced surface point along `direction`: `dir * (radius + elevation)`.
  pub fn surface_point(&self, direction: DVec3) -> DVec3 {
    let dir = direction.normalize_or(DVec3::Y);
    let sample = self.evaluate(dir);
    dir * (self.radius + sample.elevation)
  }

  /// Class of a sample given its continent value and land mask.
  #[inline]
  pub fn classify(&self, continent_with_coastline: f64, land_mask: f64) -> TerrainClass {
    TerrainClass::classify(
      continent_with_coastline,
      land_mask,
      self.params.sea_level,
      self.params.mountain_start,
    )
  }

  /// Compose a sample from precomputed layer values.
  ///
  /// `hills` and `ridges` are the normalized [0, 1] outputs of the hill FBM
  /// and the mountain ridged FBM.
  pub fn compose(
    &self,
    continent: f64,
    continent_with_coastline: f64,
    hills: f64,
    ridges: f64,
  ) -> FieldSample {
    self.compose_with(continent, continent_with_coastline, || hills, || ridges)
  }

  fn compose_with(
    &self,
    continent: f64,
    continent_with_coastline: f64,
    hills: impl FnOnce() -> f64,
    ridges: impl FnOnce() -> f64,
  ) -> FieldSample {
    let params = &self.params;
    let cwc = continent_with_coastline;

    let land_mask = smoothstep(params.sea_coast_limit(), params.land_coast_limit(), cwc);
    let ocean = self.ocean_profile(land_mask);

    let mut land = params.base_land_level * smoothstep(0.0, 1.0, land_mask);

    // Masks are zero over most of the planet; skip the noise when they are.
    let hills_mask = smoothstep(params.land_coast_limit(), params.land_hill_ramp_limit(), cwc);
    if hills_mask > 0.0 {
      let height = saturate(hills()) * params.hills_amplitude_meters;
      land = lerp(land, land + height, hills_mask);
    }

    let mountain_mask = smoothstep(params.mountain_start, params.mountain_ramp_limit(), cwc);
    if mountain_mask > 0.0 {
      let height = saturate(ridges()) * params.mountain_amplitude_meters;
      land = lerp(land, land + height, mountain_mask);
    }

    let elevation = lerp(ocean, land, land_mask);
    let elevation = if elevation.is_finite() { elevation } else { 0.0 };

    let class = self.classify(cwc, land_mask);
    FieldSample {
      continent,
      continent_with_coastline: cwc,
      land_mask,
      hills_mask,
      mountain_mask,
      elevation,
      class,
      color: class.color(),
    }
  }

  /// Ocean floor depth for a land mask: shelf first, then the plateau.
  pub fn ocean_profile(&self, land_mask: f64) -> f64 {
    let params = &self.params;
    let ocean_factor = 1.0 - saturate(land_mask);

    if ocean_factor <= params.shelf_portion {
      let t = ocean_factor / params.shelf_portion.max(EPSILON);
      return -params.shelf_depth * smoothstep(0.0, 1.0, t);
    }

    let t = (ocean_factor - params.shelf_portion) / (1.0 - params.shelf_portion).max(EPSILON);
    let coef = saturate(t).powf(params.shelf_sharpness.max(1.0));
    lerp(-params.shelf_depth, -params.ocean_plateau_depth, coef)
  }

  fn project(&self, position: DVec3) -> DVec3 {
    position.normalize_or(DVec3::Y) * self.radius
  }

  fn continent_value(&self, p: DVec3) -> f64 {
    let q = to_noise_space(p, self.radius * self.params.continent_wavelength);
    self
      .continent
      .warped_fbm(q, self.params.continent_warp(), self.params.continent_octaves())
  }

  fn coast_breaker_value(&self, p: DVec3) -> f64 {
    let (amplitude, frequency) = COAST_BREAKER_WARP;
    let (count, lacunarity, persistence) = COAST_BREAKER_OCTAVES;
    let q = to_noise_space(p, self.radius * COAST_BREAKER_WAVELENGTH);
    self.coast_breaker.warped_fbm(
      q,
      Warp::new(amplitude, frequency),
      Octaves::new(count, lacunarity, persistence),
    )
  }

  fn hills_value(&self, p: DVec3) -> f64 {
    let q = to_noise_space(p, self.radius * self.params.hills_wavelength);
    self
      .hills
      .warped_fbm(q, self.params.hills_warp(), self.params.hills_octaves())
  }

  fn ridge_value(&self, p: DVec3) -> f64 {
    let q = to_noise_space(p, self.radius * self.params.mountain_wavelength);
    self
      .mountains
      .warped_ridged_fbm(q, self.params.mountain_warp(), self.params.mountain_octaves())
  }
}

#[cfg(test)]
#[path = "terrain_test.rs"]
mod terrain_test;
