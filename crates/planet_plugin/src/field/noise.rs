//! Fractal noise primitives over a seeded 3D simplex source.
//!
//! Every function here is pure: the same source, point and settings always
//! produce the same bits, on any thread.

use glam::DVec3;
use noise::{NoiseFn, Simplex};

use crate::constants::{EPSILON, WARP_OFFSETS};

/// Octave stacking parameters for FBM and ridged FBM.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Octaves {
  /// Number of noise layers summed. 0 yields the neutral value.
  pub count: u32,
  /// Frequency multiplier between layers.
  pub lacunarity: f64,
  /// Amplitude multiplier between layers (called gain for ridged noise).
  pub persistence: f64,
}

impl Octaves {
  pub const fn new(count: u32, lacunarity: f64, persistence: f64) -> Self {
    Self {
      count,
      lacunarity,
      persistence,
    }
  }
}

/// Domain warp applied to a point before fractal sampling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Warp {
  pub amplitude: f64,
  pub frequency: f64,
}

impl Warp {
  pub const NONE: Self = Self {
    amplitude: 0.0,
    frequency: 0.0,
  };

  pub const fn new(amplitude: f64, frequency: f64) -> Self {
    Self {
      amplitude,
      frequency,
    }
  }
}

/// Seeded 3D simplex noise returning values in [-1, 1].
#[derive(Clone)]
pub struct NoiseSource {
  simplex: Simplex,
  seed: u32,
}

impl std::fmt::Debug for NoiseSource {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "NoiseSource(seed={})", self.seed)
  }
}

impl NoiseSource {
  pub fn new(seed: u32) -> Self {
    Self {
      simplex: Simplex::new(seed),
      seed,
    }
  }

  pub fn seed(&self) -> u32 {
    self.seed
  }

  /// Raw simplex lookup, clamped to [-1, 1]. Non-finite results read as 0.
  #[inline]
  pub fn sample(&self, p: DVec3) -> f64 {
    let n = self.simplex.get(p.to_array());
    if n.is_finite() {
      n.clamp(-1.0, 1.0)
    } else {
      0.0
    }
  }

  /// Fractal Brownian motion normalized to [0, 1].
  pub fn fbm(&self, p: DVec3, octaves: Octaves) -> f64 {
    let mut a = 1.0;
    let mut amplitude = 0.0;
    let mut sum = 0.0;
    let mut q = p;
    for _ in 0..octaves.count {
      sum += a * self.sample(q);
      amplitude += a;
      q *= octaves.lacunarity;
      a *= octaves.persistence;
    }
    (sum / f64::max(amplitude, EPSILON)) * 0.5 + 0.5
  }

  /// Ridged FBM: `1 - |noise|` per octave, normalized to [0, 1].
  pub fn ridged_fbm(&self, p: DVec3, octaves: Octaves) -> f64 {
    let mut a = 1.0;
    let mut amplitude = 0.0;
    let mut sum = 0.0;
    let mut q = p;
    for _ in 0..octaves.count {
      sum += a * (1.0 - self.sample(q).abs());
      amplitude += a;
      q *= octaves.lacunarity;
      a *= octaves.persistence;
    }
    sum / f64::max(amplitude, EPSILON)
  }

  /// Displace `p` by a vector noise field of the given amplitude.
  pub fn warp(&self, p: DVec3, warp: Warp) -> DVec3 {
    if warp.amplitude == 0.0 {
      return p;
    }
    let base = p * warp.frequency;
    let w = DVec3::new(
      self.sample(base + DVec3::from_array(WARP_OFFSETS[0])),
      self.sample(base + DVec3::from_array(WARP_OFFSETS[1])),
      self.sample(base + DVec3::from_array(WARP_OFFSETS[2])),
    );
    p + warp.amplitude * w
  }

  /// Warp then FBM, the building block of every smooth terrain layer.
  #[inline]
  pub fn warped_fbm(&self, p: DVec3, warp: Warp, octaves: Octaves) -> f64 {
    self.fbm(self.warp(p, warp), octaves)
  }

  /// Warp then ridged FBM.
  #[inline]
  pub fn warped_ridged_fbm(&self, p: DVec3, warp: Warp, octaves: Octaves) -> f64 {
    self.ridged_fbm(self.warp(p, warp), octaves)
  }
}

/// Scale a planet-space position into noise space for a feature wavelength.
///
/// The wavelength is floored at [`EPSILON`] so degenerate parameters never
/// divide by zero.
#[inline]
pub fn to_noise_space(position: DVec3, wavelength: f64) -> DVec3 {
  position * (1.0 / f64::max(wavelength, EPSILON))
}
