//! Shared constants for field evaluation, traversal and patch building.

/// Floor applied to every divisor derived from user parameters
/// (wavelengths, FBM amplitude sums, smoothstep widths).
pub const EPSILON: f64 = 1e-6;

/// Upper bound on FBM octave counts accepted from configuration.
pub const MAX_OCTAVES: u32 = 16;

/// Deepest quadtree level a face may reach.
///
/// Grid coordinates are `i32`, so `1 << depth` must stay representable.
pub const MAX_DEPTH: i32 = 30;

/// Number of cube faces, one quadtree each.
pub const FACE_COUNT: usize = 6;

/// Vertices handed to one worker in a single batch.
///
/// Kept a multiple of 32 so batches line up with SIMD lanes and cache lines.
pub const VERTEX_BATCH: usize = 128;

/// Smallest accepted patch resolution (quads per side).
pub const MIN_RESOLUTION: u32 = 2;

/// Largest accepted patch resolution; keeps `(N + 1)^2` indices in `u32`.
pub const MAX_RESOLUTION: u32 = 1024;

/// Coastline breaker wavelength as a fraction of the planet radius.
pub const COAST_BREAKER_WAVELENGTH: f64 = 0.10;

/// How strongly the coastline breaker perturbs the continent value.
pub const COAST_BREAKER_STRENGTH: f64 = 0.05;

/// Domain warp used by the coastline breaker: (amplitude, frequency).
pub const COAST_BREAKER_WARP: (f64, f64) = (0.5, 2.0);

/// Octave settings of the coastline breaker: (octaves, lacunarity, persistence).
pub const COAST_BREAKER_OCTAVES: (u32, f64, f64) = (4, 2.0, 0.5);

/// Per-axis offsets decorrelating the three warp noise lookups.
pub const WARP_OFFSETS: [[f64; 3]; 3] = [
  [37.2, 15.7, 91.1],
  [-12.3, 44.5, 7.9],
  [9.4, -55.6, 23.3],
];

/// Seed offsets so each field layer samples an independent noise stream.
pub mod seed_offsets {
  pub const CONTINENT: u32 = 0;
  pub const COAST_BREAKER: u32 = 1;
  pub const HILLS: u32 = 2;
  pub const MOUNTAINS: u32 = 3;
}
