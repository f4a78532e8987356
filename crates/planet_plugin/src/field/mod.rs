//! Procedural planet field.
//!
//! Pure functions from a planet-space position to elevation, land mask,
//! surface class and display color. See [`TerrainField`].

mod class;
mod noise;
mod params;
mod shaping;
mod terrain;

pub use class::TerrainClass;
pub use noise::{to_noise_space, NoiseSource, Octaves, Warp};
pub use params::TerrainParams;
pub use shaping::{lerp, saturate, smoothstep};
pub use terrain::{FieldSample, TerrainField};
