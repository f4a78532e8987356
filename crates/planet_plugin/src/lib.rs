//! planet_plugin - Framework/engine independent planet terrain LOD
//!
//! This crate decides, frame by frame, which patches of a cube-sphere
//! planet to keep resident and at what detail, and builds their vertex
//! data from a deterministic procedural field.
//!
//! # Features
//!
//! - **Procedural Field**: continents, coastlines, hills and ridged
//!   mountains from warped fractal simplex noise, with classification and
//!   display colors
//! - **Cube-Sphere Quadtree**: six implicit face quadtrees with distance
//!   driven splitting, frustum culling and a per-frame activation budget
//! - **Chunk Lifecycle**: pooled patches, shared triangle buffers and
//!   parallel per-vertex builds joined before commit
//!
//! # Example
//!
//! ```ignore
//! use planet_plugin::{CameraState, PlanetConfig, Projection};
//!
//! let mut manager = PlanetConfig::default().build_manager()?;
//! let camera = CameraState::looking_at(eye, DVec3::ZERO, DVec3::Y);
//! let frustum = camera.frustum(&Projection::default());
//!
//! let out = manager.step(&camera, &frustum, dt);
//! for id in out.ready {
//!     let patch = manager.patch(id).unwrap();
//!     upload(patch.vertices(), patch.indices().unwrap(), patch.transform());
//! }
//! ```

pub mod constants;

// Procedural height/color field
pub mod field;
pub use field::{FieldSample, TerrainClass, TerrainField, TerrainParams};

// Cube-sphere quadtree for LOD leaf selection
pub mod quadtree;
pub use quadtree::{CubeFace, FaceQuadtree, Frustum, LeafBudget, QuadNode, QuadtreeConfig};

// Planet placement and camera input
pub mod camera;
pub mod planet;
pub use camera::{CameraState, Projection};
pub use planet::{Planet, PlanetId};

// Patch lifecycle
pub mod chunk;
pub use chunk::{
  ChunkManager, InvariantError, ManagerConfig, Patch, PatchId, PatchKind, PatchState, PatchVertex,
  StepOutput,
};

// Host-facing configuration
pub mod config;
pub use config::{ConfigError, PlanetConfig};

// Engine-agnostic metrics (feature-gated)
pub mod metrics;
