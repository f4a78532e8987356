//! Chunk lifecycle: patches, pools, builds and the per-frame manager.
//!
//! # Module Structure
//!
//! - [`patch`]: `Patch` - recyclable mesh unit and its vertex layout
//! - [`pool`]: `PatchPool` - LIFO stack of inactive patches
//! - [`triangles`]: `TriangleCache` - shared index buffers per resolution
//! - [`mesh`]: terrain and water vertex builders
//! - [`build`]: `BuildStage` - parallel build queue
//! - [`manager`]: `ChunkManager` - diffs desired leaves against resident ones

pub mod build;
pub mod manager;
pub mod mesh;
pub mod patch;
pub mod pool;
pub mod triangles;

// Re-exports
pub use build::{BuildCompletion, BuildRequest, BuildStage};
pub use manager::{ChunkManager, InvariantError, ManagerConfig, ResidentPatches, StepOutput};
pub use mesh::{build_terrain, build_water, recompute_normals, PatchGeometry, WATER_COLOR};
pub use patch::{Patch, PatchId, PatchKind, PatchState, PatchTransform, PatchVertex};
pub use pool::PatchPool;
pub use triangles::{grid_triangles, TriangleCache};
