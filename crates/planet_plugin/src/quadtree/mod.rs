//! Cube-sphere quadtrees for LOD leaf selection.
//!
//! The planet is the unit cube projected onto a sphere; each of the six
//! faces owns an implicit quadtree. No tree nodes are stored - a node is a
//! `(face, x, y, depth)` value and parent/child relationships are computed
//! from coordinates.
//!
//! # Depth Convention
//!
//! Depth 0 = the whole face, deeper = finer.
//!
//! ```text
//! Node Size = root_size / 2^depth
//!           = 2 * radius / 2^depth
//! ```
//!
//! # Module Structure
//!
//! - [`node`]: `QuadNode` - immutable value type for quadtree positions
//! - [`face`]: `CubeFace` and its fixed face-to-planet transform
//! - [`config`]: `QuadtreeConfig` - node coordinate math and split settings
//! - [`frustum`]: `Frustum` - plane extraction and AABB test
//! - [`budget`]: `LeafBudget` and `TraversalStats`
//! - [`traversal`]: `FaceQuadtree` - per-frame leaf collection
//!
//! Faces are independent; leaves of different sizes may meet at face and
//! LOD boundaries without seam stitching.

pub mod bounds;
pub mod budget;
pub mod config;
pub mod face;
pub mod frustum;
pub mod node;
pub mod traversal;

// Re-exports
pub use bounds::{DAabb3, NodeBounds};
pub use budget::{LeafBudget, TraversalStats};
pub use config::QuadtreeConfig;
pub use face::{CubeFace, FaceTransform};
pub use frustum::{Frustum, Plane};
pub use node::QuadNode;
pub use traversal::{FaceQuadtree, TraversalInput};
