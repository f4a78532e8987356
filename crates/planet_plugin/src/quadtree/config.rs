//! QuadtreeConfig - subdivision settings and node coordinate mapping.

use glam::{DAffine3, DVec3};

use super::{CubeFace, NodeBounds, QuadNode};
use crate::constants::MAX_DEPTH;

/// Configuration shared by the six face quadtrees of one planet.
#[derive(Clone, Debug, PartialEq)]
pub struct QuadtreeConfig {
  /// Planet base radius in meters. The cube enclosing the sphere has edge
  /// `2 * radius`.
  pub radius: f64,

  /// Nodes at or below this edge length never split.
  pub min_leaf_size: f64,

  /// A node splits while the camera is closer than `size * factor`.
  pub split_distance_factor: f64,

  /// Prune nodes whose bounds fall outside the view frustum.
  pub enable_culling: bool,
}

impl QuadtreeConfig {
  /// Edge length of a face root node.
  #[inline]
  pub fn root_size(&self) -> f64 {
    self.radius * 2.0
  }

  /// Edge length of nodes at `depth`: `root_size / 2^depth`.
  #[inline]
  pub fn node_size(&self, depth: i32) -> f64 {
    self.root_size() / (1u64 << depth.clamp(0, MAX_DEPTH)) as f64
  }

  /// Deepest level a node can reach before hitting `min_leaf_size`.
  pub fn max_split_depth(&self) -> i32 {
    let mut depth = 0;
    while depth < MAX_DEPTH && self.node_size(depth) > self.min_leaf_size {
      depth += 1;
    }
    depth
  }

  /// Face-local bounds: center on the face plane as `(cx, 0, cy)`.
  #[inline]
  pub fn node_bounds(&self, node: &QuadNode) -> NodeBounds {
    let size = self.node_size(node.depth);
    let half_root = self.root_size() * 0.5;
    NodeBounds {
      center: DVec3::new(
        -half_root + node.x as f64 * size + size * 0.5,
        0.0,
        -half_root + node.y as f64 * size + size * 0.5,
      ),
      size,
    }
  }

  /// Unit direction from the planet center through a face-local point.
  #[inline]
  pub fn face_local_direction(&self, face: CubeFace, local: DVec3) -> DVec3 {
    face
      .transform(self.radius)
      .transform_point(local)
      .normalize_or(face.normal())
  }

  /// Planet-space point on the base sphere above the node center.
  #[inline]
  pub fn node_sphere_center(&self, node: &QuadNode) -> DVec3 {
    let bounds = self.node_bounds(node);
    self.face_local_direction(node.face, bounds.center) * self.radius
  }

  /// World-space center of a node under the planet transform.
  #[inline]
  pub fn node_world_center(&self, node: &QuadNode, planet_transform: &DAffine3) -> DVec3 {
    planet_transform.transform_point3(self.node_sphere_center(node))
  }
}

impl Default for QuadtreeConfig {
  fn default() -> Self {
    Self {
      radius: 16_000.0,
      min_leaf_size: 128.0,
      split_distance_factor: 1.0,
      enable_culling: true,
    }
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
