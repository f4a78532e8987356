//! Per-face leaf selection.
//!
//! Each frame a face quadtree is walked top-down from its root:
//! 1. cull the node against the frustum (no budget consumed)
//! 2. split while the camera is closer than `size * split_distance_factor`
//!    and the face still has budget
//! 3. otherwise emit the node as a leaf, charging budget if it was not
//!    active last frame
//!
//! Children are visited in quadrant order (BL, BR, TL, TR), so the output
//! order is deterministic for a given input.

use std::collections::HashSet;

use glam::{DAffine3, DVec3};

use super::budget::{LeafBudget, TraversalStats};
use super::{CubeFace, DAabb3, Frustum, QuadNode, QuadtreeConfig};

/// Input for one face traversal.
pub struct TraversalInput<'a> {
  /// Camera position in world space.
  pub camera_position: DVec3,
  /// View frustum in world space.
  pub frustum: &'a Frustum,
  /// Planet local-to-world transform.
  pub planet_transform: &'a DAffine3,
  /// Leaves active before this frame; re-emitting them is free.
  pub previous_active: &'a HashSet<QuadNode>,
}

/// Quadtree over one cube face. Holds no per-frame state.
#[derive(Clone, Debug)]
pub struct FaceQuadtree {
  face: CubeFace,
  config: QuadtreeConfig,
}

impl FaceQuadtree {
  pub fn new(face: CubeFace, config: QuadtreeConfig) -> Self {
    Self { face, config }
  }

  #[inline]
  pub fn face(&self) -> CubeFace {
    self.face
  }

  #[inline]
  pub fn config(&self) -> &QuadtreeConfig {
    &self.config
  }

  #[inline]
  pub fn root(&self) -> QuadNode {
    QuadNode::root(self.face)
  }

  /// World-space AABB used for the frustum test: a cube of the node's edge
  /// length around its world center.
  pub fn world_bounds(&self, node: &QuadNode, planet_transform: &DAffine3) -> DAabb3 {
    let center = self.config.node_world_center(node, planet_transform);
    DAabb3::cube(center, self.config.node_size(node.depth))
  }

  /// Append this frame's desired leaves to `out`.
  #[cfg_attr(feature = "profiling", tracing::instrument(skip_all, name = "quadtree::collect_leaves"))]
  pub fn collect_leaves(
    &self,
    input: &TraversalInput<'_>,
    budget: &mut LeafBudget,
    out: &mut Vec<QuadNode>,
  ) -> TraversalStats {
    let mut stats = TraversalStats::default();
    self.traverse(self.root(), input, budget, out, &mut stats);

    tracing::trace!(
      face = ?self.face,
      visited = stats.visited,
      culled = stats.culled,
      emitted = stats.emitted,
      charged = stats.charged,
      forced = stats.forced,
      "face traversal"
    );
    stats
  }

  fn traverse(
    &self,
    node: QuadNode,
    input: &TraversalInput<'_>,
    budget: &mut LeafBudget,
    out: &mut Vec<QuadNode>,
    stats: &mut TraversalStats,
  ) {
    stats.visited += 1;

    let size = self.config.node_size(node.depth);
    let center = self.config.node_world_center(&node, input.planet_transform);

    if self.config.enable_culling && !input.frustum.intersects_aabb(&DAabb3::cube(center, size)) {
      stats.culled += 1;
      return;
    }

    let distance = input.camera_position.distance(center);
    let can_split = size > self.config.min_leaf_size && !budget.is_exhausted();
    let want_split = can_split && distance < size * self.config.split_distance_factor;

    if want_split {
      if let Some(children) = node.children() {
        for child in children {
          self.traverse(child, input, budget, out, stats);
        }
        return;
      }
    }

    out.push(node);
    stats.emitted += 1;
    if !input.previous_active.contains(&node) {
      if budget.try_charge() {
        stats.charged += 1;
      } else {
        stats.forced += 1;
      }
    }
  }
}

#[cfg(test)]
#[path = "traversal_test.rs"]
mod traversal_test;
