//! QuadNode - immutable value type representing a position in a face quadtree.
//!
//! Nodes are identified by their grid coordinates at their own depth.
//! Depth 0 is the whole face; each level halves the edge length.

use super::CubeFace;
use crate::constants::MAX_DEPTH;

/// Face quadtree node - immutable value type.
///
/// Ordering compares `x`, `y`, `depth`, then `face`, which gives leaf lists a
/// deterministic sort for diffing.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct QuadNode {
  /// Grid X position at this node's depth
  pub x: i32,
  /// Grid Y position at this node's depth (face-local +Z)
  pub y: i32,
  /// Subdivision depth (0 = whole face)
  pub depth: i32,
  /// Owning cube face
  pub face: CubeFace,
}

impl QuadNode {
  /// Create a new node at the given position and depth.
  pub fn new(face: CubeFace, x: i32, y: i32, depth: i32) -> Self {
    Self { x, y, depth, face }
  }

  /// Root node covering a whole face.
  pub fn root(face: CubeFace) -> Self {
    Self::new(face, 0, 0, 0)
  }

  /// Get child node (one level deeper).
  ///
  /// Quadrant: 0-3 where bits represent +X, +Y offsets:
  /// - bit 0: X offset (0 or 1)
  /// - bit 1: Y offset (0 or 1)
  ///
  /// so 0..4 is bottom-left, bottom-right, top-left, top-right.
  /// Returns None at [`MAX_DEPTH`].
  pub fn get_child(&self, quadrant: u8) -> Option<Self> {
    if self.depth >= MAX_DEPTH {
      return None;
    }
    let cx = (quadrant & 1) as i32;
    let cy = ((quadrant >> 1) & 1) as i32;
    Some(Self {
      x: self.x * 2 + cx,
      y: self.y * 2 + cy,
      depth: self.depth + 1,
      face: self.face,
    })
  }

  /// All four children in quadrant order, or None at [`MAX_DEPTH`].
  pub fn children(&self) -> Option<[Self; 4]> {
    Some([
      self.get_child(0)?,
      self.get_child(1)?,
      self.get_child(2)?,
      self.get_child(3)?,
    ])
  }

  /// Get parent node (one level up). None for the face root.
  pub fn get_parent(&self) -> Option<Self> {
    if self.depth <= 0 {
      return None;
    }
    Some(Self {
      x: self.x >> 1,
      y: self.y >> 1,
      depth: self.depth - 1,
      face: self.face,
    })
  }

  /// Whether `other` is this node or one of its descendants.
  pub fn contains(&self, other: &QuadNode) -> bool {
    if other.face != self.face || other.depth < self.depth {
      return false;
    }
    let shift = other.depth - self.depth;
    (other.x >> shift) == self.x && (other.y >> shift) == self.y
  }

  /// Fraction of the face area this node covers: `4^-depth`.
  #[inline]
  pub fn area_fraction(&self) -> f64 {
    0.25f64.powi(self.depth)
  }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
