use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use super::*;

/// Two nodes with the same coordinates, depth and face are equal.
#[test]
fn test_node_equality() {
  let node1 = QuadNode::new(CubeFace::PosY, 1, 2, 5);
  let node2 = QuadNode::new(CubeFace::PosY, 1, 2, 5);
  let node3 = QuadNode::new(CubeFace::NegY, 1, 2, 5);
  let node4 = QuadNode::new(CubeFace::PosY, 1, 2, 6);

  assert_eq!(node1, node2);
  assert_ne!(node1, node3, "Face is part of node identity");
  assert_ne!(node1, node4);
}

/// Equal nodes must produce equal hashes (HashMap invariant).
#[test]
fn test_node_hash_consistency() {
  let hash = |node: &QuadNode| {
    let mut hasher = DefaultHasher::new();
    node.hash(&mut hasher);
    hasher.finish()
  };
  let node1 = QuadNode::new(CubeFace::PosZ, 10, 20, 4);
  let node2 = QuadNode::new(CubeFace::PosZ, 10, 20, 4);

  assert_eq!(hash(&node1), hash(&node2), "Equal nodes must have equal hashes");
}

/// Mirrored coordinates on different faces must not collide in a set.
#[test]
fn test_node_set_distinguishes_faces() {
  let set: HashSet<QuadNode> = CubeFace::ALL
    .iter()
    .flat_map(|&face| [QuadNode::new(face, 1, 2, 3), QuadNode::new(face, 2, 1, 3)])
    .collect();
  assert_eq!(set.len(), 12);
}

/// Child quadrants follow bottom-left, bottom-right, top-left, top-right.
#[test]
fn test_get_child_quadrant_order() {
  let parent = QuadNode::new(CubeFace::PosX, 3, 5, 2);
  let expected = [(6, 10), (7, 10), (6, 11), (7, 11)];

  for (quadrant, (x, y)) in expected.into_iter().enumerate() {
    let child = parent.get_child(quadrant as u8).unwrap();
    assert_eq!((child.x, child.y), (x, y), "quadrant {}", quadrant);
    assert_eq!(child.depth, 3);
    assert_eq!(child.face, CubeFace::PosX);
  }
}

/// Every child's parent is the original node.
#[test]
fn test_parent_child_roundtrip() {
  let parent = QuadNode::new(CubeFace::NegZ, 7, 2, 4);
  for child in parent.children().unwrap() {
    assert_eq!(child.get_parent(), Some(parent));
  }
}

/// Root has no parent.
#[test]
fn test_root_has_no_parent() {
  assert_eq!(QuadNode::root(CubeFace::PosY).get_parent(), None);
}

/// Children stop at the depth limit.
#[test]
fn test_no_children_at_max_depth() {
  let node = QuadNode::new(CubeFace::PosY, 0, 0, MAX_DEPTH);
  assert!(node.get_child(0).is_none());
  assert!(node.children().is_none());
}

/// Containment is ancestor-or-self and face-aware.
#[test]
fn test_contains() {
  let root = QuadNode::root(CubeFace::PosY);
  let child = root.get_child(3).unwrap();
  let grandchild = child.get_child(1).unwrap();

  assert!(root.contains(&root));
  assert!(root.contains(&grandchild));
  assert!(child.contains(&grandchild));
  assert!(!grandchild.contains(&child));
  assert!(!root.get_child(0).unwrap().contains(&grandchild));
  assert!(!QuadNode::root(CubeFace::NegY).contains(&grandchild));
}

/// Children split the parent's area into four equal parts.
#[test]
fn test_area_fraction() {
  let root = QuadNode::root(CubeFace::PosX);
  assert_eq!(root.area_fraction(), 1.0);
  let sum: f64 = root.children().unwrap().iter().map(QuadNode::area_fraction).sum();
  assert_eq!(sum, 1.0);
}

/// Sorting is deterministic for mixed faces and depths.
#[test]
fn test_ordering_is_total() {
  let mut nodes = vec![
    QuadNode::new(CubeFace::NegZ, 1, 0, 1),
    QuadNode::new(CubeFace::PosX, 0, 0, 1),
    QuadNode::new(CubeFace::PosX, 1, 0, 1),
    QuadNode::new(CubeFace::NegZ, 0, 0, 1),
  ];
  nodes.sort();
  assert_eq!(nodes[0], QuadNode::new(CubeFace::PosX, 0, 0, 1));
  assert_eq!(nodes[1], QuadNode::new(CubeFace::NegZ, 0, 0, 1));
  assert_eq!(nodes[2], QuadNode::new(CubeFace::PosX, 1, 0, 1));
}
