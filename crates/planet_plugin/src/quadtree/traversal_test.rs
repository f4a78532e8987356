use glam::{DMat4, DQuat};

use super::*;

const RADIUS: f64 = 1000.0;

fn config(min_leaf_size: f64, enable_culling: bool) -> QuadtreeConfig {
  QuadtreeConfig {
    radius: RADIUS,
    min_leaf_size,
    split_distance_factor: 1.0,
    enable_culling,
  }
}

fn frustum_looking(position: DVec3, rotation: DQuat) -> Frustum {
  let view = DMat4::from_rotation_translation(rotation, position).inverse();
  let projection = DMat4::perspective_rh(std::f64::consts::FRAC_PI_2, 1.0, 1.0, 100_000.0);
  Frustum::from_view_projection(projection * view)
}

struct Run {
  leaves: Vec<QuadNode>,
  stats: TraversalStats,
}

fn run(
  tree: &FaceQuadtree,
  camera: DVec3,
  frustum: &Frustum,
  previous: &HashSet<QuadNode>,
  budget: &mut LeafBudget,
) -> Run {
  let transform = DAffine3::IDENTITY;
  let input = TraversalInput {
    camera_position: camera,
    frustum,
    planet_transform: &transform,
    previous_active: previous,
  };
  let mut leaves = Vec::new();
  let stats = tree.collect_leaves(&input, budget, &mut leaves);
  Run { leaves, stats }
}

/// Leaves tile the face exactly once: area sums to 1 and no leaf contains
/// another.
fn assert_complete_coverage(leaves: &[QuadNode]) {
  let area: f64 = leaves.iter().map(QuadNode::area_fraction).sum();
  assert!((area - 1.0).abs() < 1e-12, "leaf area {} != 1", area);

  let set: HashSet<QuadNode> = leaves.iter().copied().collect();
  assert_eq!(set.len(), leaves.len(), "duplicate leaves");
  for leaf in leaves {
    let mut ancestor = leaf.get_parent();
    while let Some(node) = ancestor {
      assert!(!set.contains(&node), "{:?} overlaps ancestor {:?}", leaf, node);
      ancestor = node.get_parent();
    }
  }
}

/// A distant camera sees a single root leaf per face.
#[test]
fn test_far_camera_emits_root() {
  let tree = FaceQuadtree::new(CubeFace::PosY, config(250.0, false));
  let camera = DVec3::new(0.0, 100_000.0, 0.0);
  let frustum = frustum_looking(camera, DQuat::IDENTITY);
  let result = run(&tree, camera, &frustum, &HashSet::new(), &mut LeafBudget::default());

  assert_eq!(result.leaves, vec![QuadNode::root(CubeFace::PosY)]);
  assert_eq!(result.stats.visited, 1);
  assert_eq!(result.stats.charged, 1);
}

/// Children are emitted in BL, BR, TL, TR order.
#[test]
fn test_children_emitted_in_quadrant_order() {
  let tree = FaceQuadtree::new(CubeFace::PosY, config(1000.0, false));
  let camera = DVec3::new(0.0, RADIUS + 10.0, 0.0);
  let frustum = frustum_looking(camera, DQuat::IDENTITY);
  let result = run(&tree, camera, &frustum, &HashSet::new(), &mut LeafBudget::unlimited());

  let root = QuadNode::root(CubeFace::PosY);
  assert_eq!(result.leaves, root.children().unwrap().to_vec());
}

/// Close to the surface the face is refined down to min leaf size and still
/// covered exactly once.
#[test]
fn test_leaf_coverage_is_complete() {
  let tree = FaceQuadtree::new(CubeFace::PosY, config(125.0, false));
  let camera = DVec3::new(120.0, RADIUS + 5.0, -340.0);
  let frustum = frustum_looking(camera, DQuat::IDENTITY);
  let result = run(&tree, camera, &frustum, &HashSet::new(), &mut LeafBudget::unlimited());

  assert!(result.leaves.len() > 4);
  assert!(result.leaves.iter().any(|l| l.depth == tree.config().max_split_depth()));
  assert_complete_coverage(&result.leaves);
  assert_eq!(result.stats.emitted, result.leaves.len());
}

/// Leaves never drop below the minimum size.
#[test]
fn test_min_leaf_size_respected() {
  let cfg = config(250.0, false);
  let tree = FaceQuadtree::new(CubeFace::NegZ, cfg.clone());
  let camera = DVec3::new(0.0, 0.0, -RADIUS - 1.0);
  let frustum = frustum_looking(camera, DQuat::IDENTITY);
  let result = run(&tree, camera, &frustum, &HashSet::new(), &mut LeafBudget::unlimited());

  for leaf in &result.leaves {
    assert!(cfg.node_size(leaf.depth) >= cfg.min_leaf_size);
  }
}

/// New leaves charge at most B; the rest are emitted as forced.
#[test]
fn test_budget_conservation() {
  let tree = FaceQuadtree::new(CubeFace::PosY, config(125.0, false));
  let camera = DVec3::new(0.0, RADIUS + 5.0, 0.0);
  let frustum = frustum_looking(camera, DQuat::IDENTITY);

  for budget_per_frame in [1usize, 3, 8, 32] {
    let mut budget = LeafBudget::new(budget_per_frame);
    let result = run(&tree, camera, &frustum, &HashSet::new(), &mut budget);

    assert!(result.stats.charged <= budget_per_frame);
    assert_eq!(
      result.stats.charged + result.stats.forced,
      result.stats.emitted,
      "every leaf is new on an empty active set"
    );
    assert_complete_coverage(&result.leaves);
  }
}

/// Budget 1: the first leaf spends it, everything after is emitted unsplit.
#[test]
fn test_exhausted_budget_stops_splitting_not_emission() {
  let tree = FaceQuadtree::new(CubeFace::PosY, config(125.0, false));
  let camera = DVec3::new(0.0, RADIUS + 5.0, 0.0);
  let frustum = frustum_looking(camera, DQuat::IDENTITY);
  let mut budget = LeafBudget::new(1);
  let result = run(&tree, camera, &frustum, &HashSet::new(), &mut budget);

  assert_eq!(result.stats.charged, 1);
  assert!(result.stats.forced > 0);
  assert!(budget.is_exhausted());
  assert_complete_coverage(&result.leaves);
}

/// A zero budget cannot split the root but still covers the face.
#[test]
fn test_zero_budget_emits_root() {
  let tree = FaceQuadtree::new(CubeFace::PosY, config(125.0, false));
  let camera = DVec3::new(0.0, RADIUS + 5.0, 0.0);
  let frustum = frustum_looking(camera, DQuat::IDENTITY);
  let result = run(&tree, camera, &frustum, &HashSet::new(), &mut LeafBudget::new(0));

  assert_eq!(result.leaves, vec![QuadNode::root(CubeFace::PosY)]);
  assert_eq!(result.stats.charged, 0);
  assert_eq!(result.stats.forced, 1);
}

/// Re-emitting last frame's leaves costs nothing, so the selection is stable.
#[test]
fn test_stable_leaves_charge_nothing() {
  let tree = FaceQuadtree::new(CubeFace::PosY, config(125.0, false));
  let camera = DVec3::new(250.0, RADIUS + 20.0, 250.0);
  let frustum = frustum_looking(camera, DQuat::IDENTITY);

  let first = run(&tree, camera, &frustum, &HashSet::new(), &mut LeafBudget::unlimited());
  let previous: HashSet<QuadNode> = first.leaves.iter().copied().collect();

  let mut budget = LeafBudget::new(1);
  let second = run(&tree, camera, &frustum, &previous, &mut budget);

  assert_eq!(second.leaves, first.leaves);
  assert_eq!(second.stats.charged, 0);
  assert_eq!(second.stats.forced, 0);
  assert_eq!(budget.remaining(), 1);
}

/// With only part of last frame's leaves active, exactly the leaves outside
/// that set are charged, up to the budget.
#[test]
fn test_partial_active_set_charges_only_new_leaves() {
  let tree = FaceQuadtree::new(CubeFace::PosY, config(125.0, false));
  let camera = DVec3::new(250.0, RADIUS + 20.0, 250.0);
  let frustum = frustum_looking(camera, DQuat::IDENTITY);

  let full = run(&tree, camera, &frustum, &HashSet::new(), &mut LeafBudget::unlimited());
  let previous: HashSet<QuadNode> = full.leaves.iter().step_by(2).copied().collect();
  assert!(previous.len() < full.leaves.len());

  for budget_per_frame in [1usize, 3, 8, 1024] {
    let mut budget = LeafBudget::new(budget_per_frame);
    let result = run(&tree, camera, &frustum, &previous, &mut budget);

    let new_leaves = result.leaves.iter().filter(|leaf| !previous.contains(leaf)).count();
    assert_eq!(result.stats.charged, new_leaves.min(budget_per_frame));
    assert_eq!(result.stats.new_leaves(), new_leaves);
    assert_complete_coverage(&result.leaves);
  }

  // Enough budget reproduces the full selection.
  let mut budget = LeafBudget::new(1024);
  let result = run(&tree, camera, &frustum, &previous, &mut budget);
  assert_eq!(result.leaves, full.leaves);
  assert_eq!(result.stats.charged, full.leaves.len() - previous.len());
}

/// Same input, same output, same order.
#[test]
fn test_traversal_is_deterministic() {
  let tree = FaceQuadtree::new(CubeFace::PosX, config(125.0, true));
  let camera = DVec3::new(RADIUS + 50.0, 200.0, -100.0);
  let rotation = DQuat::from_rotation_y(std::f64::consts::FRAC_PI_2);
  let frustum = frustum_looking(camera, rotation);

  let a = run(&tree, camera, &frustum, &HashSet::new(), &mut LeafBudget::new(16));
  let b = run(&tree, camera, &frustum, &HashSet::new(), &mut LeafBudget::new(16));
  assert_eq!(a.leaves, b.leaves);
  assert_eq!(a.stats, b.stats);
}

/// Camera above the +Y pole looking toward +X: the -X face lies entirely
/// behind the near plane and is pruned at its root.
#[test]
fn test_face_behind_camera_is_culled() {
  let camera = DVec3::new(0.0, 1500.0, 0.0);
  // -Z forward rotated onto +X.
  let frustum = frustum_looking(camera, DQuat::from_rotation_y(-std::f64::consts::FRAC_PI_2));
  assert!(frustum.contains_point(DVec3::new(100.0, 1500.0, 0.0)));

  let behind = FaceQuadtree::new(CubeFace::NegX, config(125.0, true));
  let result = run(&behind, camera, &frustum, &HashSet::new(), &mut LeafBudget::unlimited());
  assert!(result.leaves.is_empty());
  assert_eq!(result.stats.culled, 1);
  assert_eq!(result.stats.charged, 0);

  let ahead = FaceQuadtree::new(CubeFace::PosX, config(125.0, true));
  let result = run(&ahead, camera, &frustum, &HashSet::new(), &mut LeafBudget::unlimited());
  assert!(!result.leaves.is_empty());
}

/// Every emitted leaf under culling passes the frustum test, and culled
/// regions produce no leaves.
#[test]
fn test_culled_leaves_are_outside() {
  let camera = DVec3::new(0.0, 1500.0, 0.0);
  let frustum = frustum_looking(camera, DQuat::from_rotation_y(-std::f64::consts::FRAC_PI_2));
  let transform = DAffine3::IDENTITY;

  let tree = FaceQuadtree::new(CubeFace::PosY, config(125.0, true));
  let result = run(&tree, camera, &frustum, &HashSet::new(), &mut LeafBudget::unlimited());

  assert!(result.stats.culled > 0);
  for leaf in &result.leaves {
    assert!(frustum.intersects_aabb(&tree.world_bounds(leaf, &transform)));
  }

  // The bottom-left child spans -X and is entirely behind the camera's near
  // plane or below its view; nothing under it survives.
  let bottom_left = QuadNode::root(CubeFace::PosY).get_child(0).unwrap();
  if !frustum.intersects_aabb(&tree.world_bounds(&bottom_left, &transform)) {
    assert!(result.leaves.iter().all(|leaf| !bottom_left.contains(leaf)));
  }
}

/// Culling off: pruning never happens.
#[test]
fn test_culling_disabled_visits_everything() {
  let camera = DVec3::new(0.0, 1500.0, 0.0);
  let frustum = frustum_looking(camera, DQuat::from_rotation_y(-std::f64::consts::FRAC_PI_2));
  let tree = FaceQuadtree::new(CubeFace::NegX, config(125.0, false));
  let result = run(&tree, camera, &frustum, &HashSet::new(), &mut LeafBudget::unlimited());

  assert_eq!(result.stats.culled, 0);
  assert_complete_coverage(&result.leaves);
}
