//! ChunkManager - per-frame patch lifecycle for one planet.
//!
//! # Frame Pipeline
//!
//! ```text
//! step(camera, frustum, dt)
//!   1. collect desired leaves on all six faces (fresh budget per face)
//!   2. deactivate active - desired, patches back to their pools
//!   3. activate desired - active, patches from pool or newly created
//!   4. build all scheduled patches in parallel, join
//!   5. commit finished buffers, report ready patches
//! ```
//!
//! All bookkeeping happens on the calling thread. Build workers only see
//! the vertex buffers moved into their requests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use glam::DAffine3;
use thiserror::Error;
#[cfg(feature = "metrics")]
use web_time::Instant;

use super::build::{BuildRequest, BuildStage};
use super::mesh::PatchGeometry;
use super::patch::{Patch, PatchId, PatchKind, PatchState, PatchTransform};
use super::pool::PatchPool;
use super::triangles::TriangleCache;
use crate::camera::CameraState;
use crate::constants::{FACE_COUNT, MAX_RESOLUTION, MIN_RESOLUTION};
#[cfg(feature = "metrics")]
use crate::metrics::PlanetMetrics;
use crate::planet::Planet;
use crate::quadtree::{
  CubeFace, FaceQuadtree, Frustum, LeafBudget, QuadNode, TraversalInput, TraversalStats,
};

/// Patch settings of a manager.
#[derive(Clone, Debug, PartialEq)]
pub struct ManagerConfig {
  /// Quads per patch side.
  pub resolution: u32,
  /// Pair every terrain patch with a sea-level water patch.
  pub water_enabled: bool,
  /// Upper bound on live (non-disposed) patches. `None` = unbounded.
  pub max_patches: Option<usize>,
  /// New leaves each face may charge per frame.
  pub budget_per_frame: usize,
}

impl Default for ManagerConfig {
  fn default() -> Self {
    Self {
      resolution: 128,
      water_enabled: false,
      max_patches: None,
      budget_per_frame: LeafBudget::DEFAULT_PER_FRAME,
    }
  }
}

/// Patches owned by one active node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResidentPatches {
  pub terrain: PatchId,
  pub water: Option<PatchId>,
}

impl ResidentPatches {
  /// Terrain first, then water when present.
  pub fn iter(&self) -> impl Iterator<Item = (PatchId, PatchKind)> {
    std::iter::once((self.terrain, PatchKind::Terrain))
      .chain(self.water.map(|id| (id, PatchKind::Water)))
  }
}

/// What changed during one [`ChunkManager::step`].
#[derive(Clone, Debug, Default)]
pub struct StepOutput {
  /// Nodes that became active, in traversal order.
  pub activated: Vec<QuadNode>,
  /// Nodes whose patches went back to the pools, sorted.
  pub deactivated: Vec<QuadNode>,
  /// Patches rebuilt this frame; the host should re-read their buffers.
  pub ready: Vec<PatchId>,
  /// Desired nodes left inactive because the patch cap was reached.
  pub deferred: Vec<QuadNode>,
  /// Traversal counters summed over all faces.
  pub stats: TraversalStats,
}

/// Violated bookkeeping invariant.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvariantError {
  #[error("active node {0:?} has no resident patches")]
  MissingResident(QuadNode),

  #[error("node {0:?} holds patches but is not active")]
  OrphanResident(QuadNode),

  #[error("node {0:?} has no water patch while water is enabled")]
  MissingWater(QuadNode),

  #[error("node {0:?} has a water patch while water is disabled")]
  UnexpectedWater(QuadNode),

  #[error("patch {0:?} does not exist")]
  UnknownPatch(PatchId),

  #[error("patch {0:?} is tracked in more than one place")]
  DuplicatePatch(PatchId),

  #[error("patch {patch:?} is {actual:?}, expected {expected:?}")]
  WrongState {
    patch: PatchId,
    actual: PatchState,
    expected: PatchState,
  },

  #[error("patch {patch:?} is {actual:?}, expected {expected:?}")]
  WrongKind {
    patch: PatchId,
    actual: PatchKind,
    expected: PatchKind,
  },

  #[error("patch {patch:?} is bound to {actual:?}, expected {expected:?}")]
  NodeMismatch {
    patch: PatchId,
    actual: Option<QuadNode>,
    expected: QuadNode,
  },

  #[error("{live} live patches but {tracked} resident or pooled")]
  UntrackedPatches { live: usize, tracked: usize },

  #[error("{free} free slots but {disposed} disposed patches")]
  FreeSlotMismatch { free: usize, disposed: usize },
}

/// Owns every patch of one planet and keeps the resident set in step with
/// the camera.
pub struct ChunkManager {
  planet: Planet,
  config: ManagerConfig,
  faces: [FaceQuadtree; FACE_COUNT],

  active: HashSet<QuadNode>,
  resident: HashMap<QuadNode, ResidentPatches>,

  /// Patch arena; `PatchId` indexes into it.
  patches: Vec<Patch>,
  /// Slots holding disposed patches, reused before the arena grows.
  free_slots: Vec<u32>,
  /// Generation of slots created after the last shutdown. Keeps ids handed
  /// out before it from matching new patches.
  generation_floor: u32,
  terrain_pool: PatchPool,
  water_pool: PatchPool,
  /// Patches that are not disposed.
  live_patches: usize,

  triangles: TriangleCache,
  builds: BuildStage,
  frame: u64,

  #[cfg(feature = "metrics")]
  metrics: PlanetMetrics,
}

impl ChunkManager {
  pub fn new(planet: Planet, config: ManagerConfig) -> Self {
    Self::with_triangle_cache(planet, config, TriangleCache::new())
  }

  /// Create a manager around an existing triangle cache, e.g. one shared
  /// warm-up across planets of the same resolution.
  ///
  /// `config.resolution` is clamped to `MIN_RESOLUTION..=MAX_RESOLUTION`.
  pub fn with_triangle_cache(planet: Planet, mut config: ManagerConfig, triangles: TriangleCache) -> Self {
    let resolution = config.resolution.clamp(MIN_RESOLUTION, MAX_RESOLUTION);
    if resolution != config.resolution {
      tracing::warn!(requested = config.resolution, resolution, "patch resolution clamped");
      config.resolution = resolution;
    }
    let faces = CubeFace::ALL.map(|face| FaceQuadtree::new(face, planet.config.clone()));
    let builds = BuildStage::new(Arc::clone(&planet.field));
    Self {
      planet,
      config,
      faces,
      active: HashSet::new(),
      resident: HashMap::new(),
      patches: Vec::new(),
      free_slots: Vec::new(),
      generation_floor: 0,
      terrain_pool: PatchPool::new(),
      water_pool: PatchPool::new(),
      live_patches: 0,
      triangles,
      builds,
      frame: 0,
      #[cfg(feature = "metrics")]
      metrics: PlanetMetrics::new(),
    }
  }

  /// Advance one frame.
  ///
  /// `frustum` must be in world space. Every build scheduled by this call
  /// has finished when it returns.
  #[cfg_attr(feature = "profiling", tracing::instrument(skip_all, name = "chunk::step"))]
  pub fn step(&mut self, camera: &CameraState, frustum: &Frustum, dt: f64) -> StepOutput {
    #[cfg(feature = "metrics")]
    let step_start = Instant::now();
    self.frame += 1;

    // 1. Desired leaves
    #[cfg(feature = "metrics")]
    let traversal_start = Instant::now();
    let mut desired = Vec::new();
    let mut stats = TraversalStats::default();
    {
      let input = TraversalInput {
        camera_position: camera.position,
        frustum,
        planet_transform: &self.planet.transform,
        previous_active: &self.active,
      };
      for tree in &self.faces {
        let mut budget = LeafBudget::new(self.config.budget_per_frame);
        stats.merge(&tree.collect_leaves(&input, &mut budget, &mut desired));
      }
    }
    #[cfg(feature = "metrics")]
    let traversal_us = traversal_start.elapsed().as_micros() as u64;

    // 2. Deactivate
    let desired_set: HashSet<QuadNode> = desired.iter().copied().collect();
    let mut deactivated: Vec<QuadNode> = self
      .active
      .iter()
      .filter(|node| !desired_set.contains(node))
      .copied()
      .collect();
    deactivated.sort_unstable();
    for node in &deactivated {
      self.deactivate(*node);
    }

    // 3. Activate
    let mut activated = Vec::new();
    let mut deferred = Vec::new();
    for node in desired {
      if self.active.contains(&node) {
        continue;
      }
      if self.activate(node) {
        activated.push(node);
      } else {
        deferred.push(node);
      }
    }

    // 4. Build and join
    self.builds.tick();

    // 5. Commit
    let ready = self.commit_builds();

    if stats.forced > 0 {
      tracing::debug!(forced = stats.forced, "leaf budget exhausted");
    }
    if !deferred.is_empty() {
      tracing::debug!(deferred = deferred.len(), "activations deferred by patch cap");
    }
    tracing::debug!(
      frame = self.frame,
      dt,
      activated = activated.len(),
      deactivated = deactivated.len(),
      ready = ready.len(),
      resident = self.active.len(),
      pooled_terrain = self.terrain_pool.len(),
      pooled_water = self.water_pool.len(),
      "chunk step"
    );

    #[cfg(feature = "metrics")]
    {
      self.metrics.record_traversal_timing(traversal_us);
      self.metrics.update_leaves(&self.active);
      self.metrics.record_patches(
        self.active.len(),
        self.terrain_pool.len(),
        self.water_pool.len(),
        self.live_patches,
      );
      self
        .metrics
        .record_step(step_start.elapsed().as_micros() as u64, deferred.len());
    }
    debug_assert_eq!(self.check_invariants(), Ok(()));

    StepOutput {
      activated,
      deactivated,
      ready,
      deferred,
      stats,
    }
  }

  fn deactivate(&mut self, node: QuadNode) {
    self.active.remove(&node);
    let Some(resident) = self.resident.remove(&node) else {
      tracing::warn!(?node, "deactivating node without resident patches");
      return;
    };
    for (id, _) in resident.iter() {
      self.release(id);
    }
  }

  /// Bind patches to `node` and schedule their builds. Returns false when
  /// the patch cap prevents it; nothing changes in that case.
  fn activate(&mut self, node: QuadNode) -> bool {
    let Some(terrain) = self.acquire(PatchKind::Terrain) else {
      return false;
    };
    let water = if self.config.water_enabled {
      match self.acquire(PatchKind::Water) {
        Some(id) => Some(id),
        None => {
          self.release(terrain);
          return false;
        }
      }
    } else {
      None
    };

    let resident = ResidentPatches { terrain, water };
    let geometry = PatchGeometry::new(&self.planet.config, &node);
    let transform = self.patch_transform(&geometry);
    let indices = self.triangles.get(self.config.resolution);

    for (id, kind) in resident.iter() {
      let Some(patch) = self.patches.get_mut(id.index()) else {
        continue;
      };
      patch.node = Some(node);
      patch.transform = transform;
      patch.resolution = self.config.resolution;
      patch.indices = Some(Arc::clone(&indices));
      patch.state = PatchState::Building;
      patch.revision += 1;
      let vertices = std::mem::take(&mut patch.vertices);

      self.builds.enqueue(BuildRequest {
        patch: id,
        kind,
        geometry,
        resolution: self.config.resolution,
        vertices,
        indices: Arc::clone(&indices),
      });
    }

    self.active.insert(node);
    self.resident.insert(node, resident);
    true
  }

  /// Pop a valid pooled patch of `kind`, or create one if the cap allows.
  ///
  /// New patches take a free slot when there is one; the arena only grows
  /// when every slot is live.
  fn acquire(&mut self, kind: PatchKind) -> Option<PatchId> {
    let patches = &self.patches;
    let pool = match kind {
      PatchKind::Terrain => &mut self.terrain_pool,
      PatchKind::Water => &mut self.water_pool,
    };
    let pooled = pool.pop_valid(|id| {
      patches
        .get(id.index())
        .is_some_and(|p| p.id == id && p.kind == kind && p.state == PatchState::Pooled)
    });
    if pooled.is_some() {
      return pooled;
    }

    if self.config.max_patches.is_some_and(|max| self.live_patches >= max) {
      return None;
    }

    let id = match self.free_slots.pop() {
      Some(index) => {
        let generation = self
          .patches
          .get(index as usize)
          .map_or(self.generation_floor, |p| p.id.generation().wrapping_add(1));
        PatchId::new(index, generation)
      }
      None => {
        let Ok(index) = u32::try_from(self.patches.len()) else {
          tracing::warn!(slots = self.patches.len(), "patch arena is full");
          return None;
        };
        PatchId::new(index, self.generation_floor)
      }
    };
    let patch = Patch::new(id, kind, self.config.resolution);
    match self.patches.get_mut(id.index()) {
      Some(slot) => *slot = patch,
      None => self.patches.push(patch),
    }
    self.live_patches += 1;
    Some(id)
  }

  fn patch_mut(&mut self, id: PatchId) -> Option<&mut Patch> {
    self.patches.get_mut(id.index()).filter(|p| p.id == id)
  }

  /// Unbind a patch and push it to its pool. Its vertex buffer is kept for
  /// the next build.
  fn release(&mut self, id: PatchId) {
    let Some(patch) = self.patch_mut(id) else {
      tracing::warn!(patch = ?id, "releasing unknown patch");
      return;
    };
    patch.node = None;
    patch.state = PatchState::Pooled;
    match patch.kind {
      PatchKind::Terrain => self.terrain_pool.push(id),
      PatchKind::Water => self.water_pool.push(id),
    }
  }

  fn commit_builds(&mut self) -> Vec<PatchId> {
    let completions = self.builds.drain_completions();
    let mut ready = Vec::with_capacity(completions.len());
    for completion in completions {
      let Some(patch) = self.patches.get_mut(completion.patch.index()).filter(|p| p.id == completion.patch) else {
        tracing::warn!(patch = ?completion.patch, "build completed for unknown patch");
        continue;
      };
      if patch.state != PatchState::Building {
        tracing::warn!(patch = ?completion.patch, state = ?patch.state, "dropping stale build");
        continue;
      }
      patch.vertices = completion.vertices;
      patch.state = PatchState::Ready;
      ready.push(completion.patch);

      #[cfg(feature = "metrics")]
      self.metrics.record_build_timing(completion.build_time_us);
    }
    ready
  }

  fn patch_transform(&self, geometry: &PatchGeometry) -> PatchTransform {
    PatchTransform {
      position: self.planet.local_to_world(geometry.origin),
      rotation: self.planet.rotation() * geometry.rotation(),
    }
  }

  /// Move the planet. Resident patch transforms follow immediately; their
  /// vertex data stays valid.
  pub fn set_planet_transform(&mut self, transform: DAffine3) {
    self.planet.set_transform(transform);
    let nodes: Vec<(QuadNode, ResidentPatches)> =
      self.resident.iter().map(|(node, res)| (*node, *res)).collect();
    for (node, resident) in nodes {
      let transform = self.patch_transform(&PatchGeometry::new(&self.planet.config, &node));
      for (id, _) in resident.iter() {
        if let Some(patch) = self.patch_mut(id) {
          patch.transform = transform;
        }
      }
    }
  }

  /// Dispose pooled patches until each pool holds at most `keep`.
  /// Returns the number of patches disposed. Their slots are reused by later
  /// activations.
  pub fn shrink_pools(&mut self, keep: usize) -> usize {
    let mut surplus = self.terrain_pool.trim_to(keep);
    surplus.extend(self.water_pool.trim_to(keep));
    for id in &surplus {
      if let Some(patch) = self.patch_mut(*id) {
        patch.dispose();
        self.live_patches -= 1;
        self.free_slots.push(id.index() as u32);
      }
    }
    if !surplus.is_empty() {
      tracing::debug!(disposed = surplus.len(), keep, "shrank patch pools");
    }
    surplus.len()
  }

  /// Dispose every patch, empty the arena and drop the triangle cache.
  ///
  /// The manager stays usable; the next step starts from an empty set. Ids
  /// handed out before the call never resolve again.
  pub fn shutdown(&mut self) {
    if let Some(max) = self.patches.iter().map(|p| p.id.generation()).max() {
      self.generation_floor = self.generation_floor.max(max.wrapping_add(1));
    }
    self.patches.clear();
    self.free_slots.clear();
    let disposed = self.live_patches;
    self.active.clear();
    self.resident.clear();
    self.terrain_pool.clear();
    self.water_pool.clear();
    self.live_patches = 0;
    self.triangles.clear();
    tracing::debug!(disposed, "chunk manager shut down");
  }

  /// Verify pool and residency bookkeeping.
  ///
  /// Every active node has exactly the patches it should, and every live
  /// patch is either resident or pooled, never both.
  pub fn check_invariants(&self) -> Result<(), InvariantError> {
    for node in &self.active {
      if !self.resident.contains_key(node) {
        return Err(InvariantError::MissingResident(*node));
      }
    }

    let mut seen = HashSet::with_capacity(self.live_patches);
    for (node, resident) in &self.resident {
      if !self.active.contains(node) {
        return Err(InvariantError::OrphanResident(*node));
      }
      match (self.config.water_enabled, resident.water) {
        (true, None) => return Err(InvariantError::MissingWater(*node)),
        (false, Some(_)) => return Err(InvariantError::UnexpectedWater(*node)),
        _ => {}
      }
      for (id, kind) in resident.iter() {
        let patch = self.checked_patch(id, kind, PatchState::Ready)?;
        if patch.node != Some(*node) {
          return Err(InvariantError::NodeMismatch {
            patch: id,
            actual: patch.node,
            expected: *node,
          });
        }
        if !seen.insert(id) {
          return Err(InvariantError::DuplicatePatch(id));
        }
      }
    }

    for (pool, kind) in [
      (&self.terrain_pool, PatchKind::Terrain),
      (&self.water_pool, PatchKind::Water),
    ] {
      for id in pool.iter() {
        self.checked_patch(id, kind, PatchState::Pooled)?;
        if !seen.insert(id) {
          return Err(InvariantError::DuplicatePatch(id));
        }
      }
    }

    let live = self
      .patches
      .iter()
      .filter(|p| p.state != PatchState::Disposed)
      .count();
    if live != seen.len() || live != self.live_patches {
      return Err(InvariantError::UntrackedPatches {
        live,
        tracked: seen.len(),
      });
    }

    let disposed = self.patches.len() - live;
    let free_disposed = self
      .free_slots
      .iter()
      .filter(|&&index| {
        self
          .patches
          .get(index as usize)
          .is_some_and(|p| p.state == PatchState::Disposed)
      })
      .count();
    if free_disposed != disposed || self.free_slots.len() != disposed {
      return Err(InvariantError::FreeSlotMismatch {
        free: self.free_slots.len(),
        disposed,
      });
    }
    Ok(())
  }

  fn checked_patch(&self, id: PatchId, kind: PatchKind, state: PatchState) -> Result<&Patch, InvariantError> {
    let patch = self.patch(id).ok_or(InvariantError::UnknownPatch(id))?;
    if patch.kind != kind {
      return Err(InvariantError::WrongKind {
        patch: id,
        actual: patch.kind,
        expected: kind,
      });
    }
    if patch.state != state {
      return Err(InvariantError::WrongState {
        patch: id,
        actual: patch.state,
        expected: state,
      });
    }
    Ok(patch)
  }

  // ---------------------------------------------------------------------------
  // Accessors
  // ---------------------------------------------------------------------------

  /// Patch data for host-side mesh commit. `None` once the slot behind
  /// `id` holds a newer patch.
  pub fn patch(&self, id: PatchId) -> Option<&Patch> {
    self.patches.get(id.index()).filter(|p| p.id == id)
  }

  /// Every patch in the arena, disposed ones included.
  pub fn patches(&self) -> impl Iterator<Item = &Patch> {
    self.patches.iter()
  }

  /// Patches currently bound to `node`.
  pub fn resident(&self, node: &QuadNode) -> Option<&ResidentPatches> {
    self.resident.get(node)
  }

  pub fn active_nodes(&self) -> &HashSet<QuadNode> {
    &self.active
  }

  pub fn is_active(&self, node: &QuadNode) -> bool {
    self.active.contains(node)
  }

  pub fn pooled_count(&self, kind: PatchKind) -> usize {
    match kind {
      PatchKind::Terrain => self.terrain_pool.len(),
      PatchKind::Water => self.water_pool.len(),
    }
  }

  /// Patches that exist and are not disposed.
  pub fn live_patch_count(&self) -> usize {
    self.live_patches
  }

  /// Arena slots, disposed patches included.
  pub fn total_patch_count(&self) -> usize {
    self.patches.len()
  }

  pub fn planet(&self) -> &Planet {
    &self.planet
  }

  pub fn config(&self) -> &ManagerConfig {
    &self.config
  }

  pub fn triangles(&self) -> &TriangleCache {
    &self.triangles
  }

  /// Frames stepped so far.
  pub fn frame(&self) -> u64 {
    self.frame
  }

  #[cfg(feature = "metrics")]
  pub fn metrics(&self) -> &PlanetMetrics {
    &self.metrics
  }

  #[cfg(feature = "metrics")]
  pub fn metrics_mut(&mut self) -> &mut PlanetMetrics {
    &mut self.metrics
  }
}

#[cfg(test)]
#[path = "manager_test.rs"]
mod manager_test;
