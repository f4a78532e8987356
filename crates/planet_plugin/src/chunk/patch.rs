//! Patch - recyclable mesh unit bound to one quadtree leaf at a time.

use std::sync::Arc;

use glam::{DAffine3, DQuat, DVec3};

use crate::quadtree::QuadNode;

/// Interleaved vertex as handed to the host renderer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PatchVertex {
  /// Position relative to the patch transform
  pub position: [f32; 3],
  pub normal: [f32; 3],
  /// Grid coordinates in [0, 1]
  pub uv: [f32; 2],
  /// Linear RGBA
  pub color: [f32; 4],
}

/// Which build function fills a patch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PatchKind {
  /// Displaced by the terrain field, normals recomputed from the mesh.
  Terrain,
  /// Flat sea-level shell, sphere normals.
  Water,
}

/// Lifecycle state of a patch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PatchState {
  /// Sitting in a pool, no owner.
  Pooled,
  /// Buffers are owned by an in-flight build.
  Building,
  /// Resident with valid data.
  Ready,
  /// Buffers freed; never handed out again.
  Disposed,
}

/// Handle to a patch in the manager's arena.
///
/// Slots of disposed patches are reused; the generation tells a stale
/// handle apart from the patch that took its slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PatchId {
  index: u32,
  generation: u32,
}

impl PatchId {
  #[inline]
  pub(crate) const fn new(index: u32, generation: u32) -> Self {
    Self { index, generation }
  }

  /// Arena slot.
  #[inline]
  pub fn index(self) -> usize {
    self.index as usize
  }

  #[inline]
  pub fn generation(self) -> u32 {
    self.generation
  }
}

/// World placement of a patch: vertices are relative to `position` in the
/// frame given by `rotation`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PatchTransform {
  pub position: DVec3,
  pub rotation: DQuat,
}

impl PatchTransform {
  pub const IDENTITY: Self = Self {
    position: DVec3::ZERO,
    rotation: DQuat::IDENTITY,
  };

  #[inline]
  pub fn to_affine(&self) -> DAffine3 {
    DAffine3::from_rotation_translation(self.rotation, self.position)
  }

  /// World position of a patch-local vertex.
  #[inline]
  pub fn transform_point(&self, local: DVec3) -> DVec3 {
    self.position + self.rotation * local
  }
}

impl Default for PatchTransform {
  fn default() -> Self {
    Self::IDENTITY
  }
}

/// Recyclable mesh unit.
///
/// Identity lasts until the patch is disposed; content is rewritten every
/// time the patch is assigned to a new node.
#[derive(Clone, Debug)]
pub struct Patch {
  pub(crate) id: PatchId,
  pub(crate) kind: PatchKind,
  pub(crate) resolution: u32,
  pub(crate) vertices: Vec<PatchVertex>,
  pub(crate) indices: Option<Arc<[u32]>>,
  pub(crate) transform: PatchTransform,
  pub(crate) node: Option<QuadNode>,
  pub(crate) state: PatchState,
  pub(crate) revision: u64,
}

impl Patch {
  pub(crate) fn new(id: PatchId, kind: PatchKind, resolution: u32) -> Self {
    Self {
      id,
      kind,
      resolution,
      vertices: Vec::new(),
      indices: None,
      transform: PatchTransform::IDENTITY,
      node: None,
      state: PatchState::Pooled,
      revision: 0,
    }
  }

  #[inline]
  pub fn id(&self) -> PatchId {
    self.id
  }

  #[inline]
  pub fn kind(&self) -> PatchKind {
    self.kind
  }

  /// Quads per grid side.
  #[inline]
  pub fn resolution(&self) -> u32 {
    self.resolution
  }

  /// Vertex data; empty unless the patch is ready.
  #[inline]
  pub fn vertices(&self) -> &[PatchVertex] {
    &self.vertices
  }

  /// Shared triangle list for this patch's resolution.
  #[inline]
  pub fn indices(&self) -> Option<&Arc<[u32]>> {
    self.indices.as_ref()
  }

  #[inline]
  pub fn transform(&self) -> &PatchTransform {
    &self.transform
  }

  /// Owning node while resident.
  #[inline]
  pub fn node(&self) -> Option<QuadNode> {
    self.node
  }

  #[inline]
  pub fn state(&self) -> PatchState {
    self.state
  }

  /// Bumped on every (re)assignment; hosts compare it to skip re-uploads.
  #[inline]
  pub fn revision(&self) -> u64 {
    self.revision
  }

  #[inline]
  pub fn is_ready(&self) -> bool {
    self.state == PatchState::Ready
  }

  /// Free buffers and retire the patch. Its slot may be reused under a new
  /// generation.
  pub(crate) fn dispose(&mut self) {
    self.vertices = Vec::new();
    self.indices = None;
    self.node = None;
    self.state = PatchState::Disposed;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn vertex_layout_is_tightly_packed() {
    assert_eq!(std::mem::size_of::<PatchVertex>(), 12 * 4);
    assert_eq!(std::mem::align_of::<PatchVertex>(), 4);
  }

  #[test]
  fn new_patch_is_pooled_and_empty() {
    let patch = Patch::new(PatchId::new(3, 1), PatchKind::Water, 8);
    assert_eq!(patch.state(), PatchState::Pooled);
    assert_eq!(patch.id().index(), 3);
    assert_eq!(patch.id().generation(), 1);
    assert!(patch.vertices().is_empty());
    assert!(patch.node().is_none());
  }

  #[test]
  fn dispose_frees_buffers() {
    let mut patch = Patch::new(PatchId::new(0, 0), PatchKind::Terrain, 2);
    patch.vertices = vec![PatchVertex::default(); 9];
    patch.dispose();
    assert_eq!(patch.state(), PatchState::Disposed);
    assert_eq!(patch.vertices.capacity(), 0);
  }

  #[test]
  fn ids_differ_by_generation() {
    let old = PatchId::new(4, 0);
    let new = PatchId::new(4, 1);
    assert_eq!(old.index(), new.index());
    assert_ne!(old, new);
  }

  #[test]
  fn transform_applies_rotation_then_offset() {
    let transform = PatchTransform {
      position: DVec3::new(0.0, 10.0, 0.0),
      rotation: DQuat::from_rotation_z(std::f64::consts::FRAC_PI_2),
    };
    let p = transform.transform_point(DVec3::X);
    assert!((p - DVec3::new(0.0, 11.0, 0.0)).length() < 1e-12);
    assert!((transform.to_affine().transform_point3(DVec3::X) - p).length() < 1e-12);
  }
}
