//! Build queue for parallel patch construction.
//!
//! Enqueue → Tick → Completions
//!
//! A request takes ownership of the patch's vertex buffer for the duration
//! of the build; the completion hands it back. Workers never touch manager
//! state.

use std::sync::Arc;

use rayon::prelude::*;
use web_time::Instant;

use super::mesh::{build_patch, PatchGeometry};
use super::patch::{PatchId, PatchKind, PatchVertex};
use crate::field::TerrainField;

/// Request to (re)build one patch.
pub struct BuildRequest {
  /// Patch this request fills
  pub patch: PatchId,
  pub kind: PatchKind,
  pub geometry: PatchGeometry,
  /// Quads per grid side
  pub resolution: u32,
  /// Buffer moved out of the patch; reused in place
  pub vertices: Vec<PatchVertex>,
  /// Shared triangle list for `resolution`
  pub indices: Arc<[u32]>,
}

/// Finished build.
pub struct BuildCompletion {
  /// Patch the vertices belong to
  pub patch: PatchId,
  /// Filled vertex buffer
  pub vertices: Vec<PatchVertex>,
  /// Raw build time in microseconds
  pub build_time_us: u64,
}

/// Build stage that processes requests in parallel.
pub struct BuildStage {
  field: Arc<TerrainField>,
  /// Pending requests waiting to be processed
  pending: Vec<BuildRequest>,
  /// Completed results ready to be collected
  completed: Vec<BuildCompletion>,
}

impl BuildStage {
  pub fn new(field: Arc<TerrainField>) -> Self {
    Self {
      field,
      pending: Vec::new(),
      completed: Vec::new(),
    }
  }

  pub fn field(&self) -> &Arc<TerrainField> {
    &self.field
  }

  /// Replace the field used by subsequent builds.
  pub fn set_field(&mut self, field: Arc<TerrainField>) {
    self.field = field;
  }

  /// Enqueue a build request.
  pub fn enqueue(&mut self, request: BuildRequest) {
    self.pending.push(request);
  }

  /// Build all pending requests in parallel and block until every one has
  /// finished. Returns the number of builds processed this tick.
  #[cfg_attr(feature = "profiling", tracing::instrument(skip_all, name = "chunk::build_tick"))]
  pub fn tick(&mut self) -> usize {
    if self.pending.is_empty() {
      return 0;
    }

    let requests = std::mem::take(&mut self.pending);
    let count = requests.len();
    let field = &*self.field;

    let completions: Vec<BuildCompletion> = requests
      .into_par_iter()
      .map(|req| {
        let start = Instant::now();
        let mut vertices = req.vertices;
        build_patch(
          req.kind,
          field,
          &req.geometry,
          req.resolution,
          &req.indices,
          &mut vertices,
        );
        let build_time_us = start.elapsed().as_micros() as u64;
        BuildCompletion {
          patch: req.patch,
          vertices,
          build_time_us,
        }
      })
      .collect();

    self.completed.extend(completions);
    count
  }

  /// Take all completed builds.
  pub fn drain_completions(&mut self) -> Vec<BuildCompletion> {
    std::mem::take(&mut self.completed)
  }

  /// Number of pending requests.
  pub fn pending_count(&self) -> usize {
    self.pending.len()
  }

  /// Number of completed results waiting to be drained.
  pub fn completed_count(&self) -> usize {
    self.completed.len()
  }

  /// True when no work remains.
  pub fn is_idle(&self) -> bool {
    self.pending.is_empty() && self.completed.is_empty()
  }
}

#[cfg(test)]
#[path = "build_test.rs"]
mod build_test;
