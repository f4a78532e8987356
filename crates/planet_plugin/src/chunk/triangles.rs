//! Shared triangle index buffers keyed by grid resolution.
//!
//! Every patch of a given resolution has the same topology, so one index
//! list per resolution is built on first use and shared read-only.

use std::collections::HashMap;
use std::sync::Arc;

/// Triangle list for an `N x N` quad grid of `(N + 1)^2` row-major vertices.
///
/// Each quad at vertex `i` emits `i, i+N+1, i+1` and `i+1, i+N+1, i+N+2`.
pub fn grid_triangles(resolution: u32) -> Vec<u32> {
  let n = resolution;
  let row = n + 1;
  let mut indices = Vec::with_capacity((n * n * 6) as usize);
  for y in 0..n {
    for x in 0..n {
      let i = y * row + x;
      indices.extend_from_slice(&[i, i + row, i + 1, i + 1, i + row, i + row + 1]);
    }
  }
  indices
}

/// Owned cache of grid triangle lists.
#[derive(Debug, Default)]
pub struct TriangleCache {
  cache: HashMap<u32, Arc<[u32]>>,
}

impl TriangleCache {
  pub fn new() -> Self {
    Self::default()
  }

  /// Shared triangle list for `resolution`, built on first request.
  pub fn get(&mut self, resolution: u32) -> Arc<[u32]> {
    Arc::clone(
      self
        .cache
        .entry(resolution)
        .or_insert_with(|| grid_triangles(resolution).into()),
    )
  }

  pub fn contains(&self, resolution: u32) -> bool {
    self.cache.contains_key(&resolution)
  }

  pub fn len(&self) -> usize {
    self.cache.len()
  }

  pub fn is_empty(&self) -> bool {
    self.cache.is_empty()
  }

  /// Drop every cached list. Patches still holding an `Arc` keep theirs alive.
  pub fn clear(&mut self) {
    self.cache.clear();
  }
}
