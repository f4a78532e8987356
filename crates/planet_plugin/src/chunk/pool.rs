//! LIFO pool of recyclable patch ids.

use super::patch::PatchId;

/// Stack of inactive patches of one kind.
///
/// The most recently released patch is handed out first, keeping warm
/// buffers in use.
#[derive(Debug, Default)]
pub struct PatchPool {
  stack: Vec<PatchId>,
}

impl PatchPool {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, id: PatchId) {
    self.stack.push(id);
  }

  /// Pop the newest entry that passes `is_valid`.
  ///
  /// Invalid entries are discarded with a warning; they indicate a
  /// bookkeeping bug upstream and must never be handed out.
  pub fn pop_valid(&mut self, mut is_valid: impl FnMut(PatchId) -> bool) -> Option<PatchId> {
    while let Some(id) = self.stack.pop() {
      if is_valid(id) {
        return Some(id);
      }
      tracing::warn!(patch = ?id, "discarding invalid pool entry");
    }
    None
  }

  pub fn len(&self) -> usize {
    self.stack.len()
  }

  pub fn is_empty(&self) -> bool {
    self.stack.is_empty()
  }

  pub fn contains(&self, id: PatchId) -> bool {
    self.stack.contains(&id)
  }

  pub fn iter(&self) -> impl Iterator<Item = PatchId> + '_ {
    self.stack.iter().copied()
  }

  pub fn clear(&mut self) {
    self.stack.clear();
  }

  /// Remove the oldest entries until at most `keep` remain.
  pub fn trim_to(&mut self, keep: usize) -> Vec<PatchId> {
    let excess = self.stack.len().saturating_sub(keep);
    self.stack.drain(..excess).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn pool_is_lifo() {
    let mut pool = PatchPool::new();
    pool.push(PatchId::new(1, 0));
    pool.push(PatchId::new(2, 0));
    assert_eq!(pool.pop_valid(|_| true), Some(PatchId::new(2, 0)));
    assert_eq!(pool.pop_valid(|_| true), Some(PatchId::new(1, 0)));
    assert_eq!(pool.pop_valid(|_| true), None);
  }

  #[test]
  fn pop_valid_skips_invalid_entries() {
    let mut pool = PatchPool::new();
    pool.push(PatchId::new(1, 0));
    pool.push(PatchId::new(7, 0));
    pool.push(PatchId::new(9, 0));

    let got = pool.pop_valid(|id| id.index() < 5);
    assert_eq!(got, Some(PatchId::new(1, 0)));
    // Invalid entries above it are gone for good.
    assert!(pool.is_empty());
  }

  #[test]
  fn pop_valid_on_all_invalid_empties_pool() {
    let mut pool = PatchPool::new();
    pool.push(PatchId::new(4, 0));
    pool.push(PatchId::new(5, 0));
    assert_eq!(pool.pop_valid(|_| false), None);
    assert!(pool.is_empty());
  }

  #[test]
  fn clear_empties_pool() {
    let mut pool = PatchPool::new();
    pool.push(PatchId::new(0, 0));
    pool.push(PatchId::new(1, 0));
    assert!(pool.contains(PatchId::new(0, 0)));
    pool.clear();
    assert!(pool.is_empty());
    assert!(!pool.contains(PatchId::new(0, 0)));
  }

  #[test]
  fn trim_keeps_newest() {
    let mut pool = PatchPool::new();
    for i in 0..5 {
      pool.push(PatchId::new(i, 0));
    }
    assert_eq!(pool.trim_to(2), vec![PatchId::new(0, 0), PatchId::new(1, 0), PatchId::new(2, 0)]);
    assert_eq!(pool.iter().collect::<Vec<_>>(), vec![PatchId::new(3, 0), PatchId::new(4, 0)]);
    assert!(pool.trim_to(10).is_empty());
  }
}
