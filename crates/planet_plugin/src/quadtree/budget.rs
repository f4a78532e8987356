//! Per-frame activation budget for quadtree traversal.
//!
//! Prevents frame spikes by limiting how many newly activated leaves one
//! face may request per frame. The budget gates splitting; leaves are always
//! emitted so the face stays covered.

/// Remaining activations for one face this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LeafBudget {
	remaining: usize,
}

impl LeafBudget {
	/// Default per-frame activations per face.
	pub const DEFAULT_PER_FRAME: usize = 32;

	pub fn new(per_frame: usize) -> Self {
		Self {
			remaining: per_frame,
		}
	}

	/// Effectively unlimited budget for tests and warm-up frames.
	pub fn unlimited() -> Self {
		Self::new(usize::MAX)
	}

	#[inline]
	pub fn remaining(&self) -> usize {
		self.remaining
	}

	#[inline]
	pub fn is_exhausted(&self) -> bool {
		self.remaining == 0
	}

	/// Consume one activation. Returns false when nothing was left.
	#[inline]
	pub fn try_charge(&mut self) -> bool {
		if self.remaining == 0 {
			return false;
		}
		self.remaining -= 1;
		true
	}
}

impl Default for LeafBudget {
	fn default() -> Self {
		Self::new(Self::DEFAULT_PER_FRAME)
	}
}

/// Statistics from one traversal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TraversalStats {
	/// Nodes whose bounds were computed.
	pub visited: usize,
	/// Nodes pruned by the frustum test; their subtrees are never visited.
	pub culled: usize,
	/// Leaves written to the output.
	pub emitted: usize,
	/// New leaves that consumed budget.
	pub charged: usize,
	/// New leaves emitted after the budget ran out.
	/// Tracked separately - emission never waits on budget.
	pub forced: usize,
}

impl TraversalStats {
	/// Leaves that were not active in the previous frame.
	#[inline]
	pub fn new_leaves(&self) -> usize {
		self.charged + self.forced
	}

	/// Accumulate another face's statistics.
	pub fn merge(&mut self, other: &TraversalStats) {
		self.visited += other.visited;
		self.culled += other.culled;
		self.emitted += other.emitted;
		self.charged += other.charged;
		self.forced += other.forced;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_budget() {
		let budget = LeafBudget::default();
		assert_eq!(budget.remaining(), 32);
		assert!(!budget.is_exhausted());
	}

	#[test]
	fn test_charge_until_exhausted() {
		let mut budget = LeafBudget::new(2);
		assert!(budget.try_charge());
		assert!(budget.try_charge());
		assert!(budget.is_exhausted());
		assert!(!budget.try_charge());
		assert_eq!(budget.remaining(), 0);
	}

	#[test]
	fn test_zero_budget_is_exhausted() {
		assert!(LeafBudget::new(0).is_exhausted());
	}

	#[test]
	fn test_stats_merge() {
		let mut total = TraversalStats {
			visited: 10,
			culled: 2,
			emitted: 4,
			charged: 3,
			forced: 1,
		};
		total.merge(&TraversalStats {
			visited: 5,
			culled: 1,
			emitted: 3,
			charged: 0,
			forced: 2,
		});
		assert_eq!(total.visited, 15);
		assert_eq!(total.emitted, 7);
		assert_eq!(total.new_leaves(), 6);
	}
}
