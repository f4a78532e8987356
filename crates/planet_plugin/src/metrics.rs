//! Engine-agnostic metrics collection for planet LOD statistics.
//!
//! Feature-gated and runtime-toggled to ensure zero overhead when disabled.
//!
//! # Usage
//!
//! ```ignore
//! use planet_plugin::metrics::COLLECT_METRICS;
//!
//! // Compile with --features metrics
//! // Runtime toggle:
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! // The chunk manager records into its own PlanetMetrics every step:
//! let metrics = manager.metrics();
//! println!("avg build {:.1} us", metrics.avg_build_timing_us());
//! ```

use std::collections::VecDeque;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;
use std::sync::atomic::AtomicBool;

use crate::quadtree::QuadNode;

/// Number of depth buckets tracked; deeper leaves land in the last one.
pub const DEPTH_BUCKETS: usize = 32;

/// Runtime toggle for metrics collection.
/// Set to false to disable metrics gathering at runtime.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// Check if metrics collection is enabled (both compile-time and runtime).
#[inline]
pub fn is_enabled() -> bool {
    #[cfg(feature = "metrics")]
    {
        COLLECT_METRICS.load(Ordering::Relaxed)
    }
    #[cfg(not(feature = "metrics"))]
    {
        false
    }
}

/// Rolling window for storing recent values (e.g., timing history).
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    buffer: VecDeque<T>,
    capacity: usize,
}

impl<T> RollingWindow<T> {
    /// Create a new rolling window with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Push a new value, evicting the oldest if at capacity.
    pub fn push(&mut self, value: T) {
        if self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Iterate over values (oldest to newest).
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buffer.iter()
    }

    /// Most recent value.
    pub fn last(&self) -> Option<&T> {
        self.buffer.back()
    }
}

impl<T: Copy + Default + std::ops::Add<Output = T>> RollingWindow<T> {
    pub fn sum(&self) -> T {
        self.buffer.iter().copied().fold(T::default(), |acc, x| acc + x)
    }
}

impl RollingWindow<u64> {
    pub fn average(&self) -> f64 {
        if self.buffer.is_empty() {
            0.0
        } else {
            self.sum() as f64 / self.buffer.len() as f64
        }
    }

    /// Smallest and largest value in the window.
    pub fn min_max(&self) -> Option<(u64, u64)> {
        let mut iter = self.buffer.iter().copied();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), x| (lo.min(x), hi.max(x))))
    }
}

impl Default for RollingWindow<u64> {
    fn default() -> Self {
        Self::new(128) // ~2 seconds at 60fps
    }
}

/// Planet-level statistics updated every manager step.
#[derive(Debug, Clone)]
pub struct PlanetMetrics {
    // LOD distribution
    /// Active leaves per quadtree depth (index = depth).
    pub leaves_per_depth: [u32; DEPTH_BUCKETS],

    // Patch lifecycle
    /// Nodes with resident patches.
    pub resident_nodes: u32,
    /// Terrain patches waiting in the pool.
    pub pooled_terrain: u32,
    /// Water patches waiting in the pool.
    pub pooled_water: u32,
    /// Patches that exist and are not disposed.
    pub live_patches: u32,
    /// Activations deferred by the patch cap, cumulative.
    pub total_deferred: u64,
    /// Patch builds completed this session.
    pub total_patches_built: u64,

    // Timing
    /// Rolling window of per-frame traversal times in microseconds.
    pub traversal_timings: RollingWindow<u64>,
    /// Rolling window of per-patch build times in microseconds.
    pub build_timings: RollingWindow<u64>,
    /// Rolling window of whole-step times in microseconds.
    pub step_timings: RollingWindow<u64>,

    /// Frames stepped so far.
    pub frames: u64,
}

impl Default for PlanetMetrics {
    fn default() -> Self {
        Self {
            leaves_per_depth: [0; DEPTH_BUCKETS],
            resident_nodes: 0,
            pooled_terrain: 0,
            pooled_water: 0,
            live_patches: 0,
            total_deferred: 0,
            total_patches_built: 0,
            traversal_timings: RollingWindow::default(),
            build_timings: RollingWindow::default(),
            step_timings: RollingWindow::default(),
            frames: 0,
        }
    }
}

impl PlanetMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset everything except cumulative counters.
    pub fn reset(&mut self) {
        self.leaves_per_depth.fill(0);
        self.resident_nodes = 0;
        self.pooled_terrain = 0;
        self.pooled_water = 0;
        self.live_patches = 0;
        self.traversal_timings.clear();
        self.build_timings.clear();
        self.step_timings.clear();
    }

    pub fn record_traversal_timing(&mut self, timing_us: u64) {
        if is_enabled() {
            self.traversal_timings.push(timing_us);
        }
    }

    pub fn record_build_timing(&mut self, timing_us: u64) {
        if is_enabled() {
            self.build_timings.push(timing_us);
            self.total_patches_built += 1;
        }
    }

    /// Record a finished step. Counts frames even when collection is off.
    pub fn record_step(&mut self, timing_us: u64, deferred: usize) {
        self.frames += 1;
        if is_enabled() {
            self.step_timings.push(timing_us);
            self.total_deferred += deferred as u64;
        }
    }

    /// Rebuild the depth histogram from the active leaf set.
    pub fn update_leaves<'a>(&mut self, leaves: impl IntoIterator<Item = &'a QuadNode>) {
        if !is_enabled() {
            return;
        }
        self.leaves_per_depth.fill(0);
        for node in leaves {
            let bucket = (node.depth.max(0) as usize).min(DEPTH_BUCKETS - 1);
            self.leaves_per_depth[bucket] += 1;
        }
    }

    /// Snapshot patch residency.
    pub fn record_patches(&mut self, resident: usize, pooled_terrain: usize, pooled_water: usize, live: usize) {
        if !is_enabled() {
            return;
        }
        self.resident_nodes = resident as u32;
        self.pooled_terrain = pooled_terrain as u32;
        self.pooled_water = pooled_water as u32;
        self.live_patches = live as u32;
    }

    pub fn total_leaves(&self) -> u32 {
        self.leaves_per_depth.iter().sum()
    }

    /// Deepest depth with at least one active leaf.
    pub fn deepest_level(&self) -> Option<usize> {
        self.leaves_per_depth.iter().rposition(|&count| count > 0)
    }

    pub fn avg_build_timing_us(&self) -> f64 {
        self.build_timings.average()
    }

    pub fn avg_traversal_timing_us(&self) -> f64 {
        self.traversal_timings.average()
    }

    pub fn avg_step_timing_us(&self) -> f64 {
        self.step_timings.average()
    }
}
