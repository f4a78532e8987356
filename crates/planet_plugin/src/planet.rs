//! Planet - one terrain body with its field, quadtree settings and transform.
//!
//! Several planets can exist side by side (a world and its moons); each gets
//! its own `ChunkManager`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use glam::{DAffine3, DQuat, DVec3};

use crate::field::{TerrainField, TerrainParams};
use crate::quadtree::QuadtreeConfig;

// =============================================================================
// PlanetId - unique identifier
// =============================================================================

/// Atomic counter for generating unique PlanetIds.
static PLANET_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Opaque planet identifier.
///
/// Generated atomically - guaranteed unique within process lifetime.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct PlanetId(u64);

impl PlanetId {
    /// Generate a new unique PlanetId.
    pub fn new() -> Self {
        Self(PLANET_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for PlanetId {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Planet - per-body state container
// =============================================================================

/// Per-planet state: quadtree settings, shared field and placement.
///
/// # Transform
///
/// `transform` places the planet in the world. It is expected to be rigid
/// (rotation + translation); patch transforms carry only position and
/// rotation.
/// - `viewer_to_local`: world position into planet space
/// - `local_to_world`: planet-space position into world space
#[derive(Clone, Debug)]
pub struct Planet {
    pub id: PlanetId,

    /// Quadtree subdivision settings. `config.radius` is the planet radius.
    pub config: QuadtreeConfig,

    /// Procedural field, shared read-only with build workers.
    pub field: Arc<TerrainField>,

    /// Planet-space to world-space transform.
    pub transform: DAffine3,
}

impl Planet {
    /// Create a planet at the origin.
    pub fn new(config: QuadtreeConfig, params: TerrainParams) -> Self {
        let field = Arc::new(TerrainField::new(params, config.radius));
        Self {
            id: PlanetId::new(),
            config,
            field,
            transform: DAffine3::IDENTITY,
        }
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.config.radius
    }

    /// Set the planet transform.
    pub fn set_transform(&mut self, transform: DAffine3) {
        self.transform = transform;
    }

    /// Rotation part of the planet transform.
    pub fn rotation(&self) -> DQuat {
        let (_, rotation, _) = self.transform.to_scale_rotation_translation();
        rotation
    }

    /// Convert a world position to planet space.
    #[inline]
    pub fn viewer_to_local(&self, global_pos: DVec3) -> DVec3 {
        self.transform.inverse().transform_point3(global_pos)
    }

    /// Convert a planet-space position to world space.
    #[inline]
    pub fn local_to_world(&self, local_pos: DVec3) -> DVec3 {
        self.transform.transform_point3(local_pos)
    }

    /// Camera altitude above the base sphere (negative below it).
    pub fn altitude(&self, global_pos: DVec3) -> f64 {
        self.viewer_to_local(global_pos).length() - self.radius()
    }
}
