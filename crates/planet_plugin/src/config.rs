//! Planet configuration: everything needed to stand up a `ChunkManager`.
//!
//! Deserializes from the layout hosts keep on disk:
//!
//! ```toml
//! [planet]
//! radius = 16000.0
//! seed = 7
//!
//! [lod]
//! min_leaf_size = 128.0
//!
//! [mesh]
//! resolution = 64
//!
//! [terrain]
//! sea_level = 0.48
//! ```
//!
//! Every field has a default, so any table or key may be omitted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chunk::{ChunkManager, ManagerConfig};
use crate::constants::{MAX_RESOLUTION, MIN_RESOLUTION};
use crate::field::TerrainParams;
use crate::planet::Planet;
use crate::quadtree::{LeafBudget, QuadtreeConfig};

/// Rejected configuration value.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
  #[error("planet radius must be finite and positive, got {0}")]
  InvalidRadius(f64),

  #[error("patch resolution {0} is below the minimum of {min}", min = MIN_RESOLUTION)]
  ResolutionTooLow(u32),

  #[error("patch resolution {0} exceeds the maximum of {max}", max = MAX_RESOLUTION)]
  ResolutionTooHigh(u32),

  #[error("min leaf size must be finite and positive, got {0}")]
  InvalidMinLeafSize(f64),

  #[error("split distance factor must be finite and positive, got {0}")]
  InvalidSplitFactor(f64),
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlanetSettings {
  /// Base sphere radius in meters.
  pub radius: f64,
  /// Overrides `terrain.seed` when set.
  pub seed: Option<u32>,
}

impl Default for PlanetSettings {
  fn default() -> Self {
    Self {
      radius: 16_000.0,
      seed: None,
    }
  }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LodSettings {
  pub min_leaf_size: f64,
  pub split_distance_factor: f64,
  pub budget_per_frame: usize,
  pub enable_culling: bool,
}

impl Default for LodSettings {
  fn default() -> Self {
    let quadtree = QuadtreeConfig::default();
    Self {
      min_leaf_size: quadtree.min_leaf_size,
      split_distance_factor: quadtree.split_distance_factor,
      budget_per_frame: LeafBudget::DEFAULT_PER_FRAME,
      enable_culling: quadtree.enable_culling,
    }
  }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MeshSettings {
  pub resolution: u32,
  pub water_enabled: bool,
  pub max_patches: Option<usize>,
}

impl Default for MeshSettings {
  fn default() -> Self {
    let manager = ManagerConfig::default();
    Self {
      resolution: manager.resolution,
      water_enabled: manager.water_enabled,
      max_patches: manager.max_patches,
    }
  }
}

/// Root configuration for one planet.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlanetConfig {
  pub planet: PlanetSettings,
  pub lod: LodSettings,
  pub mesh: MeshSettings,
  pub terrain: TerrainParams,
}

impl PlanetConfig {
  /// Check the values a manager cannot recover from.
  ///
  /// Terrain parameters are not checked here; the field sanitizes them.
  pub fn validate(&self) -> Result<(), ConfigError> {
    let radius = self.planet.radius;
    if !radius.is_finite() || radius <= 0.0 {
      return Err(ConfigError::InvalidRadius(radius));
    }
    let resolution = self.mesh.resolution;
    if resolution < MIN_RESOLUTION {
      return Err(ConfigError::ResolutionTooLow(resolution));
    }
    if resolution > MAX_RESOLUTION {
      return Err(ConfigError::ResolutionTooHigh(resolution));
    }
    let min_leaf = self.lod.min_leaf_size;
    if !min_leaf.is_finite() || min_leaf <= 0.0 {
      return Err(ConfigError::InvalidMinLeafSize(min_leaf));
    }
    let factor = self.lod.split_distance_factor;
    if !factor.is_finite() || factor <= 0.0 {
      return Err(ConfigError::InvalidSplitFactor(factor));
    }
    Ok(())
  }

  pub fn quadtree_config(&self) -> QuadtreeConfig {
    QuadtreeConfig {
      radius: self.planet.radius,
      min_leaf_size: self.lod.min_leaf_size,
      split_distance_factor: self.lod.split_distance_factor,
      enable_culling: self.lod.enable_culling,
    }
  }

  pub fn manager_config(&self) -> ManagerConfig {
    ManagerConfig {
      resolution: self.mesh.resolution,
      water_enabled: self.mesh.water_enabled,
      max_patches: self.mesh.max_patches,
      budget_per_frame: self.lod.budget_per_frame,
    }
  }

  /// Terrain parameters with the planet seed applied.
  pub fn terrain_params(&self) -> TerrainParams {
    let mut params = self.terrain.clone();
    if let Some(seed) = self.planet.seed {
      params.seed = seed;
    }
    params
  }

  /// Validate and build a ready-to-step manager.
  pub fn build_manager(&self) -> Result<ChunkManager, ConfigError> {
    self.validate()?;
    let planet = Planet::new(self.quadtree_config(), self.terrain_params());
    Ok(ChunkManager::new(planet, self.manager_config()))
  }
}
