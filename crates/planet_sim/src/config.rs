//! Configuration loading for the planet simulator.

use anyhow::{Context, Result};
use planet_plugin::PlanetConfig;
use std::path::Path;

/// Load and validate a planet configuration from a TOML file.
pub fn load(path: &Path) -> Result<PlanetConfig> {
	let content = std::fs::read_to_string(path)
		.with_context(|| format!("Failed to read config file: {}", path.display()))?;
	parse(&content).with_context(|| format!("Invalid config: {}", path.display()))
}

/// Parse and validate configuration text.
pub fn parse(content: &str) -> Result<PlanetConfig> {
	let config: PlanetConfig =
		toml::from_str(content).with_context(|| "Failed to parse config TOML")?;
	config.validate()?;
	Ok(config)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn sample_config_parses() {
		let config = parse(include_str!("../planet.toml")).unwrap();
		assert_eq!(config.planet.radius, 16_000.0);
		assert_eq!(config.planet.seed, Some(1337));
		assert_eq!(config.mesh.resolution, 64);
		assert!(config.mesh.water_enabled);
		assert_eq!(config.terrain.mountain_octaves, 5);
	}

	#[test]
	fn empty_config_uses_defaults() {
		let config = parse("").unwrap();
		assert_eq!(config, PlanetConfig::default());
	}

	#[test]
	fn partial_tables_keep_defaults() {
		let config = parse("[terrain]\nsea_level = 0.45\n").unwrap();
		assert_eq!(config.terrain.sea_level, 0.45);
		assert_eq!(config.terrain.shelf_depth, PlanetConfig::default().terrain.shelf_depth);
	}

	#[test]
	fn invalid_values_are_rejected() {
		let err = parse("[mesh]\nresolution = 1\n").unwrap_err();
		assert!(err.to_string().contains("resolution"));
		assert!(parse("[planet]\nradius = -5.0\n").is_err());
		assert!(parse("[lod]\nmin_leaf_size = \"big\"\n").is_err());
	}
}
