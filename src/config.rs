//! World configuration.
//!
//! A small JSON-backed settings file controls the seed, streaming radius and
//! worker-pool size. Missing or malformed files fall back to defaults with a
//! logged warning so a bad config never takes the engine down.

use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The file was read but is not valid JSON for [`WorldConfig`].
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Settings for one world instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Seed for deterministic terrain generation.
    pub seed: u32,
    /// Chunks are kept loaded within this Chebyshev radius of the center.
    pub load_radius: i32,
    /// Number of background worker threads for generation and meshing.
    pub worker_threads: usize,
    /// Cells per edge of the texture atlas the meshers target.
    pub atlas_cells: u32,
    /// Use the greedy mesher instead of the per-face baseline.
    pub greedy_meshing: bool,
    /// How many evicted chunks to keep around for cheap reloading.
    pub evicted_cache_size: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            seed: 0,
            load_radius: 8,
            worker_threads: 4,
            atlas_cells: 16,
            greedy_meshing: false,
            evicted_cache_size: 64,
        }
    }
}

impl WorldConfig {
    /// Strictly loads a configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Loads a configuration, falling back to defaults when the file is
    /// missing or malformed. The fallback is logged, never fatal.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(config) => {
                info!("loaded config from {}", path.display());
                config
            }
            Err(error) => {
                warn!(
                    "using default config, could not load {}: {}",
                    path.display(),
                    error
                );
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: WorldConfig = serde_json::from_str(r#"{ "seed": 1234 }"#).unwrap();
        assert_eq!(config.seed, 1234);
        assert_eq!(config.load_radius, WorldConfig::default().load_radius);
    }

    #[test]
    fn round_trips_through_json() {
        let config = WorldConfig {
            seed: 7,
            load_radius: 3,
            worker_threads: 2,
            atlas_cells: 8,
            greedy_meshing: true,
            evicted_cache_size: 16,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<WorldConfig>(&json).unwrap(), config);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = WorldConfig::load_or_default(Path::new("/definitely/not/here.json"));
        assert_eq!(config, WorldConfig::default());
    }
}
