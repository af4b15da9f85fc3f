//! Engine configuration.
//!
//! Wraps the world description with driver options. Configuration can be
//! loaded from and saved to a TOML file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use strata_common::{StrataError, StrataResult};
use strata_worldgen::WorldConfig;
use tracing::{info, warn};

/// Configuration file name.
pub const CONFIG_FILE: &str = "strata.toml";

/// Engine configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Output Settings ===
    /// Write a JSON world summary here
    pub json_summary: Option<PathBuf>,
    /// Log the biome histogram after generation
    pub log_biomes: bool,

    // === Demo Settings ===
    /// Direct destructions to replay on the surface
    pub demo_destructions: usize,
    /// Radius of each direct destruction, in tiles
    pub demo_radius: f64,
    /// Trigger one of each natural disaster underground
    pub demo_disasters: bool,
    /// Disaster intensity multiplier
    pub disaster_intensity: f64,

    // === World Settings ===
    /// World to generate
    pub world: WorldConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            // Output
            json_summary: None,
            log_biomes: true,

            // Demo
            demo_destructions: 4,
            demo_radius: 4.0,
            demo_disasters: true,
            disaster_intensity: 1.0,

            // World
            world: WorldConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from the default file location.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from a specific path.
    ///
    /// Returns defaults if the file doesn't exist or can't be parsed. A
    /// parsed file is sanitized, and a world section that fails validation
    /// is replaced by the default world while driver options are kept.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file {} not found, using defaults", path.display());
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read config file: {e}");
                return Self::default();
            },
        };

        let mut config: Self = match toml::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to parse config file: {e}");
                return Self::default();
            },
        };

        config.sanitize();
        if let Err(e) = config.world.validate() {
            warn!("Rejected world in {}: {e}", path.display());
            config.world = WorldConfig::default();
        }
        info!("Loaded config from {}", path.display());
        config
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> StrataResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| StrataError::Serialization(e.to_string()))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Clamp driver options to sensible ranges. World parameters are
    /// checked by the generator instead.
    pub fn sanitize(&mut self) {
        if !self.demo_radius.is_finite() {
            self.demo_radius = 4.0;
        }
        self.demo_radius = self.demo_radius.clamp(0.0, 64.0);
        if !self.disaster_intensity.is_finite() {
            self.disaster_intensity = 1.0;
        }
        self.disaster_intensity = self.disaster_intensity.clamp(0.0, 10.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = EngineConfig::load_from(dir.path().join("absent.toml"));
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let mut config = EngineConfig::default();
        config.world.seed = 777;
        config.world.width = 300;
        config.demo_disasters = false;
        config.json_summary = Some(PathBuf::from("out/summary.json"));
        config.save_to(&path).expect("save");

        let loaded = EngineConfig::load_from(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        let text = "log_biomes = false\n\n[world]\nseed = 99\nheight = 128\n";
        fs::write(&path, text).expect("write");

        let config = EngineConfig::load_from(&path);
        assert!(!config.log_biomes);
        assert_eq!(config.world.seed, 99);
        assert_eq!(config.world.height, 128);
        assert_eq!(config.world.width, WorldConfig::default().width);
        assert_eq!(config.world.ore_rules, WorldConfig::default().ore_rules);
    }

    #[test]
    fn test_invalid_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "world = [not toml").expect("write");
        assert_eq!(EngineConfig::load_from(&path), EngineConfig::default());
    }

    #[test]
    fn test_invalid_world_falls_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        let text = "demo_destructions = 9\ndemo_radius = 900.0\n\n[world]\nwidth = 0\nseed = 5\n";
        fs::write(&path, text).expect("write");

        let config = EngineConfig::load_from(&path);
        assert_eq!(config.world, WorldConfig::default());
        assert_eq!(config.demo_destructions, 9);
        assert!((config.demo_radius - 64.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sanitize() {
        let mut config = EngineConfig {
            demo_radius: f64::NAN,
            disaster_intensity: 500.0,
            ..EngineConfig::default()
        };
        config.sanitize();
        assert!((config.demo_radius - 4.0).abs() < f64::EPSILON);
        assert!((config.disaster_intensity - 10.0).abs() < f64::EPSILON);
    }
}
