//! Machine-readable report of a generation run.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use strata_common::{StrataError, StrataResult};
use strata_gameplay::DestructionEvent;
use strata_worldgen::{BiomeId, GeneratedWorld, GenerationStats, PlacedStructure};
use tracing::info;

/// Summary written by `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct WorldSummary {
    /// World seed
    pub seed: u64,
    /// Width in tiles
    pub width: usize,
    /// Height in tiles
    pub height: usize,
    /// Highest and lowest surface rows
    pub surface_span: Option<(usize, usize)>,
    /// Tiles per biome, by display name
    pub biomes: BTreeMap<&'static str, usize>,
    /// Tile counts for everything present, by debug name
    pub tiles: BTreeMap<String, usize>,
    /// Stage counters
    pub stats: GenerationStats,
    /// Placed landmarks
    pub structures: Vec<PlacedStructure>,
    /// Destruction replayed after generation
    pub destructions: Vec<DestructionEvent>,
}

impl WorldSummary {
    /// Builds a summary of the world as it stands now.
    #[must_use]
    pub fn collect(seed: u64, world: &GeneratedWorld, destructions: &[DestructionEvent]) -> Self {
        let biomes = BiomeId::ALL
            .iter()
            .zip(world.biome_map.histogram())
            .filter(|(_, count)| *count > 0)
            .map(|(id, count)| (id.display_name(), count))
            .collect();

        let mut tiles = BTreeMap::new();
        for (_, _, tile) in world.grid.iter() {
            *tiles.entry(format!("{tile:?}")).or_insert(0) += 1;
        }

        let surface_span = world.heights.peak().zip(world.heights.trough());

        Self {
            seed,
            width: world.grid.width(),
            height: world.grid.height(),
            surface_span,
            biomes,
            tiles,
            stats: world.stats.clone(),
            structures: world.structures.clone(),
            destructions: destructions.to_vec(),
        }
    }

    /// Writes the summary as pretty JSON.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> StrataResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| StrataError::Serialization(e.to_string()))?;
        fs::write(path, json)?;
        info!("Wrote world summary to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_worldgen::{generate_world, WorldConfig};

    #[test]
    fn test_counts_cover_grid() {
        let config = WorldConfig::new(64, 48, 5);
        let world = generate_world(&config).expect("valid config");
        let summary = WorldSummary::collect(config.seed, &world, &[]);

        assert_eq!(summary.tiles.values().sum::<usize>(), 64 * 48);
        assert_eq!(summary.biomes.values().sum::<usize>(), 64 * 48);
        assert!(!summary.tiles.contains_key("OutOfBounds"));
        assert!(summary.tiles.get("Bedrock").is_some_and(|&n| n >= 64));
    }

    #[test]
    fn test_write_json() {
        let config = WorldConfig::new(64, 48, 11);
        let world = generate_world(&config).expect("valid config");
        let summary = WorldSummary::collect(config.seed, &world, &[]);

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out").join("summary.json");
        summary.write_to(&path).expect("write");

        let text = fs::read_to_string(&path).expect("read back");
        let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");
        assert_eq!(value["seed"], 11);
        assert_eq!(value["width"], 64);
        assert!(value["destructions"].as_array().is_some_and(Vec::is_empty));
    }

    #[test]
    fn test_write_into_file_fails_with_io() {
        let config = WorldConfig::new(64, 48, 1);
        let world = generate_world(&config).expect("valid config");
        let summary = WorldSummary::collect(config.seed, &world, &[]);

        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").expect("write");
        let err = summary.write_to(blocker.join("summary.json"));
        assert!(matches!(err, Err(StrataError::Io(_))));
    }
}
