//! World generation pipeline.
//!
//! Stages run in a fixed order: height map, classification, palette, caves,
//! ores, then structures (trees, blueprints, chests). Only the last three
//! draw from the RNG stream, always in that order and row-major within a
//! stage, so a config always produces the same world.

use serde::{Deserialize, Serialize};
use strata_common::StrataResult;
use tracing::{debug, info};

use crate::caves::{carve_caves, CaveStats};
use crate::classify::{BiomeClassifier, BiomeMap};
use crate::config::WorldConfig;
use crate::grid::TileGrid;
use crate::heightmap::HeightMap;
use crate::layer::LayerTable;
use crate::noise::NoiseSource;
use crate::ores::{distribute_ores, OreStats};
use crate::palette::assign_palette;
use crate::rng::RngState;
use crate::structures::{
    hide_chests, place_structures, plant_trees, PlacedStructure, StructureBlueprint,
};
use crate::tile::Tile;

/// Noise channel used for palette detail.
const PALETTE_CHANNEL: u64 = 5;

/// Per-stage counters from one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Cave carving
    pub caves: CaveStats,
    /// Ore distribution
    pub ores: OreStats,
    /// Trees planted
    pub trees: usize,
    /// Blueprint structures placed
    pub blueprints: usize,
    /// Chests hidden
    pub chests: usize,
}

/// Output of a generation run.
#[derive(Debug, Clone)]
pub struct GeneratedWorld {
    /// Final tiles
    pub grid: TileGrid,
    /// Biome of every tile
    pub biome_map: BiomeMap,
    /// Surface row of every column
    pub heights: HeightMap,
    /// Every landmark placed, in placement order
    pub structures: Vec<PlacedStructure>,
    /// Stage counters
    pub stats: GenerationStats,
}

/// Drives the generation stages for one config.
#[derive(Debug, Clone)]
pub struct WorldGenerator {
    config: WorldConfig,
    layers: LayerTable,
    classifier: BiomeClassifier,
}

impl WorldGenerator {
    /// Validates the config and prepares a generator with the standard bands.
    pub fn new(config: WorldConfig) -> StrataResult<Self> {
        Self::with_layers(config, LayerTable::standard())
    }

    /// Validates the config against a custom band table.
    pub fn with_layers(config: WorldConfig, layers: LayerTable) -> StrataResult<Self> {
        config.validate_with(&layers)?;
        let classifier = BiomeClassifier::new(config.seed, layers.clone(), config.climate);
        Ok(Self {
            config,
            layers,
            classifier,
        })
    }

    /// Config in use.
    #[must_use]
    pub const fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Classifier in use; the runtime keeps using it after generation.
    #[must_use]
    pub const fn classifier(&self) -> &BiomeClassifier {
        &self.classifier
    }

    /// Runs every stage and returns the finished world.
    pub fn generate(&self) -> GeneratedWorld {
        let (width, height) = (self.config.width, self.config.height);
        info!(
            "Generating {}x{} world with seed {}",
            width, height, self.config.seed
        );

        let noise = NoiseSource::new(self.config.seed);
        let heights = HeightMap::synthesize(&noise, &self.layers, width, height);
        debug!(
            "Surface line spans rows {:?}..={:?}",
            heights.peak(),
            heights.trough()
        );

        let biome_map = self.classifier.classify_grid(width, height);
        let mut grid = TileGrid::new(width, height, Tile::Air);
        assign_palette(
            &mut grid,
            &biome_map,
            &heights,
            &self.layers,
            &noise.channel(PALETTE_CHANNEL),
        );

        let mut rng = RngState::new(self.config.seed);
        let mut stats = GenerationStats {
            caves: carve_caves(&mut grid, &self.config, &self.layers, &mut rng),
            ores: distribute_ores(&mut grid, &self.config.ore_rules, &self.layers, &mut rng),
            ..GenerationStats::default()
        };

        let mut structures = plant_trees(
            &mut grid,
            &heights,
            &biome_map,
            self.config.tree_count,
            &mut rng,
        );
        stats.trees = structures.len();

        let blueprints = place_structures(
            &mut grid,
            &biome_map,
            StructureBlueprint::catalog(),
            &mut rng,
        );
        stats.blueprints = blueprints.len();
        structures.extend(blueprints);

        let chests = hide_chests(&mut grid, &self.layers, self.config.chest_count, &mut rng);
        stats.chests = chests.len();
        structures.extend(chests);

        info!(
            "World generated: {} structures, {} ore veins, {} cave tiles",
            structures.len(),
            stats.ores.veins,
            stats.caves.tiles_cleared
        );

        GeneratedWorld {
            grid,
            biome_map,
            heights,
            structures,
            stats,
        }
    }
}

/// Validates `config` and generates its world.
pub fn generate_world(config: &WorldConfig) -> StrataResult<GeneratedWorld> {
    Ok(WorldGenerator::new(config.clone())?.generate())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{row_fraction, LayerId};
    use proptest::prelude::*;
    use strata_common::{ConfigError, StrataError};

    #[test]
    fn test_same_seed_same_world() {
        let config = WorldConfig::new(64, 32, 42);
        let a = generate_world(&config).expect("valid config");
        let b = generate_world(&config).expect("valid config");
        assert_eq!(a.grid.as_bytes(), b.grid.as_bytes());
        assert_eq!(a.structures, b.structures);
        assert_eq!(a.stats, b.stats);
    }

    #[test]
    fn test_different_seed_different_world() {
        let a = generate_world(&WorldConfig::new(96, 64, 1)).expect("valid");
        let b = generate_world(&WorldConfig::new(96, 64, 2)).expect("valid");
        assert_ne!(a.grid.as_bytes(), b.grid.as_bytes());
    }

    #[test]
    fn test_dimensions_and_closure() {
        let world = generate_world(&WorldConfig::new(80, 60, 7)).expect("valid");
        assert_eq!(world.grid.width(), 80);
        assert_eq!(world.grid.height(), 60);
        assert_eq!(world.grid.as_bytes().len(), 80 * 60);
        assert_eq!(world.grid.count(Tile::OutOfBounds), 0);
        assert_eq!(world.biome_map.width(), 80);
        assert_eq!(world.heights.rows().len(), 80);
    }

    #[test]
    fn test_bedrock_border_after_generation() {
        let config = WorldConfig {
            cave_count: 80,
            cave_radius: 5.0,
            ..WorldConfig::new(100, 80, 13)
        };
        let world = generate_world(&config).expect("valid");
        let underground = LayerTable::standard().row_start(LayerId::Underground, 80);
        for x in 0..100 {
            assert_eq!(world.grid.get(x, 79), Some(Tile::Bedrock));
        }
        for y in underground..80 {
            assert!(!world.grid.get(0, y).is_some_and(Tile::is_air));
            assert!(!world.grid.get(99, y).is_some_and(Tile::is_air));
        }
    }

    #[test]
    fn test_ore_depth_gating() {
        let config = WorldConfig::new(160, 120, 99);
        let world = generate_world(&config).expect("valid");
        for (x, y, tile) in world.grid.iter() {
            if tile.is_ore() {
                let depth = row_fraction(y, 120);
                assert!(
                    config
                        .ore_rules
                        .iter()
                        .any(|r| r.tile == tile && r.covers(depth)),
                    "{tile:?} at ({x}, {y})"
                );
            }
        }
        assert!(world.stats.ores.veins > 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = generate_world(&WorldConfig::new(0, 0, 1)).expect_err("zero size");
        assert!(matches!(
            err,
            StrataError::Config(ConfigError::ZeroDimensions { .. })
        ));
    }

    #[test]
    fn test_unbounded_cave_radius_rejected() {
        let config = WorldConfig {
            cave_radius: f64::INFINITY,
            ..WorldConfig::new(64, 32, 42)
        };
        let err = generate_world(&config).expect_err("infinite radius");
        assert!(matches!(err, StrataError::Config(ConfigError::InvalidCaves(_))));
    }

    #[test]
    fn test_edges_are_ocean_on_surface() {
        let world = generate_world(&WorldConfig::new(200, 100, 5)).expect("valid");
        // (0, 45): distance from centre = hypot(100, 5) / 200 > 0.4
        assert_eq!(
            world.biome_map.get(0, 45),
            Some(crate::biome::BiomeId::Ocean)
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn generation_is_deterministic(
            seed in any::<u64>(),
            width in 16usize..96,
            height in 40usize..96
        ) {
            let config = WorldConfig::new(width, height, seed);
            let a = generate_world(&config).expect("valid config");
            let b = generate_world(&config).expect("valid config");
            prop_assert_eq!(a.grid.as_bytes(), b.grid.as_bytes());
            prop_assert_eq!(a.structures, b.structures);
            prop_assert_eq!(a.biome_map, b.biome_map);
            prop_assert_eq!(a.stats, b.stats);
        }
    }
}
