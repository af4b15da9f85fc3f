//! # Strata Worldgen
//!
//! Deterministic, seed-driven generation of layered 2D tile worlds.
//!
//! This crate provides:
//! - Seeded RNG stream and gradient noise
//! - Tile kinds and the fixed-size tile grid
//! - The vertical layer table and surface height map
//! - The biome catalog and rule-list classifier
//! - Palette assignment, cave carving, ore veins and landmark placement
//! - The [`generate_world`] entry point tying the stages together

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod biome;
pub mod caves;
pub mod classify;
pub mod config;
pub mod generator;
pub mod grid;
pub mod heightmap;
pub mod layer;
pub mod noise;
pub mod ores;
pub mod palette;
pub mod rng;
pub mod structures;
pub mod tile;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::biome::{spawn_table_for, Biome, BiomeId, SpawnRarity, SpawnTable, TreeStyle};
    pub use crate::classify::{BiomeClassifier, BiomeMap, ClassifierInput};
    pub use crate::config::{ClimateParams, OreVeinRule, WorldConfig};
    pub use crate::generator::{generate_world, GeneratedWorld, GenerationStats, WorldGenerator};
    pub use crate::grid::TileGrid;
    pub use crate::heightmap::HeightMap;
    pub use crate::layer::{Layer, LayerId, LayerTable};
    pub use crate::noise::NoiseSource;
    pub use crate::rng::RngState;
    pub use crate::structures::{PlacedStructure, StructureBlueprint, StructureKind};
    pub use crate::tile::Tile;
}

pub use prelude::*;
