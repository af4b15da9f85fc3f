//! # Strata Gameplay
//!
//! Runtime systems that operate on a generated world.
//!
//! This crate provides:
//! - Disc destruction for direct requests
//! - Per-kind natural disaster effects (clearing, water, lava, crystals)
//! - An append-only destruction log with channel subscribers
//! - Clamped biome and spawn-table queries
//! - Spawn rarity rolls and an explicit offspring builder
//! - Seasonal biome snapshots

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod destruction;
pub mod events;
pub mod runtime;
pub mod season;
pub mod spawn;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::destruction::{
        apply_disaster, clear_disc, ClearedTile, DestructionEvent, DestructionKind, DisasterEffect,
        DisasterOutcome, TerrainAccess,
    };
    pub use crate::events::{DestructionLog, DEFAULT_SUBSCRIBER_CAPACITY};
    pub use crate::runtime::{ms_to_ticks, TerrainRuntime, TICKS_PER_SECOND};
    pub use crate::season::{BiomeSnapshot, Season};
    pub use crate::spawn::{pick_from, roll_rarity, CreatureStats, SpawnDescriptor};
}

pub use prelude::*;
