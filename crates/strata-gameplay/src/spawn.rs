//! Spawn selection from biome spawn tables.
//!
//! This subsystem only describes what should spawn; instantiating entities
//! is left to the caller.

use serde::{Deserialize, Serialize};
use strata_worldgen::{BiomeId, RngState, SpawnRarity, SpawnTable};

/// Roll thresholds, checked rarest first.
const LEGENDARY_CHANCE: f64 = 0.01;
const RARE_CHANCE: f64 = 0.05;
const UNCOMMON_CHANCE: f64 = 0.20;

/// Offspring keep this share of the parent's health and stats.
const OFFSPRING_HEALTH_FACTOR: f32 = 0.3;
const OFFSPRING_STAT_FACTOR: f32 = 0.4;
/// Offspring appear within this many pixels of the parent, either way.
const OFFSPRING_SCATTER: f64 = 10.0;

/// Draws a rarity tier: 1% legendary, 4% rare, 15% uncommon, else common.
pub fn roll_rarity(rng: &mut RngState) -> SpawnRarity {
    let roll = rng.next_f64();
    if roll < LEGENDARY_CHANCE {
        SpawnRarity::Legendary
    } else if roll < RARE_CHANCE {
        SpawnRarity::Rare
    } else if roll < UNCOMMON_CHANCE {
        SpawnRarity::Uncommon
    } else {
        SpawnRarity::Common
    }
}

/// Picks a kind from a tier, falling back to the common tier when the
/// requested one is empty. Returns the tier actually used.
pub fn pick_from(
    table: &SpawnTable,
    rarity: SpawnRarity,
    rng: &mut RngState,
) -> Option<(&'static str, SpawnRarity)> {
    let (entries, used) = if table.tier(rarity).is_empty() {
        (table.common, SpawnRarity::Common)
    } else {
        (table.tier(rarity), rarity)
    };
    if entries.is_empty() {
        return None;
    }
    Some((entries[rng.range_usize(0, entries.len())], used))
}

/// Base combat stats of a spawned creature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreatureStats {
    /// Movement speed
    pub speed: f32,
    /// Attack strength
    pub strength: f32,
    /// Stamina
    pub endurance: f32,
}

impl CreatureStats {
    fn scaled(self, factor: f32) -> Self {
        Self {
            speed: self.speed * factor,
            strength: self.strength * factor,
            endurance: self.endurance * factor,
        }
    }
}

/// Everything an entity spawner needs to instantiate one creature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpawnDescriptor {
    /// Creature kind, as listed in the spawn table
    pub kind: &'static str,
    /// Biome it spawned in
    pub biome: BiomeId,
    /// Tier it was drawn from
    pub rarity: SpawnRarity,
    /// Pixel X
    pub x: f64,
    /// Pixel Y
    pub y: f64,
    /// Body size multiplier
    pub size: f32,
    /// Current health
    pub health: f32,
    /// Maximum health
    pub max_health: f32,
    /// Whether it can reproduce
    pub mature: bool,
    /// Seconds until maturity
    pub maturity_age: f32,
    /// Stats
    pub stats: CreatureStats,
}

impl SpawnDescriptor {
    /// Rolls a spawn for `biome` at a pixel position.
    pub fn roll(biome: BiomeId, x: f64, y: f64, rng: &mut RngState) -> Option<Self> {
        let rarity = roll_rarity(rng);
        let (kind, rarity) = pick_from(biome.spawn_table(), rarity, rng)?;
        let tier_scale = match rarity {
            SpawnRarity::Common => 1.0,
            SpawnRarity::Uncommon => 1.5,
            SpawnRarity::Rare => 2.5,
            SpawnRarity::Legendary => 5.0,
        };
        let danger = f32::from(biome.info().danger_level);
        let max_health = 20.0 * tier_scale * (1.0 + danger * 0.25);
        Some(Self {
            kind,
            biome,
            rarity,
            x,
            y,
            size: 1.0,
            health: max_health,
            max_health,
            mature: true,
            maturity_age: 60.0 * tier_scale,
            stats: CreatureStats {
                speed: 3.0,
                strength: 2.0 * tier_scale,
                endurance: 5.0 * tier_scale,
            },
        })
    }

    /// Builds an immature offspring near this creature.
    ///
    /// Only identity fields (kind, biome, rarity) and the maturity clock are
    /// inherited; health, size and stats are derived from the parent's.
    pub fn offspring(&self, rng: &mut RngState) -> Self {
        let max_health = self.max_health * OFFSPRING_HEALTH_FACTOR;
        Self {
            kind: self.kind,
            biome: self.biome,
            rarity: self.rarity,
            x: self.x + rng.range_f64(-OFFSPRING_SCATTER, OFFSPRING_SCATTER),
            y: self.y + rng.range_f64(-OFFSPRING_SCATTER, OFFSPRING_SCATTER),
            size: self.size * 0.5,
            health: max_health,
            max_health,
            mature: false,
            maturity_age: self.maturity_age,
            stats: self.stats.scaled(OFFSPRING_STAT_FACTOR),
        }
    }
}
