//! Seasonal modifiers applied to biome properties.

use serde::{Deserialize, Serialize};
use strata_worldgen::{Biome, BiomeId};

/// Days per season.
pub const SEASON_LENGTH_DAYS: u64 = 30;

/// Season of the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Season {
    /// Spring
    #[default]
    Spring,
    /// Summer
    Summer,
    /// Autumn
    Autumn,
    /// Winter
    Winter,
}

impl Season {
    /// Season for a day counter, cycling every four seasons.
    #[must_use]
    pub const fn from_day(day: u64) -> Self {
        match (day / SEASON_LENGTH_DAYS) % 4 {
            0 => Self::Spring,
            1 => Self::Summer,
            2 => Self::Autumn,
            _ => Self::Winter,
        }
    }

    /// The season after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Spring => Self::Summer,
            Self::Summer => Self::Autumn,
            Self::Autumn => Self::Winter,
            Self::Winter => Self::Spring,
        }
    }

    /// Multiplier on fertility.
    #[must_use]
    pub const fn fertility_factor(self) -> f32 {
        match self {
            Self::Spring => 1.2,
            Self::Summer => 1.0,
            Self::Autumn => 0.8,
            Self::Winter => 0.5,
        }
    }

    /// Offset on temperature in °C.
    #[must_use]
    pub const fn temperature_offset(self) -> f32 {
        match self {
            Self::Spring => 0.0,
            Self::Summer => 5.0,
            Self::Autumn => -2.0,
            Self::Winter => -8.0,
        }
    }

    /// Creature activity level.
    #[must_use]
    pub const fn activity(self) -> f32 {
        match self {
            Self::Spring => 1.3,
            Self::Summer => 1.0,
            Self::Autumn => 1.1,
            Self::Winter => 0.7,
        }
    }
}

/// A biome's properties as they apply during one season.
///
/// Snapshots are derived values; the static catalog never changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiomeSnapshot {
    /// Biome
    pub biome: BiomeId,
    /// Season the snapshot was taken for
    pub season: Season,
    /// Seasonal temperature in °C
    pub temperature: f32,
    /// Seasonal fertility, clamped to 0..1
    pub fertility: f32,
    /// Humidity (not seasonal)
    pub humidity: f32,
    /// Creature activity level
    pub activity: f32,
}

impl BiomeSnapshot {
    /// Applies `season` to a catalog entry.
    #[must_use]
    pub fn for_season(biome: &Biome, season: Season) -> Self {
        Self {
            biome: biome.id,
            season,
            temperature: biome.temperature + season.temperature_offset(),
            fertility: (biome.fertility * season.fertility_factor()).clamp(0.0, 1.0),
            humidity: biome.humidity,
            activity: season.activity(),
        }
    }
}
