//! World generation parameters.

use serde::{Deserialize, Serialize};
use strata_common::{ConfigError, ConfigResult};

use crate::biome::biomes_in_layer;
use crate::layer::LayerTable;
use crate::tile::Tile;

/// Largest world accepted by validation, in tiles (4096 x 4096).
pub const MAX_WORLD_TILES: usize = 1 << 24;

/// One entry of the ore vein table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OreVeinRule {
    /// Ore tile placed by this rule
    pub tile: Tile,
    /// Chance per eligible rock tile of seeding a vein
    pub rarity: f64,
    /// Shallowest depth fraction (inclusive)
    pub min_depth_fraction: f64,
    /// Deepest depth fraction (inclusive)
    pub max_depth_fraction: f64,
}

impl OreVeinRule {
    /// Creates a rule.
    #[must_use]
    pub const fn new(
        tile: Tile,
        rarity: f64,
        min_depth_fraction: f64,
        max_depth_fraction: f64,
    ) -> Self {
        Self {
            tile,
            rarity,
            min_depth_fraction,
            max_depth_fraction,
        }
    }

    /// Check if a depth fraction lies inside this rule's range.
    #[must_use]
    pub fn covers(&self, depth_fraction: f64) -> bool {
        depth_fraction >= self.min_depth_fraction && depth_fraction <= self.max_depth_fraction
    }

    /// The default vein table, shallow and common first.
    #[must_use]
    pub fn default_table() -> Vec<Self> {
        vec![
            Self::new(Tile::Coal, 0.02, 0.55, 0.80),
            Self::new(Tile::Copper, 0.012, 0.55, 0.75),
            Self::new(Tile::Iron, 0.01, 0.58, 0.85),
            Self::new(Tile::Silver, 0.006, 0.62, 0.85),
            Self::new(Tile::Gold, 0.005, 0.65, 0.90),
            Self::new(Tile::Lapis, 0.004, 0.65, 0.88),
            Self::new(Tile::Sapphire, 0.002, 0.72, 0.90),
            Self::new(Tile::Emerald, 0.002, 0.72, 0.90),
            Self::new(Tile::Ruby, 0.002, 0.75, 0.95),
            Self::new(Tile::Diamond, 0.0015, 0.78, 0.95),
        ]
    }

    fn validate(&self) -> ConfigResult<()> {
        let fail = |reason: &str| ConfigError::InvalidOreRule {
            tile: format!("{:?}", self.tile),
            reason: reason.to_string(),
        };
        if !self.tile.is_ore() {
            return Err(fail("tile is not an ore"));
        }
        if !(0.0..=1.0).contains(&self.rarity) {
            return Err(fail("rarity must be within [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.min_depth_fraction)
            || !(0.0..=1.0).contains(&self.max_depth_fraction)
            || self.min_depth_fraction > self.max_depth_fraction
        {
            return Err(fail("depth range must be an ordered sub-range of [0, 1]"));
        }
        Ok(())
    }
}

/// Thresholds steering surface classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimateParams {
    /// Frequency of the temperature and humidity channels; the structure
    /// channel runs at half of it
    pub climate_scale: f64,
    /// Normalised distance from centre beyond which surface tiles are ocean
    pub edge_threshold: f64,
    /// Altitude above which surface tiles may become mountain
    pub mountain_threshold: f64,
}

impl ClimateParams {
    fn validate(&self) -> ConfigResult<()> {
        let fields = [
            ("climate_scale", self.climate_scale),
            ("edge_threshold", self.edge_threshold),
            ("mountain_threshold", self.mountain_threshold),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::InvalidClimate(format!("{name} is {value}")));
            }
        }
        if self.climate_scale < 0.0 {
            return Err(ConfigError::InvalidClimate("climate_scale is negative".into()));
        }
        Ok(())
    }
}

impl Default for ClimateParams {
    fn default() -> Self {
        Self {
            climate_scale: 0.002,
            edge_threshold: 0.4,
            mountain_threshold: 0.8,
        }
    }
}

/// Immutable description of a world to generate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    // === Dimensions ===
    /// Width in tiles
    pub width: usize,
    /// Height in tiles
    pub height: usize,
    /// Pixels per tile
    pub tile_size: u32,
    /// World seed
    pub seed: u64,

    // === Densities ===
    /// Surface tree attempts
    pub tree_count: usize,
    /// Chests hidden in caves
    pub chest_count: usize,
    /// Cave random walks
    pub cave_count: usize,

    // === Caves ===
    /// Shortest walk, in steps
    pub cave_length_min: usize,
    /// Longest walk, in steps
    pub cave_length_max: usize,
    /// Disc radius at the start of a walk
    pub cave_radius: f64,
    /// Untouchable border width around the carve region
    pub cave_margin: usize,

    // === Climate ===
    /// Classification thresholds
    pub climate: ClimateParams,

    // === Ores ===
    /// Vein table, evaluated in order; a later firing rule wins
    pub ore_rules: Vec<OreVeinRule>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 256,
            tile_size: 16,
            seed: 12345,

            tree_count: 48,
            chest_count: 12,
            cave_count: 24,

            cave_length_min: 40,
            cave_length_max: 120,
            cave_radius: 2.5,
            cave_margin: 2,

            climate: ClimateParams::default(),

            ore_rules: OreVeinRule::default_table(),
        }
    }
}

impl WorldConfig {
    /// Config with the given size and seed, defaults elsewhere.
    #[must_use]
    pub fn new(width: usize, height: usize, seed: u64) -> Self {
        Self {
            width,
            height,
            seed,
            ..Self::default()
        }
    }

    /// Checks the config against the standard layer table.
    pub fn validate(&self) -> ConfigResult<()> {
        self.validate_with(&LayerTable::standard())
    }

    /// Checks the config against a layer table. Runs before any allocation.
    pub fn validate_with(&self, layers: &LayerTable) -> ConfigResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroDimensions {
                width: self.width,
                height: self.height,
            });
        }
        let area = self
            .width
            .checked_mul(self.height)
            .filter(|&area| area <= MAX_WORLD_TILES)
            .ok_or(ConfigError::TooLarge {
                width: self.width,
                height: self.height,
                max: MAX_WORLD_TILES,
            })?;
        if self.tile_size == 0 {
            return Err(ConfigError::ZeroTileSize);
        }
        layers.check_resolution(self.height)?;
        self.climate.validate()?;

        for layer in layers.layers() {
            if biomes_in_layer(layer.id).next().is_none() {
                return Err(ConfigError::InvalidBiomes(format!(
                    "no biome for the {} band",
                    layer.id.display_name()
                )));
            }
        }

        for rule in &self.ore_rules {
            rule.validate()?;
        }

        let counts = [
            ("tree", self.tree_count),
            ("chest", self.chest_count),
            ("cave", self.cave_count),
            ("cave length", self.cave_length_max),
        ];
        for (name, count) in counts {
            if count > area {
                return Err(ConfigError::TooMany {
                    name,
                    count,
                    max: area,
                });
            }
        }
        if self.cave_length_min > self.cave_length_max {
            return Err(ConfigError::InvalidCaves(format!(
                "length range {}..={} is inverted",
                self.cave_length_min, self.cave_length_max
            )));
        }
        if !self.cave_radius.is_finite() || self.cave_radius <= 0.0 {
            return Err(ConfigError::InvalidCaves("radius must be positive".into()));
        }
        let max_radius = self.width.min(self.height) as f64 / 2.0;
        if self.cave_radius > max_radius {
            return Err(ConfigError::InvalidCaves(format!(
                "radius {} exceeds half the smaller dimension ({max_radius})",
                self.cave_radius
            )));
        }
        if self.cave_margin == 0 {
            return Err(ConfigError::InvalidCaves("margin must be at least 1".into()));
        }
        Ok(())
    }
}
