//! Biome catalog.
//!
//! Every biome is a variant of [`BiomeId`] backed by a static [`Biome`]
//! record; lookups are array indexing and cannot fail.

use serde::{Deserialize, Serialize};

use crate::layer::LayerId;
use crate::tile::Tile;

// ============================================================================
// Identifiers
// ============================================================================

/// Identifies a biome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum BiomeId {
    /// Vacuum above the paradise heights
    OuterSpace = 0,
    /// Flowered paradise fields
    ParadiseMeadow = 1,
    /// Crystal-lined caverns
    CrystalCaves = 2,
    /// Islands drifting in the sky band
    FloatingIslands = 3,
    /// Open water at the world's edges
    Ocean = 4,
    /// High peaks
    Mountain = 5,
    /// Lava fields
    VolcanicWasteland = 6,
    /// Dry sand desert
    AridDesert = 7,
    /// Frozen plains
    FrozenTundra = 8,
    /// Wet lowland
    Swamp = 9,
    /// Hot, wet forest
    TropicalJungle = 10,
    /// Mild forest
    TemperateForest = 11,
    /// Grassland
    Plains = 12,
    /// Ordinary caves
    DeepCaverns = 13,
    /// Crystal heart of the world
    CrystalCore = 14,
    /// Flooded deep trenches
    AbyssalDepths = 15,
    /// Hell
    InfernalDepths = 16,
}

impl BiomeId {
    /// Number of biomes.
    pub const COUNT: usize = 17;

    /// Every biome in discriminant order.
    pub const ALL: [BiomeId; Self::COUNT] = [
        Self::OuterSpace,
        Self::ParadiseMeadow,
        Self::CrystalCaves,
        Self::FloatingIslands,
        Self::Ocean,
        Self::Mountain,
        Self::VolcanicWasteland,
        Self::AridDesert,
        Self::FrozenTundra,
        Self::Swamp,
        Self::TropicalJungle,
        Self::TemperateForest,
        Self::Plains,
        Self::DeepCaverns,
        Self::CrystalCore,
        Self::AbyssalDepths,
        Self::InfernalDepths,
    ];

    /// Static catalog record for this biome.
    #[must_use]
    pub fn info(self) -> &'static Biome {
        &BIOMES[self as usize]
    }

    /// Human-readable name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        self.info().display_name
    }

    /// Spawn table for this biome.
    #[must_use]
    pub fn spawn_table(self) -> &'static SpawnTable {
        &self.info().spawn_table
    }
}

// ============================================================================
// Records
// ============================================================================

/// Tree shape a biome grows on its surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TreeStyle {
    /// Round oak canopy
    Oak,
    /// Narrow pine
    Pine,
    /// Tall jungle tree with a wide canopy
    Jungle,
    /// Cactus column, no canopy
    Cactus,
}

impl TreeStyle {
    /// Trunk and canopy tiles. Cactus has no canopy.
    #[must_use]
    pub const fn tiles(self) -> (Tile, Option<Tile>) {
        match self {
            Self::Oak => (Tile::OakWood, Some(Tile::OakLeaves)),
            Self::Pine => (Tile::PineWood, Some(Tile::PineLeaves)),
            Self::Jungle => (Tile::JungleWood, Some(Tile::JungleLeaves)),
            Self::Cactus => (Tile::Cactus, None),
        }
    }
}

/// Rarity tier of a spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpawnRarity {
    /// Everyday fauna
    Common,
    /// Occasional fauna
    Uncommon,
    /// Rare fauna
    Rare,
    /// Once-in-a-world fauna
    Legendary,
}

/// Creature kinds that may spawn in a biome, by rarity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnTable {
    /// Everyday spawns
    pub common: &'static [&'static str],
    /// Occasional spawns
    pub uncommon: &'static [&'static str],
    /// Rare spawns
    pub rare: &'static [&'static str],
    /// Legendary spawns
    pub legendary: &'static [&'static str],
}

impl SpawnTable {
    /// Table with no spawns.
    pub const EMPTY: SpawnTable = SpawnTable {
        common: &[],
        uncommon: &[],
        rare: &[],
        legendary: &[],
    };

    /// Kinds in one tier.
    #[must_use]
    pub const fn tier(&self, rarity: SpawnRarity) -> &'static [&'static str] {
        match rarity {
            SpawnRarity::Common => self.common,
            SpawnRarity::Uncommon => self.uncommon,
            SpawnRarity::Rare => self.rare,
            SpawnRarity::Legendary => self.legendary,
        }
    }

    /// Check if no tier has any entry.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.common.is_empty()
            && self.uncommon.is_empty()
            && self.rare.is_empty()
            && self.legendary.is_empty()
    }
}

/// Static description of a biome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Biome {
    /// Identifier
    pub id: BiomeId,
    /// Human-readable name
    pub display_name: &'static str,
    /// Band this biome belongs to
    pub layer_affinity: LayerId,
    /// Typical temperature in °C
    pub temperature: f32,
    /// Relative humidity, 0..1
    pub humidity: f32,
    /// Fertility, 0..1
    pub fertility: f32,
    /// Danger level, 0 (safe) to 6 (lethal)
    pub danger_level: u8,
    /// Ground tile at the surface line
    pub surface: Tile,
    /// Tile for the rows just below the surface
    pub subsurface: Tile,
    /// Main fill tiles
    pub primary_tiles: &'static [Tile],
    /// Accent tiles
    pub secondary_tiles: &'static [Tile],
    /// Descriptive rare finds; never placed by the palette
    pub rare_tiles: &'static [Tile],
    /// Tree style, if the biome grows trees
    pub tree: Option<TreeStyle>,
    /// Creatures that may spawn here
    pub spawn_table: SpawnTable,
}

// ============================================================================
// Catalog
// ============================================================================

static BIOMES: [Biome; BiomeId::COUNT] = [
    Biome {
        id: BiomeId::OuterSpace,
        display_name: "Outer Space",
        layer_affinity: LayerId::Space,
        temperature: -270.0,
        humidity: 0.0,
        fertility: 0.0,
        danger_level: 5,
        surface: Tile::MoonRock,
        subsurface: Tile::MoonRock,
        primary_tiles: &[Tile::Air],
        secondary_tiles: &[Tile::MoonRock],
        rare_tiles: &[Tile::Crystal],
        tree: None,
        spawn_table: SpawnTable {
            common: &[],
            uncommon: &["star_wisp"],
            rare: &["void_ray"],
            legendary: &["sky_whale"],
        },
    },
    Biome {
        id: BiomeId::ParadiseMeadow,
        display_name: "Paradise Meadow",
        layer_affinity: LayerId::Paradise,
        temperature: 25.0,
        humidity: 0.7,
        fertility: 1.0,
        danger_level: 0,
        surface: Tile::Grass,
        subsurface: Tile::HeavenlyStone,
        primary_tiles: &[Tile::Grass, Tile::FlowerRed, Tile::FlowerYellow],
        secondary_tiles: &[Tile::OakWood, Tile::OakLeaves],
        rare_tiles: &[Tile::Crystal, Tile::Gold],
        tree: Some(TreeStyle::Oak),
        spawn_table: SpawnTable {
            common: &["rabbit", "deer", "butterfly", "bee", "dove"],
            uncommon: &["sheep", "horse", "cow"],
            rare: &["unicorn", "pegasus"],
            legendary: &["phoenix"],
        },
    },
    Biome {
        id: BiomeId::CrystalCaves,
        display_name: "Crystal Caves",
        layer_affinity: LayerId::Underground,
        temperature: 15.0,
        humidity: 0.8,
        fertility: 0.3,
        danger_level: 1,
        surface: Tile::Crystal,
        subsurface: Tile::Amethyst,
        primary_tiles: &[Tile::Stone, Tile::Crystal, Tile::Amethyst],
        secondary_tiles: &[Tile::GlowMushroom, Tile::Water],
        rare_tiles: &[Tile::Diamond, Tile::Emerald],
        tree: None,
        spawn_table: SpawnTable {
            common: &["bat", "spider", "glow_worm"],
            uncommon: &["crystal_golem", "gem_beetle"],
            rare: &["crystal_dragon"],
            legendary: &["diamond_spirit"],
        },
    },
    Biome {
        id: BiomeId::FloatingIslands,
        display_name: "Floating Islands",
        layer_affinity: LayerId::Sky,
        temperature: 10.0,
        humidity: 0.9,
        fertility: 0.8,
        danger_level: 2,
        surface: Tile::Grass,
        subsurface: Tile::HeavenlyStone,
        primary_tiles: &[Tile::Cloud, Tile::HeavenlyStone, Tile::Grass],
        secondary_tiles: &[Tile::OakWood, Tile::Water],
        rare_tiles: &[Tile::MoonRock],
        tree: Some(TreeStyle::Oak),
        spawn_table: SpawnTable {
            common: &["eagle", "falcon", "albatross"],
            uncommon: &["condor", "buzzard"],
            rare: &["cloud_sheep", "wind_sprite"],
            legendary: &["sky_whale"],
        },
    },
    Biome {
        id: BiomeId::Ocean,
        display_name: "Ocean",
        layer_affinity: LayerId::Surface,
        temperature: 18.0,
        humidity: 1.0,
        fertility: 0.6,
        danger_level: 2,
        surface: Tile::Sand,
        subsurface: Tile::Sand,
        primary_tiles: &[Tile::Water, Tile::Sand, Tile::Coral],
        secondary_tiles: &[Tile::Seaweed, Tile::Clay],
        rare_tiles: &[Tile::Chest],
        tree: None,
        spawn_table: SpawnTable {
            common: &["fish", "crab", "sea_turtle"],
            uncommon: &["dolphin", "octopus", "shark"],
            rare: &["whale", "manta_ray"],
            legendary: &["sea_dragon", "kraken"],
        },
    },
    Biome {
        id: BiomeId::Mountain,
        display_name: "Mountain",
        layer_affinity: LayerId::Surface,
        temperature: 5.0,
        humidity: 0.4,
        fertility: 0.3,
        danger_level: 3,
        surface: Tile::Stone,
        subsurface: Tile::Granite,
        primary_tiles: &[Tile::Stone, Tile::Granite, Tile::Snow],
        secondary_tiles: &[Tile::Gravel, Tile::Andesite],
        rare_tiles: &[Tile::Iron, Tile::Silver],
        tree: Some(TreeStyle::Pine),
        spawn_table: SpawnTable {
            common: &["mountain_goat", "marmot"],
            uncommon: &["eagle", "bear"],
            rare: &["snow_leopard"],
            legendary: &["stone_giant"],
        },
    },
    Biome {
        id: BiomeId::VolcanicWasteland,
        display_name: "Volcanic Wasteland",
        layer_affinity: LayerId::Surface,
        temperature: 50.0,
        humidity: 0.2,
        fertility: 0.4,
        danger_level: 5,
        surface: Tile::ScorchedStone,
        subsurface: Tile::Basalt,
        primary_tiles: &[Tile::Obsidian, Tile::ScorchedStone, Tile::Lava],
        secondary_tiles: &[Tile::Hellstone, Tile::Basalt],
        rare_tiles: &[Tile::Ruby],
        tree: None,
        spawn_table: SpawnTable {
            common: &["fire_salamander", "lava_lizard"],
            uncommon: &["fire_bird", "magma_crab"],
            rare: &["fire_elemental"],
            legendary: &["phoenix", "fire_dragon"],
        },
    },
    Biome {
        id: BiomeId::AridDesert,
        display_name: "Arid Desert",
        layer_affinity: LayerId::Surface,
        temperature: 40.0,
        humidity: 0.1,
        fertility: 0.2,
        danger_level: 4,
        surface: Tile::Sand,
        subsurface: Tile::Sandstone,
        primary_tiles: &[Tile::Sand, Tile::Sandstone, Tile::Stone],
        secondary_tiles: &[Tile::Cactus, Tile::Clay],
        rare_tiles: &[Tile::Diamond, Tile::Ruby],
        tree: Some(TreeStyle::Cactus),
        spawn_table: SpawnTable {
            common: &["camel", "lizard", "scorpion"],
            uncommon: &["vulture", "fennec_fox"],
            rare: &["desert_cat", "sand_worm"],
            legendary: &["desert_phoenix"],
        },
    },
    Biome {
        id: BiomeId::FrozenTundra,
        display_name: "Frozen Tundra",
        layer_affinity: LayerId::Surface,
        temperature: -10.0,
        humidity: 0.3,
        fertility: 0.3,
        danger_level: 3,
        surface: Tile::Snow,
        subsurface: Tile::Ice,
        primary_tiles: &[Tile::Snow, Tile::Ice, Tile::Stone],
        secondary_tiles: &[Tile::PineWood, Tile::Water],
        rare_tiles: &[Tile::Sapphire],
        tree: Some(TreeStyle::Pine),
        spawn_table: SpawnTable {
            common: &["polar_bear", "seal", "penguin"],
            uncommon: &["arctic_fox", "walrus"],
            rare: &["snow_leopard", "mammoth"],
            legendary: &["ice_dragon"],
        },
    },
    Biome {
        id: BiomeId::Swamp,
        display_name: "Swamp",
        layer_affinity: LayerId::Surface,
        temperature: 22.0,
        humidity: 0.9,
        fertility: 0.7,
        danger_level: 2,
        surface: Tile::Mud,
        subsurface: Tile::Clay,
        primary_tiles: &[Tile::Mud, Tile::Clay, Tile::Water],
        secondary_tiles: &[Tile::Moss, Tile::GlowMushroom],
        rare_tiles: &[Tile::Emerald],
        tree: Some(TreeStyle::Oak),
        spawn_table: SpawnTable {
            common: &["frog", "bat", "worm"],
            uncommon: &["crocodile", "heron"],
            rare: &["bog_witch"],
            legendary: &["swamp_hydra"],
        },
    },
    Biome {
        id: BiomeId::TropicalJungle,
        display_name: "Tropical Jungle",
        layer_affinity: LayerId::Surface,
        temperature: 30.0,
        humidity: 0.9,
        fertility: 1.0,
        danger_level: 3,
        surface: Tile::Grass,
        subsurface: Tile::Mud,
        primary_tiles: &[Tile::Grass, Tile::Dirt, Tile::JungleWood],
        secondary_tiles: &[Tile::JungleLeaves, Tile::Water, Tile::FlowerRed],
        rare_tiles: &[Tile::Emerald, Tile::Gold],
        tree: Some(TreeStyle::Jungle),
        spawn_table: SpawnTable {
            common: &["monkey", "parrot", "frog", "butterfly"],
            uncommon: &["jaguar", "snake", "toucan"],
            rare: &["gorilla", "chimpanzee"],
            legendary: &["jungle_spirit"],
        },
    },
    Biome {
        id: BiomeId::TemperateForest,
        display_name: "Temperate Forest",
        layer_affinity: LayerId::Surface,
        temperature: 18.0,
        humidity: 0.6,
        fertility: 0.9,
        danger_level: 1,
        surface: Tile::Grass,
        subsurface: Tile::Dirt,
        primary_tiles: &[Tile::Grass, Tile::Dirt, Tile::OakWood],
        secondary_tiles: &[Tile::OakLeaves, Tile::Stone, Tile::Water],
        rare_tiles: &[Tile::Iron, Tile::Coal],
        tree: Some(TreeStyle::Oak),
        spawn_table: SpawnTable {
            common: &["deer", "rabbit", "squirrel", "owl"],
            uncommon: &["bear", "wolf", "fox"],
            rare: &["elk", "lynx"],
            legendary: &["forest_guardian"],
        },
    },
    Biome {
        id: BiomeId::Plains,
        display_name: "Plains",
        layer_affinity: LayerId::Surface,
        temperature: 20.0,
        humidity: 0.5,
        fertility: 0.8,
        danger_level: 1,
        surface: Tile::Grass,
        subsurface: Tile::Dirt,
        primary_tiles: &[Tile::Grass, Tile::Dirt, Tile::FlowerYellow],
        secondary_tiles: &[Tile::FlowerRed, Tile::Stone],
        rare_tiles: &[Tile::Coal],
        tree: Some(TreeStyle::Oak),
        spawn_table: SpawnTable {
            common: &["rabbit", "deer", "fox", "butterfly"],
            uncommon: &["horse", "sheep"],
            rare: &["bison"],
            legendary: &["golden_stag"],
        },
    },
    Biome {
        id: BiomeId::DeepCaverns,
        display_name: "Deep Caverns",
        layer_affinity: LayerId::Underground,
        temperature: 12.0,
        humidity: 0.8,
        fertility: 0.2,
        danger_level: 4,
        surface: Tile::Stone,
        subsurface: Tile::Stone,
        primary_tiles: &[Tile::Stone, Tile::Granite, Tile::Andesite],
        secondary_tiles: &[Tile::Diorite, Tile::Gravel, Tile::GlowMushroom],
        rare_tiles: &[Tile::Gold, Tile::Diamond, Tile::Lapis],
        tree: None,
        spawn_table: SpawnTable {
            common: &["bat", "cave_spider", "mole"],
            uncommon: &["blind_fish", "cave_bear"],
            rare: &["crystal_bat", "underground_worm"],
            legendary: &["cave_dragon"],
        },
    },
    Biome {
        id: BiomeId::CrystalCore,
        display_name: "Crystal Core",
        layer_affinity: LayerId::DeepCore,
        temperature: 5.0,
        humidity: 0.5,
        fertility: 0.1,
        danger_level: 3,
        surface: Tile::Crystal,
        subsurface: Tile::Amethyst,
        primary_tiles: &[Tile::DeepStone, Tile::Crystal, Tile::Amethyst],
        secondary_tiles: &[Tile::Basalt, Tile::Crystal],
        rare_tiles: &[Tile::Diamond, Tile::Emerald, Tile::Sapphire],
        tree: None,
        spawn_table: SpawnTable {
            common: &["crystal_golem", "energy_wisp"],
            uncommon: &["gem_beetle", "crystal_spider"],
            rare: &["living_crystal"],
            legendary: &["crystal_phoenix"],
        },
    },
    Biome {
        id: BiomeId::AbyssalDepths,
        display_name: "Abyssal Depths",
        layer_affinity: LayerId::DeepCore,
        temperature: 2.0,
        humidity: 1.0,
        fertility: 0.3,
        danger_level: 5,
        surface: Tile::DeepStone,
        subsurface: Tile::DeepStone,
        primary_tiles: &[Tile::DeepStone, Tile::Basalt, Tile::Water],
        secondary_tiles: &[Tile::Coral, Tile::Obsidian],
        rare_tiles: &[Tile::Chest],
        tree: None,
        spawn_table: SpawnTable {
            common: &["anglerfish", "deep_fish"],
            uncommon: &["giant_squid", "pressure_crab"],
            rare: &["deep_whale", "abyssal_horror"],
            legendary: &["leviathan", "deep_god"],
        },
    },
    Biome {
        id: BiomeId::InfernalDepths,
        display_name: "Infernal Depths",
        layer_affinity: LayerId::Hell,
        temperature: 80.0,
        humidity: 0.1,
        fertility: 0.1,
        danger_level: 6,
        surface: Tile::Hellstone,
        subsurface: Tile::SoulSand,
        primary_tiles: &[Tile::ScorchedStone, Tile::Hellstone, Tile::SoulSand],
        secondary_tiles: &[Tile::Obsidian, Tile::Lava],
        rare_tiles: &[Tile::Ruby, Tile::Gold],
        tree: None,
        spawn_table: SpawnTable {
            common: &["demon", "hellhound", "fire_imp"],
            uncommon: &["lava_worm", "hell_bat"],
            rare: &["demon_lord", "hell_dragon"],
            legendary: &["infernal_phoenix"],
        },
    },
];

/// Looks up the spawn table for a biome.
#[must_use]
pub fn spawn_table_for(biome: BiomeId) -> &'static SpawnTable {
    biome.spawn_table()
}

/// Biomes whose affinity is the given band.
pub fn biomes_in_layer(layer: LayerId) -> impl Iterator<Item = BiomeId> {
    BiomeId::ALL
        .into_iter()
        .filter(move |b| b.info().layer_affinity == layer)
}
