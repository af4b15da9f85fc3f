//! Tile kinds.

use serde::{Deserialize, Serialize};

/// Every kind of tile a world cell can hold.
///
/// The set is closed; `OutOfBounds` is only ever returned by queries and is
/// never stored in a grid.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum Tile {
    /// Empty space
    #[default]
    Air = 0,
    /// Grass-topped soil
    Grass = 1,
    /// Dirt
    Dirt = 2,
    /// Stone
    Stone = 3,
    /// Generic trunk
    Wood = 4,
    /// Generic foliage
    Leaves = 5,
    /// Coal ore
    Coal = 6,
    /// Iron ore
    Iron = 7,
    /// Indestructible floor and walls
    Bedrock = 8,
    /// Water
    Water = 9,
    /// Crystal
    Crystal = 10,
    /// Glowing mushroom
    GlowMushroom = 11,
    /// Cloud
    Cloud = 12,
    /// Hellstone
    Hellstone = 13,
    /// Lava
    Lava = 14,
    /// Sand
    Sand = 15,
    /// Oak trunk
    OakWood = 16,
    /// Oak foliage
    OakLeaves = 17,
    /// Red flower
    FlowerRed = 18,
    /// Yellow flower
    FlowerYellow = 19,
    /// Gold ore
    Gold = 20,
    /// Diamond ore
    Diamond = 21,
    /// Lapis ore
    Lapis = 22,
    /// Granite
    Granite = 23,
    /// Diorite
    Diorite = 24,
    /// Andesite
    Andesite = 25,
    /// Stone of the paradise heights
    HeavenlyStone = 26,
    /// Moon rock
    MoonRock = 27,
    /// Soul sand
    SoulSand = 28,
    /// Scorched stone
    ScorchedStone = 29,
    /// Obsidian
    Obsidian = 30,
    /// Amethyst
    Amethyst = 31,
    /// Snow
    Snow = 32,
    /// Ice
    Ice = 33,
    /// Cactus
    Cactus = 34,
    /// Pine trunk
    PineWood = 35,
    /// Pine needles
    PineLeaves = 36,
    /// Jungle trunk
    JungleWood = 37,
    /// Jungle foliage
    JungleLeaves = 38,
    /// Sandstone
    Sandstone = 39,
    /// Clay
    Clay = 40,
    /// Mud
    Mud = 41,
    /// Copper ore
    Copper = 42,
    /// Silver ore
    Silver = 43,
    /// Emerald ore
    Emerald = 44,
    /// Ruby ore
    Ruby = 45,
    /// Sapphire ore
    Sapphire = 46,
    /// Basalt
    Basalt = 47,
    /// Dense stone of the deep layers
    DeepStone = 48,
    /// Coral
    Coral = 49,
    /// Seaweed
    Seaweed = 50,
    /// Moss
    Moss = 51,
    /// Treasure chest
    Chest = 52,
    /// Masonry used by built structures
    Brick = 53,
    /// Marble used by temples
    Marble = 54,
    /// Gravel
    Gravel = 55,
    /// Sentinel for queries outside the grid
    OutOfBounds = 255,
}

impl Tile {
    /// Ore tiles, in the order the default vein table lists them.
    pub const ORES: [Tile; 10] = [
        Tile::Coal,
        Tile::Copper,
        Tile::Iron,
        Tile::Silver,
        Tile::Gold,
        Tile::Lapis,
        Tile::Sapphire,
        Tile::Emerald,
        Tile::Ruby,
        Tile::Diamond,
    ];

    /// Raw byte id.
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Check if this tile is empty space.
    #[must_use]
    pub const fn is_air(self) -> bool {
        matches!(self, Tile::Air)
    }

    /// Check if this tile is a liquid.
    #[must_use]
    pub const fn is_liquid(self) -> bool {
        matches!(self, Tile::Water | Tile::Lava)
    }

    /// Check if something can stand on this tile.
    #[must_use]
    pub const fn is_solid(self) -> bool {
        !matches!(
            self,
            Tile::Air
                | Tile::Water
                | Tile::Lava
                | Tile::Cloud
                | Tile::FlowerRed
                | Tile::FlowerYellow
                | Tile::GlowMushroom
                | Tile::Seaweed
                | Tile::OutOfBounds
        )
    }

    /// Check if this is an undifferentiated rock that ore veins may replace.
    #[must_use]
    pub const fn is_plain_rock(self) -> bool {
        matches!(
            self,
            Tile::Stone
                | Tile::Granite
                | Tile::Diorite
                | Tile::Andesite
                | Tile::DeepStone
                | Tile::ScorchedStone
                | Tile::Basalt
        )
    }

    /// Check if this is an ore.
    #[must_use]
    pub const fn is_ore(self) -> bool {
        matches!(
            self,
            Tile::Coal
                | Tile::Copper
                | Tile::Iron
                | Tile::Silver
                | Tile::Gold
                | Tile::Lapis
                | Tile::Sapphire
                | Tile::Emerald
                | Tile::Ruby
                | Tile::Diamond
        )
    }

    /// Check if destruction may remove this tile.
    #[must_use]
    pub const fn is_destructible(self) -> bool {
        !matches!(self, Tile::Bedrock | Tile::OutOfBounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_stable() {
        assert_eq!(Tile::Air.id(), 0);
        assert_eq!(Tile::Bedrock.id(), 8);
        assert_eq!(Tile::Amethyst.id(), 31);
        assert_eq!(Tile::OutOfBounds.id(), 255);
    }

    #[test]
    fn test_ore_list_matches_predicate() {
        for ore in Tile::ORES {
            assert!(ore.is_ore());
            assert!(!ore.is_plain_rock());
        }
        assert!(!Tile::Crystal.is_ore());
    }

    #[test]
    fn test_categories() {
        assert!(Tile::Air.is_air());
        assert!(!Tile::Air.is_solid());
        assert!(Tile::Lava.is_liquid());
        assert!(Tile::Stone.is_solid());
        assert!(Tile::Stone.is_plain_rock());
        assert!(!Tile::Bedrock.is_destructible());
        assert!(Tile::Diamond.is_destructible());
    }
}
