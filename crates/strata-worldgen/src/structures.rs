//! Landmark placement: trees, blueprint structures and cave chests.
//!
//! All three stages draw from the shared generation stream, in that order.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::biome::{BiomeId, TreeStyle};
use crate::classify::BiomeMap;
use crate::grid::TileGrid;
use crate::heightmap::HeightMap;
use crate::layer::{LayerId, LayerTable};
use crate::rng::RngState;
use crate::tile::Tile;

/// Blueprint attempts per tile of world area, before the rarity factor.
const ATTEMPTS_PER_AREA: f64 = 1.0 / 1000.0;

// ============================================================================
// Kinds and records
// ============================================================================

/// Every kind of placed landmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    /// Marble temple of the paradise heights
    DivineTemple,
    /// Earth clump hanging in the sky
    FloatingIsland,
    /// Oversized oak
    AncientTree,
    /// Crystal geode
    CrystalFormation,
    /// Obsidian keep of hell
    DemonFortress,
    /// Lava-bottomed chasm
    ChaosRift,
    /// Crumbled brick walls
    AncientRuins,
    /// Obsidian frame with amethyst core
    MysteriousPortal,
    /// Ordinary surface tree
    Tree,
    /// Treasure chest on a cave floor
    Chest,
}

impl StructureKind {
    /// Human-readable name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::DivineTemple => "Divine Temple",
            Self::FloatingIsland => "Floating Island",
            Self::AncientTree => "Ancient Tree",
            Self::CrystalFormation => "Crystal Formation",
            Self::DemonFortress => "Demon Fortress",
            Self::ChaosRift => "Chaos Rift",
            Self::AncientRuins => "Ancient Ruins",
            Self::MysteriousPortal => "Mysterious Portal",
            Self::Tree => "Tree",
            Self::Chest => "Chest",
        }
    }
}

/// A landmark that made it into the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedStructure {
    /// Kind
    pub kind: StructureKind,
    /// Left column of the footprint
    pub x: usize,
    /// Top row of the footprint
    pub y: usize,
    /// Footprint width
    pub width: usize,
    /// Footprint height
    pub height: usize,
}

// ============================================================================
// Blueprints
// ============================================================================

/// Static landmark template.
///
/// Legend: `.` leaves the cell alone, `_` forces air; every other character
/// maps to a tile through [`legend`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StructureBlueprint {
    /// Kind recorded for placements
    pub kind: StructureKind,
    /// Relative frequency; attempts are `floor(area * rarity / 1000)`
    pub rarity_density: f64,
    /// Biomes the anchor tile must be in
    pub allowed_biomes: &'static [BiomeId],
    /// Template rows, top to bottom, all the same length
    pub rows: &'static [&'static str],
}

/// Tile for a template character; `None` leaves the cell unchanged.
#[must_use]
pub const fn legend(c: char) -> Option<Tile> {
    Some(match c {
        '_' => Tile::Air,
        'M' => Tile::Marble,
        'B' => Tile::Brick,
        'O' => Tile::Obsidian,
        'G' => Tile::Grass,
        'D' => Tile::Dirt,
        'H' => Tile::HeavenlyStone,
        'W' => Tile::OakWood,
        'L' => Tile::OakLeaves,
        'C' => Tile::Crystal,
        'A' => Tile::Amethyst,
        'V' => Tile::Lava,
        'K' => Tile::Chest,
        _ => return None,
    })
}

impl StructureBlueprint {
    /// Footprint width.
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, |r| r.len())
    }

    /// Footprint height.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.rows.len()
    }

    /// Template cell at `(dx, dy)`.
    #[must_use]
    pub fn cell(&self, dx: usize, dy: usize) -> Option<Tile> {
        self.rows
            .get(dy)
            .and_then(|row| row.as_bytes().get(dx))
            .and_then(|&b| legend(b as char))
    }

    /// Placement attempts for a world of `area` tiles.
    #[must_use]
    pub fn attempts(&self, area: usize) -> usize {
        (area as f64 * self.rarity_density * ATTEMPTS_PER_AREA).floor() as usize
    }

    /// Writes the template at `(x, y)`. Cells outside the grid and bedrock
    /// are left alone.
    pub fn stamp(&self, grid: &mut TileGrid, x: usize, y: usize) {
        for dy in 0..self.height() {
            for dx in 0..self.width() {
                let Some(tile) = self.cell(dx, dy) else {
                    continue;
                };
                if grid.get(x + dx, y + dy).is_some_and(Tile::is_destructible) {
                    grid.set(x + dx, y + dy, tile);
                }
            }
        }
    }

    /// The built-in landmark set.
    #[must_use]
    pub fn catalog() -> &'static [StructureBlueprint] {
        &BLUEPRINTS
    }
}

static BLUEPRINTS: [StructureBlueprint; 8] = [
    StructureBlueprint {
        kind: StructureKind::DivineTemple,
        rarity_density: 0.1,
        allowed_biomes: &[BiomeId::ParadiseMeadow, BiomeId::FloatingIslands],
        rows: &[
            "....M....",
            "...MMM...",
            "..MMMMM..",
            ".M_____M.",
            ".M__K__M.",
            ".M_____M.",
            "MMMMMMMMM",
        ],
    },
    StructureBlueprint {
        kind: StructureKind::FloatingIsland,
        rarity_density: 0.3,
        allowed_biomes: &[BiomeId::FloatingIslands, BiomeId::ParadiseMeadow],
        rows: &[
            "...GGGGG...",
            ".GGDDDDDGG.",
            "..HHHHHHH..",
            "...HHHHH...",
            ".....H.....",
        ],
    },
    StructureBlueprint {
        kind: StructureKind::AncientTree,
        rarity_density: 0.4,
        allowed_biomes: &[
            BiomeId::TemperateForest,
            BiomeId::TropicalJungle,
            BiomeId::ParadiseMeadow,
        ],
        rows: &[
            "..LLL..",
            ".LLLLL.",
            "LLLLLLL",
            "LLLWLLL",
            ".LLWLL.",
            "...W...",
            "...W...",
            "...W...",
            "...W...",
            "...W...",
            "..WWW..",
            ".WW.WW.",
        ],
    },
    StructureBlueprint {
        kind: StructureKind::CrystalFormation,
        rarity_density: 0.5,
        allowed_biomes: &[BiomeId::CrystalCaves, BiomeId::CrystalCore, BiomeId::DeepCaverns],
        rows: &[
            "...C...",
            "..CAC..",
            ".CAAAC.",
            "CAAAAAC",
            ".CAAAC.",
            "..CAC..",
            "...C...",
        ],
    },
    StructureBlueprint {
        kind: StructureKind::DemonFortress,
        rarity_density: 0.2,
        allowed_biomes: &[BiomeId::InfernalDepths],
        rows: &[
            "O.O.O...O.O.O",
            "OOOOO...OOOOO",
            "OB_BO...OB_BO",
            "OB_BOOOOOB_BO",
            "OB_________BO",
            "OB____K____BO",
            "OBBBBBBBBBBBO",
            "OOOOOOOOOOOOO",
        ],
    },
    StructureBlueprint {
        kind: StructureKind::ChaosRift,
        rarity_density: 0.1,
        allowed_biomes: &[
            BiomeId::InfernalDepths,
            BiomeId::VolcanicWasteland,
            BiomeId::AbyssalDepths,
        ],
        rows: &[
            ".O_O.", ".O_O.", "O___O", "O___O", "O___O", ".O_O.", ".O_O.", ".O_O.", ".OVO.",
        ],
    },
    StructureBlueprint {
        kind: StructureKind::AncientRuins,
        rarity_density: 0.3,
        allowed_biomes: &[
            BiomeId::Plains,
            BiomeId::AridDesert,
            BiomeId::Swamp,
            BiomeId::TemperateForest,
            BiomeId::DeepCaverns,
        ],
        rows: &[
            "B.......B",
            "B...B...B",
            "BB..B..BB",
            "B_K_B___B",
            "BBBBBBBBB",
        ],
    },
    StructureBlueprint {
        kind: StructureKind::MysteriousPortal,
        rarity_density: 0.15,
        allowed_biomes: &[
            BiomeId::Mountain,
            BiomeId::FrozenTundra,
            BiomeId::CrystalCaves,
            BiomeId::Plains,
        ],
        rows: &[".OOO.", "O___O", "OA_AO", "O_A_O", "OA_AO", "O___O", "OOOOO"],
    },
];

// ============================================================================
// Placement stages
// ============================================================================

/// Rejection-samples every blueprint over the world.
///
/// Anchors are drawn uniformly; a placement is rejected if the footprint
/// leaves the grid or the anchor tile's biome is not allowed. Accepted
/// placements may overlap, and the later stamp wins.
pub fn place_structures(
    grid: &mut TileGrid,
    biomes: &BiomeMap,
    blueprints: &[StructureBlueprint],
    rng: &mut RngState,
) -> Vec<PlacedStructure> {
    let (width, height) = (grid.width(), grid.height());
    let mut placed = Vec::new();

    for blueprint in blueprints {
        let (bw, bh) = (blueprint.width(), blueprint.height());
        for _ in 0..blueprint.attempts(width * height) {
            let x = rng.range_usize(0, width);
            let y = rng.range_usize(0, height);
            if x + bw > width || y + bh > height {
                continue;
            }
            let allowed = biomes
                .get(x, y)
                .is_some_and(|b| blueprint.allowed_biomes.contains(&b));
            if !allowed {
                continue;
            }
            blueprint.stamp(grid, x, y);
            placed.push(PlacedStructure {
                kind: blueprint.kind,
                x,
                y,
                width: bw,
                height: bh,
            });
        }
    }

    debug!("Placed {} blueprint structures", placed.len());
    placed
}

/// Grows up to `count` trees on the surface line. Trunk and canopy only
/// fill air.
pub fn plant_trees(
    grid: &mut TileGrid,
    heights: &HeightMap,
    biomes: &BiomeMap,
    count: usize,
    rng: &mut RngState,
) -> Vec<PlacedStructure> {
    let mut planted = Vec::new();
    if grid.width() < 5 {
        return planted;
    }

    for _ in 0..count {
        let x = rng.range_usize(2, grid.width() - 2);
        let Some(ground) = heights.get(x) else {
            continue;
        };
        let Some(style) = biomes.get(x, ground).and_then(|b| b.info().tree) else {
            continue;
        };
        let (min_h, max_h, radius) = match style {
            TreeStyle::Cactus => (2, 4, 0),
            TreeStyle::Pine => (6, 9, 1),
            TreeStyle::Oak => (5, 8, 2),
            TreeStyle::Jungle => (8, 12, 3),
        };
        let trunk = rng.range_inclusive(min_h, max_h) as usize;
        if ground < trunk + radius + 1 {
            continue;
        }
        let rooted = grid.get(x, ground).is_some_and(Tile::is_solid)
            && grid.get(x, ground - 1).is_some_and(Tile::is_air);
        if !rooted {
            continue;
        }

        let (wood, leaves) = style.tiles();
        let top = ground - trunk;
        for y in top..ground {
            if grid.get(x, y).is_some_and(Tile::is_air) {
                grid.set(x, y, wood);
            }
        }
        if let Some(leaves) = leaves {
            let r = radius as i64;
            for dy in -r..=r {
                for dx in -r..=r {
                    if dx * dx + dy * dy > r * r + 1 {
                        continue;
                    }
                    let lx = x as i64 + dx;
                    let ly = top as i64 + dy;
                    if grid.tile_at(lx, ly).is_air() {
                        grid.set(lx as usize, ly as usize, leaves);
                    }
                }
            }
        }

        planted.push(PlacedStructure {
            kind: StructureKind::Tree,
            x: x.saturating_sub(radius),
            y: top.saturating_sub(radius),
            width: radius * 2 + 1,
            height: trunk + radius,
        });
    }

    debug!("Planted {} trees", planted.len());
    planted
}

/// Hides up to `count` chests on cave floors below the underground boundary.
pub fn hide_chests(
    grid: &mut TileGrid,
    layers: &LayerTable,
    count: usize,
    rng: &mut RngState,
) -> Vec<PlacedStructure> {
    let mut chests = Vec::new();
    let (width, height) = (grid.width(), grid.height());
    let top = layers.row_start(LayerId::Underground, height);
    if width < 3 || top + 1 >= height {
        return chests;
    }

    for _ in 0..count * 4 {
        if chests.len() >= count {
            break;
        }
        let x = rng.range_usize(1, width - 1);
        let y = rng.range_usize(top, height - 1);
        let on_floor = grid.get(x, y).is_some_and(Tile::is_air)
            && grid.get(x, y + 1).is_some_and(Tile::is_solid);
        if on_floor {
            grid.set(x, y, Tile::Chest);
            chests.push(PlacedStructure {
                kind: StructureKind::Chest,
                x,
                y,
                width: 1,
                height: 1,
            });
        }
    }

    debug!("Hid {} chests", chests.len());
    chests
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::BiomeClassifier;
    use crate::config::ClimateParams;
    use crate::noise::NoiseSource;

    #[test]
    fn test_templates_are_rectangular_and_ore_free() {
        for bp in StructureBlueprint::catalog() {
            let width = bp.width();
            assert!(width > 0, "{:?}", bp.kind);
            for row in bp.rows {
                assert_eq!(row.len(), width, "{:?}", bp.kind);
                for c in row.chars() {
                    assert!(c == '.' || legend(c).is_some(), "{:?} has '{c}'", bp.kind);
                    assert!(!legend(c).is_some_and(Tile::is_ore));
                }
            }
            assert!(!bp.allowed_biomes.is_empty());
        }
    }

    #[test]
    fn test_attempt_count() {
        let bp = &StructureBlueprint::catalog()[3];
        assert_eq!(bp.kind, StructureKind::CrystalFormation);
        assert_eq!(bp.attempts(2048), 1);
        assert_eq!(bp.attempts(100_000), 50);
    }

    #[test]
    fn test_stamp_keeps_dot_cells() {
        let bp = &StructureBlueprint::catalog()[3];
        let mut grid = TileGrid::new(10, 10, Tile::Stone);
        bp.stamp(&mut grid, 1, 1);
        assert_eq!(grid.get(1, 1), Some(Tile::Stone));
        assert_eq!(grid.get(4, 1), Some(Tile::Crystal));
        assert_eq!(grid.get(4, 4), Some(Tile::Amethyst));

        let mut grid = TileGrid::new(10, 10, Tile::Bedrock);
        bp.stamp(&mut grid, 0, 0);
        assert_eq!(grid.count(Tile::Bedrock), 100);
    }

    #[test]
    fn test_placements_respect_bounds_and_biomes() {
        let classifier = BiomeClassifier::new(3, LayerTable::standard(), ClimateParams::default());
        let biomes = classifier.classify_grid(200, 150);
        let mut grid = TileGrid::new(200, 150, Tile::Stone);
        let placed = place_structures(
            &mut grid,
            &biomes,
            StructureBlueprint::catalog(),
            &mut RngState::new(3),
        );
        assert!(!placed.is_empty());
        for p in &placed {
            assert!(p.x + p.width <= 200 && p.y + p.height <= 150);
            let bp = StructureBlueprint::catalog()
                .iter()
                .find(|b| b.kind == p.kind)
                .expect("blueprint");
            let anchor = biomes.get(p.x, p.y).expect("anchor");
            assert!(bp.allowed_biomes.contains(&anchor));
        }
    }

    #[test]
    fn test_trees_grow_on_ground() {
        let layers = LayerTable::standard();
        let noise = NoiseSource::new(12);
        let heights = HeightMap::synthesize(&noise, &layers, 120, 80);
        let classifier = BiomeClassifier::new(12, layers.clone(), ClimateParams::default());
        let biomes = classifier.classify_grid(120, 80);
        let mut grid = TileGrid::new(120, 80, Tile::Air);
        for x in 0..120 {
            let ground = heights.get(x).expect("column");
            for y in ground..80 {
                grid.set(x, y, Tile::Dirt);
            }
        }
        let trees = plant_trees(&mut grid, &heights, &biomes, 30, &mut RngState::new(12));
        for t in &trees {
            assert_eq!(t.kind, StructureKind::Tree);
        }
        let wood = grid.count_where(|t| {
            matches!(
                t,
                Tile::OakWood | Tile::PineWood | Tile::JungleWood | Tile::Cactus
            )
        });
        assert_eq!(trees.is_empty(), wood == 0);
    }

    #[test]
    fn test_chests_on_floors() {
        let layers = LayerTable::standard();
        let mut grid = TileGrid::new(40, 40, Tile::Stone);
        for y in 25..35 {
            for x in 5..35 {
                grid.set(x, y, Tile::Air);
            }
        }
        let chests = hide_chests(&mut grid, &layers, 5, &mut RngState::new(2));
        assert!(chests.len() <= 5);
        for c in &chests {
            assert_eq!(grid.get(c.x, c.y), Some(Tile::Chest));
            assert!(grid.get(c.x, c.y + 1).is_some_and(Tile::is_solid));
        }
        assert_eq!(grid.count(Tile::Chest), chests.len());
    }
}
