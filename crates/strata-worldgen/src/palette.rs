//! Per-tile material assignment from biome palettes.

use crate::biome::{Biome, BiomeId};
use crate::classify::BiomeMap;
use crate::grid::TileGrid;
use crate::heightmap::{base_row, HeightMap};
use crate::layer::{LayerId, LayerTable};
use crate::noise::NoiseSource;
use crate::tile::Tile;

/// Rows of subsurface material under the surface line.
pub const SUBSURFACE_DEPTH: usize = 5;

/// Fills `grid` from the biome map and surface line. Consumes no randomness.
pub fn assign_palette(
    grid: &mut TileGrid,
    biomes: &BiomeMap,
    heights: &HeightMap,
    layers: &LayerTable,
    detail: &NoiseSource,
) {
    let width = grid.width();
    let height = grid.height();
    let underground_start = layers.row_start(LayerId::Underground, height);
    let sea_level = base_row(layers, height).floor() as usize;

    for y in 0..height {
        let layer = layers.layer_at_row(y, height).id;
        for x in 0..width {
            let biome = biomes.get(x, y).unwrap_or(BiomeId::Plains).info();
            let ground = heights.get(x).unwrap_or(sea_level);

            let tile = if y == height - 1 || ((x == 0 || x == width - 1) && y >= underground_start)
            {
                Tile::Bedrock
            } else {
                match layer {
                    LayerId::Space => space_tile(detail, x, y),
                    LayerId::Paradise => paradise_tile(detail, biome, x, y),
                    LayerId::Sky => sky_tile(detail, biome, x, y),
                    LayerId::Surface => surface_tile(detail, biome, x, y, ground, sea_level),
                    LayerId::Underground | LayerId::DeepCore | LayerId::Hell => {
                        if y <= ground + SUBSURFACE_DEPTH {
                            surface_tile(detail, biome, x, y, ground, sea_level)
                        } else {
                            deep_tile(detail, biome, x, y)
                        }
                    },
                }
            };
            grid.set(x, y, tile);
        }
    }
}

fn space_tile(detail: &NoiseSource, x: usize, y: usize) -> Tile {
    if detail.unit(x as f64 * 0.15, y as f64 * 0.15 + 50.0) > 0.93 {
        Tile::MoonRock
    } else {
        Tile::Air
    }
}

/// Island clumps: noise above `threshold`, topped with the biome surface.
fn clump_tile(
    detail: &NoiseSource,
    biome: &Biome,
    x: usize,
    y: usize,
    threshold: f64,
    offset: f64,
) -> Option<Tile> {
    let solid = |yy: f64| detail.noise2d(x as f64 * 0.08, yy * 0.2 + offset) > threshold;
    let fy = y as f64;
    if !solid(fy) {
        return None;
    }
    if y == 0 || !solid(fy - 1.0) {
        Some(biome.surface)
    } else {
        Some(biome.subsurface)
    }
}

fn paradise_tile(detail: &NoiseSource, biome: &Biome, x: usize, y: usize) -> Tile {
    clump_tile(detail, biome, x, y, 0.45, 200.0).unwrap_or(Tile::Air)
}

fn sky_tile(detail: &NoiseSource, biome: &Biome, x: usize, y: usize) -> Tile {
    if let Some(tile) = clump_tile(detail, biome, x, y, 0.55, 400.0) {
        return tile;
    }
    if detail.noise2d(x as f64 * 0.05, y as f64 * 0.1 + 100.0) > 0.3 {
        Tile::Cloud
    } else {
        Tile::Air
    }
}

fn surface_tile(
    detail: &NoiseSource,
    biome: &Biome,
    x: usize,
    y: usize,
    ground: usize,
    sea_level: usize,
) -> Tile {
    if y < ground {
        if biome.id == BiomeId::Ocean && y >= sea_level {
            Tile::Water
        } else {
            Tile::Air
        }
    } else if y == ground {
        biome.surface
    } else if y <= ground + SUBSURFACE_DEPTH {
        biome.subsurface
    } else {
        stone_variant(detail, x, y)
    }
}

/// Plain rock with granite, diorite and andesite patches.
fn stone_variant(detail: &NoiseSource, x: usize, y: usize) -> Tile {
    let n = detail.unit(x as f64 * 0.12, y as f64 * 0.12 + 600.0);
    if n > 0.8 {
        Tile::Granite
    } else if n > 0.72 {
        Tile::Diorite
    } else if n < 0.2 {
        Tile::Andesite
    } else {
        Tile::Stone
    }
}

fn deep_tile(detail: &NoiseSource, biome: &Biome, x: usize, y: usize) -> Tile {
    let fx = x as f64;
    let fy = y as f64;
    let secondary = detail.unit(fx * 0.09, fy * 0.09 + 800.0) > 0.78;
    let palette = if secondary && !biome.secondary_tiles.is_empty() {
        biome.secondary_tiles
    } else {
        biome.primary_tiles
    };
    let pick = detail.unit(fx * 0.2, fy * 0.2 + 1000.0);
    // Bias toward the first entry so the biome's base rock dominates.
    let idx = if pick < 0.6 {
        0
    } else {
        ((pick - 0.6) / 0.4 * palette.len() as f64) as usize
    };
    palette
        .get(idx.min(palette.len().saturating_sub(1)))
        .copied()
        .unwrap_or(Tile::Stone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::BiomeClassifier;
    use crate::config::ClimateParams;

    fn paint(width: usize, height: usize, seed: u64) -> (TileGrid, HeightMap) {
        let layers = LayerTable::standard();
        let noise = NoiseSource::new(seed);
        let heights = HeightMap::synthesize(&noise, &layers, width, height);
        let classifier = BiomeClassifier::new(seed, layers.clone(), ClimateParams::default());
        let biomes = classifier.classify_grid(width, height);
        let mut grid = TileGrid::new(width, height, Tile::Air);
        assign_palette(&mut grid, &biomes, &heights, &layers, &noise.channel(5));
        (grid, heights)
    }

    #[test]
    fn test_bedrock_border() {
        let (grid, _) = paint(48, 40, 11);
        let underground = LayerTable::standard().row_start(LayerId::Underground, 40);
        for x in 0..48 {
            assert_eq!(grid.get(x, 39), Some(Tile::Bedrock));
        }
        for y in underground..40 {
            assert_eq!(grid.get(0, y), Some(Tile::Bedrock));
            assert_eq!(grid.get(47, y), Some(Tile::Bedrock));
        }
    }

    #[test]
    fn test_no_ore_from_palette() {
        let (grid, _) = paint(96, 64, 5);
        assert_eq!(grid.count_where(Tile::is_ore), 0);
        assert_eq!(grid.count(Tile::OutOfBounds), 0);
    }

    #[test]
    fn test_surface_column() {
        let (grid, heights) = paint(64, 80, 21);
        let x = 32;
        let ground = heights.get(x).expect("column");
        let tile = grid.get(x, ground).expect("in range");
        assert!(tile.is_solid(), "{tile:?}");
        assert!(grid.get(x, ground - 1).is_some_and(|t| !t.is_solid()));
    }

    #[test]
    fn test_top_row_mostly_empty() {
        let (grid, _) = paint(64, 40, 2);
        let empty = grid.row(0).iter().filter(|t| t.is_air()).count();
        assert!(empty > 32);
    }
}
