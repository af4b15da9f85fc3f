//! Ore vein distribution.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::OreVeinRule;
use crate::grid::TileGrid;
use crate::layer::{row_fraction, LayerId, LayerTable};
use crate::rng::RngState;

/// Smallest vein, in tiles.
const VEIN_MIN: i64 = 2;
/// Largest vein, in tiles.
const VEIN_MAX: i64 = 6;
/// Vein tiles land within this many tiles of the trigger.
const VEIN_SPREAD: i64 = 2;

/// What the distributor did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OreStats {
    /// Veins seeded
    pub veins: usize,
    /// Rock tiles converted to ore
    pub tiles_placed: usize,
}

/// Scans plain rock below the underground boundary row by row and seeds
/// veins.
///
/// Every rule whose depth range covers a tile draws once; when several fire,
/// the last one in table order wins. A vein tile is only converted if it is
/// still plain rock and its own depth lies inside the rule's range.
pub fn distribute_ores(
    grid: &mut TileGrid,
    rules: &[OreVeinRule],
    layers: &LayerTable,
    rng: &mut RngState,
) -> OreStats {
    let mut stats = OreStats::default();
    if rules.is_empty() {
        return stats;
    }
    let height = grid.height();
    let start = layers.row_start(LayerId::Underground, height);

    for y in start..height {
        let depth = row_fraction(y, height);
        for x in 0..grid.width() {
            if !grid.get(x, y).is_some_and(|t| t.is_plain_rock()) {
                continue;
            }

            let mut chosen = None;
            for rule in rules.iter().filter(|r| r.covers(depth)) {
                if rng.next_f64() < rule.rarity {
                    chosen = Some(rule);
                }
            }
            let Some(rule) = chosen else {
                continue;
            };

            stats.veins += 1;
            stats.tiles_placed += seed_vein(grid, rule, x as i64, y as i64, rng);
        }
    }

    debug!("Seeded {} ore veins ({} tiles)", stats.veins, stats.tiles_placed);
    stats
}

fn seed_vein(grid: &mut TileGrid, rule: &OreVeinRule, x: i64, y: i64, rng: &mut RngState) -> usize {
    let size = rng.range_inclusive(VEIN_MIN, VEIN_MAX);
    let height = grid.height();
    let mut placed = 0;
    for i in 0..size {
        let (vx, vy) = if i == 0 {
            (x, y)
        } else {
            (
                x + rng.range_inclusive(-VEIN_SPREAD, VEIN_SPREAD),
                y + rng.range_inclusive(-VEIN_SPREAD, VEIN_SPREAD),
            )
        };
        if vx < 0 || vy < 0 {
            continue;
        }
        let (ux, uy) = (vx as usize, vy as usize);
        let eligible = grid.get(ux, uy).is_some_and(|t| t.is_plain_rock())
            && rule.covers(row_fraction(uy, height));
        if eligible && grid.set(ux, uy, rule.tile) {
            placed += 1;
        }
    }
    placed
}
