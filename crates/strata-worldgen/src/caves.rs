//! Random-walk cave carving.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::WorldConfig;
use crate::grid::TileGrid;
use crate::layer::{LayerId, LayerTable};
use crate::rng::RngState;
use crate::tile::Tile;

/// Maximum heading change per step, in radians, either way.
const HEADING_JITTER: f64 = 0.3;

/// Rectangle caves may touch: `[x_min, x_max) x [y_min, y_max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarveRegion {
    /// First column
    pub x_min: usize,
    /// One past the last column
    pub x_max: usize,
    /// First row
    pub y_min: usize,
    /// One past the last row
    pub y_max: usize,
}

impl CarveRegion {
    /// Region below the underground boundary, `margin` tiles in from the
    /// sides and bottom. `None` when that leaves nothing.
    #[must_use]
    pub fn for_grid(grid: &TileGrid, layers: &LayerTable, margin: usize) -> Option<Self> {
        let margin = margin.max(1);
        let region = Self {
            x_min: margin,
            x_max: grid.width().saturating_sub(margin),
            y_min: layers.row_start(LayerId::Underground, grid.height()).max(margin),
            y_max: grid.height().saturating_sub(margin),
        };
        (region.x_min < region.x_max && region.y_min < region.y_max).then_some(region)
    }

    /// Check if a cell is inside the region.
    #[must_use]
    pub const fn contains(&self, x: i64, y: i64) -> bool {
        x >= self.x_min as i64
            && x < self.x_max as i64
            && y >= self.y_min as i64
            && y < self.y_max as i64
    }

    fn clamp(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x.clamp(self.x_min as f64, (self.x_max - 1) as f64),
            y.clamp(self.y_min as f64, (self.y_max - 1) as f64),
        )
    }
}

/// What the carver did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaveStats {
    /// Walks performed
    pub walks: usize,
    /// Total steps taken
    pub steps: usize,
    /// Tiles turned to air
    pub tiles_cleared: usize,
}

/// Carves `config.cave_count` random-walk tunnels below the underground
/// boundary. Never touches cells outside the carve region.
pub fn carve_caves(
    grid: &mut TileGrid,
    config: &WorldConfig,
    layers: &LayerTable,
    rng: &mut RngState,
) -> CaveStats {
    let mut stats = CaveStats::default();
    let Some(region) = CarveRegion::for_grid(grid, layers, config.cave_margin) else {
        debug!("No room for caves");
        return stats;
    };

    for _ in 0..config.cave_count {
        let mut x = rng.range_f64(region.x_min as f64, region.x_max as f64);
        let mut y = rng.range_f64(region.y_min as f64, region.y_max as f64);
        let mut heading = rng.angle();
        let length =
            rng.range_inclusive(config.cave_length_min as i64, config.cave_length_max as i64)
                as usize;

        for step in 0..length {
            let progress = step as f64 / length.max(1) as f64;
            let radius = config.cave_radius * (1.0 - 0.5 * progress) + rng.range_f64(-0.5, 0.5);
            stats.tiles_cleared += clear_disc(grid, &region, x, y, radius.max(0.5));

            heading += (rng.next_f64() - 0.5) * 2.0 * HEADING_JITTER;
            (x, y) = region.clamp(x + heading.cos(), y + heading.sin());
            stats.steps += 1;
        }
        stats.walks += 1;
    }

    debug!(
        "Carved {} caves ({} steps, {} tiles cleared)",
        stats.walks, stats.steps, stats.tiles_cleared
    );
    stats
}

/// Clears the part of a disc that lies inside `region`. The scan is bounded
/// by the region, so an oversized radius costs no more than the region.
fn clear_disc(grid: &mut TileGrid, region: &CarveRegion, cx: f64, cy: f64, radius: f64) -> usize {
    if !radius.is_finite() || radius < 0.0 {
        return 0;
    }
    let r_sq = radius * radius;
    let x_lo = (cx - radius).floor().max(region.x_min as f64) as usize;
    let x_hi = (cx + radius).ceil().min((region.x_max - 1) as f64) as usize;
    let y_lo = (cy - radius).floor().max(region.y_min as f64) as usize;
    let y_hi = (cy + radius).ceil().min((region.y_max - 1) as f64) as usize;

    let mut cleared = 0;
    for y in y_lo..=y_hi {
        for x in x_lo..=x_hi {
            let dx = x as f64 - cx;
            let dy = y as f64 - cy;
            if dx * dx + dy * dy > r_sq {
                continue;
            }
            if grid.get(x, y).is_some_and(|t| !t.is_air()) {
                grid.set(x, y, Tile::Air);
                cleared += 1;
            }
        }
    }
    cleared
}
