//! Coordinate types for pixel and tile positions.

use serde::{Deserialize, Serialize};

/// Pixel coordinate in world space (what the renderer and input report).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelCoord {
    /// X coordinate in pixels
    pub x: i64,
    /// Y coordinate in pixels
    pub y: i64,
}

impl PixelCoord {
    /// Creates a new pixel coordinate.
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Converts to the tile containing this pixel.
    #[must_use]
    pub const fn to_tile_coord(self, tile_size: u32) -> TileCoord {
        let size = tile_size as i64;
        TileCoord {
            x: self.x.div_euclid(size),
            y: self.y.div_euclid(size),
        }
    }
}

/// Tile coordinate (column and row in the tile grid, 0 = top row).
///
/// Signed so that callers can express positions outside the grid; queries
/// clamp or return a sentinel for those.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    /// Column
    pub x: i64,
    /// Row
    pub y: i64,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Converts to the pixel coordinate of the tile's top-left corner.
    #[must_use]
    pub const fn to_pixel_coord(self, tile_size: u32) -> PixelCoord {
        PixelCoord {
            x: self.x * (tile_size as i64),
            y: self.y * (tile_size as i64),
        }
    }

    /// Returns true if the coordinate lies inside a `width x height` grid.
    #[must_use]
    pub const fn is_within(self, width: usize, height: usize) -> bool {
        self.x >= 0
            && self.y >= 0
            && (self.x as u64) < width as u64
            && (self.y as u64) < height as u64
    }

    /// Clamps into a non-empty `width x height` grid, returning indices.
    #[must_use]
    pub fn clamp_to(self, width: usize, height: usize) -> (usize, usize) {
        let max_x = width.saturating_sub(1) as i64;
        let max_y = height.saturating_sub(1) as i64;
        (self.x.clamp(0, max_x) as usize, self.y.clamp(0, max_y) as usize)
    }

    /// Squared Euclidean distance to another tile.
    #[must_use]
    pub const fn distance_sq(self, other: Self) -> i64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

impl From<(i64, i64)> for TileCoord {
    fn from((x, y): (i64, i64)) -> Self {
        Self::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_tile_to_pixel() {
        let tile = TileCoord::new(3, 4);
        assert_eq!(tile.to_pixel_coord(16), PixelCoord::new(48, 64));
    }

    #[test]
    fn test_is_within() {
        assert!(TileCoord::new(0, 0).is_within(4, 4));
        assert!(TileCoord::new(3, 3).is_within(4, 4));
        assert!(!TileCoord::new(4, 0).is_within(4, 4));
        assert!(!TileCoord::new(-1, 2).is_within(4, 4));
    }

    #[test]
    fn test_clamp_to() {
        assert_eq!(TileCoord::new(-5, 100).clamp_to(10, 20), (0, 19));
        assert_eq!(TileCoord::new(4, 4).clamp_to(10, 20), (4, 4));
    }

    proptest! {
        #[test]
        fn clamped_coords_are_within(
            x in -1000i64..1000,
            y in -1000i64..1000,
            w in 1usize..64,
            h in 1usize..64,
        ) {
            let (cx, cy) = TileCoord::new(x, y).clamp_to(w, h);
            prop_assert!(TileCoord::new(cx as i64, cy as i64).is_within(w, h));
        }

        #[test]
        fn pixel_round_trip_stays_in_tile(x in -10_000i64..10_000, y in -10_000i64..10_000) {
            let tile = PixelCoord::new(x, y).to_tile_coord(16);
            let corner = tile.to_pixel_coord(16);
            prop_assert!(corner.x <= x && x < corner.x + 16);
            prop_assert!(corner.y <= y && y < corner.y + 16);
        }
    }
}
