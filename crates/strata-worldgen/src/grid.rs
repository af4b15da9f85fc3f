//! Fixed-size row-major tile storage.

use serde::{Deserialize, Serialize};
use strata_common::{StrataError, TileCoord};

use crate::tile::Tile;

/// World tile storage, `height` rows of `width` tiles, row 0 at the top.
///
/// Dimensions are fixed for the lifetime of the grid, and the
/// `OutOfBounds` sentinel is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

/// Unchecked wire form of [`TileGrid`].
#[derive(Deserialize)]
struct RawGrid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl TryFrom<RawGrid> for TileGrid {
    type Error = StrataError;

    fn try_from(raw: RawGrid) -> Result<Self, Self::Error> {
        if raw.width.checked_mul(raw.height) != Some(raw.tiles.len()) {
            return Err(StrataError::Serialization(format!(
                "{} tiles do not fill a {}x{} grid",
                raw.tiles.len(),
                raw.width,
                raw.height
            )));
        }
        if raw.tiles.contains(&Tile::OutOfBounds) {
            return Err(StrataError::Serialization(
                "grid stores the out-of-bounds sentinel".into(),
            ));
        }
        Ok(Self {
            width: raw.width,
            height: raw.height,
            tiles: raw.tiles,
        })
    }
}

impl TileGrid {
    /// Creates a grid with every cell set to `fill`. A sentinel fill
    /// becomes air.
    #[must_use]
    pub fn new(width: usize, height: usize, fill: Tile) -> Self {
        let fill = if fill == Tile::OutOfBounds { Tile::Air } else { fill };
        Self {
            width,
            height,
            tiles: vec![fill; width * height],
        }
    }

    /// Grid width in tiles.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Grid height in tiles.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Check if a position is inside the grid.
    #[must_use]
    pub const fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Tile at an in-range position.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<Tile> {
        if self.contains(x, y) {
            Some(self.tiles[y * self.width + x])
        } else {
            None
        }
    }

    /// Tile at any position; `Tile::OutOfBounds` outside the grid.
    #[must_use]
    pub fn tile_at(&self, x: i64, y: i64) -> Tile {
        let coord = TileCoord::new(x, y);
        if coord.is_within(self.width, self.height) {
            self.tiles[y as usize * self.width + x as usize]
        } else {
            Tile::OutOfBounds
        }
    }

    /// Writes a tile. Returns false (and writes nothing) when out of range
    /// or when asked to store the sentinel.
    pub fn set(&mut self, x: usize, y: usize, tile: Tile) -> bool {
        if !self.contains(x, y) || tile == Tile::OutOfBounds {
            return false;
        }
        self.tiles[y * self.width + x] = tile;
        true
    }

    /// Clamps a signed position to the nearest valid cell.
    #[must_use]
    pub fn clamp(&self, x: i64, y: i64) -> (usize, usize) {
        TileCoord::new(x, y).clamp_to(self.width, self.height)
    }

    /// One row of tiles.
    #[must_use]
    pub fn row(&self, y: usize) -> &[Tile] {
        let start = y * self.width;
        &self.tiles[start..start + self.width]
    }

    /// Iterates `(x, y, tile)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        let width = self.width;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, &tile)| (i % width, i / width, tile))
    }

    /// Number of cells holding `tile`.
    #[must_use]
    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }

    /// Number of cells satisfying a predicate.
    pub fn count_where(&self, pred: impl Fn(Tile) -> bool) -> usize {
        self.tiles.iter().filter(|&&t| pred(t)).count()
    }

    /// Raw tile ids, row-major. Two grids are equal iff their bytes are.
    #[must_use]
    pub fn as_bytes(&self) -> Vec<u8> {
        self.tiles.iter().map(|t| t.id()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid() {
        let grid = TileGrid::new(8, 4, Tile::Stone);
        assert_eq!(grid.width(), 8);
        assert_eq!(grid.height(), 4);
        assert_eq!(grid.count(Tile::Stone), 32);
    }

    #[test]
    fn test_tile_at_out_of_bounds() {
        let grid = TileGrid::new(4, 4, Tile::Dirt);
        assert_eq!(grid.tile_at(0, 0), Tile::Dirt);
        assert_eq!(grid.tile_at(-1, 0), Tile::OutOfBounds);
        assert_eq!(grid.tile_at(0, 4), Tile::OutOfBounds);
        assert_eq!(grid.tile_at(i64::MAX, i64::MIN), Tile::OutOfBounds);
    }

    #[test]
    fn test_set_and_get() {
        let mut grid = TileGrid::new(4, 4, Tile::Air);
        assert!(grid.set(2, 3, Tile::Gold));
        assert_eq!(grid.get(2, 3), Some(Tile::Gold));
        assert!(!grid.set(4, 0, Tile::Gold));
        assert!(!grid.set(0, 0, Tile::OutOfBounds));
        assert_eq!(grid.get(0, 0), Some(Tile::Air));
    }

    #[test]
    fn test_iter_is_row_major() {
        let mut grid = TileGrid::new(3, 2, Tile::Air);
        grid.set(1, 1, Tile::Stone);
        let cells: Vec<_> = grid.iter().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[4], (1, 1, Tile::Stone));
        assert_eq!(grid.row(1), &[Tile::Air, Tile::Stone, Tile::Air]);
    }

    #[test]
    fn test_deserialize_checks_shape_and_sentinel() {
        let text = "width = 2\nheight = 1\ntiles = [\"Stone\", \"Gold\"]\n";
        let grid: TileGrid = toml::from_str(text).expect("valid grid");
        assert_eq!(grid.get(1, 0), Some(Tile::Gold));

        let short = toml::from_str::<TileGrid>("width = 3\nheight = 2\ntiles = [\"Stone\"]\n");
        assert!(short.is_err());

        let sentinel =
            toml::from_str::<TileGrid>("width = 1\nheight = 1\ntiles = [\"OutOfBounds\"]\n");
        assert!(sentinel.is_err());

        let text = toml::to_string(&TileGrid::new(2, 2, Tile::Dirt)).expect("serialize");
        let reloaded: TileGrid = toml::from_str(&text).expect("reload");
        assert_eq!(reloaded, TileGrid::new(2, 2, Tile::Dirt));
    }

    #[test]
    fn test_sentinel_fill_becomes_air() {
        let grid = TileGrid::new(2, 2, Tile::OutOfBounds);
        assert_eq!(grid.count(Tile::Air), 4);
    }

    #[test]
    fn test_as_bytes() {
        let grid = TileGrid::new(2, 1, Tile::Bedrock);
        assert_eq!(grid.as_bytes(), vec![8, 8]);
    }
}
