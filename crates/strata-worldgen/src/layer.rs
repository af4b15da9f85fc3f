//! Vertical bands of the world.

use serde::{Deserialize, Serialize};
use strata_common::{ConfigError, ConfigResult};

use crate::biome::BiomeId;

/// Tolerance when checking that adjacent bands meet.
const EDGE_EPSILON: f64 = 1e-9;

/// Identifies a vertical band, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LayerId {
    /// Open space above everything
    Space,
    /// Paradise heights
    Paradise,
    /// Sky and floating islands
    Sky,
    /// Ground level
    Surface,
    /// Caves and ore
    Underground,
    /// Deep core
    DeepCore,
    /// Infernal base
    Hell,
}

impl LayerId {
    /// Human-readable name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Space => "Space",
            Self::Paradise => "Paradise",
            Self::Sky => "Sky",
            Self::Surface => "Surface",
            Self::Underground => "Underground",
            Self::DeepCore => "Deep Core",
            Self::Hell => "Hell",
        }
    }
}

/// One band of the layer table, expressed as fractions of world height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Band identifier
    pub id: LayerId,
    /// Fraction of height where the band starts (inclusive, 0 = top)
    pub y_start: f64,
    /// Fraction of height where the band ends (exclusive)
    pub y_end: f64,
    /// Biome used when no classifier rule matches
    pub default_biome: BiomeId,
}

impl Layer {
    /// Creates a layer.
    #[must_use]
    pub const fn new(id: LayerId, y_start: f64, y_end: f64, default_biome: BiomeId) -> Self {
        Self {
            id,
            y_start,
            y_end,
            default_biome,
        }
    }

    /// Check if a height fraction falls inside this band.
    #[must_use]
    pub fn contains(&self, fraction: f64) -> bool {
        fraction >= self.y_start && fraction < self.y_end
    }
}

/// Ordered, validated set of bands partitioning `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerTable {
    layers: Vec<Layer>,
}

impl Default for LayerTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl LayerTable {
    /// The seven-band table used by default.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            layers: vec![
                Layer::new(LayerId::Space, 0.00, 0.05, BiomeId::OuterSpace),
                Layer::new(LayerId::Paradise, 0.05, 0.20, BiomeId::ParadiseMeadow),
                Layer::new(LayerId::Sky, 0.20, 0.35, BiomeId::FloatingIslands),
                Layer::new(LayerId::Surface, 0.35, 0.55, BiomeId::Plains),
                Layer::new(LayerId::Underground, 0.55, 0.75, BiomeId::DeepCaverns),
                Layer::new(LayerId::DeepCore, 0.75, 0.90, BiomeId::DeepCaverns),
                Layer::new(LayerId::Hell, 0.90, 1.00, BiomeId::InfernalDepths),
            ],
        }
    }

    /// Builds a table from arbitrary bands, checking that they are sorted,
    /// non-empty, contiguous and cover exactly `[0, 1]`.
    pub fn new(layers: Vec<Layer>) -> ConfigResult<Self> {
        let (first, last) = match (layers.first(), layers.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(ConfigError::InvalidLayers("table is empty".into())),
        };
        if first.y_start.abs() > EDGE_EPSILON {
            return Err(ConfigError::InvalidLayers(format!(
                "first band starts at {} instead of 0",
                first.y_start
            )));
        }
        if (last.y_end - 1.0).abs() > EDGE_EPSILON {
            return Err(ConfigError::InvalidLayers(format!(
                "last band ends at {} instead of 1",
                last.y_end
            )));
        }
        for layer in &layers {
            if layer.y_end <= layer.y_start {
                return Err(ConfigError::InvalidLayers(format!(
                    "{} band is empty",
                    layer.id.display_name()
                )));
            }
        }
        for pair in layers.windows(2) {
            if (pair[0].y_end - pair[1].y_start).abs() > EDGE_EPSILON {
                return Err(ConfigError::InvalidLayers(format!(
                    "gap or overlap between {} and {}",
                    pair[0].id.display_name(),
                    pair[1].id.display_name()
                )));
            }
        }
        Ok(Self { layers })
    }

    /// All bands, top to bottom.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Band with the given id.
    #[must_use]
    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Band containing a height fraction. Values outside `[0, 1]` are
    /// clamped, and `1.0` maps to the bottom band.
    #[must_use]
    pub fn layer_for_height_fraction(&self, fraction: f64) -> &Layer {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        let idx = self.layers.partition_point(|l| l.y_end <= fraction);
        &self.layers[idx.min(self.layers.len() - 1)]
    }

    /// Band containing a tile row of a world `height` rows tall.
    #[must_use]
    pub fn layer_at_row(&self, y: usize, height: usize) -> &Layer {
        self.layer_for_height_fraction(row_fraction(y, height))
    }

    /// First row belonging to band `id`, or `height` if the band is absent.
    #[must_use]
    pub fn row_start(&self, id: LayerId, height: usize) -> usize {
        let Some(layer) = self.get(id) else {
            return height;
        };
        let mut row = (layer.y_start * height as f64).floor() as usize;
        while row < height && row_fraction(row, height) < layer.y_start {
            row += 1;
        }
        while row > 0 && row_fraction(row - 1, height) >= layer.y_start {
            row -= 1;
        }
        row.min(height)
    }

    /// Checks that every band owns at least one row at this height.
    pub fn check_resolution(&self, height: usize) -> ConfigResult<()> {
        for layer in &self.layers {
            let start = self.row_start(layer.id, height);
            if start >= height || self.layer_at_row(start, height).id != layer.id {
                return Err(ConfigError::TooShort {
                    height,
                    layers: self.layers.len(),
                });
            }
        }
        Ok(())
    }
}

/// Height fraction of a row, 0 at the top.
#[must_use]
pub fn row_fraction(y: usize, height: usize) -> f64 {
    if height == 0 {
        return 0.0;
    }
    y as f64 / height as f64
}
