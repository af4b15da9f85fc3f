//! Surface line synthesis.

use serde::{Deserialize, Serialize};

use crate::layer::{LayerId, LayerTable};
use crate::noise::NoiseSource;

/// Octaves of the surface line as `(frequency, amplitude)`, amplitude being a
/// fraction of world height.
pub const SURFACE_OCTAVES: [(f64, f64); 3] = [(0.01, 0.05), (0.05, 0.02), (0.1, 0.01)];

/// Row at which the surface line sits when every octave samples zero.
#[must_use]
pub fn base_row(layers: &LayerTable, height: usize) -> f64 {
    let fraction = layers
        .get(LayerId::Surface)
        .map_or(0.45, |l| (l.y_start + l.y_end) * 0.5);
    fraction * height as f64
}

/// Surface row for column `x` in a world `height` rows tall.
///
/// Pure in `(seed, x, height)`; always within `[0, height)`.
#[must_use]
pub fn surface_height(noise: &NoiseSource, layers: &LayerTable, x: usize, height: usize) -> usize {
    if height == 0 {
        return 0;
    }
    let mut row = base_row(layers, height);
    for (i, (frequency, amplitude)) in SURFACE_OCTAVES.iter().enumerate() {
        let phase = 0.37 * (i + 1) as f64;
        row += noise.noise2d(x as f64 * frequency, phase) * amplitude * height as f64;
    }
    (row.floor().max(0.0) as usize).min(height - 1)
}

/// Surface row of every column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeightMap {
    rows: Vec<usize>,
}

impl HeightMap {
    /// Computes the surface line for a `width x height` world.
    #[must_use]
    pub fn synthesize(
        noise: &NoiseSource,
        layers: &LayerTable,
        width: usize,
        height: usize,
    ) -> Self {
        let rows = (0..width)
            .map(|x| surface_height(noise, layers, x, height))
            .collect();
        Self { rows }
    }

    /// Surface row of column `x`, if in range.
    #[must_use]
    pub fn get(&self, x: usize) -> Option<usize> {
        self.rows.get(x).copied()
    }

    /// All rows, one per column.
    #[must_use]
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Highest surface point (smallest row).
    #[must_use]
    pub fn peak(&self) -> Option<usize> {
        self.rows.iter().copied().min()
    }

    /// Lowest surface point (largest row).
    #[must_use]
    pub fn trough(&self) -> Option<usize> {
        self.rows.iter().copied().max()
    }
}
