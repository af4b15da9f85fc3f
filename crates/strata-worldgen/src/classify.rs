//! Biome classification.
//!
//! Classification is split in two: [`BiomeClassifier::sample`] gathers every
//! noise-derived input for a tile, and [`BiomeClassifier::decide`] walks the
//! band's ordered rule list. The first matching rule wins, so rule order is
//! part of the contract.

use serde::{Deserialize, Serialize};

use crate::biome::BiomeId;
use crate::config::{ClimateParams, WorldConfig};
use crate::heightmap::surface_height;
use crate::layer::{LayerId, LayerTable};
use crate::noise::NoiseSource;

/// Half-width of the neighbourhood used for magical density.
const MANA_RADIUS: i64 = 2;
/// Mana sample value above which a neighbour counts as magical.
const MANA_THRESHOLD: f64 = 0.35;
/// Frequency of the mana channel.
const MANA_SCALE: f64 = 0.05;

/// Everything the rule lists look at for one tile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifierInput {
    /// Band of the tile
    pub layer: LayerId,
    /// Temperature channel, `[-1, 1)`; varies with the column only
    pub temperature: f64,
    /// Humidity channel, `[-1, 1)`; varies with the row only
    pub humidity: f64,
    /// Distance from world centre over the larger dimension
    pub distance_from_center: f64,
    /// Column surface elevation within the surface band, `[0, 1]`
    pub altitude: f64,
    /// Structure channel, `[-1, 1)`
    pub structure_noise: f64,
    /// Fraction of magical neighbours, `[0, 1]`
    pub magical_density: f64,
}

impl ClassifierInput {
    /// Neutral input for a band: mild climate, world centre, mid altitude.
    #[must_use]
    pub const fn neutral(layer: LayerId) -> Self {
        Self {
            layer,
            temperature: 0.0,
            humidity: 0.0,
            distance_from_center: 0.0,
            altitude: 0.5,
            structure_noise: 0.0,
            magical_density: 0.0,
        }
    }
}

type Predicate = fn(&ClassifierInput, &ClimateParams) -> bool;

/// One `(predicate, biome)` entry of a band's rule list.
#[derive(Clone, Copy)]
struct Rule {
    when: Predicate,
    biome: BiomeId,
}

const fn rule(when: Predicate, biome: BiomeId) -> Rule {
    Rule { when, biome }
}

// ============================================================================
// Rule lists
// ============================================================================

const SURFACE_RULES: &[Rule] = &[
    rule(|i, p| i.distance_from_center > p.edge_threshold, BiomeId::Ocean),
    rule(
        |i, p| i.altitude > p.mountain_threshold && i.structure_noise > 0.3,
        BiomeId::Mountain,
    ),
    rule(|i, _| i.temperature > 0.8 && i.humidity < 0.15, BiomeId::VolcanicWasteland),
    rule(|i, _| i.temperature > 0.6 && i.humidity < 0.3, BiomeId::AridDesert),
    rule(|i, _| i.temperature < -0.6, BiomeId::FrozenTundra),
    rule(|i, _| i.humidity > 0.7 && i.altitude < 0.3, BiomeId::Swamp),
    rule(|i, _| i.temperature > 0.7 && i.humidity > 0.6, BiomeId::TropicalJungle),
    rule(
        |i, _| i.temperature > 0.2 && i.temperature < 0.7 && i.humidity > 0.4,
        BiomeId::TemperateForest,
    ),
];

const PARADISE_RULES: &[Rule] = &[rule(|i, _| i.magical_density > 0.3, BiomeId::CrystalCaves)];

const UNDERGROUND_RULES: &[Rule] =
    &[rule(|i, _| i.magical_density > 0.4, BiomeId::CrystalCaves)];

const DEEP_CORE_RULES: &[Rule] = &[
    rule(|i, _| i.humidity > 0.75, BiomeId::AbyssalDepths),
    rule(|i, _| i.magical_density > 0.4, BiomeId::CrystalCore),
];

fn rules_for(layer: LayerId) -> &'static [Rule] {
    match layer {
        LayerId::Surface => SURFACE_RULES,
        LayerId::Paradise => PARADISE_RULES,
        LayerId::Underground => UNDERGROUND_RULES,
        LayerId::DeepCore => DEEP_CORE_RULES,
        LayerId::Space | LayerId::Sky | LayerId::Hell => &[],
    }
}

/// Fallback when a band is missing from a custom table.
const fn builtin_default(layer: LayerId) -> BiomeId {
    match layer {
        LayerId::Space => BiomeId::OuterSpace,
        LayerId::Paradise => BiomeId::ParadiseMeadow,
        LayerId::Sky => BiomeId::FloatingIslands,
        LayerId::Surface => BiomeId::Plains,
        LayerId::Underground | LayerId::DeepCore => BiomeId::DeepCaverns,
        LayerId::Hell => BiomeId::InfernalDepths,
    }
}

// ============================================================================
// Classifier
// ============================================================================

/// Maps tile positions to biomes. Pure in `(seed, x, y, width, height)`.
#[derive(Debug, Clone)]
pub struct BiomeClassifier {
    height_noise: NoiseSource,
    temperature: NoiseSource,
    humidity: NoiseSource,
    structure: NoiseSource,
    mana: NoiseSource,
    layers: LayerTable,
    params: ClimateParams,
}

impl BiomeClassifier {
    /// Creates a classifier for a seed.
    #[must_use]
    pub fn new(seed: u64, layers: LayerTable, params: ClimateParams) -> Self {
        let base = NoiseSource::new(seed);
        Self {
            height_noise: base,
            temperature: base.channel(1),
            humidity: base.channel(2),
            structure: base.channel(3),
            mana: base.channel(4),
            layers,
            params,
        }
    }

    /// Creates a classifier from a world config and the standard bands.
    #[must_use]
    pub fn from_config(config: &WorldConfig) -> Self {
        Self::new(config.seed, LayerTable::standard(), config.climate)
    }

    /// Band table in use.
    #[must_use]
    pub fn layers(&self) -> &LayerTable {
        &self.layers
    }

    /// Thresholds in use.
    #[must_use]
    pub const fn params(&self) -> &ClimateParams {
        &self.params
    }

    /// Biome of tile `(x, y)` in a `width x height` world. Positions are
    /// clamped into the world; an empty world yields the surface default.
    #[must_use]
    pub fn classify(&self, x: usize, y: usize, width: usize, height: usize) -> BiomeId {
        if width == 0 || height == 0 {
            return self.default_for(LayerId::Surface);
        }
        let input = self.sample(x.min(width - 1), y.min(height - 1), width, height);
        self.decide(&input)
    }

    /// Gathers the classifier inputs for an in-range tile.
    #[must_use]
    pub fn sample(&self, x: usize, y: usize, width: usize, height: usize) -> ClassifierInput {
        let layer = self.layers.layer_at_row(y, height).id;
        let scale = self.params.climate_scale;
        let (fx, fy) = (x as f64, y as f64);

        let cx = width as f64 / 2.0;
        let cy = height as f64 / 2.0;
        let distance_from_center = (fx - cx).hypot(fy - cy) / width.max(height) as f64;

        ClassifierInput {
            layer,
            temperature: self.temperature.noise2d(fx * scale, 0.0),
            humidity: self.humidity.noise2d(0.0, fy * scale),
            distance_from_center,
            altitude: self.altitude(x, height),
            structure_noise: self.structure.noise2d(fx * scale * 0.5, fy * scale * 0.5),
            magical_density: self.magical_density(x, y),
        }
    }

    /// Applies the band's rule list; first match wins, else the band default.
    #[must_use]
    pub fn decide(&self, input: &ClassifierInput) -> BiomeId {
        rules_for(input.layer)
            .iter()
            .find(|r| (r.when)(input, &self.params))
            .map_or_else(|| self.default_for(input.layer), |r| r.biome)
    }

    /// Biome used by a band when no rule matches.
    #[must_use]
    pub fn default_for(&self, layer: LayerId) -> BiomeId {
        self.layers
            .get(layer)
            .map_or_else(|| builtin_default(layer), |l| l.default_biome)
    }

    /// Classifies every tile of a `width x height` world.
    #[must_use]
    pub fn classify_grid(&self, width: usize, height: usize) -> BiomeMap {
        let mut biomes = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                biomes.push(self.classify(x, y, width, height));
            }
        }
        BiomeMap {
            width,
            height,
            biomes,
        }
    }

    fn altitude(&self, x: usize, height: usize) -> f64 {
        let Some(band) = self.layers.get(LayerId::Surface) else {
            return 0.5;
        };
        let top = band.y_start * height as f64;
        let bottom = band.y_end * height as f64;
        if bottom <= top {
            return 0.5;
        }
        let row = surface_height(&self.height_noise, &self.layers, x, height) as f64;
        ((bottom - row) / (bottom - top)).clamp(0.0, 1.0)
    }

    fn magical_density(&self, x: usize, y: usize) -> f64 {
        let mut magical = 0u32;
        let mut total = 0u32;
        for dy in -MANA_RADIUS..=MANA_RADIUS {
            for dx in -MANA_RADIUS..=MANA_RADIUS {
                let sx = (x as i64 + dx) as f64 * MANA_SCALE;
                let sy = (y as i64 + dy) as f64 * MANA_SCALE;
                if self.mana.noise2d(sx, sy) > MANA_THRESHOLD {
                    magical += 1;
                }
                total += 1;
            }
        }
        f64::from(magical) / f64::from(total)
    }
}

/// Biome of every tile, row-major like the tile grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiomeMap {
    width: usize,
    height: usize,
    biomes: Vec<BiomeId>,
}

impl BiomeMap {
    /// Width in tiles.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in tiles.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Biome at an in-range tile.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<BiomeId> {
        if x < self.width && y < self.height {
            Some(self.biomes[y * self.width + x])
        } else {
            None
        }
    }

    /// Number of tiles per biome, indexed by discriminant.
    #[must_use]
    pub fn histogram(&self) -> [usize; BiomeId::COUNT] {
        let mut counts = [0; BiomeId::COUNT];
        for &b in &self.biomes {
            counts[b as usize] += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn classifier(seed: u64) -> BiomeClassifier {
        BiomeClassifier::new(seed, LayerTable::standard(), ClimateParams::default())
    }

    #[test]
    fn test_far_from_center_is_ocean() {
        let c = classifier(1);
        let mut input = ClassifierInput::neutral(LayerId::Surface);
        input.distance_from_center = 0.9;
        for (temperature, humidity) in [(0.95, 0.05), (-0.9, 0.9), (0.5, 0.5)] {
            input.temperature = temperature;
            input.humidity = humidity;
            input.altitude = 0.95;
            input.structure_noise = 0.9;
            assert_eq!(c.decide(&input), BiomeId::Ocean);
        }
    }

    #[test]
    fn test_surface_rule_order() {
        let c = classifier(1);
        let mut input = ClassifierInput::neutral(LayerId::Surface);

        input.altitude = 0.9;
        input.structure_noise = 0.5;
        assert_eq!(c.decide(&input), BiomeId::Mountain);

        let mut input = ClassifierInput::neutral(LayerId::Surface);
        input.temperature = 0.9;
        input.humidity = 0.1;
        assert_eq!(c.decide(&input), BiomeId::VolcanicWasteland);

        input.humidity = 0.2;
        assert_eq!(c.decide(&input), BiomeId::AridDesert);

        input.temperature = -0.8;
        assert_eq!(c.decide(&input), BiomeId::FrozenTundra);

        input.temperature = 0.0;
        input.humidity = 0.8;
        input.altitude = 0.2;
        assert_eq!(c.decide(&input), BiomeId::Swamp);

        input.temperature = 0.75;
        input.altitude = 0.5;
        assert_eq!(c.decide(&input), BiomeId::TropicalJungle);

        input.temperature = 0.4;
        input.humidity = 0.5;
        assert_eq!(c.decide(&input), BiomeId::TemperateForest);

        input.temperature = 0.0;
        assert_eq!(c.decide(&input), BiomeId::Plains);
    }

    #[test]
    fn test_deep_bands() {
        let c = classifier(3);
        let mut input = ClassifierInput::neutral(LayerId::DeepCore);
        assert_eq!(c.decide(&input), BiomeId::DeepCaverns);
        input.magical_density = 0.6;
        assert_eq!(c.decide(&input), BiomeId::CrystalCore);
        input.humidity = 0.9;
        assert_eq!(c.decide(&input), BiomeId::AbyssalDepths);

        let mut input = ClassifierInput::neutral(LayerId::Paradise);
        assert_eq!(c.decide(&input), BiomeId::ParadiseMeadow);
        input.magical_density = 0.35;
        assert_eq!(c.decide(&input), BiomeId::CrystalCaves);

        let input = ClassifierInput::neutral(LayerId::Underground);
        assert_eq!(c.decide(&input), BiomeId::DeepCaverns);
        assert_eq!(
            c.decide(&ClassifierInput::neutral(LayerId::Hell)),
            BiomeId::InfernalDepths
        );
        assert_eq!(
            c.decide(&ClassifierInput::neutral(LayerId::Space)),
            BiomeId::OuterSpace
        );
    }

    #[test]
    fn test_classify_matches_layer() {
        let c = classifier(42);
        assert_eq!(c.classify(10, 0, 64, 100), BiomeId::OuterSpace);
        assert_eq!(c.classify(10, 25, 64, 100), BiomeId::FloatingIslands);
        assert_eq!(c.classify(10, 95, 64, 100), BiomeId::InfernalDepths);
    }

    #[test]
    fn test_classify_grid_consistent() {
        let c = classifier(8);
        let map = c.classify_grid(32, 40);
        assert_eq!(map.get(5, 30), Some(c.classify(5, 30, 32, 40)));
        assert_eq!(map.get(32, 0), None);
        assert_eq!(map.histogram().iter().sum::<usize>(), 32 * 40);
    }

    #[test]
    fn test_climate_channels_follow_one_axis() {
        let c = classifier(17);
        let a = c.sample(30, 40, 512, 256);
        assert_eq!(a.temperature, c.sample(30, 60, 512, 256).temperature);
        assert_eq!(a.humidity, c.sample(50, 40, 512, 256).humidity);
        assert_ne!(a.temperature, c.sample(230, 40, 512, 256).temperature);
        assert_ne!(a.humidity, c.sample(30, 240, 512, 256).humidity);
    }

    #[test]
    fn test_humidity_is_signed() {
        let params = ClimateParams::default();
        let lowest = (0..20u64)
            .flat_map(|seed| {
                let c = classifier(seed);
                (0..2_000usize).step_by(7).map(move |y| c.sample(0, y, 64, 2_000).humidity)
            })
            .fold(f64::INFINITY, f64::min);
        assert!(lowest < 0.0, "lowest humidity {lowest}");
        assert!((params.climate_scale - 0.002).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_world() {
        assert_eq!(classifier(1).classify(3, 3, 0, 0), BiomeId::Plains);
    }

    proptest! {
        #[test]
        fn classification_is_total(seed in any::<u64>(), x in 0usize..200, y in 0usize..200) {
            let c = classifier(seed);
            let biome = c.classify(x, y, 128, 96);
            prop_assert!(BiomeId::ALL.contains(&biome));
            prop_assert_eq!(biome, c.classify(x, y, 128, 96));
        }
    }
}
