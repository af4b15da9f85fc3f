//! Destructible terrain: clearing discs of tiles.
//!
//! This module provides the exact disc-clearing primitive used for direct
//! destruction requests, the falloff-weighted effects applied by natural
//! disasters, and the event records they produce.

use serde::{Deserialize, Serialize};
use strata_worldgen::{RngState, Tile, TileGrid};

/// Destroy chance at the centre of a disaster; scales down with distance.
const DESTROY_CHANCE: f64 = 0.8;

/// Local intensity above which a cratering disaster always clears.
const CRATER_THRESHOLD: f64 = 0.7;

const LAVA: &[Tile] = &[Tile::Lava];
const WATER: &[Tile] = &[Tile::Water];
const CRYSTALS: &[Tile] = &[Tile::Crystal, Tile::Amethyst, Tile::Diamond];

/// What caused a destruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DestructionKind {
    /// Direct request with an explicit radius
    Direct,
    /// Explosion
    Explosion,
    /// Earthquake
    Earthquake,
    /// Meteor impact
    Meteor,
    /// Volcanic eruption
    VolcanicEruption,
    /// Flood
    Flood,
    /// Tornado
    Tornado,
    /// Lightning strike
    LightningStrike,
    /// Avalanche
    Avalanche,
    /// Sinkhole
    Sinkhole,
    /// Crystal growth shattering rock
    CrystalGrowth,
}

impl DestructionKind {
    /// Every natural disaster kind.
    pub const NATURAL: [DestructionKind; 10] = [
        Self::Explosion,
        Self::Earthquake,
        Self::Meteor,
        Self::VolcanicEruption,
        Self::Flood,
        Self::Tornado,
        Self::LightningStrike,
        Self::Avalanche,
        Self::Sinkhole,
        Self::CrystalGrowth,
    ];

    /// Radius in pixels at intensity 1.
    #[must_use]
    pub const fn base_radius_px(self) -> f64 {
        match self {
            Self::Direct | Self::Explosion => 50.0,
            Self::Earthquake => 200.0,
            Self::Meteor => 80.0,
            Self::VolcanicEruption => 150.0,
            Self::Flood => 300.0,
            Self::Tornado => 100.0,
            Self::LightningStrike => 30.0,
            Self::Avalanche => 120.0,
            Self::Sinkhole => 60.0,
            Self::CrystalGrowth => 40.0,
        }
    }

    /// How long effects of this kind stay relevant, in milliseconds.
    #[must_use]
    pub const fn duration_ms(self) -> u64 {
        match self {
            Self::Direct => 5_000,
            Self::Explosion => 1_000,
            Self::Earthquake => 10_000,
            Self::Meteor => 2_000,
            Self::VolcanicEruption => 30_000,
            Self::Flood => 60_000,
            Self::Tornado => 15_000,
            Self::LightningStrike => 500,
            Self::Avalanche => 8_000,
            Self::Sinkhole => 5_000,
            Self::CrystalGrowth => 20_000,
        }
    }

    /// What this kind does to the tiles it reaches.
    #[must_use]
    pub const fn effect(self) -> DisasterEffect {
        let base = DisasterEffect {
            destroys: true,
            crater: false,
            fill: &[],
            fill_chance: 0.0,
        };
        match self {
            Self::Meteor => DisasterEffect { crater: true, ..base },
            Self::VolcanicEruption => DisasterEffect {
                fill: LAVA,
                fill_chance: 0.3,
                ..base
            },
            Self::Flood => DisasterEffect {
                destroys: false,
                fill: WATER,
                fill_chance: 0.4,
                ..base
            },
            Self::CrystalGrowth => DisasterEffect {
                destroys: false,
                fill: CRYSTALS,
                fill_chance: 0.2,
                ..base
            },
            Self::LightningStrike => DisasterEffect { destroys: false, ..base },
            _ => base,
        }
    }

    /// Radius in tiles for a given intensity and tile size.
    #[must_use]
    pub fn radius_tiles(self, intensity: f64, tile_size: u32) -> f64 {
        let intensity = if intensity.is_finite() { intensity.max(0.0) } else { 1.0 };
        self.base_radius_px() * intensity / f64::from(tile_size.max(1))
    }
}

/// Record of one destruction. Never mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DestructionEvent {
    /// Centre column, after clamping
    pub x: usize,
    /// Centre row, after clamping
    pub y: usize,
    /// Radius in tiles
    pub radius: f64,
    /// Runtime tick at which it happened
    pub tick: u64,
    /// Cause
    pub kind: DestructionKind,
    /// Tiles actually removed
    pub cleared: usize,
    /// Tiles turned into something other than air
    #[serde(default)]
    pub transformed: usize,
    /// How many ticks consumers should keep it around
    pub retain_ticks: u64,
}

impl DestructionEvent {
    /// First tick at which the event is past its retention window.
    #[must_use]
    pub const fn expires_at(&self) -> u64 {
        self.tick.saturating_add(self.retain_ticks)
    }
}

/// Per-tile behaviour of a disaster kind.
///
/// Each solid tile in reach rolls against its local intensity
/// `1 - distance / radius`: destruction at `0.8 × intensity`, then a fill
/// from `fill` at `fill_chance × intensity`. A fill wins over destruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisasterEffect {
    /// Whether tiles are cleared to air
    pub destroys: bool,
    /// Whether the inner region is always cleared
    pub crater: bool,
    /// Tiles a fill picks from; empty for none
    pub fill: &'static [Tile],
    /// Fill chance at full intensity
    pub fill_chance: f64,
}

/// Tile counts produced by [`apply_disaster`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisasterOutcome {
    /// Tiles cleared to air
    pub cleared: usize,
    /// Tiles replaced by the kind's fill
    pub transformed: usize,
}

/// Tile access used by destruction.
///
/// This trait abstracts world storage so that destruction works on the
/// generator's grid or any other tile store.
pub trait TerrainAccess {
    /// Width and height in tiles.
    fn dimensions(&self) -> (usize, usize);

    /// Tile at an in-range position.
    fn tile(&self, x: usize, y: usize) -> Tile;

    /// Overwrites an in-range position.
    fn set_tile(&mut self, x: usize, y: usize, tile: Tile);
}

impl TerrainAccess for TileGrid {
    fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    fn tile(&self, x: usize, y: usize) -> Tile {
        self.get(x, y).unwrap_or(Tile::OutOfBounds)
    }

    fn set_tile(&mut self, x: usize, y: usize, tile: Tile) {
        self.set(x, y, tile);
    }
}

/// A tile removed by destruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearedTile {
    /// Column
    pub x: usize,
    /// Row
    pub y: usize,
    /// Tile before removal
    pub previous: Tile,
}

/// Clears every cell within Euclidean `radius` of `(cx, cy)` to air.
///
/// Air is skipped and bedrock is indestructible. Cells outside the terrain
/// are ignored. A non-finite or negative radius clears only the centre.
pub fn clear_disc<T: TerrainAccess>(
    terrain: &mut T,
    cx: usize,
    cy: usize,
    radius: f64,
) -> Vec<ClearedTile> {
    let mut cleared = Vec::new();
    for_disc(terrain, cx, cy, radius, |terrain, x, y, _| {
        let previous = terrain.tile(x, y);
        if previous.is_air() || !previous.is_destructible() {
            return;
        }
        terrain.set_tile(x, y, Tile::Air);
        cleared.push(ClearedTile { x, y, previous });
    });
    cleared
}

/// Applies a disaster's [`DisasterEffect`] to the disc around `(cx, cy)`.
///
/// Air and bedrock are never touched. Rolls are drawn from `rng` in
/// row-major order, so a seeded stream gives a reproducible result.
pub fn apply_disaster<T: TerrainAccess>(
    terrain: &mut T,
    kind: DestructionKind,
    cx: usize,
    cy: usize,
    radius: f64,
    rng: &mut RngState,
) -> DisasterOutcome {
    let effect = kind.effect();
    let radius = if radius.is_finite() { radius.max(0.0) } else { 0.0 };
    let mut outcome = DisasterOutcome::default();
    for_disc(terrain, cx, cy, radius, |terrain, x, y, distance| {
        let current = terrain.tile(x, y);
        if current.is_air() || !current.is_destructible() {
            return;
        }
        let intensity = if radius > 0.0 { 1.0 - distance / radius } else { 1.0 };

        let mut next = current;
        if (effect.crater && intensity > CRATER_THRESHOLD)
            || (effect.destroys && rng.chance(intensity * DESTROY_CHANCE))
        {
            next = Tile::Air;
        }
        if !effect.fill.is_empty() && rng.chance(intensity * effect.fill_chance) {
            next = effect.fill[rng.range_usize(0, effect.fill.len())];
        }

        if next == current {
            return;
        }
        terrain.set_tile(x, y, next);
        if next.is_air() {
            outcome.cleared += 1;
        } else {
            outcome.transformed += 1;
        }
    });
    outcome
}

/// Visits every in-range cell within Euclidean `radius` of `(cx, cy)` in
/// row-major order, passing its distance from the centre. A non-finite or
/// negative radius visits only the centre.
fn for_disc<T: TerrainAccess>(
    terrain: &mut T,
    cx: usize,
    cy: usize,
    radius: f64,
    mut visit: impl FnMut(&mut T, usize, usize, f64),
) {
    let (width, height) = terrain.dimensions();
    if width == 0 || height == 0 {
        return;
    }
    let radius = if radius.is_finite() { radius.max(0.0) } else { 0.0 };
    let reach = radius.floor() as usize;

    let y_end = cy.saturating_add(reach).min(height - 1);
    let x_end = cx.saturating_add(reach).min(width - 1);
    for y in cy.saturating_sub(reach)..=y_end {
        for x in cx.saturating_sub(reach)..=x_end {
            let dx = x.abs_diff(cx) as f64;
            let dy = y.abs_diff(cy) as f64;
            let distance = (dx * dx + dy * dy).sqrt();
            if distance <= radius {
                visit(terrain, x, y, distance);
            }
        }
    }
}
