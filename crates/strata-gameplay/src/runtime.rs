//! Runtime queries and destruction on a generated world.
//!
//! The runtime owns no tiles: each call borrows the grid it works on, so the
//! grid's current dimensions are always the ones used for clamping and
//! classification.

use strata_common::PixelCoord;
use strata_worldgen::{
    spawn_table_for, BiomeClassifier, BiomeId, RngState, SpawnTable, TileGrid, WorldConfig,
    WorldGenerator,
};
use tracing::{debug, trace};

use crate::destruction::{
    apply_disaster, clear_disc, DestructionEvent, DestructionKind, DisasterOutcome,
};
use crate::events::DestructionLog;
use crate::season::{BiomeSnapshot, Season};
use crate::spawn::SpawnDescriptor;

/// Mixed into the world seed for the disaster stream.
const DISASTER_SALT: u64 = 0xD15A_57E5;

/// Simulation ticks per second.
pub const TICKS_PER_SECOND: u64 = 60;

/// Converts a retention window in milliseconds to ticks, rounding up.
#[must_use]
pub const fn ms_to_ticks(ms: u64) -> u64 {
    (ms * TICKS_PER_SECOND).div_ceil(1000)
}

/// Destructible-terrain runtime for one world.
#[derive(Debug)]
pub struct TerrainRuntime {
    classifier: BiomeClassifier,
    tile_size: u32,
    tick: u64,
    log: DestructionLog,
    rng: RngState,
}

impl TerrainRuntime {
    /// Creates a runtime for worlds generated from `config`.
    #[must_use]
    pub fn new(config: &WorldConfig) -> Self {
        Self::with_classifier(
            BiomeClassifier::from_config(config),
            config.tile_size,
            config.seed,
        )
    }

    /// Creates a runtime sharing a generator's classifier.
    #[must_use]
    pub fn from_generator(generator: &WorldGenerator) -> Self {
        let config = generator.config();
        Self::with_classifier(generator.classifier().clone(), config.tile_size, config.seed)
    }

    fn with_classifier(classifier: BiomeClassifier, tile_size: u32, seed: u64) -> Self {
        Self {
            classifier,
            tile_size: tile_size.max(1),
            tick: 0,
            log: DestructionLog::default(),
            rng: RngState::new(seed ^ DISASTER_SALT),
        }
    }

    /// Current tick.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Pixels per tile.
    #[must_use]
    pub const fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Advances the tick counter by one.
    pub fn advance_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    // ========================================================================
    // Destruction
    // ========================================================================

    /// Clears a disc of tiles around `(x, y)`.
    ///
    /// The centre is clamped into the grid, so this never fails. Bedrock
    /// survives. The event is appended to the log and returned.
    pub fn trigger_destruction(
        &mut self,
        grid: &mut TileGrid,
        x: i64,
        y: i64,
        radius: f64,
    ) -> DestructionEvent {
        let (cx, cy) = grid.clamp(x, y);
        let cleared = clear_disc(grid, cx, cy, radius).len();
        self.record(DestructionKind::Direct, cx, cy, radius, cleared, 0)
    }

    /// Applies a natural event at a pixel position.
    ///
    /// The radius is the kind's base radius scaled by `intensity`, converted
    /// to tiles. Tiles are affected per the kind's
    /// [`DisasterEffect`](crate::destruction::DisasterEffect), with rolls
    /// drawn from the runtime's seeded stream.
    pub fn trigger_environmental(
        &mut self,
        grid: &mut TileGrid,
        kind: DestructionKind,
        px: i64,
        py: i64,
        intensity: f64,
    ) -> DestructionEvent {
        let tile = PixelCoord::new(px, py).to_tile_coord(self.tile_size);
        let radius = kind.radius_tiles(intensity, self.tile_size);
        debug!("{:?} at pixel ({}, {}) with radius {:.1} tiles", kind, px, py, radius);
        let (cx, cy) = grid.clamp(tile.x, tile.y);
        let outcome = if kind == DestructionKind::Direct {
            DisasterOutcome {
                cleared: clear_disc(grid, cx, cy, radius).len(),
                transformed: 0,
            }
        } else {
            apply_disaster(grid, kind, cx, cy, radius, &mut self.rng)
        };
        self.record(kind, cx, cy, radius, outcome.cleared, outcome.transformed)
    }

    fn record(
        &mut self,
        kind: DestructionKind,
        x: usize,
        y: usize,
        radius: f64,
        cleared: usize,
        transformed: usize,
    ) -> DestructionEvent {
        let event = DestructionEvent {
            x,
            y,
            radius,
            tick: self.tick,
            kind,
            cleared,
            transformed,
            retain_ticks: ms_to_ticks(kind.duration_ms()),
        };
        trace!(
            "Destruction {:?} at ({}, {}) r={} cleared {} transformed {}",
            kind,
            x,
            y,
            radius,
            cleared,
            transformed
        );
        self.log.append(event);
        event
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Biome at a tile, clamped into the grid.
    #[must_use]
    pub fn biome_at(&self, grid: &TileGrid, x: i64, y: i64) -> BiomeId {
        let (cx, cy) = grid.clamp(x, y);
        self.classifier.classify(cx, cy, grid.width(), grid.height())
    }

    /// Biome at a pixel position.
    #[must_use]
    pub fn biome_at_world_pos(&self, grid: &TileGrid, px: i64, py: i64) -> BiomeId {
        let tile = PixelCoord::new(px, py).to_tile_coord(self.tile_size);
        self.biome_at(grid, tile.x, tile.y)
    }

    /// Spawn table of the biome at a tile.
    #[must_use]
    pub fn spawn_table_at(&self, grid: &TileGrid, x: i64, y: i64) -> &'static SpawnTable {
        spawn_table_for(self.biome_at(grid, x, y))
    }

    /// Seasonal properties of the biome at a tile.
    #[must_use]
    pub fn snapshot_at(&self, grid: &TileGrid, x: i64, y: i64, season: Season) -> BiomeSnapshot {
        BiomeSnapshot::for_season(self.biome_at(grid, x, y).info(), season)
    }

    /// Rolls a spawn for the biome under a pixel position.
    pub fn roll_spawn_at(
        &self,
        grid: &TileGrid,
        px: i64,
        py: i64,
        rng: &mut RngState,
    ) -> Option<SpawnDescriptor> {
        let biome = self.biome_at_world_pos(grid, px, py);
        SpawnDescriptor::roll(biome, px as f64, py as f64, rng)
    }

    // ========================================================================
    // Event log
    // ========================================================================

    /// The destruction log.
    #[must_use]
    pub const fn log(&self) -> &DestructionLog {
        &self.log
    }

    /// Mutable access for consumers that prune the log.
    pub fn log_mut(&mut self) -> &mut DestructionLog {
        &mut self.log
    }

    /// Subscribes to future destruction events.
    pub fn subscribe(&mut self) -> crossbeam_channel::Receiver<DestructionEvent> {
        self.log.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_worldgen::Tile;

    fn solid_world() -> (TerrainRuntime, TileGrid) {
        let config = WorldConfig::new(64, 64, 42);
        (TerrainRuntime::new(&config), TileGrid::new(64, 64, Tile::Stone))
    }

    #[test]
    fn test_destruction_clears_disc() {
        let (mut runtime, mut grid) = solid_world();
        let event = runtime.trigger_destruction(&mut grid, 10, 10, 3.0);

        assert_eq!(event.cleared, 29);
        assert_eq!(grid.tile_at(10, 10), Tile::Air);
        assert_eq!(grid.tile_at(13, 10), Tile::Air);
        assert_eq!(grid.tile_at(12, 12), Tile::Stone);
        assert_eq!(grid.tile_at(14, 10), Tile::Stone);
        assert_eq!(runtime.log().len(), 1);
        assert_eq!(runtime.log().last(), Some(&event));
    }

    #[test]
    fn test_destruction_clamps_centre() {
        let (mut runtime, mut grid) = solid_world();
        let event = runtime.trigger_destruction(&mut grid, -50, 1_000, 2.0);
        assert_eq!((event.x, event.y), (0, 63));
        assert_eq!(grid.tile_at(0, 63), Tile::Air);
    }

    #[test]
    fn test_destruction_spares_bedrock() {
        let (mut runtime, mut grid) = solid_world();
        grid.set(5, 5, Tile::Bedrock);
        runtime.trigger_destruction(&mut grid, 5, 5, 2.0);
        assert_eq!(grid.tile_at(5, 5), Tile::Bedrock);
        assert_eq!(grid.tile_at(6, 5), Tile::Air);
    }

    #[test]
    fn test_events_carry_tick_and_reach_subscribers() {
        let (mut runtime, mut grid) = solid_world();
        let rx = runtime.subscribe();
        runtime.trigger_destruction(&mut grid, 5, 5, 1.0);
        runtime.advance_tick();
        runtime.advance_tick();
        runtime.trigger_destruction(&mut grid, 20, 20, 1.0);

        let received: Vec<_> = rx.try_iter().collect();
        assert_eq!(received.len(), 2);
        assert_eq!(received[0].tick, 0);
        assert_eq!(received[1].tick, 2);
        assert_eq!(runtime.log().since(1).count(), 1);
    }

    #[test]
    fn test_environmental_radius_scales_with_intensity() {
        let (mut runtime, mut grid) = solid_world();
        // 50 px at intensity 1 over 16 px tiles
        let event =
            runtime.trigger_environmental(&mut grid, DestructionKind::Explosion, 320, 320, 1.0);
        assert!((event.radius - 3.125).abs() < 1e-9);
        assert_eq!((event.x, event.y), (20, 20));
        assert_eq!(event.retain_ticks, 60);
        // falloff rolls never exceed the 29-tile disc
        assert!(event.cleared > 0 && event.cleared <= 29);

        let weak =
            runtime.trigger_environmental(&mut grid, DestructionKind::Explosion, 640, 640, 0.5);
        assert!(weak.radius < event.radius);
    }

    #[test]
    fn test_environmental_effects_per_kind() {
        let (mut runtime, mut grid) = solid_world();
        let kind = DestructionKind::LightningStrike;
        let strike = runtime.trigger_environmental(&mut grid, kind, 160, 160, 2.0);
        assert_eq!((strike.cleared, strike.transformed), (0, 0));
        assert_eq!(grid.count(Tile::Stone), 64 * 64);

        let flood = runtime.trigger_environmental(&mut grid, DestructionKind::Flood, 512, 512, 1.0);
        assert_eq!(flood.cleared, 0);
        assert_eq!(grid.count(Tile::Water), flood.transformed);
        assert!(flood.transformed > 0);
        assert_eq!(runtime.log().len(), 2);
    }

    #[test]
    fn test_environmental_is_reproducible() {
        let run = || {
            let (mut runtime, mut grid) = solid_world();
            runtime.trigger_environmental(&mut grid, DestructionKind::Earthquake, 500, 500, 1.0);
            runtime.trigger_environmental(&mut grid, DestructionKind::CrystalGrowth, 200, 700, 1.0);
            grid
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_biome_at_matches_classifier_and_clamps() {
        let config = WorldConfig::new(128, 64, 7);
        let generator = WorldGenerator::new(config).expect("valid config");
        let world = generator.generate();
        let runtime = TerrainRuntime::from_generator(&generator);

        for (x, y) in [(0, 0), (64, 20), (127, 63), (10, 40)] {
            assert_eq!(
                runtime.biome_at(&world.grid, x as i64, y as i64),
                world.biome_map.get(x, y).expect("in range")
            );
        }
        assert_eq!(
            runtime.biome_at(&world.grid, -5, 500),
            runtime.biome_at(&world.grid, 0, 63)
        );
        assert_eq!(
            runtime.biome_at_world_pos(&world.grid, 64 * 16 + 3, 20 * 16 + 15),
            runtime.biome_at(&world.grid, 64, 20)
        );
    }

    #[test]
    fn test_spawn_table_and_snapshot_follow_biome() {
        let (runtime, grid) = solid_world();
        let biome = runtime.biome_at(&grid, 30, 30);
        assert_eq!(runtime.spawn_table_at(&grid, 30, 30), biome.spawn_table());
        let snap = runtime.snapshot_at(&grid, 30, 30, Season::Summer);
        assert_eq!(snap.biome, biome);
    }

    #[test]
    fn test_ms_to_ticks() {
        assert_eq!(ms_to_ticks(0), 0);
        assert_eq!(ms_to_ticks(1_000), 60);
        assert_eq!(ms_to_ticks(500), 30);
        assert_eq!(ms_to_ticks(10), 1);
    }
}
