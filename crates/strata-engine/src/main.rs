//! # Strata
//!
//! Command-line driver for the layered world generator.
//!
//! Usage: `strata [config.toml] [--json <path>]`
//!
//! Loads the configuration (defaults when the file is missing), generates the
//! world, replays a scripted round of destruction through the runtime, and
//! logs a summary. `--json` also writes the summary to a file.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod config;
mod summary;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use strata_gameplay::{DestructionEvent, DestructionKind, TerrainRuntime};
use strata_worldgen::{BiomeId, GeneratedWorld, LayerId, RngState, WorldGenerator};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::EngineConfig;
use crate::summary::WorldSummary;

/// Offset that keeps the demo stream apart from the generation stream.
const DEMO_SEED_OFFSET: u64 = 0x5EED;

/// Parsed command line.
#[derive(Debug, Default, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    json: Option<PathBuf>,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Args> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => {
                let path = args.next().context("--json needs a path")?;
                parsed.json = Some(PathBuf::from(path));
            },
            flag if flag.starts_with("--") => bail!("unknown flag {flag}"),
            _ if parsed.config.is_some() => bail!("unexpected argument {arg}"),
            _ => parsed.config = Some(PathBuf::from(&arg)),
        }
    }
    Ok(parsed)
}

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("strata=info".parse()?))
        .init();

    info!("Strata {}", env!("CARGO_PKG_VERSION"));

    let args = parse_args(std::env::args().skip(1))?;
    let mut config = match &args.config {
        Some(path) => EngineConfig::load_from(path),
        None => EngineConfig::load(),
    };
    if args.json.is_some() {
        config.json_summary.clone_from(&args.json);
    }

    let generator =
        WorldGenerator::new(config.world.clone()).context("invalid world configuration")?;
    let mut world = generator.generate();
    log_world(&world, config.log_biomes);

    let events = replay_destruction(&config, &generator, &mut world);

    if let Some(path) = &config.json_summary {
        WorldSummary::collect(config.world.seed, &world, &events)
            .write_to(path)
            .with_context(|| format!("writing summary to {}", path.display()))?;
    }

    info!("Done");
    Ok(())
}

fn log_world(world: &GeneratedWorld, log_biomes: bool) {
    let stats = &world.stats;
    info!(
        "Generated {}x{}: {} caves, {} ore tiles, {} trees, {} landmarks, {} chests",
        world.grid.width(),
        world.grid.height(),
        stats.caves.walks,
        stats.ores.tiles_placed,
        stats.trees,
        stats.blueprints,
        stats.chests
    );

    if log_biomes {
        for (id, count) in BiomeId::ALL.iter().zip(world.biome_map.histogram()) {
            if count > 0 {
                info!("  {:<20} {:>8} tiles", id.display_name(), count);
            }
        }
    }

    for placed in &world.structures {
        debug!(
            "{} at ({}, {}) {}x{}",
            placed.kind.display_name(),
            placed.x,
            placed.y,
            placed.width,
            placed.height
        );
    }
}

/// Runs the scripted destruction round and returns what the log reported.
fn replay_destruction(
    config: &EngineConfig,
    generator: &WorldGenerator,
    world: &mut GeneratedWorld,
) -> Vec<DestructionEvent> {
    let mut runtime = TerrainRuntime::from_generator(generator);
    let events = runtime.subscribe();
    let mut rng = RngState::new(config.world.seed.wrapping_add(DEMO_SEED_OFFSET));
    let (width, height) = (world.grid.width(), world.grid.height());

    for _ in 0..config.demo_destructions {
        let x = rng.range_usize(0, width);
        let y = world.heights.get(x).unwrap_or(0);
        let event =
            runtime.trigger_destruction(&mut world.grid, x as i64, y as i64, config.demo_radius);
        let biome = runtime.biome_at(&world.grid, x as i64, y as i64);
        info!(
            "Crater at ({}, {}) in {}: {} tiles cleared",
            event.x,
            event.y,
            biome.display_name(),
            event.cleared
        );
        runtime.advance_tick();
    }

    if config.demo_disasters {
        let tile_size = i64::from(runtime.tile_size());
        let top = generator
            .classifier()
            .layers()
            .row_start(LayerId::Underground, height);
        for kind in DestructionKind::NATURAL {
            let x = rng.range_usize(0, width) as i64;
            let y = rng.range_usize(top, height) as i64;
            let event = runtime.trigger_environmental(
                &mut world.grid,
                kind,
                x * tile_size,
                y * tile_size,
                config.disaster_intensity,
            );
            info!(
                "{:?} at ({}, {}) radius {:.1}: {} tiles cleared, {} transformed",
                kind, event.x, event.y, event.radius, event.cleared, event.transformed
            );
            runtime.advance_tick();
        }
    }

    let received: Vec<_> = events.try_iter().collect();
    if received.len() != runtime.log().len() {
        warn!(
            "Subscriber saw {} of {} events",
            received.len(),
            runtime.log().len()
        );
    }
    received
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args> {
        parse_args(list.iter().map(ToString::to_string))
    }

    #[test]
    fn test_parse_args() {
        assert_eq!(args(&[]).expect("empty"), Args::default());

        let parsed = args(&["world.toml", "--json", "out.json"]).expect("valid");
        assert_eq!(parsed.config, Some(PathBuf::from("world.toml")));
        assert_eq!(parsed.json, Some(PathBuf::from("out.json")));

        assert!(args(&["--json"]).is_err());
        assert!(args(&["--verbose"]).is_err());
        assert!(args(&["a.toml", "b.toml"]).is_err());
    }

    #[test]
    fn test_replay_records_every_event() {
        let mut config = EngineConfig::default();
        config.world = strata_worldgen::WorldConfig::new(96, 64, 3);
        let generator = WorldGenerator::new(config.world.clone()).expect("valid config");
        let mut world = generator.generate();

        let events = replay_destruction(&config, &generator, &mut world);
        assert_eq!(events.len(), config.demo_destructions + DestructionKind::NATURAL.len());
        assert!(events.windows(2).all(|w| w[0].tick < w[1].tick));
    }
}
