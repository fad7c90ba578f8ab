//! # ecs_demo
//!
//! Runs a small particle simulation on the ECS runtime: particles are
//! launched from the origin, fall under gravity and are reaped when their
//! lifetime runs out.
//!
//! Set `RUST_LOG=ecs_demo=debug,ecs_registry=debug` to watch individual
//! ticks.

mod particles;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use ecs_registry::{Registry, TickConfig, TickLoop};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Ticks to run when neither `--ticks` nor a config file says otherwise.
const DEFAULT_TICKS: u64 = 120;

#[derive(Debug, Parser)]
#[command(name = "ecs_demo", about = "Particle simulation on a sparse-column ECS")]
struct Args {
    /// Number of particles to spawn
    #[arg(short, long, default_value_t = 1000)]
    entities: usize,

    /// Number of ticks to run (0 = run until interrupted)
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Target ticks per second
    #[arg(long)]
    tick_rate: Option<f64>,

    /// Path to a JSON tick configuration
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<TickConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            TickConfig::from_json(&json)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => TickConfig::default().with_max_ticks(DEFAULT_TICKS),
    };
    if let Some(tick_rate) = args.tick_rate {
        config = config.with_tick_rate(tick_rate);
    }
    if let Some(ticks) = args.ticks {
        config = config.with_max_ticks(ticks);
    }
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("ecs_demo=info".parse()?))
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    let mut registry = Registry::new();
    particles::register(&mut registry)?;
    particles::spawn_particles(&mut registry, args.entities)?;
    info!(
        entities = registry.alive_count(),
        components = ?registry.registered_components(),
        systems = registry.system_count(),
        "world ready"
    );

    let mut tick_loop = TickLoop::with_registry(config, registry)?;
    tick_loop.run_with(|registry, tick_id| {
        let reaped = particles::reap_expired(registry)?;
        if reaped > 0 {
            debug!(tick_id, reaped, alive = registry.alive_count(), "reaped particles");
        }
        Ok(())
    })?;

    let registry = tick_loop.registry();
    info!(
        ticks = tick_loop.tick_id(),
        alive = registry.alive_count(),
        centroid = ?particles::centroid(registry)?,
        "simulation finished"
    );
    Ok(())
}
