//! Tickworld - Entry Point
//!
//! Runs one game: loads the engine config, joins every player's worker,
//! then ticks until the tick limit is reached.

use clap::Parser;
use std::path::PathBuf;
use tickworld::core::config::EngineConfig;
use tickworld::core::error::{GameError, Result};
use tickworld::core::types::PlayerId;
use tickworld::simulation::{GameState, TurnCoordinator};
use tickworld::worker::WorkerClient;
use tickworld::world::WorldGrid;
use tokio::runtime::Runtime;

/// Tick-based grid game driven by remote player workers
#[derive(Parser, Debug)]
#[command(name = "tickworld")]
#[command(about = "Run one game against a set of HTTP workers")]
struct Args {
    /// TOML engine config; defaults are used when absent
    #[arg(long)]
    config: Option<PathBuf>,

    /// Player worker as `id=url`, repeatable
    #[arg(long = "player", value_parser = parse_player)]
    players: Vec<(PlayerId, String)>,

    /// Random seed, overrides the config
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many ticks, overrides the config
    #[arg(long)]
    max_ticks: Option<u64>,
}

fn parse_player(arg: &str) -> std::result::Result<(PlayerId, String), String> {
    let (id, url) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected id=url, got {}", arg))?;
    let id = id
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("bad player id {}: {}", id, e))?;
    Ok((PlayerId(id), url.trim().to_string()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tickworld=info".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.max_ticks.is_some() {
        config.max_ticks = args.max_ticks;
    }
    if args.players.is_empty() {
        return Err(GameError::InvalidSettings(
            "at least one --player id=url is required".into(),
        ));
    }

    let seed = config.seed.unwrap_or_else(rand::random);
    tracing::info!(
        seed,
        width = config.initial_width,
        height = config.initial_height,
        players = args.players.len(),
        "Tickworld starting..."
    );

    let world = WorldGrid::generate_empty(
        config.initial_width,
        config.initial_height,
        config.settings.clone(),
    )?;
    let mut state = GameState::new(world, seed);
    for (player_id, endpoint) in &args.players {
        state.add_avatar(*player_id, endpoint, None)?;
    }

    let coordinator = TurnCoordinator::new(WorkerClient::new(), config.decision_timeout());

    let rt = Runtime::new()?;
    let ticks = rt.block_on(coordinator.run(&mut state, config.max_ticks, config.tick_interval()))?;

    println!("\n=== TICKWORLD: {} ticks ===", ticks);
    for avatar in state.avatars.avatars() {
        println!(
            "  player {:>4}  score {:>4}  health {:>3}  at {}",
            avatar.player_id,
            avatar.score,
            avatar.health,
            avatar.location()
        );
    }
    Ok(())
}
