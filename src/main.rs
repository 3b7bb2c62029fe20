//! Tank Arena headless demo
//!
//! Runs one game with the scripted pilot at a fixed rate, then replays
//! the recorded inputs to verify the simulation is deterministic.

use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tank_arena::{
    TICK_RATE, VERSION,
    config::GameConfig,
    game::{
        events::{AudioCue, GameEventData},
        state::World,
        tick::replay,
    },
    runtime::{run_fixed_rate, FramePacer, ScriptedPilot},
};

/// Upper bound on a demo run (five minutes of simulation at 60 Hz).
const MAX_DEMO_TICKS: u32 = 5 * 60 * TICK_RATE;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    info!("Tank Arena v{}", VERSION);

    let config = load_config()?;
    info!(seed = config.seed, mode = ?config.mode, tick_ms = config.tick_ms, "config loaded");

    run_demo(config)
}

/// Defaults, then an optional JSON file from argv[1], then `ARENA_*` env.
fn load_config() -> Result<GameConfig> {
    let mut config = match std::env::args().nth(1) {
        Some(path) => GameConfig::from_json_file(&path)
            .with_context(|| format!("loading config from {path}"))?,
        None => GameConfig::default(),
    };
    config.apply_env().context("applying environment overrides")?;
    Ok(config)
}

fn run_demo(config: GameConfig) -> Result<()> {
    let fast = std::env::var("ARENA_FAST").is_ok_and(|v| v == "1");
    let pacer = if fast {
        FramePacer::unpaced()
    } else {
        FramePacer::from_tick_ms(config.tick_ms)
    };

    let initial = World::from_config(config);
    let mut world = initial.clone();

    info!("=== Starting Demo Game ===");
    let summary = run_fixed_rate(&mut world, &mut ScriptedPilot::default(), MAX_DEMO_TICKS, &pacer);

    let mut cues = [0usize; 3];
    for event in &summary.events {
        match event.audio_cue() {
            Some(AudioCue::Shot) => cues[0] += 1,
            Some(AudioCue::Explosion) => cues[1] += 1,
            Some(AudioCue::PowerUp) => cues[2] += 1,
            None => {}
        }
        if let GameEventData::PowerUpCollected { slot, kind } = &event.data {
            info!(tick = event.tick, ?slot, ?kind, "power-up collected");
        }
    }

    info!("=== Game Results ===");
    if !summary.game_over {
        warn!(ticks = summary.ticks, "demo stopped before game over");
    }
    info!(
        ticks = summary.ticks,
        seconds = world.clock_ms / 1000,
        score = world.score(),
        wave = world.wave_number(),
        "final"
    );
    for player in world.players.iter().flatten() {
        info!(slot = ?player.slot, kills = player.kills, health = player.actor.health, "player");
    }
    info!(shots = cues[0], explosions = cues[1], power_ups = cues[2], "audio cues");

    let hash = world.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));

    info!("=== Verifying Determinism ===");
    let (replayed, _) = replay(initial, &summary.recordings, summary.ticks);
    let replay_hash = replayed.compute_hash();
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash != replay_hash {
        bail!("determinism failure: replay hash differs");
    }
    info!("DETERMINISM VERIFIED: Hashes match!");
    Ok(())
}
