//! Tank Arena - headless authoritative battle simulation
//!
//! Entry point for a headless demo run: it builds a small battle from
//! configuration, feeds it scripted fire commands, and logs the snapshot
//! feed until the battle ends or is interrupted.

mod config;
mod game;
mod util;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use crate::config::Config;
use crate::game::battle::{Battle, BattleState};
use crate::game::snapshot::BattleMsg;
use crate::game::{BattleCommand, Map, TankColor};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    info!("Starting Tank Arena simulation");
    info!(map_size = config.map_size, seed = config.seed, "Battle parameters");

    let state = build_demo_battle(&config)?;
    let tanks: Vec<Uuid> = state.tanks.iter().map(|t| t.id).collect();

    let (battle, handle) = Battle::new(state, config.max_ticks);
    let mut feed = handle.subscribe();
    let battle_task = tokio::spawn(battle.run());

    // Scripted opening volley; in a full game these commands come from the
    // input layer.
    let size = config.map_size as f32;
    for (idx, tank_id) in tanks.iter().enumerate() {
        let aim = (size / 2.0 + idx as f32 * 0.25, size / 2.0);
        let _ = handle
            .command_tx
            .send(BattleCommand::Fire {
                tank_id: *tank_id,
                aim_x: aim.0,
                aim_y: aim.1,
            })
            .await;
    }

    // Log the read-only feed until the battle finishes or ctrl-c arrives
    loop {
        tokio::select! {
            msg = feed.recv() => match msg {
                Ok(BattleMsg::Snapshot { tick, tanks, projectiles, events }) => {
                    info!(
                        tick,
                        tanks = tanks.len(),
                        projectiles = projectiles.len(),
                        events = events.len(),
                        "snapshot"
                    );
                    for event in &events {
                        info!(event = %serde_json::to_string(event)?, "event");
                    }
                }
                Ok(BattleMsg::BattleEnd { winner_id, tick }) => {
                    info!(winner = ?winner_id, tick, "Battle over");
                    break;
                }
                Err(_) => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, stopping battle");
                let _ = handle.command_tx.send(BattleCommand::Stop).await;
                break;
            }
        }
    }

    battle_task.await?;
    info!("Simulation shutdown complete");
    Ok(())
}

/// Build the demo battle: a fixed obstacle layout and one tank per color
fn build_demo_battle(config: &Config) -> anyhow::Result<BattleState> {
    let mut map = Map::new(config.map_size);

    // A supplied layout, not a generated one: a short wall across the middle
    let mid = config.map_size / 2;
    for x in (config.map_size / 4)..(3 * config.map_size / 4) {
        map.set_obstacle(x, mid);
    }

    let mut state = BattleState::new(Uuid::new_v4(), map, config.seed);
    let edge = config.map_size - 1;
    state.spawn_tank(0, 0, TankColor::Blue)?;
    state.spawn_tank(edge, 0, TankColor::Cyan)?;
    state.spawn_tank(0, edge, TankColor::Red)?;
    state.spawn_tank(edge, edge, TankColor::Yellow)?;

    Ok(state)
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
