//! Time utilities for the battle simulation

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Get current Unix timestamp in milliseconds
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis() as u64
}

/// Tick rate configuration
pub const SIMULATION_TPS: u32 = 30; // 30 ticks per second
pub const SNAPSHOT_TPS: u32 = 10; // 10 snapshots per second

/// Wall-clock duration of one simulation tick
pub fn tick_duration() -> Duration {
    Duration::from_micros(1_000_000 / SIMULATION_TPS as u64)
}

/// Number of simulation ticks between snapshots
pub fn snapshot_interval_ticks() -> u32 {
    (SIMULATION_TPS / SNAPSHOT_TPS).max(1)
}
