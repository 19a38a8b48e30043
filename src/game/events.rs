//! Battle event definitions
//! Read-only records a presentation or replay layer consumes alongside snapshots

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Game events (shots, hits, kills, battle end)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum GameEvent {
    /// Projectile fired
    Shot {
        shooter_id: Uuid,
        projectile_id: Uuid,
        x: f32,
        y: f32,
        dir_x: f32,
        dir_y: f32,
        speed: f32,
    },

    /// Hit registered
    Hit {
        shooter_id: Uuid,
        target_id: Uuid,
        damage: f32,
        x: f32,
        y: f32,
    },

    /// Tank destroyed
    Kill {
        killer_id: Uuid,
        victim_id: Uuid,
    },

    /// Battle is over
    BattleEnd {
        winner_id: Option<Uuid>,
        tick: u64,
    },
}
