//! Snapshot building for presentation consumers
//!
//! The simulation exposes state to the outside world only through these
//! read-only copies; no rendering type ever enters the core.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::events::GameEvent;
use super::projectile::Projectile;
use super::tank::{Tank, TankColor};

/// Messages published by a running battle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BattleMsg {
    /// Periodic state snapshot
    Snapshot {
        tick: u64,
        tanks: Vec<TankSnapshot>,
        projectiles: Vec<ProjectileSnapshot>,
        events: Vec<GameEvent>,
    },

    /// Battle finished
    BattleEnd {
        winner_id: Option<Uuid>,
        tick: u64,
    },
}

/// Tank state in a snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TankSnapshot {
    pub id: Uuid,
    pub x: i32,
    pub y: i32,
    pub color: TankColor,
    pub health: f32,
    pub alive: bool,
}

/// Projectile state in a snapshot; everything a drawing layer needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileSnapshot {
    pub id: Uuid,
    pub x: f32,
    pub y: f32,
}

/// Builds snapshots on a tick cadence
pub struct SnapshotBuilder {
    /// Tick counter since last snapshot
    ticks_since_snapshot: u32,
    /// Snapshot interval in ticks
    snapshot_interval: u32,
}

impl SnapshotBuilder {
    pub fn new(snapshot_interval: u32) -> Self {
        Self {
            ticks_since_snapshot: 0,
            snapshot_interval: snapshot_interval.max(1),
        }
    }

    /// Check if it's time to send a snapshot
    pub fn should_send(&mut self) -> bool {
        self.ticks_since_snapshot += 1;
        if self.ticks_since_snapshot >= self.snapshot_interval {
            self.ticks_since_snapshot = 0;
            true
        } else {
            false
        }
    }

    /// Force snapshot on next check (used for important events)
    pub fn force_next(&mut self) {
        self.ticks_since_snapshot = self.snapshot_interval;
    }

    /// Build a snapshot message from the current battle state
    pub fn build(
        &self,
        tick: u64,
        tanks: &[Tank],
        projectiles: &[Projectile],
        events: Vec<GameEvent>,
    ) -> BattleMsg {
        let tanks = tanks
            .iter()
            .map(|t| TankSnapshot {
                id: t.id,
                x: t.x,
                y: t.y,
                color: t.color,
                health: t.health,
                alive: t.alive,
            })
            .collect();

        let projectiles = projectiles
            .iter()
            .map(|p| ProjectileSnapshot {
                id: p.id,
                x: p.x,
                y: p.y,
            })
            .collect();

        BattleMsg::Snapshot {
            tick,
            tanks,
            projectiles,
            events,
        }
    }
}
