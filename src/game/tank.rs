//! Tank state and damage rules

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Full health for every tank
pub const MAX_HEALTH: f32 = 100.0;

/// Tank color, the closed set that decides how much damage a hit deals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TankColor {
    Blue,
    Cyan,
    Red,
    Yellow,
}

impl TankColor {
    /// Health points a projectile hit removes from a tank of this color.
    ///
    /// Blue and cyan are armored and take 25; red and yellow take 50. The
    /// match is exhaustive over the closed set, so an unclassified tank
    /// cannot slip through with an accidental zero.
    pub fn hit_damage(self) -> f32 {
        match self {
            TankColor::Blue | TankColor::Cyan => 25.0,
            TankColor::Red | TankColor::Yellow => 50.0,
        }
    }
}

/// Per-tank combat statistics, maintained by the battle driver
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CombatStats {
    pub kills: u32,
    pub damage_dealt: f32,
    pub damage_taken: f32,
    pub shots_fired: u32,
    pub shots_hit: u32,
}

/// A combat entity on the grid (authoritative)
#[derive(Debug, Clone)]
pub struct Tank {
    pub id: Uuid,
    /// Grid cell X
    pub x: i32,
    /// Grid cell Y
    pub y: i32,
    pub color: TankColor,
    pub health: f32,
    pub alive: bool,
    pub stats: CombatStats,
}

impl Tank {
    pub fn new(x: i32, y: i32, color: TankColor) -> Self {
        Self {
            id: Uuid::new_v4(),
            x,
            y,
            color,
            health: MAX_HEALTH,
            alive: true,
            stats: CombatStats::default(),
        }
    }

    /// Apply damage, saturating at zero health. Returns true if this
    /// application destroyed the tank.
    pub fn apply_damage(&mut self, amount: f32) -> bool {
        if !self.alive {
            return false;
        }
        self.health = (self.health - amount).max(0.0);
        self.stats.damage_taken += amount;
        if self.health <= 0.0 {
            self.alive = false;
            return true;
        }
        false
    }
}
