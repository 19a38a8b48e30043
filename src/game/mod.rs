//! Battle simulation modules

pub mod battle;
pub mod events;
pub mod map;
pub mod projectile;
pub mod snapshot;
pub mod tank;

pub use battle::{Battle, BattleHandle, BattlePhase, BattleState};
pub use map::Map;
pub use projectile::Projectile;
pub use tank::{Tank, TankColor};

use uuid::Uuid;

/// Commands fed into a running battle from the outside world
#[derive(Debug, Clone)]
pub enum BattleCommand {
    /// Fire a projectile from the given tank toward an aim point
    Fire {
        tank_id: Uuid,
        aim_x: f32,
        aim_y: f32,
    },
    /// Stop the battle task
    Stop,
}
