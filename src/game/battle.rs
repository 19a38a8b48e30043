//! Battle state and authoritative tick loop

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::sync::{broadcast, mpsc};
use tokio::time::interval;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::util::time::{snapshot_interval_ticks, tick_duration, unix_millis};

use super::events::GameEvent;
use super::map::Map;
use super::projectile::{DegenerateTrajectory, HitResult, Projectile, PROJECTILE_SPEED};
use super::snapshot::{BattleMsg, SnapshotBuilder};
use super::tank::{Tank, TankColor};
use super::BattleCommand;

/// Battle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlePhase {
    /// Battle in progress
    InProgress,
    /// Battle ended
    Ended,
}

/// Errors from driver operations
#[derive(Debug, thiserror::Error)]
pub enum BattleError {
    #[error("no tank with id {0}")]
    UnknownTank(Uuid),

    #[error("tank {0} is destroyed")]
    TankDestroyed(Uuid),

    #[error("cell ({0}, {1}) is not a valid spawn location")]
    SpawnBlocked(i32, i32),

    #[error(transparent)]
    DegenerateShot(#[from] DegenerateTrajectory),
}

/// Battle state (owned by the battle task)
pub struct BattleState {
    pub id: Uuid,
    pub seed: u64,
    pub tick: u64,
    pub phase: BattlePhase,
    pub map: Map,
    pub tanks: Vec<Tank>,
    pub projectiles: Vec<Projectile>,
    pub rng: ChaCha8Rng,
    pub winner: Option<Uuid>,
}

impl BattleState {
    pub fn new(id: Uuid, map: Map, seed: u64) -> Self {
        Self {
            id,
            seed,
            tick: 0,
            phase: BattlePhase::InProgress,
            map,
            tanks: Vec::new(),
            projectiles: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            winner: None,
        }
    }

    /// Place a new tank on the map
    pub fn spawn_tank(&mut self, x: i32, y: i32, color: TankColor) -> Result<Uuid, BattleError> {
        if !self.map.in_bounds(x, y) || self.map.is_obstacle(x, y) {
            return Err(BattleError::SpawnBlocked(x, y));
        }
        let tank = Tank::new(x, y, color);
        let id = tank.id;
        self.tanks.push(tank);
        Ok(id)
    }

    /// Fire a projectile from a live tank toward an aim point.
    ///
    /// The projectile starts at the tank's cell center; aiming at that exact
    /// point is a degenerate shot and is rejected.
    pub fn fire(&mut self, tank_id: Uuid, aim: (f32, f32)) -> Result<GameEvent, BattleError> {
        let tank = self
            .tanks
            .iter_mut()
            .find(|t| t.id == tank_id)
            .ok_or(BattleError::UnknownTank(tank_id))?;
        if !tank.alive {
            return Err(BattleError::TankDestroyed(tank_id));
        }

        let start = (tank.x as f32 + 0.5, tank.y as f32 + 0.5);
        let projectile = Projectile::new(tank_id, start, aim, PROJECTILE_SPEED)?;
        tank.stats.shots_fired += 1;

        let event = GameEvent::Shot {
            shooter_id: tank_id,
            projectile_id: projectile.id,
            x: projectile.x,
            y: projectile.y,
            dir_x: projectile.dir_x,
            dir_y: projectile.dir_y,
            speed: projectile.speed,
        };
        self.projectiles.push(projectile);
        Ok(event)
    }

    /// Run a single simulation tick.
    ///
    /// Projectiles update in collection order; when two could claim the same
    /// destroying hit in one tick, the first-processed projectile wins and
    /// the later one sees a dead tank. Destroyed projectiles are removed here,
    /// by the driver, never by the projectile itself.
    pub fn run_tick(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.phase == BattlePhase::Ended {
            return events;
        }
        self.tick += 1;

        let mut hits: Vec<HitResult> = Vec::new();
        for projectile in self.projectiles.iter_mut() {
            if let Some(hit) = projectile.update(&self.map, &mut self.tanks, &mut self.rng) {
                hits.push(hit);
            }
        }

        if !hits.is_empty() {
            let destroyed: Vec<Uuid> = hits.iter().map(|h| h.projectile_id).collect();
            self.projectiles.retain(|p| !destroyed.contains(&p.id));
        }

        for hit in hits {
            if let Some(shooter) = self.tanks.iter_mut().find(|t| t.id == hit.shooter_id) {
                shooter.stats.shots_hit += 1;
                shooter.stats.damage_dealt += hit.damage;
                if hit.target_destroyed {
                    shooter.stats.kills += 1;
                }
            }

            events.push(GameEvent::Hit {
                shooter_id: hit.shooter_id,
                target_id: hit.target_id,
                damage: hit.damage,
                x: hit.x,
                y: hit.y,
            });

            if hit.target_destroyed {
                debug!(battle_id = %self.id, victim = %hit.target_id, "tank destroyed");
                events.push(GameEvent::Kill {
                    killer_id: hit.shooter_id,
                    victim_id: hit.target_id,
                });
            }
        }

        if self.alive_count() <= 1 {
            self.phase = BattlePhase::Ended;
            self.winner = self.tanks.iter().find(|t| t.alive).map(|t| t.id);
            events.push(GameEvent::BattleEnd {
                winner_id: self.winner,
                tick: self.tick,
            });
        }

        events
    }

    /// Count alive tanks
    pub fn alive_count(&self) -> usize {
        self.tanks.iter().filter(|t| t.alive).count()
    }
}

/// Handle to a running battle
#[derive(Clone)]
pub struct BattleHandle {
    pub id: Uuid,
    pub command_tx: mpsc::Sender<BattleCommand>,
    msg_tx: broadcast::Sender<BattleMsg>,
}

impl BattleHandle {
    /// Subscribe to the battle's snapshot/event feed
    pub fn subscribe(&self) -> broadcast::Receiver<BattleMsg> {
        self.msg_tx.subscribe()
    }
}

/// The authoritative battle task
pub struct Battle {
    state: BattleState,
    command_rx: mpsc::Receiver<BattleCommand>,
    msg_tx: broadcast::Sender<BattleMsg>,
    snapshot_builder: SnapshotBuilder,
    max_ticks: Option<u64>,
}

impl Battle {
    /// Create a battle task around prepared state
    pub fn new(state: BattleState, max_ticks: Option<u64>) -> (Self, BattleHandle) {
        let (command_tx, command_rx) = mpsc::channel(256);
        let (msg_tx, _) = broadcast::channel(64);

        let handle = BattleHandle {
            id: state.id,
            command_tx,
            msg_tx: msg_tx.clone(),
        };

        let battle = Self {
            state,
            command_rx,
            msg_tx,
            snapshot_builder: SnapshotBuilder::new(snapshot_interval_ticks()),
            max_ticks,
        };

        (battle, handle)
    }

    /// Run the authoritative tick loop until the battle ends, a stop command
    /// arrives, or the configured tick cap is reached
    pub async fn run(mut self) {
        info!(
            battle_id = %self.state.id,
            seed = self.state.seed,
            tanks = self.state.tanks.len(),
            "Battle started"
        );
        let started_at = unix_millis();

        let mut tick_interval = interval(tick_duration());
        tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut pending_events: Vec<GameEvent> = Vec::new();

        loop {
            tick_interval.tick().await;

            if !self.process_commands(&mut pending_events) {
                break;
            }

            pending_events.extend(self.state.run_tick());

            if self.state.phase == BattlePhase::Ended {
                self.snapshot_builder.force_next();
            }

            if self.snapshot_builder.should_send() {
                let snapshot = self.snapshot_builder.build(
                    self.state.tick,
                    &self.state.tanks,
                    &self.state.projectiles,
                    std::mem::take(&mut pending_events),
                );
                let _ = self.msg_tx.send(snapshot);
            }

            if self.state.phase == BattlePhase::Ended {
                info!(
                    battle_id = %self.state.id,
                    winner = ?self.state.winner,
                    tick = self.state.tick,
                    "Battle ended"
                );
                break;
            }

            if let Some(cap) = self.max_ticks {
                if self.state.tick >= cap {
                    info!(battle_id = %self.state.id, tick = self.state.tick, "Tick cap reached");
                    break;
                }
            }
        }

        let _ = self.msg_tx.send(BattleMsg::BattleEnd {
            winner_id: self.state.winner,
            tick: self.state.tick,
        });
        info!(
            battle_id = %self.state.id,
            duration_ms = unix_millis().saturating_sub(started_at),
            "Battle task finished"
        );
    }

    /// Drain pending commands; returns false if the battle should stop
    fn process_commands(&mut self, events: &mut Vec<GameEvent>) -> bool {
        while let Ok(command) = self.command_rx.try_recv() {
            match command {
                BattleCommand::Fire {
                    tank_id,
                    aim_x,
                    aim_y,
                } => match self.state.fire(tank_id, (aim_x, aim_y)) {
                    Ok(event) => events.push(event),
                    Err(err) => {
                        warn!(battle_id = %self.state.id, tank_id = %tank_id, %err, "Fire rejected");
                    }
                },
                BattleCommand::Stop => {
                    info!(battle_id = %self.state.id, "Stop requested");
                    return false;
                }
            }
        }
        true
    }
}
