//! Projectile movement, ricochets and hit resolution

use rand::Rng;
use uuid::Uuid;

use super::map::Map;
use super::tank::Tank;

/// Default projectile speed in cells per tick
pub const PROJECTILE_SPEED: f32 = 1.0;

/// Largest start/aim distance still treated as a zero-length trajectory
const MIN_TRAJECTORY_LEN: f32 = 1e-6;

/// Maximum ricochet deflection off an obstacle, either side (45 degrees)
const MAX_RICOCHET_ANGLE: f32 = std::f32::consts::FRAC_PI_4;

/// Construction was asked to aim a projectile at its own start point
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("degenerate trajectory: start and aim points coincide")]
pub struct DegenerateTrajectory;

/// Hit registered by a projectile update
#[derive(Debug, Clone)]
pub struct HitResult {
    pub projectile_id: Uuid,
    pub shooter_id: Uuid,
    pub target_id: Uuid,
    pub damage: f32,
    pub x: f32,
    pub y: f32,
    pub target_destroyed: bool,
}

/// A live projectile crossing the map
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: Uuid,
    /// Tank that fired this projectile; exempt from its damage
    pub shooter_id: Uuid,
    pub x: f32,
    pub y: f32,
    /// Unit travel direction; only ricochets and edge bounces change it
    pub dir_x: f32,
    pub dir_y: f32,
    /// Cells advanced per tick, fixed at creation
    pub speed: f32,
}

impl Projectile {
    /// Create a projectile at `start` aimed at `aim`.
    ///
    /// The direction is normalized once here; a zero-length trajectory is
    /// rejected instead of dividing by zero and letting NaN spread through
    /// every later tick.
    pub fn new(
        shooter_id: Uuid,
        start: (f32, f32),
        aim: (f32, f32),
        speed: f32,
    ) -> Result<Self, DegenerateTrajectory> {
        let dx = aim.0 - start.0;
        let dy = aim.1 - start.1;
        let len = (dx * dx + dy * dy).sqrt();
        if len < MIN_TRAJECTORY_LEN {
            return Err(DegenerateTrajectory);
        }

        Ok(Self {
            id: Uuid::new_v4(),
            shooter_id,
            x: start.0,
            y: start.1,
            dir_x: dx / len,
            dir_y: dy / len,
            speed,
        })
    }

    /// Grid cell currently containing the projectile
    pub fn cell(&self) -> (i32, i32) {
        (Map::cell_of(self.x), Map::cell_of(self.y))
    }

    /// Advance the projectile by one tick.
    ///
    /// Order of resolution:
    /// 1. If the step ahead lands in an obstacle cell, the projectile holds
    ///    position and ricochets: the direction rotates by a uniform random
    ///    angle within +/-45 degrees. Otherwise it advances.
    /// 2. The first live non-shooter tank sharing the projectile's cell takes
    ///    color-based damage and the update ends; `Some(HitResult)` tells the
    ///    driver to remove the projectile. The edge check is skipped on a
    ///    destruction tick.
    /// 3. Leaving the map flips the direction per axis; both axes may flip in
    ///    one tick. Position is not clamped, so an out-of-range coordinate
    ///    corrects itself over the following ticks.
    pub fn update(
        &mut self,
        map: &Map,
        tanks: &mut [Tank],
        rng: &mut impl Rng,
    ) -> Option<HitResult> {
        let next_x = self.x + self.dir_x * self.speed;
        let next_y = self.y + self.dir_y * self.speed;

        if map.is_obstacle(Map::cell_of(next_x), Map::cell_of(next_y)) {
            self.ricochet(rng);
        } else {
            self.x = next_x;
            self.y = next_y;
        }

        let (cell_x, cell_y) = self.cell();
        for tank in tanks.iter_mut() {
            if !tank.alive || tank.id == self.shooter_id {
                continue;
            }
            if tank.x == cell_x && tank.y == cell_y {
                let damage = tank.color.hit_damage();
                let target_destroyed = tank.apply_damage(damage);
                return Some(HitResult {
                    projectile_id: self.id,
                    shooter_id: self.shooter_id,
                    target_id: tank.id,
                    damage,
                    x: self.x,
                    y: self.y,
                    target_destroyed,
                });
            }
        }

        let size = map.size() as f32;
        if self.x < 0.0 || self.x >= size {
            self.dir_x = -self.dir_x;
        }
        if self.y < 0.0 || self.y >= size {
            self.dir_y = -self.dir_y;
        }

        None
    }

    /// Rotate the travel direction by a random angle within the ricochet cone
    fn ricochet(&mut self, rng: &mut impl Rng) {
        let angle = rng.gen_range(-MAX_RICOCHET_ANGLE..=MAX_RICOCHET_ANGLE);
        let (sin, cos) = angle.sin_cos();
        let new_dir_x = self.dir_x * cos - self.dir_y * sin;
        let new_dir_y = self.dir_x * sin + self.dir_y * cos;
        self.dir_x = new_dir_x;
        self.dir_y = new_dir_y;
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use uuid::Uuid;

    use super::*;
    use crate::game::tank::{Tank, TankColor, MAX_HEALTH};

    const EPS: f32 = 1e-5;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    fn magnitude(p: &Projectile) -> f32 {
        (p.dir_x * p.dir_x + p.dir_y * p.dir_y).sqrt()
    }

    #[test]
    fn construction_normalizes_direction() {
        let p = Projectile::new(Uuid::new_v4(), (0.0, 0.0), (3.0, 4.0), 1.0).unwrap();
        assert!((p.dir_x - 0.6).abs() < EPS);
        assert!((p.dir_y - 0.8).abs() < EPS);
        assert!((magnitude(&p) - 1.0).abs() < EPS);
    }

    #[test]
    fn construction_rejects_zero_length_trajectory() {
        let shooter = Uuid::new_v4();
        let err = Projectile::new(shooter, (2.0, 2.0), (2.0, 2.0), 1.0).unwrap_err();
        assert_eq!(err, DegenerateTrajectory);
    }

    #[test]
    fn free_advance_moves_without_hit_or_bounce() {
        let map = Map::new(10);
        let mut tanks: Vec<Tank> = Vec::new();
        let mut p = Projectile::new(Uuid::new_v4(), (0.0, 0.0), (3.0, 4.0), 1.0).unwrap();

        let hit = p.update(&map, &mut tanks, &mut rng());
        assert!(hit.is_none());
        assert!((p.x - 0.6).abs() < EPS);
        assert!((p.y - 0.8).abs() < EPS);
        assert!((p.dir_x - 0.6).abs() < EPS);
        assert!((p.dir_y - 0.8).abs() < EPS);
    }

    #[test]
    fn hit_damages_only_the_non_shooter_and_skips_edge_check() {
        let map = Map::new(10);
        let shooter_tank = Tank::new(0, 0, TankColor::Blue);
        let shooter_id = shooter_tank.id;
        let target = Tank::new(0, 0, TankColor::Red);
        let target_id = target.id;
        let mut tanks = vec![shooter_tank, target];

        // The step lands at roughly (-0.41, -0.41): truncation still resolves
        // to cell (0, 0) where both tanks sit, while both coordinates lie
        // outside the map and would flip the direction if the edge step ran.
        let mut p = Projectile::new(shooter_id, (0.3, 0.3), (-0.7, -0.7), 1.0).unwrap();
        let (dir_x, dir_y) = (p.dir_x, p.dir_y);

        let hit = p.update(&map, &mut tanks, &mut rng()).expect("expected a hit");
        assert_eq!(hit.target_id, target_id);
        assert_eq!(hit.damage, 50.0);
        assert!(!hit.target_destroyed);

        assert_eq!(tanks[0].health, MAX_HEALTH, "shooter must never be damaged");
        assert_eq!(tanks[1].health, MAX_HEALTH - 50.0);

        // Destruction tick: the edge step never ran, direction is untouched
        assert_eq!(p.dir_x, dir_x);
        assert_eq!(p.dir_y, dir_y);
    }

    #[test]
    fn dead_tanks_are_ignored() {
        let map = Map::new(10);
        let mut wreck = Tank::new(1, 0, TankColor::Yellow);
        wreck.alive = false;
        let mut tanks = vec![wreck];

        let mut p = Projectile::new(Uuid::new_v4(), (0.5, 0.5), (3.0, 0.5), 1.0).unwrap();
        assert!(p.update(&map, &mut tanks, &mut rng()).is_none());
        assert_eq!(tanks[0].stats.damage_taken, 0.0);
    }

    #[test]
    fn obstacle_ricochet_holds_position_and_stays_in_cone() {
        let mut map = Map::new(10);
        map.set_obstacle(1, 1);
        let mut tanks: Vec<Tank> = Vec::new();

        let mut p = Projectile::new(Uuid::new_v4(), (0.9, 0.9), (3.0, 3.0), 1.0).unwrap();
        let (old_x, old_y) = (p.x, p.y);
        let (old_dir_x, old_dir_y) = (p.dir_x, p.dir_y);

        let hit = p.update(&map, &mut tanks, &mut rng());
        assert!(hit.is_none());
        assert_eq!((p.x, p.y), (old_x, old_y), "ricochet must not advance");
        assert!((magnitude(&p) - 1.0).abs() < EPS, "rotation preserves the norm");

        // Deflection within +/-45 degrees: dot product against the old
        // direction stays at or above cos(45deg).
        let dot = p.dir_x * old_dir_x + p.dir_y * old_dir_y;
        assert!(dot >= std::f32::consts::FRAC_1_SQRT_2 - EPS);
    }

    #[test]
    fn ricochet_angle_varies_with_the_injected_rng() {
        let mut map = Map::new(10);
        map.set_obstacle(1, 1);
        let mut tanks: Vec<Tank> = Vec::new();

        let mut directions = Vec::new();
        for seed in 0..4 {
            let mut p = Projectile::new(Uuid::new_v4(), (0.9, 0.9), (3.0, 3.0), 1.0).unwrap();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            p.update(&map, &mut tanks, &mut rng);
            directions.push((p.dir_x, p.dir_y));
        }
        let first = directions[0];
        assert!(
            directions.iter().any(|d| (d.0 - first.0).abs() > EPS),
            "different seeds should deflect differently"
        );
    }

    #[test]
    fn edge_reflection_flips_each_axis_independently() {
        let map = Map::new(10);
        let mut tanks: Vec<Tank> = Vec::new();

        // Leaves through the X edge only
        let mut p = Projectile::new(Uuid::new_v4(), (9.5, 5.0), (10.5, 5.0), 1.0).unwrap();
        p.update(&map, &mut tanks, &mut rng());
        assert!(p.dir_x < 0.0);
        assert!(p.dir_y.abs() < EPS);

        // Leaves through the corner: both axes flip in the same tick
        let mut p = Projectile::new(Uuid::new_v4(), (9.5, 9.5), (10.5, 10.5), 1.0).unwrap();
        p.update(&map, &mut tanks, &mut rng());
        assert!(p.dir_x < 0.0);
        assert!(p.dir_y < 0.0);
        // No clamping: the position is still past the edge this tick
        assert!(p.x >= 10.0);
        assert!(p.y >= 10.0);
    }

    #[test]
    fn unclamped_edge_rebound_recovers_over_following_ticks() {
        let map = Map::new(10);
        let mut tanks: Vec<Tank> = Vec::new();

        let mut p = Projectile::new(Uuid::new_v4(), (9.5, 5.0), (10.5, 5.0), 1.0).unwrap();
        p.update(&map, &mut tanks, &mut rng());
        assert!(p.x >= 10.0);
        p.update(&map, &mut tanks, &mut rng());
        assert!(p.x < 10.0, "reversed direction brings it back inside");
    }
}
