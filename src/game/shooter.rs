//! Space shooter: enemies and asteroids fall from the top, pickups drift down

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::combat::{WeaponKind, WeaponStats};
use super::physics::{PlayField, Vec2};
use super::simulation::{Launch, Ruleset};
use super::spawn::{spawn_x, SpawnRate, SpawnSchedule};
use super::{EnemyType, GameKind, GameObject, ObjectKind, ObstacleType, PickupKind, Player};

/// Headings (degrees from straight up) of the spread volley
const SPREAD_HEADINGS: [f32; 5] = [-30.0, -15.0, 0.0, 15.0, 30.0];

#[derive(Debug, Clone, Copy, Default)]
pub struct ShooterRules;

impl Ruleset for ShooterRules {
    fn kind(&self) -> GameKind {
        GameKind::Shooter
    }

    fn field(&self) -> PlayField {
        PlayField::shooter()
    }

    fn player_radius(&self) -> f32 {
        20.0
    }

    fn spawn_schedule(&self) -> SpawnSchedule {
        SpawnSchedule {
            enemy: SpawnRate {
                base: 2.0,
                floor: 0.4,
                ramps: true,
            },
            obstacle: SpawnRate {
                base: 7.0,
                floor: 3.0,
                ramps: true,
            },
            pickup: Some(SpawnRate {
                base: 3.0,
                floor: 3.0,
                ramps: false,
            }),
        }
    }

    fn spawn_enemy(&self, rng: &mut ChaCha8Rng, field: &PlayField, level: u32) -> GameObject {
        let speed = rng.gen_range(60.0..150.0) * (1.0 + 0.1 * level.saturating_sub(1) as f32);
        let size = rng.gen_range(15.0..25.0);
        let roll: f32 = rng.gen();
        let (enemy, speed, radius, health, points) = if roll < 0.6 {
            (EnemyType::Normal, speed, size, 1.0, 10)
        } else if roll < 0.85 {
            (EnemyType::Fast, speed * 1.5, size, 1.0, 15)
        } else {
            (EnemyType::Big, speed * 0.7, size * 1.5, 3.0, 25)
        };
        let x = spawn_x(rng, field, radius);
        GameObject::new(
            ObjectKind::Enemy { enemy, points },
            Vec2::new(x, -radius),
            Vec2::new(0.0, speed),
            radius,
            health,
        )
    }

    fn spawn_obstacle(&self, rng: &mut ChaCha8Rng, field: &PlayField) -> GameObject {
        let radius = rng.gen_range(28.0..40.0);
        let x = spawn_x(rng, field, radius);
        let vel = Vec2::new(rng.gen_range(-20.0..20.0), rng.gen_range(40.0..70.0));
        GameObject::new(
            ObjectKind::Obstacle {
                obstacle: ObstacleType::Asteroid,
                points: 50,
            },
            Vec2::new(x, -radius),
            vel,
            radius,
            5.0,
        )
    }

    fn spawn_pickup(&self, rng: &mut ChaCha8Rng, field: &PlayField) -> Option<GameObject> {
        let roll: f32 = rng.gen();
        let kind = if roll < 0.6 {
            PickupKind::Coin
        } else if roll < 0.9 {
            PickupKind::Star
        } else {
            PickupKind::Heart
        };
        let x = spawn_x(rng, field, 12.0);
        Some(GameObject::new(
            ObjectKind::Pickup(kind),
            Vec2::new(x, -12.0),
            Vec2::new(0.0, 90.0),
            12.0,
            1.0,
        ))
    }

    fn volley(&self, weapon: WeaponKind, stats: &WeaponStats, player: &Player) -> Vec<Launch> {
        let muzzle = Vec2::new(0.0, -player.radius);
        let headings: &[f32] = match weapon {
            WeaponKind::Spread => &SPREAD_HEADINGS,
            _ => &[0.0],
        };
        headings
            .iter()
            .map(|h| Launch {
                offset: muzzle,
                vel: Vec2::from_heading(*h) * stats.projectile_speed,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_spread_fans_out() {
        let rules = ShooterRules;
        let stats = WeaponStats::for_kind(GameKind::Shooter, WeaponKind::Spread);
        let player = crate::game::Simulation::new(GameKind::Shooter, Default::default())
            .state()
            .player
            .clone();
        let launches = rules.volley(WeaponKind::Spread, &stats, &player);
        assert_eq!(launches.len(), 5);
        assert!(launches[0].vel.x < 0.0 && launches[4].vel.x > 0.0);
        assert!(launches.iter().all(|l| l.vel.y < 0.0));
    }

    #[test]
    fn test_enemies_enter_from_top_inside_field() {
        let rules = ShooterRules;
        let field = rules.field();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..100 {
            let enemy = rules.spawn_enemy(&mut rng, &field, 3);
            assert!(enemy.pos.y < 0.0);
            assert!(enemy.vel.y > 0.0);
            assert!(enemy.pos.x - enemy.radius >= field.edge_margin);
            assert!(enemy.kind.points() > 0);
        }
    }
}
