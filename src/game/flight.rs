//! Flight combat: limited ammo, throttle-driven scrolling, banking turrets

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::combat::{Ammo, WeaponKind, WeaponStats};
use super::physics::{PlayField, Vec2};
use super::simulation::{Launch, Ruleset};
use super::spawn::{spawn_x, SpawnRate, SpawnSchedule};
use super::{EnemyType, GameKind, GameObject, ObjectKind, ObstacleType, Player};

/// Scroll speed at full throttle (px/s)
const MAX_SCROLL: f32 = 120.0;

/// Sideways drift bullets pick up at full bank (px/s)
const BANK_DRIFT: f32 = 60.0;

/// Horizontal offset of the twin guns
const GUN_OFFSET: f32 = 15.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct FlightRules;

impl Ruleset for FlightRules {
    fn kind(&self) -> GameKind {
        GameKind::Flight
    }

    fn field(&self) -> PlayField {
        PlayField::flight()
    }

    fn player_radius(&self) -> f32 {
        25.0
    }

    fn starting_ammo(&self) -> Option<Ammo> {
        Some(Ammo::flight())
    }

    fn starting_throttle(&self) -> f32 {
        0.5
    }

    fn spawn_schedule(&self) -> SpawnSchedule {
        SpawnSchedule {
            enemy: SpawnRate {
                base: 3.0,
                floor: 0.6,
                ramps: true,
            },
            obstacle: SpawnRate {
                base: 6.0,
                floor: 2.5,
                ramps: true,
            },
            pickup: None,
        }
    }

    fn spawn_enemy(&self, rng: &mut ChaCha8Rng, field: &PlayField, _level: u32) -> GameObject {
        let roll: f32 = rng.gen();
        let (enemy, radius, health, speed_scale) = if roll < 0.5 {
            (EnemyType::Fighter, 20.0, 1.0, 1.0)
        } else if roll < 0.75 {
            (EnemyType::Bomber, 30.0, 3.0, 0.8)
        } else {
            (EnemyType::Interceptor, 22.0, 2.0, 1.3)
        };
        let x = spawn_x(rng, field, radius);
        let vel = Vec2::new(
            rng.gen_range(-60.0..60.0),
            rng.gen_range(60.0..150.0) * speed_scale,
        );
        GameObject::new(
            ObjectKind::Enemy {
                enemy,
                points: 100,
            },
            Vec2::new(x, -radius),
            vel,
            radius,
            health,
        )
    }

    fn spawn_obstacle(&self, rng: &mut ChaCha8Rng, field: &PlayField) -> GameObject {
        let radius = 26.0;
        let x = spawn_x(rng, field, radius);
        GameObject::new(
            ObjectKind::Obstacle {
                obstacle: ObstacleType::Balloon,
                points: 75,
            },
            Vec2::new(x, -radius),
            Vec2::new(rng.gen_range(-15.0..15.0), 30.0),
            radius,
            4.0,
        )
    }

    fn volley(&self, weapon: WeaponKind, stats: &WeaponStats, player: &Player) -> Vec<Launch> {
        let drift = player.banking.to_radians().sin() * BANK_DRIFT;
        let forward = Vec2::new(drift, -stats.projectile_speed);
        let muzzle = Vec2::new(0.0, -player.radius);
        match weapon {
            WeaponKind::MachineGun => [-GUN_OFFSET, GUN_OFFSET]
                .iter()
                .map(|dx| Launch {
                    offset: muzzle + Vec2::new(*dx, 0.0),
                    vel: forward,
                })
                .collect(),
            WeaponKind::Spread => [-20.0f32, 0.0, 20.0]
                .iter()
                .map(|h| Launch {
                    offset: muzzle,
                    vel: Vec2::from_heading(*h) * stats.projectile_speed + Vec2::new(drift, 0.0),
                })
                .collect(),
            WeaponKind::Standard | WeaponKind::Missile | WeaponKind::Bomb => vec![Launch {
                offset: muzzle,
                vel: forward,
            }],
        }
    }

    fn steer_enemy(&self, rng: &mut ChaCha8Rng, vel: &mut Vec2, dt: f32) {
        // Occasional jink, about twice a second across the whole wave
        if rng.gen_bool((0.6 * dt).clamp(0.0, 1.0) as f64) {
            vel.x = rng.gen_range(-60.0..60.0);
        }
    }

    fn scroll_speed(&self, player: &Player) -> f32 {
        player.throttle.clamp(0.0, 1.0) * MAX_SCROLL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{SimConfig, Simulation};

    fn player() -> Player {
        Simulation::new(GameKind::Flight, SimConfig::default())
            .state()
            .player
            .clone()
    }

    #[test]
    fn test_banking_drifts_bullets() {
        let stats = WeaponStats::for_kind(GameKind::Flight, WeaponKind::MachineGun);
        let mut p = player();
        p.banking = 30.0;
        let launches = FlightRules.volley(WeaponKind::MachineGun, &stats, &p);
        assert_eq!(launches.len(), 2);
        assert!(launches.iter().all(|l| l.vel.x > 0.0));
        assert_ne!(launches[0].offset, launches[1].offset);
    }

    #[test]
    fn test_throttle_sets_scroll() {
        let mut p = player();
        p.throttle = 0.0;
        assert_eq!(FlightRules.scroll_speed(&p), 0.0);
        p.throttle = 1.0;
        assert_eq!(FlightRules.scroll_speed(&p), MAX_SCROLL);
    }

    #[test]
    fn test_starts_with_ammo() {
        let p = player();
        assert_eq!(p.ammo, Some(Ammo::flight()));
        assert_eq!(p.throttle, 0.5);
    }
}
