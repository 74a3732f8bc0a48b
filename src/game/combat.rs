//! Combat system - weapons, cooldowns, ammo, damage

use serde::{Deserialize, Serialize};

use super::GameKind;

/// Weapon a `Fire` command selects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    Standard,
    MachineGun,
    Missile,
    Bomb,
    Spread,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 5] = [
        WeaponKind::Standard,
        WeaponKind::MachineGun,
        WeaponKind::Missile,
        WeaponKind::Bomb,
        WeaponKind::Spread,
    ];

    fn index(self) -> usize {
        match self {
            Self::Standard => 0,
            Self::MachineGun => 1,
            Self::Missile => 2,
            Self::Bomb => 3,
            Self::Spread => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::MachineGun => "machine_gun",
            Self::Missile => "missile",
            Self::Bomb => "bomb",
            Self::Spread => "spread",
        }
    }
}

/// Weapon stats for one weapon kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponStats {
    /// Damage per hit
    pub damage: f32,
    /// Projectile speed (px/s)
    pub projectile_speed: f32,
    /// Projectile hitbox radius
    pub projectile_radius: f32,
    /// Ticks between volleys
    pub cooldown_ticks: u32,
    /// Projectile lifetime (seconds)
    pub projectile_lifetime: f32,
    /// Seconds of homing guidance; `None` flies straight
    pub homing_fuel: Option<f32>,
    /// Fraction of heading error corrected per second while homing
    pub turn_rate: f32,
    /// Area-damage radius on detonation
    pub blast_radius: Option<f32>,
    /// Seconds until a detonating projectile goes off on its own
    pub fuse: Option<f32>,
    /// Downward acceleration (px/s²)
    pub gravity: f32,
}

impl WeaponStats {
    const fn bullet(damage: f32, speed: f32, radius: f32, cooldown_ticks: u32, lifetime: f32) -> Self {
        Self {
            damage,
            projectile_speed: speed,
            projectile_radius: radius,
            cooldown_ticks,
            projectile_lifetime: lifetime,
            homing_fuel: None,
            turn_rate: 0.0,
            blast_radius: None,
            fuse: None,
            gravity: 0.0,
        }
    }

    pub fn for_kind(game: GameKind, weapon: WeaponKind) -> Self {
        match (game, weapon) {
            (_, WeaponKind::Standard) => Self::bullet(1.0, 360.0, 5.0, 6, 3.0),
            (_, WeaponKind::Spread) => Self::bullet(1.0, 330.0, 6.0, 15, 2.5),
            (GameKind::Shooter, WeaponKind::MachineGun) => Self::bullet(1.0, 480.0, 3.0, 3, 2.0),
            (GameKind::Flight, WeaponKind::MachineGun) => Self::bullet(1.0, 360.0, 3.0, 3, 2.0),
            (GameKind::Shooter, WeaponKind::Missile) => Self {
                homing_fuel: Some(4.0),
                turn_rate: 4.0,
                ..Self::bullet(4.0, 240.0, 8.0, 24, 5.0)
            },
            (GameKind::Flight, WeaponKind::Missile) => Self {
                homing_fuel: Some(200.0 / 30.0),
                turn_rate: 3.0,
                ..Self::bullet(5.0, 240.0, 8.0, 24, 6.0)
            },
            (GameKind::Shooter, WeaponKind::Bomb) => Self {
                blast_radius: Some(90.0),
                fuse: Some(1.2),
                ..Self::bullet(6.0, 150.0, 15.0, 45, 4.0)
            },
            (GameKind::Flight, WeaponKind::Bomb) => Self {
                blast_radius: Some(100.0),
                fuse: Some(1.5),
                gravity: 180.0,
                ..Self::bullet(10.0, 240.0, 12.0, 45, 4.0)
            },
        }
    }
}

/// Weapon stats for every kind in one game
#[derive(Debug, Clone, PartialEq)]
pub struct WeaponTable {
    stats: [WeaponStats; 5],
}

impl WeaponTable {
    pub fn for_game(game: GameKind) -> Self {
        Self {
            stats: WeaponKind::ALL.map(|w| WeaponStats::for_kind(game, w)),
        }
    }

    pub fn get(&self, weapon: WeaponKind) -> &WeaponStats {
        &self.stats[weapon.index()]
    }

    pub fn get_mut(&mut self, weapon: WeaponKind) -> &mut WeaponStats {
        &mut self.stats[weapon.index()]
    }
}

/// Per-weapon cooldowns counted in ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cooldowns {
    remaining: [u32; 5],
}

impl Cooldowns {
    pub fn ready(&self, weapon: WeaponKind) -> bool {
        self.remaining[weapon.index()] == 0
    }

    pub fn remaining(&self, weapon: WeaponKind) -> u32 {
        self.remaining[weapon.index()]
    }

    pub fn trigger(&mut self, weapon: WeaponKind, ticks: u32) {
        self.remaining[weapon.index()] = ticks;
    }

    /// Called once at the end of every playing tick
    pub fn tick_down(&mut self) {
        for r in self.remaining.iter_mut() {
            *r = r.saturating_sub(1);
        }
    }
}

/// Limited ammunition; `Standard` and `Spread` are unlimited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ammo {
    pub bullets: u32,
    pub missiles: u32,
    pub bombs: u32,
}

impl Ammo {
    pub fn flight() -> Self {
        Self {
            bullets: 999,
            missiles: 10,
            bombs: 5,
        }
    }

    /// Rounds one volley of `weapon` consumes
    pub fn rounds_per_volley(weapon: WeaponKind) -> u32 {
        match weapon {
            WeaponKind::MachineGun => 2,
            WeaponKind::Missile | WeaponKind::Bomb => 1,
            WeaponKind::Standard | WeaponKind::Spread => 0,
        }
    }

    /// Spend ammo for a volley; false (and nothing spent) when short
    pub fn take(&mut self, weapon: WeaponKind) -> bool {
        let rounds = Self::rounds_per_volley(weapon);
        let pool = match weapon {
            WeaponKind::MachineGun => &mut self.bullets,
            WeaponKind::Missile => &mut self.missiles,
            WeaponKind::Bomb => &mut self.bombs,
            WeaponKind::Standard | WeaponKind::Spread => return true,
        };
        match pool.checked_sub(rounds) {
            Some(left) => {
                *pool = left;
                true
            }
            None => false,
        }
    }
}

/// Stateless damage rules
pub struct CombatSystem;

impl CombatSystem {
    /// Apply damage to health, returns (new_health, is_dead)
    pub fn apply_damage(current_health: f32, damage: f32) -> (f32, bool) {
        let new_health = (current_health - damage).max(0.0);
        (new_health, new_health <= 0.0)
    }

    /// Blast damage with linear falloff to half at the edge
    pub fn blast_damage(base_damage: f32, distance: f32, blast_radius: f32) -> f32 {
        if blast_radius <= 0.0 {
            return base_damage;
        }
        let falloff = (distance / blast_radius).clamp(0.0, 1.0);
        base_damage * (1.0 - 0.5 * falloff)
    }
}
