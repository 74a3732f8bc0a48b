//! Game simulation modules

pub mod combat;
pub mod flight;
pub mod physics;
pub mod shooter;
pub mod simulation;
pub mod spawn;

pub use combat::{Ammo, Cooldowns, WeaponKind, WeaponStats, WeaponTable};
pub use physics::{PlayField, Vec2};
pub use simulation::{AbilityStats, SimConfig, Simulation, TickOutput};

use serde::{Deserialize, Serialize};

/// Which game the session runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    #[default]
    Shooter,
    Flight,
}

impl GameKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shooter => "shooter",
            Self::Flight => "flight",
        }
    }
}

/// How many hands drive the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandMode {
    #[default]
    Single,
    Dual,
}

impl HandMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Dual => "dual",
        }
    }
}

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Playing,
    Paused,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyType {
    // shooter
    Normal,
    Fast,
    Big,
    // flight
    Fighter,
    Bomber,
    Interceptor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleType {
    Asteroid,
    Balloon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupKind {
    Coin,
    Star,
    Heart,
}

impl PickupKind {
    pub fn points(&self) -> u64 {
        match self {
            Self::Coin => 20,
            Self::Star => 50,
            Self::Heart => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Explosion,
    Blast,
    Shockwave,
}

/// In-flight projectile state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileData {
    pub weapon: WeaponKind,
    pub damage: f32,
    /// Seconds of homing guidance left
    pub homing_fuel: f32,
    pub turn_rate: f32,
    pub blast_radius: Option<f32>,
    /// Seconds until detonation
    pub fuse: Option<f32>,
    pub gravity: f32,
}

/// What a game object is, with its per-kind data
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObjectKind {
    Projectile(ProjectileData),
    Enemy { enemy: EnemyType, points: u64 },
    Obstacle { obstacle: ObstacleType, points: u64 },
    Pickup(PickupKind),
    Effect { effect: EffectKind, growth: f32 },
}

impl ObjectKind {
    /// Enemies and obstacles take damage and score points
    pub fn is_target(&self) -> bool {
        matches!(self, Self::Enemy { .. } | Self::Obstacle { .. })
    }

    pub fn points(&self) -> u64 {
        match self {
            Self::Enemy { points, .. } | Self::Obstacle { points, .. } => *points,
            _ => 0,
        }
    }
}

/// Any non-player object on the field
#[derive(Debug, Clone, PartialEq)]
pub struct GameObject {
    /// Assigned on insertion; unique per simulation
    pub id: u64,
    pub kind: ObjectKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub health: f32,
    /// Seconds left to live; `None` lives until culled
    pub ttl: Option<f32>,
}

impl GameObject {
    pub fn new(kind: ObjectKind, pos: Vec2, vel: Vec2, radius: f32, health: f32) -> Self {
        Self {
            id: 0,
            kind,
            pos,
            vel,
            radius,
            health,
            ttl: None,
        }
    }

    pub fn with_ttl(mut self, ttl: f32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn effect(effect: EffectKind, pos: Vec2, radius: f32, growth: f32, ttl: f32) -> Self {
        Self::new(
            ObjectKind::Effect { effect, growth },
            pos,
            Vec2::ZERO,
            radius,
            0.0,
        )
        .with_ttl(ttl)
    }

    pub fn is_alive_target(&self) -> bool {
        self.kind.is_target() && self.health > 0.0
    }
}

/// The player's ship. Kept outside the object list: there is exactly one.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    /// Bank angle in degrees, positive rolls right
    pub banking: f32,
    /// 0..=1
    pub throttle: f32,
    pub shield_ticks: u32,
    pub shield_charges: u32,
    /// Ticks until the next shield charge is restored
    pub shield_recharge_ticks: u32,
    pub invulnerable_ticks: u32,
    pub special_cooldown: u32,
    pub dash_cooldown: u32,
    pub cooldowns: Cooldowns,
    pub ammo: Option<Ammo>,
}

impl Player {
    pub fn shield_active(&self) -> bool {
        self.shield_ticks > 0
    }

    pub fn invulnerable(&self) -> bool {
        self.invulnerable_ticks > 0
    }
}

/// Everything the renderer needs about one session
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub game: GameKind,
    pub mode: HandMode,
    pub phase: SessionPhase,
    pub field: PlayField,
    pub tick: u64,
    /// Seconds of play (paused time excluded)
    pub elapsed: f32,
    pub score: u64,
    pub lives: u32,
    pub max_lives: u32,
    pub level: u32,
    pub player: Player,
    pub objects: Vec<GameObject>,
}

impl GameState {
    pub fn count(&self, pred: impl Fn(&ObjectKind) -> bool) -> usize {
        self.objects.iter().filter(|o| pred(&o.kind)).count()
    }
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    Fired { weapon: WeaponKind, projectiles: u32 },
    Hit { target_id: u64, damage: f32 },
    Destroyed { target_id: u64, points: u64 },
    Detonated { x: f32, y: f32, radius: f32 },
    ShieldActivated { charges_left: u32 },
    ShieldAbsorbed { target_id: u64 },
    Burst { radius: f32 },
    Dashed { x: f32 },
    PlayerHit { lives_left: u32 },
    PickupCollected { pickup: PickupKind },
    LevelUp { level: u32 },
    GameOver { final_score: u64 },
}

/// Internal invariant violation; fatal for the session
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    #[error("Lives would drop below zero")]
    LivesUnderflow,

    #[error("Lives {lives} exceed the maximum of {max}")]
    LivesOutOfBounds { lives: u32, max: u32 },

    #[error("Object count {count} exceeds the limit of {max}")]
    ObjectOverflow { count: usize, max: usize },

    #[error("Score went backwards from {before} to {after}")]
    ScoreRegression { before: u64, after: u64 },
}
