//! Spawn timing and difficulty progression

use rand::Rng;

use super::physics::PlayField;

/// Score needed per level
pub const POINTS_PER_LEVEL: u64 = 500;

/// Level shown on the HUD for a given score
pub fn level_for(score: u64) -> u32 {
    1 + (score / POINTS_PER_LEVEL).min(u32::MAX as u64 - 1) as u32
}

/// Spawn-rate scaling with score and elapsed play time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyRamp {
    /// 0 disables ramping
    pub rate: f32,
}

impl DifficultyRamp {
    pub fn factor(&self, score: u64, elapsed: f32) -> f32 {
        1.0 + self.rate.max(0.0) * (score as f32 / 1000.0 + elapsed / 60.0)
    }

    /// Base interval shortened by the ramp, never below `floor`
    pub fn interval(&self, base: f32, floor: f32, score: u64, elapsed: f32) -> f32 {
        (base / self.factor(score, elapsed)).max(floor)
    }
}

/// Base and minimum interval for one spawn stream (seconds)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRate {
    pub base: f32,
    pub floor: f32,
    /// Whether the difficulty ramp shortens this stream
    pub ramps: bool,
}

/// Spawn rates for all streams of a game
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnSchedule {
    pub enemy: SpawnRate,
    pub obstacle: SpawnRate,
    pub pickup: Option<SpawnRate>,
}

/// Which streams fire this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnDue {
    pub enemy: bool,
    pub obstacle: bool,
    pub pickup: bool,
}

#[derive(Debug, Clone, Copy)]
struct SpawnTimer {
    rate: SpawnRate,
    remaining: f32,
}

impl SpawnTimer {
    fn new(rate: SpawnRate) -> Self {
        Self {
            rate,
            remaining: rate.base,
        }
    }

    fn advance(&mut self, dt: f32, ramp: &DifficultyRamp, score: u64, elapsed: f32) -> bool {
        self.remaining -= dt;
        if self.remaining > 0.0 {
            return false;
        }
        self.remaining = if self.rate.ramps {
            ramp.interval(self.rate.base, self.rate.floor, score, elapsed)
        } else {
            self.rate.base
        };
        true
    }
}

/// Countdown timers for each spawn stream
#[derive(Debug, Clone)]
pub struct Spawner {
    ramp: DifficultyRamp,
    enemy: SpawnTimer,
    obstacle: SpawnTimer,
    pickup: Option<SpawnTimer>,
}

impl Spawner {
    pub fn new(schedule: SpawnSchedule, ramp: DifficultyRamp) -> Self {
        Self {
            ramp,
            enemy: SpawnTimer::new(schedule.enemy),
            obstacle: SpawnTimer::new(schedule.obstacle),
            pickup: schedule.pickup.map(SpawnTimer::new),
        }
    }

    /// Current enemy interval, for logging and the HUD
    pub fn enemy_interval(&self, score: u64, elapsed: f32) -> f32 {
        let rate = self.enemy.rate;
        self.ramp.interval(rate.base, rate.floor, score, elapsed)
    }

    pub fn advance(&mut self, dt: f32, score: u64, elapsed: f32) -> SpawnDue {
        let ramp = self.ramp;
        SpawnDue {
            enemy: self.enemy.advance(dt, &ramp, score, elapsed),
            obstacle: self.obstacle.advance(dt, &ramp, score, elapsed),
            pickup: self
                .pickup
                .as_mut()
                .map(|t| t.advance(dt, &ramp, score, elapsed))
                .unwrap_or(false),
        }
    }
}

/// Random x for an object entering from the top edge
pub fn spawn_x<R: Rng>(rng: &mut R, field: &PlayField, radius: f32) -> f32 {
    let lo = field.edge_margin + radius;
    let hi = field.width - field.edge_margin - radius;
    if hi <= lo {
        return field.width / 2.0;
    }
    rng.gen_range(lo..hi)
}
