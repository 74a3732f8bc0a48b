//! Play-field geometry, motion integration and collision tests

use std::ops::{Add, AddAssign, Mul, Sub};

use serde::{Deserialize, Serialize};

/// 2D vector in play-field pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector at `degrees` from straight up, clockwise
    pub fn from_heading(degrees: f32) -> Self {
        let r = degrees.to_radians();
        Self::new(r.sin(), -r.cos())
    }

    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (other - self).length()
    }

    pub fn distance_sq(self, other: Vec2) -> f32 {
        let d = other - self;
        d.x * d.x + d.y * d.y
    }

    /// Unit vector, or `None` for a (near) zero vector
    pub fn normalized(self) -> Option<Vec2> {
        let len = self.length();
        if len < 1e-6 {
            None
        } else {
            Some(self * (1.0 / len))
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Bounded region all game objects live in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayField {
    pub width: f32,
    pub height: f32,
    /// Inset from the side edges for spawn positions
    pub edge_margin: f32,
    /// How far past an edge an object may travel before it is culled
    pub cull_margin: f32,
}

impl PlayField {
    pub fn shooter() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            edge_margin: 20.0,
            cull_margin: 50.0,
        }
    }

    pub fn flight() -> Self {
        Self {
            width: 1000.0,
            height: 700.0,
            edge_margin: 50.0,
            cull_margin: 50.0,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Map normalized [0,1] coordinates onto the field
    pub fn map_normalized(&self, nx: f32, ny: f32) -> Vec2 {
        Vec2::new(nx * self.width, ny * self.height)
    }

    /// Clamp a position so a circle of `radius` stays fully inside
    pub fn clamp_inside(&self, pos: Vec2, radius: f32) -> Vec2 {
        let rx = radius.min(self.width / 2.0);
        let ry = radius.min(self.height / 2.0);
        Vec2::new(
            pos.x.clamp(rx, self.width - rx),
            pos.y.clamp(ry, self.height - ry),
        )
    }

    /// True once a position is past the cull margin on any side
    pub fn is_outside(&self, pos: Vec2) -> bool {
        let m = self.cull_margin;
        pos.x < -m || pos.x > self.width + m || pos.y < -m || pos.y > self.height + m
    }
}

/// Stateless motion and collision helpers
pub struct PhysicsSystem;

impl PhysicsSystem {
    /// Circle overlap test; touching counts as overlap
    pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
        let combined = radius_a + radius_b;
        a.distance_sq(b) <= combined * combined
    }

    /// Overlap test for a circle moving from `start` to `end` in one step,
    /// so fast projectiles cannot skip over a target between ticks
    pub fn swept_overlap(
        start: Vec2,
        end: Vec2,
        radius: f32,
        center: Vec2,
        target_radius: f32,
    ) -> bool {
        let seg = end - start;
        let len_sq = seg.x * seg.x + seg.y * seg.y;
        let t = if len_sq < 1e-9 {
            0.0
        } else {
            let to_center = center - start;
            ((to_center.x * seg.x + to_center.y * seg.y) / len_sq).clamp(0.0, 1.0)
        };
        Self::circles_overlap(start + seg * t, radius, center, target_radius)
    }

    /// Linear motion over `dt` seconds
    pub fn integrate(pos: Vec2, vel: Vec2, dt: f32) -> Vec2 {
        pos + vel * dt
    }

    /// Turn `vel` toward `target` while keeping its speed.
    /// `turn_rate` is the fraction of the heading error corrected per second.
    pub fn steer_toward(pos: Vec2, vel: Vec2, target: Vec2, turn_rate: f32, dt: f32) -> Vec2 {
        let speed = vel.length();
        let Some(desired_dir) = (target - pos).normalized() else {
            return vel;
        };
        let desired = desired_dir * speed;
        let blend = (turn_rate * dt).clamp(0.0, 1.0);
        let blended = vel + (desired - vel) * blend;
        match blended.normalized() {
            Some(dir) => dir * speed,
            None => desired,
        }
    }

    /// Closest candidate to `from`
    pub fn nearest<I>(from: Vec2, candidates: I) -> Option<(u64, Vec2)>
    where
        I: IntoIterator<Item = (u64, Vec2)>,
    {
        candidates.into_iter().min_by(|a, b| {
            from.distance_sq(a.1)
                .partial_cmp(&from.distance_sq(b.1))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }
}
