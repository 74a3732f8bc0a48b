//! Render frame building.
//!
//! Frames are plain data: a list of drawing primitives in play-field pixels
//! plus HUD values. The host owns the window and draws them; the core never
//! touches a graphics API. Building is a pure function of the game state so
//! identical states always produce identical frames.

use serde::{Deserialize, Serialize};

use crate::game::{
    Ammo, EffectKind, EnemyType, GameKind, GameObject, GameState, HandMode, ObjectKind,
    ObstacleType, PickupKind, PlayField, SessionPhase, WeaponKind,
};
use crate::hand::landmarks::HAND_SKELETON;
use crate::hand::{Combo, GestureKind, HandRole, Landmark};
use crate::util::time::ticks_to_secs;

pub type Rgb = [u8; 3];

pub mod palette {
    use super::Rgb;

    pub const PLAYER: Rgb = [80, 200, 255];
    pub const SHIELD: Rgb = [120, 160, 255];
    pub const BULLET: Rgb = [255, 255, 120];
    pub const MISSILE: Rgb = [255, 140, 40];
    pub const BOMB: Rgb = [200, 60, 60];
    pub const ENEMY: Rgb = [235, 70, 70];
    pub const ENEMY_FAST: Rgb = [255, 120, 200];
    pub const ENEMY_BIG: Rgb = [170, 40, 40];
    pub const OBSTACLE: Rgb = [140, 120, 100];
    pub const COIN: Rgb = [255, 215, 0];
    pub const STAR: Rgb = [255, 255, 255];
    pub const HEART: Rgb = [255, 80, 120];
    pub const EFFECT: Rgb = [255, 180, 60];
    pub const TEXT: Rgb = [240, 240, 240];
    pub const HAND: Rgb = [0, 255, 140];
    pub const HAND_LOST: Rgb = [120, 120, 120];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Circle,
    Ring,
    Ship,
    Star,
    Line,
    Text,
}

/// One thing to draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    pub shape: Shape,
    pub x: f32,
    pub y: f32,
    /// Radius for round shapes, font size for text
    pub size: f32,
    /// Degrees, clockwise
    #[serde(default)]
    pub rotation: f32,
    pub color: Rgb,
    /// End point for lines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<(f32, f32)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Primitive {
    pub fn new(shape: Shape, x: f32, y: f32, size: f32, color: Rgb) -> Self {
        Self {
            shape,
            x,
            y,
            size,
            rotation: 0.0,
            color,
            to: None,
            label: None,
        }
    }

    pub fn line(from: (f32, f32), to: (f32, f32), color: Rgb) -> Self {
        Self {
            to: Some(to),
            ..Self::new(Shape::Line, from.0, from.1, 1.0, color)
        }
    }

    pub fn text(x: f32, y: f32, size: f32, text: impl Into<String>) -> Self {
        Self {
            label: Some(text.into()),
            ..Self::new(Shape::Text, x, y, size, palette::TEXT)
        }
    }

    pub fn rotated(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShieldHud {
    pub active: bool,
    pub charges: u32,
    pub seconds_left: f32,
}

/// Per-hand status line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandHud {
    pub role: HandRole,
    pub gesture: String,
    pub tracking: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub game: GameKind,
    pub mode: HandMode,
    pub phase: SessionPhase,
    pub score: u64,
    pub lives: u32,
    pub max_lives: u32,
    pub level: u32,
    pub shield: ShieldHud,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ammo: Option<Ammo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throttle: Option<f32>,
    #[serde(default)]
    pub hands: Vec<HandHud>,
}

/// Everything the host needs to draw one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub tick: u64,
    pub width: f32,
    pub height: f32,
    pub primitives: Vec<Primitive>,
    pub hud: Hud,
}

/// Build the frame for a game state
pub fn build(state: &GameState) -> RenderFrame {
    let mut primitives = Vec::with_capacity(state.objects.len() + 4);
    primitives.extend(state.objects.iter().map(object_primitive));
    push_player(&mut primitives, state);

    match state.phase {
        SessionPhase::Playing => {}
        SessionPhase::Paused => {
            let c = state.field.center();
            primitives.push(Primitive::text(c.x, c.y, 48.0, "PAUSED"));
        }
        SessionPhase::GameOver => {
            let c = state.field.center();
            primitives.push(Primitive::text(c.x, c.y - 30.0, 48.0, "GAME OVER"));
            primitives.push(Primitive::text(
                c.x,
                c.y + 30.0,
                28.0,
                format!("Final score: {}", state.score),
            ));
        }
    }

    let player = &state.player;
    RenderFrame {
        tick: state.tick,
        width: state.field.width,
        height: state.field.height,
        primitives,
        hud: Hud {
            game: state.game,
            mode: state.mode,
            phase: state.phase,
            score: state.score,
            lives: state.lives,
            max_lives: state.max_lives,
            level: state.level,
            shield: ShieldHud {
                active: player.shield_active(),
                charges: player.shield_charges,
                seconds_left: ticks_to_secs(player.shield_ticks),
            },
            ammo: player.ammo,
            throttle: (state.game == GameKind::Flight).then_some(player.throttle),
            hands: Vec::new(),
        },
    }
}

fn object_primitive(obj: &GameObject) -> Primitive {
    let (x, y) = (obj.pos.x, obj.pos.y);
    match obj.kind {
        ObjectKind::Projectile(data) => {
            let color = match data.weapon {
                WeaponKind::Missile => palette::MISSILE,
                WeaponKind::Bomb => palette::BOMB,
                _ => palette::BULLET,
            };
            let heading = obj.vel.x.atan2(-obj.vel.y).to_degrees();
            Primitive::new(Shape::Circle, x, y, obj.radius, color).rotated(heading)
        }
        ObjectKind::Enemy { enemy, .. } => {
            let color = match enemy {
                EnemyType::Fast | EnemyType::Interceptor => palette::ENEMY_FAST,
                EnemyType::Big | EnemyType::Bomber => palette::ENEMY_BIG,
                EnemyType::Normal | EnemyType::Fighter => palette::ENEMY,
            };
            // Enemies fly downward
            Primitive::new(Shape::Ship, x, y, obj.radius, color).rotated(180.0)
        }
        ObjectKind::Obstacle { obstacle, .. } => {
            let label = match obstacle {
                ObstacleType::Asteroid => "asteroid",
                ObstacleType::Balloon => "balloon",
            };
            Primitive::new(Shape::Circle, x, y, obj.radius, palette::OBSTACLE).labelled(label)
        }
        ObjectKind::Pickup(kind) => match kind {
            PickupKind::Coin => Primitive::new(Shape::Circle, x, y, obj.radius, palette::COIN),
            PickupKind::Star => Primitive::new(Shape::Star, x, y, obj.radius, palette::STAR),
            PickupKind::Heart => {
                Primitive::new(Shape::Circle, x, y, obj.radius, palette::HEART).labelled("+1")
            }
        },
        ObjectKind::Effect { effect, .. } => {
            let shape = match effect {
                EffectKind::Explosion | EffectKind::Blast => Shape::Circle,
                EffectKind::Shockwave => Shape::Ring,
            };
            Primitive::new(shape, x, y, obj.radius, palette::EFFECT)
        }
    }
}

fn push_player(primitives: &mut Vec<Primitive>, state: &GameState) {
    let player = &state.player;
    if state.phase == SessionPhase::GameOver {
        return;
    }
    // Blink while invulnerable
    let visible = !player.invulnerable() || (state.tick / 3) % 2 == 0;
    if visible {
        primitives.push(
            Primitive::new(
                Shape::Ship,
                player.pos.x,
                player.pos.y,
                player.radius,
                palette::PLAYER,
            )
            .rotated(player.banking),
        );
    }
    if player.shield_active() {
        primitives.push(Primitive::new(
            Shape::Ring,
            player.pos.x,
            player.pos.y,
            player.radius + 12.0,
            palette::SHIELD,
        ));
    }
}

/// What the overlay shows for one tracked hand
#[derive(Debug, Clone, Copy)]
pub struct HandView<'a> {
    pub role: HandRole,
    pub gesture: GestureKind,
    pub tracking: bool,
    /// Smoothed position, normalized
    pub position: Option<(f32, f32)>,
    pub combo: Option<Combo>,
    /// Raw landmarks for the debug skeleton
    pub landmarks: Option<&'a [Landmark]>,
}

/// Add hand status to the HUD, a cursor per tracked hand, and with
/// `debug` on the landmark skeleton
pub fn overlay_hands(frame: &mut RenderFrame, field: &PlayField, hands: &[HandView<'_>], debug: bool) {
    for hand in hands {
        frame.hud.hands.push(HandHud {
            role: hand.role,
            gesture: hand.gesture.as_str().to_string(),
            tracking: hand.tracking,
            combo: hand.combo.map(|c| c.as_str().to_string()),
        });

        let color = if hand.tracking {
            palette::HAND
        } else {
            palette::HAND_LOST
        };

        if let Some((nx, ny)) = hand.position {
            let p = field.map_normalized(nx, ny);
            frame.primitives.push(
                Primitive::new(Shape::Ring, p.x, p.y, 14.0, color)
                    .labelled(format!("{}: {}", hand.role.as_str(), hand.gesture.as_str())),
            );
        }

        if !debug {
            continue;
        }
        let Some(points) = hand.landmarks else {
            continue;
        };
        let to_field = |l: &Landmark| {
            let p = field.map_normalized(l.x, l.y);
            (p.x, p.y)
        };
        for (a, b) in HAND_SKELETON.iter() {
            if let (Some(la), Some(lb)) = (points.get(*a), points.get(*b)) {
                frame
                    .primitives
                    .push(Primitive::line(to_field(la), to_field(lb), color));
            }
        }
        for l in points {
            let (x, y) = to_field(l);
            frame
                .primitives
                .push(Primitive::new(Shape::Circle, x, y, 3.0, color));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{SimConfig, Simulation, Vec2};
    use crate::hand::fixtures::{pose, Pose};
    use crate::hand::landmarks::LANDMARK_COUNT;

    fn state() -> GameState {
        Simulation::new(
            GameKind::Shooter,
            SimConfig {
                spawns_enabled: false,
                ..Default::default()
            },
        )
        .state()
        .clone()
    }

    #[test]
    fn test_build_is_deterministic() {
        let mut s = state();
        s.objects.push(GameObject::new(
            ObjectKind::Pickup(PickupKind::Star),
            Vec2::new(10.0, 10.0),
            Vec2::ZERO,
            12.0,
            1.0,
        ));
        assert_eq!(build(&s), build(&s));
    }

    #[test]
    fn test_player_and_hud() {
        let s = state();
        let frame = build(&s);
        assert_eq!(frame.primitives.len(), 1);
        assert_eq!(frame.primitives[0].shape, Shape::Ship);
        assert_eq!(frame.hud.lives, 3);
        assert_eq!(frame.hud.score, 0);
        assert!(frame.hud.ammo.is_none());
        assert!(frame.hud.throttle.is_none());
        assert_eq!((frame.width, frame.height), (800.0, 600.0));
    }

    #[test]
    fn test_game_over_banner_replaces_player() {
        let mut s = state();
        s.phase = SessionPhase::GameOver;
        s.score = 420;
        let frame = build(&s);
        assert!(frame.primitives.iter().all(|p| p.shape != Shape::Ship));
        assert!(frame
            .primitives
            .iter()
            .any(|p| p.label.as_deref() == Some("Final score: 420")));
    }

    #[test]
    fn test_overlay_debug_skeleton() {
        let s = state();
        let points = pose(Pose::OpenPalm);
        let view = HandView {
            role: HandRole::Single,
            gesture: GestureKind::OpenPalm,
            tracking: true,
            position: Some((0.5, 0.8)),
            combo: None,
            landmarks: Some(&points),
        };

        let mut plain = build(&s);
        overlay_hands(&mut plain, &s.field, &[view], false);
        assert_eq!(plain.hud.hands.len(), 1);
        assert_eq!(plain.hud.hands[0].gesture, "open-palm");
        assert_eq!(plain.primitives.len(), 2);

        let mut debug = build(&s);
        overlay_hands(&mut debug, &s.field, &[view], true);
        assert_eq!(
            debug.primitives.len(),
            2 + HAND_SKELETON.len() + LANDMARK_COUNT
        );
    }

    #[test]
    fn test_frame_serializes() {
        let frame = build(&state());
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["hud"]["phase"], "playing");
        assert_eq!(json["primitives"][0]["shape"], "ship");
    }
}
