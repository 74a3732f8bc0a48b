//! Control binding: tracked hand state → simulation commands.
//!
//! Pure lookup. In single-hand mode the one hand both steers and fires. In
//! dual-hand mode the left hand steers (and in flight also banks and sets
//! throttle) while the right hand only fires. Sustained gestures (pinches)
//! are level-triggered and fire every frame they are held; everything else
//! is edge-triggered on the frame the gesture becomes stable.

use crate::game::{GameKind, HandMode, WeaponKind};
use crate::hand::{Combo, GestureKind, HandRole, TrackUpdate};

/// One tick's instruction to the simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlCommand {
    /// Normalized [0,1] target for the player
    MoveTo { x: f32, y: f32 },
    Fire(WeaponKind),
    ActivateShield,
    SpecialAttack,
    BarrelRoll,
    /// Throttle change, applied to a 0..=1 throttle
    SetThrottle(f32),
    /// Absolute bank angle in degrees
    Bank(f32),
    /// Sideways dash; sign picks the direction
    Dash(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    /// Every frame while the gesture is stable
    Level,
    /// Only on the frame it becomes stable
    Edge,
}

/// Throttle applied every frame in single-hand flight
const CRUISE_THROTTLE: f32 = 0.02;

/// Bank angle limit in degrees
const MAX_BANK: f32 = 45.0;

const DASH_LEFT: [ControlCommand; 1] = [ControlCommand::Dash(-1.0)];
const DASH_RIGHT: [ControlCommand; 1] = [ControlCommand::Dash(1.0)];

fn level(commands: &'static [ControlCommand]) -> Option<(Trigger, &'static [ControlCommand])> {
    Some((Trigger::Level, commands))
}

fn edge(commands: &'static [ControlCommand]) -> Option<(Trigger, &'static [ControlCommand])> {
    Some((Trigger::Edge, commands))
}

fn gesture_binding(
    game: GameKind,
    gesture: GestureKind,
) -> Option<(Trigger, &'static [ControlCommand])> {
    use ControlCommand::*;
    use GestureKind as G;
    use WeaponKind as W;

    match (game, gesture) {
        (_, G::None) => None,

        (GameKind::Shooter, G::Pinch) => level(&[Fire(W::Standard)]),
        (GameKind::Shooter, G::TightPinch) => level(&[Fire(W::MachineGun)]),
        (GameKind::Shooter, G::PointUp) => edge(&[Fire(W::Missile)]),
        (GameKind::Shooter, G::PointDown) => edge(&[Fire(W::Bomb)]),
        (GameKind::Shooter, G::PointLeft) => edge(&DASH_LEFT),
        (GameKind::Shooter, G::PointRight) => edge(&DASH_RIGHT),
        (GameKind::Shooter, G::ThumbsUp | G::OpenPalm) => edge(&[ActivateShield]),
        (GameKind::Shooter, G::Peace) => edge(&[Fire(W::Spread)]),
        (GameKind::Shooter, G::Fist) => edge(&[SpecialAttack]),

        (GameKind::Flight, G::Pinch | G::TightPinch) => level(&[Fire(W::MachineGun)]),
        (GameKind::Flight, G::PointUp | G::PointDown | G::PointLeft | G::PointRight) => {
            edge(&[Fire(W::Missile)])
        }
        (GameKind::Flight, G::ThumbsUp) => edge(&[ActivateShield]),
        (GameKind::Flight, G::OpenPalm) => edge(&[Fire(W::Bomb)]),
        (GameKind::Flight, G::Peace) => edge(&[BarrelRoll]),
        (GameKind::Flight, G::Fist) => None,
    }
}

fn combo_commands(combo: Combo) -> &'static [ControlCommand] {
    match combo {
        Combo::SuperBlast => &[
            ControlCommand::Fire(WeaponKind::Spread),
            ControlCommand::SpecialAttack,
        ],
        Combo::ShieldShot => &[
            ControlCommand::ActivateShield,
            ControlCommand::Fire(WeaponKind::Missile),
        ],
    }
}

/// Left-hand throttle in dual-hand flight
fn dual_throttle(gesture: GestureKind) -> f32 {
    match gesture {
        GestureKind::OpenPalm => 0.06,
        GestureKind::Peace => 0.04,
        GestureKind::Fist => -0.04,
        _ => -0.01,
    }
}

/// Bank angle from the wrist → index vector, halved and clamped
fn bank_angle(pointing: (f32, f32)) -> f32 {
    let (dx, dy) = pointing;
    let degrees = dx.atan2(-dy).to_degrees();
    (degrees * 0.5).clamp(-MAX_BANK, MAX_BANK)
}

/// Translate one hand's tracking update into commands.
/// Lost hands, roles that do not belong to `mode` and unmapped gestures
/// produce nothing.
pub fn bind(game: GameKind, mode: HandMode, update: &TrackUpdate) -> Vec<ControlCommand> {
    let mut commands = Vec::new();
    if update.is_lost {
        return commands;
    }
    let Some((x, y)) = update.position else {
        return commands;
    };

    let (steers, fires) = match (mode, update.role) {
        (HandMode::Single, HandRole::Single) => (true, true),
        (HandMode::Dual, HandRole::Left) => (true, false),
        (HandMode::Dual, HandRole::Right) => (false, true),
        _ => return commands,
    };

    if steers {
        commands.push(ControlCommand::MoveTo { x, y });
        if game == GameKind::Flight {
            if let Some(features) = update.features {
                commands.push(ControlCommand::Bank(bank_angle(features.pointing)));
            }
            let throttle = match mode {
                HandMode::Single => CRUISE_THROTTLE,
                HandMode::Dual => dual_throttle(update.stable),
            };
            commands.push(ControlCommand::SetThrottle(throttle));
        }
    }

    if fires {
        if let Some((trigger, bound)) = gesture_binding(game, update.stable) {
            let active = match trigger {
                Trigger::Level => true,
                Trigger::Edge => update.entered,
            };
            if active {
                commands.extend_from_slice(bound);
            }
        }
        if let Some(combo) = update.combo {
            // A command issues at most once per tick
            for command in combo_commands(combo) {
                if !commands.contains(command) {
                    commands.push(*command);
                }
            }
        }
    }

    commands
}
