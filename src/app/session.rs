//! One game run: classifier, hand tracking, control binding, simulation and
//! render overlay driven in a fixed order once per frame.

use tracing::{debug, error, info};
use uuid::Uuid;

use crate::config::Config;
use crate::control::{self, ControlCommand};
use crate::feed::protocol::{FrameInput, HandInput};
use crate::game::{GameEvent, GameKind, HandMode, SessionPhase, SimConfig, Simulation, SimulationError};
use crate::hand::{GestureClassifier, HandObservation, HandRole, LandmarkSet, TrackingSession};
use crate::render::{self, HandView, RenderFrame};

use super::SessionError;

/// Final numbers of a finished game
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameSummary {
    pub final_score: u64,
    pub level: u32,
    pub ticks: u64,
    pub elapsed: f32,
}

/// Result of one session step
#[derive(Debug, Clone)]
pub struct StepOutput {
    pub frame: RenderFrame,
    pub events: Vec<GameEvent>,
    /// Set only on the tick the game ended
    pub game_over: Option<GameSummary>,
}

/// A game run plus the hand state feeding it
#[derive(Debug)]
pub struct GameSession {
    id: Uuid,
    game: GameKind,
    mode: HandMode,
    debug_overlay: bool,
    /// Fixed seed from configuration; a fresh one per game otherwise
    fixed_seed: Option<u64>,
    sim_template: SimConfig,
    classifier: GestureClassifier,
    tracking: TrackingSession,
    sim: Simulation,
    fault: Option<SimulationError>,
}

impl GameSession {
    pub fn new(config: &Config) -> Self {
        let sim_config = SimConfig {
            difficulty_ramp: config.difficulty_ramp,
            ..Default::default()
        };
        Self::with_sim_config(config, sim_config)
    }

    /// Session with explicit simulation tuning. Mode and seed still come
    /// from `config`.
    pub fn with_sim_config(config: &Config, sim_config: SimConfig) -> Self {
        let sim_template = SimConfig {
            mode: config.hand_mode,
            ..sim_config
        };
        let fixed_seed = config.seed;
        let seed = fixed_seed.unwrap_or_else(rand::random);
        let sim = Simulation::new(
            config.game,
            SimConfig {
                seed,
                ..sim_template.clone()
            },
        );
        let id = Uuid::new_v4();

        info!(
            session_id = %id,
            game = config.game.as_str(),
            mode = config.hand_mode.as_str(),
            seed,
            "Game session started"
        );

        Self {
            id,
            game: config.game,
            mode: config.hand_mode,
            debug_overlay: config.debug_overlay,
            fixed_seed,
            sim_template,
            classifier: GestureClassifier::new(config.thresholds),
            tracking: TrackingSession::new(config.tracking),
            sim,
            fault: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn game(&self) -> GameKind {
        self.game
    }

    pub fn mode(&self) -> HandMode {
        self.mode
    }

    pub fn phase(&self) -> SessionPhase {
        self.sim.phase()
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    #[cfg(test)]
    pub(crate) fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.sim
    }

    /// Whether a fault has stopped this game
    pub fn is_faulted(&self) -> bool {
        self.fault.is_some()
    }

    pub fn pause(&mut self) {
        if self.sim.pause() {
            info!(session_id = %self.id, tick = self.sim.state().tick, "Game paused");
        }
    }

    pub fn resume(&mut self) {
        if self.sim.resume() {
            info!(session_id = %self.id, tick = self.sim.state().tick, "Game resumed");
        }
    }

    /// Throw the current game away and start a fresh one
    pub fn restart(&mut self) {
        let seed = self.fixed_seed.unwrap_or_else(rand::random);
        self.sim = Simulation::new(
            self.game,
            SimConfig {
                seed,
                ..self.sim_template.clone()
            },
        );
        self.tracking.reset();
        self.fault = None;
        info!(session_id = %self.id, seed, "Game restarted");
    }

    /// Hand slots read in this mode
    fn roles(&self) -> &'static [HandRole] {
        match self.mode {
            HandMode::Single => &[HandRole::Single],
            HandMode::Dual => &[HandRole::Left, HandRole::Right],
        }
    }

    /// Landmarks for `role`. In single-hand mode any one hand will do.
    fn hand_for<'a>(&self, input: &'a FrameInput, role: HandRole) -> Option<&'a HandInput> {
        match (self.mode, input.hand(role)) {
            (_, Some(hand)) => Some(hand),
            (HandMode::Single, None) => input.hands.first(),
            (HandMode::Dual, None) => None,
        }
    }

    /// Run one frame through the whole pipeline
    pub fn step(&mut self, input: &FrameInput, dt: f32) -> Result<StepOutput, SessionError> {
        if self.fault.is_some() {
            return Err(SessionError::SessionTerminated);
        }

        let mut commands: Vec<ControlCommand> = Vec::new();
        let mut views: Vec<HandView<'_>> = Vec::with_capacity(2);

        for &role in self.roles() {
            let raw = self.hand_for(input, role).map(|h| h.landmarks.as_slice());
            let observation = raw.and_then(|points| match LandmarkSet::new(points) {
                Ok(set) => Some(HandObservation {
                    gesture: self.classifier.classify_set(&set),
                    position: set.wrist(),
                }),
                Err(e) => {
                    debug!(session_id = %self.id, role = ?role, error = %e, "Dropping malformed hand");
                    None
                }
            });
            let valid = observation.is_some();

            let update = self.tracking.update(role, observation);
            commands.extend(control::bind(self.game, self.mode, &update));

            views.push(HandView {
                role,
                gesture: update.stable,
                tracking: !update.is_lost && update.position.is_some(),
                position: update.position,
                combo: update.combo,
                landmarks: raw.filter(|_| valid),
            });
        }

        let output = match self.sim.tick(&commands, dt) {
            Ok(output) => output,
            Err(e) => {
                error!(session_id = %self.id, error = %e, tick = self.sim.state().tick, "Simulation fault");
                self.fault = Some(e.clone());
                return Err(e.into());
            }
        };

        let mut frame = output.frame;
        render::overlay_hands(&mut frame, &self.sim.state().field, &views, self.debug_overlay);

        let game_over = output.events.iter().find_map(|e| match e {
            GameEvent::GameOver { final_score } => {
                let state = self.sim.state();
                Some(GameSummary {
                    final_score: *final_score,
                    level: state.level,
                    ticks: state.tick,
                    elapsed: state.elapsed,
                })
            }
            _ => None,
        });

        Ok(StepOutput {
            frame,
            events: output.events,
            game_over,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{
        EnemyType, GameObject, ObjectKind, ProjectileData, Vec2, WeaponKind, WeaponTable,
    };
    use crate::hand::fixtures::{pose, pose_with_wrist, Pose};
    use crate::hand::{Landmark, TrackingConfig};
    use crate::util::time::tick_delta;

    fn config(game: GameKind, mode: HandMode) -> Config {
        Config {
            game,
            hand_mode: mode,
            tracking: TrackingConfig {
                debounce_frames: 1,
                lost_frames: 2,
                ..Default::default()
            },
            seed: Some(7),
            ..Default::default()
        }
    }

    fn quiet() -> SimConfig {
        SimConfig {
            spawns_enabled: false,
            ..Default::default()
        }
    }

    fn frame(hands: Vec<(HandRole, Vec<Landmark>)>) -> FrameInput {
        FrameInput {
            hands: hands
                .into_iter()
                .map(|(role, landmarks)| HandInput { role, landmarks })
                .collect(),
        }
    }

    fn fired(events: &[GameEvent], weapon: WeaponKind) -> u32 {
        events
            .iter()
            .map(|e| match e {
                GameEvent::Fired { weapon: w, projectiles } if *w == weapon => *projectiles,
                _ => 0,
            })
            .sum()
    }

    fn enemy_at(pos: Vec2) -> GameObject {
        GameObject::new(
            ObjectKind::Enemy {
                enemy: EnemyType::Fighter,
                points: 100,
            },
            pos,
            Vec2::ZERO,
            20.0,
            1.0,
        )
    }

    #[test]
    fn test_held_pinch_fires_on_cooldown_boundaries() {
        let mut weapons = WeaponTable::for_game(GameKind::Shooter);
        weapons.get_mut(WeaponKind::Standard).cooldown_ticks = 2;
        let mut session = GameSession::with_sim_config(
            &config(GameKind::Shooter, HandMode::Single),
            SimConfig {
                weapons: Some(weapons),
                ..quiet()
            },
        );

        let input = frame(vec![(HandRole::Single, pose(Pose::Pinch))]);
        let mut shots = 0;
        for _ in 0..5 {
            let out = session.step(&input, tick_delta()).unwrap();
            shots += fired(&out.events, WeaponKind::Standard);
        }
        assert_eq!(shots, 3);
    }

    #[test]
    fn test_dual_flight_point_launches_one_homing_missile() {
        let mut session = GameSession::with_sim_config(
            &config(GameKind::Flight, HandMode::Dual),
            quiet(),
        );
        session.sim.insert_object(enemy_at(Vec2::new(200.0, 100.0))).unwrap();

        let input = frame(vec![(HandRole::Right, pose_with_wrist(Pose::Point, 0.7, 0.8))]);
        let mut missiles = 0;
        for _ in 0..5 {
            let out = session.step(&input, tick_delta()).unwrap();
            missiles += fired(&out.events, WeaponKind::Missile);
        }
        assert_eq!(missiles, 1);

        let missile = session
            .simulation()
            .state()
            .objects
            .iter()
            .find(|o| {
                matches!(
                    o.kind,
                    ObjectKind::Projectile(ProjectileData {
                        weapon: WeaponKind::Missile,
                        ..
                    })
                )
            })
            .unwrap();
        assert!(missile.vel.x < 0.0, "missile should turn toward the enemy");
    }

    #[test]
    fn test_dual_flight_missile_flies_straight_without_enemies() {
        let mut session = GameSession::with_sim_config(
            &config(GameKind::Flight, HandMode::Dual),
            quiet(),
        );
        let input = frame(vec![(HandRole::Right, pose_with_wrist(Pose::Point, 0.7, 0.8))]);

        let is_missile = |o: &&GameObject| {
            matches!(
                o.kind,
                ObjectKind::Projectile(ProjectileData {
                    weapon: WeaponKind::Missile,
                    ..
                })
            )
        };

        let mut launched = 0;
        let mut drift = None;
        for _ in 0..5 {
            let out = session.step(&input, tick_delta()).unwrap();
            launched += fired(&out.events, WeaponKind::Missile);

            let state = session.simulation().state();
            let missiles: Vec<_> = state.objects.iter().filter(is_missile).collect();
            assert_eq!(missiles.len() as u32, launched);

            // No steering hand, so the plane stays level
            let bank = state.player.banking;
            assert!(bank.abs() < 1e-3);
            if let Some(missile) = missiles.first() {
                let expected = *drift.get_or_insert(bank.to_radians().sin() * 60.0);
                assert!((missile.vel.x - expected).abs() < 1e-3);
            }
        }
        assert_eq!(launched, 1);
        assert!(drift.is_some());
    }

    #[test]
    fn test_malformed_landmarks_count_as_missing_hand() {
        let mut session = GameSession::with_sim_config(
            &config(GameKind::Shooter, HandMode::Single),
            quiet(),
        );
        let good = frame(vec![(HandRole::Single, pose(Pose::OpenPalm))]);
        let mut short = pose(Pose::OpenPalm);
        short.truncate(15);
        let bad = frame(vec![(HandRole::Single, short)]);

        let out = session.step(&good, tick_delta()).unwrap();
        assert!(out.frame.hud.hands[0].tracking);

        let out = session.step(&bad, tick_delta()).unwrap();
        assert!(out.frame.hud.hands[0].tracking);

        let out = session.step(&bad, tick_delta()).unwrap();
        assert!(!out.frame.hud.hands[0].tracking);
        assert_eq!(out.frame.hud.hands[0].gesture, "none");
    }

    #[test]
    fn test_dual_mode_left_hand_steers() {
        let mut session = GameSession::with_sim_config(
            &config(GameKind::Shooter, HandMode::Dual),
            quiet(),
        );
        let input = frame(vec![
            (HandRole::Left, pose_with_wrist(Pose::OpenPalm, 0.2, 0.5)),
            (HandRole::Right, pose_with_wrist(Pose::OpenPalm, 0.9, 0.5)),
        ]);
        session.step(&input, tick_delta()).unwrap();

        let player = &session.simulation().state().player;
        assert!((player.pos.x - 160.0).abs() < 1.0);
        assert_eq!(session.simulation().state().mode, HandMode::Dual);
    }

    #[test]
    fn test_single_mode_accepts_any_role() {
        let mut session = GameSession::with_sim_config(
            &config(GameKind::Shooter, HandMode::Single),
            quiet(),
        );
        let input = frame(vec![(HandRole::Right, pose_with_wrist(Pose::Fist, 0.25, 0.5))]);
        let out = session.step(&input, tick_delta()).unwrap();
        assert_eq!(out.frame.hud.hands.len(), 1);
        assert!((session.simulation().state().player.pos.x - 200.0).abs() < 1.0);
    }

    #[test]
    fn test_game_over_reported_once() {
        let mut session = GameSession::with_sim_config(
            &config(GameKind::Shooter, HandMode::Single),
            SimConfig {
                starting_lives: 1,
                ..quiet()
            },
        );
        let at = session.simulation().state().player.pos;
        session.sim.insert_object(enemy_at(at)).unwrap();

        let empty = FrameInput::default();
        let out = session.step(&empty, tick_delta()).unwrap();
        let summary = out.game_over.unwrap();
        assert_eq!(summary.final_score, 0);
        assert_eq!(session.phase(), SessionPhase::GameOver);

        let out = session.step(&empty, tick_delta()).unwrap();
        assert!(out.game_over.is_none());
        assert_eq!(session.simulation().state().lives, 0);
    }

    #[test]
    fn test_fault_stops_session_until_restart() {
        let mut session = GameSession::with_sim_config(
            &config(GameKind::Shooter, HandMode::Single),
            SimConfig {
                max_objects: 0,
                ..quiet()
            },
        );
        let input = frame(vec![(HandRole::Single, pose(Pose::Pinch))]);

        let err = session.step(&input, tick_delta()).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Simulation(SimulationError::ObjectOverflow { .. })
        ));
        assert!(session.is_faulted());
        assert_eq!(
            session.step(&input, tick_delta()).unwrap_err(),
            SessionError::SessionTerminated
        );

        session.restart();
        assert!(!session.is_faulted());
        assert!(session.step(&FrameInput::default(), tick_delta()).is_ok());
    }

    #[test]
    fn test_pause_resume_restart() {
        let mut session = GameSession::with_sim_config(
            &config(GameKind::Shooter, HandMode::Single),
            quiet(),
        );
        let empty = FrameInput::default();
        session.step(&empty, tick_delta()).unwrap();

        session.pause();
        assert_eq!(session.phase(), SessionPhase::Paused);
        let out = session.step(&empty, tick_delta()).unwrap();
        assert_eq!(out.frame.tick, 1);

        session.resume();
        let out = session.step(&empty, tick_delta()).unwrap();
        assert_eq!(out.frame.tick, 2);

        let id = session.id();
        session.restart();
        assert_eq!(session.id(), id);
        assert_eq!(session.simulation().state().tick, 0);
        assert_eq!(session.phase(), SessionPhase::Playing);
    }
}
