//! Per-hand tracking: position smoothing, gesture debounce, lost-tracking
//! timeout and two-step gesture combos.
//!
//! Each hand role owns an independent [`HandTrack`]. A track is a two-state
//! machine, `Tracking` and `Lost`; inside `Tracking` the stable gesture only
//! changes after a candidate has been seen for `debounce_frames` frames in a
//! row. The first stable frame of a new gesture is reported once through
//! [`TrackUpdate::entered`].

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::classifier::{Gesture, GestureKind};

/// Which hand slot an observation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandRole {
    /// The only hand in single-hand mode
    Single,
    Left,
    Right,
}

impl HandRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Tracking state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingStatus {
    Tracking,
    Lost,
}

/// Two-gesture sequences recognized within the combo window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Combo {
    /// Peace then fist
    SuperBlast,
    /// Thumbs up then point up
    ShieldShot,
}

impl Combo {
    fn from_pair(first: GestureKind, second: GestureKind) -> Option<Self> {
        match (first, second) {
            (GestureKind::Peace, GestureKind::Fist) => Some(Self::SuperBlast),
            (GestureKind::ThumbsUp, GestureKind::PointUp) => Some(Self::ShieldShot),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperBlast => "super-blast",
            Self::ShieldShot => "shield-shot",
        }
    }
}

/// Smoothing, debounce and timeout settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackingConfig {
    /// Weight of the new raw sample: `new = old * (1 - s) + raw * s`
    pub smoothing: f32,
    /// Consecutive frames a gesture must persist before it is stable
    pub debounce_frames: u32,
    /// Consecutive missing frames before the track is lost
    pub lost_frames: u32,
    /// Frames within which two entered gestures form a combo
    pub combo_window_frames: u64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            smoothing: 0.3,
            debounce_frames: 3,
            lost_frames: 10,
            combo_window_frames: 60,
        }
    }
}

/// Raw per-frame input for one hand
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandObservation {
    pub gesture: Gesture,
    /// Normalized image position used for control (the wrist)
    pub position: (f32, f32),
}

/// Result of one tracking update
#[derive(Debug, Clone, PartialEq)]
pub struct TrackUpdate {
    pub role: HandRole,
    /// Debounced gesture currently in effect
    pub stable: GestureKind,
    /// True only on the first frame `stable` takes a new value
    pub entered: bool,
    /// Frames the stable gesture has been held
    pub hold_frames: u32,
    /// Smoothed position, `None` if the hand was never seen
    pub position: Option<(f32, f32)>,
    pub is_lost: bool,
    /// Whether landmarks arrived for this role this frame
    pub detected: bool,
    /// Continuous features from the latest detected frame
    pub features: Option<Gesture>,
    pub combo: Option<Combo>,
}

/// Tracking state for one hand role
#[derive(Debug, Clone)]
pub struct HandTrack {
    status: TrackingStatus,
    position: Option<(f32, f32)>,
    stable: GestureKind,
    candidate: GestureKind,
    candidate_frames: u32,
    hold_frames: u32,
    missed_frames: u32,
    frame: u64,
    features: Option<Gesture>,
    /// Entered gestures with the frame they entered on
    history: VecDeque<(GestureKind, u64)>,
}

impl HandTrack {
    fn new() -> Self {
        Self {
            status: TrackingStatus::Lost,
            position: None,
            stable: GestureKind::None,
            candidate: GestureKind::None,
            candidate_frames: 0,
            hold_frames: 0,
            missed_frames: 0,
            frame: 0,
            features: None,
            history: VecDeque::new(),
        }
    }

    pub fn status(&self) -> TrackingStatus {
        self.status
    }

    pub fn stable(&self) -> GestureKind {
        self.stable
    }

    pub fn position(&self) -> Option<(f32, f32)> {
        self.position
    }

    fn mark_lost(&mut self) {
        self.status = TrackingStatus::Lost;
        self.stable = GestureKind::None;
        self.candidate = GestureKind::None;
        self.candidate_frames = 0;
        self.hold_frames = 0;
        self.features = None;
        self.history.clear();
    }

    fn observe(&mut self, config: &TrackingConfig, obs: HandObservation) -> (bool, Option<Combo>) {
        self.missed_frames = 0;

        // Snap on (re)acquisition, interpolate while tracking
        self.position = match (self.status, self.position) {
            (TrackingStatus::Tracking, Some((ox, oy))) => {
                let s = config.smoothing;
                let (rx, ry) = obs.position;
                Some((ox * (1.0 - s) + rx * s, oy * (1.0 - s) + ry * s))
            }
            _ => Some(obs.position),
        };
        self.status = TrackingStatus::Tracking;
        self.features = Some(obs.gesture);

        let raw = obs.gesture.kind;
        if raw == self.candidate {
            self.candidate_frames = self.candidate_frames.saturating_add(1);
        } else {
            self.candidate = raw;
            self.candidate_frames = 1;
        }

        if self.candidate == self.stable {
            self.hold_frames = self.hold_frames.saturating_add(1);
            return (false, None);
        }

        if self.candidate_frames < config.debounce_frames.max(1) {
            return (false, None);
        }

        self.stable = self.candidate;
        self.hold_frames = 1;
        let combo = self.record_entered(config, self.stable);
        (true, combo)
    }

    fn record_entered(&mut self, config: &TrackingConfig, kind: GestureKind) -> Option<Combo> {
        if kind == GestureKind::None {
            return None;
        }

        let now = self.frame;
        while let Some(&(_, at)) = self.history.front() {
            if now.saturating_sub(at) > config.combo_window_frames {
                self.history.pop_front();
            } else {
                break;
            }
        }
        self.history.push_back((kind, now));

        let len = self.history.len();
        if len < 2 {
            return None;
        }
        let combo = Combo::from_pair(self.history[len - 2].0, self.history[len - 1].0);
        if combo.is_some() {
            self.history.clear();
        }
        combo
    }
}

/// Tracking state for every hand role
#[derive(Debug, Clone)]
pub struct TrackingSession {
    pub config: TrackingConfig,
    single: HandTrack,
    left: HandTrack,
    right: HandTrack,
}

impl TrackingSession {
    pub fn new(config: TrackingConfig) -> Self {
        Self {
            config,
            single: HandTrack::new(),
            left: HandTrack::new(),
            right: HandTrack::new(),
        }
    }

    pub fn track(&self, role: HandRole) -> &HandTrack {
        match role {
            HandRole::Single => &self.single,
            HandRole::Left => &self.left,
            HandRole::Right => &self.right,
        }
    }

    fn track_mut(&mut self, role: HandRole) -> &mut HandTrack {
        match role {
            HandRole::Single => &mut self.single,
            HandRole::Left => &mut self.left,
            HandRole::Right => &mut self.right,
        }
    }

    /// Advance one role by one frame. `None` means no usable landmarks
    /// arrived for that role this frame.
    pub fn update(&mut self, role: HandRole, observation: Option<HandObservation>) -> TrackUpdate {
        let config = self.config;
        let track = self.track_mut(role);
        track.frame += 1;

        let detected = observation.is_some();
        let (entered, combo) = match observation {
            Some(obs) => track.observe(&config, obs),
            None => {
                track.missed_frames = track.missed_frames.saturating_add(1);
                if track.status == TrackingStatus::Tracking
                    && track.missed_frames >= config.lost_frames.max(1)
                {
                    debug!(role = ?role, frames = track.missed_frames, "Hand tracking lost");
                    track.mark_lost();
                }
                (false, None)
            }
        };

        if entered {
            debug!(role = ?role, gesture = track.stable.as_str(), "Gesture entered");
        }
        if let Some(combo) = combo {
            debug!(role = ?role, combo = combo.as_str(), "Gesture combo");
        }

        TrackUpdate {
            role,
            stable: track.stable,
            entered,
            hold_frames: track.hold_frames,
            position: track.position,
            is_lost: track.status == TrackingStatus::Lost,
            detected,
            features: track.features,
            combo,
        }
    }

    /// Forget every hand
    pub fn reset(&mut self) {
        self.single = HandTrack::new();
        self.left = HandTrack::new();
        self.right = HandTrack::new();
    }
}

impl Default for TrackingSession {
    fn default() -> Self {
        Self::new(TrackingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(kind: GestureKind, x: f32, y: f32) -> Option<HandObservation> {
        Some(HandObservation {
            gesture: Gesture {
                kind,
                ..Gesture::default()
            },
            position: (x, y),
        })
    }

    fn session(debounce: u32, lost: u32) -> TrackingSession {
        TrackingSession::new(TrackingConfig {
            debounce_frames: debounce,
            lost_frames: lost,
            ..TrackingConfig::default()
        })
    }

    #[test]
    fn test_new_session_is_lost() {
        let s = TrackingSession::default();
        assert_eq!(s.track(HandRole::Single).status(), TrackingStatus::Lost);
        assert!(s.track(HandRole::Left).position().is_none());
    }

    #[test]
    fn test_debounce_interrupted_sequence() {
        let mut s = session(3, 10);
        let role = HandRole::Single;

        // Establish Fist as the stable gesture
        for _ in 0..3 {
            s.update(role, obs(GestureKind::Fist, 0.5, 0.5));
        }
        assert_eq!(s.track(role).stable(), GestureKind::Fist);

        let seq = [
            GestureKind::Pinch,
            GestureKind::Pinch,
            GestureKind::None,
            GestureKind::Pinch,
            GestureKind::Pinch,
        ];
        for kind in seq {
            let u = s.update(role, obs(kind, 0.5, 0.5));
            assert_eq!(u.stable, GestureKind::Fist);
            assert!(!u.entered);
        }

        let u = s.update(role, obs(GestureKind::Pinch, 0.5, 0.5));
        assert_eq!(u.stable, GestureKind::Pinch);
        assert!(u.entered);
    }

    #[test]
    fn test_entered_is_edge_triggered() {
        let mut s = session(2, 10);
        let role = HandRole::Right;
        let updates: Vec<TrackUpdate> = (0..5)
            .map(|_| s.update(role, obs(GestureKind::PointUp, 0.5, 0.5)))
            .collect();

        let entered: Vec<bool> = updates.iter().map(|u| u.entered).collect();
        assert_eq!(entered, vec![false, true, false, false, false]);
        assert_eq!(updates[4].hold_frames, 4);
    }

    #[test]
    fn test_single_frame_noise_keeps_stable() {
        let mut s = session(2, 10);
        let role = HandRole::Single;
        s.update(role, obs(GestureKind::Pinch, 0.5, 0.5));
        s.update(role, obs(GestureKind::Pinch, 0.5, 0.5));
        let u = s.update(role, obs(GestureKind::None, 0.5, 0.5));
        assert_eq!(u.stable, GestureKind::Pinch);
        let u = s.update(role, obs(GestureKind::Pinch, 0.5, 0.5));
        assert_eq!(u.stable, GestureKind::Pinch);
        assert!(!u.entered);
    }

    #[test]
    fn test_position_smoothing() {
        let mut s = session(1, 10);
        let role = HandRole::Single;
        let first = s.update(role, obs(GestureKind::None, 0.0, 0.0));
        assert_eq!(first.position, Some((0.0, 0.0)));

        let u = s.update(role, obs(GestureKind::None, 1.0, 0.5));
        let (x, y) = u.position.unwrap();
        assert!((x - 0.3).abs() < 1e-6);
        assert!((y - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_lost_after_k_frames_and_snap_back() {
        let mut s = session(1, 4);
        let role = HandRole::Left;
        s.update(role, obs(GestureKind::Fist, 0.2, 0.2));

        for i in 1..4 {
            let u = s.update(role, None);
            assert!(!u.is_lost, "lost too early at miss {}", i);
            assert_eq!(u.stable, GestureKind::Fist);
            assert_eq!(u.position, Some((0.2, 0.2)));
        }

        let u = s.update(role, None);
        assert!(u.is_lost);
        assert_eq!(u.stable, GestureKind::None);
        assert_eq!(u.position, Some((0.2, 0.2)));

        let u = s.update(role, None);
        assert_eq!(u.position, Some((0.2, 0.2)));

        // Re-detection snaps straight to the raw position
        let u = s.update(role, obs(GestureKind::Fist, 0.9, 0.7));
        assert!(!u.is_lost);
        assert_eq!(u.position, Some((0.9, 0.7)));
    }

    #[test]
    fn test_roles_are_independent() {
        let mut s = session(1, 2);
        s.update(HandRole::Left, obs(GestureKind::OpenPalm, 0.1, 0.1));
        s.update(HandRole::Right, obs(GestureKind::Pinch, 0.9, 0.9));
        s.update(HandRole::Right, None);
        s.update(HandRole::Right, None);

        assert_eq!(s.track(HandRole::Left).stable(), GestureKind::OpenPalm);
        assert_eq!(s.track(HandRole::Left).status(), TrackingStatus::Tracking);
        assert_eq!(s.track(HandRole::Right).status(), TrackingStatus::Lost);
    }

    #[test]
    fn test_combo_detection() {
        let mut s = session(1, 10);
        let role = HandRole::Single;
        s.update(role, obs(GestureKind::Peace, 0.5, 0.5));
        s.update(role, obs(GestureKind::Peace, 0.5, 0.5));
        let u = s.update(role, obs(GestureKind::Fist, 0.5, 0.5));
        assert_eq!(u.combo, Some(Combo::SuperBlast));

        // History is cleared after a combo
        let u = s.update(role, obs(GestureKind::ThumbsUp, 0.5, 0.5));
        assert_eq!(u.combo, None);
        let u = s.update(role, obs(GestureKind::PointUp, 0.5, 0.5));
        assert_eq!(u.combo, Some(Combo::ShieldShot));
    }

    #[test]
    fn test_combo_window_expires() {
        let mut s = TrackingSession::new(TrackingConfig {
            debounce_frames: 1,
            combo_window_frames: 3,
            ..TrackingConfig::default()
        });
        let role = HandRole::Single;
        s.update(role, obs(GestureKind::Peace, 0.5, 0.5));
        for _ in 0..4 {
            s.update(role, obs(GestureKind::None, 0.5, 0.5));
        }
        let u = s.update(role, obs(GestureKind::Fist, 0.5, 0.5));
        assert_eq!(u.combo, None);
    }

    #[test]
    fn test_reset() {
        let mut s = session(1, 10);
        s.update(HandRole::Single, obs(GestureKind::Fist, 0.5, 0.5));
        s.reset();
        assert_eq!(s.track(HandRole::Single).stable(), GestureKind::None);
        assert_eq!(s.track(HandRole::Single).status(), TrackingStatus::Lost);
    }
}
