//! Gesture classification from a single frame's landmark set.
//!
//! Rules are evaluated in a fixed priority order and the first match wins,
//! so exactly one tag is produced per hand per frame:
//!
//! 1. thumb/index distance → `TightPinch`, then `Pinch`
//! 2. only thumb extended, tip above its knuckle → `ThumbsUp`
//! 3. index + middle extended, rest folded → `Peace`
//! 4. everything folded → `Fist`
//! 5. everything extended, palm toward camera → `OpenPalm`
//! 6. only index extended → `PointUp/Down/Left/Right`
//! 7. otherwise → `None`
//!
//! All distances are divided by the palm width so results do not depend
//! on how far the hand is from the camera.

use serde::{Deserialize, Serialize};

use super::landmarks::{
    Finger, FingerExtension, Landmark, LandmarkSet, PointDirection, INDEX_MCP, INDEX_PIP,
    INDEX_TIP, MIDDLE_PIP, MIDDLE_TIP, PINKY_MCP, PINKY_PIP, PINKY_TIP, RING_PIP, RING_TIP,
    THUMB_IP, THUMB_MCP, THUMB_TIP, WRIST,
};
use super::HandError;

/// Discrete gesture tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    #[default]
    None,
    Pinch,
    TightPinch,
    Fist,
    ThumbsUp,
    Peace,
    OpenPalm,
    PointUp,
    PointDown,
    PointLeft,
    PointRight,
}

impl GestureKind {
    /// Label for HUD and overlay text
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Pinch => "pinch",
            Self::TightPinch => "tight-pinch",
            Self::Fist => "fist",
            Self::ThumbsUp => "thumbs-up",
            Self::Peace => "peace",
            Self::OpenPalm => "open-palm",
            Self::PointUp => "point-up",
            Self::PointDown => "point-down",
            Self::PointLeft => "point-left",
            Self::PointRight => "point-right",
        }
    }

    pub fn is_point(&self) -> bool {
        matches!(
            self,
            Self::PointUp | Self::PointDown | Self::PointLeft | Self::PointRight
        )
    }

    fn from_direction(direction: PointDirection) -> Self {
        match direction {
            PointDirection::Up => Self::PointUp,
            PointDirection::Down => Self::PointDown,
            PointDirection::Left => Self::PointLeft,
            PointDirection::Right => Self::PointRight,
        }
    }
}

/// One frame's classification: the tag plus continuous features.
/// The continuous fields are filled in even when `kind` is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Gesture {
    pub kind: GestureKind,
    /// Thumb tip to index tip, in palm widths
    pub pinch_distance: f32,
    pub extension: FingerExtension,
    /// Unit vector wrist → index tip
    pub pointing: (f32, f32),
    /// Normalized palm triangle area (0 when edge-on)
    pub palm_openness: f32,
}

/// Gesture thresholds, all in palm widths except `min_visibility`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureThresholds {
    pub pinch: f32,
    pub tight_pinch: f32,
    /// How far a tip must reach past its reference joint to count as extended
    pub extension: f32,
    /// Minimum thumb tip to index knuckle distance for an extended thumb
    pub thumb_clearance: f32,
    /// Minimum `palm_openness` for an open palm facing the camera
    pub palm_facing_min: f32,
    /// Landmarks below this visibility count as occluded
    pub min_visibility: f32,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self {
            pinch: 0.35,
            tight_pinch: 0.18,
            extension: 0.10,
            thumb_clearance: 0.5,
            palm_facing_min: 0.3,
            min_visibility: 0.5,
        }
    }
}

/// Landmarks every rule depends on
const REQUIRED_POINTS: [usize; 14] = [
    WRIST, THUMB_MCP, THUMB_IP, THUMB_TIP, INDEX_MCP, INDEX_PIP, INDEX_TIP, MIDDLE_PIP,
    MIDDLE_TIP, RING_PIP, RING_TIP, PINKY_MCP, PINKY_PIP, PINKY_TIP,
];

/// Stateless classifier over a fixed threshold set
#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    pub thresholds: GestureThresholds,
}

impl GestureClassifier {
    pub fn new(thresholds: GestureThresholds) -> Self {
        Self { thresholds }
    }

    /// Classify raw detector output. Fails only on malformed input.
    pub fn classify(&self, points: &[Landmark]) -> Result<Gesture, HandError> {
        let set = LandmarkSet::new(points)?;
        Ok(self.classify_set(&set))
    }

    /// Classify an already validated landmark set. Never fails.
    pub fn classify_set(&self, set: &LandmarkSet) -> Gesture {
        let t = &self.thresholds;
        let extension = set.finger_extension(t.extension, t.thumb_clearance);
        let mut gesture = Gesture {
            kind: GestureKind::None,
            pinch_distance: set.normalized_distance(THUMB_TIP, INDEX_TIP),
            extension,
            pointing: set.pointing_vector(),
            palm_openness: set.palm_openness(),
        };

        // Partially occluded hands keep their features but no tag
        if !set.all_visible(&REQUIRED_POINTS, t.min_visibility) {
            return gesture;
        }

        gesture.kind = self.match_rules(set, &gesture);
        gesture
    }

    fn match_rules(&self, set: &LandmarkSet, g: &Gesture) -> GestureKind {
        use Finger::*;
        let t = &self.thresholds;
        let mask = g.extension;

        if g.pinch_distance < t.tight_pinch {
            return GestureKind::TightPinch;
        }
        if g.pinch_distance < t.pinch {
            return GestureKind::Pinch;
        }

        if mask == FingerExtension::only(&[Thumb]) {
            let tip = set.point(THUMB_TIP);
            let knuckle = set.point(THUMB_MCP);
            if tip.y < knuckle.y {
                return GestureKind::ThumbsUp;
            }
        }

        if mask == FingerExtension::only(&[Index, Middle]) {
            return GestureKind::Peace;
        }

        if mask == FingerExtension::NONE {
            return GestureKind::Fist;
        }

        if mask == FingerExtension::ALL && g.palm_openness >= t.palm_facing_min {
            return GestureKind::OpenPalm;
        }

        if mask == FingerExtension::only(&[Index]) {
            return GestureKind::from_direction(set.pointing_direction());
        }

        GestureKind::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::fixtures::{pose, pose_at, Pose};
    use std::f32::consts::FRAC_PI_2;

    fn classify(points: &[Landmark]) -> GestureKind {
        GestureClassifier::default().classify(points).unwrap().kind
    }

    #[test]
    fn test_static_poses() {
        assert_eq!(classify(&pose(Pose::OpenPalm)), GestureKind::OpenPalm);
        assert_eq!(classify(&pose(Pose::Fist)), GestureKind::Fist);
        assert_eq!(classify(&pose(Pose::Peace)), GestureKind::Peace);
        assert_eq!(classify(&pose(Pose::ThumbsUp)), GestureKind::ThumbsUp);
        assert_eq!(classify(&pose(Pose::Point)), GestureKind::PointUp);
    }

    #[test]
    fn test_pinch_levels() {
        assert_eq!(classify(&pose(Pose::Pinch)), GestureKind::Pinch);
        assert_eq!(classify(&pose(Pose::TightPinch)), GestureKind::TightPinch);
    }

    #[test]
    fn test_pinch_wins_over_other_rules() {
        // Open palm with the thumb tip dragged onto the index tip
        let mut points = pose(Pose::OpenPalm);
        points[THUMB_TIP] = points[INDEX_TIP];
        assert_eq!(classify(&points), GestureKind::TightPinch);
    }

    #[test]
    fn test_point_directions() {
        let at = |angle: f32| pose_at(Pose::Point, (0.5, 0.5), 0.05, angle);
        assert_eq!(classify(&at(0.0)), GestureKind::PointUp);
        assert_eq!(classify(&at(FRAC_PI_2)), GestureKind::PointRight);
        assert_eq!(classify(&at(-FRAC_PI_2)), GestureKind::PointLeft);
        assert_eq!(classify(&at(std::f32::consts::PI)), GestureKind::PointDown);
    }

    #[test]
    fn test_upside_down_thumb_is_not_thumbs_up() {
        let points = pose_at(Pose::ThumbsUp, (0.5, 0.3), 0.05, std::f32::consts::PI);
        assert_eq!(classify(&points), GestureKind::None);
    }

    #[test]
    fn test_scale_invariance() {
        let poses = [
            Pose::OpenPalm,
            Pose::Fist,
            Pose::Peace,
            Pose::Point,
            Pose::ThumbsUp,
            Pose::Pinch,
            Pose::TightPinch,
        ];
        for p in poses {
            let near = classify(&pose_at(p, (0.5, 0.8), 0.06, 0.0));
            let far = classify(&pose_at(p, (0.5, 0.8), 0.015, 0.0));
            assert_eq!(near, far, "pose {:?} changed with scale", p);
        }
    }

    #[test]
    fn test_occluded_hand_fails_soft() {
        let mut points = pose(Pose::Fist);
        points[INDEX_TIP].visibility = 0.1;
        let gesture = GestureClassifier::default().classify(&points).unwrap();
        assert_eq!(gesture.kind, GestureKind::None);
        assert!(gesture.pinch_distance > 0.0);
        assert_eq!(gesture.extension, FingerExtension::NONE);
    }

    #[test]
    fn test_features_populated_for_none() {
        // Ring + pinky only: no rule matches
        let mut points = pose(Pose::Fist);
        let open = pose(Pose::OpenPalm);
        for i in 13..=20 {
            points[i] = open[i];
        }
        let gesture = GestureClassifier::default().classify(&points).unwrap();
        assert_eq!(gesture.kind, GestureKind::None);
        assert_eq!(gesture.extension.count(), 2);
        assert!(gesture.palm_openness > 0.3);
        let (dx, dy) = gesture.pointing;
        assert!(((dx * dx + dy * dy).sqrt() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_malformed_input_is_an_error() {
        let points = vec![Landmark::new(0.1, 0.1); 15];
        let err = GestureClassifier::default().classify(&points).unwrap_err();
        assert!(matches!(err, HandError::InvalidLandmarkSet { got: 15 }));
    }

    #[test]
    fn test_edge_on_open_hand_is_not_open_palm() {
        let mut points = pose(Pose::OpenPalm);
        let w = points[WRIST];
        let i = points[INDEX_MCP];
        points[PINKY_MCP] = Landmark::new(w.x + 2.0 * (i.x - w.x), w.y + 2.0 * (i.y - w.y));
        assert_ne!(classify(&points), GestureKind::OpenPalm);
    }

    #[test]
    fn test_every_tag_is_reachable_and_labelled() {
        let kinds = [
            GestureKind::None,
            GestureKind::Pinch,
            GestureKind::TightPinch,
            GestureKind::Fist,
            GestureKind::ThumbsUp,
            GestureKind::Peace,
            GestureKind::OpenPalm,
            GestureKind::PointUp,
            GestureKind::PointDown,
            GestureKind::PointLeft,
            GestureKind::PointRight,
        ];
        let mut labels: Vec<&str> = kinds.iter().map(|k| k.as_str()).collect();
        labels.dedup();
        assert_eq!(labels.len(), kinds.len());
    }
}
