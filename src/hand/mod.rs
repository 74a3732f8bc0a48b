//! Hand input: landmark geometry, gesture classification and tracking

pub mod classifier;
pub mod landmarks;
pub mod tracking;

#[cfg(test)]
pub(crate) mod fixtures;

pub use classifier::{Gesture, GestureClassifier, GestureKind, GestureThresholds};
pub use landmarks::{Finger, FingerExtension, Landmark, LandmarkSet, PointDirection};
pub use tracking::{
    Combo, HandObservation, HandRole, TrackUpdate, TrackingConfig, TrackingSession,
    TrackingStatus,
};

/// Malformed detector output. Recovered by treating the hand as absent.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HandError {
    #[error("Invalid landmark set: expected 21 points, got {got}")]
    InvalidLandmarkSet { got: usize },

    #[error("Landmark {index} has a non-finite coordinate")]
    NonFiniteLandmark { index: usize },
}
