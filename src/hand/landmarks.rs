//! Landmark geometry - distances, finger extension and palm orientation
//! over the 21-point hand model.

use serde::{Deserialize, Serialize};

use super::HandError;

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Bone connections, used by the debug overlay
pub const HAND_SKELETON: [(usize, usize); 21] = [
    (WRIST, THUMB_CMC),
    (THUMB_CMC, THUMB_MCP),
    (THUMB_MCP, THUMB_IP),
    (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_MCP),
    (INDEX_MCP, INDEX_PIP),
    (INDEX_PIP, INDEX_DIP),
    (INDEX_DIP, INDEX_TIP),
    (WRIST, MIDDLE_MCP),
    (MIDDLE_MCP, MIDDLE_PIP),
    (MIDDLE_PIP, MIDDLE_DIP),
    (MIDDLE_DIP, MIDDLE_TIP),
    (WRIST, RING_MCP),
    (RING_MCP, RING_PIP),
    (RING_PIP, RING_DIP),
    (RING_DIP, RING_TIP),
    (WRIST, PINKY_MCP),
    (PINKY_MCP, PINKY_PIP),
    (PINKY_PIP, PINKY_DIP),
    (PINKY_DIP, PINKY_TIP),
    (INDEX_MCP, PINKY_MCP),
];

/// Palm widths smaller than this are treated as a degenerate hand
const MIN_PALM_WIDTH: f32 = 1e-6;

fn default_visibility() -> f32 {
    1.0
}

/// One normalized hand landmark as delivered by the detector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
    /// Detector confidence that this point is visible (0..1)
    #[serde(default = "default_visibility")]
    pub visibility: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            z: 0.0,
            visibility: 1.0,
        }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Default for Landmark {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// The five fingers, thumb first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    pub fn tip(self) -> usize {
        match self {
            Self::Thumb => THUMB_TIP,
            Self::Index => INDEX_TIP,
            Self::Middle => MIDDLE_TIP,
            Self::Ring => RING_TIP,
            Self::Pinky => PINKY_TIP,
        }
    }

    /// The joint the tip is compared against when testing extension.
    /// For the thumb this is the IP joint.
    pub fn reference_joint(self) -> usize {
        match self {
            Self::Thumb => THUMB_IP,
            Self::Index => INDEX_PIP,
            Self::Middle => MIDDLE_PIP,
            Self::Ring => RING_PIP,
            Self::Pinky => PINKY_PIP,
        }
    }

    fn bit(self) -> u8 {
        match self {
            Self::Thumb => 1 << 0,
            Self::Index => 1 << 1,
            Self::Middle => 1 << 2,
            Self::Ring => 1 << 3,
            Self::Pinky => 1 << 4,
        }
    }
}

/// Per-finger extension bitmask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FingerExtension(u8);

impl FingerExtension {
    pub const NONE: FingerExtension = FingerExtension(0);
    pub const ALL: FingerExtension = FingerExtension(0b1_1111);

    /// Mask with exactly the given fingers extended
    pub fn only(fingers: &[Finger]) -> Self {
        Self(fingers.iter().fold(0, |acc, f| acc | f.bit()))
    }

    pub fn set(&mut self, finger: Finger, extended: bool) {
        if extended {
            self.0 |= finger.bit();
        } else {
            self.0 &= !finger.bit();
        }
    }

    pub fn is_extended(&self, finger: Finger) -> bool {
        self.0 & finger.bit() != 0
    }

    pub fn count(&self) -> u32 {
        self.0.count_ones()
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn as_array(&self) -> [bool; 5] {
        Finger::ALL.map(|f| self.is_extended(f))
    }
}

/// A validated 21-point landmark set for one hand in one frame
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSet {
    points: [Landmark; LANDMARK_COUNT],
}

impl LandmarkSet {
    /// Validate raw detector output. Extra points beyond the 21st are ignored.
    pub fn new(points: &[Landmark]) -> Result<Self, HandError> {
        if points.len() < LANDMARK_COUNT {
            return Err(HandError::InvalidLandmarkSet { got: points.len() });
        }
        if let Some(index) = points[..LANDMARK_COUNT].iter().position(|p| !p.is_finite()) {
            return Err(HandError::NonFiniteLandmark { index });
        }

        let mut fixed = [Landmark::default(); LANDMARK_COUNT];
        fixed.copy_from_slice(&points[..LANDMARK_COUNT]);
        Ok(Self { points: fixed })
    }

    pub fn point(&self, index: usize) -> Landmark {
        self.points[index]
    }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.points
    }

    pub fn wrist(&self) -> (f32, f32) {
        let w = self.points[WRIST];
        (w.x, w.y)
    }

    /// Euclidean distance between two landmarks in the image plane
    pub fn distance(&self, a: usize, b: usize) -> f32 {
        let pa = self.points[a];
        let pb = self.points[b];
        (pb.x - pa.x).hypot(pb.y - pa.y)
    }

    /// Index MCP to pinky MCP distance, the hand-size reference
    pub fn palm_width(&self) -> f32 {
        self.distance(INDEX_MCP, PINKY_MCP).max(MIN_PALM_WIDTH)
    }

    /// Distance expressed in palm widths
    pub fn normalized_distance(&self, a: usize, b: usize) -> f32 {
        self.distance(a, b) / self.palm_width()
    }

    /// How far (in palm widths) the fingertip reaches beyond its reference
    /// joint, measured from the wrist. Positive means extended outward.
    pub fn extension_margin(&self, finger: Finger) -> f32 {
        let tip = self.distance(finger.tip(), WRIST);
        let joint = self.distance(finger.reference_joint(), WRIST);
        (tip - joint) / self.palm_width()
    }

    /// Extension bitmask for all five fingers
    pub fn finger_extension(&self, extension_threshold: f32, thumb_clearance: f32) -> FingerExtension {
        let mut mask = FingerExtension::NONE;
        for finger in Finger::ALL {
            let mut extended = self.extension_margin(finger) > extension_threshold;
            if finger == Finger::Thumb {
                // A thumb folded across the palm can still sit far from the
                // wrist; require it to clear the index knuckle as well.
                extended &= self.normalized_distance(THUMB_TIP, INDEX_MCP) > thumb_clearance;
            }
            mask.set(finger, extended);
        }
        mask
    }

    /// Normalized area of the wrist / index MCP / pinky MCP triangle.
    /// Close to zero when the palm is edge-on to the camera.
    pub fn palm_openness(&self) -> f32 {
        let w = self.points[WRIST];
        let a = self.points[INDEX_MCP];
        let b = self.points[PINKY_MCP];
        let cross = (a.x - w.x) * (b.y - w.y) - (a.y - w.y) * (b.x - w.x);
        let pw = self.palm_width();
        cross.abs() / (pw * pw)
    }

    /// Unit vector from the wrist to the index tip, `(0, 0)` if degenerate
    pub fn pointing_vector(&self) -> (f32, f32) {
        let w = self.points[WRIST];
        let tip = self.points[INDEX_TIP];
        let dx = tip.x - w.x;
        let dy = tip.y - w.y;
        let len = dx.hypot(dy);
        if len < MIN_PALM_WIDTH {
            (0.0, 0.0)
        } else {
            (dx / len, dy / len)
        }
    }

    /// Dominant axis of the wrist to index tip vector. Ties go horizontal.
    pub fn pointing_direction(&self) -> PointDirection {
        let w = self.points[WRIST];
        let tip = self.points[INDEX_TIP];
        PointDirection::from_vector(tip.x - w.x, tip.y - w.y)
    }

    /// True if every listed landmark meets the visibility floor
    pub fn all_visible(&self, indices: &[usize], min_visibility: f32) -> bool {
        indices
            .iter()
            .all(|&i| self.points[i].visibility >= min_visibility)
    }
}

/// Screen-space pointing direction (image y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointDirection {
    Up,
    Down,
    Left,
    Right,
}

impl PointDirection {
    pub fn from_vector(dx: f32, dy: f32) -> Self {
        if dx.abs() >= dy.abs() {
            if dx < 0.0 {
                Self::Left
            } else {
                Self::Right
            }
        } else if dy < 0.0 {
            Self::Up
        } else {
            Self::Down
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::fixtures::{pose, Pose};

    #[test]
    fn test_rejects_short_sets() {
        let points = vec![Landmark::new(0.5, 0.5); 15];
        let err = LandmarkSet::new(&points).unwrap_err();
        assert!(matches!(err, HandError::InvalidLandmarkSet { got: 15 }));
    }

    #[test]
    fn test_rejects_non_finite_points() {
        let mut points = pose(Pose::OpenPalm);
        points[7].y = f32::NAN;
        let err = LandmarkSet::new(&points).unwrap_err();
        assert!(matches!(err, HandError::NonFiniteLandmark { index: 7 }));
    }

    #[test]
    fn test_ignores_extra_points() {
        let mut points = pose(Pose::Fist);
        points.push(Landmark::new(9.0, 9.0));
        let set = LandmarkSet::new(&points).unwrap();
        assert_eq!(set.points().len(), LANDMARK_COUNT);
    }

    #[test]
    fn test_distance() {
        let mut points = vec![Landmark::new(0.0, 0.0); LANDMARK_COUNT];
        points[THUMB_TIP] = Landmark::new(0.3, 0.4);
        let set = LandmarkSet::new(&points).unwrap();
        assert!((set.distance(WRIST, THUMB_TIP) - 0.5).abs() < 1e-6);
        assert!((set.distance(THUMB_TIP, WRIST) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_extension_open_and_closed() {
        let open = LandmarkSet::new(&pose(Pose::OpenPalm)).unwrap();
        assert_eq!(open.finger_extension(0.1, 0.5), FingerExtension::ALL);

        let fist = LandmarkSet::new(&pose(Pose::Fist)).unwrap();
        assert_eq!(fist.finger_extension(0.1, 0.5), FingerExtension::NONE);
    }

    #[test]
    fn test_extension_is_scale_invariant() {
        let near = LandmarkSet::new(&pose(Pose::Peace)).unwrap();
        let far_points: Vec<Landmark> = pose(Pose::Peace)
            .iter()
            .map(|p| Landmark::new(p.x * 0.25, p.y * 0.25))
            .collect();
        let far = LandmarkSet::new(&far_points).unwrap();

        assert_eq!(near.finger_extension(0.1, 0.5), far.finger_extension(0.1, 0.5));
        assert!((near.palm_openness() - far.palm_openness()).abs() < 1e-4);
    }

    #[test]
    fn test_pointing_direction_tie_breaks_horizontal() {
        assert_eq!(PointDirection::from_vector(1.0, 1.0), PointDirection::Right);
        assert_eq!(PointDirection::from_vector(-1.0, -1.0), PointDirection::Left);
        assert_eq!(PointDirection::from_vector(0.1, -1.0), PointDirection::Up);
        assert_eq!(PointDirection::from_vector(0.1, 1.0), PointDirection::Down);
    }

    #[test]
    fn test_palm_openness_edge_on() {
        let mut points = pose(Pose::OpenPalm);
        // Collapse the palm triangle onto a line
        points[PINKY_MCP] = Landmark::new(
            points[WRIST].x + 2.0 * (points[INDEX_MCP].x - points[WRIST].x),
            points[WRIST].y + 2.0 * (points[INDEX_MCP].y - points[WRIST].y),
        );
        let set = LandmarkSet::new(&points).unwrap();
        assert!(set.palm_openness() < 0.01);
    }

    #[test]
    fn test_finger_mask_helpers() {
        let mask = FingerExtension::only(&[Finger::Index, Finger::Middle]);
        assert!(mask.is_extended(Finger::Index));
        assert!(!mask.is_extended(Finger::Thumb));
        assert_eq!(mask.count(), 2);
        assert_eq!(mask.as_array(), [false, true, true, false, false]);
    }

    #[test]
    fn test_skeleton_reaches_every_landmark() {
        let mut touched = [false; LANDMARK_COUNT];
        for (i, (a, b)) in HAND_SKELETON.iter().enumerate() {
            assert_ne!(a, b);
            assert!(!HAND_SKELETON[i + 1..].contains(&(*a, *b)));
            touched[*a] = true;
            touched[*b] = true;
        }
        assert!(touched.iter().all(|t| *t));
    }
}
