//! Synthetic hand poses for tests.
//!
//! Poses are laid out in "hand units" around the wrist (palm width ~2 units,
//! image y downward) and then scaled, rotated and placed in image space.

use super::landmarks::{Landmark, LANDMARK_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pose {
    OpenPalm,
    Fist,
    Peace,
    Point,
    ThumbsUp,
    Pinch,
    TightPinch,
}

const THUMB_EXTENDED: [(f32, f32); 4] = [(-0.8, -0.5), (-1.4, -0.9), (-1.9, -1.2), (-2.5, -1.5)];
const THUMB_FOLDED: [(f32, f32); 4] = [(-0.8, -0.5), (-1.4, -0.9), (-1.2, -1.3), (-0.2, -1.5)];

const MCPS: [(f32, f32); 4] = [(-1.0, -2.0), (-0.3, -2.1), (0.4, -2.0), (1.0, -1.8)];

fn finger(mcp: (f32, f32), extended: bool) -> [(f32, f32); 4] {
    let (x, y) = mcp;
    if extended {
        [(x, y), (x, y - 1.0), (x, y - 1.6), (x, y - 2.1)]
    } else {
        [(x, y), (x, y - 0.8), (x, y - 0.5), (x, y - 0.2)]
    }
}

fn layout(pose: Pose) -> Vec<(f32, f32)> {
    let (thumb, fingers): ([(f32, f32); 4], [bool; 4]) = match pose {
        Pose::OpenPalm => (THUMB_EXTENDED, [true; 4]),
        Pose::Fist => (THUMB_FOLDED, [false; 4]),
        Pose::Peace => (THUMB_FOLDED, [true, true, false, false]),
        Pose::Point => (THUMB_FOLDED, [true, false, false, false]),
        Pose::ThumbsUp => (THUMB_EXTENDED, [false; 4]),
        Pose::Pinch | Pose::TightPinch => (THUMB_EXTENDED, [false; 4]),
    };

    let mut points = Vec::with_capacity(LANDMARK_COUNT);
    points.push((0.0, 0.0));
    points.extend_from_slice(&thumb);
    for (mcp, extended) in MCPS.iter().zip(fingers) {
        points.extend_from_slice(&finger(*mcp, extended));
    }

    if matches!(pose, Pose::Pinch | Pose::TightPinch) {
        // Index half-curled toward a thumb tip that touches it
        points[6] = (-1.0, -2.9);
        points[7] = (-1.1, -3.3);
        points[8] = (-1.3, -3.5);
        let gap = if pose == Pose::Pinch { 0.5 } else { 0.2 };
        points[4] = (-1.3 + gap, -3.5);
    }
    points
}

/// Pose placed at `origin` in image space, `scale` image units per hand
/// unit, rotated by `angle` radians (positive turns "up" toward "right").
pub fn pose_at(pose: Pose, origin: (f32, f32), scale: f32, angle: f32) -> Vec<Landmark> {
    let (sin, cos) = angle.sin_cos();
    layout(pose)
        .into_iter()
        .map(|(u, v)| {
            let x = u * cos - v * sin;
            let y = u * sin + v * cos;
            Landmark::new(origin.0 + x * scale, origin.1 + y * scale)
        })
        .collect()
}

/// Upright pose with the wrist near the bottom middle of the frame
pub fn pose(pose: Pose) -> Vec<Landmark> {
    pose_at(pose, (0.5, 0.8), 0.05, 0.0)
}

/// Upright pose with the wrist at `(x, y)`
pub fn pose_with_wrist(pose: Pose, x: f32, y: f32) -> Vec<Landmark> {
    pose_at(pose, (x, y), 0.05, 0.0)
}
