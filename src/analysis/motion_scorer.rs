// src/analysis/motion_scorer.rs
//
// Frame-to-frame activity signal: mean displacement of the 12 limb joints
// between two consecutive poses, in normalized frame units.

use crate::types::{Pose, KEY_LANDMARKS};

/// Mean Euclidean displacement of the key joints present (and reliable) in
/// both poses. Joints missing from either side are skipped; returns 0.0
/// when no joint overlaps.
pub fn motion_score(prev: &Pose, curr: &Pose) -> f32 {
    let (total, count) = KEY_LANDMARKS
        .iter()
        .filter_map(|&idx| Some((prev.reliable(idx)?, curr.reliable(idx)?)))
        .fold((0.0f32, 0usize), |(total, count), (a, b)| {
            (total + a.distance_to(b), count + 1)
        });

    if count == 0 {
        0.0
    } else {
        total / count as f32
    }
}
