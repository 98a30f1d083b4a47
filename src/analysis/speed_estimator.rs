// src/analysis/speed_estimator.rs
//
// Bowling speed from wrist motion.
//
// The higher wrist in each frame stands in for the bowling hand. Every
// consecutive pair of those positions yields a candidate speed after
// scaling normalized displacement by the pitch length (with an empirical
// perspective factor). Candidates outside the plausibility band are noise;
// the fastest plausible one wins.
//
// Known limitation: the higher wrist is not always the bowling arm (the
// other arm can rise during follow-through), and the scale assumes an
// end-on camera framing the full pitch.

use crate::types::{
    Frame, SpeedConfidence, SpeedConfig, SpeedEstimate, LEFT_WRIST, RIGHT_WRIST,
};
use tracing::debug;

pub const KPH_TO_MPH: f32 = 0.621371;
pub const METHOD: &str = "wrist_trajectory";

/// Bands for the confidence tiers (exclusive bounds)
const HIGH_CONFIDENCE_KPH: (f32, f32) = (60.0, 160.0);
const MEDIUM_CONFIDENCE_KPH: (f32, f32) = (50.0, 165.0);
const HIGH_CONFIDENCE_MAX_DT: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
struct WristSample {
    x: f32,
    y: f32,
    timestamp: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate {
    speed_kph: f32,
    dt: f64,
}

#[derive(Debug, Clone, Default)]
pub struct SpeedEstimator {
    config: SpeedConfig,
}

impl SpeedEstimator {
    pub fn new(config: SpeedConfig) -> Self {
        Self { config }
    }

    /// None when fewer than two usable frames exist or no candidate falls
    /// inside the plausibility band.
    pub fn estimate(&self, frames: &[Frame]) -> Option<SpeedEstimate> {
        if frames.len() < 2 {
            return None;
        }

        let wrists: Vec<WristSample> = frames.iter().filter_map(higher_wrist).collect();
        if wrists.len() < 2 {
            debug!(
                "Speed estimate skipped: {} of {} frames had a wrist",
                wrists.len(),
                frames.len()
            );
            return None;
        }

        let mut best: Option<Candidate> = None;
        let mut discarded = 0usize;

        for pair in wrists.windows(2) {
            let Some(candidate) = self.candidate(&pair[0], &pair[1]) else {
                continue;
            };

            if !self.is_plausible(candidate.speed_kph) {
                discarded += 1;
                continue;
            }

            if best.map_or(true, |b| candidate.speed_kph > b.speed_kph) {
                best = Some(candidate);
            }
        }

        debug!(
            "Speed candidates: {} pairs, {} outside plausible band",
            wrists.len() - 1,
            discarded
        );

        best.map(|winner| SpeedEstimate {
            speed_kph: winner.speed_kph.round(),
            speed_mph: (winner.speed_kph * KPH_TO_MPH).round(),
            confidence: confidence_tier(winner.speed_kph, winner.dt),
            method: METHOD.to_string(),
        })
    }

    fn candidate(&self, from: &WristSample, to: &WristSample) -> Option<Candidate> {
        let mut dt = to.timestamp - from.timestamp;
        if dt <= 0.0 && self.config.fps_hint > 0.0 {
            dt = 1.0 / self.config.fps_hint;
        }
        if dt <= 0.0 || !dt.is_finite() {
            return None;
        }

        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let normalized = (dx * dx + dy * dy).sqrt();
        let meters = normalized * self.config.pitch_length_m * self.config.perspective_factor;
        let meters_per_second = meters as f64 / dt;

        Some(Candidate {
            speed_kph: (meters_per_second * 3.6) as f32,
            dt,
        })
    }

    fn is_plausible(&self, speed_kph: f32) -> bool {
        speed_kph > self.config.min_plausible_kph && speed_kph < self.config.max_plausible_kph
    }
}

/// The wrist nearer the top of the frame; the other one when only one is usable
fn higher_wrist(frame: &Frame) -> Option<WristSample> {
    let wrist = match (frame.pose.reliable(LEFT_WRIST), frame.pose.reliable(RIGHT_WRIST)) {
        (Some(left), Some(right)) => {
            if right.y < left.y {
                right
            } else {
                left
            }
        }
        (Some(left), None) => left,
        (None, Some(right)) => right,
        (None, None) => return None,
    };

    Some(WristSample {
        x: wrist.x,
        y: wrist.y,
        timestamp: frame.timestamp,
    })
}

fn confidence_tier(speed_kph: f32, dt: f64) -> SpeedConfidence {
    let within = |(lo, hi): (f32, f32)| speed_kph > lo && speed_kph < hi;

    if dt < HIGH_CONFIDENCE_MAX_DT && within(HIGH_CONFIDENCE_KPH) {
        SpeedConfidence::High
    } else if within(MEDIUM_CONFIDENCE_KPH) {
        SpeedConfidence::Medium
    } else {
        SpeedConfidence::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Landmark, Pose};

    /// 1 normalized unit = 20.12 * 0.8 = 16.096 m
    const METERS_PER_UNIT: f64 = 16.096;

    fn wrist_frame(t: f64, x: f32, y: f32) -> Frame {
        Frame::new(t, Pose::empty().with(RIGHT_WRIST, Landmark::new(x, y)))
    }

    /// Normalized displacement that yields `kph` over `dt` seconds
    fn displacement_for(kph: f64, dt: f64) -> f32 {
        (kph / 3.6 * dt / METERS_PER_UNIT) as f32
    }

    #[test]
    fn test_slow_wrist_is_below_plausible_floor() {
        // 0.05 units in 0.1s ≈ 29 km/h
        let frames = vec![wrist_frame(0.0, 0.5, 0.3), wrist_frame(0.1, 0.55, 0.3)];
        assert!(SpeedEstimator::default().estimate(&frames).is_none());
    }

    #[test]
    fn test_fewer_than_two_frames_is_none() {
        let estimator = SpeedEstimator::default();
        assert!(estimator.estimate(&[]).is_none());
        assert!(estimator.estimate(&[wrist_frame(0.0, 0.5, 0.5)]).is_none());
    }

    #[test]
    fn test_plausible_delivery_is_reported() {
        let dx = displacement_for(120.0, 0.1);
        let frames = vec![wrist_frame(0.0, 0.2, 0.3), wrist_frame(0.1, 0.2 + dx, 0.3)];

        let estimate = SpeedEstimator::default().estimate(&frames).unwrap();
        assert_eq!(estimate.speed_kph, 120.0);
        assert_eq!(estimate.speed_mph, 75.0);
        assert_eq!(estimate.confidence, SpeedConfidence::High);
        assert_eq!(estimate.method, METHOD);
    }

    #[test]
    fn test_fastest_plausible_pair_wins_and_implausible_is_ignored() {
        let slow = displacement_for(90.0, 0.1);
        let fast = displacement_for(130.0, 0.1);
        let absurd = displacement_for(400.0, 0.1);

        let mut x = 0.1;
        let mut frames = vec![wrist_frame(0.0, x, 0.3)];
        for (i, step) in [slow, fast, absurd].iter().enumerate() {
            x += step;
            frames.push(wrist_frame((i + 1) as f64 * 0.1, x, 0.3));
        }

        let estimate = SpeedEstimator::default().estimate(&frames).unwrap();
        assert_eq!(estimate.speed_kph, 130.0);
    }

    #[test]
    fn test_only_implausible_candidates_yield_none() {
        let absurd = displacement_for(250.0, 0.1);
        let frames = vec![wrist_frame(0.0, 0.1, 0.3), wrist_frame(0.1, 0.1 + absurd, 0.3)];
        assert!(SpeedEstimator::default().estimate(&frames).is_none());
    }

    #[test]
    fn test_plausibility_band_edges() {
        let single_step = |kph: f64| {
            let dx = displacement_for(kph, 0.1);
            vec![wrist_frame(0.0, 0.1, 0.3), wrist_frame(0.1, 0.1 + dx, 0.3)]
        };
        let estimator = SpeedEstimator::default();

        let floor = estimator.estimate(&single_step(40.6)).unwrap();
        assert_eq!(floor.speed_kph, 41.0);
        assert!(estimator.estimate(&single_step(39.4)).is_none());

        let ceiling = estimator.estimate(&single_step(169.4)).unwrap();
        assert_eq!(ceiling.speed_kph, 169.0);
        assert!(estimator.estimate(&single_step(170.6)).is_none());
    }

    #[test]
    fn test_higher_wrist_is_tracked() {
        let dx = displacement_for(100.0, 0.1);
        // Left wrist sits high and moves fast; right wrist low and static
        let frame = |t: f64, left_x: f32| {
            Frame::new(
                t,
                Pose::empty()
                    .with(LEFT_WRIST, Landmark::new(left_x, 0.2))
                    .with(RIGHT_WRIST, Landmark::new(0.5, 0.7)),
            )
        };
        let frames = vec![frame(0.0, 0.3), frame(0.1, 0.3 + dx)];

        let estimate = SpeedEstimator::default().estimate(&frames).unwrap();
        assert_eq!(estimate.speed_kph, 100.0);
    }

    #[test]
    fn test_frames_without_wrists_are_skipped() {
        let dx = displacement_for(110.0, 0.2);
        let frames = vec![
            wrist_frame(0.0, 0.3, 0.3),
            Frame::new(0.1, Pose::empty()),
            Frame::new(
                0.15,
                Pose::empty().with(RIGHT_WRIST, Landmark::with_visibility(0.9, 0.9, 0.1)),
            ),
            wrist_frame(0.2, 0.3 + dx, 0.3),
        ];

        let estimate = SpeedEstimator::default().estimate(&frames).unwrap();
        assert_eq!(estimate.speed_kph, 110.0);
    }

    #[test]
    fn test_duplicate_timestamp_uses_fps_hint() {
        // 30 fps hint → dt = 1/30 s
        let dx = displacement_for(100.0, 1.0 / 30.0);
        let frames = vec![wrist_frame(1.0, 0.3, 0.3), wrist_frame(1.0, 0.3 + dx, 0.3)];

        let estimate = SpeedEstimator::default().estimate(&frames).unwrap();
        assert_eq!(estimate.speed_kph, 100.0);
    }

    #[test]
    fn test_confidence_tiers() {
        assert_eq!(confidence_tier(120.0, 0.1), SpeedConfidence::High);
        assert_eq!(confidence_tier(120.0, 0.6), SpeedConfidence::Medium);
        assert_eq!(confidence_tier(55.0, 0.1), SpeedConfidence::Medium);
        assert_eq!(confidence_tier(162.0, 0.1), SpeedConfidence::Medium);
        assert_eq!(confidence_tier(45.0, 0.1), SpeedConfidence::Low);
        assert_eq!(confidence_tier(168.0, 0.1), SpeedConfidence::Low);
    }
}
