// src/analysis/clip_segmenter.rs
//
// Turns an ordered pose sequence into action clips.
//
// Signal flow:
//   Frame pairs → motion_score → threshold → greedy merge (single sweep)
//   → min-duration filter → peak pose → action_classifier → ActionClip
//
// The whole pass is a fold over the motion samples; nothing survives the
// call, so independent recordings can be segmented concurrently.

use super::action_classifier::classify_action;
use super::motion_scorer::motion_score;
use crate::types::{ActionClip, Frame, Pose, SegmentationConfig};
use tracing::debug;

// ============================================================================
// INTERNAL TYPES
// ============================================================================

/// Motion between a frame and its predecessor, stamped with the later frame
#[derive(Debug, Clone, Copy)]
struct MotionSample<'a> {
    timestamp: f64,
    score: f32,
    pose: &'a Pose,
}

/// Open accumulator during the sweep
#[derive(Debug)]
struct RawInterval<'a> {
    start: f64,
    end: f64,
    samples: Vec<MotionSample<'a>>,
}

impl<'a> RawInterval<'a> {
    fn open(sample: MotionSample<'a>) -> Self {
        Self {
            start: sample.timestamp,
            end: sample.timestamp,
            samples: vec![sample],
        }
    }

    fn extend(&mut self, sample: MotionSample<'a>) {
        self.end = sample.timestamp;
        self.samples.push(sample);
    }

    fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Highest-scoring sample; ties keep the earliest
    fn peak(&self) -> &MotionSample<'a> {
        let mut peak = &self.samples[0];
        for sample in &self.samples[1..] {
            if sample.score > peak.score {
                peak = sample;
            }
        }
        peak
    }

    fn average_score(&self) -> f32 {
        let total: f32 = self.samples.iter().map(|s| s.score).sum();
        total / self.samples.len() as f32
    }
}

// ============================================================================
// SEGMENTER
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct ClipSegmenter {
    config: SegmentationConfig,
}

impl ClipSegmenter {
    pub fn new(config: SegmentationConfig) -> Self {
        Self { config }
    }

    /// Segment an ordered frame sequence. Fewer than two frames, or no
    /// motion above threshold, yields an empty list.
    pub fn segment(&self, frames: &[Frame]) -> Vec<ActionClip> {
        if frames.len() < 2 {
            debug!("Segmentation skipped: {} frame(s)", frames.len());
            return Vec::new();
        }

        let intervals = self.group_intervals(frames);
        let raw_count = intervals.len();

        let clips: Vec<ActionClip> = intervals
            .into_iter()
            .filter(|interval| interval.duration() >= self.config.min_clip_duration_s)
            .map(|interval| self.promote(&interval))
            .collect();

        debug!(
            "Segmented {} frames: {} raw interval(s), {} clip(s) kept",
            frames.len(),
            raw_count,
            clips.len()
        );

        clips
    }

    fn group_intervals<'a>(&self, frames: &'a [Frame]) -> Vec<RawInterval<'a>> {
        let threshold = self.config.motion_threshold;
        let merge_padding = self.config.merge_padding_s;

        frames
            .windows(2)
            .map(|pair| MotionSample {
                timestamp: pair[1].timestamp,
                score: motion_score(&pair[0].pose, &pair[1].pose),
                pose: &pair[1].pose,
            })
            .filter(|sample| sample.score > threshold)
            .fold(Vec::new(), |mut intervals: Vec<RawInterval<'a>>, sample| {
                let merges = intervals
                    .last()
                    .is_some_and(|current| sample.timestamp - current.end <= merge_padding);

                if let (true, Some(current)) = (merges, intervals.last_mut()) {
                    current.extend(sample);
                } else {
                    intervals.push(RawInterval::open(sample));
                }
                intervals
            })
    }

    fn promote(&self, interval: &RawInterval<'_>) -> ActionClip {
        let classification = classify_action(interval.peak().pose);
        let margin = self.config.clip_margin_s;

        ActionClip {
            start_time: (interval.start - margin).max(0.0),
            end_time: interval.end + margin,
            action: classification.action,
            confidence: clip_confidence(interval.average_score(), self.config.motion_threshold),
            label: classification.label.to_string(),
        }
    }
}

/// Linear in average motion, saturating at 3x the detection threshold.
/// Rounded to two decimals.
pub fn clip_confidence(average_motion: f32, motion_threshold: f32) -> f32 {
    let raw = (average_motion / (motion_threshold * 3.0)).min(1.0);
    if raw.is_nan() {
        return 0.0;
    }
    (raw.max(0.0) * 100.0).round() / 100.0
}
