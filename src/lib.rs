//! Cricket training-video motion analysis.
//!
//! Works on a stream of normalized 2-D body landmarks (one pose per sampled
//! instant) and derives:
//! - action clips: intervals of batting, bowling, or fielding activity,
//!   separated from dead time, with a heuristic label and confidence
//! - a bowling speed estimate from wrist motion, with a pace category
//!
//! The four entry points below are synchronous and pure. Batch frame
//! collection and live monitoring live in [`pipeline`].

pub mod analysis;
mod config;
pub mod pipeline;
pub mod recording;
pub mod types;

use analysis::{ClipSegmenter, SpeedEstimator};
use types::{ActionClip, ClipSummary, Frame, SegmentationConfig, SpeedConfig, SpeedEstimate};

pub use analysis::{classify_action, Classification, PaceCategory, PaceReading};

/// Segment `frames` into action clips.
pub fn detect_action_clips(frames: &[Frame], config: &SegmentationConfig) -> Vec<ActionClip> {
    ClipSegmenter::new(config.clone()).segment(frames)
}

/// Session statistics for a clip set.
pub fn get_clip_summary(clips: &[ActionClip]) -> ClipSummary {
    analysis::summarize_clips(clips)
}

/// Fastest plausible wrist speed in `frames`, if any.
pub fn estimate_ball_speed(frames: &[Frame], config: &SpeedConfig) -> Option<SpeedEstimate> {
    SpeedEstimator::new(config.clone()).estimate(frames)
}

/// Descriptive pace band for a speed in km/h.
pub fn classify_pace(speed_kph: f32) -> PaceReading {
    analysis::classify_pace(speed_kph)
}
