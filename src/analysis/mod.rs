// src/analysis/mod.rs
//
// Motion-analysis core. Everything here is pure over its inputs.
//
// Signal flow:
//   Frames → motion_scorer → clip_segmenter → action_classifier → ActionClip
//                                           → clip_summary      → ClipSummary
//   Frames → speed_estimator → pace_classifier

pub mod action_classifier;
pub mod clip_segmenter;
pub mod clip_summary;
pub mod motion_scorer;
pub mod pace_classifier;
pub mod speed_estimator;

pub use action_classifier::{classify_action, Classification, PoseGeometry};
pub use clip_segmenter::{clip_confidence, ClipSegmenter};
pub use clip_summary::summarize_clips;
pub use motion_scorer::motion_score;
pub use pace_classifier::{classify_pace, PaceCategory, PaceReading};
pub use speed_estimator::SpeedEstimator;
