// src/types.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub segmentation: SegmentationConfig,
    pub speed: SpeedConfig,
    pub sampling: SamplingConfig,
    pub input: InputConfig,
    pub live: LiveConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Mean key-landmark displacement per frame pair that counts as motion
    pub motion_threshold: f32,
    /// Detected motion windows shorter than this are dropped (before padding)
    pub min_clip_duration_s: f64,
    /// Above-threshold samples closer than this to the open interval extend it
    pub merge_padding_s: f64,
    /// Margin added on both sides of a detected window when emitting a clip
    pub clip_margin_s: f64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            motion_threshold: 0.015,
            min_clip_duration_s: 0.5,
            merge_padding_s: 1.0,
            clip_margin_s: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    /// Used as the frame interval when two samples share a timestamp
    pub fps_hint: f64,
    pub pitch_length_m: f32,
    /// Empirical perspective correction applied on top of the pitch length
    pub perspective_factor: f32,
    pub min_plausible_kph: f32,
    pub max_plausible_kph: f32,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            fps_hint: 30.0,
            pitch_length_m: 20.12,
            perspective_factor: 0.8,
            min_plausible_kph: 40.0,
            max_plausible_kph: 170.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub sample_fps: f64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self { sample_fps: 10.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub input_dir: String,
    pub output_dir: String,
    pub save_reports: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            input_dir: "recordings".to_string(),
            output_dir: "output".to_string(),
            save_reports: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveConfig {
    pub enabled: bool,
    pub motion_threshold: f32,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            motion_threshold: 0.015,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "cricket_motion=info".to_string(),
        }
    }
}

// ============================================================================
// LANDMARK INDICES (MediaPipe Pose - 33 total)
// ============================================================================

pub const POSE_LANDMARK_COUNT: usize = 33;

pub const NOSE: usize = 0;
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_ELBOW: usize = 13;
pub const RIGHT_ELBOW: usize = 14;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;
pub const LEFT_KNEE: usize = 25;
pub const RIGHT_KNEE: usize = 26;
pub const LEFT_ANKLE: usize = 27;
pub const RIGHT_ANKLE: usize = 28;

/// Limb joints whose displacement drives the motion score
pub const KEY_LANDMARKS: [usize; 12] = [
    LEFT_SHOULDER,
    RIGHT_SHOULDER,
    LEFT_ELBOW,
    RIGHT_ELBOW,
    LEFT_WRIST,
    RIGHT_WRIST,
    LEFT_HIP,
    RIGHT_HIP,
    LEFT_KNEE,
    RIGHT_KNEE,
    LEFT_ANKLE,
    RIGHT_ANKLE,
];

/// Landmarks below this visibility are ignored by every geometric computation
pub const MIN_VISIBILITY: f32 = 0.5;

// ============================================================================
// POSE DATA
// ============================================================================

/// A single 2D landmark (normalized to frame dimensions, not clamped)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f32>,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            visibility: None,
        }
    }

    pub fn with_visibility(x: f32, y: f32, visibility: f32) -> Self {
        Self {
            x,
            y,
            visibility: Some(visibility),
        }
    }

    /// Missing visibility counts as reliable
    pub fn is_reliable(&self) -> bool {
        self.visibility.map_or(true, |v| v >= MIN_VISIBILITY)
    }

    pub fn distance_to(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Landmarks for one instant, keyed by MediaPipe index. Any slot may be empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Option<Landmark>>", into = "Vec<Option<Landmark>>")]
pub struct Pose {
    landmarks: [Option<Landmark>; POSE_LANDMARK_COUNT],
}

impl Pose {
    pub fn empty() -> Self {
        Self {
            landmarks: [None; POSE_LANDMARK_COUNT],
        }
    }

    /// Builder-style setter; out-of-range indices are ignored
    pub fn with(mut self, index: usize, landmark: Landmark) -> Self {
        self.set(index, landmark);
        self
    }

    pub fn set(&mut self, index: usize, landmark: Landmark) {
        if let Some(slot) = self.landmarks.get_mut(index) {
            *slot = Some(landmark);
        }
    }

    /// Raw landmark at `index`, regardless of visibility
    pub fn landmark(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index).and_then(|l| l.as_ref())
    }

    /// Landmark at `index` if present and visible enough to reason about
    pub fn reliable(&self, index: usize) -> Option<&Landmark> {
        self.landmark(index).filter(|l| l.is_reliable())
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vec<Option<Landmark>>> for Pose {
    fn from(values: Vec<Option<Landmark>>) -> Self {
        let mut pose = Pose::empty();
        for (slot, value) in pose.landmarks.iter_mut().zip(values) {
            *slot = value;
        }
        pose
    }
}

impl From<Pose> for Vec<Option<Landmark>> {
    fn from(pose: Pose) -> Self {
        pose.landmarks.to_vec()
    }
}

/// One sampled instant: seconds since clip start plus the detected pose
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub timestamp: f64,
    pub pose: Pose,
}

impl Frame {
    pub fn new(timestamp: f64, pose: Pose) -> Self {
        Self { timestamp, pose }
    }
}

// ============================================================================
// ANALYSIS OUTPUT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Batting,
    Bowling,
    Fielding,
    Unknown,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Batting => "batting",
            Self::Bowling => "bowling",
            Self::Fielding => "fielding",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionClip {
    pub start_time: f64,
    pub end_time: f64,
    #[serde(rename = "type")]
    pub action: ActionType,
    pub confidence: f32,
    pub label: String,
}

impl ActionClip {
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// Session-level aggregate over a clip set. Durations are whole seconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipSummary {
    pub total_duration: f64,
    pub active_duration: f64,
    pub dead_time: f64,
    pub clip_count: usize,
    pub breakdown: BTreeMap<ActionType, usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedConfidence {
    High,
    Medium,
    Low,
}

impl SpeedConfidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedEstimate {
    pub speed_kph: f32,
    pub speed_mph: f32,
    pub confidence: SpeedConfidence,
    pub method: String,
}
