// src/analysis/action_classifier.rs
//
// Geometric heuristic classifier for a clip's peak-motion pose.
//
// The policy is an ordered table of (predicate, outcome) rules evaluated
// first-match-wins over a small set of measurements taken from the pose.
// Ambiguous poses will be misclassified; "unknown" is a normal outcome.

use crate::types::{
    ActionType, Pose, LEFT_ANKLE, LEFT_SHOULDER, LEFT_WRIST, RIGHT_ANKLE, RIGHT_SHOULDER,
    RIGHT_WRIST,
};
use serde::Serialize;

/// A wrist counts as raised when it sits at least this far above the
/// shoulder line (normalized y grows downward)
pub const WRIST_RAISE_MARGIN: f32 = 0.05;

// ============================================================================
// TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub action: ActionType,
    pub label: &'static str,
}

impl Classification {
    const fn new(action: ActionType, label: &'static str) -> Self {
        Self { action, label }
    }
}

pub const MISSING_JOINTS: Classification =
    Classification::new(ActionType::Unknown, "Unknown action");
pub const UNMATCHED: Classification =
    Classification::new(ActionType::Unknown, "Movement detected");

/// Measurements the rules reason about
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseGeometry {
    pub left_wrist_raised: bool,
    pub right_wrist_raised: bool,
    pub shoulder_width: f32,
    pub ankle_separation: f32,
}

impl PoseGeometry {
    /// None when a shoulder, wrist, or ankle is missing or unreliable
    pub fn measure(pose: &Pose) -> Option<Self> {
        let left_shoulder = pose.reliable(LEFT_SHOULDER)?;
        let right_shoulder = pose.reliable(RIGHT_SHOULDER)?;
        let left_wrist = pose.reliable(LEFT_WRIST)?;
        let right_wrist = pose.reliable(RIGHT_WRIST)?;
        let left_ankle = pose.reliable(LEFT_ANKLE)?;
        let right_ankle = pose.reliable(RIGHT_ANKLE)?;

        let shoulder_line = (left_shoulder.y + right_shoulder.y) / 2.0;

        Some(Self {
            left_wrist_raised: left_wrist.y < shoulder_line - WRIST_RAISE_MARGIN,
            right_wrist_raised: right_wrist.y < shoulder_line - WRIST_RAISE_MARGIN,
            shoulder_width: (left_shoulder.x - right_shoulder.x).abs(),
            ankle_separation: (left_ankle.x - right_ankle.x).abs(),
        })
    }

    pub fn either_raised(&self) -> bool {
        self.left_wrist_raised || self.right_wrist_raised
    }

    pub fn both_raised(&self) -> bool {
        self.left_wrist_raised && self.right_wrist_raised
    }

    /// Ankle separation as a fraction of shoulder width
    fn stance_wider_than(&self, ratio: f32) -> bool {
        self.ankle_separation > self.shoulder_width * ratio
    }

    fn stance_narrower_than(&self, ratio: f32) -> bool {
        self.ankle_separation < self.shoulder_width * ratio
    }
}

// ============================================================================
// RULE TABLE
// ============================================================================

pub struct ClassificationRule {
    pub name: &'static str,
    pub matches: fn(&PoseGeometry) -> bool,
    pub outcome: Classification,
}

/// Evaluated in order; the first matching rule wins
pub static RULES: [ClassificationRule; 4] = [
    // Single raised arm with a long stride
    ClassificationRule {
        name: "single_arm_wide_stride",
        matches: |g| g.either_raised() && !g.both_raised() && g.stance_wider_than(0.5),
        outcome: Classification::new(ActionType::Bowling, "Bowling action"),
    },
    // Both hands up over a narrow base
    ClassificationRule {
        name: "both_arms_narrow_stance",
        matches: |g| g.both_raised() && g.stance_narrower_than(0.6),
        outcome: Classification::new(ActionType::Batting, "Batting stroke"),
    },
    // Low and wide with no arm raised
    ClassificationRule {
        name: "wide_low_stance",
        matches: |g| g.stance_wider_than(0.8) && !g.either_raised(),
        outcome: Classification::new(ActionType::Fielding, "Fielding movement"),
    },
    ClassificationRule {
        name: "any_arm_raised",
        matches: |g| g.either_raised(),
        outcome: Classification::new(ActionType::Batting, "Batting stance"),
    },
];

pub fn classify_geometry(geometry: &PoseGeometry) -> Classification {
    RULES
        .iter()
        .find(|rule| (rule.matches)(geometry))
        .map(|rule| rule.outcome)
        .unwrap_or(UNMATCHED)
}

pub fn classify_action(pose: &Pose) -> Classification {
    match PoseGeometry::measure(pose) {
        Some(geometry) => classify_geometry(&geometry),
        None => MISSING_JOINTS,
    }
}
