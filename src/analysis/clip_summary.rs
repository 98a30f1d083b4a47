// src/analysis/clip_summary.rs

use crate::types::{ActionClip, ClipSummary};
use std::collections::BTreeMap;

/// Aggregate a clip set into session statistics.
///
/// Total duration spans the earliest clip start to the latest clip end;
/// active duration sums clip lengths; dead time is the non-negative
/// difference. Duration fields are rounded to whole seconds.
pub fn summarize_clips(clips: &[ActionClip]) -> ClipSummary {
    if clips.is_empty() {
        return ClipSummary::default();
    }

    let active: f64 = clips.iter().map(ActionClip::duration).sum();

    let first_start = clips
        .iter()
        .map(|c| c.start_time)
        .fold(f64::INFINITY, f64::min);
    let last_end = clips
        .iter()
        .map(|c| c.end_time)
        .fold(f64::NEG_INFINITY, f64::max);
    let total = (last_end - first_start).max(0.0);

    let mut breakdown = BTreeMap::new();
    for clip in clips {
        *breakdown.entry(clip.action).or_insert(0) += 1;
    }

    ClipSummary {
        total_duration: total.round(),
        active_duration: active.round(),
        dead_time: (total - active).max(0.0).round(),
        clip_count: clips.len(),
        breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ActionType;

    fn clip(start: f64, end: f64, action: ActionType) -> ActionClip {
        ActionClip {
            start_time: start,
            end_time: end,
            action,
            confidence: 0.5,
            label: String::new(),
        }
    }

    #[test]
    fn test_empty_clip_set_is_all_zero() {
        let summary = summarize_clips(&[]);
        assert_eq!(summary.total_duration, 0.0);
        assert_eq!(summary.active_duration, 0.0);
        assert_eq!(summary.dead_time, 0.0);
        assert_eq!(summary.clip_count, 0);
        assert!(summary.breakdown.is_empty());
    }

    #[test]
    fn test_summary_counts_active_and_dead_time() {
        let clips = vec![
            clip(0.5, 3.5, ActionType::Bowling),
            clip(10.0, 12.2, ActionType::Batting),
            clip(20.0, 24.0, ActionType::Bowling),
        ];
        let summary = summarize_clips(&clips);

        assert_eq!(summary.total_duration, 24.0); // 23.5 rounds up
        assert_eq!(summary.active_duration, 9.0); // 9.2
        assert_eq!(summary.dead_time, 14.0); // 14.3
        assert_eq!(summary.clip_count, 3);
        assert_eq!(summary.breakdown.get(&ActionType::Bowling), Some(&2));
        assert_eq!(summary.breakdown.get(&ActionType::Batting), Some(&1));
        assert_eq!(summary.breakdown.get(&ActionType::Fielding), None);
    }

    #[test]
    fn test_overlapping_clips_never_produce_negative_dead_time() {
        let clips = vec![
            clip(0.0, 5.0, ActionType::Unknown),
            clip(1.0, 6.0, ActionType::Unknown),
        ];
        let summary = summarize_clips(&clips);

        assert_eq!(summary.active_duration, 10.0);
        assert_eq!(summary.total_duration, 6.0);
        assert_eq!(summary.dead_time, 0.0);
    }

    #[test]
    fn test_breakdown_serializes_by_type_name() {
        let summary = summarize_clips(&[clip(0.0, 1.0, ActionType::Fielding)]);
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["breakdown"]["fielding"], 1);
        assert_eq!(value["clip_count"], 1);
    }
}
