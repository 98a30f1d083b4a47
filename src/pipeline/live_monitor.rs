// src/pipeline/live_monitor.rs
//
// Streaming motion scoring for a live camera. Frames arrive at whatever
// cadence the capture loop manages; only the newest pose is retained.
// Live mode reports activity per frame and never finalizes clips or
// speed estimates.

use super::batch_sampler::StopSignal;
use crate::analysis::motion_scorer::motion_score;
use crate::types::Pose;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LiveReading {
    pub timestamp: f64,
    pub motion_score: f32,
    pub active: bool,
}

#[derive(Debug)]
pub struct LiveMotionMonitor {
    threshold: f32,
    previous: Option<Pose>,
    stop: StopSignal,
}

impl LiveMotionMonitor {
    pub fn new(threshold: f32) -> Self {
        Self::with_stop_signal(threshold, StopSignal::new())
    }

    /// Share `stop` with the capture loop so either side can end the session
    pub fn with_stop_signal(threshold: f32, stop: StopSignal) -> Self {
        Self {
            threshold,
            previous: None,
            stop,
        }
    }

    /// Score `pose` against the previously retained one.
    ///
    /// Returns None for the first pose of a run, after a detection gap
    /// (`pose` is None, which also clears the retained pose), and once the
    /// monitor has been stopped.
    pub fn push(&mut self, timestamp: f64, pose: Option<Pose>) -> Option<LiveReading> {
        if self.stop.is_stopped() {
            self.previous = None;
            return None;
        }

        let Some(pose) = pose else {
            self.previous = None;
            return None;
        };

        let reading = self.previous.as_ref().map(|previous| {
            let score = motion_score(previous, &pose);
            LiveReading {
                timestamp,
                motion_score: score,
                active: score > self.threshold,
            }
        });

        self.previous = Some(pose);
        reading
    }

    pub fn stop(&mut self) {
        self.stop.stop();
        self.previous = None;
        debug!("Live monitor stopped");
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_stopped()
    }

    pub fn has_retained_pose(&self) -> bool {
        self.previous.is_some()
    }
}
