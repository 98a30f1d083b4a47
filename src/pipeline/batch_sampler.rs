// src/pipeline/batch_sampler.rs
//
// Batch-mode frame collection.
//
// The landmark source owns the slow part (seek the video, wait for the
// seek to land, grab the frame, run pose inference). We drive it one
// timestamp at a time and await each capture, checking the stop signal
// between captures. A cancelled run hands back nothing: clips are only
// ever built from a complete pass.

use super::metrics::RunMetrics;
use crate::recording::RecordedFrame;
use crate::types::{Frame, Pose};
use anyhow::{Context, Result};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

// ============================================================================
// SOURCE + CANCELLATION
// ============================================================================

pub trait LandmarkSource {
    /// Length of the underlying clip in seconds
    fn duration_s(&self) -> f64;

    /// Pose at `timestamp`, or None when detection found nobody
    fn capture(&mut self, timestamp: f64) -> impl Future<Output = Result<Option<Pose>>> + Send;
}

/// Shared abort flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    Complete(Vec<Frame>),
    /// Stopped part-way; captured frames were discarded
    Cancelled { frames_discarded: usize },
}

// ============================================================================
// SAMPLING
// ============================================================================

/// Uniform sample times `0, 1/fps, 2/fps, …` up to and including `duration_s`
pub fn sample_timestamps(duration_s: f64, sample_fps: f64) -> Vec<f64> {
    if !(duration_s > 0.0 && duration_s.is_finite()) || !(sample_fps > 0.0 && sample_fps.is_finite())
    {
        return Vec::new();
    }

    let last = (duration_s * sample_fps + 1e-9).floor() as usize;
    (0..=last).map(|i| i as f64 / sample_fps).collect()
}

pub async fn collect_frames<S: LandmarkSource>(
    source: &mut S,
    sample_fps: f64,
    stop: &StopSignal,
    metrics: &RunMetrics,
) -> Result<BatchOutcome> {
    let plan = sample_timestamps(source.duration_s(), sample_fps);
    debug!(
        "Sampling plan: {} timestamps over {:.2}s at {:.1} fps",
        plan.len(),
        source.duration_s(),
        sample_fps
    );

    let mut frames = Vec::with_capacity(plan.len());

    for timestamp in plan {
        if stop.is_stopped() {
            info!("Batch sampling stopped at {:.2}s", timestamp);
            return Ok(BatchOutcome::Cancelled {
                frames_discarded: frames.len(),
            });
        }

        let pose = source
            .capture(timestamp)
            .await
            .with_context(|| format!("Landmark capture failed at {:.3}s", timestamp))?;

        match pose {
            Some(pose) => {
                metrics.inc(&metrics.frames_sampled);
                frames.push(Frame::new(timestamp, pose));
            }
            None => {
                metrics.inc(&metrics.frames_dropped);
                debug!("No pose at {:.3}s", timestamp);
            }
        }
    }

    if stop.is_stopped() {
        return Ok(BatchOutcome::Cancelled {
            frames_discarded: frames.len(),
        });
    }

    Ok(BatchOutcome::Complete(frames))
}

// ============================================================================
// RECORDED SOURCE
// ============================================================================

/// Replays a pre-recorded landmark track; a capture returns the latest
/// recorded pose at or before the requested time.
#[derive(Debug, Clone)]
pub struct RecordedSource {
    frames: Vec<RecordedFrame>,
}

impl RecordedSource {
    /// `frames` must be ordered by timestamp
    pub fn new(frames: Vec<RecordedFrame>) -> Self {
        Self { frames }
    }
}

impl LandmarkSource for RecordedSource {
    fn duration_s(&self) -> f64 {
        self.frames.last().map_or(0.0, |f| f.timestamp)
    }

    async fn capture(&mut self, timestamp: f64) -> Result<Option<Pose>> {
        // Seek point: let other tasks run while the "seek" completes
        tokio::task::yield_now().await;

        let after = self.frames.partition_point(|f| f.timestamp <= timestamp);
        Ok(after
            .checked_sub(1)
            .and_then(|idx| self.frames[idx].landmarks.clone()))
    }
}
