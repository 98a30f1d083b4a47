// src/pipeline/metrics.rs
//
// Run-level counters. Cloning shares the same counters, so the batch
// sampler and the binary can both record into one set.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct RunMetrics {
    pub recordings: Arc<AtomicU64>,
    pub frames_sampled: Arc<AtomicU64>,
    pub frames_dropped: Arc<AtomicU64>,
    pub clips_detected: Arc<AtomicU64>,
    pub speed_estimates: Arc<AtomicU64>,
    pub started_at: Instant,
}

impl RunMetrics {
    pub fn new() -> Self {
        Self {
            recordings: Arc::new(AtomicU64::new(0)),
            frames_sampled: Arc::new(AtomicU64::new(0)),
            frames_dropped: Arc::new(AtomicU64::new(0)),
            clips_detected: Arc::new(AtomicU64::new(0)),
            speed_estimates: Arc::new(AtomicU64::new(0)),
            started_at: Instant::now(),
        }
    }

    pub fn inc(&self, counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add(&self, counter: &AtomicU64, amount: u64) {
        counter.fetch_add(amount, Ordering::Relaxed);
    }

    /// Sampled frames per wall-clock second since the run started
    pub fn fps(&self) -> f64 {
        let frames = self.frames_sampled.load(Ordering::Relaxed);
        let elapsed = self.started_at.elapsed().as_secs_f64();
        if elapsed > 0.01 {
            frames as f64 / elapsed
        } else {
            0.0
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            recordings: self.recordings.load(Ordering::Relaxed),
            frames_sampled: self.frames_sampled.load(Ordering::Relaxed),
            frames_dropped: self.frames_dropped.load(Ordering::Relaxed),
            clips_detected: self.clips_detected.load(Ordering::Relaxed),
            speed_estimates: self.speed_estimates.load(Ordering::Relaxed),
            fps: self.fps(),
            elapsed_secs: self.started_at.elapsed().as_secs_f64(),
        }
    }
}

impl Default for RunMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct MetricsSummary {
    pub recordings: u64,
    pub frames_sampled: u64,
    pub frames_dropped: u64,
    pub clips_detected: u64,
    pub speed_estimates: u64,
    pub fps: f64,
    pub elapsed_secs: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_counters() {
        let metrics = RunMetrics::new();
        let shared = metrics.clone();

        shared.inc(&shared.clips_detected);
        metrics.add(&metrics.frames_sampled, 5);

        let summary = metrics.summary();
        assert_eq!(summary.clips_detected, 1);
        assert_eq!(summary.frames_sampled, 5);
        assert_eq!(shared.summary().frames_sampled, 5);
    }
}
