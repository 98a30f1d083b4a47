// src/pipeline/mod.rs

pub mod batch_sampler;
pub mod live_monitor;
pub mod metrics;

pub use batch_sampler::{
    collect_frames, sample_timestamps, BatchOutcome, LandmarkSource, RecordedSource, StopSignal,
};
pub use live_monitor::{LiveMotionMonitor, LiveReading};
pub use metrics::{MetricsSummary, RunMetrics};
