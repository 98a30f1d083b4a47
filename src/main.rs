// src/main.rs

use anyhow::Result;
use cricket_motion::analysis::{classify_pace, ClipSegmenter, SpeedEstimator};
use cricket_motion::pipeline::{
    collect_frames, BatchOutcome, LiveMotionMonitor, RecordedSource, RunMetrics, StopSignal,
};
use cricket_motion::recording::{AnalysisReport, Recording, RecordingLoader};
use cricket_motion::types::Config;
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

struct RecordingStats {
    frames_recorded: usize,
    frames_analyzed: usize,
    clips_detected: usize,
    active_duration: f64,
    dead_time: f64,
    speed_kph: Option<f32>,
    pace_label: Option<&'static str>,
    live_active_frames: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config_path =
        std::env::var("CRICKET_MOTION_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let loaded = if Path::new(&config_path).exists() {
        Some(Config::load(&config_path)?)
    } else {
        None
    };
    let config = loaded.clone().unwrap_or_default();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🏏 Cricket motion analysis starting");
    match loaded {
        Some(_) => info!("✓ Configuration loaded from {}", config_path),
        None => warn!("{} not found, using built-in defaults", config_path),
    }
    info!(
        "Segmentation: threshold={:.3}, min_clip={:.2}s, merge_padding={:.2}s | sampling {:.1} fps",
        config.segmentation.motion_threshold,
        config.segmentation.min_clip_duration_s,
        config.segmentation.merge_padding_s,
        config.sampling.sample_fps
    );

    let stop = StopSignal::new();
    {
        let stop = stop.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, stopping after the current frame");
                stop.stop();
            }
        });
    }

    let loader = RecordingLoader::new(config.input.clone());
    let recordings = loader.find_recording_files()?;

    if recordings.is_empty() {
        error!("No recordings found in {}", config.input.input_dir);
        return Ok(());
    }

    let metrics = RunMetrics::new();

    for (idx, path) in recordings.iter().enumerate() {
        if stop.is_stopped() {
            break;
        }

        info!(
            "Processing recording {}/{}: {}",
            idx + 1,
            recordings.len(),
            path.display()
        );

        match process_recording(path, &loader, &config, &metrics, &stop).await {
            Ok(Some(stats)) => {
                metrics.inc(&metrics.recordings);
                info!("✓ Recording analyzed");
                info!(
                    "  Frames: {} recorded, {} analyzed",
                    stats.frames_recorded, stats.frames_analyzed
                );
                info!(
                    "  Action clips: {} ({:.0}s active, {:.0}s dead time)",
                    stats.clips_detected, stats.active_duration, stats.dead_time
                );
                match (stats.speed_kph, stats.pace_label) {
                    (Some(kph), Some(pace)) => info!("  Ball speed: {:.0} km/h ({})", kph, pace),
                    _ => info!("  Ball speed: insufficient signal"),
                }
                if config.live.enabled {
                    info!("  Live replay active frames: {}", stats.live_active_frames);
                }
            }
            Ok(None) => warn!("Analysis of {} cancelled", path.display()),
            Err(e) => error!("Failed to process recording: {:#}", e),
        }
    }

    let summary = metrics.summary();
    info!(
        "Run complete: {} recording(s), {} frames sampled ({} dropped), {} clips, {} speed estimates in {:.1}s",
        summary.recordings,
        summary.frames_sampled,
        summary.frames_dropped,
        summary.clips_detected,
        summary.speed_estimates,
        summary.elapsed_secs
    );

    Ok(())
}

/// Ok(None) when the run was stopped before sampling finished
async fn process_recording(
    path: &Path,
    loader: &RecordingLoader,
    config: &Config,
    metrics: &RunMetrics,
    stop: &StopSignal,
) -> Result<Option<RecordingStats>> {
    let recording = loader.load_recording(path)?;
    let frames_recorded = recording.frames.len();
    let speed_config = recording.speed_config(&config.speed);

    let live_active_frames = if config.live.enabled {
        replay_live(&recording, config.live.motion_threshold, stop)
    } else {
        0
    };

    let mut source = RecordedSource::new(recording.frames);
    let frames = match collect_frames(&mut source, config.sampling.sample_fps, stop, metrics).await? {
        BatchOutcome::Complete(frames) => frames,
        BatchOutcome::Cancelled { frames_discarded } => {
            debug!("Discarded {} partially sampled frames", frames_discarded);
            return Ok(None);
        }
    };

    let clips = ClipSegmenter::new(config.segmentation.clone()).segment(&frames);
    metrics.add(&metrics.clips_detected, clips.len() as u64);
    for clip in &clips {
        debug!(
            "  {:>6.2}s - {:>6.2}s  {:<9} {:.2}  {}",
            clip.start_time,
            clip.end_time,
            clip.action.as_str(),
            clip.confidence,
            clip.label
        );
    }

    let summary = cricket_motion::get_clip_summary(&clips);

    let speed = SpeedEstimator::new(speed_config).estimate(&frames);
    let pace = speed.as_ref().map(|s| classify_pace(s.speed_kph));
    if let Some(estimate) = &speed {
        metrics.inc(&metrics.speed_estimates);
        debug!(
            "Speed {:.0} km/h / {:.0} mph ({} confidence, {})",
            estimate.speed_kph,
            estimate.speed_mph,
            estimate.confidence.as_str(),
            estimate.method
        );
    }

    let stats = RecordingStats {
        frames_recorded,
        frames_analyzed: frames.len(),
        clips_detected: clips.len(),
        active_duration: summary.active_duration,
        dead_time: summary.dead_time,
        speed_kph: speed.as_ref().map(|s| s.speed_kph),
        pace_label: pace.map(|p| p.label),
        live_active_frames,
    };

    let name = recording_name(path, recording.name.as_deref());
    let report = AnalysisReport::new(name, frames.len(), clips, summary, speed, pace);
    loader.save_report(path, &report)?;

    Ok(Some(stats))
}

/// Feed every recorded frame through the live monitor, as a camera would
fn replay_live(recording: &Recording, threshold: f32, stop: &StopSignal) -> usize {
    let mut monitor = LiveMotionMonitor::with_stop_signal(threshold, stop.clone());
    let mut active_frames = 0;
    let mut was_active = false;

    for frame in &recording.frames {
        if monitor.is_stopped() {
            break;
        }
        let Some(reading) = monitor.push(frame.timestamp, frame.landmarks.clone()) else {
            continue;
        };
        if reading.active {
            active_frames += 1;
        }
        if reading.active != was_active {
            debug!(
                "Live: motion {} at {:.2}s (score {:.4})",
                if reading.active { "started" } else { "stopped" },
                reading.timestamp,
                reading.motion_score
            );
            was_active = reading.active;
        }
    }

    active_frames
}

fn recording_name(path: &Path, declared: Option<&str>) -> String {
    declared
        .map(str::to_string)
        .or_else(|| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "recording".to_string())
}
