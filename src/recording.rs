// src/recording.rs
//
// Pose recordings on disk (JSON) and the analysis reports written back.

use crate::analysis::PaceReading;
use crate::types::{ActionClip, ClipSummary, InputConfig, Pose, SpeedConfig, SpeedEstimate};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;
use walkdir::WalkDir;

// ============================================================================
// RECORDING FORMAT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    pub timestamp: f64,
    /// None when pose detection failed for this frame
    #[serde(default)]
    pub landmarks: Option<Pose>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recording {
    #[serde(default)]
    pub name: Option<String>,
    /// Capture rate of the recording itself, when known
    #[serde(default)]
    pub fps: Option<f64>,
    pub frames: Vec<RecordedFrame>,
}

impl Recording {
    pub fn from_json(contents: &str) -> Result<Self> {
        let recording: Recording = serde_json::from_str(contents)?;
        recording.validate()?;
        Ok(recording)
    }

    fn validate(&self) -> Result<()> {
        for (idx, pair) in self.frames.windows(2).enumerate() {
            if !(pair[1].timestamp >= pair[0].timestamp) {
                anyhow::bail!(
                    "Frame {} timestamp {:.3}s precedes frame {} at {:.3}s",
                    idx + 1,
                    pair[1].timestamp,
                    idx,
                    pair[0].timestamp
                );
            }
        }
        Ok(())
    }

    pub fn duration_s(&self) -> f64 {
        self.frames.last().map_or(0.0, |f| f.timestamp)
    }

    pub fn frames_with_pose(&self) -> usize {
        self.frames.iter().filter(|f| f.landmarks.is_some()).count()
    }

    /// `base` with the recording's own capture rate as the fps hint, when
    /// it declares a usable one
    pub fn speed_config(&self, base: &SpeedConfig) -> SpeedConfig {
        match self.fps.filter(|fps| *fps > 0.0 && fps.is_finite()) {
            Some(fps) => SpeedConfig {
                fps_hint: fps,
                ..base.clone()
            },
            None => base.clone(),
        }
    }
}

// ============================================================================
// REPORT
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub report_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub recording: String,
    pub frames_analyzed: usize,
    pub clips: Vec<ActionClip>,
    pub summary: ClipSummary,
    pub speed: Option<SpeedEstimate>,
    pub pace: Option<PaceReading>,
}

impl AnalysisReport {
    pub fn new(
        recording: impl Into<String>,
        frames_analyzed: usize,
        clips: Vec<ActionClip>,
        summary: ClipSummary,
        speed: Option<SpeedEstimate>,
        pace: Option<PaceReading>,
    ) -> Self {
        Self {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            recording: recording.into(),
            frames_analyzed,
            clips,
            summary,
            speed,
            pace,
        }
    }
}

// ============================================================================
// LOADER
// ============================================================================

pub struct RecordingLoader {
    config: InputConfig,
}

impl RecordingLoader {
    pub fn new(config: InputConfig) -> Self {
        Self { config }
    }

    pub fn find_recording_files(&self) -> Result<Vec<PathBuf>> {
        let mut recordings: Vec<PathBuf> = WalkDir::new(&self.config.input_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
            })
            .collect();

        recordings.sort();
        info!(
            "Found {} recording(s) in {}",
            recordings.len(),
            self.config.input_dir
        );
        Ok(recordings)
    }

    pub fn load_recording(&self, path: &Path) -> Result<Recording> {
        debug!("Loading recording: {}", path.display());

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read recording {}", path.display()))?;
        let recording = Recording::from_json(&contents)
            .with_context(|| format!("Invalid recording {}", path.display()))?;

        info!(
            "Recording {}: {} frames ({} with pose) over {:.1}s",
            path.display(),
            recording.frames.len(),
            recording.frames_with_pose(),
            recording.duration_s()
        );
        Ok(recording)
    }

    /// Writes `<output_dir>/<stem>_analysis.json`, or nothing when reports
    /// are disabled
    pub fn save_report(&self, input_path: &Path, report: &AnalysisReport) -> Result<Option<PathBuf>> {
        if !self.config.save_reports {
            return Ok(None);
        }

        fs::create_dir_all(&self.config.output_dir)
            .with_context(|| format!("Failed to create {}", self.config.output_dir))?;

        let stem = input_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("recording");
        let output_path =
            PathBuf::from(&self.config.output_dir).join(format!("{}_analysis.json", stem));

        let json = serde_json::to_string_pretty(report)?;
        fs::write(&output_path, json)
            .with_context(|| format!("Failed to write report {}", output_path.display()))?;

        info!("Report saved: {}", output_path.display());
        Ok(Some(output_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cricket_motion_{}_{}", name, Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn loader_for(dir: &Path, save_reports: bool) -> RecordingLoader {
        RecordingLoader::new(InputConfig {
            input_dir: dir.to_string_lossy().into_owned(),
            output_dir: dir.join("out").to_string_lossy().into_owned(),
            save_reports,
        })
    }

    const SAMPLE: &str = r#"{
        "name": "nets session",
        "fps": 30,
        "frames": [
            {"timestamp": 0.0, "landmarks": [null, {"x": 0.5, "y": 0.5}]},
            {"timestamp": 0.033, "landmarks": null},
            {"timestamp": 0.066}
        ]
    }"#;

    #[test]
    fn test_parses_recording_with_detection_gaps() {
        let recording = Recording::from_json(SAMPLE).unwrap();
        assert_eq!(recording.name.as_deref(), Some("nets session"));
        assert_eq!(recording.fps, Some(30.0));
        assert_eq!(recording.frames.len(), 3);
        assert_eq!(recording.frames_with_pose(), 1);
        assert!((recording.duration_s() - 0.066).abs() < 1e-12);
    }

    #[test]
    fn test_declared_fps_becomes_speed_hint() {
        let base = SpeedConfig::default();

        let recording = Recording::from_json(SAMPLE).unwrap();
        let speed = recording.speed_config(&base);
        assert_eq!(speed.fps_hint, 30.0);
        assert_eq!(speed.pitch_length_m, base.pitch_length_m);

        let json = r#"{"fps": 60, "frames": []}"#;
        assert_eq!(Recording::from_json(json).unwrap().speed_config(&base).fps_hint, 60.0);

        let undeclared = Recording::from_json(r#"{"frames": []}"#).unwrap();
        assert_eq!(undeclared.speed_config(&base).fps_hint, base.fps_hint);

        let bogus = Recording::from_json(r#"{"fps": 0, "frames": []}"#).unwrap();
        assert_eq!(bogus.speed_config(&base).fps_hint, base.fps_hint);
    }

    #[test]
    fn test_rejects_out_of_order_timestamps() {
        let json = r#"{"frames": [{"timestamp": 1.0}, {"timestamp": 0.5}]}"#;
        let err = Recording::from_json(json).unwrap_err();
        assert!(err.to_string().contains("precedes"));
    }

    #[test]
    fn test_finds_json_recordings_recursively() {
        let dir = scratch_dir("find");
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("b.json"), SAMPLE).unwrap();
        fs::write(dir.join("nested").join("a.JSON"), SAMPLE).unwrap();
        fs::write(dir.join("notes.txt"), "ignore me").unwrap();

        let files = loader_for(&dir, false).find_recording_files().unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|p| p
            .extension()
            .unwrap()
            .to_string_lossy()
            .eq_ignore_ascii_case("json")));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_and_save_report() {
        let dir = scratch_dir("report");
        let input = dir.join("session.json");
        fs::write(&input, SAMPLE).unwrap();

        let loader = loader_for(&dir, true);
        let recording = loader.load_recording(&input).unwrap();
        let report = AnalysisReport::new(
            "session",
            recording.frames.len(),
            Vec::new(),
            ClipSummary::default(),
            None,
            None,
        );

        let saved = loader.save_report(&input, &report).unwrap().unwrap();
        assert!(saved.ends_with("session_analysis.json"));

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&saved).unwrap()).unwrap();
        assert_eq!(written["recording"], "session");
        assert_eq!(written["summary"]["clip_count"], 0);
        assert!(written["speed"].is_null());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_reports_disabled_writes_nothing() {
        let dir = scratch_dir("disabled");
        let loader = loader_for(&dir, false);
        let report = AnalysisReport::new("x", 0, Vec::new(), ClipSummary::default(), None, None);

        assert!(loader.save_report(&dir.join("x.json"), &report).unwrap().is_none());
        assert!(!dir.join("out").exists());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_file_reports_path() {
        let loader = loader_for(&std::env::temp_dir(), false);
        let err = loader
            .load_recording(Path::new("/nonexistent/cricket.json"))
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/cricket.json"));
    }
}
