//! Session recorder
//!
//! Appends the merged view-model as JSON lines, throttled to one line per
//! second and only while the score is above the floor.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::types::{EngineError, ScoreScale, ViewModel};
use crate::{RECORD_INTERVAL_MS, RECORD_SCORE_FLOOR};

/// One recorded line
#[derive(Debug, Serialize)]
struct RecordLine<'a> {
    recorded_at: DateTime<Utc>,
    #[serde(flatten)]
    view: &'a ViewModel,
}

/// Throttled JSON-lines writer
#[derive(Debug)]
pub struct SnapshotRecorder {
    path: PathBuf,
    file: File,
    floor: f64,
    last_written: Option<DateTime<Utc>>,
    lines: u64,
}

impl SnapshotRecorder {
    /// Open `<dir>/session_<timestamp>.jsonl`, creating the directory
    pub fn create(dir: &Path, scale: ScoreScale) -> Result<Self, EngineError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("session_{}.jsonl", Utc::now().format("%Y%m%dT%H%M%S")));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        tracing::info!("recording session to {}", path.display());
        Ok(Self {
            path,
            file,
            floor: RECORD_SCORE_FLOOR * scale.full_scale(),
            last_written: None,
            lines: 0,
        })
    }

    /// Write a line if the throttle and score floor allow; returns whether it wrote
    pub fn record(&mut self, view: &ViewModel, now: DateTime<Utc>) -> Result<bool, EngineError> {
        if view.trust_score <= self.floor {
            return Ok(false);
        }
        if let Some(last) = self.last_written {
            if now - last < Duration::milliseconds(RECORD_INTERVAL_MS) {
                return Ok(false);
            }
        }

        let line = serde_json::to_string(&RecordLine { recorded_at: now, view })?;
        writeln!(self.file, "{}", line)?;
        self.last_written = Some(now);
        self.lines += 1;
        Ok(true)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lines_written(&self) -> u64 {
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("sentinel_dash_{}_{}", name, std::process::id()))
    }

    #[test]
    fn test_skips_low_scores() {
        let dir = temp_dir("low");
        let mut rec = SnapshotRecorder::create(&dir, ScoreScale::Unit).unwrap();
        let vm = ViewModel::new();
        assert!(!rec.record(&vm, Utc::now()).unwrap());
        assert_eq!(rec.lines_written(), 0);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_throttles_to_one_per_second() {
        let dir = temp_dir("throttle");
        let mut rec = SnapshotRecorder::create(&dir, ScoreScale::Percent).unwrap();
        let mut vm = ViewModel::new();
        vm.trust_score = 50.0;
        let t0 = Utc::now();
        assert!(rec.record(&vm, t0).unwrap());
        assert!(!rec.record(&vm, t0 + Duration::milliseconds(400)).unwrap());
        assert!(rec.record(&vm, t0 + Duration::milliseconds(1000)).unwrap());

        let content = std::fs::read_to_string(rec.path()).unwrap();
        assert_eq!(content.lines().count(), 2);
        let first: serde_json::Value = serde_json::from_str(content.lines().next().unwrap()).unwrap();
        assert_eq!(first["trust_score"], 50.0);
        assert!(first["recorded_at"].is_string());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
