//! Dashboard configuration
//!
//! Loaded from an optional JSON file, then overridden by CLI flags.

use std::path::{Path, PathBuf};
use std::time::Duration;
use serde::{Deserialize, Serialize};

use crate::types::{EngineError, ScoreScale, ThresholdConfig};
use crate::{DEFAULT_ENGINE_URL, DEFAULT_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS, MIN_POLL_INTERVAL_MS};

/// Everything the dashboard needs to run against one engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Engine base URL, e.g. `http://localhost:8000`
    pub engine_url: String,
    /// Status poll cadence (milliseconds)
    pub interval_ms: u64,
    /// Overlay thresholds and score scale
    pub threshold: ThresholdConfig,
    /// Drop responses that resolve after a newer one was applied
    pub strict_ordering: bool,
    /// Directory for session recordings, if any
    pub record_dir: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            engine_url: DEFAULT_ENGINE_URL.to_string(),
            interval_ms: DEFAULT_POLL_INTERVAL_MS,
            threshold: ThresholdConfig::default(),
            strict_ordering: false,
            record_dir: None,
        }
    }
}

impl DashboardConfig {
    /// Load from a JSON file; missing keys take defaults
    pub fn from_file(path: &Path) -> Result<Self, EngineError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Clamp the cadence and normalise the URL
    pub fn validated(mut self) -> Self {
        self.interval_ms = self.interval_ms.clamp(MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS);
        while self.engine_url.ends_with('/') {
            self.engine_url.pop();
        }
        if let Some(exit) = self.threshold.exit {
            if exit > self.threshold.enter {
                tracing::warn!(
                    "exit threshold {} above enter threshold {}; hysteresis disabled",
                    exit,
                    self.threshold.enter
                );
                self.threshold.exit = None;
            }
        }
        if self.threshold.enter > self.threshold.scale.full_scale() {
            tracing::warn!(
                "enter threshold {} is above the {} scale; the overlay will never show",
                self.threshold.enter,
                self.threshold.scale
            );
        }
        self
    }

    /// Switch scale; thresholds left at their defaults follow it
    pub fn with_scale(mut self, scale: ScoreScale) -> Self {
        self.threshold = self.threshold.rescaled(scale);
        self
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn stats_url(&self) -> String {
        format!("{}/stats", self.engine_url)
    }

    pub fn video_feed_url(&self) -> String {
        format!("{}/video_feed", self.engine_url)
    }

    pub fn upload_url(&self) -> String {
        format!("{}/upload_video", self.engine_url)
    }

    pub fn reset_camera_url(&self) -> String {
        format!("{}/reset_camera", self.engine_url)
    }
}
