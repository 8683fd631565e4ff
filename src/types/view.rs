//! Client-owned view-model
//!
//! Created with placeholder values when the dashboard mounts, replaced on
//! every applied snapshot and every user action, dropped on teardown.

use std::collections::BTreeMap;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::types::LAYER_KEYS;
use crate::TOAST_DURATION_MS;

/// Prompt shown before the first snapshot arrives
pub const PLACEHOLDER_PROMPT: &str = "INITIALIZING...";

/// Where the video panel takes its picture from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "url", rename_all = "snake_case")]
pub enum FeedSource {
    /// Continuous stream from the engine
    Live(String),
    /// Static placeholder while paused
    Frozen,
}

/// Transient user-visible message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toast {
    pub message: String,
    pub expires_at: DateTime<Utc>,
}

impl Toast {
    /// Toast that expires after the standard duration
    pub fn new(message: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            message: message.into(),
            expires_at: now + Duration::milliseconds(TOAST_DURATION_MS),
        }
    }

    /// Still on screen at `now`?
    pub fn is_visible(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Current merged, displayable state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewModel {
    // ---- engine fields ----
    pub trust_score: f64,
    pub layer: Option<String>,
    pub layer_scores: BTreeMap<String, f64>,
    pub confidence_interval: Option<[f64; 2]>,
    pub quality: Option<f64>,
    pub violated_rules: Vec<String>,
    pub prompt: String,
    pub rppg_wave: Vec<f64>,
    pub checks: BTreeMap<String, bool>,

    // ---- client-local fields ----
    pub is_paused: bool,
    pub is_uploading: bool,
    /// Overlay mode derived from the score on the last applied snapshot
    pub verified: bool,
    pub toast: Option<Toast>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl Default for ViewModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewModel {
    /// Placeholder state for first render
    pub fn new() -> Self {
        Self {
            trust_score: 0.0,
            layer: None,
            layer_scores: LAYER_KEYS.iter().map(|k| (k.to_string(), 0.0)).collect(),
            confidence_interval: None,
            quality: None,
            violated_rules: Vec::new(),
            prompt: PLACEHOLDER_PROMPT.to_string(),
            rppg_wave: Vec::new(),
            checks: BTreeMap::new(),
            is_paused: false,
            is_uploading: false,
            verified: false,
            toast: None,
            last_updated: None,
        }
    }

    /// Video source implied by the pause flag
    pub fn feed(&self, stream_url: &str) -> FeedSource {
        if self.is_paused {
            FeedSource::Frozen
        } else {
            FeedSource::Live(stream_url.to_string())
        }
    }

    /// Toast text if one is showing at `now`
    pub fn visible_toast(&self, now: DateTime<Utc>) -> Option<&str> {
        self.toast
            .as_ref()
            .filter(|t| t.is_visible(now))
            .map(|t| t.message.as_str())
    }
}
