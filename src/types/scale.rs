//! Score scale and overlay thresholds
//!
//! Engines publish the overall score either on 0-100 or on 0.0-1.0. The scale
//! is a deployment setting; it is never guessed from the values.

use serde::{Deserialize, Serialize};
use crate::{VERIFIED_THRESHOLD_PERCENT, VERIFIED_THRESHOLD_UNIT};

/// Numeric range of `trust_score`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ScoreScale {
    /// 0-100
    Percent,
    /// 0.0-1.0
    #[default]
    Unit,
}

impl ScoreScale {
    /// Upper end of the scale
    pub fn full_scale(&self) -> f64 {
        match self {
            ScoreScale::Percent => 100.0,
            ScoreScale::Unit => 1.0,
        }
    }

    /// Default "verified" threshold on this scale
    pub fn verified_threshold(&self) -> f64 {
        match self {
            ScoreScale::Percent => VERIFIED_THRESHOLD_PERCENT,
            ScoreScale::Unit => VERIFIED_THRESHOLD_UNIT,
        }
    }

    /// Convert a score on this scale to percent for display
    pub fn to_percent(&self, score: f64) -> f64 {
        score * 100.0 / self.full_scale()
    }
}

impl std::fmt::Display for ScoreScale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ScoreScale::Percent => "percent",
            ScoreScale::Unit => "unit",
        };
        write!(f, "{}", name)
    }
}

/// Thresholds for the "verified" overlay
///
/// With `exit` unset the overlay is a plain `score >= enter` comparison and
/// will flicker when the score oscillates around the threshold. Setting
/// `exit` below `enter` holds the overlay on until the score drops under it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireThreshold")]
pub struct ThresholdConfig {
    pub scale: ScoreScale,
    pub enter: f64,
    pub exit: Option<f64>,
}

/// Thresholds as written in a config file; `enter` follows the scale when omitted
#[derive(Deserialize)]
struct WireThreshold {
    #[serde(default)]
    scale: ScoreScale,
    #[serde(default)]
    enter: Option<f64>,
    #[serde(default)]
    exit: Option<f64>,
}

impl From<WireThreshold> for ThresholdConfig {
    fn from(wire: WireThreshold) -> Self {
        Self {
            scale: wire.scale,
            enter: wire.enter.unwrap_or_else(|| wire.scale.verified_threshold()),
            exit: wire.exit,
        }
    }
}

impl ThresholdConfig {
    /// Default threshold for a scale, no hysteresis
    pub fn for_scale(scale: ScoreScale) -> Self {
        Self {
            scale,
            enter: scale.verified_threshold(),
            exit: None,
        }
    }

    /// Move to another scale
    ///
    /// A custom `enter` is kept as written. Default thresholds follow the
    /// new scale, with `exit` rescaled alongside.
    pub fn rescaled(self, scale: ScoreScale) -> Self {
        if scale == self.scale || self.enter != self.scale.verified_threshold() {
            return Self { scale, ..self };
        }
        let factor = scale.full_scale() / self.scale.full_scale();
        Self {
            scale,
            enter: scale.verified_threshold(),
            exit: self.exit.map(|exit| exit * factor),
        }
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self::for_scale(ScoreScale::default())
    }
}
