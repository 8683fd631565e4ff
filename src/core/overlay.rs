//! "Verified" overlay logic
//!
//! Without an exit threshold the mode is `score >= enter`, re-evaluated on
//! every snapshot with no debouncing.

use crate::types::ThresholdConfig;

/// Plain threshold comparison
pub fn is_verified(score: f64, threshold: f64) -> bool {
    score >= threshold
}

/// Next overlay mode given the previous one
pub fn evaluate(config: &ThresholdConfig, score: f64, currently_verified: bool) -> bool {
    match config.exit {
        Some(exit) if currently_verified => score >= exit,
        _ => is_verified(score, config.enter),
    }
}
