//! Sentinel Dash: live view over a biometric trust-scoring engine
//!
//! Polls the engine's status endpoint, merges partial snapshots into a single
//! view-model and renders it to the terminal. Commands (upload, camera reset,
//! pause) go out to the engine independently of the polling loop.

pub mod core;
pub mod types;

// =============================================================================
// POLLING
// =============================================================================

/// Default status poll cadence (milliseconds)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 200;

/// Fastest poll cadence accepted from configuration (milliseconds)
pub const MIN_POLL_INTERVAL_MS: u64 = 100;

/// Slowest poll cadence accepted from configuration (milliseconds)
pub const MAX_POLL_INTERVAL_MS: u64 = 1000;

/// Per-request timeout for engine calls (milliseconds)
pub const REQUEST_TIMEOUT_MS: u64 = 2000;

/// Default engine base URL
pub const DEFAULT_ENGINE_URL: &str = "http://localhost:8000";

// =============================================================================
// DISPLAY
// =============================================================================

/// Number of trailing rPPG samples shown
pub const WAVEFORM_WINDOW: usize = 100;

/// "Verified" overlay threshold on the 0-100 scale
pub const VERIFIED_THRESHOLD_PERCENT: f64 = 98.0;

/// "Verified" overlay threshold on the 0.0-1.0 scale
pub const VERIFIED_THRESHOLD_UNIT: f64 = 0.98;

/// Trust bar turns green above this percentage
pub const TRUST_BAR_GOOD_PERCENT: f64 = 80.0;

/// How long an error toast stays on screen (milliseconds)
pub const TOAST_DURATION_MS: i64 = 4000;

// =============================================================================
// RECORDING
// =============================================================================

/// Minimum spacing between recorded snapshots (milliseconds)
pub const RECORD_INTERVAL_MS: i64 = 1000;

/// Scores at or below this fraction of full scale are not recorded
pub const RECORD_SCORE_FLOOR: f64 = 0.01;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
