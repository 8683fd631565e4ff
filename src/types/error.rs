//! Engine boundary errors
//!
//! None of these are fatal. Poll failures are logged and dropped, command
//! failures reset local flags and may raise a toast.

use thiserror::Error;

/// Failure talking to the scoring engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// Network unreachable, timeout, or non-2xx status
    #[error("transport error: {0}")]
    Transport(String),

    /// Body could not be parsed as a snapshot
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Upload or reset request failed
    #[error("{command} failed: {reason}")]
    Command { command: &'static str, reason: String },

    /// Local file access (upload source, recordings)
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "E101_TRANSPORT",
            Self::Decode(_) => "E102_DECODE",
            Self::Command { .. } => "E201_COMMAND",
            Self::Io(_) => "E301_IO",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Transport(_) => "Engine unreachable or returned an error status",
            Self::Decode(_) => "Engine returned a malformed snapshot",
            Self::Command { .. } => "Engine rejected a command",
            Self::Io(_) => "Local file access failed",
        }
    }

    /// Build a command failure
    pub fn command(command: &'static str, reason: impl Into<String>) -> Self {
        Self::Command {
            command,
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for EngineError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}
