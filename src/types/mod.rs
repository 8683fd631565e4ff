//! Core types for Sentinel Dash

mod snapshot;
mod view;
mod scale;
mod checklist;
mod config;
mod error;

pub use snapshot::{Snapshot, LAYER_KEYS};
pub use view::{ViewModel, FeedSource, Toast, PLACEHOLDER_PROMPT};
pub use scale::{ScoreScale, ThresholdConfig};
pub use checklist::{ChecklistStep, ChecklistItem, VERIFICATION_STEPS};
pub use config::DashboardConfig;
pub use error::EngineError;
