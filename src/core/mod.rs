//! Core modules for Sentinel Dash

pub mod fetcher;
pub mod poller;
pub mod merger;
pub mod waveform;
pub mod checklist;
pub mod overlay;
pub mod dispatcher;
pub mod sequence;
pub mod recorder;
pub mod render;
pub mod dashboard;
pub mod sim_engine;

pub use fetcher::{SnapshotFetcher, http_client};
pub use poller::PollingController;
pub use merger::merge;
pub use waveform::Waveform;
pub use checklist::verification_checklist;
pub use dispatcher::ActionDispatcher;
pub use sequence::SequenceGate;
pub use recorder::SnapshotRecorder;
pub use render::{render, frame, RenderContext};
pub use dashboard::{Dashboard, DashboardEvent, Command};
pub use sim_engine::{create_router, run_server};
