//! Dashboard: single owner of the view-model
//!
//! Poll results and command completions are queued on one channel and applied
//! here, one at a time, so the view-model has exactly one writer even though
//! fetches run as independent tasks. Several fetches may be in flight at once;
//! they are applied in completion order unless strict ordering is enabled.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use chrono::Utc;
use tokio::sync::mpsc;

use crate::core::merger::merge;
use crate::core::overlay;
use crate::core::{ActionDispatcher, PollingController, SequenceGate, SnapshotFetcher, SnapshotRecorder};
use crate::types::{DashboardConfig, EngineError, FeedSource, Snapshot, Toast, ViewModel};

/// Something that happened outside the owner and must be applied
#[derive(Debug)]
pub enum DashboardEvent {
    /// A poll resolved; `seq` is its issue order
    Polled {
        seq: u64,
        result: Result<Snapshot, EngineError>,
    },
    /// An upload finished
    UploadFinished(Result<(), EngineError>),
}

/// User command parsed from an input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    TogglePause,
    Upload(PathBuf),
    ResetCamera,
    Quit,
}

impl Command {
    /// Parse `p`, `u <file>`, `r`, `q` (long forms accepted)
    pub fn parse(line: &str) -> Option<Command> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((h, r)) => (h, r.trim()),
            None => (line, ""),
        };
        match head.to_ascii_lowercase().as_str() {
            "p" | "pause" | "resume" => Some(Command::TogglePause),
            "u" | "upload" if !rest.is_empty() => Some(Command::Upload(PathBuf::from(rest))),
            "r" | "reset" => Some(Command::ResetCamera),
            "q" | "quit" | "exit" => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Owns polling, commands and the view-model for one engine
#[derive(Debug)]
pub struct Dashboard {
    config: DashboardConfig,
    view: ViewModel,
    poller: PollingController,
    fetcher: SnapshotFetcher,
    dispatcher: ActionDispatcher,
    gate: SequenceGate,
    issued: Arc<AtomicU64>,
    events_tx: mpsc::UnboundedSender<DashboardEvent>,
    events_rx: mpsc::UnboundedReceiver<DashboardEvent>,
    recorder: Option<SnapshotRecorder>,
    failed_polls: u64,
}

impl Dashboard {
    /// Create a dashboard with its own HTTP client
    pub fn new(config: DashboardConfig) -> Result<Self, EngineError> {
        let http = crate::core::fetcher::http_client()?;
        Self::with_client(config, http)
    }

    /// Create a dashboard on an existing HTTP client
    pub fn with_client(config: DashboardConfig, http: reqwest::Client) -> Result<Self, EngineError> {
        let config = config.validated();
        let recorder = match &config.record_dir {
            Some(dir) => Some(SnapshotRecorder::create(dir, config.threshold.scale)?),
            None => None,
        };
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Ok(Self {
            fetcher: SnapshotFetcher::new(http.clone(), config.stats_url()),
            dispatcher: ActionDispatcher::new(http, config.upload_url(), config.reset_camera_url()),
            gate: SequenceGate::new(config.strict_ordering),
            view: ViewModel::new(),
            poller: PollingController::new(),
            issued: Arc::new(AtomicU64::new(0)),
            events_tx,
            events_rx,
            recorder,
            failed_polls: 0,
            config,
        })
    }

    /// Start polling; call once the dashboard is on screen
    pub fn mount(&mut self) {
        let fetcher = self.fetcher.clone();
        let tx = self.events_tx.clone();
        let issued = self.issued.clone();

        self.poller.start(self.config.interval(), move || {
            let seq = issued.fetch_add(1, Ordering::SeqCst) + 1;
            let fetcher = fetcher.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = fetcher.fetch().await;
                // Receiver gone means the dashboard was torn down
                let _ = tx.send(DashboardEvent::Polled { seq, result });
            });
        });
        self.view.is_paused = false;
        tracing::info!("polling {} every {} ms", self.fetcher.url(), self.config.interval_ms);
    }

    /// Stop polling for good
    pub fn unmount(&mut self) {
        self.poller.stop();
        tracing::info!("polling stopped");
    }

    /// Wait for the next queued event
    pub async fn next_event(&mut self) -> Option<DashboardEvent> {
        self.events_rx.recv().await
    }

    /// Apply one event; returns true when the view-model changed
    pub fn apply(&mut self, event: DashboardEvent) -> bool {
        match event {
            DashboardEvent::Polled { seq, result: Ok(snapshot) } => self.apply_snapshot(seq, &snapshot),
            DashboardEvent::Polled { seq, result: Err(e) } => {
                self.failed_polls += 1;
                tracing::warn!("[{}] poll #{} failed: {} ({})", e.code(), seq, e.description(), e);
                false
            }
            DashboardEvent::UploadFinished(result) => {
                self.view.is_uploading = false;
                match result {
                    Ok(()) => tracing::info!("upload accepted"),
                    Err(e) => {
                        tracing::warn!("[{}] {}: {}", e.code(), e.description(), e);
                        self.view.toast = Some(Toast::new(format!("Upload failed: {}", e), Utc::now()));
                    }
                }
                true
            }
        }
    }

    /// Merge a snapshot and refresh derived overlay state
    ///
    /// Returns false when the poll was gated out or left every field as it was.
    /// `last_updated` moves on either way once the poll is admitted.
    pub fn apply_snapshot(&mut self, seq: u64, snapshot: &Snapshot) -> bool {
        if !self.gate.admit(seq) {
            tracing::debug!("dropping stale poll #{} (last applied #{})", seq, self.gate.last_applied());
            return false;
        }

        let mut next = merge(&self.view, snapshot);
        next.verified = overlay::evaluate(&self.config.threshold, next.trust_score, self.view.verified);
        if next.verified != self.view.verified {
            tracing::info!("verified overlay {}", if next.verified { "on" } else { "off" });
        }
        let changed = next != self.view;
        let now = Utc::now();
        next.last_updated = Some(now);
        self.view = next;

        if let Some(recorder) = self.recorder.as_mut() {
            if let Err(e) = recorder.record(&self.view, now) {
                tracing::warn!("[{}] recording failed: {}", e.code(), e);
            }
        }
        changed
    }

    /// Pause or resume: polling and the feed source switch together
    pub fn set_paused(&mut self, paused: bool) {
        if paused == self.view.is_paused {
            return;
        }
        if paused {
            self.poller.pause();
        } else {
            self.poller.resume();
        }
        self.view.is_paused = paused;
        tracing::info!("{}", if paused { "scan paused" } else { "scan resumed" });
    }

    /// Start an upload in the background; completion arrives as an event
    pub fn upload_video(&mut self, path: PathBuf) {
        if self.view.is_uploading {
            tracing::warn!("upload already in progress, ignoring {}", path.display());
            return;
        }
        self.view.is_uploading = true;
        let dispatcher = self.dispatcher.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = dispatcher.upload_video(&path).await;
            let _ = tx.send(DashboardEvent::UploadFinished(result));
        });
    }

    /// Fire-and-forget camera reset
    pub fn reset_camera(&self) {
        self.dispatcher.reset_camera();
    }

    /// Run a user command; returns false on quit
    pub fn handle_command(&mut self, command: Command) -> bool {
        match command {
            Command::TogglePause => self.set_paused(!self.view.is_paused),
            Command::Upload(path) => self.upload_video(path),
            Command::ResetCamera => self.reset_camera(),
            Command::Quit => return false,
        }
        true
    }

    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn feed(&self) -> FeedSource {
        self.view.feed(&self.config.video_feed_url())
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_active()
    }

    /// Polls issued so far
    pub fn polls_issued(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    pub fn failed_polls(&self) -> u64 {
        self.failed_polls
    }
}
