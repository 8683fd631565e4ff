//! Polling controller
//!
//! Owns at most one interval timer. Each tick calls `on_tick`, which must not
//! block: it is expected to spawn the actual fetch. Stopping or pausing
//! cancels the timer only; fetches already in flight still complete.
//!
//! Dropping the controller aborts the timer, so a torn-down dashboard can
//! never receive new ticks.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Tick callback shared between restarts
pub type TickFn = Arc<dyn Fn() + Send + Sync>;

/// Interval-driven tick source with pause/resume
pub struct PollingController {
    interval: Duration,
    on_tick: Option<TickFn>,
    timer: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for PollingController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollingController")
            .field("interval", &self.interval)
            .field("active", &self.is_active())
            .finish()
    }
}

impl Default for PollingController {
    fn default() -> Self {
        Self::new()
    }
}

impl PollingController {
    pub fn new() -> Self {
        Self {
            interval: Duration::from_millis(crate::DEFAULT_POLL_INTERVAL_MS),
            on_tick: None,
            timer: None,
        }
    }

    /// Begin ticking every `interval`, replacing any running timer
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F>(&mut self, interval: Duration, on_tick: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.stop();
        self.interval = interval;
        self.on_tick = Some(Arc::new(on_tick));
        self.spawn_timer();
    }

    /// Cancel the timer and forget the callback
    pub fn stop(&mut self) {
        self.cancel_timer();
        self.on_tick = None;
    }

    /// Cancel the timer but keep the callback for `resume`
    pub fn pause(&mut self) {
        self.cancel_timer();
    }

    /// Restart the timer with the last callback; no-op if never started
    pub fn resume(&mut self) {
        if self.timer.is_none() {
            self.spawn_timer();
        }
    }

    /// Is a timer currently scheduled?
    pub fn is_active(&self) -> bool {
        self.timer.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    fn spawn_timer(&mut self) {
        let Some(on_tick) = self.on_tick.clone() else {
            return;
        };
        let period = self.interval;
        tracing::debug!("poll timer started ({} ms)", period.as_millis());

        self.timer = Some(tokio::spawn(async move {
            // First tick fires one period after start, like a browser interval
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                on_tick();
            }
        }));
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
            tracing::debug!("poll timer cancelled");
        }
    }
}

impl Drop for PollingController {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}
