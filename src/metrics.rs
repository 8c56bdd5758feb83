// Performance metrics module
//
// Provides lightweight metrics tracking for monitoring engine behavior

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Session engine metrics
///
/// Uses atomic operations for thread-safe metric tracking without locks.
/// Each [`SessionManager`](crate::state::SessionManager) owns its own
/// instance - there is no process-wide metrics singleton - so concurrent
/// sessions never mix their counters. Metrics can be logged on shutdown
/// for analysis.
#[derive(Debug)]
pub struct Metrics {
    /// Sessions constructed
    pub sessions_started: AtomicUsize,

    /// Sessions finalized through a user submit
    pub sessions_submitted: AtomicUsize,

    /// Sessions finalized by countdown expiry
    pub sessions_expired: AtomicUsize,

    /// Sessions discarded without a result
    pub sessions_abandoned: AtomicUsize,

    /// Number of state updates performed
    pub state_updates: AtomicU64,

    /// Number of event broadcasts sent
    pub event_broadcasts: AtomicU64,

    /// Number of event broadcast errors (no subscribers or channel closed)
    pub event_broadcast_errors: AtomicU64,

    /// Countdown ticks processed
    pub timer_ticks: AtomicU64,

    /// Metrics creation time
    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            sessions_started: AtomicUsize::new(0),
            sessions_submitted: AtomicUsize::new(0),
            sessions_expired: AtomicUsize::new(0),
            sessions_abandoned: AtomicUsize::new(0),
            state_updates: AtomicU64::new(0),
            event_broadcasts: AtomicU64::new(0),
            event_broadcast_errors: AtomicU64::new(0),
            timer_ticks: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_session_started(&self) {
        self.sessions_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_session_submitted(&self) {
        self.sessions_submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_session_expired(&self) {
        self.sessions_expired.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_session_abandoned(&self) {
        self.sessions_abandoned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_state_update(&self) {
        self.state_updates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_event_broadcast(&self) {
        self.event_broadcasts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_event_broadcast_error(&self) {
        self.event_broadcast_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_timer_tick(&self) {
        self.timer_ticks.fetch_add(1, Ordering::Relaxed);
    }

    /// Time since this metrics instance was created
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Log metrics summary
    pub fn log_summary(&self) {
        tracing::info!("=== Session Metrics Summary ===");
        tracing::info!("Uptime: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Sessions: {} started, {} submitted, {} expired, {} abandoned",
            self.sessions_started.load(Ordering::Relaxed),
            self.sessions_submitted.load(Ordering::Relaxed),
            self.sessions_expired.load(Ordering::Relaxed),
            self.sessions_abandoned.load(Ordering::Relaxed)
        );
        tracing::info!(
            "State updates: {}, broadcasts: {}, broadcast errors: {}, timer ticks: {}",
            self.state_updates.load(Ordering::Relaxed),
            self.event_broadcasts.load(Ordering::Relaxed),
            self.event_broadcast_errors.load(Ordering::Relaxed),
            self.timer_ticks.load(Ordering::Relaxed)
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
