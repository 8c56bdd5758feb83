//! The countdown task for a quiz session.
//!
//! One background tokio task per session decrements the remaining time once
//! per period and forces submission when it crosses zero. Stopping is
//! cooperative: the session's watch channel is checked before every tick,
//! and the tick itself re-checks the finalized flag, so the task never
//! fires after a stop and never expires a session twice even when a stop
//! races an in-flight tick.

use crate::state::{SessionManager, TickOutcome};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Handle to a running countdown task.
///
/// The task ends on its own when the session finalizes (submit, expiry, or
/// abandon all flip the session's cancellation channel); dropping this
/// handle does not stop it.
pub struct CountdownTimer {
    handle: JoinHandle<()>,
}

impl CountdownTimer {
    /// Start the countdown for `session`, ticking once per second.
    pub fn start(runtime: &Handle, session: SessionManager) -> Self {
        Self::start_with_period(runtime, session, Duration::from_secs(1))
    }

    /// Start the countdown with an explicit tick period.
    ///
    /// Production callers use [`start`](Self::start); the injectable period
    /// exists so tests can drive the countdown under paused tokio time.
    pub fn start_with_period(
        runtime: &Handle,
        session: SessionManager,
        period: Duration,
    ) -> Self {
        let mut cancel_rx = session.cancel_receiver();

        let handle = runtime.spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first interval tick completes immediately; consume it so
            // the countdown starts one full period after spawn.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if *cancel_rx.borrow() {
                            tracing::debug!("Countdown stopped before tick");
                            break;
                        }
                        match session.tick() {
                            TickOutcome::Continue => {}
                            TickOutcome::Expired => {
                                session.expire();
                                break;
                            }
                            TickOutcome::Stopped => {
                                tracing::debug!("Countdown observed finalized session");
                                break;
                            }
                        }
                    }
                    _ = cancel_rx.changed() => {
                        tracing::debug!("Countdown cancelled");
                        break;
                    }
                }
            }
        });

        Self { handle }
    }

    /// Whether the countdown task has exited
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the countdown task to exit
    pub async fn join(self) {
        // Join errors only occur on panic or abort; neither is recoverable here
        let _ = self.handle.await;
    }
}
