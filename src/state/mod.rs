// Session state machine module
//
// This module provides the SessionManager which wraps SessionState with
// thread-safe access using Arc<RwLock<T>> and emits session events for
// observers. Finalization (submit or timer expiry) is serialized through a
// single atomic flag so a result is produced exactly once per session.

use crate::metrics::Metrics;
use crate::models::question::{QuestionSet, QuestionSetError, RawQuestion};
use crate::models::session::{SessionResult, SessionState, SessionStatus, UNANSWERED};
use crate::services::scoring::compute_result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tokio::sync::{broadcast, watch};

/// Events emitted when a session changes
///
/// These events are emitted to notify interested parties (primarily the UI
/// driver) about session changes without requiring them to poll the state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// The focused question changed
    FocusChanged { index: usize },

    /// An answer was recorded for a question
    AnswerRecorded { index: usize },

    /// The countdown decremented
    TimeRemainingChanged { seconds: u32 },

    /// Submission was rejected; `missing` holds 1-based question numbers
    SubmissionRejected { missing: Vec<usize> },

    /// The countdown reached zero and forced submission
    TimerExpired,

    /// The session finalized and entered review mode
    SessionFinalized { score: usize, total: usize },

    /// Review walked past the last question; the caller should tear down
    SessionEnded,

    /// The session was discarded without producing a result
    SessionAbandoned,
}

/// Errors raised by session operations
///
/// Every operation is total over its preconditions: an invalid call fails
/// with one of these conditions and leaves the session unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid question set: {0}")]
    InvalidQuestionSet(#[from] QuestionSetError),

    #[error("questions not answered: {0:?}")]
    IncompleteAnswers(Vec<usize>),

    #[error("focus index {index} out of range for {len} questions")]
    InvalidFocusIndex { index: usize, len: usize },

    #[error("option {0:?} is not one of the current question's options")]
    InvalidOption(String),

    #[error("session is not active")]
    SessionNotActive,
}

/// What a countdown tick observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Time was decremented; the countdown continues
    Continue,
    /// This tick crossed to zero; the caller must invoke [`SessionManager::expire`]
    Expired,
    /// The session is no longer active; the caller should stop ticking
    Stopped,
}

/// Thread-safe quiz session state machine
///
/// This is the central component of the engine:
/// - Provides thread-safe access to [`SessionState`] via `Arc<RwLock<T>>`
/// - Emits [`SessionEvent`]s on a tokio broadcast channel
/// - Owns the answer ledger and the countdown cancellation channel
/// - Serializes `submit()` and `expire()` through an atomic finalized flag
///
/// # Usage
///
/// Construct one manager per quiz attempt, hand a clone to
/// [`CountdownTimer::start`](crate::services::timer::CountdownTimer::start),
/// and drive it with the navigation and answer operations. Cloning shares
/// the underlying session; there are no process-wide singletons, so any
/// number of sessions can coexist.
///
/// # Related Types
///
/// - [`crate::models::SessionState`]: the underlying state structure
/// - [`SessionEvent`]: event types emitted on mutations
/// - [`crate::services::timer::CountdownTimer`]: the ticking task
/// - [`crate::services::scoring::compute_result`]: the result reporter
pub struct SessionManager {
    /// Questions for this session, shared read-only
    questions: Arc<QuestionSet>,

    /// The session state protected by RwLock for thread-safe access
    state: Arc<RwLock<SessionState>>,

    /// Broadcast channel for emitting session events
    event_tx: broadcast::Sender<SessionEvent>,

    /// Cooperative stop signal for the countdown task
    cancel_tx: Arc<watch::Sender<bool>>,

    /// Set exactly once, by whichever of submit/expire/abandon wins
    finalized: Arc<AtomicBool>,

    /// Guards the one-shot SessionAbandoned emission
    abandoned: Arc<AtomicBool>,

    metrics: Arc<Metrics>,
}

impl SessionManager {
    /// Create a session over a validated question set.
    ///
    /// The session starts in `Active` state with the full time limit and an
    /// empty answer ledger. The countdown does not run until a
    /// [`CountdownTimer`](crate::services::timer::CountdownTimer) is started
    /// with a clone of this manager.
    pub fn new(questions: QuestionSet, time_limit_secs: u32) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        let (cancel_tx, _) = watch::channel(false);
        let state = SessionState::new(questions.len(), time_limit_secs);
        let metrics = Arc::new(Metrics::new());
        metrics.record_session_started();

        tracing::info!(
            "Session created: {} questions, {}s time limit",
            questions.len(),
            time_limit_secs
        );

        Self {
            questions: Arc::new(questions),
            state: Arc::new(RwLock::new(state)),
            event_tx,
            cancel_tx: Arc::new(cancel_tx),
            finalized: Arc::new(AtomicBool::new(false)),
            abandoned: Arc::new(AtomicBool::new(false)),
            metrics,
        }
    }

    /// Validate raw fetched questions and create a session from them.
    ///
    /// Malformed input is rejected with [`SessionError::InvalidQuestionSet`]
    /// and no session object is produced.
    pub fn from_raw(raw: Vec<RawQuestion>, time_limit_secs: u32) -> Result<Self, SessionError> {
        let questions = QuestionSet::from_raw(raw)?;
        Ok(Self::new(questions, time_limit_secs))
    }

    /// Get a read-only snapshot of the current session state
    pub fn snapshot(&self) -> SessionState {
        self.state.read().unwrap().clone()
    }

    /// Execute a function with read access to the session state
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&SessionState) -> R,
    {
        let state = self.state.read().unwrap();
        f(&state)
    }

    /// Subscribe to session events
    ///
    /// Returns a receiver that will get all future events. Multiple
    /// subscribers can listen simultaneously.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    /// The question set shared by this session
    pub fn question_set(&self) -> Arc<QuestionSet> {
        Arc::clone(&self.questions)
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// The finalized result, once `submit()` or `expire()` has produced it
    pub fn result(&self) -> Option<SessionResult> {
        self.read(|state| state.result.clone())
    }

    /// Whether submit, expire, or abandon has already won the session
    pub fn is_finalized(&self) -> bool {
        self.finalized.load(Ordering::Acquire)
    }

    /// Receiver for the countdown stop signal, consumed by the timer task
    pub fn cancel_receiver(&self) -> watch::Receiver<bool> {
        self.cancel_tx.subscribe()
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    /// Move focus to an explicit question index.
    ///
    /// Valid in any state; indices outside `[0, len)` are rejected without
    /// mutating the session. Answers commit on [`record_answer`](Self::record_answer),
    /// so moving focus has nothing additional to persist.
    pub fn focus(&self, index: usize) -> Result<Vec<SessionEvent>, SessionError> {
        let len = self.questions.len();
        if index >= len {
            return Err(SessionError::InvalidFocusIndex { index, len });
        }
        Ok(self.update(|state| state.focus_index = index))
    }

    /// Record `option` as the answer for the focused question.
    ///
    /// Valid only while `Active`. `option` must equal one of the focused
    /// question's options or the [`UNANSWERED`] sentinel (which clears the
    /// entry). The ledger commit is immediate: the value visible at
    /// submission time is the last one recorded for each question.
    pub fn record_answer(&self, option: &str) -> Result<Vec<SessionEvent>, SessionError> {
        if self.is_finalized() {
            return Err(SessionError::SessionNotActive);
        }

        let questions = Arc::clone(&self.questions);
        let option = option.to_string();
        let mut recorded_index = 0;

        let mut events = self.try_update(|state| {
            if !state.is_active() {
                return Err(SessionError::SessionNotActive);
            }
            let index = state.focus_index;
            let valid = option == UNANSWERED
                || questions.get(index).is_some_and(|q| q.has_option(&option));
            if !valid {
                return Err(SessionError::InvalidOption(option.clone()));
            }
            state.answers.record(index, option.clone());
            recorded_index = index;
            Ok(())
        })?;

        events.push(self.broadcast(SessionEvent::AnswerRecorded { index: recorded_index }));
        Ok(events)
    }

    /// Advance focus by one question.
    ///
    /// `Active`: moves forward unless already at the last index (no
    /// wraparound). `Reviewing`: moves forward, or at the last index emits
    /// [`SessionEvent::SessionEnded`] so the caller tears down the view.
    pub fn next(&self) -> Vec<SessionEvent> {
        let len = self.questions.len();
        let mut end_of_review = false;

        let mut events = self.update(|state| {
            if state.focus_index + 1 < len {
                state.focus_index += 1;
            } else if state.is_reviewing() {
                end_of_review = true;
            }
        });

        if end_of_review {
            events.push(self.broadcast(SessionEvent::SessionEnded));
        }
        events
    }

    /// Move focus back by one question; no-op at the first question.
    pub fn previous(&self) -> Vec<SessionEvent> {
        self.update(|state| {
            if state.focus_index > 0 {
                state.focus_index -= 1;
            }
        })
    }

    /// Submit the session for scoring.
    ///
    /// Fails with [`SessionError::IncompleteAnswers`] (and emits
    /// [`SessionEvent::SubmissionRejected`]) if any question still holds the
    /// sentinel; the session is unchanged in that case and the caller should
    /// re-prompt. On success the countdown stops, the result is computed,
    /// and the session enters `Reviewing` with focus reset to the first
    /// question.
    pub fn submit(&self) -> Result<SessionResult, SessionError> {
        let missing = {
            let state = self.state.read().unwrap();
            if !state.is_active() || self.is_finalized() {
                return Err(SessionError::SessionNotActive);
            }
            state.answers.unanswered()
        };

        if !missing.is_empty() {
            tracing::info!("Submission rejected, unanswered questions: {:?}", missing);
            self.broadcast(SessionEvent::SubmissionRejected {
                missing: missing.clone(),
            });
            return Err(SessionError::IncompleteAnswers(missing));
        }

        if !self.try_acquire_finalize() {
            return Err(SessionError::SessionNotActive);
        }

        self.metrics.record_session_submitted();
        Ok(self.finalize_into_review())
    }

    /// Force submission because the countdown reached zero.
    ///
    /// Invoked by the countdown task. Bypasses the completeness
    /// precondition: sentinel entries score as incorrect. Returns `None` if
    /// the session already finalized (the one losing side of the
    /// submit/expire race), making the call a no-op.
    pub fn expire(&self) -> Option<SessionResult> {
        if !self.read(|state| state.is_active()) {
            return None;
        }
        if !self.try_acquire_finalize() {
            return None;
        }

        tracing::info!("Countdown expired, forcing submission");
        self.broadcast(SessionEvent::TimerExpired);
        self.metrics.record_session_expired();
        Some(self.finalize_into_review())
    }

    /// Discard the session.
    ///
    /// Stops the countdown and marks the session finalized so no later
    /// submit or expiry can run; produces no [`SessionResult`]. Idempotent:
    /// repeated calls have no additional effect, and
    /// [`SessionEvent::SessionAbandoned`] is emitted at most once.
    pub fn abandon(&self) -> Vec<SessionEvent> {
        self.stop_timer();

        if self
            .abandoned
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Vec::new();
        }

        self.finalized.store(true, Ordering::Release);
        self.metrics.record_session_abandoned();
        tracing::info!("Session abandoned");
        vec![self.broadcast(SessionEvent::SessionAbandoned)]
    }

    /// Decrement the countdown by one second.
    ///
    /// Called once per period by the countdown task; the task must invoke
    /// [`expire`](Self::expire) when this reports [`TickOutcome::Expired`].
    /// Ticks touch only `time_remaining_secs` - never focus or the ledger.
    pub fn tick(&self) -> TickOutcome {
        if self.is_finalized() {
            return TickOutcome::Stopped;
        }

        let mut expired = false;
        let mut stopped = false;
        self.update(|state| {
            if !state.is_active() {
                stopped = true;
                return;
            }
            if state.time_remaining_secs > 0 {
                state.time_remaining_secs -= 1;
            }
            expired = state.time_remaining_secs == 0;
        });
        self.metrics.record_timer_tick();

        if stopped {
            TickOutcome::Stopped
        } else if expired {
            TickOutcome::Expired
        } else {
            TickOutcome::Continue
        }
    }

    /// Win the right to finalize. Exactly one caller ever succeeds.
    fn try_acquire_finalize(&self) -> bool {
        self.finalized
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Perform the one-time Active -> Reviewing transition.
    ///
    /// Caller must have won [`try_acquire_finalize`](Self::try_acquire_finalize).
    fn finalize_into_review(&self) -> SessionResult {
        self.stop_timer();

        let questions = Arc::clone(&self.questions);
        let mut produced = None;
        self.update(|state| {
            let elapsed = state.started_at.elapsed().as_secs_f64();
            let result = compute_result(&questions, &state.answers, elapsed);
            state.status = SessionStatus::Reviewing;
            state.focus_index = 0;
            state.result = Some(result.clone());
            produced = Some(result);
        });

        let result = produced.expect("finalize closure always produces a result");
        tracing::info!(
            "Session finalized: score {}/{} in {:.1}s",
            result.score,
            result.total,
            result.elapsed_seconds
        );
        result
    }

    fn stop_timer(&self) {
        // Idempotent; send only fails when no timer task is listening
        let _ = self.cancel_tx.send(true);
    }

    /// Apply a mutation and emit events for what changed.
    ///
    /// Captures the old state, applies `update_fn`, diffs old and new, and
    /// broadcasts the derived events. Returns the events that were emitted.
    fn update<F>(&self, update_fn: F) -> Vec<SessionEvent>
    where
        F: FnOnce(&mut SessionState),
    {
        let changes = {
            let mut state = self.state.write().unwrap();
            let old_state = state.clone();
            update_fn(&mut state);
            Self::detect_changes(&old_state, &state)
        };
        self.metrics.record_state_update();

        changes.into_iter().map(|c| self.broadcast(c)).collect()
    }

    /// Like [`update`](Self::update), but the closure may reject the
    /// mutation. A rejecting closure must not have touched the state.
    fn try_update<F>(&self, update_fn: F) -> Result<Vec<SessionEvent>, SessionError>
    where
        F: FnOnce(&mut SessionState) -> Result<(), SessionError>,
    {
        let changes = {
            let mut state = self.state.write().unwrap();
            let old_state = state.clone();
            update_fn(&mut state)?;
            Self::detect_changes(&old_state, &state)
        };
        self.metrics.record_state_update();

        Ok(changes.into_iter().map(|c| self.broadcast(c)).collect())
    }

    /// Diff two states and generate events for what changed
    fn detect_changes(old: &SessionState, new: &SessionState) -> Vec<SessionEvent> {
        let mut changes = Vec::new();

        if old.time_remaining_secs != new.time_remaining_secs {
            changes.push(SessionEvent::TimeRemainingChanged {
                seconds: new.time_remaining_secs,
            });
        }

        if old.status != new.status {
            if let Some(result) = &new.result {
                changes.push(SessionEvent::SessionFinalized {
                    score: result.score,
                    total: result.total,
                });
            }
        }

        if old.focus_index != new.focus_index {
            changes.push(SessionEvent::FocusChanged {
                index: new.focus_index,
            });
        }

        changes
    }

    fn broadcast(&self, event: SessionEvent) -> SessionEvent {
        self.metrics.record_event_broadcast();
        // Ignore send errors - it's OK if no one is listening
        if self.event_tx.send(event.clone()).is_err() {
            self.metrics.record_event_broadcast_error();
        }
        event
    }
}

// Make SessionManager cloneable for sharing with the countdown task
impl Clone for SessionManager {
    fn clone(&self) -> Self {
        Self {
            questions: Arc::clone(&self.questions),
            state: Arc::clone(&self.state),
            event_tx: self.event_tx.clone(),
            cancel_tx: Arc::clone(&self.cancel_tx),
            finalized: Arc::clone(&self.finalized),
            abandoned: Arc::clone(&self.abandoned),
            metrics: Arc::clone(&self.metrics),
        }
    }
}
