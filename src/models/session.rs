use crate::models::question::Question;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Sentinel stored in the ledger for a question with no recorded answer.
pub const UNANSWERED: &str = "";

/// Lifecycle of a quiz session.
///
/// `Active` is the initial state; `Reviewing` is terminal. A new topic
/// creates a brand-new session rather than resetting an old one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Active,
    Reviewing,
}

/// Per-question recorded answers, keyed by 0-based question index.
///
/// Dense over `[0, len)` and initialized to [`UNANSWERED`]. Entries persist
/// across navigation so a question can be revisited and changed before
/// submission; the ledger never shrinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerLedger {
    answers: Vec<String>,
}

impl AnswerLedger {
    pub fn new(len: usize) -> Self {
        Self {
            answers: vec![String::new(); len],
        }
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// The recorded answer for `index`, or the sentinel if none.
    pub fn answer(&self, index: usize) -> &str {
        self.answers.get(index).map(String::as_str).unwrap_or(UNANSWERED)
    }

    /// Record `answer` for `index`. Callers are responsible for validating
    /// both the index and the option before writing.
    pub fn record(&mut self, index: usize, answer: String) {
        self.answers[index] = answer;
    }

    /// 1-based numbers of questions still holding the sentinel.
    pub fn unanswered(&self) -> Vec<usize> {
        self.answers
            .iter()
            .enumerate()
            .filter(|(_, a)| a.as_str() == UNANSWERED)
            .map(|(i, _)| i + 1)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.answers.iter().all(|a| a.as_str() != UNANSWERED)
    }
}

/// Outcome of one question after finalization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionOutcome {
    pub question: Question,
    pub chosen_answer: String,
    pub is_correct: bool,
}

/// Immutable summary of a finalized session.
///
/// Produced exactly once, at the Active -> Reviewing transition, and handed
/// unchanged to report exporters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionResult {
    pub score: usize,
    pub total: usize,
    pub elapsed_seconds: f64,
    pub per_question: Vec<QuestionOutcome>,
}

/// Snapshot of a running or finished session.
///
/// Owned by [`SessionManager`](crate::state::SessionManager) behind a lock;
/// the fields mutate through disjoint paths: `focus_index` only via
/// navigation, `time_remaining_secs` only via timer ticks, `result` exactly
/// once at finalization.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub status: SessionStatus,
    pub focus_index: usize,
    pub time_remaining_secs: u32,
    pub started_at: Instant,
    pub answers: AnswerLedger,
    pub result: Option<SessionResult>,
}

impl SessionState {
    pub fn new(question_count: usize, time_limit_secs: u32) -> Self {
        Self {
            status: SessionStatus::Active,
            focus_index: 0,
            time_remaining_secs: time_limit_secs,
            started_at: Instant::now(),
            answers: AnswerLedger::new(question_count),
            result: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    pub fn is_reviewing(&self) -> bool {
        self.status == SessionStatus::Reviewing
    }
}
