//! Data models for the quiz engine.
//!
//! This module contains the core data structures used throughout the crate:
//! - [`Question`] / [`QuestionSet`]: validated, immutable quiz content for one session
//! - [`RawQuestion`]: the unvalidated wire form questions arrive in from a source
//! - [`AnswerLedger`]: per-question recorded answers with the empty-string sentinel
//! - [`SessionState`] / [`SessionResult`]: the session container and its one-shot summary
//! - [`QuizConfig`]: user settings loaded from `Quiz Settings.yaml`
//!
//! # Architecture Note
//!
//! The models are designed to be:
//! - **Serializable**: content and result structs derive `Serialize`/`Deserialize` for YAML banks and report export
//! - **Owned by the state machine**: `SessionState` is wrapped in `Arc<RwLock<>>` by [`SessionManager`](crate::state::SessionManager); all mutation goes through its operations
//! - **Validated at the boundary**: a [`QuestionSet`] can only be built from raw input that passes the set invariants

pub mod config;
pub mod question;
pub mod session;

pub use config::{QuizConfig, QuizSettings};
pub use question::{OPTIONS_PER_QUESTION, Question, QuestionSet, QuestionSetError, RawQuestion};
pub use session::{
    AnswerLedger, QuestionOutcome, SessionResult, SessionState, SessionStatus, UNANSWERED,
};
