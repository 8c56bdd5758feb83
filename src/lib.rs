// QQuiz - Timed Multiple-Choice Quiz Session Engine
//
// This is the library crate containing the session state machine, countdown
// timer, scoring, and supporting services. The binary crate (main.rs)
// provides a thin console driver.

pub mod config;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use models::{
    Question, QuestionSet, QuizConfig, QuizSettings, RawQuestion, SessionResult, SessionState,
    SessionStatus,
};
pub use state::{SessionError, SessionEvent, SessionManager};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
