//! Services module - business logic surrounding the session state machine.
//!
//! Everything here is **framework-agnostic** and has no dependency on any
//! particular UI, making it testable and reusable:
//!
//! - [`CountdownTimer`]: the background tokio task that decrements a
//!   session's remaining time and forces submission on expiry. The only
//!   service that touches a live session, and only through
//!   [`tick`](crate::state::SessionManager::tick) and
//!   [`expire`](crate::state::SessionManager::expire).
//!
//! - [`compute_result`]: the pure result reporter. Question set + answer
//!   ledger + elapsed time in, [`SessionResult`](crate::models::SessionResult)
//!   out; deterministic and side-effect free.
//!
//! - [`QuestionSource`] / [`YamlQuestionSource`]: where questions come
//!   from. The engine validates fetched questions before constructing a
//!   session; the YAML bank is the bundled implementation.
//!
//! - [`ReportExporter`] / [`TextReportExporter`]: where finalized results
//!   go. Exporters never mutate session state, so failed exports can be
//!   retried against the same result.

pub mod report;
pub mod scoring;
pub mod source;
pub mod timer;

pub use report::{ReportExporter, TextReportExporter, format_elapsed};
pub use scoring::compute_result;
pub use source::{QuestionBank, QuestionSource, YamlQuestionSource};
pub use timer::CountdownTimer;
