//! Result computation for finalized sessions.
//!
//! Pure and deterministic: no locks, no channels, no side effects. The
//! state machine calls [`compute_result`] exactly once per session, but the
//! function itself is independently usable and testable.

use crate::models::question::QuestionSet;
use crate::models::session::{AnswerLedger, QuestionOutcome, SessionResult};

/// Score a session from its question set and answer ledger.
///
/// Walks questions in order, reads the ledger entry for each (the sentinel
/// if nothing was recorded), and compares it to the correct option with
/// exact string equality. The sentinel never equals a correct option, so
/// unanswered questions score as incorrect.
pub fn compute_result(
    questions: &QuestionSet,
    answers: &AnswerLedger,
    elapsed_seconds: f64,
) -> SessionResult {
    let mut score = 0;
    let mut per_question = Vec::with_capacity(questions.len());

    for (index, question) in questions.iter().enumerate() {
        let chosen = answers.answer(index);
        let is_correct = chosen == question.correct_option;
        if is_correct {
            score += 1;
        }
        per_question.push(QuestionOutcome {
            question: question.clone(),
            chosen_answer: chosen.to_string(),
            is_correct,
        });
    }

    SessionResult {
        score,
        total: questions.len(),
        elapsed_seconds,
        per_question,
    }
}
