//! Integration tests for SessionManager with session events
//!
//! These tests verify that the session engine correctly:
//! - Emits session events on mutations
//! - Supports multiple subscribers
//! - Serializes submit and expiry to a single finalization
//! - Runs the end-to-end answering scenarios

use qquiz::models::RawQuestion;
use qquiz::{SessionError, SessionEvent, SessionManager};
use std::sync::{Arc, Barrier};
use tokio::time::{Duration, timeout};

fn raw(question: &str, options: [&str; 4], answer: &str) -> RawQuestion {
    RawQuestion {
        question: question.to_string(),
        options: options.iter().map(|s| s.to_string()).collect(),
        answer: answer.to_string(),
    }
}

/// Three questions whose correct options are "a1", "b2", "c3".
fn three_question_session(time_limit_secs: u32) -> SessionManager {
    SessionManager::from_raw(
        vec![
            raw("Q1?", ["a1", "b1", "c1", "d1"], "a1"),
            raw("Q2?", ["a2", "b2", "c2", "d2"], "b2"),
            raw("Q3?", ["a3", "b3", "c3", "d3"], "c3"),
        ],
        time_limit_secs,
    )
    .unwrap()
}

#[tokio::test]
async fn test_answer_event_emitted() {
    let session = three_question_session(60);
    let mut rx = session.subscribe();

    session.record_answer("a1").unwrap();

    let event = timeout(Duration::from_millis(100), rx.recv())
        .await
        .expect("Timeout waiting for event")
        .expect("Channel closed");

    assert_eq!(event, SessionEvent::AnswerRecorded { index: 0 });
}

#[tokio::test]
async fn test_multiple_subscribers_receive_events() {
    let session = three_question_session(60);
    let mut rx1 = session.subscribe();
    let mut rx2 = session.subscribe();

    session.focus(2).unwrap();

    let event1 = timeout(Duration::from_millis(100), rx1.recv())
        .await
        .expect("Timeout on rx1")
        .expect("rx1 closed");
    let event2 = timeout(Duration::from_millis(100), rx2.recv())
        .await
        .expect("Timeout on rx2")
        .expect("rx2 closed");

    assert_eq!(event1, SessionEvent::FocusChanged { index: 2 });
    assert_eq!(event2, SessionEvent::FocusChanged { index: 2 });
}

#[tokio::test]
async fn test_rejected_submission_emits_missing_numbers() {
    let session = three_question_session(60);
    let mut rx = session.subscribe();

    session.record_answer("a1").unwrap();
    let _ = rx.recv().await; // AnswerRecorded

    let err = session.submit().unwrap_err();
    assert_eq!(err, SessionError::IncompleteAnswers(vec![2, 3]));

    let event = timeout(Duration::from_millis(100), rx.recv())
        .await
        .expect("Timeout")
        .expect("Channel closed");
    assert_eq!(event, SessionEvent::SubmissionRejected { missing: vec![2, 3] });
}

/// Scenario: answer Q1 correctly, Q2 incorrectly, leave Q3 blank. Submission
/// is rejected naming question 3; after answering it, submission succeeds
/// with a score of 2/3.
#[test]
fn test_incomplete_submit_then_success() {
    let session = three_question_session(60);

    session.record_answer("a1").unwrap(); // correct
    session.next();
    session.record_answer("c2").unwrap(); // wrong
    session.next();

    let err = session.submit().unwrap_err();
    assert_eq!(err, SessionError::IncompleteAnswers(vec![3]));
    assert!(session.snapshot().is_active());

    session.record_answer("c3").unwrap(); // correct
    let result = session.submit().unwrap();

    assert_eq!(result.score, 2);
    assert_eq!(result.total, 3);
    assert!(session.snapshot().is_reviewing());
    assert_eq!(session.snapshot().focus_index, 0);
}

/// Scenario: the countdown runs out while Q2 is unanswered and Q1/Q3 are
/// answered correctly. Expiry finalizes without a user submit and the
/// unanswered question scores as incorrect.
#[test]
fn test_expiry_with_unanswered_question() {
    let session = three_question_session(2);

    session.record_answer("a1").unwrap();
    session.focus(2).unwrap();
    session.record_answer("c3").unwrap();

    // Drive the countdown to zero by hand
    session.tick();
    session.tick();
    let result = session.expire().expect("expiry must finalize");

    assert_eq!(result.score, 2);
    assert_eq!(result.total, 3);
    assert!(session.snapshot().is_reviewing());
    assert!(!result.per_question[1].is_correct);
    assert_eq!(result.per_question[1].chosen_answer, "");
}

/// Scenario: in review, `next()` at the last question signals session end,
/// and the ledger can no longer change.
#[test]
fn test_review_end_and_readonly_ledger() {
    let session = three_question_session(60);
    session.expire().unwrap();

    let err = session.record_answer("a1").unwrap_err();
    assert_eq!(err, SessionError::SessionNotActive);
    assert_eq!(session.snapshot().answers.answer(0), "");

    session.next();
    session.next();
    let events = session.next();
    assert!(events.contains(&SessionEvent::SessionEnded));
}

#[test]
fn test_concurrent_submit_and_expire_resolve_to_one_finalization() {
    for _ in 0..50 {
        let session = Arc::new(three_question_session(60));
        for (i, opt) in ["a1", "b2", "c3"].iter().enumerate() {
            session.focus(i).unwrap();
            session.record_answer(opt).unwrap();
        }

        let barrier = Arc::new(Barrier::new(2));

        let submit_session = Arc::clone(&session);
        let submit_barrier = Arc::clone(&barrier);
        let submitter = std::thread::spawn(move || {
            submit_barrier.wait();
            submit_session.submit().is_ok()
        });

        let expire_session = Arc::clone(&session);
        let expire_barrier = Arc::clone(&barrier);
        let expirer = std::thread::spawn(move || {
            expire_barrier.wait();
            expire_session.expire().is_some()
        });

        let submitted = submitter.join().unwrap();
        let expired = expirer.join().unwrap();

        assert!(
            submitted ^ expired,
            "exactly one finalization must win (submit={submitted}, expire={expired})"
        );
        assert!(session.result().is_some());
        assert!(session.snapshot().is_reviewing());
    }
}

#[test]
fn test_abandon_twice_has_no_additional_effect() {
    let session = three_question_session(60);

    assert_eq!(session.abandon(), vec![SessionEvent::SessionAbandoned]);
    assert!(session.abandon().is_empty());
    assert!(session.result().is_none());

    // A discarded session can never finalize
    assert!(session.expire().is_none());
    assert_eq!(session.submit().unwrap_err(), SessionError::SessionNotActive);
}

#[test]
fn test_multiple_sessions_do_not_interfere() {
    let first = three_question_session(60);
    let second = three_question_session(60);

    first.record_answer("a1").unwrap();
    second.abandon();

    assert!(first.snapshot().is_active());
    assert_eq!(first.snapshot().answers.answer(0), "a1");
    assert!(!first.is_finalized());
    assert!(second.is_finalized());
}
