//! Integration tests for the countdown timer task
//!
//! These tests run under paused tokio time (`start_paused = true`), so a
//! full countdown completes in microseconds: whenever the runtime is idle,
//! tokio advances the clock to the next pending timer.

use qquiz::models::RawQuestion;
use qquiz::services::CountdownTimer;
use qquiz::{SessionEvent, SessionManager};
use tokio::runtime::Handle;
use tokio::time::{Duration, timeout};

fn session_with_limit(time_limit_secs: u32) -> SessionManager {
    SessionManager::from_raw(
        vec![RawQuestion {
            question: "Q?".to_string(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            answer: "a".to_string(),
        }],
        time_limit_secs,
    )
    .unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_countdown_counts_down_and_expires_once() {
    let session = session_with_limit(3);
    let mut rx = session.subscribe();

    let timer = CountdownTimer::start(&Handle::current(), session.clone());

    let mut remaining_seen = Vec::new();
    let mut expired_count = 0;
    let mut finalized = false;

    while !finalized {
        let event = timeout(Duration::from_secs(600), rx.recv())
            .await
            .expect("Timeout waiting for countdown events")
            .expect("Channel closed");
        match event {
            SessionEvent::TimeRemainingChanged { seconds } => remaining_seen.push(seconds),
            SessionEvent::TimerExpired => expired_count += 1,
            SessionEvent::SessionFinalized { .. } => finalized = true,
            _ => {}
        }
    }

    timer.join().await;

    assert_eq!(remaining_seen, vec![2, 1, 0]);
    assert_eq!(expired_count, 1);
    assert!(session.snapshot().is_reviewing());
    assert_eq!(session.result().unwrap().score, 0);
}

#[tokio::test(start_paused = true)]
async fn test_abandon_stops_countdown_before_expiry() {
    let session = session_with_limit(600);

    let timer = CountdownTimer::start(&Handle::current(), session.clone());

    // Let a couple of ticks happen, then abandon
    tokio::time::sleep(Duration::from_secs(2)).await;
    session.abandon();

    timer.join().await;

    let state = session.snapshot();
    assert!(state.time_remaining_secs > 0);
    assert!(session.result().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_submit_stops_countdown() {
    let session = session_with_limit(600);
    let mut rx = session.subscribe();

    let timer = CountdownTimer::start(&Handle::current(), session.clone());

    session.record_answer("a").unwrap();
    let result = session.submit().unwrap();
    assert_eq!(result.score, 1);

    timer.join().await;

    // The countdown never expired this session
    let mut saw_expired = false;
    while let Ok(event) = rx.try_recv() {
        if event == SessionEvent::TimerExpired {
            saw_expired = true;
        }
    }
    assert!(!saw_expired);
}

#[tokio::test(start_paused = true)]
async fn test_no_ticks_after_stop() {
    let session = session_with_limit(600);

    let timer = CountdownTimer::start(&Handle::current(), session.clone());
    tokio::time::sleep(Duration::from_secs(1)).await;
    session.abandon();
    timer.join().await;

    let frozen = session.snapshot().time_remaining_secs;
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(session.snapshot().time_remaining_secs, frozen);
}

#[tokio::test(start_paused = true)]
async fn test_stopping_finished_countdown_is_harmless() {
    let session = session_with_limit(1);
    let timer = CountdownTimer::start(&Handle::current(), session.clone());

    timer.join().await;
    assert!(session.snapshot().is_reviewing());

    // Session already expired; abandoning afterwards must not disturb the result
    let score_before = session.result().unwrap().score;
    session.abandon();
    session.abandon();
    assert_eq!(session.result().unwrap().score, score_before);
    assert!(session.snapshot().is_reviewing());
}
