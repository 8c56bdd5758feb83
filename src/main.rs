//! QQuiz - Timed Multiple-Choice Quiz Session Engine
//!
//! Main entry point for the console driver.
//!
//! # Overview
//!
//! This binary crate provides a thin line-oriented frontend for the quiz
//! engine. It initializes:
//! - Logging infrastructure (rotating file logs)
//! - Tokio async runtime (worker threads for the countdown task)
//! - Configuration loading ([`ConfigManager`])
//! - The question source and report exporter
//!
//! The driver contains no quiz semantics: every rule about navigation,
//! answer persistence, the countdown, and scoring lives in the library.
//! The driver translates input lines into engine operations and prints
//! what the engine reports back.
//!
//! # Execution Flow
//!
//! 1. Initialize logging -> logs/qquiz.<date>
//! 2. Create tokio runtime for the countdown task
//! 3. Load Quiz Data/Quiz Settings.yaml and the question bank
//! 4. Per topic: build a session, start its countdown, drive it from stdin
//! 5. After review, optionally export the report and log session metrics

use anyhow::Result;
use qquiz::services::{
    CountdownTimer, QuestionSource, ReportExporter, TextReportExporter, YamlQuestionSource,
    format_elapsed,
};
use qquiz::{APP_NAME, ConfigManager, SessionError, SessionEvent, SessionManager, VERSION};
use std::io::{self, BufRead, Write};

fn main() -> Result<()> {
    let _log_guard = qquiz::logging::setup_logging("logs", "qquiz", false, false)?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .thread_name("qquiz-worker")
        .build()?;

    let config_manager = ConfigManager::new("Quiz Data")?;
    let settings = config_manager.load_settings()?;
    let bank_path = config_manager.ensure_question_bank(&settings)?;

    let source = YamlQuestionSource::new(&bank_path);
    let exporter = TextReportExporter::new(&settings.report_dir);

    println!("{} v{}", APP_NAME, VERSION);

    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        let topics = source.topics()?;
        println!("\nAvailable topics: {}", topics.join(", "));
        let Some(topic) = prompt(&mut input, "Enter quiz topic (blank to quit): ")? else {
            break;
        };
        if topic.is_empty() {
            break;
        }

        let mut raw = match source.fetch(&topic) {
            Ok(raw) => raw,
            Err(e) => {
                println!("Failed to load quiz: {e}");
                continue;
            }
        };
        raw.truncate(settings.questions_per_quiz);

        let session = match SessionManager::from_raw(raw, settings.time_limit_secs) {
            Ok(session) => session,
            Err(e) => {
                tracing::error!("Rejected question set for {:?}: {}", topic, e);
                println!("Question set is invalid: {e}");
                continue;
            }
        };

        let listener = spawn_event_listener(&session);
        let timer = CountdownTimer::start(runtime.handle(), session.clone());

        run_session(&session, &mut input, &exporter, &topic)?;

        // Abandon is idempotent; this also stops the countdown when the
        // user quit mid-quiz
        session.abandon();
        runtime.block_on(timer.join());

        if settings.stat_logging {
            session.metrics().log_summary();
        }
        drop(session);
        let _ = listener.join();
    }

    runtime.shutdown_timeout(std::time::Duration::from_secs(5));
    tracing::info!("Shutdown complete");
    Ok(())
}

/// Print important session events as they happen.
///
/// Runs on its own thread so countdown notifications appear even while the
/// driver is blocked reading input; exits when the session is dropped.
fn spawn_event_listener(session: &SessionManager) -> std::thread::JoinHandle<()> {
    let mut rx = session.subscribe();
    std::thread::spawn(move || {
        loop {
            match rx.blocking_recv() {
                Ok(SessionEvent::TimeRemainingChanged { seconds }) => {
                    if seconds > 0 && (seconds <= 5 || seconds == 10 || seconds == 30) {
                        println!("\n[time left: {seconds}s]");
                    }
                }
                Ok(SessionEvent::TimerExpired) => {
                    println!("\nTime's up! Submitting quiz... (press Enter to review)");
                }
                Ok(_) => {}
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("Event listener lagged, {} events skipped", skipped);
                }
            }
        }
    })
}

fn run_session(
    session: &SessionManager,
    input: &mut impl BufRead,
    exporter: &TextReportExporter,
    topic: &str,
) -> Result<()> {
    // Answering phase; ends on submit, expiry, or abandon
    while session.read(|state| state.is_active()) && !session.is_finalized() {
        print_question(session);
        let Some(line) = prompt(input, "[1-4] answer, n)ext, p)rev, s)ubmit, q)uit: ")? else {
            session.abandon();
            return Ok(());
        };

        if session.read(|state| state.is_reviewing()) {
            // The countdown expired while waiting for input
            break;
        }

        match line.as_str() {
            "" => {}
            "n" => {
                session.next();
            }
            "p" => {
                session.previous();
            }
            "s" => match session.submit() {
                Ok(_) => break,
                Err(SessionError::IncompleteAnswers(missing)) => {
                    let numbers: Vec<String> = missing.iter().map(|n| n.to_string()).collect();
                    println!("Please answer question(s): {}", numbers.join(", "));
                }
                Err(e) => println!("{e}"),
            },
            "q" => {
                session.abandon();
                return Ok(());
            }
            choice => match select_option(session, choice) {
                Ok(()) => {
                    session.next();
                }
                Err(e) => println!("{e}"),
            },
        }
    }

    if session.result().is_some() {
        run_review(session, input, exporter, topic)?;
    }
    Ok(())
}

fn run_review(
    session: &SessionManager,
    input: &mut impl BufRead,
    exporter: &TextReportExporter,
    topic: &str,
) -> Result<()> {
    let result = session.result().expect("review requires a finalized result");
    println!(
        "\n=== REVIEW MODE === Score: {}/{}  Time: {}",
        result.score,
        result.total,
        format_elapsed(result.elapsed_seconds)
    );

    loop {
        print_review_question(session);
        let Some(line) = prompt(input, "n)ext, p)rev, e)xport report, q)uit review: ")? else {
            break;
        };

        match line.as_str() {
            "n" | "" => {
                let events = session.next();
                if events.contains(&SessionEvent::SessionEnded) {
                    break;
                }
            }
            "p" => {
                session.previous();
            }
            "e" => match exporter.export(&result, topic) {
                Ok(path) => println!("Report saved to {path}"),
                Err(e) => {
                    tracing::error!("Report export failed: {e:#}");
                    println!("Export failed: {e}. The result is still available; try again.");
                }
            },
            "q" => break,
            other => println!("Unknown command {other:?}"),
        }
    }
    Ok(())
}

fn select_option(session: &SessionManager, choice: &str) -> Result<(), SessionError> {
    let questions = session.question_set();
    let index = session.read(|state| state.focus_index);

    let option = choice
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|n| questions.get(index).and_then(|q| q.options.get(n)))
        .cloned()
        .ok_or_else(|| SessionError::InvalidOption(choice.to_string()))?;

    session.record_answer(&option)?;
    Ok(())
}

fn print_question(session: &SessionManager) {
    let questions = session.question_set();
    session.read(|state| {
        let index = state.focus_index;
        if let Some(question) = questions.get(index) {
            println!(
                "\nQ {}/{} (time left: {}s)",
                index + 1,
                questions.len(),
                state.time_remaining_secs
            );
            println!("{}", question.text);
            for (i, option) in question.options.iter().enumerate() {
                let marker = if state.answers.answer(index) == option.as_str() { "*" } else { " " };
                println!("  {}{}) {}", marker, i + 1, option);
            }
        }
    });
}

fn print_review_question(session: &SessionManager) {
    let questions = session.question_set();
    session.read(|state| {
        let index = state.focus_index;
        if let Some(question) = questions.get(index) {
            println!("\nQ {}/{}: {}", index + 1, questions.len(), question.text);
            let chosen = state.answers.answer(index);
            for option in &question.options {
                let note = if *option == question.correct_option && *option == chosen {
                    " <- correct"
                } else if *option == question.correct_option {
                    " <- correct answer"
                } else if *option == chosen {
                    " <- your answer"
                } else {
                    ""
                };
                println!("  {option}{note}");
            }
        }
    });
}

/// Read one trimmed input line; `None` on EOF.
fn prompt(input: &mut impl BufRead, message: &str) -> Result<Option<String>> {
    print!("{message}");
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
