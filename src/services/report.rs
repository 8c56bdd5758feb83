//! Review report export.
//!
//! Exporters consume a finalized [`SessionResult`] and never touch session
//! state, so a failed export can simply be retried. The bundled exporter
//! writes a plain-text review document; richer formats would implement the
//! same trait.

use crate::models::session::SessionResult;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// A sink for finalized session results.
pub trait ReportExporter {
    /// Export `result` for the quiz on `topic`; returns the written path.
    fn export(&self, result: &SessionResult, topic: &str) -> Result<Utf8PathBuf>;
}

/// Format an elapsed duration the way review screens show it.
///
/// Whole minutes and seconds, seconds only when under a minute:
/// `125.4` -> `"2 min 5 sec"`, `45.0` -> `"45 sec"`.
pub fn format_elapsed(elapsed_seconds: f64) -> String {
    let total = elapsed_seconds.max(0.0) as u64;
    let minutes = total / 60;
    let seconds = total % 60;
    if minutes > 0 {
        format!("{minutes} min {seconds} sec")
    } else {
        format!("{seconds} sec")
    }
}

/// Exporter producing a plain-text review file.
///
/// One file per topic under the configured report directory, created on
/// demand. Each option of each question is annotated so the review reads
/// the same as the on-screen one: correct answers are checked, a wrong
/// chosen answer is crossed out, and a missed correct answer says so.
#[derive(Debug, Clone)]
pub struct TextReportExporter {
    report_dir: Utf8PathBuf,
}

impl TextReportExporter {
    pub fn new<P: AsRef<Utf8Path>>(report_dir: P) -> Self {
        Self {
            report_dir: report_dir.as_ref().to_path_buf(),
        }
    }

    fn render(result: &SessionResult, topic: &str) -> String {
        let mut out = String::new();
        out.push_str(&format!("Quiz Review: {topic}\n"));
        out.push_str(&format!("Score: {}/{}\n", result.score, result.total));
        out.push_str(&format!(
            "Time taken: {}\n\n",
            format_elapsed(result.elapsed_seconds)
        ));

        for (i, outcome) in result.per_question.iter().enumerate() {
            out.push_str(&format!("Question {}: {}\n", i + 1, outcome.question.text));
            for option in &outcome.question.options {
                let correct = *option == outcome.question.correct_option;
                let chosen = *option == outcome.chosen_answer;
                let line = match (correct, chosen) {
                    (true, true) => format!("  [x] {option}"),
                    (true, false) => format!("  [x] {option} (Correct answer)"),
                    (false, true) => format!("  [ ] {option} (Your answer - incorrect)"),
                    (false, false) => format!("  [ ] {option}"),
                };
                out.push_str(&line);
                out.push('\n');
            }
            out.push('\n');
        }

        out
    }

    fn file_name(topic: &str) -> String {
        let sanitized: String = topic
            .chars()
            .map(|c| if c.is_alphanumeric() || c == ' ' || c == '-' { c } else { '_' })
            .collect();
        format!("{} Review.txt", sanitized.trim())
    }
}

impl ReportExporter for TextReportExporter {
    fn export(&self, result: &SessionResult, topic: &str) -> Result<Utf8PathBuf> {
        if !self.report_dir.exists() {
            fs::create_dir_all(&self.report_dir)
                .with_context(|| format!("Failed to create report directory: {}", self.report_dir))?;
        }

        let path = self.report_dir.join(Self::file_name(topic));
        fs::write(&path, Self::render(result, topic))
            .with_context(|| format!("Failed to write report: {path}"))?;

        tracing::info!("Exported review report to {}", path);
        Ok(path)
    }
}
