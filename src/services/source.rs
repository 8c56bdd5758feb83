//! Question sourcing.
//!
//! The engine does not care where questions come from; it consumes a
//! [`QuestionSource`] and validates whatever it returns before a session is
//! constructed. The bundled implementation reads a local YAML question
//! bank. A generator-backed source (the original design called an LLM API)
//! would implement the same trait.

use crate::models::question::RawQuestion;
use anyhow::{Context, Result, bail};
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use std::fs;

/// A provider of raw, unvalidated questions for a topic.
#[cfg_attr(test, mockall::automock)]
pub trait QuestionSource {
    /// Fetch the questions available for `topic`.
    ///
    /// Implementations report unknown topics and transport failures as
    /// errors; validation of the returned questions is the caller's job.
    fn fetch(&self, topic: &str) -> Result<Vec<RawQuestion>>;
}

/// Question bank file layout: topic name -> question list.
///
/// Insertion order of topics is preserved so menus list them as authored.
pub type QuestionBank = IndexMap<String, Vec<RawQuestion>>;

/// Question source backed by a YAML bank file.
///
/// The bank is re-read on every fetch, so edits to the file take effect
/// without restarting.
#[derive(Debug, Clone)]
pub struct YamlQuestionSource {
    bank_path: Utf8PathBuf,
}

impl YamlQuestionSource {
    pub fn new<P: AsRef<Utf8Path>>(bank_path: P) -> Self {
        Self {
            bank_path: bank_path.as_ref().to_path_buf(),
        }
    }

    /// Load the whole bank file.
    pub fn load_bank(&self) -> Result<QuestionBank> {
        let contents = fs::read_to_string(&self.bank_path)
            .with_context(|| format!("Failed to read question bank: {}", self.bank_path))?;

        let bank: QuestionBank = serde_yaml_ng::from_str(&contents)
            .with_context(|| format!("Failed to parse question bank: {}", self.bank_path))?;

        tracing::debug!("Loaded question bank with {} topics from {}", bank.len(), self.bank_path);
        Ok(bank)
    }

    /// Topic names in bank order.
    pub fn topics(&self) -> Result<Vec<String>> {
        Ok(self.load_bank()?.keys().cloned().collect())
    }
}

impl QuestionSource for YamlQuestionSource {
    fn fetch(&self, topic: &str) -> Result<Vec<RawQuestion>> {
        let mut bank = self.load_bank()?;
        match bank.shift_remove(topic) {
            Some(questions) => {
                tracing::info!("Fetched {} questions for topic {:?}", questions.len(), topic);
                Ok(questions)
            }
            None => bail!("topic {:?} not found in question bank {}", topic, self.bank_path),
        }
    }
}
