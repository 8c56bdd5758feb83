use crate::models::question::RawQuestion;
use crate::models::{QuizConfig, QuizSettings};
use crate::services::source::QuestionBank;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Configuration manager for loading and saving YAML configuration files.
///
/// Manages the quiz data directory:
/// - Settings (`Quiz Settings.yaml`): session defaults and file locations
/// - Starter question bank, created on first run when the configured bank
///   file does not exist yet
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    settings_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the specified configuration directory.
    ///
    /// # Arguments
    /// * `config_dir` - Directory containing configuration files (e.g., "Quiz Data")
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            settings_path: config_dir.join("Quiz Settings.yaml"),
            config_dir,
        })
    }

    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    /// Load the settings file.
    ///
    /// # Returns
    /// The loaded settings, or defaults (written to disk) if the file
    /// doesn't exist yet
    pub fn load_settings(&self) -> Result<QuizSettings> {
        if !self.settings_path.exists() {
            tracing::warn!(
                "Settings file not found at {}, creating defaults",
                self.settings_path
            );
            return self.create_default_settings();
        }

        let file_contents = fs::read_to_string(&self.settings_path)
            .with_context(|| format!("Failed to read settings: {}", self.settings_path))?;

        let config: QuizConfig = serde_yaml_ng::from_str(&file_contents)
            .with_context(|| format!("Failed to parse settings: {}", self.settings_path))?;

        tracing::info!("Loaded settings from {}", self.settings_path);
        Ok(config.quiz_settings)
    }

    /// Save the settings file.
    pub fn save_settings(&self, settings: &QuizSettings) -> Result<()> {
        let config = QuizConfig {
            quiz_settings: settings.clone(),
        };
        let yaml_string =
            serde_yaml_ng::to_string(&config).context("Failed to serialize settings to YAML")?;

        fs::write(&self.settings_path, yaml_string)
            .with_context(|| format!("Failed to write settings: {}", self.settings_path))?;

        tracing::info!("Saved settings to {}", self.settings_path);
        Ok(())
    }

    fn create_default_settings(&self) -> Result<QuizSettings> {
        let settings = QuizSettings::default();
        self.save_settings(&settings)?;
        Ok(settings)
    }

    /// Create the starter question bank if the configured file is missing.
    ///
    /// Leaves an existing bank untouched.
    pub fn ensure_question_bank(&self, settings: &QuizSettings) -> Result<Utf8PathBuf> {
        let bank_path = Utf8PathBuf::from(&settings.question_bank);
        if bank_path.exists() {
            return Ok(bank_path);
        }

        if let Some(parent) = bank_path.parent() {
            if !parent.as_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create bank directory: {parent}"))?;
            }
        }

        let yaml_string = serde_yaml_ng::to_string(&Self::starter_bank())
            .context("Failed to serialize starter question bank")?;
        fs::write(&bank_path, yaml_string)
            .with_context(|| format!("Failed to write question bank: {bank_path}"))?;

        tracing::info!("Created starter question bank at {}", bank_path);
        Ok(bank_path)
    }

    fn starter_bank() -> QuestionBank {
        let mut bank = QuestionBank::new();
        bank.insert(
            "General Knowledge".to_string(),
            vec![
                RawQuestion {
                    question: "Which planet is known as the Red Planet?".to_string(),
                    options: vec![
                        "Venus".to_string(),
                        "Mars".to_string(),
                        "Jupiter".to_string(),
                        "Mercury".to_string(),
                    ],
                    answer: "Mars".to_string(),
                },
                RawQuestion {
                    question: "What is the chemical symbol for gold?".to_string(),
                    options: vec![
                        "Go".to_string(),
                        "Gd".to_string(),
                        "Au".to_string(),
                        "Ag".to_string(),
                    ],
                    answer: "Au".to_string(),
                },
                RawQuestion {
                    question: "How many continents are there?".to_string(),
                    options: vec![
                        "Five".to_string(),
                        "Six".to_string(),
                        "Seven".to_string(),
                        "Eight".to_string(),
                    ],
                    answer: "Seven".to_string(),
                },
            ],
        );
        bank
    }
}
