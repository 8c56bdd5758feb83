use serde::{Deserialize, Serialize};

/// User configuration from Quiz Settings.yaml
///
/// Contains session defaults and file locations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuizConfig {
    #[serde(rename = "Quiz_Settings")]
    pub quiz_settings: QuizSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuizSettings {
    /// Global countdown, in seconds, covering all questions of a session.
    #[serde(rename = "Time Limit", default = "default_time_limit")]
    pub time_limit_secs: u32,

    #[serde(rename = "Questions Per Quiz", default = "default_questions_per_quiz")]
    pub questions_per_quiz: usize,

    /// YAML file mapping topic names to question lists.
    #[serde(rename = "Question Bank", default = "default_question_bank")]
    pub question_bank: String,

    /// Directory review reports are exported into.
    #[serde(rename = "Report Directory", default = "default_report_dir")]
    pub report_dir: String,

    #[serde(rename = "Stat Logging", default)]
    pub stat_logging: bool,

    #[serde(rename = "Debug Mode", default)]
    pub debug_mode: bool,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            time_limit_secs: 60,
            questions_per_quiz: 3,
            question_bank: default_question_bank(),
            report_dir: default_report_dir(),
            stat_logging: true,
            debug_mode: false,
        }
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            quiz_settings: QuizSettings::default(),
        }
    }
}

fn default_time_limit() -> u32 {
    60
}

fn default_questions_per_quiz() -> usize {
    3
}

fn default_question_bank() -> String {
    "Quiz Data/Quiz Bank.yaml".to_string()
}

fn default_report_dir() -> String {
    "reports".to_string()
}
