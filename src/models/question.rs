use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of options every question must carry.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// Unvalidated question as it arrives from a [`QuestionSource`](crate::services::QuestionSource).
///
/// Field names match the wire schema (`question` / `options` / `answer`)
/// used by question banks and generators. Nothing is checked at this stage;
/// validation happens in [`QuestionSet::from_raw`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

/// Validation failures for a fetched question set.
///
/// Each variant names the offending question by 0-based index so callers
/// can point at the bad entry in the bank file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuestionSetError {
    #[error("question set is empty")]
    Empty,

    #[error("question {index} has {found} options, expected {OPTIONS_PER_QUESTION}")]
    WrongOptionCount { index: usize, found: usize },

    #[error("question {index} has duplicate option {option:?}")]
    DuplicateOption { index: usize, option: String },

    #[error("question {index} answer {answer:?} is not one of its options")]
    AnswerNotInOptions { index: usize, answer: String },
}

/// A single validated quiz question.
///
/// Invariants, enforced at construction:
/// - exactly [`OPTIONS_PER_QUESTION`] options, all distinct
/// - `correct_option` equals one of the options
///
/// Option order is preserved exactly as supplied; there is no shuffling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Question {
    pub text: String,
    pub options: Vec<String>,
    pub correct_option: String,
}

impl Question {
    fn from_raw(index: usize, raw: RawQuestion) -> Result<Self, QuestionSetError> {
        if raw.options.len() != OPTIONS_PER_QUESTION {
            return Err(QuestionSetError::WrongOptionCount {
                index,
                found: raw.options.len(),
            });
        }

        for (i, option) in raw.options.iter().enumerate() {
            if raw.options[..i].contains(option) {
                return Err(QuestionSetError::DuplicateOption {
                    index,
                    option: option.clone(),
                });
            }
        }

        if !raw.options.contains(&raw.answer) {
            return Err(QuestionSetError::AnswerNotInOptions {
                index,
                answer: raw.answer,
            });
        }

        Ok(Self {
            text: raw.question,
            options: raw.options,
            correct_option: raw.answer,
        })
    }

    /// Check whether `option` is one of this question's options.
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

/// The fixed, immutable list of questions for one session.
///
/// Non-empty by construction; the length never changes after creation.
/// Deliberately not deserializable: the only way in is [`from_raw`](Self::from_raw).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    /// Validate a fetched set of raw questions into a `QuestionSet`.
    ///
    /// Rejects empty sets and any question violating the per-question
    /// invariants. No session is constructed from a set that fails here.
    pub fn from_raw(raw: Vec<RawQuestion>) -> Result<Self, QuestionSetError> {
        if raw.is_empty() {
            return Err(QuestionSetError::Empty);
        }

        let questions = raw
            .into_iter()
            .enumerate()
            .map(|(index, q)| Question::from_raw(index, q))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { questions })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(question: &str, options: [&str; 4], answer: &str) -> RawQuestion {
        RawQuestion {
            question: question.to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
            answer: answer.to_string(),
        }
    }

    #[test]
    fn test_valid_set() {
        let set = QuestionSet::from_raw(vec![
            raw("What is 2+2?", ["3", "4", "5", "6"], "4"),
            raw("Capital of France?", ["Lyon", "Nice", "Paris", "Lille"], "Paris"),
        ])
        .unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.get(0).unwrap().correct_option, "4");
        assert!(set.get(1).unwrap().has_option("Lyon"));
        assert!(!set.get(1).unwrap().has_option("Marseille"));
    }

    #[test]
    fn test_empty_set_rejected() {
        assert_eq!(QuestionSet::from_raw(vec![]), Err(QuestionSetError::Empty));
    }

    #[test]
    fn test_wrong_option_count_rejected() {
        let mut bad = raw("Q?", ["a", "b", "c", "d"], "a");
        bad.options.pop();

        let err = QuestionSet::from_raw(vec![bad]).unwrap_err();
        assert_eq!(err, QuestionSetError::WrongOptionCount { index: 0, found: 3 });
    }

    #[test]
    fn test_duplicate_option_rejected() {
        let err = QuestionSet::from_raw(vec![raw("Q?", ["a", "b", "b", "d"], "a")]).unwrap_err();
        assert_eq!(
            err,
            QuestionSetError::DuplicateOption {
                index: 0,
                option: "b".to_string()
            }
        );
    }

    #[test]
    fn test_answer_not_in_options_rejected() {
        let good = raw("Q1?", ["a", "b", "c", "d"], "a");
        let bad = raw("Q2?", ["a", "b", "c", "d"], "e");

        let err = QuestionSet::from_raw(vec![good, bad]).unwrap_err();
        assert_eq!(
            err,
            QuestionSetError::AnswerNotInOptions {
                index: 1,
                answer: "e".to_string()
            }
        );
    }

    #[test]
    fn test_option_order_preserved() {
        let set = QuestionSet::from_raw(vec![raw("Q?", ["d", "c", "b", "a"], "a")]).unwrap();
        assert_eq!(set.get(0).unwrap().options, vec!["d", "c", "b", "a"]);
    }
}
