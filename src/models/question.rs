// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::Validate;

/// Represents the 'questions' table in the database.
/// Rows are immutable once inserted.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub subject_id: i64,

    /// The text content of the question.
    pub question_text: String,

    /// Exactly four options, stored as a JSON array.
    pub options: Json<Vec<String>>,

    /// Index (0..=3) of the correct option. Never serialized to quiz takers;
    /// see [`PublicQuestion`].
    pub correct_answer: i64,

    /// Remedial questions form a separate practice pool.
    pub is_remedial: bool,

    /// 'easy', 'medium' or 'hard'.
    pub difficulty: String,
}

/// DTO for sending a question to the client (excludes the correct answer).
#[derive(Debug, Serialize, Deserialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub question_text: String,
    pub options: Vec<String>,
}

impl From<Question> for PublicQuestion {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            question_text: q.question_text,
            options: q.options.0,
        }
    }
}

/// A question as produced by a generator, before it gets an id.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewQuestion {
    #[validate(length(min = 1, max = 1000))]
    pub question_text: String,
    #[validate(custom(function = validate_options))]
    pub options: Vec<String>,
    #[validate(range(min = 0, max = 3))]
    pub correct_answer: i64,
    #[serde(default)]
    pub is_remedial: bool,
}

fn validate_options(options: &[String]) -> Result<(), validator::ValidationError> {
    if options.len() != 4 {
        return Err(validator::ValidationError::new("options_must_have_four_entries"));
    }
    for opt in options {
        if opt.trim().is_empty() {
            return Err(validator::ValidationError::new("option_cannot_be_empty"));
        }
        if opt.len() > 500 {
            return Err(validator::ValidationError::new("option_too_long"));
        }
    }
    Ok(())
}

/// Query parameters for fetching a quiz.
#[derive(Debug, Default, Deserialize)]
pub struct QuestionListParams {
    /// Ask the generator for a new batch even if stored questions exist.
    #[serde(default)]
    pub fresh: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NewQuestion {
        NewQuestion {
            question_text: "What is 2+2?".to_string(),
            options: vec!["3".into(), "4".into(), "5".into(), "6".into()],
            correct_answer: 1,
            is_remedial: false,
        }
    }

    #[test]
    fn test_valid_question_passes() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_three_options_rejected() {
        let mut q = sample();
        q.options.pop();
        assert!(q.validate().is_err());
    }

    #[test]
    fn test_correct_answer_out_of_range_rejected() {
        let mut q = sample();
        q.correct_answer = 4;
        assert!(q.validate().is_err());
    }

    #[test]
    fn test_public_question_hides_answer() {
        let q = Question {
            id: 7,
            subject_id: 1,
            question_text: "Q".to_string(),
            options: Json(vec!["a".into(), "b".into(), "c".into(), "d".into()]),
            correct_answer: 2,
            is_remedial: false,
            difficulty: "medium".to_string(),
        };
        let json = serde_json::to_value(PublicQuestion::from(q)).unwrap();
        assert!(json.get("correct_answer").is_none());
        assert_eq!(json["id"], 7);
    }
}
