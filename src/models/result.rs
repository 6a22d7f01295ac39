// src/models/result.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Classification of a scored attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ResultStatus {
    DoingFine,
    NeedsSupport,
}

impl ResultStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultStatus::DoingFine => "doing_fine",
            ResultStatus::NeedsSupport => "needs_support",
        }
    }
}

/// Represents the 'results' table: the one scored attempt of a student
/// for a subject. Unique per (student_id, subject_id).
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct QuizResult {
    pub id: i64,
    pub student_id: i64,
    pub subject_id: i64,
    pub score: i64,
    pub correct_answers: i64,
    pub total_questions: i64,
    pub status: ResultStatus,
    pub xp_earned: i64,
    pub submitted_at: DateTime<Utc>,
    pub retake_allowed: bool,
}

impl QuizResult {
    /// Whether a consuming UI should offer remedial practice.
    /// Derived, never stored.
    pub fn remedial_eligible(&self) -> bool {
        self.status == ResultStatus::NeedsSupport
    }
}

/// One answered question in a submission.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct AnswerSubmission {
    pub question_id: i64,
    #[validate(range(min = 0, max = 3))]
    pub selected_answer: i64,
}

/// DTO for submitting a quiz attempt.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct SubmitQuizRequest {
    pub subject_id: i64,
    #[validate(length(min = 1, max = 100), nested)]
    pub answers: Vec<AnswerSubmission>,
}

/// DTO returned by a successful submit.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitOutcome {
    pub result: QuizResult,
    pub correct_count: i64,
    pub total_questions: i64,
    pub score: i64,
    pub status: ResultStatus,
    pub xp_earned: i64,
    pub remedial_eligible: bool,
    pub message: String,
}

/// DTO for resetting a result ahead of a retake.
#[derive(Debug, Deserialize, Serialize)]
pub struct ResetRequest {
    pub subject_id: i64,
}

/// DTO returned after a reset.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResetOutcome {
    pub subject_id: i64,
    pub xp_reversed: i64,
    pub xp_balance: i64,
}

/// DTO for a teacher unlocking a retake.
#[derive(Debug, Deserialize, Serialize)]
pub struct AllowRetakeRequest {
    pub result_id: i64,
}

/// A student's result joined with its subject, for the student history view.
#[derive(Debug, Serialize, FromRow)]
pub struct StudentResultEntry {
    pub id: i64,
    pub subject_id: i64,
    pub subject_name: String,
    pub subject_icon: String,
    pub subject_color: String,
    pub score: i64,
    pub correct_answers: i64,
    pub total_questions: i64,
    pub status: ResultStatus,
    pub xp_earned: i64,
    pub submitted_at: DateTime<Utc>,
    pub retake_allowed: bool,
}

#[derive(Debug, Serialize)]
pub struct StudentResults {
    pub results: Vec<StudentResultEntry>,
    pub total_xp: i64,
    pub total_quizzes: usize,
}

/// A result joined with its student and subject, for the teacher dashboard.
#[derive(Debug, Serialize, FromRow)]
pub struct TeacherResultEntry {
    pub id: i64,
    pub student_id: i64,
    pub student_name: String,
    pub student_email: String,
    pub subject_id: i64,
    pub subject_name: String,
    pub score: i64,
    pub status: ResultStatus,
    pub xp_earned: i64,
    pub submitted_at: DateTime<Utc>,
    pub retake_allowed: bool,
}

/// Unique-student counts across the filtered results.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub total: usize,
    pub doing_fine: usize,
    pub needs_support: usize,
}

#[derive(Debug, Serialize)]
pub struct TeacherResults {
    pub results: Vec<TeacherResultEntry>,
    pub summary: ResultSummary,
}

/// Query parameters for the teacher results view.
#[derive(Debug, Default, Deserialize)]
pub struct ResultFilter {
    pub subject_id: Option<i64>,
    pub status: Option<ResultStatus>,
}
