// src/questions/mod.rs

//! Question suppliers. The progression core only sees [`QuestionSupplier`];
//! where questions come from (stored bank, generator) stays behind it.

pub mod bank;
pub mod gemini;
pub mod generating;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{question::Question, subject::Subject},
};

pub use bank::SqlQuestionBank;
pub use gemini::GeminiGenerator;
pub use generating::GeneratingSupplier;

/// Opaque source of quiz questions for a subject.
#[async_trait]
pub trait QuestionSupplier: Send + Sync {
    /// Resolves a subject, failing with `SubjectNotFound`.
    async fn subject(&self, subject_id: i64) -> Result<Subject, AppError>;

    /// Questions for a quiz (`remedial_only = false`) or for remedial practice.
    /// Never returns an empty batch: empty means `NoQuestionsAvailable`.
    async fn list_questions(
        &self,
        subject_id: i64,
        remedial_only: bool,
    ) -> Result<Vec<Question>, AppError>;

    /// Correct option index per question id of the subject. Unknown ids and
    /// questions of other subjects are absent.
    async fn answer_key(
        &self,
        subject_id: i64,
        question_ids: &[i64],
    ) -> Result<HashMap<i64, i64>, AppError>;
}

/// Something that can invent new questions for a subject.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// Returns validated questions. Failures are reported as an empty batch.
    async fn generate(
        &self,
        subject_name: &str,
        count: usize,
        remedial: bool,
    ) -> Vec<crate::models::question::NewQuestion>;
}
