// src/questions/generating.rs

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;

use crate::{
    config::{GENERATED_QUESTION_COUNT, QUIZ_QUESTION_LIMIT},
    error::AppError,
    models::{question::Question, subject::Subject},
    questions::{QuestionGenerator, QuestionSupplier, SqlQuestionBank},
};

/// Serves stored questions and tops up empty pools from a generator.
#[derive(Clone)]
pub struct GeneratingSupplier {
    bank: SqlQuestionBank,
    generator: Option<Arc<dyn QuestionGenerator>>,
}

impl GeneratingSupplier {
    pub fn new(bank: SqlQuestionBank, generator: Option<Arc<dyn QuestionGenerator>>) -> Self {
        Self { bank, generator }
    }

    /// Questions for a quiz. With `fresh`, a new batch is generated even when
    /// stored questions exist; stored questions remain the fallback.
    pub async fn quiz_questions(&self, subject_id: i64, fresh: bool) -> Result<Vec<Question>, AppError> {
        let subject = self.bank.subject(subject_id).await?;

        let stored = if fresh {
            Vec::new()
        } else {
            self.bank.stored(subject_id, false, Some(QUIZ_QUESTION_LIMIT)).await?
        };

        if !stored.is_empty() {
            return Ok(stored);
        }

        let generated = self.generate_and_store(&subject, false).await?;
        if !generated.is_empty() {
            return Ok(generated);
        }

        if fresh {
            tracing::info!("Generation returned nothing for '{}', using stored questions", subject.name);
        }
        let fallback = self.bank.stored(subject_id, false, Some(QUIZ_QUESTION_LIMIT)).await?;
        if fallback.is_empty() {
            return Err(AppError::NoQuestionsAvailable(subject_id));
        }
        Ok(fallback)
    }

    /// Remedial practice questions. An empty remedial pool is generated once
    /// when possible, otherwise the bank falls back to ordinary questions.
    pub async fn remedial_questions(&self, subject_id: i64) -> Result<Vec<Question>, AppError> {
        let subject = self.bank.subject(subject_id).await?;

        if self.bank.stored(subject_id, true, Some(1)).await?.is_empty() {
            let generated = self.generate_and_store(&subject, true).await?;
            if !generated.is_empty() {
                return Ok(generated);
            }
        }

        self.bank.list_questions(subject_id, true).await
    }

    async fn generate_and_store(&self, subject: &Subject, remedial: bool) -> Result<Vec<Question>, AppError> {
        let Some(generator) = &self.generator else {
            return Ok(Vec::new());
        };

        tracing::info!("Generating new questions for {}...", subject.name);
        let batch = generator
            .generate(&subject.name, GENERATED_QUESTION_COUNT, remedial)
            .await;
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        self.bank.insert_questions(subject.id, &batch).await
    }
}

#[async_trait]
impl QuestionSupplier for GeneratingSupplier {
    async fn subject(&self, subject_id: i64) -> Result<Subject, AppError> {
        self.bank.subject(subject_id).await
    }

    async fn list_questions(
        &self,
        subject_id: i64,
        remedial_only: bool,
    ) -> Result<Vec<Question>, AppError> {
        if remedial_only {
            self.remedial_questions(subject_id).await
        } else {
            self.quiz_questions(subject_id, false).await
        }
    }

    async fn answer_key(
        &self,
        subject_id: i64,
        question_ids: &[i64],
    ) -> Result<HashMap<i64, i64>, AppError> {
        self.bank.answer_key(subject_id, question_ids).await
    }
}
