// src/questions/bank.rs

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool, types::Json};

use crate::{
    config::{QUIZ_QUESTION_LIMIT, REMEDIAL_FALLBACK_LIMIT},
    error::AppError,
    models::{
        question::{NewQuestion, Question},
        subject::Subject,
    },
    questions::QuestionSupplier,
    utils::html::clean_html,
};

/// Questions stored in the 'questions' table.
#[derive(Debug, Clone)]
pub struct SqlQuestionBank {
    pool: SqlitePool,
}

impl SqlQuestionBank {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Stored questions of one pool, oldest first.
    pub async fn stored(
        &self,
        subject_id: i64,
        remedial: bool,
        limit: Option<i64>,
    ) -> Result<Vec<Question>, AppError> {
        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, subject_id, question_text, options, correct_answer, is_remedial, difficulty
            FROM questions
            WHERE subject_id = ? AND is_remedial = ?
            ORDER BY id
            LIMIT ?
            "#,
        )
        .bind(subject_id)
        .bind(remedial)
        // SQLite treats a negative LIMIT as unbounded.
        .bind(limit.unwrap_or(-1))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch questions for subject {}: {:?}", subject_id, e);
            AppError::from(e)
        })?;

        Ok(questions)
    }

    /// Persists new questions in one transaction. Question and option text
    /// is sanitized, generated batches come from an external model.
    pub async fn insert_questions(
        &self,
        subject_id: i64,
        questions: &[NewQuestion],
    ) -> Result<Vec<Question>, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut stored = Vec::with_capacity(questions.len());

        for q in questions {
            let options: Vec<String> = q.options.iter().map(|o| clean_html(o)).collect();
            let question = sqlx::query_as::<_, Question>(
                r#"
                INSERT INTO questions (subject_id, question_text, options, correct_answer, is_remedial)
                VALUES (?, ?, ?, ?, ?)
                RETURNING id, subject_id, question_text, options, correct_answer, is_remedial, difficulty
                "#,
            )
            .bind(subject_id)
            .bind(clean_html(&q.question_text))
            .bind(Json(options))
            .bind(q.correct_answer)
            .bind(q.is_remedial)
            .fetch_one(&mut *tx)
            .await?;
            stored.push(question);
        }

        tx.commit().await?;
        tracing::info!("Stored {} questions for subject {}", stored.len(), subject_id);
        Ok(stored)
    }
}

#[async_trait]
impl QuestionSupplier for SqlQuestionBank {
    async fn subject(&self, subject_id: i64) -> Result<Subject, AppError> {
        sqlx::query_as::<_, Subject>(
            "SELECT id, name, icon, color, description, total_questions FROM subjects WHERE id = ?",
        )
        .bind(subject_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::SubjectNotFound(subject_id))
    }

    async fn list_questions(
        &self,
        subject_id: i64,
        remedial_only: bool,
    ) -> Result<Vec<Question>, AppError> {
        // Distinguish an unknown subject from an empty pool.
        self.subject(subject_id).await?;

        let questions = if remedial_only {
            let remedial = self.stored(subject_id, true, None).await?;
            if remedial.is_empty() {
                self.stored(subject_id, false, Some(REMEDIAL_FALLBACK_LIMIT)).await?
            } else {
                remedial
            }
        } else {
            self.stored(subject_id, false, Some(QUIZ_QUESTION_LIMIT)).await?
        };

        if questions.is_empty() {
            return Err(AppError::NoQuestionsAvailable(subject_id));
        }
        Ok(questions)
    }

    async fn answer_key(
        &self,
        subject_id: i64,
        question_ids: &[i64],
    ) -> Result<HashMap<i64, i64>, AppError> {
        if question_ids.is_empty() {
            return Ok(HashMap::new());
        }

        // Use QueryBuilder for dynamic IN clause
        let mut query_builder =
            QueryBuilder::<Sqlite>::new("SELECT id, correct_answer FROM questions WHERE subject_id = ");
        query_builder.push_bind(subject_id).push(" AND id IN (");
        let mut separated = query_builder.separated(",");
        for id in question_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let rows: Vec<(i64, i64)> = query_builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().collect())
    }
}
