// src/ledger.rs

//! Persistent store of quiz results and the student XP balance.
//!
//! The `(user_id, subject_id)` unique index is the concurrency primitive for
//! submits: two racing inserts produce one row and one unique-violation,
//! which is mapped to [`AppError::AlreadyAttempted`]. XP moves only through
//! in-place `xp = xp + ?` updates inside the same transaction as the result
//! write.

use std::{collections::HashSet, future::Future, time::Duration};

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::{
    error::AppError,
    models::result::{
        QuizResult, ResetOutcome, ResultFilter, ResultStatus, ResultSummary, StudentResultEntry,
        StudentResults, TeacherResultEntry, TeacherResults,
    },
    scoring::ScoreOutcome,
};

#[derive(Debug, Clone)]
pub struct AttemptLedger {
    pool: SqlitePool,
    timeout: Duration,
}

impl AttemptLedger {
    pub fn new(pool: SqlitePool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    pub(crate) fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs a storage call under the configured deadline. A dropped
    /// transaction rolls back, so an elapsed deadline never leaves a
    /// partial write behind.
    async fn bounded<T>(
        &self,
        fut: impl Future<Output = Result<T, AppError>>,
    ) -> Result<T, AppError> {
        tokio::time::timeout(self.timeout, fut).await?
    }

    pub async fn find(&self, student_id: i64, subject_id: i64) -> Result<Option<QuizResult>, AppError> {
        self.bounded(async {
            let result = sqlx::query_as::<_, QuizResult>(
                r#"
                SELECT id, user_id AS student_id, subject_id, score, correct_answers,
                       total_questions, status, xp_earned, submitted_at, retake_allowed
                FROM results
                WHERE user_id = ? AND subject_id = ?
                "#,
            )
            .bind(student_id)
            .bind(subject_id)
            .fetch_optional(&self.pool)
            .await?;
            Ok(result)
        })
        .await
    }

    /// Creates the result and credits its XP in one transaction.
    ///
    /// Fails with `AlreadyAttempted` (carrying the stored row) when another
    /// result for the pair exists, including one inserted by a concurrent
    /// submit after the caller's own check.
    pub async fn record_attempt(
        &self,
        student_id: i64,
        subject_id: i64,
        outcome: &ScoreOutcome,
    ) -> Result<QuizResult, AppError> {
        let inserted = self
            .bounded(async {
                let mut tx = self.pool.begin().await?;

                let credited = sqlx::query(
                    "UPDATE users SET xp = xp + ? WHERE id = ? AND role = 'student'",
                )
                .bind(outcome.xp_earned)
                .bind(student_id)
                .execute(&mut *tx)
                .await?;

                if credited.rows_affected() == 0 {
                    return Err(AppError::NotFound("Student not found".to_string()));
                }

                let insert = sqlx::query_as::<_, QuizResult>(
                    r#"
                    INSERT INTO results
                        (user_id, subject_id, score, correct_answers, total_questions,
                         status, xp_earned, submitted_at, retake_allowed)
                    VALUES (?, ?, ?, ?, ?, ?, ?, ?, FALSE)
                    RETURNING id, user_id AS student_id, subject_id, score, correct_answers,
                              total_questions, status, xp_earned, submitted_at, retake_allowed
                    "#,
                )
                .bind(student_id)
                .bind(subject_id)
                .bind(outcome.score)
                .bind(outcome.correct_count)
                .bind(outcome.total_count)
                .bind(outcome.status.as_str())
                .bind(outcome.xp_earned)
                .bind(Utc::now())
                .fetch_one(&mut *tx)
                .await;

                match insert {
                    Ok(result) => {
                        tx.commit().await?;
                        Ok(Some(result))
                    }
                    Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                        tx.rollback().await?;
                        Ok(None)
                    }
                    Err(e) => Err(e.into()),
                }
            })
            .await?;

        match inserted {
            Some(result) => Ok(result),
            None => {
                tracing::debug!(
                    student_id,
                    subject_id,
                    "Lost submit race on unique index, returning existing result"
                );
                match self.find(student_id, subject_id).await? {
                    Some(existing) => Err(AppError::AlreadyAttempted(Box::new(existing))),
                    None => Err(AppError::PersistenceError(
                        "conflicting result disappeared before it could be read".to_string(),
                    )),
                }
            }
        }
    }

    /// Sets `retake_allowed` on a result. Repeated calls are no-ops.
    pub async fn allow_retake(&self, result_id: i64) -> Result<QuizResult, AppError> {
        self.bounded(async {
            sqlx::query_as::<_, QuizResult>(
                r#"
                UPDATE results SET retake_allowed = TRUE
                WHERE id = ?
                RETURNING id, user_id AS student_id, subject_id, score, correct_answers,
                          total_questions, status, xp_earned, submitted_at, retake_allowed
                "#,
            )
            .bind(result_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Result not found".to_string()))
        })
        .await
    }

    /// Deletes an unlocked result and reverses its XP, floored at zero.
    ///
    /// The guarded delete must stay the first statement: a deferred SQLite
    /// transaction that reads first cannot upgrade to a write lock while
    /// another writer is active.
    pub async fn reset(&self, student_id: i64, subject_id: i64) -> Result<ResetOutcome, AppError> {
        self.bounded(async {
            let mut tx = self.pool.begin().await?;

            let deleted = sqlx::query_as::<_, (i64, i64)>(
                r#"
                DELETE FROM results
                WHERE user_id = ? AND subject_id = ? AND retake_allowed = TRUE
                RETURNING id, xp_earned
                "#,
            )
            .bind(student_id)
            .bind(subject_id)
            .fetch_optional(&mut *tx)
            .await?;

            let Some((_, xp_earned)) = deleted else {
                let locked: Option<i64> = sqlx::query_scalar(
                    "SELECT id FROM results WHERE user_id = ? AND subject_id = ?",
                )
                .bind(student_id)
                .bind(subject_id)
                .fetch_optional(&mut *tx)
                .await?;
                tx.rollback().await?;

                return Err(AppError::RetakeNotAuthorized {
                    result_id: locked,
                    retake_allowed: false,
                });
            };

            let xp_balance: i64 = sqlx::query_scalar(
                "UPDATE users SET xp = MAX(0, xp - ?) WHERE id = ? RETURNING xp",
            )
            .bind(xp_earned)
            .bind(student_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;

            tx.commit().await?;

            Ok(ResetOutcome {
                subject_id,
                xp_reversed: xp_earned,
                xp_balance,
            })
        })
        .await
    }

    /// All results of one student, newest first, with their XP total.
    pub async fn list_for_student(&self, student_id: i64) -> Result<StudentResults, AppError> {
        let results = self
            .bounded(async {
                let rows = sqlx::query_as::<_, StudentResultEntry>(
                    r#"
                    SELECT r.id, r.subject_id,
                           s.name AS subject_name, s.icon AS subject_icon, s.color AS subject_color,
                           r.score, r.correct_answers, r.total_questions, r.status,
                           r.xp_earned, r.submitted_at, r.retake_allowed
                    FROM results r
                    JOIN subjects s ON s.id = r.subject_id
                    WHERE r.user_id = ?
                    ORDER BY r.submitted_at DESC, r.id DESC
                    "#,
                )
                .bind(student_id)
                .fetch_all(&self.pool)
                .await?;
                Ok(rows)
            })
            .await?;

        let total_xp = results.iter().map(|r| r.xp_earned).sum();
        let total_quizzes = results.len();

        Ok(StudentResults {
            results,
            total_xp,
            total_quizzes,
        })
    }

    /// Results across all students for the teacher view, with a summary of
    /// unique students per status.
    pub async fn list_for_teacher(&self, filter: &ResultFilter) -> Result<TeacherResults, AppError> {
        let results = self
            .bounded(async {
                let mut query_builder = QueryBuilder::<Sqlite>::new(
                    r#"
                    SELECT r.id, r.user_id AS student_id,
                           u.name AS student_name, u.email AS student_email,
                           r.subject_id, s.name AS subject_name,
                           r.score, r.status, r.xp_earned, r.submitted_at, r.retake_allowed
                    FROM results r
                    JOIN users u ON u.id = r.user_id
                    JOIN subjects s ON s.id = r.subject_id
                    WHERE 1 = 1
                    "#,
                );

                if let Some(subject_id) = filter.subject_id {
                    query_builder.push(" AND r.subject_id = ").push_bind(subject_id);
                }
                if let Some(status) = filter.status {
                    query_builder.push(" AND r.status = ").push_bind(status.as_str());
                }
                query_builder.push(" ORDER BY r.submitted_at DESC, r.id DESC");

                let rows: Vec<TeacherResultEntry> = query_builder
                    .build_query_as()
                    .fetch_all(&self.pool)
                    .await?;
                Ok(rows)
            })
            .await?;

        let summary = summarize(&results);
        Ok(TeacherResults { results, summary })
    }
}

fn summarize(results: &[TeacherResultEntry]) -> ResultSummary {
    let unique = |status: Option<ResultStatus>| {
        results
            .iter()
            .filter(|r| status.is_none_or(|s| r.status == s))
            .map(|r| r.student_id)
            .collect::<HashSet<_>>()
            .len()
    };

    ResultSummary {
        total: unique(None),
        doing_fine: unique(Some(ResultStatus::DoingFine)),
        needs_support: unique(Some(ResultStatus::NeedsSupport)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(student_id: i64, subject_id: i64, status: ResultStatus) -> TeacherResultEntry {
        TeacherResultEntry {
            id: student_id * 100 + subject_id,
            student_id,
            student_name: format!("s{student_id}"),
            student_email: format!("s{student_id}@example.com"),
            subject_id,
            subject_name: format!("subject {subject_id}"),
            score: 0,
            status,
            xp_earned: 0,
            submitted_at: Utc::now(),
            retake_allowed: false,
        }
    }

    #[test]
    fn test_summary_counts_unique_students() {
        let rows = vec![
            entry(1, 1, ResultStatus::DoingFine),
            entry(1, 2, ResultStatus::NeedsSupport),
            entry(2, 1, ResultStatus::DoingFine),
            entry(2, 2, ResultStatus::DoingFine),
        ];
        assert_eq!(
            summarize(&rows),
            ResultSummary {
                total: 2,
                doing_fine: 2,
                needs_support: 1,
            }
        );
    }

    #[test]
    fn test_summary_of_nothing_is_zero() {
        assert_eq!(summarize(&[]), ResultSummary::default());
    }
}
