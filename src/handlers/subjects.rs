// src/handlers/subjects.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::subject::SubjectWithProgress,
    questions::{GeneratingSupplier, QuestionSupplier},
    utils::jwt::Claims,
};

/// Lists every subject with the caller's progress on it.
pub async fn list_subjects(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let subjects = sqlx::query_as::<_, SubjectWithProgress>(
        r#"
        SELECT
            s.id, s.name, s.icon, s.color, s.description,
            (r.id IS NOT NULL) AS completed,
            r.score,
            r.status,
            (COALESCE(r.status, '') = 'needs_support') AS remedial_available
        FROM subjects s
        LEFT JOIN results r ON r.subject_id = s.id AND r.user_id = ?
        ORDER BY s.id
        "#,
    )
    .bind(claims.user_id())
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list subjects: {:?}", e);
        AppError::from(e)
    })?;

    Ok(Json(subjects))
}

pub async fn get_subject(
    State(questions): State<GeneratingSupplier>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let subject = questions.subject(id).await?;
    Ok(Json(subject))
}
