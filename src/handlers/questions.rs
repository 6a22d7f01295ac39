// src/handlers/questions.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};

use crate::{
    error::AppError,
    models::question::{PublicQuestion, QuestionListParams},
    questions::GeneratingSupplier,
};

/// Quiz questions for a subject, without correct answers.
/// `?fresh=true` asks the generator for a new batch.
pub async fn get_quiz_questions(
    State(questions): State<GeneratingSupplier>,
    Path(subject_id): Path<i64>,
    Query(params): Query<QuestionListParams>,
) -> Result<impl IntoResponse, AppError> {
    let batch = questions.quiz_questions(subject_id, params.fresh).await?;
    let public: Vec<PublicQuestion> = batch.into_iter().map(PublicQuestion::from).collect();
    Ok(Json(public))
}

/// Remedial practice questions. Read-only: practice never touches results or XP.
pub async fn get_remedial_questions(
    State(questions): State<GeneratingSupplier>,
    Path(subject_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let batch = questions.remedial_questions(subject_id).await?;
    let public: Vec<PublicQuestion> = batch.into_iter().map(PublicQuestion::from).collect();
    Ok(Json(public))
}
