// src/handlers/quiz.rs

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::result::{AllowRetakeRequest, ResetRequest, ResultFilter, SubmitQuizRequest},
    progression::ProgressionController,
    utils::jwt::Claims,
};

/// Submits the caller's answers for a subject.
///
/// * 201 with the scored outcome on the first attempt.
/// * 409 `already_attempted` with the stored result otherwise.
pub async fn submit_quiz(
    State(progression): State<ProgressionController>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SubmitQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let outcome = progression
        .submit(claims.user_id(), req.subject_id, &req.answers)
        .await?;

    Ok((StatusCode::CREATED, Json(outcome)))
}

/// Lists the caller's results with their XP total.
pub async fn get_student_results(
    State(progression): State<ProgressionController>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let results = progression.student_results(claims.user_id()).await?;
    Ok(Json(results))
}

/// Lists results of all students, optionally filtered by subject and status.
/// Teacher only.
pub async fn get_teacher_results(
    State(progression): State<ProgressionController>,
    Extension(claims): Extension<Claims>,
    Query(filter): Query<ResultFilter>,
) -> Result<impl IntoResponse, AppError> {
    let results = progression.teacher_results(&claims, &filter).await?;
    Ok(Json(results))
}

/// Returns the caller's result for one subject.
pub async fn get_result(
    State(progression): State<ProgressionController>,
    Extension(claims): Extension<Claims>,
    Path(subject_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = progression.get_result(claims.user_id(), subject_id).await?;
    Ok(Json(serde_json::json!({
        "remedial_eligible": ProgressionController::remedial_eligibility(&result),
        "result": result,
    })))
}

/// Consumes a teacher-unlocked retake: deletes the result and reverses its XP.
pub async fn reset_quiz(
    State(progression): State<ProgressionController>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<ResetRequest>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = progression
        .reset_for_retake(claims.user_id(), req.subject_id)
        .await?;

    Ok(Json(serde_json::json!({
        "message": "Quiz reset successfully",
        "subject_id": outcome.subject_id,
        "xp_reversed": outcome.xp_reversed,
        "xp_balance": outcome.xp_balance,
    })))
}

/// Allows a student to retake a quiz. Teacher only.
pub async fn allow_retake(
    State(progression): State<ProgressionController>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<AllowRetakeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let result = progression.allow_retake(&claims, req.result_id).await?;

    Ok(Json(serde_json::json!({
        "message": "Retake allowed for student",
        "result": result,
    })))
}
