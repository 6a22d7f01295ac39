// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::models::result::QuizResult;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
///
/// The first five variants are expected business outcomes. They are returned
/// to the caller as structured payloads and never logged as incidents.
#[derive(Debug, Error)]
pub enum AppError {
    /// The student already has a result for this subject. Carries it so the
    /// caller can render it without a follow-up query.
    #[error("Quiz already attempted for subject {}", .0.subject_id)]
    AlreadyAttempted(Box<QuizResult>),

    // 404 Not Found
    #[error("{0}")]
    NotFound(String),

    /// Reset requested without a teacher-unlocked result.
    #[error("Retake not authorized by teacher")]
    RetakeNotAuthorized {
        result_id: Option<i64>,
        retake_allowed: bool,
    },

    #[error("Subject {0} not found")]
    SubjectNotFound(i64),

    #[error("No questions available for subject {0}")]
    NoQuestionsAvailable(i64),

    /// Storage fault or timeout. Nothing was written; safe to retry.
    #[error("Persistence error: {0}")]
    PersistenceError(String),

    // 400 Bad Request
    #[error("{0}")]
    BadRequest(String),

    // 401 Unauthorized
    #[error("{0}")]
    AuthError(String),

    // 403 Forbidden
    #[error("{0}")]
    Forbidden(String),

    // 500 Internal Server Error
    #[error("Internal error: {0}")]
    InternalServerError(String),
}

impl AppError {
    /// Stable machine-readable kind, part of the public error contract.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::AlreadyAttempted(_) => "already_attempted",
            AppError::NotFound(_) => "not_found",
            AppError::RetakeNotAuthorized { .. } => "retake_not_authorized",
            AppError::SubjectNotFound(_) => "subject_not_found",
            AppError::NoQuestionsAvailable(_) => "no_questions_available",
            AppError::PersistenceError(_) => "persistence_error",
            AppError::BadRequest(_) => "bad_request",
            AppError::AuthError(_) => "unauthorized",
            AppError::Forbidden(_) => "forbidden",
            AppError::InternalServerError(_) => "internal_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::AlreadyAttempted(_) => StatusCode::CONFLICT,
            AppError::NotFound(_)
            | AppError::SubjectNotFound(_)
            | AppError::NoQuestionsAvailable(_) => StatusCode::NOT_FOUND,
            AppError::RetakeNotAuthorized { .. } | AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::PersistenceError(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::AuthError(_) => StatusCode::UNAUTHORIZED,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let kind = self.kind();

        let body = match self {
            AppError::AlreadyAttempted(result) => json!({
                "error": "You have already attempted this quiz",
                "kind": kind,
                "result": result,
            }),
            AppError::RetakeNotAuthorized {
                result_id,
                retake_allowed,
            } => json!({
                "error": "Retake not authorized by teacher",
                "kind": kind,
                "result_id": result_id,
                "retake_allowed": retake_allowed,
            }),
            AppError::PersistenceError(msg) => {
                tracing::error!("Persistence error: {}", msg);
                json!({
                    "error": "Storage temporarily unavailable, please retry",
                    "kind": kind,
                })
            }
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                json!({
                    "error": "Internal Server Error",
                    "kind": kind,
                })
            }
            other => json!({
                "error": other.to_string(),
                "kind": kind,
            }),
        };

        (status, Json(body)).into_response()
    }
}

/// Converts `sqlx::Error` into `AppError::PersistenceError`.
/// Allows using `?` operator on database queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::PersistenceError(err.to_string())
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        AppError::PersistenceError("storage call timed out".to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
