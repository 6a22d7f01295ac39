// src/routes.rs

use axum::{
    Json, Router,
    http::Method,
    middleware,
    routing::{get, post},
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{profile, questions, quiz, subjects},
    state::AppState,
    utils::jwt::{auth_middleware, teacher_middleware},
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (subjects, questions, quiz, profile).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            "http://localhost:5173".parse().expect("static origin"),
            "http://127.0.0.1:5173".parse().expect("static origin"),
        ])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let auth = middleware::from_fn_with_state(state.clone(), auth_middleware);

    let subject_routes = Router::new()
        .route("/", get(subjects::list_subjects))
        .route("/{id}", get(subjects::get_subject));

    let question_routes = Router::new()
        .route("/{subject_id}", get(questions::get_quiz_questions))
        .route("/{subject_id}/remedial", get(questions::get_remedial_questions));

    let quiz_routes = Router::new()
        .route("/submit", post(quiz::submit_quiz))
        .route("/reset", post(quiz::reset_quiz))
        .route("/results/student", get(quiz::get_student_results))
        .route("/results/{subject_id}", get(quiz::get_result))
        // Teacher-only quiz routes
        .merge(
            Router::new()
                .route("/results/teacher", get(quiz::get_teacher_results))
                .route("/allow-retake", post(quiz::allow_retake))
                .layer(middleware::from_fn(teacher_middleware)),
        );

    let protected = Router::new()
        .nest("/subjects", subject_routes)
        .nest("/questions", question_routes)
        .nest("/quiz", quiz_routes)
        .route("/me", get(profile::get_me))
        .layer(auth);

    Router::new()
        .route(
            "/api/health",
            get(|| async { Json(json!({ "status": "OK", "message": "Server is running" })) }),
        )
        .nest("/api", protected)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
