// tests/common/mod.rs

#![allow(dead_code)]

use std::{path::PathBuf, sync::Arc, time::Duration};

use quizhub_backend::{
    ledger::AttemptLedger,
    models::result::AnswerSubmission,
    progression::ProgressionController,
    questions::SqlQuestionBank,
};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

/// Fresh in-memory database with the schema applied.
/// A single connection, so every handle sees the same database.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    pool
}

/// File-backed database shared by several connections, the way the server
/// runs it. Returns the path so the caller can remove it.
pub async fn file_pool(max_connections: u32) -> (SqlitePool, PathBuf) {
    let path = std::env::temp_dir().join(format!("quizhub_{}.db", uuid::Uuid::new_v4()));
    let options = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .expect("Failed to open file-backed SQLite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    (pool, path)
}

pub async fn remove_file_pool(pool: SqlitePool, path: PathBuf) {
    pool.close().await;
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
    }
}

pub fn ledger(pool: &SqlitePool, timeout: Duration) -> AttemptLedger {
    AttemptLedger::new(pool.clone(), timeout)
}

pub fn controller(pool: &SqlitePool) -> ProgressionController {
    controller_with_timeout(pool, Duration::from_secs(3))
}

pub fn controller_with_timeout(pool: &SqlitePool, timeout: Duration) -> ProgressionController {
    ProgressionController::new(
        ledger(pool, timeout),
        Arc::new(SqlQuestionBank::new(pool.clone())),
    )
}

pub async fn create_user(pool: &SqlitePool, role: &str) -> i64 {
    let email = format!("{}_{}@example.com", role, &uuid::Uuid::new_v4().to_string()[..8]);
    sqlx::query_scalar("INSERT INTO users (name, email, role) VALUES (?, ?, ?) RETURNING id")
        .bind(format!("Test {}", role))
        .bind(email)
        .bind(role)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn create_student(pool: &SqlitePool) -> i64 {
    create_user(pool, "student").await
}

pub async fn create_teacher(pool: &SqlitePool) -> i64 {
    create_user(pool, "teacher").await
}

pub async fn create_subject(pool: &SqlitePool, name: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO subjects (name) VALUES (?) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Inserts `count` questions whose correct option is index 0.
pub async fn create_questions(pool: &SqlitePool, subject_id: i64, count: usize, remedial: bool) -> Vec<i64> {
    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO questions (subject_id, question_text, options, correct_answer, is_remedial)
            VALUES (?, ?, ?, 0, ?)
            RETURNING id
            "#,
        )
        .bind(subject_id)
        .bind(format!("Question {}", i))
        .bind(r#"["A","B","C","D"]"#)
        .bind(remedial)
        .fetch_one(pool)
        .await
        .unwrap();
        ids.push(id);
    }
    ids
}

/// Answers every question, getting the first `correct` of them right.
pub fn answers(question_ids: &[i64], correct: usize) -> Vec<AnswerSubmission> {
    question_ids
        .iter()
        .enumerate()
        .map(|(i, id)| AnswerSubmission {
            question_id: *id,
            selected_answer: if i < correct { 0 } else { 1 },
        })
        .collect()
}

pub async fn xp_of(pool: &SqlitePool, user_id: i64) -> i64 {
    sqlx::query_scalar("SELECT xp FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn result_count(pool: &SqlitePool, user_id: i64, subject_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM results WHERE user_id = ? AND subject_id = ?")
        .bind(user_id)
        .bind(subject_id)
        .fetch_one(pool)
        .await
        .unwrap()
}
