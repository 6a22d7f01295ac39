// src/models/subject.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::result::ResultStatus;

/// Represents the 'subjects' table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Subject {
    pub id: i64,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub description: String,
    pub total_questions: i64,
}

/// A subject annotated with the current student's progress.
#[derive(Debug, Serialize, FromRow)]
pub struct SubjectWithProgress {
    pub id: i64,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub description: String,
    pub completed: bool,
    pub score: Option<i64>,
    pub status: Option<ResultStatus>,
    /// True when the student's result asks for remedial practice.
    pub remedial_available: bool,
}
