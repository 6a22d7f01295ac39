// src/models/student.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'users' table. Both students and teachers live here;
/// only students accumulate XP.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub email: String,

    /// 'student' or 'teacher'.
    pub role: String,

    /// XP balance. Written only by the progression controller.
    pub xp: i64,

    pub streak: i64,
}
