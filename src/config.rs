// src/config.rs

use std::env;
use std::time::Duration;

use dotenvy::dotenv;

/// Score (percent) at or above which a student is "doing fine".
pub const SUPPORT_THRESHOLD_PERCENT: i64 = 40;

/// Base XP granted per correct answer.
pub const XP_PER_CORRECT: i64 = 10;

/// Bonus tiers, evaluated top-down. At most one applies.
pub const EXCELLENT_SCORE: i64 = 80;
pub const EXCELLENT_BONUS_XP: i64 = 50;
pub const GOOD_SCORE: i64 = 60;
pub const GOOD_BONUS_XP: i64 = 25;

/// Max ordinary questions handed out per quiz.
pub const QUIZ_QUESTION_LIMIT: i64 = 10;

/// Number of questions requested from the generator when a pool is empty.
pub const GENERATED_QUESTION_COUNT: usize = 5;

/// Ordinary questions served as remedial practice when a subject has no remedial pool.
pub const REMEDIAL_FALLBACK_LIMIT: i64 = 5;

const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub bind_addr: String,
    pub persistence_timeout_ms: u64,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set");

        let jwt_secret = env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30 * 24 * 60 * 60);

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:5000".to_string());

        let persistence_timeout_ms = env::var("PERSISTENCE_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3000);

        // Empty key means generation is disabled.
        let gemini_api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        let gemini_model = env::var("GEMINI_MODEL")
            .unwrap_or_else(|_| "gemini-2.5-flash".to_string());

        let gemini_base_url = env::var("GEMINI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string());

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            bind_addr,
            persistence_timeout_ms,
            gemini_api_key,
            gemini_model,
            gemini_base_url,
        }
    }

    pub fn persistence_timeout(&self) -> Duration {
        Duration::from_millis(self.persistence_timeout_ms)
    }

    /// Configuration for tests and tooling: no generator, short timeouts.
    pub fn for_testing(database_url: &str, jwt_secret: &str) -> Self {
        Self {
            database_url: database_url.to_string(),
            jwt_secret: jwt_secret.to_string(),
            jwt_expiration: 600,
            rust_log: "error".to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
            persistence_timeout_ms: 3000,
            gemini_api_key: None,
            gemini_model: "gemini-2.5-flash".to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }
}
