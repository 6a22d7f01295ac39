use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::{
    config::Config,
    ledger::AttemptLedger,
    progression::ProgressionController,
    questions::{GeminiGenerator, GeneratingSupplier, QuestionGenerator, SqlQuestionBank},
};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub questions: GeneratingSupplier,
    pub progression: ProgressionController,
}

impl AppState {
    /// Wires the suppliers and the controller over one pool.
    /// A generator is attached only when an API key is configured.
    pub fn new(pool: SqlitePool, config: Config) -> Result<Self, crate::error::AppError> {
        let generator: Option<Arc<dyn QuestionGenerator>> = match &config.gemini_api_key {
            Some(key) => Some(Arc::new(GeminiGenerator::new(
                key,
                &config.gemini_model,
                &config.gemini_base_url,
            )?)),
            None => None,
        };

        let questions = GeneratingSupplier::new(SqlQuestionBank::new(pool.clone()), generator);
        let ledger = AttemptLedger::new(pool.clone(), config.persistence_timeout());
        let progression = ProgressionController::new(ledger, Arc::new(questions.clone()));

        Ok(Self {
            pool,
            config,
            questions,
            progression,
        })
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for GeneratingSupplier {
    fn from_ref(state: &AppState) -> Self {
        state.questions.clone()
    }
}

impl FromRef<AppState> for ProgressionController {
    fn from_ref(state: &AppState) -> Self {
        state.progression.clone()
    }
}
