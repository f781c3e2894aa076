use std::sync::Arc;

use crate::errors::AppError;
use crate::scoring::engine::ScoringEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone, Default)]
pub struct AppState {
    /// `None` until an engine has been constructed; handlers answer 503.
    pub engine: Option<Arc<ScoringEngine>>,
}

impl AppState {
    pub fn ready(engine: ScoringEngine) -> Self {
        Self {
            engine: Some(Arc::new(engine)),
        }
    }

    pub fn engine(&self) -> Result<&ScoringEngine, AppError> {
        self.engine.as_deref().ok_or(AppError::EngineUnavailable)
    }
}
