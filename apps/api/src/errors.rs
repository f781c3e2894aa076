use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::llm_client::LlmError;

/// Service-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Empty text, malformed model JSON, missing configuration.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Backend unreachable at construction or call time (includes timeouts).
    #[error("Connectivity error: {0}")]
    Connectivity(String),

    /// Backend answered with a non-success response.
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Scoring engine not initialized")]
    EngineUnavailable,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<EmbeddingError> for AppError {
    fn from(err: EmbeddingError) -> Self {
        match err {
            EmbeddingError::EmptyText | EmbeddingError::Config(_) => {
                AppError::Validation(err.to_string())
            }
            EmbeddingError::Unreachable { .. } => AppError::Connectivity(err.to_string()),
            EmbeddingError::Http(ref e) if e.is_timeout() || e.is_connect() => {
                AppError::Connectivity(err.to_string())
            }
            EmbeddingError::Http(_)
            | EmbeddingError::Api { .. }
            | EmbeddingError::InvalidResponse(_) => AppError::Backend(err.to_string()),
            #[cfg(feature = "local-embeddings")]
            EmbeddingError::Local(_) => AppError::Backend(err.to_string()),
        }
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::InvalidJson { .. } | LlmError::Config(_) => {
                AppError::Validation(err.to_string())
            }
            LlmError::Unreachable { .. } => AppError::Connectivity(err.to_string()),
            LlmError::Http(ref e) if e.is_timeout() || e.is_connect() => {
                AppError::Connectivity(err.to_string())
            }
            LlmError::Http(_) | LlmError::Api { .. } | LlmError::EmptyContent => {
                AppError::Backend(err.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Connectivity(msg) => {
                tracing::error!("Connectivity error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONNECTIVITY_ERROR",
                    format!("Scoring failed: {msg}"),
                )
            }
            AppError::Backend(msg) => {
                tracing::error!("Backend error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "BACKEND_ERROR",
                    format!("Scoring failed: {msg}"),
                )
            }
            AppError::UnknownProvider(name) => {
                tracing::error!("Unknown provider: {name}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UNKNOWN_PROVIDER",
                    format!("Unknown provider: {name}"),
                )
            }
            AppError::EngineUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                "AI service not initialized".to_string(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
