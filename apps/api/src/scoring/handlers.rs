//! Axum route handlers for the Scoring API.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use tracing::info;

use crate::embedding::CacheStats;
use crate::errors::AppError;
use crate::scoring::batch::BatchResult;
use crate::scoring::engine::ScoreResult;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub resume_text: String,
    pub job_description: String,
    #[serde(default)]
    pub job_requirements: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub resumes: Vec<String>,
    pub jobs: Vec<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
}

fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /score
pub async fn handle_score(
    State(state): State<AppState>,
    Json(req): Json<ScoreRequest>,
) -> Result<Json<ScoreResult>, AppError> {
    let engine = state.engine()?;
    require_text("resume_text", &req.resume_text)?;
    require_text("job_description", &req.job_description)?;

    info!("Processing scoring request");
    let result = engine
        .score_match(
            &req.resume_text,
            &req.job_description,
            req.job_requirements.as_deref().unwrap_or(""),
        )
        .await?;
    info!("Scoring completed with score: {}", result.match_score);

    Ok(Json(result))
}

/// POST /batch
pub async fn handle_batch(
    State(state): State<AppState>,
    Json(req): Json<BatchRequest>,
) -> Result<Json<BatchResult>, AppError> {
    let engine = state.engine()?;
    if req.resumes.is_empty() || req.jobs.is_empty() {
        return Err(AppError::Validation(
            "resumes and jobs must each contain at least one entry".to_string(),
        ));
    }
    engine.check_batch_size(req.resumes.len(), req.jobs.len())?;
    for (i, resume) in req.resumes.iter().enumerate() {
        require_text(&format!("resumes[{i}]"), resume)?;
    }
    for (j, job) in req.jobs.iter().enumerate() {
        require_text(&format!("jobs[{j}]"), job)?;
    }

    let batch = engine
        .batch_score(&req.resumes, &req.jobs, &req.requirements)
        .await?;
    Ok(Json(batch))
}

/// GET /cache/stats
pub async fn handle_cache_stats(
    State(state): State<AppState>,
) -> Result<Json<CacheStats>, AppError> {
    Ok(Json(state.engine()?.cache_stats()))
}

/// DELETE /cache
pub async fn handle_clear_cache(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.engine()?.clear_cache();
    Ok(StatusCode::NO_CONTENT)
}
