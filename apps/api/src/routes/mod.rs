pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::scoring::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Scoring API
        .route("/score", post(handlers::handle_score))
        .route("/batch", post(handlers::handle_batch))
        // Embedding cache
        .route("/cache/stats", get(handlers::handle_cache_stats))
        .route("/cache", delete(handlers::handle_clear_cache))
        .with_state(state)
}
