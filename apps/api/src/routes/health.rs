use axum::Json;
use serde_json::{json, Value};

pub const SERVICE_NAME: &str = "Match-Line AI Service";

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "service": SERVICE_NAME
    }))
}

/// GET /
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "score": "/score (POST)",
            "batch": "/batch (POST)",
            "cache_stats": "/cache/stats",
            "clear_cache": "/cache (DELETE)",
            "metrics": "/metrics"
        }
    }))
}
