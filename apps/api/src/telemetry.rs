//! Prometheus metrics for the scoring service.
//!
//! Recording goes through the `metrics` facade, so every `record_*` call is a
//! no-op until a recorder is installed by [`init_metrics`].

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use tracing::{error, info};

const SCORING_LATENCY_BUCKETS: &[f64] = &[0.1, 0.5, 1.0, 2.0, 5.0, 10.0];
const EMBEDDING_LATENCY_BUCKETS: &[f64] = &[0.05, 0.1, 0.25, 0.5, 1.0];
const LLM_LATENCY_BUCKETS: &[f64] = &[0.5, 1.0, 2.0, 5.0, 10.0];

/// Handle used to render the `/metrics` page.
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    pub fn new(handle: PrometheusHandle) -> Self {
        Self {
            handle: Arc::new(handle),
        }
    }

    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Exporter with the latency histograms bucketed for this service.
pub fn prometheus_builder() -> Result<PrometheusBuilder, BuildError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("scoring_latency_seconds".to_string()),
            SCORING_LATENCY_BUCKETS,
        )?
        .set_buckets_for_metric(
            Matcher::Full("embedding_latency_seconds".to_string()),
            EMBEDDING_LATENCY_BUCKETS,
        )?
        .set_buckets_for_metric(
            Matcher::Full("llm_latency_seconds".to_string()),
            LLM_LATENCY_BUCKETS,
        )
}

/// Installs the global recorder. Failure is logged and leaves metrics off;
/// scoring keeps working either way.
pub fn init_metrics(enabled: bool) -> Option<PrometheusMetrics> {
    if !enabled {
        info!("Prometheus metrics disabled");
        return None;
    }

    match prometheus_builder().and_then(PrometheusBuilder::install_recorder) {
        Ok(handle) => {
            gauge!("matchline_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
            info!("Prometheus metrics initialized at /metrics");
            Some(PrometheusMetrics::new(handle))
        }
        Err(e) => {
            error!("Failed to initialize Prometheus metrics: {e}");
            None
        }
    }
}

pub fn metrics_router(metrics: PrometheusMetrics) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// One finished scoring call; `status` is "success" or "error".
pub fn record_scoring(status: &'static str, duration: Duration) {
    counter!("scoring_requests_total", "status" => status).increment(1);
    histogram!("scoring_latency_seconds").record(duration.as_secs_f64());
}

pub fn record_cache_hit() {
    counter!("cache_hits_total").increment(1);
}

pub fn record_cache_miss() {
    counter!("cache_misses_total").increment(1);
}

/// Backend time for one computed embedding. Cache hits are not timed.
pub fn record_embedding_latency(duration: Duration) {
    histogram!("embedding_latency_seconds").record(duration.as_secs_f64());
}

pub fn record_llm_latency(duration: Duration) {
    histogram!("llm_latency_seconds").record(duration.as_secs_f64());
}

/// Holds `active_scoring_requests` up by one while alive.
pub struct ActiveScoring(());

impl ActiveScoring {
    pub fn start() -> Self {
        gauge!("active_scoring_requests").increment(1.0);
        ActiveScoring(())
    }
}

impl Drop for ActiveScoring {
    fn drop(&mut self) {
        gauge!("active_scoring_requests").decrement(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Value of the exposition line whose series is exactly `series`.
    fn sample(page: &str, series: &str) -> f64 {
        page.lines()
            .find_map(|line| line.strip_prefix(series)?.strip_prefix(' '))
            .unwrap_or_else(|| panic!("{series} missing from:\n{page}"))
            .trim()
            .parse()
            .unwrap()
    }

    #[test]
    fn test_recorded_values_render() {
        let recorder = prometheus_builder().unwrap().build_recorder();
        let metrics = PrometheusMetrics::new(recorder.handle());

        metrics::with_local_recorder(&recorder, || {
            {
                let _active = ActiveScoring::start();
                record_cache_miss();
                record_embedding_latency(Duration::from_millis(30));
                record_llm_latency(Duration::from_millis(700));
            }
            record_cache_hit();
            record_cache_hit();
            record_scoring("success", Duration::from_millis(300));
            record_scoring("error", Duration::from_secs(3));
        });

        let page = metrics.render();
        assert_eq!(sample(&page, "cache_hits_total"), 2.0);
        assert_eq!(sample(&page, "cache_misses_total"), 1.0);
        assert_eq!(sample(&page, r#"scoring_requests_total{status="success"}"#), 1.0);
        assert_eq!(sample(&page, r#"scoring_requests_total{status="error"}"#), 1.0);
        assert_eq!(sample(&page, r#"scoring_latency_seconds_bucket{le="0.5"}"#), 1.0);
        assert_eq!(sample(&page, "scoring_latency_seconds_count"), 2.0);
        assert_eq!(sample(&page, r#"embedding_latency_seconds_bucket{le="0.05"}"#), 1.0);
        assert_eq!(sample(&page, "llm_latency_seconds_count"), 1.0);
        assert_eq!(sample(&page, "active_scoring_requests"), 0.0);
    }

    #[test]
    fn test_disabled_metrics_install_nothing() {
        assert!(init_metrics(false).is_none());
    }
}
