//! Helpers shared by the Ollama embedding and generation backends.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

/// Liveness probes use a short fixed timeout independent of the per-call one.
pub(crate) const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    #[serde(default)]
    name: String,
}

/// `GET {base_url}/api/tags`, returning the names of locally pulled models.
pub(crate) async fn list_models(client: &Client, base_url: &str) -> Result<Vec<String>, reqwest::Error> {
    let tags: TagsResponse = client
        .get(format!("{base_url}/api/tags"))
        .timeout(PROBE_TIMEOUT)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(tags.models.into_iter().map(|m| m.name).collect())
}

/// Remediation text attached to every Ollama connectivity failure.
pub(crate) fn setup_hint(base_url: &str, model: &str) -> String {
    format!("Ollama not accessible at {base_url}. Install: https://ollama.ai, then run: ollama pull {model}")
}

/// Logs a warning when `model` has not been pulled. Not fatal: Ollama may pull lazily.
pub(crate) fn warn_if_missing(available: &[String], model: &str) {
    if !has_model(available, model) {
        warn!("Model '{model}' not found on Ollama server. Run: ollama pull {model}");
    }
}

/// Listed names carry a tag (`llama3.1:latest`); configured names may or may not.
fn has_model(available: &[String], model: &str) -> bool {
    available.iter().any(|name| {
        name == model || name.split(':').next().is_some_and(|base| base == model)
    })
}

pub(crate) fn trim_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
