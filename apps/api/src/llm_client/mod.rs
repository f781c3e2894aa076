//! LLM Client: the single point of entry for generative model calls.
//!
//! No other module talks to a completion API directly. Backends implement
//! [`GenerativeProvider`]; one is chosen from configuration at startup by
//! [`build_provider`] and shared as `Arc<dyn GenerativeProvider>`.
//!
//! There are no retries: a failed call is reported to the caller immediately,
//! and the caller decides whether to degrade.
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::config::{LlmConfig, LlmProviderKind};

mod ollama;
mod openai;
pub mod prompts;

pub use ollama::OllamaProvider;
pub use openai::OpenAiCompatibleProvider;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} API error (status {status}): {message}")]
    Api {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("{provider} not reachable: {detail}. {hint}")]
    Unreachable {
        provider: &'static str,
        detail: String,
        hint: String,
    },

    #[error("Failed to parse JSON response: {reason}\nResponse: {raw}")]
    InvalidJson { reason: String, raw: String },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("LLM configuration error: {0}")]
    Config(String),
}

#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Free-form completion for a single user prompt.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    /// Completion parsed as a JSON object. Tolerates fenced code blocks and
    /// prose around the object.
    async fn generate_json(&self, prompt: &str) -> Result<Value, LlmError> {
        let raw = self.generate(prompt).await?;
        parse_json_response(&raw)
    }

    fn name(&self) -> &'static str;

    fn model(&self) -> &str;
}

/// Builds the configured provider. Validates credentials and URLs, and probes
/// server backends so an unreachable server fails startup.
pub async fn build_provider(config: &LlmConfig) -> Result<Arc<dyn GenerativeProvider>, LlmError> {
    let provider: Arc<dyn GenerativeProvider> = match config.provider {
        LlmProviderKind::OpenAi => {
            let api_key = config.openai_api_key.clone().ok_or_else(|| {
                LlmError::Config("OPENAI_API_KEY required for OpenAI provider".to_string())
            })?;
            Arc::new(OpenAiCompatibleProvider::new(
                "openai",
                &config.openai_base_url,
                Some(api_key),
                config,
            )?)
        }
        LlmProviderKind::Custom => {
            let url = config.custom_api_url.as_deref().ok_or_else(|| {
                LlmError::Config("CUSTOM_API_URL required for custom provider".to_string())
            })?;
            reqwest::Url::parse(url)
                .map_err(|e| LlmError::Config(format!("CUSTOM_API_URL '{url}' is invalid: {e}")))?;
            Arc::new(OpenAiCompatibleProvider::new(
                "custom",
                url,
                config.custom_api_key.clone(),
                config,
            )?)
        }
        LlmProviderKind::Ollama => Arc::new(OllamaProvider::connect(config).await?),
    };

    info!("Using {} LLM: {}", provider.name(), provider.model());
    Ok(provider)
}

/// Extracts a JSON object from model output.
///
/// 1. If the text contains a fenced block (```json or ```), keep its body.
/// 2. Parse. If that fails, parse the span from the first `{` to the last `}`.
/// 3. Otherwise fail with the raw text attached.
pub fn parse_json_response(raw: &str) -> Result<Value, LlmError> {
    let candidate = strip_json_fences(raw);

    let first_error = match serde_json::from_str::<Value>(candidate) {
        Ok(value @ Value::Object(_)) => return Ok(value),
        Ok(_) => "response is not a JSON object".to_string(),
        Err(e) => e.to_string(),
    };

    if let (Some(start), Some(end)) = (candidate.find('{'), candidate.rfind('}')) {
        if end > start {
            if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(&candidate[start..=end]) {
                return Ok(value);
            }
        }
    }

    Err(LlmError::InvalidJson {
        reason: first_error,
        raw: raw.to_string(),
    })
}

/// Returns the body of the first ```json (or bare ```) fence, trimmed.
/// Text without fences is returned trimmed.
fn strip_json_fences(text: &str) -> &str {
    let body = if let Some((_, rest)) = text.split_once("```json") {
        rest
    } else if let Some((_, rest)) = text.split_once("```") {
        rest
    } else {
        return text.trim();
    };

    match body.split_once("```") {
        Some((inner, _)) => inner.trim(),
        None => body.trim(),
    }
}
