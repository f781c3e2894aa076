//! Ollama embeddings (`POST {base}/api/embeddings`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{EmbeddingBackend, EmbeddingError};
use crate::ollama::{list_models, setup_hint, trim_base_url, warn_if_missing};

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

pub struct OllamaEmbedder {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaEmbedder {
    /// Builds the client and probes `/api/tags`. An unreachable server is a
    /// hard error carrying setup instructions.
    pub async fn connect(
        base_url: &str,
        model: String,
        timeout: Duration,
    ) -> Result<Self, EmbeddingError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = trim_base_url(base_url);

        let available = list_models(&client, &base_url)
            .await
            .map_err(|e| EmbeddingError::Unreachable {
                provider: "ollama",
                detail: e.to_string(),
                hint: setup_hint(&base_url, &model),
            })?;
        warn_if_missing(&available, &model);

        Ok(Self {
            client,
            base_url,
            model,
        })
    }
}

#[async_trait]
impl EmbeddingBackend for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let response = self
            .client
            .post(format!("{}/api/embeddings", self.base_url))
            .json(&EmbeddingRequest {
                model: &self.model,
                prompt: text,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api {
                provider: "ollama",
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: EmbeddingResponse = response.json().await?;
        Ok(parsed.embedding)
    }

    fn name(&self) -> &'static str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
