//! Embedding layer: pluggable vector backends behind a cache-aware provider.
//!
//! Exactly one [`EmbeddingBackend`] is selected from configuration at startup.
//! Server-based backends are probed during construction so an unreachable
//! backend fails the process immediately instead of on the first request.

pub mod cache;
#[cfg(feature = "local-embeddings")]
mod local;
mod ollama;
mod openai;
pub mod similarity;

use std::sync::{Arc, MutexGuard, PoisonError};
use std::time::Instant;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{EmbeddingConfig, EmbeddingProviderKind};
use crate::telemetry::{record_cache_hit, record_cache_miss, record_embedding_latency};

pub use cache::{CacheStats, EmbeddingCache, SharedEmbeddingCache};
pub use similarity::similarity_percentage;

/// An immutable embedding vector. Cloning shares the allocation.
pub type Embedding = Arc<[f32]>;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Cannot generate embedding for empty text")]
    EmptyText,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} embedding API error (status {status}): {message}")]
    Api {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("{provider} embedding backend unreachable: {detail}. {hint}")]
    Unreachable {
        provider: &'static str,
        detail: String,
        hint: String,
    },

    #[error("Invalid embedding response: {0}")]
    InvalidResponse(String),

    #[error("Embedding configuration error: {0}")]
    Config(String),

    #[cfg(feature = "local-embeddings")]
    #[error("Local embedding model error: {0}")]
    Local(String),
}

/// A backend that turns one text into one vector. No caching here.
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Short backend label for logs ("openai", "ollama", "local").
    fn name(&self) -> &'static str;

    fn model(&self) -> &str;
}

/// Builds the configured backend, validating credentials and probing servers.
pub async fn build_backend(
    config: &EmbeddingConfig,
) -> Result<Arc<dyn EmbeddingBackend>, EmbeddingError> {
    let backend: Arc<dyn EmbeddingBackend> = match config.provider {
        EmbeddingProviderKind::OpenAi => {
            let api_key = config.openai_api_key.clone().ok_or_else(|| {
                EmbeddingError::Config("OPENAI_API_KEY required for OpenAI embeddings".to_string())
            })?;
            Arc::new(openai::OpenAiEmbedder::new(
                &config.openai_base_url,
                api_key,
                config.openai_model.clone(),
                config.timeout,
            )?)
        }
        EmbeddingProviderKind::Ollama => Arc::new(
            ollama::OllamaEmbedder::connect(
                &config.ollama_base_url,
                config.ollama_model.clone(),
                config.timeout,
            )
            .await?,
        ),
        #[cfg(feature = "local-embeddings")]
        EmbeddingProviderKind::Local => Arc::new(local::LocalEmbedder::load(&config.local_model)?),
        #[cfg(not(feature = "local-embeddings"))]
        EmbeddingProviderKind::Local => {
            return Err(EmbeddingError::Config(format!(
                "EMBEDDING_PROVIDER=local ({}) requires building with `--features local-embeddings`",
                config.local_model
            )))
        }
    };

    info!("Using {} embeddings: {}", backend.name(), backend.model());
    Ok(backend)
}

/// Cache-aware front door for embeddings. Owns the backend and a handle to
/// the shared cache.
pub struct EmbeddingProvider {
    backend: Arc<dyn EmbeddingBackend>,
    cache: SharedEmbeddingCache,
}

impl EmbeddingProvider {
    pub fn new(backend: Arc<dyn EmbeddingBackend>, cache: SharedEmbeddingCache) -> Self {
        Self { backend, cache }
    }

    /// Returns the cached vector for `text`, computing and storing it on a miss.
    ///
    /// The cache lock is released while the backend runs, so two concurrent
    /// misses for the same text may both compute; the later store wins.
    pub async fn get_embedding(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyText);
        }

        let cached = self.lock_cache().get(text);
        if let Some(hit) = cached {
            record_cache_hit();
            return Ok(hit);
        }
        record_cache_miss();

        let started = Instant::now();
        let vector = self.backend.embed(text).await?;
        record_embedding_latency(started.elapsed());
        if vector.is_empty() {
            return Err(EmbeddingError::InvalidResponse(format!(
                "{} returned an empty vector",
                self.backend.name()
            )));
        }
        debug!(
            "Computed embedding via {}: dimension={}",
            self.backend.name(),
            vector.len()
        );

        let embedding: Embedding = Arc::from(vector);
        self.lock_cache().set(text, Arc::clone(&embedding));
        Ok(embedding)
    }

    /// Cosine similarity mapped to 0–100.
    pub fn similarity(&self, a: &[f32], b: &[f32]) -> f64 {
        similarity_percentage(a, b)
    }

    pub async fn get_semantic_similarity(
        &self,
        text1: &str,
        text2: &str,
    ) -> Result<f64, EmbeddingError> {
        let a = self.get_embedding(text1).await?;
        let b = self.get_embedding(text2).await?;
        Ok(self.similarity(&a, &b))
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.lock_cache().stats()
    }

    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    // A panic while holding the lock cannot leave the cache structurally
    // invalid, so a poisoned lock is still usable.
    fn lock_cache(&self) -> MutexGuard<'_, EmbeddingCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{CountingEmbedder, FailingEmbedder};

    fn provider_with(backend: Arc<dyn EmbeddingBackend>, capacity: usize) -> EmbeddingProvider {
        EmbeddingProvider::new(backend, EmbeddingCache::shared(capacity))
    }

    #[tokio::test]
    async fn test_empty_text_is_rejected_before_backend() {
        let backend = Arc::new(CountingEmbedder::default());
        let provider = provider_with(backend.clone(), 10);

        assert!(matches!(
            provider.get_embedding("   \n\t").await,
            Err(EmbeddingError::EmptyText)
        ));
        assert!(matches!(
            provider.get_embedding("").await,
            Err(EmbeddingError::EmptyText)
        ));
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_second_lookup_is_served_from_cache() {
        let backend = Arc::new(CountingEmbedder::default());
        let provider = provider_with(backend.clone(), 10);

        let first = provider.get_embedding("rust developer").await.unwrap();
        let second = provider.get_embedding("rust developer").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(backend.calls(), 1);
        let stats = provider.cache_stats();
        assert_eq!(stats.size, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test]
    async fn test_clear_cache_forces_recompute() {
        let backend = Arc::new(CountingEmbedder::default());
        let provider = provider_with(backend.clone(), 10);

        provider.get_embedding("go").await.unwrap();
        provider.clear_cache();
        provider.get_embedding("go").await.unwrap();
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test]
    async fn test_backend_failure_propagates_and_caches_nothing() {
        let provider = provider_with(Arc::new(FailingEmbedder), 10);
        let err = provider.get_embedding("text").await.unwrap_err();
        assert!(matches!(err, EmbeddingError::Api { .. }));
        assert_eq!(provider.cache_stats().size, 0);
    }

    #[tokio::test]
    async fn test_semantic_similarity_of_identical_texts_is_100() {
        let provider = provider_with(Arc::new(CountingEmbedder::default()), 10);
        let score = provider
            .get_semantic_similarity("Kubernetes operator", "Kubernetes operator")
            .await
            .unwrap();
        assert!((score - 100.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_shared_cache_is_visible_to_owner() {
        let cache = EmbeddingCache::shared(10);
        let provider =
            EmbeddingProvider::new(Arc::new(CountingEmbedder::default()), Arc::clone(&cache));
        provider.get_embedding("shared").await.unwrap();
        assert!(cache.lock().unwrap().contains("shared"));
    }

    #[tokio::test]
    async fn test_openai_backend_requires_api_key() {
        let config = EmbeddingConfig {
            provider: EmbeddingProviderKind::OpenAi,
            openai_api_key: None,
            openai_base_url: "https://api.openai.com/v1".to_string(),
            openai_model: "text-embedding-3-small".to_string(),
            ollama_base_url: "http://localhost:11434".to_string(),
            ollama_model: "nomic-embed-text".to_string(),
            local_model: "all-MiniLM-L6-v2".to_string(),
            timeout: std::time::Duration::from_secs(5),
        };
        // Missing key fails validation before any network use.
        assert!(matches!(
            build_backend(&config).await,
            Err(EmbeddingError::Config(_))
        ));
    }
}
