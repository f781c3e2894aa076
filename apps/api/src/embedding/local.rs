//! In-process embeddings via fastembed (ONNX runtime). Fully offline once the
//! model weights are cached.

use std::sync::Arc;

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::info;

use super::{EmbeddingBackend, EmbeddingError};

pub struct LocalEmbedder {
    model: Arc<TextEmbedding>,
    model_name: String,
}

impl LocalEmbedder {
    /// Loads (and on first use downloads) the model. Blocking.
    pub fn load(model_name: &str) -> Result<Self, EmbeddingError> {
        let model = resolve_model(model_name)?;
        info!("Loading local embedding model {model_name}");

        let embedding = TextEmbedding::try_new(
            InitOptions::new(model).with_show_download_progress(false),
        )
        .map_err(|e| EmbeddingError::Local(format!("failed to load {model_name}: {e}")))?;

        Ok(Self {
            model: Arc::new(embedding),
            model_name: model_name.to_string(),
        })
    }
}

fn resolve_model(name: &str) -> Result<EmbeddingModel, EmbeddingError> {
    match name.trim_start_matches("sentence-transformers/") {
        "all-MiniLM-L6-v2" => Ok(EmbeddingModel::AllMiniLML6V2),
        "all-MiniLM-L12-v2" => Ok(EmbeddingModel::AllMiniLML12V2),
        "bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
        "bge-base-en-v1.5" => Ok(EmbeddingModel::BGEBaseENV15),
        "nomic-embed-text-v1.5" => Ok(EmbeddingModel::NomicEmbedTextV15),
        other => Err(EmbeddingError::Config(format!(
            "unsupported LOCAL_EMBEDDING_MODEL '{other}'"
        ))),
    }
}

#[async_trait]
impl EmbeddingBackend for LocalEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let model = Arc::clone(&self.model);
        let input = vec![text.to_string()];

        let vectors = tokio::task::spawn_blocking(move || model.embed(input, None))
            .await
            .map_err(|e| EmbeddingError::Local(format!("embedding task failed: {e}")))?
            .map_err(|e| EmbeddingError::Local(e.to_string()))?;

        vectors
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::InvalidResponse("model returned no vectors".to_string()))
    }

    fn name(&self) -> &'static str {
        "local"
    }

    fn model(&self) -> &str {
        &self.model_name
    }
}
