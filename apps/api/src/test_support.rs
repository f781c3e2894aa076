//! In-process stand-ins for the embedding and generative backends.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::embedding::{EmbeddingBackend, EmbeddingError};
use crate::llm_client::{GenerativeProvider, LlmError};

/// Deterministic embedder: a 26-dimension letter-frequency vector.
/// Identical texts embed identically; counts every backend call.
#[derive(Default)]
pub struct CountingEmbedder {
    calls: AtomicUsize,
}

impl CountingEmbedder {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingBackend for CountingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut vector = vec![0.0_f32; 26];
        for c in text.chars().filter(char::is_ascii_alphabetic) {
            vector[(c.to_ascii_lowercase() as u8 - b'a') as usize] += 1.0;
        }
        Ok(vector)
    }

    fn name(&self) -> &'static str {
        "counting"
    }

    fn model(&self) -> &str {
        "letter-frequency"
    }
}

/// Embedder whose every call fails with a backend error.
pub struct FailingEmbedder;

#[async_trait]
impl EmbeddingBackend for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Err(EmbeddingError::Api {
            provider: "failing",
            status: 503,
            message: "backend down".to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "failing"
    }

    fn model(&self) -> &str {
        "none"
    }
}

/// Generative provider that replays queued replies, then repeats the last one.
/// Records every prompt it receives.
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<String>>,
    last: Mutex<String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn replying(reply: &str) -> Self {
        Self::sequence(&[reply])
    }

    pub fn sequence(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            last: Mutex::new(String::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeProvider for ScriptedLlm {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let mut last = self.last.lock().unwrap();
        if let Some(next) = self.replies.lock().unwrap().pop_front() {
            *last = next;
        }
        Ok(last.clone())
    }

    fn name(&self) -> &'static str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

/// Generative provider that always fails as if the server timed out.
pub struct UnreachableLlm;

#[async_trait]
impl GenerativeProvider for UnreachableLlm {
    async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::Unreachable {
            provider: "unreachable",
            detail: "connection refused".to_string(),
            hint: String::new(),
        })
    }

    fn name(&self) -> &'static str {
        "unreachable"
    }

    fn model(&self) -> &str {
        "none"
    }
}
