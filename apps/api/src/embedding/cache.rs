//! Bounded, content-addressed store of computed embedding vectors.
//!
//! Keys are the SHA-256 digest of the exact input text, so whitespace or case
//! variants are distinct entries. Eviction is strict FIFO on insertion order:
//! reads never refresh an entry's position.
//!
//! The cache is not synchronized. Callers sharing it across requests must wrap
//! it (see [`SharedEmbeddingCache`]).

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use super::Embedding;

pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// Cache handle shared between the embedding provider and whoever owns the
/// process lifetime (the engine, tests).
pub type SharedEmbeddingCache = Arc<Mutex<EmbeddingCache>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug)]
pub struct EmbeddingCache {
    entries: HashMap<String, Embedding>,
    /// Keys in insertion order; front is the next eviction victim.
    order: VecDeque<String>,
    max_size: usize,
    hits: u64,
    misses: u64,
}

impl Default for EmbeddingCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl EmbeddingCache {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(max_size.min(DEFAULT_CACHE_CAPACITY)),
            order: VecDeque::new(),
            max_size,
            hits: 0,
            misses: 0,
        }
    }

    pub fn shared(max_size: usize) -> SharedEmbeddingCache {
        Arc::new(Mutex::new(Self::new(max_size)))
    }

    pub fn get(&mut self, text: &str) -> Option<Embedding> {
        let key = cache_key(text);
        match self.entries.get(&key) {
            Some(embedding) => {
                self.hits += 1;
                debug!("Cache HIT for embedding");
                Some(Arc::clone(embedding))
            }
            None => {
                self.misses += 1;
                debug!("Cache MISS for embedding");
                None
            }
        }
    }

    pub fn set(&mut self, text: &str, embedding: Embedding) {
        if self.max_size == 0 {
            return;
        }

        let key = cache_key(text);

        // Re-setting a known key keeps its original insertion slot.
        if let Some(existing) = self.entries.get_mut(&key) {
            *existing = embedding;
            return;
        }

        while self.entries.len() >= self.max_size {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
            debug!("Cache evicted oldest entry, size={}", self.entries.len());
        }

        self.order.push_back(key.clone());
        self.entries.insert(key, embedding);
        debug!("Cached embedding, cache_size={}", self.entries.len());
    }

    #[cfg(test)]
    pub fn contains(&self, text: &str) -> bool {
        self.entries.contains_key(&cache_key(text))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        tracing::info!("Embedding cache cleared");
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.len(),
            max_size: self.max_size,
            hits: self.hits,
            misses: self.misses,
        }
    }
}

/// Hex-encoded SHA-256 of the raw bytes. No normalization.
pub fn cache_key(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}
