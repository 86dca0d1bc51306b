//! Deterministic bag-of-words embedder for tests.
//!
//! Each lowercase word (minus a few stop words) is hashed into one of `dim` buckets,
//! so texts sharing words score higher. Calls are counted so tests can assert how
//! often the cache actually embedded.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use super::embedder::Embedder;
use super::error::EmbeddingError;
use super::vector::EmbeddingVector;
use crate::hashing::hash_text;

const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "in", "of", "on", "the", "to", "with", "who", "must",
];

#[derive(Debug)]
pub struct HashingEmbedder {
    dim: usize,
    batch_calls: AtomicUsize,
    texts_embedded: AtomicUsize,
    failing: AtomicBool,
    delay: Option<Duration>,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::with_dim(Self::DEFAULT_DIM)
    }
}

impl HashingEmbedder {
    pub const DEFAULT_DIM: usize = 256;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dim(dim: usize) -> Self {
        Self {
            dim,
            batch_calls: AtomicUsize::new(0),
            texts_embedded: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
            delay: None,
        }
    }

    /// Sleeps inside every call, widening the window for concurrent callers.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Makes every call fail as if the model could not be loaded.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Release);
    }

    /// Number of `embed_batch`/`embed` invocations.
    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::Acquire)
    }

    /// Total number of texts embedded across all calls.
    pub fn texts_embedded(&self) -> usize {
        self.texts_embedded.load(Ordering::Acquire)
    }

    fn vectorize(&self, text: &str) -> EmbeddingVector {
        let mut values = vec![0.0f32; self.dim];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .filter(|w| !STOP_WORDS.contains(&w.as_str()))
        {
            let digest = hash_text(&word);
            let mut bucket = [0u8; 8];
            bucket.copy_from_slice(&digest[..8]);
            values[(u64::from_le_bytes(bucket) % self.dim as u64) as usize] += 1.0;
        }
        EmbeddingVector::normalized(values)
    }
}

impl Embedder for HashingEmbedder {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
        self.batch_calls.fetch_add(1, Ordering::AcqRel);

        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        if self.failing.load(Ordering::Acquire) {
            return Err(EmbeddingError::ModelLoadFailed {
                reason: "hashing embedder marked as failing".to_string(),
            });
        }

        self.texts_embedded.fetch_add(texts.len(), Ordering::AcqRel);
        Ok(texts.iter().map(|t| self.vectorize(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn is_stub(&self) -> bool {
        true
    }
}
