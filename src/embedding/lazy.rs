//! Deferred, load-once model construction.

use std::sync::OnceLock;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use tracing::{error, info, warn};

use super::embedder::Embedder;
use super::error::EmbeddingError;
use super::vector::EmbeddingVector;

type Factory<E> = Box<dyn Fn() -> Result<E, EmbeddingError> + Send + Sync>;

/// Runs `load` on a dedicated thread and waits at most `timeout` for it.
///
/// On timeout the loader thread is left to finish on its own and its result is
/// discarded.
pub fn load_with_timeout<T, F>(timeout: Duration, load: F) -> Result<T, EmbeddingError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, EmbeddingError> + Send + 'static,
{
    let (tx, rx) = mpsc::sync_channel(1);

    std::thread::Builder::new()
        .name("model-load".to_string())
        .spawn(move || {
            let _ = tx.send(load());
        })
        .map_err(|e| EmbeddingError::ModelLoadFailed {
            reason: format!("failed to spawn model loader: {}", e),
        })?;

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => {
            warn!(?timeout, "Embedding model load timed out");
            Err(EmbeddingError::LoadTimedOut { timeout })
        }
        Err(RecvTimeoutError::Disconnected) => Err(EmbeddingError::ModelLoadFailed {
            reason: "model loader thread panicked".to_string(),
        }),
    }
}

/// Embedder whose model is built on first use, at most once per value.
///
/// Concurrent first callers block until the single load finishes. The outcome is
/// kept for the life of the value, failures included: a model that could not be
/// loaded stays unavailable until the process is restarted with a fixed environment.
pub struct LazyEmbedder<E> {
    dimension: usize,
    factory: Factory<E>,
    slot: OnceLock<Result<E, EmbeddingError>>,
}

impl<E> std::fmt::Debug for LazyEmbedder<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.slot.get() {
            None => "pending",
            Some(Ok(_)) => "loaded",
            Some(Err(_)) => "failed",
        };
        f.debug_struct("LazyEmbedder")
            .field("dimension", &self.dimension)
            .field("state", &state)
            .finish()
    }
}

impl<E: Embedder> LazyEmbedder<E> {
    /// `dimension` is what the factory's embedder must report; a mismatch turns the
    /// load into [`EmbeddingError::InvalidConfig`].
    pub fn new<F>(dimension: usize, factory: F) -> Self
    where
        F: Fn() -> Result<E, EmbeddingError> + Send + Sync + 'static,
    {
        Self {
            dimension,
            factory: Box::new(factory),
            slot: OnceLock::new(),
        }
    }

    /// Returns the loaded embedder, loading it on first call.
    pub fn get(&self) -> Result<&E, EmbeddingError> {
        self.slot
            .get_or_init(|| {
                let started = Instant::now();
                let loaded = (self.factory)().and_then(|embedder| {
                    if embedder.dimension() != self.dimension {
                        return Err(EmbeddingError::InvalidConfig {
                            reason: format!(
                                "loaded embedder has dimension {}, expected {}",
                                embedder.dimension(),
                                self.dimension
                            ),
                        });
                    }
                    Ok(embedder)
                });

                match &loaded {
                    Ok(_) => info!(
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Embedding model ready"
                    ),
                    Err(e) => error!(error = %e, "Embedding model unavailable"),
                }
                loaded
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Returns `true` once a load has succeeded.
    pub fn is_loaded(&self) -> bool {
        matches!(self.slot.get(), Some(Ok(_)))
    }

    /// Returns the cached load failure, if the load already ran and failed.
    pub fn load_error(&self) -> Option<&EmbeddingError> {
        self.slot.get().and_then(|r| r.as_ref().err())
    }
}

impl<E: Embedder> Embedder for LazyEmbedder<E> {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
        self.get()?.embed_batch(texts)
    }

    fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        self.get()?.embed(text)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    /// Reports `false` until loaded.
    fn is_stub(&self) -> bool {
        matches!(self.slot.get(), Some(Ok(e)) if e.is_stub())
    }
}
