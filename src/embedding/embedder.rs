use super::error::EmbeddingError;
use super::vector::EmbeddingVector;

/// Text → unit vector transformation backed by a frozen model.
///
/// `embed` and `embed_batch` must apply the identical transformation so a query
/// vector is directly comparable with catalog vectors.
pub trait Embedder: Send + Sync {
    /// Embeds `texts` in order, one vector per input.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>, EmbeddingError>;

    fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        self.embed_batch(&[text])?
            .pop()
            .ok_or_else(|| EmbeddingError::InferenceFailed {
                reason: "embedder returned no vector for a single input".to_string(),
            })
    }

    /// Output dimension every vector from this embedder has.
    fn dimension(&self) -> usize;

    /// Returns `true` if vectors are synthetic (no model loaded).
    fn is_stub(&self) -> bool {
        false
    }
}

impl<E: Embedder + ?Sized> Embedder for std::sync::Arc<E> {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
        (**self).embed_batch(texts)
    }

    fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        (**self).embed(text)
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn is_stub(&self) -> bool {
        (**self).is_stub()
    }
}
