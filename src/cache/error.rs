use thiserror::Error;

use crate::catalog::CatalogError;
use crate::embedding::EmbeddingError;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("catalog load failed: {0}")]
    Catalog(#[from] CatalogError),

    #[error("catalog embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("embedder returned {actual} vectors for {expected} catalog items")]
    VectorCountMismatch { expected: usize, actual: usize },

    #[error("vector {index} has dimension {actual}, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },
}

impl CacheError {
    /// Returns `true` for mismatches that point at a bug rather than an environment problem.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Self::VectorCountMismatch { .. } | Self::DimensionMismatch { .. }
        )
    }
}
