use thiserror::Error;

use crate::embedding::EmbeddingError;

/// Failure classes of a recommendation call.
#[derive(Debug, Error)]
pub enum RecommendError {
    /// Empty or whitespace-only query; the model was not invoked.
    #[error("query text is empty")]
    InvalidQuery,

    #[error("top_n must be at least 1")]
    InvalidTopN,

    /// Catalog is empty or its source failed. Re-checked on every call.
    #[error("catalog unavailable: {reason}")]
    CatalogUnavailable { reason: String },

    /// The embedding model could not be loaded; retrying will not help until the
    /// environment is fixed.
    #[error("embedding model unavailable: {0}")]
    ModelUnavailable(#[source] EmbeddingError),

    /// Model is loaded but failed on this input.
    #[error("embedding failed: {0}")]
    Embedding(#[source] EmbeddingError),

    /// Valid query over a non-empty catalog produced nothing.
    #[error("no matching items")]
    NoMatches,

    /// Cached vectors and the embedder disagree; indicates a bug or stale cache.
    #[error("invariant violation: {reason}")]
    InvariantViolation { reason: String },
}

impl RecommendError {
    /// Stable machine-readable kind for presentation layers.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidQuery | Self::InvalidTopN => "invalid_query",
            Self::CatalogUnavailable { .. } => "catalog_unavailable",
            Self::ModelUnavailable(_) => "model_unavailable",
            Self::NoMatches => "no_matches",
            Self::Embedding(_) | Self::InvariantViolation { .. } => "internal",
        }
    }

    /// Returns `true` if a later identical call may succeed without operator action.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::CatalogUnavailable { .. } | Self::Embedding(_))
    }
}

impl From<EmbeddingError> for RecommendError {
    fn from(err: EmbeddingError) -> Self {
        if err.is_model_unavailable() {
            Self::ModelUnavailable(err)
        } else {
            Self::Embedding(err)
        }
    }
}
