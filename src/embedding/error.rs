use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Embedding failures.
///
/// Load-time variants mean the model is unavailable and every recommendation will
/// fail until the environment is fixed; see [`EmbeddingError::is_model_unavailable`].
#[derive(Debug, Clone, Error)]
pub enum EmbeddingError {
    #[error("embedding model not found at path: {path}")]
    ModelNotFound { path: PathBuf },

    #[error("failed to load embedding model: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("failed to download embedding model {model_id}: {reason}")]
    DownloadFailed { model_id: String, reason: String },

    #[error("embedding model load timed out after {timeout:?}")]
    LoadTimedOut { timeout: Duration },

    #[error("{device} device unavailable: {reason}")]
    DeviceUnavailable { device: String, reason: String },

    #[error("invalid model configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("embedding inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("tokenization failed: {reason}")]
    TokenizationFailed { reason: String },
}

impl EmbeddingError {
    /// Returns `true` for failures that leave no usable model behind.
    pub fn is_model_unavailable(&self) -> bool {
        matches!(
            self,
            Self::ModelNotFound { .. }
                | Self::ModelLoadFailed { .. }
                | Self::DownloadFailed { .. }
                | Self::LoadTimedOut { .. }
                | Self::DeviceUnavailable { .. }
                | Self::InvalidConfig { .. }
        )
    }
}

impl From<candle_core::Error> for EmbeddingError {
    fn from(err: candle_core::Error) -> Self {
        EmbeddingError::InferenceFailed {
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for EmbeddingError {
    fn from(err: std::io::Error) -> Self {
        EmbeddingError::ModelLoadFailed {
            reason: err.to_string(),
        }
    }
}
