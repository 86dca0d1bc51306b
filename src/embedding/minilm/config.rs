use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_MAX_SEQ_LEN, DEFAULT_MODEL_ID, DEFAULT_MODEL_LOAD_TIMEOUT_SECS,
    MINILM_EMBEDDING_DIM,
};
use crate::embedding::error::EmbeddingError;

/// Configuration for [`MiniLmEmbedder`](super::MiniLmEmbedder).
#[derive(Debug, Clone)]
pub struct MiniLmConfig {
    /// Local directory holding `config.json`, `tokenizer.json` and `model.safetensors`.
    /// When unset the files are fetched from the hub by `model_id`.
    pub model_dir: Option<PathBuf>,
    /// Hugging Face model id.
    pub model_id: String,
    /// Max tokens per description; longer inputs are truncated.
    pub max_seq_len: usize,
    /// Descriptions per forward pass.
    pub batch_size: usize,
    /// Expected output dimension.
    pub embedding_dim: usize,
    /// Upper bound on model resolution + loading.
    pub load_timeout: Duration,
    /// If true, run in deterministic stub mode (no model files required).
    pub testing_stub: bool,
}

impl Default for MiniLmConfig {
    fn default() -> Self {
        Self {
            model_dir: None,
            model_id: DEFAULT_MODEL_ID.to_string(),
            max_seq_len: DEFAULT_MAX_SEQ_LEN,
            batch_size: DEFAULT_BATCH_SIZE,
            embedding_dim: MINILM_EMBEDDING_DIM,
            load_timeout: Duration::from_secs(DEFAULT_MODEL_LOAD_TIMEOUT_SECS),
            testing_stub: false,
        }
    }
}

impl MiniLmConfig {
    /// Loads from a local model directory.
    pub fn from_dir<P: Into<PathBuf>>(model_dir: P) -> Self {
        Self {
            model_dir: Some(model_dir.into()),
            ..Default::default()
        }
    }

    /// Downloads (or reuses the hub cache for) `model_id`.
    pub fn from_hub(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            ..Default::default()
        }
    }

    /// Creates a stub config (no model files; produces deterministic embeddings).
    pub fn stub() -> Self {
        Self {
            testing_stub: true,
            ..Default::default()
        }
    }

    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.embedding_dim == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "embedding_dim must be positive".to_string(),
            });
        }
        if self.batch_size == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "batch_size must be positive".to_string(),
            });
        }
        if self.max_seq_len < 2 {
            return Err(EmbeddingError::InvalidConfig {
                reason: format!("max_seq_len ({}) leaves no room for text", self.max_seq_len),
            });
        }
        if self.testing_stub {
            return Ok(());
        }
        if self.model_dir.is_none() && self.model_id.trim().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "either model_dir or model_id is required (stubbing is disabled)"
                    .to_string(),
            });
        }
        Ok(())
    }
}
