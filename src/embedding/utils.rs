//! Model file resolution and tokenizer setup.

use std::path::{Path, PathBuf};

use tokenizers::{PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};
use tracing::info;

use super::error::EmbeddingError;

/// The three files a sentence-transformers BERT checkpoint needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFiles {
    pub config: PathBuf,
    pub tokenizer: PathBuf,
    pub weights: PathBuf,
}

impl ModelFiles {
    pub const CONFIG_FILE: &'static str = "config.json";
    pub const TOKENIZER_FILE: &'static str = "tokenizer.json";
    pub const WEIGHTS_FILE: &'static str = "model.safetensors";

    /// Resolves the files inside a local model directory.
    pub fn in_dir(dir: &Path) -> Result<Self, EmbeddingError> {
        if !dir.is_dir() {
            return Err(EmbeddingError::ModelNotFound {
                path: dir.to_path_buf(),
            });
        }

        let files = Self {
            config: dir.join(Self::CONFIG_FILE),
            tokenizer: dir.join(Self::TOKENIZER_FILE),
            weights: dir.join(Self::WEIGHTS_FILE),
        };

        for path in [&files.config, &files.tokenizer, &files.weights] {
            if !path.is_file() {
                return Err(EmbeddingError::ModelNotFound { path: path.clone() });
            }
        }

        Ok(files)
    }

    /// Fetches the files from the Hugging Face hub, reusing the local hub cache.
    pub fn from_hub(model_id: &str) -> Result<Self, EmbeddingError> {
        let download_err = |reason: String| EmbeddingError::DownloadFailed {
            model_id: model_id.to_string(),
            reason,
        };

        let api = hf_hub::api::sync::Api::new().map_err(|e| download_err(e.to_string()))?;
        let repo = api.model(model_id.to_string());

        info!(model_id, "Resolving embedding model from Hugging Face hub");

        let get = |name: &str| {
            repo.get(name)
                .map_err(|e| download_err(format!("{name}: {e}")))
        };

        Ok(Self {
            config: get(Self::CONFIG_FILE)?,
            tokenizer: get(Self::TOKENIZER_FILE)?,
            weights: get(Self::WEIGHTS_FILE)?,
        })
    }
}

/// Loads a tokenizer that truncates to `max_len` and pads each batch to its longest entry.
pub fn load_batch_tokenizer(path: &Path, max_len: usize) -> Result<Tokenizer, EmbeddingError> {
    let mut tokenizer =
        Tokenizer::from_file(path).map_err(|e| EmbeddingError::ModelLoadFailed {
            reason: format!("failed to load tokenizer {}: {}", path.display(), e),
        })?;

    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length: max_len,
            ..Default::default()
        }))
        .map_err(|e| EmbeddingError::InvalidConfig {
            reason: format!("failed to configure truncation: {}", e),
        })?;

    tokenizer.with_padding(Some(PaddingParams {
        strategy: PaddingStrategy::BatchLongest,
        ..Default::default()
    }));

    Ok(tokenizer)
}
