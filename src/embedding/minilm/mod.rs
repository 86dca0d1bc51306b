//! Sentence embedder for `all-MiniLM-L6-v2` (BERT + mean pooling).
//!
//! Use [`MiniLmConfig::stub`] for tests/local runs without model files.

/// MiniLM configuration.
pub mod config;


pub use config::MiniLmConfig;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::embedding::device::select_device;
use crate::embedding::embedder::Embedder;
use crate::embedding::error::EmbeddingError;
use crate::embedding::lazy::load_with_timeout;
use crate::embedding::utils::{ModelFiles, load_batch_tokenizer};
use crate::embedding::vector::EmbeddingVector;
use crate::hashing::hash_text;

enum EmbedderBackend {
    Model {
        model: BertModel,
        tokenizer: Tokenizer,
        device: Device,
    },
    Stub,
}

/// Frozen sentence-transformers model.
///
/// Loading maps the weights into memory and takes seconds; construct one per
/// process and share it (wrap in [`LazyEmbedder`](crate::embedding::LazyEmbedder)
/// to defer the load to first use).
pub struct MiniLmEmbedder {
    backend: EmbedderBackend,
    config: MiniLmConfig,
}

impl std::fmt::Debug for MiniLmEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiniLmEmbedder")
            .field(
                "backend",
                &match &self.backend {
                    EmbedderBackend::Model { device, .. } => format!("Model({:?})", device),
                    EmbedderBackend::Stub => "Stub".to_string(),
                },
            )
            .field("model_id", &self.config.model_id)
            .field("embedding_dim", &self.config.embedding_dim)
            .field("max_seq_len", &self.config.max_seq_len)
            .finish()
    }
}

impl MiniLmEmbedder {
    /// Loads the model, failing with [`EmbeddingError::LoadTimedOut`] if resolution
    /// and weight loading exceed `config.load_timeout`.
    pub fn load(config: MiniLmConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        if config.testing_stub {
            warn!("MiniLM embedder running in STUB mode (testing only)");
            return Ok(Self {
                backend: EmbedderBackend::Stub,
                config,
            });
        }

        let timeout = config.load_timeout;
        load_with_timeout(timeout, move || Self::load_model(config))
    }

    fn load_model(config: MiniLmConfig) -> Result<Self, EmbeddingError> {
        let device = select_device()?;
        debug!(?device, "Selected compute device for MiniLM");

        let files = match &config.model_dir {
            Some(dir) => ModelFiles::in_dir(dir)?,
            None => ModelFiles::from_hub(&config.model_id)?,
        };

        let raw_config = std::fs::read_to_string(&files.config)?;
        let bert_config: BertConfig =
            serde_json::from_str(&raw_config).map_err(|e| EmbeddingError::ModelLoadFailed {
                reason: format!("failed to parse {}: {}", files.config.display(), e),
            })?;

        if bert_config.hidden_size != config.embedding_dim {
            return Err(EmbeddingError::InvalidConfig {
                reason: format!(
                    "embedding_dim ({}) does not match model hidden_size ({})",
                    config.embedding_dim, bert_config.hidden_size
                ),
            });
        }

        let tokenizer = load_batch_tokenizer(&files.tokenizer, config.max_seq_len)?;

        // SAFETY: the safetensors file is only read; it must not be modified while mapped.
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[&files.weights], DType::F32, &device)
        }
        .map_err(|e| EmbeddingError::ModelLoadFailed {
            reason: format!("failed to map weights: {}", e),
        })?;

        let model = BertModel::load(vb, &bert_config).map_err(|e| {
            EmbeddingError::ModelLoadFailed {
                reason: format!("failed to build BERT model: {}", e),
            }
        })?;

        info!(
            model = %config.model_dir.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| config.model_id.clone()),
            embedding_dim = config.embedding_dim,
            max_seq_len = config.max_seq_len,
            num_layers = bert_config.num_hidden_layers,
            "MiniLM model loaded"
        );

        Ok(Self {
            backend: EmbedderBackend::Model {
                model,
                tokenizer,
                device,
            },
            config,
        })
    }

    fn embed_chunk(
        &self,
        texts: &[&str],
        model: &BertModel,
        tokenizer: &Tokenizer,
        device: &Device,
    ) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
        let encodings = tokenizer.encode_batch(texts.to_vec(), true).map_err(|e| {
            EmbeddingError::TokenizationFailed {
                reason: e.to_string(),
            }
        })?;

        let ids = encodings
            .iter()
            .map(|enc| Tensor::new(enc.get_ids(), device))
            .collect::<candle_core::Result<Vec<_>>>()?;
        let masks = encodings
            .iter()
            .map(|enc| Tensor::new(enc.get_attention_mask(), device))
            .collect::<candle_core::Result<Vec<_>>>()?;

        // [batch, seq_len]
        let input_ids = Tensor::stack(&ids, 0)?;
        let attention_mask = Tensor::stack(&masks, 0)?;
        let token_type_ids = input_ids.zeros_like()?;

        debug!(
            batch = texts.len(),
            seq_len = input_ids.dim(1)?,
            "MiniLM forward pass"
        );

        // [batch, seq_len, hidden]
        let hidden = model.forward(&input_ids, &token_type_ids, Some(&attention_mask))?;

        // Mean over real tokens only; padding is masked out.
        let mask = attention_mask.to_dtype(DType::F32)?.unsqueeze(2)?;
        let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
        let counts = mask.sum(1)?.maximum(1e-9f32)?;
        let pooled = summed.broadcast_div(&counts)?;

        Ok(pooled
            .to_vec2::<f32>()?
            .into_iter()
            .map(EmbeddingVector::normalized)
            .collect())
    }

    fn embed_stub(&self, text: &str) -> EmbeddingVector {
        let digest = hash_text(text);
        let mut seed = [0u8; 8];
        seed.copy_from_slice(&digest[..8]);
        let mut state = u64::from_le_bytes(seed);

        let values = (0..self.config.embedding_dim)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
                ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0
            })
            .collect();

        EmbeddingVector::normalized(values)
    }

    /// Returns `true` if a model is loaded.
    pub fn has_model(&self) -> bool {
        matches!(self.backend, EmbedderBackend::Model { .. })
    }

    /// Returns the embedder configuration.
    pub fn config(&self) -> &MiniLmConfig {
        &self.config
    }
}

impl Embedder for MiniLmEmbedder {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        match &self.backend {
            EmbedderBackend::Model {
                model,
                tokenizer,
                device,
            } => {
                let mut vectors = Vec::with_capacity(texts.len());
                for chunk in texts.chunks(self.config.batch_size) {
                    vectors.extend(self.embed_chunk(chunk, model, tokenizer, device)?);
                }
                Ok(vectors)
            }
            EmbedderBackend::Stub => Ok(texts.iter().map(|t| self.embed_stub(t)).collect()),
        }
    }

    fn dimension(&self) -> usize {
        self.config.embedding_dim
    }

    fn is_stub(&self) -> bool {
        matches!(self.backend, EmbedderBackend::Stub)
    }
}
