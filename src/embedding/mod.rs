//! Embedding + model utilities.
//!
//! - [`Embedder`] is the seam the rest of the crate depends on.
//! - [`minilm`] provides the production `all-MiniLM-L6-v2` embedder.
//! - [`LazyEmbedder`] defers the expensive model load to first use.

/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod embedder;
mod error;
/// Load-once wrapper and load timeout.
pub mod lazy;
/// MiniLM sentence embedder.
pub mod minilm;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
/// Model file resolution and tokenizer setup.
pub mod utils;
mod vector;

pub use embedder::Embedder;
pub use error::EmbeddingError;
pub use lazy::{LazyEmbedder, load_with_timeout};
pub use minilm::{MiniLmConfig, MiniLmEmbedder};
#[cfg(any(test, feature = "mock"))]
pub use mock::HashingEmbedder;
pub use vector::EmbeddingVector;
