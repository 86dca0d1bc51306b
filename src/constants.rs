//! Cross-cutting, shared constants.

/// Output dimension of `all-MiniLM-L6-v2`.
pub const MINILM_EMBEDDING_DIM: usize = 384;

/// Token limit the sentence-transformers checkpoint was trained with.
pub const DEFAULT_MAX_SEQ_LEN: usize = 256;

/// Descriptions fed to the model per forward pass inside one batch call.
pub const DEFAULT_BATCH_SIZE: usize = 64;

/// Hugging Face model id downloaded when no local model directory is configured.
pub const DEFAULT_MODEL_ID: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Upper bound on a model load (download + weight mapping).
pub const DEFAULT_MODEL_LOAD_TIMEOUT_SECS: u64 = 120;

/// Number of recommendations returned when the caller does not ask for a count.
pub const DEFAULT_TOP_N: usize = 3;

/// Largest `top_n` the HTTP surface accepts.
pub const DEFAULT_MAX_TOP_N: usize = 50;

/// Catalog size past which an exhaustive scan per query stops being a sensible default.
///
/// Above this, plug an index-backed [`Ranker`](crate::ranking::Ranker) into the
/// recommender instead of [`ExhaustiveRanker`](crate::ranking::ExhaustiveRanker).
pub const EXHAUSTIVE_SCAN_LIMIT: usize = 20_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_n_defaults_are_consistent() {
        assert!(DEFAULT_TOP_N > 0);
        assert!(DEFAULT_TOP_N <= DEFAULT_MAX_TOP_N);
    }
}
