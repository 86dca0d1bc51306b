//! Cinematch library crate (used by the server binary and integration tests).
//!
//! Semantic film recommendations: catalog descriptions and free-text queries are
//! embedded with the same sentence model and ranked by cosine similarity.
//!
//! # Public API Surface
//!
//! ## Core
//! - [`Recommender`], [`RecommendError`] - Query validation, caching and ranking
//! - [`CatalogLoader`], [`JsonCatalogLoader`], [`CatalogItem`] - Catalog source
//! - [`CatalogVectorCache`], [`CatalogSnapshot`] - Embedded catalog, built once
//! - [`Ranker`], [`ExhaustiveRanker`], [`RankedResult`] - Similarity ranking
//!
//! ## Embedding
//! - [`Embedder`], [`EmbeddingVector`] - Text to unit vector
//! - [`MiniLmEmbedder`], [`MiniLmConfig`] - `all-MiniLM-L6-v2` on candle
//! - [`LazyEmbedder`] - Defers the model load to first use
//!
//! ## Server
//! - [`Config`], [`ConfigError`] - Environment configuration
//! - [`gateway`] - Axum router and handlers
//!
//! ## Test/Mock Support
//! `HashingEmbedder` and `InMemoryCatalogLoader` are available behind
//! `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod gateway;
pub mod hashing;
pub mod ranking;
pub mod service;

pub use cache::{CacheError, CatalogSnapshot, CatalogVectorCache};
pub use catalog::{
    CatalogError, CatalogId, CatalogItem, CatalogLoader, CatalogStats, JsonCatalogLoader,
};
#[cfg(any(test, feature = "mock"))]
pub use catalog::InMemoryCatalogLoader;
pub use config::{Config, ConfigError};
pub use embedding::{
    Embedder, EmbeddingError, EmbeddingVector, LazyEmbedder, MiniLmConfig, MiniLmEmbedder,
};
#[cfg(any(test, feature = "mock"))]
pub use embedding::HashingEmbedder;
pub use hashing::{fingerprint_catalog, hash_text, hash_to_u64};
pub use ranking::{ExhaustiveRanker, RankedResult, Ranker, RankingError};
pub use service::{RecommendError, Recommender};
