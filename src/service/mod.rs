//! Recommendation entry point.
//!
//! [`Recommender`] validates the query, pulls the embedded catalog from its
//! [`CatalogVectorCache`](crate::cache::CatalogVectorCache), embeds the query with
//! the same model and ranks. Failure classes stay distinct so callers can tell a
//! broken model environment from an unreachable catalog (see [`RecommendError`]).

pub mod error;
pub mod recommender;

#[cfg(test)]
mod tests;

pub use error::RecommendError;
pub use recommender::Recommender;
