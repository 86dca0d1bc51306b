//! Similarity ranking over a catalog snapshot.
//!
//! [`Ranker`] takes the whole snapshot, so an index-backed implementation can replace
//! [`ExhaustiveRanker`] without touching callers once catalogs outgrow a linear scan
//! (see [`EXHAUSTIVE_SCAN_LIMIT`](crate::constants::EXHAUSTIVE_SCAN_LIMIT)).

pub mod error;
pub mod ranker;
pub mod types;


pub use error::RankingError;
pub use ranker::{ExhaustiveRanker, Ranker};
pub use types::RankedResult;
