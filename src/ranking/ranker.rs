use std::cmp::Ordering;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

use tracing::{debug, warn};

use super::error::RankingError;
use super::types::RankedResult;
use crate::cache::CatalogSnapshot;
use crate::constants::EXHAUSTIVE_SCAN_LIMIT;
use crate::embedding::EmbeddingVector;

/// Nearest-neighbour search over an embedded catalog.
///
/// Implementations return `min(top_n, snapshot.len())` results ordered by score
/// descending, with equal scores in catalog order.
pub trait Ranker: Send + Sync {
    fn rank(
        &self,
        query: &EmbeddingVector,
        snapshot: &CatalogSnapshot,
        top_n: usize,
    ) -> Result<Vec<RankedResult>, RankingError>;
}

/// Scores every catalog vector against the query.
///
/// O(n·d) per query. Partial selection keeps the sort to the `top_n` winners.
#[derive(Debug, Default)]
pub struct ExhaustiveRanker {
    // Catalog size last warned about, so a large catalog logs once rather than per query.
    warned_size: AtomicUsize,
}

impl ExhaustiveRanker {
    pub fn new() -> Self {
        Self::default()
    }

    fn warn_if_oversized(&self, len: usize) {
        if len > EXHAUSTIVE_SCAN_LIMIT && self.warned_size.swap(len, AtomicOrdering::Relaxed) != len
        {
            warn!(
                items = len,
                limit = EXHAUSTIVE_SCAN_LIMIT,
                "Catalog exceeds exhaustive scan limit; consider an index-backed ranker"
            );
        }
    }
}

/// Higher score first; equal scores keep catalog order.
#[inline]
fn by_rank(a: &(usize, f32), b: &(usize, f32)) -> Ordering {
    b.1.total_cmp(&a.1).then(a.0.cmp(&b.0))
}

impl Ranker for ExhaustiveRanker {
    fn rank(
        &self,
        query: &EmbeddingVector,
        snapshot: &CatalogSnapshot,
        top_n: usize,
    ) -> Result<Vec<RankedResult>, RankingError> {
        if top_n == 0 {
            return Err(RankingError::InvalidTopN);
        }
        if snapshot.is_empty() {
            return Ok(vec![]);
        }
        if query.dim() != snapshot.dimension() {
            return Err(RankingError::DimensionMismatch {
                expected: snapshot.dimension(),
                actual: query.dim(),
            });
        }

        self.warn_if_oversized(snapshot.len());

        let mut scored: Vec<(usize, f32)> = snapshot
            .vectors()
            .iter()
            .map(|v| query.dot(v))
            .enumerate()
            .collect();

        let keep = top_n.min(scored.len());
        if keep < scored.len() {
            scored.select_nth_unstable_by(keep - 1, by_rank);
            scored.truncate(keep);
        }
        scored.sort_unstable_by(by_rank);

        debug!(
            candidates = snapshot.len(),
            returned = scored.len(),
            best = ?scored.first().map(|(_, s)| *s),
            "Ranked catalog"
        );

        let items = snapshot.items();
        Ok(scored
            .into_iter()
            .map(|(index, score)| RankedResult {
                item: items[index].clone(),
                score,
            })
            .collect())
    }
}
