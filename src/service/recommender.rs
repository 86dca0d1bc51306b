use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use super::error::RecommendError;
use crate::cache::{CacheError, CatalogSnapshot, CatalogVectorCache};
use crate::catalog::{CatalogItem, CatalogLoader, CatalogStats};
use crate::constants::DEFAULT_TOP_N;
use crate::embedding::Embedder;
use crate::ranking::{ExhaustiveRanker, RankedResult, Ranker, RankingError};

/// Semantic recommendation service.
///
/// Owns the catalog vector cache; the embedder and catalog source are injected.
/// Every method takes `&self` and is safe to call from many threads once the cache
/// is warm. Wrap in an `Arc` to share.
pub struct Recommender<E, L> {
    embedder: E,
    loader: L,
    ranker: Box<dyn Ranker>,
    cache: CatalogVectorCache,
    default_top_n: usize,
}

impl<E, L> std::fmt::Debug for Recommender<E, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recommender")
            .field("cache", &self.cache)
            .field("default_top_n", &self.default_top_n)
            .finish_non_exhaustive()
    }
}

impl<E: Embedder, L: CatalogLoader> Recommender<E, L> {
    /// Creates a recommender with an [`ExhaustiveRanker`]. Nothing is loaded until
    /// the first query or [`warm_up`](Self::warm_up).
    pub fn new(embedder: E, loader: L) -> Self {
        Self {
            embedder,
            loader,
            ranker: Box::new(ExhaustiveRanker::new()),
            cache: CatalogVectorCache::new(),
            default_top_n: DEFAULT_TOP_N,
        }
    }

    /// Swaps the ranking strategy (e.g. for an index-backed one on large catalogs).
    pub fn with_ranker<R: Ranker + 'static>(mut self, ranker: R) -> Self {
        self.ranker = Box::new(ranker);
        self
    }

    /// Sets the count used by [`recommend_default`](Self::recommend_default).
    pub fn with_default_top_n(mut self, top_n: usize) -> Self {
        self.default_top_n = top_n.max(1);
        self
    }

    pub fn default_top_n(&self) -> usize {
        self.default_top_n
    }

    /// Returns the `top_n` catalog items closest in meaning to `query`.
    ///
    /// The query is trimmed first; blank input is rejected before the model runs.
    #[instrument(skip(self, query), fields(query_len = query.len()))]
    pub fn recommend(
        &self,
        query: &str,
        top_n: usize,
    ) -> Result<Vec<RankedResult>, RecommendError> {
        let query = query.trim();
        if query.is_empty() {
            debug!("Rejecting blank query");
            return Err(RecommendError::InvalidQuery);
        }
        if top_n == 0 {
            return Err(RecommendError::InvalidTopN);
        }

        let snapshot = self.snapshot()?;
        let query_vector = self.embedder.embed(query)?;

        let results = self
            .ranker
            .rank(&query_vector, &snapshot, top_n)
            .map_err(|err| match err {
                RankingError::InvalidTopN => RecommendError::InvalidTopN,
                RankingError::DimensionMismatch { .. } => {
                    error!(
                        error = %err,
                        catalog_items = snapshot.len(),
                        "Query vector does not match cached catalog vectors"
                    );
                    RecommendError::InvariantViolation {
                        reason: err.to_string(),
                    }
                }
            })?;

        if results.is_empty() {
            return Err(RecommendError::NoMatches);
        }

        debug!(
            returned = results.len(),
            top_score = results[0].score,
            "Recommendations ready"
        );
        Ok(results)
    }

    /// [`recommend`](Self::recommend) with the configured default count.
    pub fn recommend_default(&self, query: &str) -> Result<Vec<RankedResult>, RecommendError> {
        self.recommend(query, self.default_top_n)
    }

    /// Builds the catalog vectors now instead of on the first query.
    pub fn warm_up(&self) -> Result<CatalogStats, RecommendError> {
        let snapshot = self.snapshot()?;
        let stats = snapshot.stats();
        info!(
            items = stats.total_items,
            categories = stats.distinct_categories,
            "Recommender warmed up"
        );
        Ok(stats)
    }

    /// Drops cached catalog vectors; the next call reloads and re-embeds.
    pub fn invalidate_catalog(&self) {
        self.cache.invalidate();
    }

    /// Returns `true` once catalog vectors are cached.
    pub fn is_warm(&self) -> bool {
        self.cache.is_built()
    }

    /// Item and category counts.
    ///
    /// Served from the cached snapshot while it matches the source revision,
    /// otherwise read straight from the source without embedding anything.
    pub fn catalog_stats(&self) -> Result<CatalogStats, RecommendError> {
        self.with_catalog_items(CatalogStats::from_items)
    }

    /// First `limit` catalog items in source order.
    pub fn catalog_preview(&self, limit: usize) -> Result<Vec<CatalogItem>, RecommendError> {
        self.with_catalog_items(|items| items.iter().take(limit).cloned().collect())
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    fn with_catalog_items<T>(
        &self,
        f: impl FnOnce(&[CatalogItem]) -> T,
    ) -> Result<T, RecommendError> {
        if let Some(snapshot) = self.cache.current_if_fresh(self.loader.revision()) {
            return Ok(f(snapshot.items()));
        }

        let items = self.loader.load().map_err(|e| {
            warn!(error = %e, "Catalog source failed");
            RecommendError::CatalogUnavailable {
                reason: e.to_string(),
            }
        })?;
        if items.is_empty() {
            return Err(RecommendError::CatalogUnavailable {
                reason: "catalog is empty".to_string(),
            });
        }
        Ok(f(&items))
    }

    fn snapshot(&self) -> Result<Arc<CatalogSnapshot>, RecommendError> {
        let snapshot = self
            .cache
            .get_or_build(&self.loader, &self.embedder)
            .map_err(|err| match err {
                CacheError::Catalog(e) => {
                    warn!(error = %e, "Catalog source failed");
                    RecommendError::CatalogUnavailable {
                        reason: e.to_string(),
                    }
                }
                CacheError::Embedding(e) => e.into(),
                other => {
                    error!(error = %other, "Catalog vectors violate cache invariants");
                    RecommendError::InvariantViolation {
                        reason: other.to_string(),
                    }
                }
            })?;

        if snapshot.is_empty() {
            return Err(RecommendError::CatalogUnavailable {
                reason: "catalog is empty".to_string(),
            });
        }
        Ok(snapshot)
    }
}
