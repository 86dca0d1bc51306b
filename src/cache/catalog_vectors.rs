use std::sync::Arc;
use std::time::Instant;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::error::CacheError;
use super::snapshot::CatalogSnapshot;
use crate::catalog::CatalogLoader;
use crate::embedding::{Embedder, EmbeddingVector};
use crate::hashing::fingerprint_catalog;

/// Embedded catalog shared by all queries.
///
/// # Build discipline
///
/// Readers take the read lock just long enough to clone the snapshot `Arc`. A
/// rebuild happens under `build_lock`, and the freshness check is repeated once the
/// lock is held, so N concurrent first callers cause exactly one catalog load and one
/// batch embedding; the others wait and reuse its result.
///
/// # Freshness
///
/// A snapshot is reused while the loader's [`revision`](CatalogLoader::revision)
/// matches the one it was built at (or the loader reports none). A new revision
/// triggers a reload; if the reloaded content has the same fingerprint the existing
/// vectors are kept. Failures and empty catalogs are never stored, so every call
/// re-checks the source.
#[derive(Debug, Default)]
pub struct CatalogVectorCache {
    current: RwLock<Option<Arc<CatalogSnapshot>>>,
    build_lock: Mutex<()>,
}

impl CatalogVectorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached snapshot, building it first if missing or stale.
    pub fn get_or_build(
        &self,
        loader: &dyn CatalogLoader,
        embedder: &dyn Embedder,
    ) -> Result<Arc<CatalogSnapshot>, CacheError> {
        let revision = loader.revision();
        if let Some(snapshot) = self.fresh(revision) {
            return Ok(snapshot);
        }

        let _guard = self.build_lock.lock();

        // Another caller may have finished a build while we waited.
        let revision = loader.revision();
        if let Some(snapshot) = self.fresh(revision) {
            debug!("Catalog snapshot built by a concurrent caller");
            return Ok(snapshot);
        }

        self.build(loader, embedder, revision)
    }

    /// Returns the cached snapshot without building or checking freshness.
    pub fn current(&self) -> Option<Arc<CatalogSnapshot>> {
        self.current.read().clone()
    }

    /// Returns the cached snapshot only if it is still current for `revision`.
    pub fn current_if_fresh(&self, revision: Option<u64>) -> Option<Arc<CatalogSnapshot>> {
        self.fresh(revision)
    }

    /// Drops the cached snapshot; the next call rebuilds.
    pub fn invalidate(&self) {
        let _guard = self.build_lock.lock();
        if self.current.write().take().is_some() {
            info!("Catalog vector cache invalidated");
        }
    }

    pub fn is_built(&self) -> bool {
        self.current.read().is_some()
    }

    fn fresh(&self, revision: Option<u64>) -> Option<Arc<CatalogSnapshot>> {
        let current = self.current.read();
        let snapshot = current.as_ref()?;
        match (revision, snapshot.revision()) {
            (None, _) => Some(Arc::clone(snapshot)),
            (Some(now), Some(built)) if now == built => Some(Arc::clone(snapshot)),
            _ => None,
        }
    }

    fn build(
        &self,
        loader: &dyn CatalogLoader,
        embedder: &dyn Embedder,
        revision: Option<u64>,
    ) -> Result<Arc<CatalogSnapshot>, CacheError> {
        let started = Instant::now();
        let items = loader.load()?;
        let fingerprint = fingerprint_catalog(&items);
        let dimension = embedder.dimension();

        if items.is_empty() {
            warn!(source = %loader.describe(), "Catalog is empty, recommendations unavailable");
            self.current.write().take();
            return Ok(Arc::new(CatalogSnapshot::empty(
                dimension,
                revision,
                fingerprint,
            )));
        }

        let previous = self.current.read().clone();
        if let Some(previous) = previous.filter(|p| p.fingerprint() == &fingerprint) {
            debug!(
                source = %loader.describe(),
                items = previous.len(),
                "Catalog revision changed but content did not, keeping vectors"
            );
            let refreshed = Arc::new(previous.with_revision(revision));
            *self.current.write() = Some(Arc::clone(&refreshed));
            return Ok(refreshed);
        }

        let texts: Vec<&str> = items.iter().map(|i| i.description.as_str()).collect();
        let vectors = embedder.embed_batch(&texts)?;
        validate_vectors(&vectors, items.len(), dimension)?;

        let snapshot = Arc::new(CatalogSnapshot::new(
            Arc::from(items),
            Arc::from(vectors),
            dimension,
            revision,
            fingerprint,
        ));

        info!(
            source = %loader.describe(),
            items = snapshot.len(),
            dimension,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Catalog vectors built"
        );

        *self.current.write() = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }
}

fn validate_vectors(
    vectors: &[EmbeddingVector],
    expected_len: usize,
    dimension: usize,
) -> Result<(), CacheError> {
    if vectors.len() != expected_len {
        return Err(CacheError::VectorCountMismatch {
            expected: expected_len,
            actual: vectors.len(),
        });
    }

    if let Some((index, v)) = vectors.iter().enumerate().find(|(_, v)| v.dim() != dimension) {
        return Err(CacheError::DimensionMismatch {
            index,
            expected: dimension,
            actual: v.dim(),
        });
    }

    Ok(())
}
