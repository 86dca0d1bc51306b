use std::sync::Arc;

use crate::catalog::{CatalogItem, CatalogStats};
use crate::embedding::EmbeddingVector;

/// Embedded catalog, immutable once built.
///
/// `items()[i]` and `vectors()[i]` describe the same item.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    items: Arc<[CatalogItem]>,
    vectors: Arc<[EmbeddingVector]>,
    dimension: usize,
    revision: Option<u64>,
    fingerprint: [u8; 32],
}

impl CatalogSnapshot {
    /// Pairs items with their vectors. Callers have already checked lengths and dimensions.
    pub(crate) fn new(
        items: Arc<[CatalogItem]>,
        vectors: Arc<[EmbeddingVector]>,
        dimension: usize,
        revision: Option<u64>,
        fingerprint: [u8; 32],
    ) -> Self {
        debug_assert_eq!(items.len(), vectors.len());
        Self {
            items,
            vectors,
            dimension,
            revision,
            fingerprint,
        }
    }

    pub(crate) fn empty(dimension: usize, revision: Option<u64>, fingerprint: [u8; 32]) -> Self {
        Self::new(
            Arc::from(Vec::new()),
            Arc::from(Vec::new()),
            dimension,
            revision,
            fingerprint,
        )
    }

    /// Same content under a new source revision; vectors are shared, not re-embedded.
    pub(crate) fn with_revision(&self, revision: Option<u64>) -> Self {
        Self {
            revision,
            ..self.clone()
        }
    }

    #[inline]
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    #[inline]
    pub fn vectors(&self) -> &[EmbeddingVector] {
        &self.vectors
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Dimension shared by every vector in the snapshot.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Source revision the snapshot was built or last confirmed at.
    #[inline]
    pub fn revision(&self) -> Option<u64> {
        self.revision
    }

    /// BLAKE3 fingerprint of the catalog content.
    #[inline]
    pub fn fingerprint(&self) -> &[u8; 32] {
        &self.fingerprint
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats::from_items(&self.items)
    }

    /// Returns `true` if both snapshots share the same vector allocation.
    pub fn shares_vectors_with(&self, other: &CatalogSnapshot) -> bool {
        Arc::ptr_eq(&self.vectors, &other.vectors)
    }
}
