use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use tracing::{debug, info};

use super::error::CatalogError;
use super::item::{CatalogItem, CatalogRow, filter_usable};
use crate::hashing::hash_to_u64;

/// Source of catalog items.
///
/// `load` returns only items with a usable description. `revision` is a cheap
/// change marker the vector cache polls before reusing a snapshot; `None` means the
/// source cannot tell, in which case the cache is refreshed only by explicit
/// invalidation.
pub trait CatalogLoader: Send + Sync {
    fn load(&self) -> Result<Vec<CatalogItem>, CatalogError>;

    fn revision(&self) -> Option<u64> {
        None
    }

    /// Human-readable source name for logs.
    fn describe(&self) -> String;
}

impl<L: CatalogLoader + ?Sized> CatalogLoader for std::sync::Arc<L> {
    fn load(&self) -> Result<Vec<CatalogItem>, CatalogError> {
        (**self).load()
    }

    fn revision(&self) -> Option<u64> {
        (**self).revision()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Loads the catalog from a JSON array of rows.
///
/// Each row is `{"id", "title", "description", "category"}`; `rating` is accepted in
/// place of `category` and rows with a null or blank description are skipped.
#[derive(Debug, Clone)]
pub struct JsonCatalogLoader {
    path: PathBuf,
}

impl JsonCatalogLoader {
    /// Revision reported while the file is missing or unreadable.
    pub const MISSING_REVISION: u64 = u64::MAX;

    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogLoader for JsonCatalogLoader {
    fn load(&self) -> Result<Vec<CatalogItem>, CatalogError> {
        let bytes = std::fs::read(&self.path).map_err(|source| CatalogError::Io {
            path: self.path.clone(),
            source,
        })?;

        let rows: Vec<CatalogRow> =
            serde_json::from_slice(&bytes).map_err(|e| CatalogError::Parse {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;

        let row_count = rows.len();
        let items = filter_usable(rows);

        info!(
            path = %self.path.display(),
            rows = row_count,
            items = items.len(),
            "Catalog loaded"
        );

        Ok(items)
    }

    /// Derived from file length and modification time.
    ///
    /// A file that cannot be stat'd reports [`Self::MISSING_REVISION`], so a cached
    /// snapshot goes stale and the next load surfaces the error.
    fn revision(&self) -> Option<u64> {
        let meta = match std::fs::metadata(&self.path) {
            Ok(meta) => meta,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "Catalog metadata unavailable");
                return Some(Self::MISSING_REVISION);
            }
        };

        let modified = meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_nanos())
            .unwrap_or_default();

        let mut key = [0u8; 24];
        key[..8].copy_from_slice(&meta.len().to_le_bytes());
        key[8..].copy_from_slice(&modified.to_le_bytes()[..16]);
        Some(hash_to_u64(&key))
    }

    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }
}
