//! In-memory catalog source with call-count instrumentation.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::RwLock;

use super::error::CatalogError;
use super::item::CatalogItem;
use super::loader::CatalogLoader;

/// Catalog held in memory. Every [`replace`](Self::replace) bumps the revision.
#[derive(Debug, Default)]
pub struct InMemoryCatalogLoader {
    items: RwLock<Vec<CatalogItem>>,
    revision: AtomicU64,
    loads: AtomicUsize,
    failing: AtomicBool,
    load_delay: RwLock<Option<Duration>>,
}

impl InMemoryCatalogLoader {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self {
            items: RwLock::new(items),
            ..Default::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Sleeps inside every `load` call, widening the window for concurrent callers.
    pub fn with_load_delay(self, delay: Duration) -> Self {
        *self.load_delay.write() = Some(delay);
        self
    }

    pub fn replace(&self, items: Vec<CatalogItem>) {
        *self.items.write() = items;
        self.revision.fetch_add(1, Ordering::AcqRel);
    }

    /// Bumps the revision without touching the content.
    pub fn touch(&self) {
        self.revision.fetch_add(1, Ordering::AcqRel);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Release);
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Acquire)
    }
}

impl CatalogLoader for InMemoryCatalogLoader {
    fn load(&self) -> Result<Vec<CatalogItem>, CatalogError> {
        self.loads.fetch_add(1, Ordering::AcqRel);

        if let Some(delay) = *self.load_delay.read() {
            std::thread::sleep(delay);
        }

        if self.failing.load(Ordering::Acquire) {
            return Err(CatalogError::SourceUnavailable {
                reason: "in-memory source marked as failing".to_string(),
            });
        }

        Ok(self
            .items
            .read()
            .iter()
            .filter(|item| item.has_usable_description())
            .cloned()
            .collect())
    }

    fn revision(&self) -> Option<u64> {
        Some(self.revision.load(Ordering::Acquire))
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}
