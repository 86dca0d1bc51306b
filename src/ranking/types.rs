use serde::Serialize;

use crate::catalog::CatalogItem;

/// One recommendation.
///
/// `score` is the raw cosine similarity in `[-1, 1]`; presentation rounds it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub item: CatalogItem,
    pub score: f32,
}

impl RankedResult {
    #[inline]
    pub fn title(&self) -> &str {
        &self.item.title
    }

    #[inline]
    pub fn category(&self) -> &str {
        &self.item.category
    }
}
