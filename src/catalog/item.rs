use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Opaque catalog identifier.
///
/// Sources may carry ids as strings or integers; both deserialize into the same type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CatalogId(String);

impl CatalogId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CatalogId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<u64> for CatalogId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for CatalogId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Unsigned(u64),
            Signed(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Self(s),
            RawId::Unsigned(n) => Self(n.to_string()),
            RawId::Signed(n) => Self(n.to_string()),
        })
    }
}

/// One describable catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: CatalogId,
    pub title: String,
    /// Free text the item is embedded from. Never blank once inside a snapshot.
    pub description: String,
    /// Small closed label set, e.g. a content rating.
    pub category: String,
}

impl CatalogItem {
    pub fn new(
        id: impl Into<CatalogId>,
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            category: category.into(),
        }
    }

    /// Returns `true` if the description has non-whitespace content.
    #[inline]
    pub fn has_usable_description(&self) -> bool {
        !self.description.trim().is_empty()
    }
}

/// Raw row as delivered by a catalog source, before filtering.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogRow {
    pub id: CatalogId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "rating")]
    pub category: Option<String>,
}

impl CatalogRow {
    fn into_item(self) -> Option<CatalogItem> {
        let description = self.description?;
        if description.trim().is_empty() {
            return None;
        }
        Some(CatalogItem {
            id: self.id,
            title: self.title,
            description,
            category: self.category.unwrap_or_default(),
        })
    }
}

/// Drops rows without a usable description and repeated ids, preserving source order.
pub fn filter_usable(rows: Vec<CatalogRow>) -> Vec<CatalogItem> {
    let total = rows.len();
    let mut seen: HashSet<CatalogId> = HashSet::with_capacity(total);
    let mut items = Vec::with_capacity(total);
    let mut blank = 0usize;

    for row in rows {
        let Some(item) = row.into_item() else {
            blank += 1;
            continue;
        };
        if !seen.insert(item.id.clone()) {
            warn!(id = %item.id, "Dropping catalog row with duplicate id");
            continue;
        }
        items.push(item);
    }

    if blank > 0 {
        debug!(
            dropped = blank,
            kept = items.len(),
            "Dropped catalog rows without a description"
        );
    }

    items
}

/// Summary figures shown next to the search box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub total_items: usize,
    pub distinct_categories: usize,
}

impl CatalogStats {
    pub fn from_items(items: &[CatalogItem]) -> Self {
        let categories: BTreeSet<&str> = items.iter().map(|i| i.category.as_str()).collect();
        Self {
            total_items: items.len(),
            distinct_categories: categories.len(),
        }
    }
}
