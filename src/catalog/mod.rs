//! Catalog source: the describable items recommendations are drawn from.
//!
//! The relational store itself is an external collaborator. A [`CatalogLoader`]
//! returns flat `(id, title, description, category)` rows and only items with a
//! usable description get this far (see [`filter_usable`]).

pub mod error;
pub mod item;
pub mod loader;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(test)]
mod tests;

pub use error::CatalogError;
pub use item::{CatalogId, CatalogItem, CatalogRow, CatalogStats, filter_usable};
pub use loader::{CatalogLoader, JsonCatalogLoader};
#[cfg(any(test, feature = "mock"))]
pub use mock::InMemoryCatalogLoader;
