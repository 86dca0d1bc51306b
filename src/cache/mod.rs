//! Catalog vector cache.
//!
//! Holds the embedded catalog as an immutable [`CatalogSnapshot`] and guarantees
//! at most one build runs at a time (see [`CatalogVectorCache`]).

pub mod catalog_vectors;
pub mod error;
pub mod snapshot;


pub use catalog_vectors::CatalogVectorCache;
pub use error::CacheError;
pub use snapshot::CatalogSnapshot;
