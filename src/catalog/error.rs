use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while fetching the catalog from its source.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog at {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("catalog source unavailable: {reason}")]
    SourceUnavailable { reason: String },
}
