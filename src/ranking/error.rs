use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankingError {
    #[error("top_n must be at least 1")]
    InvalidTopN,

    #[error("query dimension {actual} does not match catalog dimension {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}
