use std::sync::Arc;

use crate::constants::DEFAULT_MAX_TOP_N;
use crate::service::Recommender;

/// Shared handler state. Cloned per request; the recommender itself is shared.
pub struct AppState<E, L> {
    pub recommender: Arc<Recommender<E, L>>,

    /// Largest `top_n` a request may ask for.
    pub max_top_n: usize,
}

impl<E, L> Clone for AppState<E, L> {
    fn clone(&self) -> Self {
        Self {
            recommender: Arc::clone(&self.recommender),
            max_top_n: self.max_top_n,
        }
    }
}

impl<E, L> AppState<E, L> {
    pub fn new(recommender: Arc<Recommender<E, L>>) -> Self {
        Self {
            recommender,
            max_top_n: DEFAULT_MAX_TOP_N,
        }
    }

    pub fn with_max_top_n(mut self, max_top_n: usize) -> Self {
        self.max_top_n = max_top_n;
        self
    }
}
