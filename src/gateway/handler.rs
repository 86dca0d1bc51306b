use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::catalog::{CatalogItem, CatalogLoader, CatalogStats};
use crate::embedding::Embedder;
use crate::gateway::error::GatewayError;
use crate::gateway::state::AppState;
use crate::ranking::RankedResult;

/// Default item count for `/v1/catalog/preview`.
pub const DEFAULT_PREVIEW_LIMIT: usize = 10;
/// Upper bound on `/v1/catalog/preview?limit=`.
pub const MAX_PREVIEW_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecommendRequest {
    pub query: String,
    #[serde(default)]
    pub top_n: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub id: String,
    pub title: String,
    pub category: String,
    pub score: f32,
}

impl From<RankedResult> for Recommendation {
    fn from(result: RankedResult) -> Self {
        Self {
            id: result.item.id.as_str().to_string(),
            title: result.item.title,
            category: result.item.category,
            score: result.score,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub results: Vec<Recommendation>,
}

#[derive(Debug, Deserialize)]
pub struct PreviewParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub items: Vec<CatalogItem>,
}

#[instrument(skip(state, request), fields(top_n = tracing::field::Empty))]
pub async fn recommendations_handler<E, L>(
    State(state): State<AppState<E, L>>,
    Json(request): Json<serde_json::Value>,
) -> Result<Json<RecommendResponse>, GatewayError>
where
    E: Embedder + 'static,
    L: CatalogLoader + 'static,
{
    let request: RecommendRequest = serde_json::from_value(request)
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid request schema: {}", e)))?;

    let top_n = request
        .top_n
        .unwrap_or_else(|| state.recommender.default_top_n());
    tracing::Span::current().record("top_n", top_n);

    if top_n > state.max_top_n {
        return Err(GatewayError::InvalidRequest(format!(
            "top_n must be at most {}",
            state.max_top_n
        )));
    }

    let recommender = state.recommender.clone();
    let results = run_blocking(move || recommender.recommend(&request.query, top_n)).await?;

    debug!(returned = results.len(), "Recommendations served");

    Ok(Json(RecommendResponse {
        results: results.into_iter().map(Recommendation::from).collect(),
    }))
}

#[instrument(skip(state))]
pub async fn catalog_stats_handler<E, L>(
    State(state): State<AppState<E, L>>,
) -> Result<Json<CatalogStats>, GatewayError>
where
    E: Embedder + 'static,
    L: CatalogLoader + 'static,
{
    let recommender = state.recommender.clone();
    let stats = run_blocking(move || recommender.catalog_stats()).await?;
    Ok(Json(stats))
}

#[instrument(skip(state))]
pub async fn catalog_preview_handler<E, L>(
    State(state): State<AppState<E, L>>,
    Query(params): Query<PreviewParams>,
) -> Result<Json<PreviewResponse>, GatewayError>
where
    E: Embedder + 'static,
    L: CatalogLoader + 'static,
{
    let limit = params
        .limit
        .unwrap_or(DEFAULT_PREVIEW_LIMIT)
        .min(MAX_PREVIEW_LIMIT);

    let recommender = state.recommender.clone();
    let items = run_blocking(move || recommender.catalog_preview(limit)).await?;
    Ok(Json(PreviewResponse { items }))
}

async fn run_blocking<T, F>(work: F) -> Result<T, GatewayError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, crate::service::RecommendError> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| GatewayError::InternalError(e.to_string()))?
        .map_err(GatewayError::from)
}
