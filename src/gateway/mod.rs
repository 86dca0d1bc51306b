//! HTTP gateway (Axum) in front of the [`Recommender`](crate::service::Recommender).
//!
//! Recommendation work is synchronous and CPU-bound, so handlers run it on tokio's
//! blocking pool.

pub mod error;
pub mod handler;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::{ErrorResponse, GatewayError};
pub use handler::{catalog_preview_handler, catalog_stats_handler, recommendations_handler};
pub use state::AppState;

use crate::catalog::CatalogLoader;
use crate::embedding::Embedder;

/// Response header carrying a short machine-readable outcome.
pub const CINEMATCH_STATUS_HEADER: &str = "x-cinematch-status";
pub const CINEMATCH_STATUS_HEALTHY: &str = "healthy";
pub const CINEMATCH_STATUS_READY: &str = "ready";
pub const CINEMATCH_STATUS_NOT_READY: &str = "not_ready";

pub fn create_router_with_state<E, L>(state: AppState<E, L>) -> Router
where
    E: Embedder + 'static,
    L: CatalogLoader + 'static,
{
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler::<E, L>))
        .route("/v1/recommendations", post(recommendations_handler::<E, L>))
        .route("/v1/catalog/stats", get(catalog_stats_handler::<E, L>))
        .route("/v1/catalog/preview", get(catalog_preview_handler::<E, L>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub catalog: &'static str,
    pub embedder_mode: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        CINEMATCH_STATUS_HEADER,
        HeaderValue::from_static(CINEMATCH_STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

/// Ready once catalog vectors are cached; until then queries would pay the build.
#[tracing::instrument(skip(state))]
pub async fn ready_handler<E, L>(State(state): State<AppState<E, L>>) -> Response
where
    E: Embedder + 'static,
    L: CatalogLoader + 'static,
{
    let is_ready = state.recommender.is_warm();

    let embedder_mode = if !is_ready {
        "pending"
    } else if state.recommender.embedder().is_stub() {
        "stub"
    } else {
        "real"
    };

    let components = ComponentStatus {
        http: CINEMATCH_STATUS_READY,
        catalog: if is_ready {
            CINEMATCH_STATUS_READY
        } else {
            CINEMATCH_STATUS_NOT_READY
        },
        embedder_mode,
    };

    let (status_code, status_msg) = if is_ready {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "pending")
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        CINEMATCH_STATUS_HEADER,
        HeaderValue::from_static(if is_ready {
            CINEMATCH_STATUS_READY
        } else {
            CINEMATCH_STATUS_NOT_READY
        }),
    );

    (
        status_code,
        headers,
        Json(ReadyResponse {
            status: status_msg,
            components,
        }),
    )
        .into_response()
}
