use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use super::CINEMATCH_STATUS_HEADER;
use crate::service::RecommendError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Recommend(#[from] RecommendError),

    /// The blocking task running the core panicked or was cancelled.
    #[error("internal error: {0}")]
    InternalError(String),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    pub kind: &'static str,
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::Recommend(err) => match err {
                RecommendError::InvalidQuery | RecommendError::InvalidTopN => {
                    StatusCode::BAD_REQUEST
                }
                RecommendError::CatalogUnavailable { .. }
                | RecommendError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                RecommendError::NoMatches => StatusCode::NOT_FOUND,
                RecommendError::Embedding(_) | RecommendError::InvariantViolation { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            GatewayError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::InvalidRequest(_) => "invalid_query",
            GatewayError::Recommend(err) => err.kind(),
            GatewayError::InternalError(_) => "internal",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();

        if status.is_server_error() {
            error!(error = %self, kind, "Request failed");
        }

        let mut headers = HeaderMap::new();
        headers.insert(CINEMATCH_STATUS_HEADER, HeaderValue::from_static(kind));

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
            kind,
        });

        (status, headers, body).into_response()
    }
}
