//! Mapping of search failures onto HTTP responses

use crate::provider::ProviderError;
use crate::search::SearchError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error returned by the HTTP handlers
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        let status = match &err {
            SearchError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            SearchError::Provider(ProviderError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
            SearchError::Provider(_) => StatusCode::BAD_GATEWAY,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::warn!(status = %self.status, "search failed: {}", self.message);
        }
        (self.status, Json(ErrorResponse { error: self.message })).into_response()
    }
}
