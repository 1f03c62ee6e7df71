//! # REST API Errors
//!
//! Error types for the `/all-posts` endpoint.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::content::StoreError;

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

/// REST API errors
#[derive(Debug, Clone, Error)]
pub enum RestError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Invalid query parameter
    #[error("Invalid query parameter: {0}")]
    InvalidQueryParam(String),

    // ==================
    // Upstream Errors (5xx)
    // ==================
    /// Content store failed executing the query
    #[error("{0}")]
    Store(#[from] StoreError),
}

impl RestError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::InvalidQueryParam(_) => StatusCode::BAD_REQUEST,
            RestError::Store(StoreError::Unavailable(_)) => StatusCode::BAD_GATEWAY,
            RestError::Store(StoreError::InvalidQuery(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<RestError> for ErrorResponse {
    fn from(err: RestError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error: err.to_string(),
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            RestError::InvalidQueryParam("test".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RestError::from(StoreError::Unavailable("down".to_string())).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            RestError::from(StoreError::InvalidQuery("bad".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_body() {
        let body = ErrorResponse::from(RestError::InvalidQueryParam("Invalid page: x".to_string()));
        assert_eq!(body.code, 400);
        assert_eq!(body.error, "Invalid query parameter: Invalid page: x");
    }
}
