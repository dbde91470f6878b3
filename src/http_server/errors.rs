//! # API Errors
//!
//! Error types for the item API, mapped onto HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// API errors
#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Requested item does not exist
    #[error("Item with id {0} not found")]
    NotFound(u64),

    /// Update request carried no fields
    #[error("No fields to update")]
    EmptyUpdate,

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Store failure (I/O, corruption, closed store)
    #[error("Internal error: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::EmptyUpdate => StatusCode::BAD_REQUEST,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<ApiError> for ErrorResponse {
    fn from(err: ApiError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
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
        assert_eq!(ApiError::NotFound(7).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::EmptyUpdate.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Store(StoreError::Closed).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_body_carries_message_and_code() {
        let body = ErrorResponse::from(ApiError::NotFound(42));
        assert_eq!(body.code, 404);
        assert_eq!(body.error, "Item with id 42 not found");
    }
}
