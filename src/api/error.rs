//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthError;
use crate::inventory::InventoryError;
use crate::pagination::PaginationError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Listing parameters were rejected
    #[error("Invalid pagination: {0}")]
    Pagination(#[from] PaginationError),

    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Pagination(_) => (StatusCode::BAD_REQUEST, "INVALID_PAGINATION"),
            ApiError::Inventory(e) => match e {
                InventoryError::ProductNotFound(_) => (StatusCode::NOT_FOUND, "PRODUCT_NOT_FOUND"),
                InventoryError::DuplicateSku(_) => (StatusCode::CONFLICT, "DUPLICATE_SKU"),
                InventoryError::InsufficientStock { .. } => {
                    (StatusCode::CONFLICT, "INSUFFICIENT_STOCK")
                }
                InventoryError::Invalid { .. } | InventoryError::Csv(_) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
                }
                InventoryError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
            },
            ApiError::Auth(e) => match e {
                AuthError::MissingToken | AuthError::Rejected(_) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED")
                }
                AuthError::InvalidTransition { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "AUTH_STATE_ERROR")
                }
                AuthError::Timeout
                | AuthError::Unavailable
                | AuthError::Provider { .. }
                | AuthError::Request(_) => {
                    (StatusCode::SERVICE_UNAVAILABLE, "IDENTITY_PROVIDER_UNAVAILABLE")
                }
            },
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let request_id = uuid::Uuid::new_v4().to_string();

        if status.is_server_error() {
            tracing::error!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "API error occurred"
            );
        } else {
            tracing::debug!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "Request rejected"
            );
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err = ApiError::from(PaginationError::InvalidPage);
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let err = ApiError::from(InventoryError::DuplicateSku("A".into()));
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);

        let err = ApiError::from(AuthError::Rejected("nope".into()));
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);

        let err = ApiError::from(AuthError::MissingToken);
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);

        let err = ApiError::from(AuthError::Timeout);
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
