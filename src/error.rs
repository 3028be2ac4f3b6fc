//! Error types for the review server
//!
//! `CacheError` covers cache construction, `ApiError` covers the service
//! layer and converts into HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Configuration errors raised when building the cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Capacity must be a positive number of entries
    #[error("Cache capacity must be positive, got {0}")]
    InvalidCapacity(i64),
}

// == API Error Enum ==
/// Unified error type for the service and HTTP layers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Requested resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// Invalid request data
    #[error("{0}")]
    BadRequest(String),

    /// Request conflicts with existing data
    #[error("{0}")]
    Conflict(String),
}

impl ApiError {
    /// Not-found error in the form "`Resource` not found with `field`: `value`".
    pub fn not_found(resource: &str, field: &str, value: impl std::fmt::Display) -> Self {
        ApiError::NotFound(format!("{} not found with {}: {}", resource, field, value))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the service layer.
pub type Result<T> = std::result::Result<T, ApiError>;
