//! Custom error types for the users service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::ApiResponse;

/// Failure returned by a route, rendered as a `success: false` envelope
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Bad request with message
    #[error("{0}")]
    BadRequest(String),

    /// Resource not found with message
    #[error("{0}")]
    NotFound(String),

    /// Internal server error with message
    #[error("{0}")]
    InternalServerError(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::InternalServerError(msg) => msg,
        };

        let message = if message.is_empty() {
            "Internal Server Error".to_string()
        } else {
            message
        };

        ApiResponse::failure(status, message).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
