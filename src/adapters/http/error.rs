//! HTTP error mapping.
//!
//! `ApiError` converts domain errors into JSON error responses with the
//! appropriate HTTP status. Handlers return `Result<impl IntoResponse,
//! ApiError>` and use `?` on anything that yields a `DomainError`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// Standard error response body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }
}

/// API error type that converts domain errors to HTTP responses.
#[derive(Debug)]
pub struct ApiError(DomainError);

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(DomainError::new(ErrorCode::ValidationFailed, message))
    }

    pub fn not_found(resource_type: &str, id: impl std::fmt::Display) -> Self {
        Self(
            DomainError::new(
                ErrorCode::CustomerNotFound,
                format!("{} not found: {}", resource_type, id),
            )
            .with_detail("id", id.to_string()),
        )
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(DomainError::from(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.code {
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat
            | ErrorCode::UnknownEventKind => StatusCode::BAD_REQUEST,
            ErrorCode::CustomerNotFound | ErrorCode::ChannelNotFound => StatusCode::NOT_FOUND,
            ErrorCode::DuplicateEmail => StatusCode::CONFLICT,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::DeliveryFailed | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            tracing::error!(code = %self.0.code, "request failed: {}", self.0.message);
        }

        let details = if self.0.details.is_empty() {
            None
        } else {
            serde_json::to_value(&self.0.details).ok()
        };

        let body = ErrorResponse {
            code: self.0.code.to_string(),
            message: self.0.message,
            details,
        };
        (status, Json(body)).into_response()
    }
}
