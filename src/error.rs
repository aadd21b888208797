//! Service error types with HTTP status code mapping.
//!
//! [`ActivityError`] is the central error type. Each variant maps to a
//! numeric code and an HTTP status, and renders as a structured JSON body.
//! The recording path never lets these reach a client; the entity CRUD
//! endpoints do.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2002,
///     "message": "forbidden: entity store-1 is owned by another user",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category               | HTTP Status                  |
/// |-----------|------------------------|------------------------------|
/// | 1000–1999 | Validation             | 400 Bad Request              |
/// | 2000–2999 | Identity / Not Found   | 401 / 403 / 404              |
/// | 3000–3999 | Server / Upstream      | 500 / 502                    |
#[derive(Debug, thiserror::Error)]
pub enum ActivityError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Unsupported entity kind string.
    #[error("invalid entity kind: {0}")]
    InvalidEntityKind(String),

    /// Entity with the given id was not found.
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    /// Caller does not own the entity it tried to change.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// No caller identity was supplied.
    #[error("missing or empty x-user-id header")]
    Unauthenticated,

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Geolocation lookup failed.
    #[error("geolocation lookup failed: {0}")]
    GeoLookup(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ActivityError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::InvalidEntityKind(_) => 1002,
            Self::EntityNotFound(_) => 2001,
            Self::Forbidden(_) => 2002,
            Self::Unauthenticated => 2003,
            Self::Internal(_) => 3000,
            Self::Persistence(_) => 3001,
            Self::GeoLookup(_) => 3002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InvalidEntityKind(_) => StatusCode::BAD_REQUEST,
            Self::EntityNotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Persistence(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::GeoLookup(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ActivityError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
