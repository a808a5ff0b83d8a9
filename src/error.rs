// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

/// Message returned for failures that were not anticipated at a call site.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 500 Internal Server Error, with the failing dependency's detail attached
    DependencyFailure { message: String, details: String },

    // 500 Internal Server Error; the detail is logged, never returned
    Unexpected(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::DependencyFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::DependencyFailure { message, .. } => message,
            ApiError::Unexpected(_) => UNEXPECTED_ERROR_MESSAGE,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::DependencyFailure { message, details } => json!({
                "error": message,
                "details": details
            }),
            _ => json!({ "error": self.message() }),
        }
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn dependency_failure(message: impl Into<String>, details: impl Into<String>) -> Self {
        ApiError::DependencyFailure {
            message: message.into(),
            details: details.into(),
        }
    }

    pub fn unexpected(detail: impl Into<String>) -> Self {
        ApiError::Unexpected(detail.into())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::unexpected(format!("JSON error: {}", err))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Unexpected(detail) => write!(f, "{}: {}", UNEXPECTED_ERROR_MESSAGE, detail),
            ApiError::DependencyFailure { message, details } => write!(f, "{}: {}", message, details),
            _ => write!(f, "{}", self.message()),
        }
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        if let ApiError::Unexpected(detail) = &self {
            tracing::error!("Unexpected error: {}", detail);
        }
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
