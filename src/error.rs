// HTTP API error types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::validation::FieldError;

/// HTTP API error with appropriate status codes and client-friendly messages.
///
/// Every variant renders as the uniform `{status, message, data?}` envelope.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    Validation(Vec<FieldError>),
    BadRequest(String),
    /// Duplicate relationship or self-reference. Same wire status as
    /// BadRequest, kept distinct so idempotence guards are recognizable.
    Conflict(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    Internal { context: String, cause: String },
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Validation(_) => 400,
            ApiError::BadRequest(_) => 400,
            ApiError::Conflict(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::Internal { .. } => 500,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Validation(_) => "Validation failed",
            ApiError::BadRequest(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Internal { context, .. } => context,
        }
    }

    /// Convert to the JSON envelope body.
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::Validation(errors) => json!({
                "status": self.status_code(),
                "message": self.message(),
                "data": errors,
            }),
            // Underlying cause goes to the operator-facing data slot,
            // never a stack trace.
            ApiError::Internal { context, cause } => json!({
                "status": 500,
                "message": context,
                "data": cause,
            }),
            _ => json!({
                "status": self.status_code(),
                "message": self.message(),
            }),
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    /// Wrap a persistence (or other unexpected) failure. `context` is the
    /// client-facing message, `cause` is kept for operator diagnosis.
    pub fn internal(context: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        let context = context.into();
        let cause = cause.to_string();
        tracing::error!("{} {}", context, cause);
        ApiError::Internal { context, cause }
    }
}

impl From<Vec<FieldError>> for ApiError {
    fn from(errors: Vec<FieldError>) -> Self {
        ApiError::Validation(errors)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
