// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::auth::{AuthError, GuardError};
use crate::database::DatabaseError;

/// HTTP API error rendered as `{success: false, error: <status>, message}`
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest,

    // 404 Not Found
    NotFound,

    // 422 Unprocessable Entity
    UnprocessableEntity,

    // 500 Internal Server Error
    InternalServerError,

    // Guard rejection, carries its own status and reason
    Auth(AuthError),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::UnprocessableEntity => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Auth(err) => err.status,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &'static str {
        match self {
            ApiError::BadRequest => "Bad Request",
            ApiError::NotFound => "Resource Not Found",
            ApiError::UnprocessableEntity => "unprocessable",
            ApiError::InternalServerError => "Internal Server Error",
            ApiError::Auth(err) => err.description,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::Auth(err) => json!({
                "success": false,
                "error": err.status.as_u16(),
                "code": err.code,
                "message": err.description,
            }),
            _ => json!({
                "success": false,
                "error": self.status_code().as_u16(),
                "message": self.message(),
            }),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}

impl From<GuardError> for ApiError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::Auth(err) => ApiError::Auth(err),
            GuardError::KeySet(err) => {
                tracing::error!("Signing key set unavailable: {}", err);
                ApiError::InternalServerError
            }
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(_) => ApiError::NotFound,
            other => {
                // Log the real error but return generic message
                tracing::error!("Database error: {}", other);
                ApiError::InternalServerError
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
