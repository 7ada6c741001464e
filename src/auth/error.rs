use axum::http::StatusCode;
use thiserror::Error;

/// Rejection raised by the authorization guard.
///
/// `code` is the machine readable reason (`authorization_header_missing`,
/// `invalid_header`, `token_expired`, `invalid_claims`, `unauthorized`) and
/// `status` the HTTP status the rejection is reported with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {description}")]
pub struct AuthError {
    pub code: &'static str,
    pub description: &'static str,
    pub status: StatusCode,
}

impl AuthError {
    pub const fn new(code: &'static str, description: &'static str, status: StatusCode) -> Self {
        Self {
            code,
            description,
            status,
        }
    }

    pub const fn header_missing() -> Self {
        Self::new(
            "authorization_header_missing",
            "Authorization header is expected.",
            StatusCode::UNAUTHORIZED,
        )
    }

    pub const fn malformed_header(description: &'static str) -> Self {
        Self::new("invalid_header", description, StatusCode::UNAUTHORIZED)
    }

    pub const fn unknown_key() -> Self {
        Self::new(
            "invalid_header",
            "Unable to find the appropriate key.",
            StatusCode::UNAUTHORIZED,
        )
    }

    pub const fn unparsable_token() -> Self {
        Self::new(
            "invalid_header",
            "Unable to parse authentication token.",
            StatusCode::BAD_REQUEST,
        )
    }

    pub const fn token_expired() -> Self {
        Self::new("token_expired", "Token expired.", StatusCode::UNAUTHORIZED)
    }

    pub const fn invalid_claims() -> Self {
        Self::new(
            "invalid_claims",
            "Incorrect claims. Please, check the audience and issuer.",
            StatusCode::UNAUTHORIZED,
        )
    }

    pub const fn permissions_missing() -> Self {
        Self::new(
            "invalid_claims",
            "Permissions not included in JWT.",
            StatusCode::BAD_REQUEST,
        )
    }

    pub const fn permission_denied() -> Self {
        Self::new("unauthorized", "Permission not found.", StatusCode::FORBIDDEN)
    }
}
