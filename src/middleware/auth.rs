use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::auth::AuthVerifier;
use crate::error::ApiError;

/// Middleware state: the verifier plus the permission one route requires
#[derive(Clone)]
pub struct PermissionGuard {
    verifier: Arc<AuthVerifier>,
    permission: &'static str,
}

impl PermissionGuard {
    pub fn new(verifier: Arc<AuthVerifier>, permission: &'static str) -> Self {
        Self {
            verifier,
            permission,
        }
    }
}

/// Rejects the request unless its bearer token grants the guard's permission.
/// On success the decoded `Claims` are available to the handler as an extension.
pub async fn permission_middleware(
    State(guard): State<PermissionGuard>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = guard
        .verifier
        .requires_auth(request.headers(), guard.permission)
        .await?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Layer requiring `$permission` on the routes it wraps.
///
/// ```rust,ignore
/// Router::new()
///     .route("/api/drinks-detail", get(drinks::detail))
///     .route_layer(require_permission!(verifier, "get:drinks-detail"));
/// ```
#[macro_export]
macro_rules! require_permission {
    ($verifier:expr, $permission:expr) => {
        axum::middleware::from_fn_with_state(
            $crate::middleware::auth::PermissionGuard::new($verifier, $permission),
            $crate::middleware::auth::permission_middleware,
        )
    };
}
