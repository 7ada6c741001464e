use axum::http::{header::AUTHORIZATION, HeaderMap};
use jsonwebtoken::{decode, decode_header, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use std::sync::Arc;
use thiserror::Error;

use super::claims::Claims;
use super::error::AuthError;
use super::jwks::{KeySetError, KeySource, RemoteKeySet, StaticKeySet};
use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum GuardError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    KeySet(#[from] KeySetError),
}

/// Pull the bearer token out of the `Authorization` header.
pub fn get_token_auth_header(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(AuthError::header_missing)?
        .to_str()
        .map_err(|_| AuthError::malformed_header("Authorization header must be bearer token."))?;

    let parts: Vec<&str> = value.split_whitespace().collect();
    match parts.as_slice() {
        [scheme, ..] if !scheme.eq_ignore_ascii_case("bearer") => Err(
            AuthError::malformed_header("Authorization header must start with \"Bearer\"."),
        ),
        [_] => Err(AuthError::malformed_header("Token not found.")),
        [_, token] => Ok(*token),
        _ => Err(AuthError::malformed_header(
            "Authorization header must be bearer token.",
        )),
    }
}

/// Exact membership test of `permission` in the token's permissions claim.
pub fn check_permissions(permission: &str, claims: &Claims) -> Result<(), AuthError> {
    let granted = claims
        .permissions
        .as_ref()
        .ok_or_else(AuthError::permissions_missing)?;

    if granted.iter().any(|p| p == permission) {
        Ok(())
    } else {
        Err(AuthError::permission_denied())
    }
}

/// Verifies bearer tokens against the issuer's key set.
pub struct AuthVerifier {
    keys: Arc<dyn KeySource>,
    validation: Validation,
}

impl AuthVerifier {
    pub fn new(
        keys: Arc<dyn KeySource>,
        issuer: &str,
        audience: &str,
        algorithms: &[Algorithm],
    ) -> Self {
        let mut validation = Validation::new(algorithms.first().copied().unwrap_or(Algorithm::RS256));
        if !algorithms.is_empty() {
            validation.algorithms = algorithms.to_vec();
        }
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.leeway = 0;

        Self { keys, validation }
    }

    /// Static key file when configured, otherwise the issuer's JWKS endpoint
    pub fn from_config(config: &AppConfig) -> Result<Self, KeySetError> {
        let keys: Arc<dyn KeySource> = match (&config.auth.jwks_path, &config.auth.jwks_url) {
            (Some(path), _) => Arc::new(StaticKeySet::from_file(path)?),
            (None, Some(url)) => Arc::new(RemoteKeySet::new(url.clone())?),
            (None, None) => Arc::new(RemoteKeySet::for_domain(&config.auth.domain)?),
        };

        // Unknown names are rejected by AppConfig::validate
        let algorithms: Vec<Algorithm> = config
            .auth
            .algorithms
            .iter()
            .filter_map(|alg| alg.parse().ok())
            .collect();

        Ok(Self::new(
            keys,
            &config.issuer(),
            &config.auth.audience,
            &algorithms,
        ))
    }

    /// Decode the token and verify signature, expiry, issuer and audience.
    pub async fn verify_decode_jwt(&self, token: &str) -> Result<Claims, GuardError> {
        let header = decode_header(token).map_err(|_| AuthError::unparsable_token())?;
        let kid = header
            .kid
            .ok_or_else(|| AuthError::malformed_header("Authorization malformed."))?;

        let key_set = self.keys.key_set().await?;
        let jwk = key_set.find(&kid).ok_or_else(AuthError::unknown_key)?;
        let key = DecodingKey::from_jwk(jwk).map_err(|_| AuthError::unparsable_token())?;

        decode::<Claims>(token, &key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| classify_decode_error(&e).into())
    }

    /// Full guard pipeline: header, token, then permission.
    pub async fn requires_auth(
        &self,
        headers: &HeaderMap,
        permission: &str,
    ) -> Result<Claims, GuardError> {
        let token = get_token_auth_header(headers)?;
        let claims = self.verify_decode_jwt(token).await?;
        check_permissions(permission, &claims)?;
        Ok(claims)
    }
}

fn classify_decode_error(err: &jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::token_expired(),
        ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience => AuthError::invalid_claims(),
        ErrorKind::MissingRequiredClaim(claim) if claim == "iss" || claim == "aud" => {
            AuthError::invalid_claims()
        }
        _ => AuthError::unparsable_token(),
    }
}
