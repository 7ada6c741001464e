use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

use crate::auth::{AuthVerifier, KeySetError};
use crate::config::{AppConfig, ConfigError, SecurityConfig};
use crate::database::{Database, DatabaseError, DrinkRepository};
use crate::handlers::{protected, public};
use crate::require_permission;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    KeySet(#[from] KeySetError),
}

/// Everything a request handler needs, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Database,
    pub auth: Arc<AuthVerifier>,
}

impl AppState {
    pub fn new(config: AppConfig, db: Database, auth: AuthVerifier) -> Self {
        Self {
            config: Arc::new(config),
            db,
            auth: Arc::new(auth),
        }
    }

    /// Validate config, open the database, ensure the schema and set up the
    /// token verifier.
    pub async fn from_config(config: AppConfig) -> Result<Self, StartupError> {
        config.validate()?;

        let db = Database::connect(&config.database).await?;
        db.init_schema().await?;
        if config.database.reset_on_startup {
            warn!("DATABASE_RESET_ON_STARTUP is set, existing drinks will be removed");
            db.reset().await?;
        }

        let auth = AuthVerifier::from_config(&config)?;
        Ok(Self::new(config, db, auth))
    }

    pub fn drinks(&self) -> DrinkRepository {
        DrinkRepository::new(self.db.pool().clone())
    }
}

pub fn app(state: AppState) -> Router {
    let router = Router::new()
        // Public
        .route("/", get(public::system::root))
        .route("/health", get(public::system::health))
        .route("/api/drinks", get(public::drinks::list))
        // Protected
        .merge(drink_routes(&state))
        .fallback(public::system::not_found)
        .layer(TraceLayer::new_for_http());

    let router = match cors_layer(&state.config.security) {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router.with_state(state)
}

fn drink_routes(state: &AppState) -> Router<AppState> {
    let verifier = &state.auth;

    Router::new()
        .route(
            "/api/drinks-detail",
            get(protected::drinks::detail)
                .route_layer(require_permission!(verifier.clone(), "get:drinks-detail")),
        )
        .route(
            "/api/drinks",
            post(protected::drinks::create)
                .route_layer(require_permission!(verifier.clone(), "post:drinks")),
        )
        .route(
            "/api/drinks/:id",
            patch(protected::drinks::update)
                .route_layer(require_permission!(verifier.clone(), "patch:drinks"))
                .merge(
                    axum::routing::delete(protected::drinks::delete)
                        .route_layer(require_permission!(verifier.clone(), "delete:drinks")),
                ),
        )
}

fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }
    if security.cors_origins.iter().any(|origin| origin == "*") {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
    )
}
