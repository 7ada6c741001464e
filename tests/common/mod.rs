#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

use coffee_shop_api::auth::{AuthVerifier, StaticKeySet};
use coffee_shop_api::config::AppConfig;
use coffee_shop_api::database::Database;
use coffee_shop_api::{app, AppState};

pub const KEY_ID: &str = "coffee-shop-test-key";
pub const ISSUER: &str = "https://coffee-shop.test/";
pub const AUDIENCE: &str = "drinks";

const JWKS: &str = include_str!("../fixtures/test_jwks.json");
const SIGNING_KEY: &str = include_str!("../fixtures/test_signing_key.pem");
const ROGUE_SIGNING_KEY: &str = include_str!("../fixtures/rogue_signing_key.pem");

pub const BARISTA: &[&str] = &["get:drinks-detail"];
pub const MANAGER: &[&str] = &[
    "get:drinks-detail",
    "post:drinks",
    "patch:drinks",
    "delete:drinks",
];

/// Router over a fresh in-memory database and the fixture key set
pub async fn test_app() -> Router {
    let mut config = AppConfig::from_env();
    config.auth.domain = "coffee-shop.test".to_string();
    config.auth.audience = AUDIENCE.to_string();
    config.database.url = "sqlite::memory:".to_string();

    let db = Database::connect_with("sqlite::memory:", 1, 5)
        .await
        .expect("in-memory database");
    db.init_schema().await.expect("schema");

    let keys = StaticKeySet::from_json(JWKS).expect("fixture key set");
    let verifier = AuthVerifier::new(Arc::new(keys), ISSUER, AUDIENCE, &[Algorithm::RS256]);

    app(AppState::new(config, db, verifier))
}

pub fn claims(permissions: &[&str]) -> Value {
    let now = chrono::Utc::now().timestamp();
    json!({
        "iss": ISSUER,
        "sub": "auth0|test-user",
        "aud": [AUDIENCE, "https://coffee-shop.test/userinfo"],
        "iat": now,
        "exp": now + 3600,
        "permissions": permissions,
    })
}

pub fn sign(claims: &Value, kid: Option<&str>) -> String {
    sign_with(claims, kid, SIGNING_KEY)
}

pub fn sign_with_rogue_key(claims: &Value) -> String {
    sign_with(claims, Some(KEY_ID), ROGUE_SIGNING_KEY)
}

fn sign_with(claims: &Value, kid: Option<&str>, pem: &str) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = kid.map(String::from);
    let key = EncodingKey::from_rsa_pem(pem.as_bytes()).expect("fixture signing key");
    encode(&header, claims, &key).expect("signed token")
}

/// Valid token granting `permissions`
pub fn token(permissions: &[&str]) -> String {
    sign(&claims(permissions), Some(KEY_ID))
}

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    (status, body)
}

pub fn water() -> Value {
    json!({
        "title": "Water",
        "recipe": [{ "color": "blue", "name": "water", "parts": 1 }]
    })
}

/// Create a drink through the API and return its id
pub async fn create_drink(app: &Router, body: Value) -> i64 {
    let token = token(MANAGER);
    let (status, body) = send(app, request(Method::POST, "/api/drinks", Some(&token), Some(body))).await;
    assert_eq!(status, StatusCode::OK, "create failed: {body}");
    body["drinks"][0]["id"].as_i64().expect("drink id")
}
