mod common;

use axum::http::{header, Method, Request, StatusCode};
use axum::body::Body;
use serde_json::json;

use common::{claims, request, send, sign, sign_with_rogue_key, test_app, token, KEY_ID};

/// Every protected route with the permission it requires
fn protected_routes() -> Vec<(Method, &'static str, &'static str)> {
    vec![
        (Method::GET, "/api/drinks-detail", "get:drinks-detail"),
        (Method::POST, "/api/drinks", "post:drinks"),
        (Method::PATCH, "/api/drinks/1", "patch:drinks"),
        (Method::DELETE, "/api/drinks/1", "delete:drinks"),
    ]
}

fn assert_auth_error(body: &serde_json::Value, status: StatusCode, code: &str) {
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], status.as_u16());
    assert_eq!(body["code"], code, "body: {body}");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn public_menu_needs_no_token() {
    let app = test_app().await;
    let (status, body) = send(&app, request(Method::GET, "/api/drinks", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "drinks": [] }));
}

#[tokio::test]
async fn missing_header_is_401_on_every_protected_route() {
    let app = test_app().await;
    for (method, uri, _) in protected_routes() {
        let (status, body) = send(&app, request(method.clone(), uri, None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_auth_error(&body, StatusCode::UNAUTHORIZED, "authorization_header_missing");
    }
}

#[tokio::test]
async fn non_bearer_header_is_invalid_header() {
    let app = test_app().await;
    for value in ["Basic dXNlcjpwYXNz", "Bearer", "Bearer a b"] {
        let request = Request::builder()
            .method(Method::GET)
            .uri("/api/drinks-detail")
            .header(header::AUTHORIZATION, value)
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "header {value:?}");
        assert_auth_error(&body, StatusCode::UNAUTHORIZED, "invalid_header");
    }
}

#[tokio::test]
async fn lowercase_bearer_scheme_is_accepted() {
    let app = test_app().await;
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/drinks-detail")
        .header(header::AUTHORIZATION, format!("bearer {}", token(&["get:drinks-detail"])))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn missing_permission_is_403_on_every_protected_route() {
    let app = test_app().await;
    for (method, uri, required) in protected_routes() {
        let others: Vec<&str> = protected_routes()
            .into_iter()
            .map(|(_, _, permission)| permission)
            .filter(|permission| *permission != required)
            .collect();
        let token = token(&others);

        let (status, body) = send(
            &app,
            request(method.clone(), uri, Some(&token), Some(common::water())),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{method} {uri}");
        assert_auth_error(&body, StatusCode::FORBIDDEN, "unauthorized");
    }
}

#[tokio::test]
async fn token_without_permissions_claim_is_400() {
    let app = test_app().await;
    let mut payload = claims(&[]);
    payload.as_object_mut().unwrap().remove("permissions");
    let token = sign(&payload, Some(KEY_ID));

    let (status, body) = send(&app, request(Method::GET, "/api/drinks-detail", Some(&token), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_auth_error(&body, StatusCode::BAD_REQUEST, "invalid_claims");
}

#[tokio::test]
async fn expired_token_is_401_before_permission_check() {
    let app = test_app().await;
    let mut payload = claims(&[]);
    let past = chrono::Utc::now().timestamp() - 3600;
    payload["iat"] = json!(past - 3600);
    payload["exp"] = json!(past);
    let token = sign(&payload, Some(KEY_ID));

    let (status, body) = send(&app, request(Method::GET, "/api/drinks-detail", Some(&token), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_auth_error(&body, StatusCode::UNAUTHORIZED, "token_expired");
}

#[tokio::test]
async fn token_expired_seconds_ago_is_rejected() {
    let app = test_app().await;
    let mut payload = claims(&["get:drinks-detail"]);
    let now = chrono::Utc::now().timestamp();
    payload["iat"] = json!(now - 600);
    payload["exp"] = json!(now - 30);
    let token = sign(&payload, Some(KEY_ID));

    let (status, body) = send(&app, request(Method::GET, "/api/drinks-detail", Some(&token), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_auth_error(&body, StatusCode::UNAUTHORIZED, "token_expired");
}

#[tokio::test]
async fn wrong_audience_or_issuer_is_invalid_claims() {
    let app = test_app().await;

    let mut wrong_audience = claims(&["get:drinks-detail"]);
    wrong_audience["aud"] = json!("tea");
    let mut wrong_issuer = claims(&["get:drinks-detail"]);
    wrong_issuer["iss"] = json!("https://evil.test/");
    let mut no_audience = claims(&["get:drinks-detail"]);
    no_audience.as_object_mut().unwrap().remove("aud");

    for payload in [wrong_audience, wrong_issuer, no_audience] {
        let token = sign(&payload, Some(KEY_ID));
        let (status, body) =
            send(&app, request(Method::GET, "/api/drinks-detail", Some(&token), None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "claims {payload}");
        assert_auth_error(&body, StatusCode::UNAUTHORIZED, "invalid_claims");
    }
}

#[tokio::test]
async fn unknown_key_id_is_401_invalid_header() {
    let app = test_app().await;
    for kid in [Some("rotated-away"), None] {
        let token = sign(&claims(&["get:drinks-detail"]), kid);
        let (status, body) =
            send(&app, request(Method::GET, "/api/drinks-detail", Some(&token), None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "kid {kid:?}");
        assert_auth_error(&body, StatusCode::UNAUTHORIZED, "invalid_header");
    }
}

#[tokio::test]
async fn bad_signature_or_garbage_is_400_invalid_header() {
    let app = test_app().await;
    let forged = sign_with_rogue_key(&claims(&["get:drinks-detail"]));

    for token in [forged.as_str(), "definitely.not.a-jwt", "abc"] {
        let (status, body) =
            send(&app, request(Method::GET, "/api/drinks-detail", Some(token), None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "token {token}");
        assert_auth_error(&body, StatusCode::BAD_REQUEST, "invalid_header");
    }
}

#[tokio::test]
async fn permission_order_in_claims_is_irrelevant() {
    let app = test_app().await;
    let token = token(&["delete:drinks", "patch:drinks", "get:drinks-detail"]);
    let (status, body) = send(&app, request(Method::GET, "/api/drinks-detail", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}
