//! Shared helpers for HTTP-level integration tests.
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use sellerdesk_api::auth::jwt::{generate_access_token, JwtConfig};
use sellerdesk_api::config::ServerConfig;
use sellerdesk_api::router::build_app_router;
use sellerdesk_api::state::AppState;
use sellerdesk_core::types::DbId;

/// Id carried by master tokens minted in tests. No seller row backs it.
pub const MASTER_ID: DbId = 9_000;

pub const TEST_PASSWORD: &str = "password-1234";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        lock_timeout_ms: 500,
        db_max_connections: 5,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// The production router over `pool`, with the test configuration.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: std::sync::Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

pub fn master_token() -> String {
    generate_access_token(MASTER_ID, "master", &test_config().jwt).unwrap()
}

pub fn seller_token(seller_id: DbId) -> String {
    generate_access_token(seller_id, "seller", &test_config().jwt).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

fn request(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header("authorization", format!("Bearer {token}")),
        None => builder,
    }
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, request(Method::GET, uri, None).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(
        app,
        request(Method::GET, uri, Some(token))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(
        app,
        request(Method::POST, uri, None)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(
        app,
        request(Method::PUT, uri, Some(token))
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(
        app,
        request(Method::DELETE, uri, Some(token))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Signup payload whose identifiers are derived from `n`.
pub fn signup_body(n: u32) -> serde_json::Value {
    serde_json::json!({
        "account": format!("seller_{n:03}"),
        "password": TEST_PASSWORD,
        "korean_name": format!("셀러 {n}"),
        "english_name": format!("seller {n}"),
        "cs_phone": format!("02-100-{n:04}"),
        "property_id": 2,
        "managers": [{
            "name": format!("manager {n}"),
            "email": format!("manager{n}@example.com"),
            "phone_number": format!("010-2000-{n:04}"),
        }],
    })
}

/// Sign up through the API and return the new seller id.
pub async fn sign_up(pool: &PgPool, n: u32) -> DbId {
    let response = post_json(build_test_app(pool.clone()), "/api/v1/sellers", signup_body(n)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["seller_id"]
        .as_i64()
        .unwrap()
}
