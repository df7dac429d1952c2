#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use http_body_util::BodyExt;
use tower::ServiceExt;

use hallpass_api::actor::PassRegistry;
use hallpass_api::config::{AdminCredentials, ServerConfig};
use hallpass_api::router::build_app_router;
use hallpass_api::state::AppState;
use hallpass_db::MemoryStore;

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASS: &str = "s3cret:pass";

/// Build a test `ServerConfig` with safe defaults and admin credentials.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        resource_name: "hallpass".to_string(),
        admin: Some(AdminCredentials {
            user: ADMIN_USER.to_string(),
            pass: ADMIN_PASS.to_string(),
        }),
        database_url: None,
        in_memory_store: true,
    }
}

/// A running app over an in-memory store, plus the store for inspection.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub passes: Arc<PassRegistry>,
}

/// Build the full application router over a fresh in-memory store.
pub fn build_test_app() -> TestApp {
    build_test_app_with(test_config())
}

pub fn build_test_app_with(config: ServerConfig) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let passes = Arc::new(PassRegistry::new(store.clone()));
    let state = AppState {
        config: Arc::new(config.clone()),
        passes: Some(Arc::clone(&passes)),
    };
    TestApp {
        router: build_app_router(state, &config),
        store,
        passes,
    }
}

/// Build the router with no pass store configured.
pub fn build_app_without_store(config: ServerConfig) -> Router {
    let state = AppState {
        config: Arc::new(config.clone()),
        passes: None,
    };
    build_app_router(state, &config)
}

pub fn basic_auth(user: &str, pass: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{user}:{pass}")))
}

pub fn admin_auth() -> String {
    basic_auth(ADMIN_USER, ADMIN_PASS)
}

/// Send a request through a clone of the router.
pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    post_raw(app, uri, body.to_string(), None).await
}

pub async fn admin_post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    post_raw(app, uri, body.to_string(), Some(admin_auth())).await
}

pub async fn post_raw(
    app: &Router,
    uri: &str,
    body: String,
    authorization: Option<String>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(auth) = authorization {
        builder = builder.header("authorization", auth);
    }
    send(app, builder.body(Body::from(body)).unwrap()).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
