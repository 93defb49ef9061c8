#![allow(dead_code)]

use std::sync::Arc;

use astroquiz_api::{
    config::Config,
    create_router,
    services::{rank_seed, AppState},
    store::MemoryStore,
};
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

fn test_config() -> Config {
    Config {
        listen_addr: "127.0.0.1:0".to_string(),
        seed_default_ranks: false,
    }
}

fn build_app(store: Arc<MemoryStore>) -> Router {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let state = Arc::new(AppState::new(test_config(), store));
    create_router(state)
}

/// App with the default rank ladder seeded, plus a handle on the store so
/// tests can assert persisted state directly.
pub async fn create_test_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    rank_seed::bootstrap(store.as_ref())
        .await
        .expect("failed to seed ranks");
    (build_app(store.clone()), store)
}

/// App with an empty rank table, for tests that configure their own bands.
pub async fn create_bare_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (build_app(store.clone()), store)
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Fire one request and decode the response body as JSON (Null when empty).
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
