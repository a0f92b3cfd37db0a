#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use todos_api::config::{ServerConfig, StoreBackend, StoreConfig};
use todos_api::router::build_app_router;
use todos_api::state::AppState;
use todos_db::{DocumentCollection, StoreTimeouts, TodoRepo};
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults and the in-memory backend.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:9000".parse().unwrap()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../../static")),
        store: StoreConfig {
            backend: StoreBackend::Memory,
            read_timeout_secs: 10,
            write_timeout_secs: 5,
            connect_timeout_secs: 10,
        },
    }
}

/// Build the full application router over `collection`.
///
/// Uses the same builder as `main.rs` so tests exercise the production
/// middleware stack.
pub fn build_test_app(collection: Arc<dyn DocumentCollection>) -> Router {
    build_test_app_with_timeouts(collection, StoreTimeouts::default())
}

pub fn build_test_app_with_timeouts(
    collection: Arc<dyn DocumentCollection>,
    timeouts: StoreTimeouts,
) -> Router {
    let config = test_config();
    let state = AppState {
        todos: TodoRepo::new(collection, timeouts),
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

pub async fn send(app: Router, method: Method, uri: &str, body: Body) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, Body::empty()).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Body::empty()).await
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Body::from(json.to_string())).await
}

pub async fn put_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Body::from(json.to_string())).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
