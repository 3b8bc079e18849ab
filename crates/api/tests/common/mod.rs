#![allow(dead_code)]

use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use folio_api::config::ServerConfig;
use folio_api::router::build_app_router;
use folio_api::state::AppState;
use folio_history::config::HistoryConfig;
use http_body_util::BodyExt;
use tower::ServiceExt;

pub const USER: &str = "7";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
    }
}

/// Build the full application router over in-memory stores.
pub fn build_test_app() -> Router {
    build_test_app_with(HistoryConfig::default())
}

pub fn build_test_app_with(history: HistoryConfig) -> Router {
    let config = test_config();
    let state = AppState::in_memory(config.clone(), history);
    build_app_router(state, &config)
}

/// Send a request with an optional JSON body, acting as `user` when given.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    user: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("x-user-id", user);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(USER), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a post through the API and return its id.
pub async fn create_post(app: &Router, title: &str, content: &str) -> i64 {
    let response = send(
        app,
        Method::POST,
        "/api/v1/posts",
        Some(USER),
        Some(serde_json::json!({ "title": title, "content": content })),
    )
    .await;
    assert_eq!(response.status(), 201);
    body_json(response).await["data"]["post_id"]
        .as_i64()
        .unwrap()
}

/// Replace a post's content through the API; returns the revision timestamp.
///
/// Revisions are keyed by millisecond, so each edit waits for the clock to
/// move on first.
pub async fn edit_post(app: &Router, post_id: i64, content: &str) -> i64 {
    tokio::time::sleep(Duration::from_millis(3)).await;
    let response = send(
        app,
        Method::PUT,
        &format!("/api/v1/posts/{post_id}"),
        Some(USER),
        Some(serde_json::json!({ "content": content })),
    )
    .await;
    assert_eq!(response.status(), 200);
    body_json(response).await["data"]["revision"]
        .as_i64()
        .unwrap()
}
