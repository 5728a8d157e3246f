#![allow(dead_code)]

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use loadmock_api::config::ServerConfig;
use loadmock_api::engine::JobTimeline;
use loadmock_api::router::build_app_router;
use loadmock_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a 30-second request timeout and the standard 2s/5s/8s job timeline.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        timeline: JobTimeline::default(),
    }
}

/// Build the full application router with a fresh registry and driver.
///
/// Returns the state as well so tests can inspect the registry directly.
pub fn build_test_app() -> (Router, AppState) {
    let config = test_config();
    let state = AppState::new(config.clone());
    (build_app_router(state.clone(), &config), state)
}

/// Send a GET request through the router.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body through the router.
pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    post_raw(app, uri, body.to_string()).await
}

/// Send a POST request with an arbitrary body labelled as JSON.
pub async fn post_raw(app: Router, uri: &str, body: impl Into<Body>) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Submit a batch and return the new job id.
pub async fn submit_rows(app: &Router, rows: Value) -> String {
    let response = post_json(
        app.clone(),
        "/snowflake/copy-into",
        serde_json::json!({
            "table_name": "RAW_TRANSACTIONS",
            "load_mode": "APPEND",
            "rows": rows,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    body_json(response).await["job_id"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Poll the monitor endpoint once and return status code and body.
pub async fn monitor(app: &Router, job_id: &str) -> (StatusCode, Value) {
    let response = get(app.clone(), &format!("/snowflake/monitor/{job_id}")).await;
    let status = response.status();
    (status, body_json(response).await)
}

/// Advance (paused) time by `ms` milliseconds.
pub async fn sleep_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}
