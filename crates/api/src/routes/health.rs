use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Jobs held in the registry since startup.
    pub jobs_tracked: usize,
}

/// Service index payload listing the public endpoints.
#[derive(Serialize)]
pub struct IndexResponse {
    pub message: &'static str,
    pub version: &'static str,
    pub endpoints: IndexEndpoints,
}

#[derive(Serialize)]
pub struct IndexEndpoints {
    pub submit_job: &'static str,
    pub monitor_job: &'static str,
}

/// GET / -- service name, version and endpoint map.
async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        message: "Mock Snowflake API",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: IndexEndpoints {
            submit_job: "POST /snowflake/copy-into",
            monitor_job: "GET /snowflake/monitor/{job_id}",
        },
    })
}

/// GET /health -- returns service health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        jobs_tracked: state.registry.len().await,
    })
}

/// Mount the index and health check routes at root level.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
}
