//! Route definitions for the `/snowflake` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::loads;
use crate::state::AppState;

/// Routes mounted at `/snowflake`.
///
/// ```text
/// POST   /copy-into              -> copy_into
/// GET    /monitor/{job_id}       -> monitor_job
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/copy-into", post(loads::copy_into))
        .route("/monitor/{job_id}", get(loads::monitor_job))
}
