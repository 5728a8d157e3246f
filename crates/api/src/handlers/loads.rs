//! Handlers for the warehouse load endpoints.
//!
//! Submission registers the job and returns immediately; the job's timeline
//! runs on the driver. Monitoring is a pure read of the registry.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use loadmock_core::job::LoadCommand;

use crate::error::{AppError, AppResult};
use crate::response::{JobStatusResponse, JobSubmissionResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

/// POST /snowflake/copy-into
///
/// Queue a batch for loading. Returns 202 with the job id; the outcome is
/// available later from the monitor endpoint.
pub async fn copy_into(
    State(state): State<AppState>,
    Json(command): Json<LoadCommand>,
) -> AppResult<impl IntoResponse> {
    if command.table_name.trim().is_empty() {
        return Err(AppError::BadRequest("table_name must not be blank".into()));
    }

    let record = state.driver.submit(command).await;

    Ok((
        StatusCode::ACCEPTED,
        Json(JobSubmissionResponse::from(record.as_ref())),
    ))
}

// ---------------------------------------------------------------------------
// Monitor
// ---------------------------------------------------------------------------

/// GET /snowflake/monitor/{job_id}
///
/// Current status of a job. `rows_loaded` and `error_details` stay `null`
/// until the job is terminal.
pub async fn monitor_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> AppResult<Json<JobStatusResponse>> {
    let record = state.registry.get(&job_id).await?;
    Ok(Json(JobStatusResponse::from(record.as_ref())))
}
