//! Response bodies for the load endpoints.
//!
//! These shapes are the public contract polled by clients, so they are kept
//! flat (no `{ "data": ... }` envelope) and every optional field is always
//! present, serialized as `null` when unset.

use loadmock_core::job::{ErrorDetails, JobRecord, JobStatus};
use serde::{Deserialize, Serialize};

/// Body of `202 Accepted` from `POST /snowflake/copy-into`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSubmissionResponse {
    pub job_id: String,
    pub status: JobStatus,
    pub message: String,
}

impl From<&JobRecord> for JobSubmissionResponse {
    fn from(record: &JobRecord) -> Self {
        Self {
            job_id: record.job_id().to_string(),
            status: record.status(),
            message: record.status().message().to_string(),
        }
    }
}

/// Body of `200 OK` from `GET /snowflake/monitor/{job_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatusResponse {
    pub job_id: String,
    pub status: JobStatus,
    pub message: String,
    pub rows_loaded: Option<usize>,
    pub error_details: Option<ErrorDetails>,
}

impl From<&JobRecord> for JobStatusResponse {
    fn from(record: &JobRecord) -> Self {
        Self {
            job_id: record.job_id().to_string(),
            status: record.status(),
            message: record.status().message().to_string(),
            rows_loaded: record.rows_loaded(),
            error_details: record.error().cloned(),
        }
    }
}
