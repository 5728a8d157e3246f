//! Load job record and its state machine.
//!
//! A [`JobRecord`] is an immutable snapshot. Every state change goes through
//! [`JobRecord::transition`], which returns the successor snapshot or refuses
//! the change, so a stored record can never be half-updated (for example
//! `SUCCESS` without a row count).

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{JobId, Row, Timestamp};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle state of a load job.
///
/// States advance strictly in declaration order; `Success` and `Failed` are
/// the two alternative terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Queued,
    ResumingWarehouse,
    Executing,
    Success,
    Failed,
}

impl JobStatus {
    /// Position along the forward path. Both terminal states share the last
    /// position.
    pub fn stage(self) -> u8 {
        match self {
            JobStatus::Queued => 0,
            JobStatus::ResumingWarehouse => 1,
            JobStatus::Executing => 2,
            JobStatus::Success | JobStatus::Failed => 3,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Success | JobStatus::Failed)
    }

    /// Whether `next` is exactly one step ahead of `self`.
    pub fn can_advance_to(self, next: JobStatus) -> bool {
        !self.is_terminal() && next.stage() == self.stage() + 1
    }

    /// Human-readable message reported alongside the status.
    pub fn message(self) -> &'static str {
        match self {
            JobStatus::Queued => "Job submitted successfully",
            JobStatus::ResumingWarehouse => "Waking up warehouse",
            JobStatus::Executing => "Running query",
            JobStatus::Success => "Load success",
            JobStatus::Failed => "Data Quality Failure",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Queued => "QUEUED",
            JobStatus::ResumingWarehouse => "RESUMING_WAREHOUSE",
            JobStatus::Executing => "EXECUTING",
            JobStatus::Success => "SUCCESS",
            JobStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// How the batch is meant to be applied to the target table.
///
/// Accepted for contract compatibility; there is no table to append to or
/// overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadMode {
    Append,
    Overwrite,
}

/// Body of `POST /snowflake/copy-into`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoadCommand {
    pub table_name: String,
    pub load_mode: LoadMode,
    pub rows: Vec<Row>,
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Data-quality error codes reported in `error_details.error_code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DqErrorCode {
    NotNullViolation,
    SchemaMismatch,
}

/// Structured error attached to a `FAILED` job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub error_code: DqErrorCode,
    pub error_message: String,
    pub failed_rows: usize,
}

/// Verdict on a batch, decided once when execution finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { rows_loaded: usize },
    Rejected(ErrorDetails),
}

impl LoadOutcome {
    /// The terminal state this outcome leads to.
    pub fn terminal_status(&self) -> JobStatus {
        match self {
            LoadOutcome::Loaded { .. } => JobStatus::Success,
            LoadOutcome::Rejected(_) => JobStatus::Failed,
        }
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// Snapshot of one load job.
#[derive(Debug, Clone)]
pub struct JobRecord {
    job_id: JobId,
    status: JobStatus,
    table_name: String,
    load_mode: LoadMode,
    rows: Arc<[Row]>,
    submitted_at: Timestamp,
    updated_at: Timestamp,
    rows_loaded: Option<usize>,
    error: Option<ErrorDetails>,
}

impl JobRecord {
    /// A freshly submitted job in `QUEUED`.
    pub fn queued(job_id: JobId, command: LoadCommand, submitted_at: Timestamp) -> Self {
        Self {
            job_id,
            status: JobStatus::Queued,
            table_name: command.table_name,
            load_mode: command.load_mode,
            rows: command.rows.into(),
            submitted_at,
            updated_at: submitted_at,
            rows_loaded: None,
            error: None,
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn load_mode(&self) -> LoadMode {
        self.load_mode
    }

    /// The batch captured at submission. Shared, never copied.
    pub fn rows(&self) -> Arc<[Row]> {
        Arc::clone(&self.rows)
    }

    pub fn submitted_at(&self) -> Timestamp {
        self.submitted_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    pub fn rows_loaded(&self) -> Option<usize> {
        self.rows_loaded
    }

    pub fn error(&self) -> Option<&ErrorDetails> {
        self.error.as_ref()
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Produce the snapshot that follows a move to `next`.
    ///
    /// `outcome` must be `Some` exactly when `next` is terminal, and must
    /// agree with it. The current snapshot is left untouched either way.
    pub fn transition(
        &self,
        next: JobStatus,
        outcome: Option<LoadOutcome>,
        at: Timestamp,
    ) -> Result<JobRecord, CoreError> {
        if self.status.is_terminal() {
            return Err(CoreError::Conflict(format!(
                "Job {} is already in terminal state {}",
                self.job_id, self.status
            )));
        }
        if !self.status.can_advance_to(next) {
            return Err(CoreError::Conflict(format!(
                "Job {} cannot move from {} to {}",
                self.job_id, self.status, next
            )));
        }

        let mut successor = self.clone();
        successor.status = next;
        successor.updated_at = at;

        match (next, outcome) {
            (JobStatus::Success, Some(LoadOutcome::Loaded { rows_loaded })) => {
                successor.rows_loaded = Some(rows_loaded);
            }
            (JobStatus::Failed, Some(LoadOutcome::Rejected(details))) => {
                successor.error = Some(details);
            }
            (status, None) if !status.is_terminal() => {}
            (status, outcome) => {
                return Err(CoreError::Conflict(format!(
                    "Outcome {outcome:?} does not match target state {status} for job {}",
                    self.job_id
                )));
            }
        }

        Ok(successor)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
