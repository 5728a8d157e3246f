//! Per-job timeline driver.
//!
//! Every submitted job gets its own Tokio task that sleeps until each state
//! boundary (measured from the job's own start instant) and writes the next
//! state into the [`JobRegistry`]. The final wake-up runs the data-quality
//! rules over the batch captured at submission and records the verdict.
//! Jobs never wait on each other and there is no abort path: a launched
//! timeline always runs to a terminal state.

use std::sync::Arc;
use std::time::Duration;

use loadmock_core::error::CoreError;
use loadmock_core::job::{JobRecord, JobStatus, LoadCommand, LoadOutcome};
use loadmock_core::quality;
use loadmock_core::types::Row;
use tokio::time::Instant;
use tokio_util::task::TaskTracker;

use super::registry::JobRegistry;

// ---------------------------------------------------------------------------
// Timeline
// ---------------------------------------------------------------------------

/// Elapsed-time boundaries at which a job enters each state after `QUEUED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobTimeline {
    /// Entry into `RESUMING_WAREHOUSE`.
    pub resume_after: Duration,
    /// Entry into `EXECUTING`.
    pub execute_after: Duration,
    /// Entry into `SUCCESS` or `FAILED`.
    pub complete_after: Duration,
}

impl JobTimeline {
    /// Build a timeline, rejecting boundaries that are not strictly
    /// increasing and positive.
    pub fn new(
        resume_after: Duration,
        execute_after: Duration,
        complete_after: Duration,
    ) -> Result<Self, CoreError> {
        if resume_after.is_zero()
            || execute_after <= resume_after
            || complete_after <= execute_after
        {
            return Err(CoreError::Validation(format!(
                "boundaries must be strictly increasing and non-zero, got \
                 {resume_after:?} / {execute_after:?} / {complete_after:?}"
            )));
        }
        Ok(Self {
            resume_after,
            execute_after,
            complete_after,
        })
    }
}

impl Default for JobTimeline {
    fn default() -> Self {
        Self {
            resume_after: Duration::from_secs(2),
            execute_after: Duration::from_secs(5),
            complete_after: Duration::from_secs(8),
        }
    }
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Launches job timelines and keeps track of the ones still running.
pub struct JobDriver {
    registry: Arc<JobRegistry>,
    timeline: JobTimeline,
    tracker: TaskTracker,
}

impl JobDriver {
    pub fn new(registry: Arc<JobRegistry>, timeline: JobTimeline) -> Self {
        Self {
            registry,
            timeline,
            tracker: TaskTracker::new(),
        }
    }

    pub fn timeline(&self) -> JobTimeline {
        self.timeline
    }

    /// Register a job and start its timeline. Returns the `QUEUED` snapshot
    /// without waiting on any part of the timeline.
    pub async fn submit(&self, command: LoadCommand) -> Arc<JobRecord> {
        let started = Instant::now();
        let record = self.registry.create(command).await;

        tracing::info!(
            job_id = %record.job_id(),
            table_name = %record.table_name(),
            load_mode = ?record.load_mode(),
            rows = record.rows().len(),
            "Load job queued",
        );

        self.tracker.spawn(run_timeline(
            Arc::clone(&self.registry),
            self.timeline,
            record.job_id().to_string(),
            record.rows(),
            started,
        ));

        record
    }

    /// Number of timelines that have not reached a terminal state yet.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Wait up to `timeout` for every launched timeline to finish.
    ///
    /// Returns `false` if some were still running when the timeout elapsed.
    /// Jobs submitted after this call are still launched and tracked.
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        self.tracker.close();
        let drained = tokio::time::timeout(timeout, self.tracker.wait())
            .await
            .is_ok();
        self.tracker.reopen();
        drained
    }
}

/// Drive one job from `QUEUED` to a terminal state.
async fn run_timeline(
    registry: Arc<JobRegistry>,
    timeline: JobTimeline,
    job_id: String,
    rows: Arc<[Row]>,
    started: Instant,
) {
    let steps = [
        (JobStatus::ResumingWarehouse, timeline.resume_after),
        (JobStatus::Executing, timeline.execute_after),
    ];

    for (status, offset) in steps {
        tokio::time::sleep_until(started + offset).await;
        if !advance(&registry, &job_id, status, None).await {
            return;
        }
    }

    tokio::time::sleep_until(started + timeline.complete_after).await;

    let outcome = quality::validate(&rows);
    if let LoadOutcome::Rejected(details) = &outcome {
        tracing::warn!(
            job_id = %job_id,
            error_code = ?details.error_code,
            failed_rows = details.failed_rows,
            error = %details.error_message,
            "Load job rejected by data-quality checks",
        );
    }

    let status = outcome.terminal_status();
    advance(&registry, &job_id, status, Some(outcome)).await;
}

/// Write one transition; logs and returns `false` if the registry refuses it.
async fn advance(
    registry: &JobRegistry,
    job_id: &str,
    status: JobStatus,
    outcome: Option<LoadOutcome>,
) -> bool {
    match registry.set_status(job_id, status, outcome).await {
        Ok(record) => {
            tracing::info!(
                job_id = %job_id,
                status = %record.status(),
                rows_loaded = ?record.rows_loaded(),
                "Load job advanced",
            );
            true
        }
        Err(e) => {
            tracing::error!(
                job_id = %job_id,
                status = %status,
                error = %e,
                "Failed to advance load job; timeline stopped",
            );
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
