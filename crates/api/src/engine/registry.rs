use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use loadmock_core::error::CoreError;
use loadmock_core::job::{JobRecord, JobStatus, LoadCommand, LoadOutcome};
use loadmock_core::types::{new_job_id, JobId};
use tokio::sync::RwLock;

/// In-memory store of every job submitted since startup.
///
/// Records are immutable snapshots behind `Arc`; a state change builds the
/// successor snapshot and swaps it in under the write lock, so readers only
/// ever see whole records. Thread-safe; designed to be wrapped in `Arc` and
/// shared between handlers and the driver.
pub struct JobRegistry {
    jobs: RwLock<HashMap<JobId, Arc<JobRecord>>>,
}

impl JobRegistry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new job in `QUEUED` and return its first snapshot.
    pub async fn create(&self, command: LoadCommand) -> Arc<JobRecord> {
        let mut jobs = self.jobs.write().await;

        let job_id = loop {
            let candidate = new_job_id();
            if !jobs.contains_key(&candidate) {
                break candidate;
            }
        };

        let record = Arc::new(JobRecord::queued(job_id.clone(), command, Utc::now()));
        jobs.insert(job_id, Arc::clone(&record));
        record
    }

    /// Current snapshot of a job.
    pub async fn get(&self, job_id: &str) -> Result<Arc<JobRecord>, CoreError> {
        self.jobs
            .read()
            .await
            .get(job_id)
            .cloned()
            .ok_or_else(|| not_found(job_id))
    }

    /// Move a job to `status`, attaching `outcome` when `status` is terminal.
    ///
    /// Returns the new snapshot. Fails with `NotFound` for an unknown id and
    /// with `Conflict` for any move [`JobRecord::transition`] refuses; the
    /// stored snapshot is unchanged on failure.
    pub async fn set_status(
        &self,
        job_id: &str,
        status: JobStatus,
        outcome: Option<LoadOutcome>,
    ) -> Result<Arc<JobRecord>, CoreError> {
        let mut jobs = self.jobs.write().await;
        let current = jobs.get(job_id).ok_or_else(|| not_found(job_id))?;

        let next = Arc::new(current.transition(status, outcome, Utc::now())?);
        jobs.insert(job_id.to_string(), Arc::clone(&next));
        Ok(next)
    }

    /// Number of jobs tracked.
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(job_id: &str) -> CoreError {
    CoreError::NotFound {
        entity: "Job",
        id: job_id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use assert_matches::assert_matches;
    use loadmock_core::job::{DqErrorCode, ErrorDetails, LoadMode};
    use serde_json::json;

    use super::*;

    fn command() -> LoadCommand {
        LoadCommand {
            table_name: "RAW_TRANSACTIONS".into(),
            load_mode: LoadMode::Append,
            rows: vec![json!({"id": 1}).as_object().cloned().unwrap()],
        }
    }

    async fn executing(registry: &JobRegistry) -> Arc<JobRecord> {
        let record = registry.create(command()).await;
        let id = record.job_id();
        registry
            .set_status(id, JobStatus::ResumingWarehouse, None)
            .await
            .unwrap();
        registry
            .set_status(id, JobStatus::Executing, None)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn create_stores_queued_record() {
        let registry = JobRegistry::new();
        assert!(registry.is_empty().await);

        let record = registry.create(command()).await;

        assert_eq!(record.status(), JobStatus::Queued);
        assert!(!record.job_id().is_empty());
        assert_eq!(registry.len().await, 1);

        let fetched = registry.get(record.job_id()).await.unwrap();
        assert_eq!(fetched.status(), JobStatus::Queued);
        assert_eq!(fetched.table_name(), "RAW_TRANSACTIONS");
    }

    #[tokio::test]
    async fn get_unknown_job_is_not_found() {
        let registry = JobRegistry::new();

        let result = registry.get("no-such-job").await;

        assert_matches!(
            result,
            Err(CoreError::NotFound { entity: "Job", id }) if id == "no-such-job"
        );
    }

    #[tokio::test]
    async fn set_status_unknown_job_is_not_found() {
        let registry = JobRegistry::new();

        let result = registry
            .set_status("no-such-job", JobStatus::ResumingWarehouse, None)
            .await;

        assert_matches!(result, Err(CoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn terminal_write_publishes_status_and_outcome_together() {
        let registry = JobRegistry::new();
        let record = executing(&registry).await;

        registry
            .set_status(
                record.job_id(),
                JobStatus::Success,
                Some(LoadOutcome::Loaded { rows_loaded: 1 }),
            )
            .await
            .unwrap();

        let fetched = registry.get(record.job_id()).await.unwrap();
        assert_eq!(fetched.status(), JobStatus::Success);
        assert_eq!(fetched.rows_loaded(), Some(1));
        assert!(fetched.error().is_none());
    }

    #[tokio::test]
    async fn rejected_write_leaves_record_untouched() {
        let registry = JobRegistry::new();
        let record = registry.create(command()).await;

        let result = registry
            .set_status(record.job_id(), JobStatus::Executing, None)
            .await;
        assert_matches!(result, Err(CoreError::Conflict(_)));

        let fetched = registry.get(record.job_id()).await.unwrap();
        assert_eq!(fetched.status(), JobStatus::Queued);
    }

    #[tokio::test]
    async fn terminal_job_cannot_be_rewritten() {
        let registry = JobRegistry::new();
        let record = executing(&registry).await;
        let id = record.job_id();

        let failure = ErrorDetails {
            error_code: DqErrorCode::SchemaMismatch,
            error_message: "mismatch".into(),
            failed_rows: 1,
        };
        registry
            .set_status(id, JobStatus::Failed, Some(LoadOutcome::Rejected(failure.clone())))
            .await
            .unwrap();

        let result = registry
            .set_status(
                id,
                JobStatus::Success,
                Some(LoadOutcome::Loaded { rows_loaded: 1 }),
            )
            .await;
        assert_matches!(result, Err(CoreError::Conflict(_)));

        let fetched = registry.get(id).await.unwrap();
        assert_eq!(fetched.status(), JobStatus::Failed);
        assert_eq!(fetched.error(), Some(&failure));
    }

    #[tokio::test]
    async fn snapshots_held_by_readers_are_not_mutated() {
        let registry = JobRegistry::new();
        let before = registry.create(command()).await;

        registry
            .set_status(before.job_id(), JobStatus::ResumingWarehouse, None)
            .await
            .unwrap();

        assert_eq!(before.status(), JobStatus::Queued);
        let after = registry.get(before.job_id()).await.unwrap();
        assert_eq!(after.status(), JobStatus::ResumingWarehouse);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_get_unique_ids() {
        let registry = Arc::new(JobRegistry::new());

        let handles: Vec<_> = (0..64)
            .map(|_| {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move { registry.create(command()).await.job_id().to_string() })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap());
        }

        assert_eq!(ids.len(), 64);
        assert_eq!(registry.len().await, 64);
    }
}
