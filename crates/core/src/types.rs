/// Job identifiers are UUID v4 strings, opaque to callers.
pub type JobId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// One submitted row: an arbitrary JSON object.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Allocate a fresh job identifier.
pub fn new_job_id() -> JobId {
    uuid::Uuid::new_v4().to_string()
}
