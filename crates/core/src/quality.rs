//! Data-quality checks applied to a batch before it counts as loaded.
//!
//! Pure logic, no I/O. Rules run in order and the first failure wins:
//!
//! 1. every row carries a non-null `id` (`NOT_NULL_VIOLATION`);
//! 2. every row has the same field names as the first row (`SCHEMA_MISMATCH`).
//!
//! A batch passing both loads all of its rows. An empty batch passes.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::job::{DqErrorCode, ErrorDetails, LoadOutcome};
use crate::types::Row;

/// Field every row must carry with a non-null value.
pub const PRIMARY_KEY_FIELD: &str = "id";

/// Run all rules against `rows` and return the verdict.
pub fn validate(rows: &[Row]) -> LoadOutcome {
    if let Some(details) = check_not_null(rows) {
        return LoadOutcome::Rejected(details);
    }
    if let Some(details) = check_schema(rows) {
        return LoadOutcome::Rejected(details);
    }
    LoadOutcome::Loaded {
        rows_loaded: rows.len(),
    }
}

fn check_not_null(rows: &[Row]) -> Option<ErrorDetails> {
    let index = rows
        .iter()
        .position(|row| matches!(row.get(PRIMARY_KEY_FIELD), None | Some(Value::Null)))?;

    Some(ErrorDetails {
        error_code: DqErrorCode::NotNullViolation,
        error_message: format!(
            "Column '{PRIMARY_KEY_FIELD}' is missing or null in row at index {index}."
        ),
        failed_rows: 1,
    })
}

fn check_schema(rows: &[Row]) -> Option<ErrorDetails> {
    let (first, rest) = rows.split_first()?;
    let reference = field_names(first);

    let mut mismatches = rest
        .iter()
        .enumerate()
        .map(|(offset, row)| (offset + 1, field_names(row)))
        .filter(|(_, fields)| *fields != reference);

    let (index, fields) = mismatches.next()?;
    let failed_rows = 1 + mismatches.count();

    let missing: Vec<&str> = reference.difference(&fields).copied().collect();
    let extra: Vec<&str> = fields.difference(&reference).copied().collect();

    let mut parts = Vec::new();
    if !missing.is_empty() {
        parts.push(format!("missing fields: {missing:?}"));
    }
    if !extra.is_empty() {
        parts.push(format!("extra fields: {extra:?}"));
    }

    Some(ErrorDetails {
        error_code: DqErrorCode::SchemaMismatch,
        error_message: format!(
            "Row at index {index} has schema mismatch: {}",
            parts.join(", ")
        ),
        failed_rows,
    })
}

fn field_names(row: &Row) -> BTreeSet<&str> {
    row.keys().map(String::as_str).collect()
}
