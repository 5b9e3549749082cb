use std::collections::BTreeSet;
use std::path::PathBuf;

use thiserror::Error;

/// Rejection of a `load_and_validate` call. Every variant is permanent: the
/// caller has to fix the input and resubmit.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("unsupported file type: .{extension}")]
    UnsupportedFormat { extension: String },

    #[error("failed to read {}: {reason}", .path.display())]
    Read { path: PathBuf, reason: String },

    #[error("unknown schema: {analysis_type}/{structure_variant}")]
    UnknownSchema {
        analysis_type: String,
        structure_variant: String,
    },

    #[error("missing required columns: {}", join(.missing))]
    MissingColumns { missing: BTreeSet<String> },

    #[error("column {column} must be numeric (row {row}: '{value}')")]
    NonNumericColumn {
        column: String,
        row: usize,
        value: String,
    },

    #[error("validation failed for {column} ({rule}) in rows: {rows:?}")]
    ConstraintViolation {
        column: String,
        rule: &'static str,
        rows: Vec<usize>,
    },
}

fn join(set: &BTreeSet<String>) -> String {
    set.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

pub type Result<T> = std::result::Result<T, ValidationError>;
