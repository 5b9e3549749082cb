use std::collections::BTreeSet;

use crate::error::{Result, ValidationError};
use crate::schema::Schema;

/// Check that every required column of `schema` is present.
///
/// All missing columns are collected before failing, so the caller can
/// report the whole problem at once.
pub fn validate_structure(dataset_columns: &BTreeSet<String>, schema: &Schema) -> Result<()> {
    let missing: BTreeSet<String> = schema
        .required_columns
        .iter()
        .filter(|col| !dataset_columns.contains(**col))
        .map(|col| col.to_string())
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    log::debug!("schema {}: missing columns {missing:?}", schema.name);
    Err(ValidationError::MissingColumns { missing })
}
