use crate::data::model::Dataset;
use crate::error::{Result, ValidationError};
use crate::schema::Schema;

/// Apply each column constraint of `schema` to every row.
///
/// Columns are checked in declaration order. The first column with any
/// failing row is reported with all of its failing rows, ascending; later
/// columns are not checked. A cell that is not numeric counts as a failure.
pub fn validate_constraints(dataset: &Dataset, schema: &Schema) -> Result<()> {
    for rule in schema.constraints {
        let rows: Vec<usize> = dataset
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| {
                match row.get(rule.column).and_then(|cell| cell.as_f64()) {
                    Some(value) => !rule.constraint.eval(value, row),
                    None => true,
                }
            })
            .map(|(i, _)| i)
            .collect();

        if !rows.is_empty() {
            log::debug!(
                "schema {}: {} failed {} rows",
                schema.name,
                rule.column,
                rows.len()
            );
            return Err(ValidationError::ConstraintViolation {
                column: rule.column.to_string(),
                rule: rule.constraint.name(),
                rows,
            });
        }
    }
    Ok(())
}
