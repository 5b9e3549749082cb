use crate::data::model::{CellValue, Dataset};
use crate::error::{Result, ValidationError};
use crate::schema::Schema;

/// Convert every declared-numeric column of `dataset` to `CellValue::Float`.
///
/// Columns are converted in declaration order into a scratch buffer and only
/// written back once all of them succeed, so on error the dataset is unchanged.
pub fn coerce_numeric_columns(dataset: &mut Dataset, schema: &Schema) -> Result<()> {
    let mut staged: Vec<(&str, Vec<f64>)> = Vec::new();

    for column in schema.numeric_columns() {
        let values = dataset
            .column(column)
            .enumerate()
            .map(|(row, cell)| {
                coerce_cell(cell).ok_or_else(|| ValidationError::NonNumericColumn {
                    column: column.to_string(),
                    row,
                    value: cell.map(ToString::to_string).unwrap_or_default(),
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        staged.push((column, values));
    }

    for (column, values) in staged {
        for (row, value) in dataset.rows.iter_mut().zip(values) {
            row.insert(column.to_string(), CellValue::Float(value));
        }
    }
    Ok(())
}

/// Numeric form of a raw cell. Empty, boolean, unparseable and non-finite
/// cells have none.
pub fn coerce_cell(cell: Option<&CellValue>) -> Option<f64> {
    let value = match cell? {
        CellValue::Float(v) => *v,
        CellValue::Integer(i) => *i as f64,
        CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
        CellValue::Bool(_) | CellValue::Null => return None,
    };
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Row;
    use crate::schema::registry::GENERIC;

    fn generic_row(te: CellValue, se: CellValue) -> Row {
        [
            ("studlab".to_string(), CellValue::Text("S".into())),
            ("TE".to_string(), te),
            ("seTE".to_string(), se),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn coerces_text_and_integers_to_float() {
        let mut ds = Dataset::from_rows(vec![
            generic_row(CellValue::Text(" 0.25 ".into()), CellValue::Integer(1)),
            generic_row(CellValue::Float(-0.1), CellValue::Text("0.3".into())),
        ]);
        coerce_numeric_columns(&mut ds, &GENERIC).unwrap();
        assert_eq!(ds.rows[0]["TE"], CellValue::Float(0.25));
        assert_eq!(ds.rows[0]["seTE"], CellValue::Float(1.0));
        assert_eq!(ds.rows[1]["seTE"], CellValue::Float(0.3));
        // undeclared columns keep their raw value
        assert_eq!(ds.rows[0]["studlab"], CellValue::Text("S".into()));
    }

    #[test]
    fn empty_cell_is_not_numeric() {
        let mut ds = Dataset::from_rows(vec![
            generic_row(CellValue::Float(0.1), CellValue::Float(0.2)),
            generic_row(CellValue::Null, CellValue::Float(0.2)),
        ]);
        let err = coerce_numeric_columns(&mut ds, &GENERIC).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NonNumericColumn {
                column: "TE".into(),
                row: 1,
                value: "<null>".into(),
            }
        );
    }

    #[test]
    fn failure_leaves_dataset_untouched() {
        let mut ds = Dataset::from_rows(vec![generic_row(
            CellValue::Text("0.5".into()),
            CellValue::Text("n/a".into()),
        )]);
        let before = ds.clone();
        let err = coerce_numeric_columns(&mut ds, &GENERIC).unwrap_err();
        assert!(matches!(err, ValidationError::NonNumericColumn { ref column, .. } if column == "seTE"));
        assert_eq!(ds, before);
    }

    #[test]
    fn rejects_non_finite_and_bool() {
        assert_eq!(coerce_cell(Some(&CellValue::Text("NaN".into()))), None);
        assert_eq!(coerce_cell(Some(&CellValue::Float(f64::INFINITY))), None);
        assert_eq!(coerce_cell(Some(&CellValue::Bool(true))), None);
        assert_eq!(coerce_cell(None), None);
        assert_eq!(coerce_cell(Some(&CellValue::Text("1e3".into()))), Some(1000.0));
    }
}
