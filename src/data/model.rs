use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a study table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value as read from a tabular source.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64` if it already holds a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Integer(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

// ---------------------------------------------------------------------------
// Row / Dataset
// ---------------------------------------------------------------------------

/// One study record: column name → value.
pub type Row = BTreeMap<String, CellValue>;

/// A loaded study table. Rows keep source order; row indices reported by the
/// validators are positions in `rows`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    /// Column names in header order.
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Dataset { columns, rows }
    }

    /// Build a dataset from rows alone, taking columns in first-seen order.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let mut seen = BTreeSet::new();
        let mut columns = Vec::new();
        for row in &rows {
            for col in row.keys() {
                if seen.insert(col.clone()) {
                    columns.push(col.clone());
                }
            }
        }
        Dataset { columns, rows }
    }

    /// Set of column names present in the dataset.
    pub fn column_set(&self) -> BTreeSet<String> {
        self.columns.iter().cloned().collect()
    }

    /// Values of one column in row order; `None` where a row lacks the column.
    pub fn column<'a>(&'a self, name: &'a str) -> impl Iterator<Item = Option<&'a CellValue>> + 'a {
        self.rows.iter().map(move |row| row.get(name))
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(&str, CellValue)]) -> Row {
        cells
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn from_rows_collects_columns_once() {
        let ds = Dataset::from_rows(vec![
            row(&[("studlab", "A".into()), ("n", 10i64.into())]),
            row(&[("studlab", "B".into()), ("cor", 0.3.into())]),
        ]);
        assert_eq!(ds.columns, vec!["n", "studlab", "cor"]);
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn column_reports_missing_cells() {
        let ds = Dataset::from_rows(vec![
            row(&[("n", 10i64.into())]),
            row(&[("cor", 0.3.into())]),
        ]);
        let n: Vec<_> = ds.column("n").collect();
        assert_eq!(n, vec![Some(&CellValue::Integer(10)), None]);
    }

    #[test]
    fn as_f64_only_for_numbers() {
        assert_eq!(CellValue::Integer(3).as_f64(), Some(3.0));
        assert_eq!(CellValue::Float(2.5).as_f64(), Some(2.5));
        assert_eq!(CellValue::Text("2.5".into()).as_f64(), None);
        assert_eq!(CellValue::Null.as_f64(), None);
    }
}
