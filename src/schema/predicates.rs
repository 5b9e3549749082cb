//! Named validation predicates used by the schema catalog.
//!
//! Each predicate is a plain value so it can be looked up and unit-tested on
//! its own, independent of any dataset.

use std::fmt;

use crate::data::model::Row;

/// Predicate over a single numeric cell.
#[derive(Clone, Copy)]
pub struct CellPredicate {
    pub name: &'static str,
    check: fn(f64) -> bool,
}

impl CellPredicate {
    pub const fn new(name: &'static str, check: fn(f64) -> bool) -> Self {
        CellPredicate { name, check }
    }

    pub fn eval(&self, value: f64) -> bool {
        (self.check)(value)
    }
}

/// Predicate over a numeric cell plus its whole row, for cross-column rules.
#[derive(Clone, Copy)]
pub struct RowPredicate {
    pub name: &'static str,
    check: fn(f64, &Row) -> bool,
}

impl RowPredicate {
    pub const fn new(name: &'static str, check: fn(f64, &Row) -> bool) -> Self {
        RowPredicate { name, check }
    }

    pub fn eval(&self, value: f64, row: &Row) -> bool {
        (self.check)(value, row)
    }
}

/// A column constraint, tagged with the arguments its predicate needs.
#[derive(Clone, Copy)]
pub enum Constraint {
    Cell(CellPredicate),
    Row(RowPredicate),
}

impl Constraint {
    pub fn name(&self) -> &'static str {
        match self {
            Constraint::Cell(p) => p.name,
            Constraint::Row(p) => p.name,
        }
    }

    pub fn eval(&self, value: f64, row: &Row) -> bool {
        match self {
            Constraint::Cell(p) => p.eval(value),
            Constraint::Row(p) => p.eval(value, row),
        }
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Cell(p) => write!(f, "Cell({})", p.name),
            Constraint::Row(p) => write!(f, "Row({})", p.name),
        }
    }
}

/// Numeric value of a sibling column. A missing or non-numeric sibling makes
/// every comparison against it fail.
fn sibling(row: &Row, column: &str) -> Option<f64> {
    row.get(column).and_then(|v| v.as_f64())
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

pub const POSITIVE: CellPredicate = CellPredicate::new("positive", |x| x > 0.0);

pub const NON_NEGATIVE: CellPredicate = CellPredicate::new("non_negative", |x| x >= 0.0);

pub const CORRELATION_BOUNDS: CellPredicate =
    CellPredicate::new("within [-1, 1]", |x| (-1.0..=1.0).contains(&x));

pub const Q1_E_AT_MOST_MEDIAN: RowPredicate =
    RowPredicate::new("q1.e <= median.e", |x, row| {
        sibling(row, "median.e").is_some_and(|m| x <= m)
    });

pub const Q3_E_AT_LEAST_MEDIAN: RowPredicate =
    RowPredicate::new("q3.e >= median.e", |x, row| {
        sibling(row, "median.e").is_some_and(|m| x >= m)
    });

pub const Q1_C_AT_MOST_MEDIAN: RowPredicate =
    RowPredicate::new("q1.c <= median.c", |x, row| {
        sibling(row, "median.c").is_some_and(|m| x <= m)
    });

pub const Q3_C_AT_LEAST_MEDIAN: RowPredicate =
    RowPredicate::new("q3.c >= median.c", |x, row| {
        sibling(row, "median.c").is_some_and(|m| x >= m)
    });

pub const EVENTS_E_WITHIN_N: RowPredicate =
    RowPredicate::new("0 <= event.e <= n.e", |x, row| {
        sibling(row, "n.e").is_some_and(|n| 0.0 <= x && x <= n)
    });

pub const EVENTS_C_WITHIN_N: RowPredicate =
    RowPredicate::new("0 <= event.c <= n.c", |x, row| {
        sibling(row, "n.c").is_some_and(|n| 0.0 <= x && x <= n)
    });

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn row(cells: &[(&str, f64)]) -> Row {
        cells
            .iter()
            .map(|(k, v)| (k.to_string(), CellValue::Float(*v)))
            .collect()
    }

    #[test]
    fn positive_excludes_zero() {
        assert!(POSITIVE.eval(1.0));
        assert!(!POSITIVE.eval(0.0));
        assert!(!POSITIVE.eval(-3.0));
    }

    #[test]
    fn non_negative_includes_zero() {
        assert!(NON_NEGATIVE.eval(0.0));
        assert!(!NON_NEGATIVE.eval(-0.1));
    }

    #[test]
    fn correlation_bounds_are_inclusive() {
        assert!(CORRELATION_BOUNDS.eval(-1.0));
        assert!(CORRELATION_BOUNDS.eval(1.0));
        assert!(!CORRELATION_BOUNDS.eval(1.5));
        assert!(!CORRELATION_BOUNDS.eval(f64::NAN));
    }

    #[test]
    fn quartiles_compare_against_median() {
        let r = row(&[("median.e", 10.0)]);
        assert!(Q1_E_AT_MOST_MEDIAN.eval(10.0, &r));
        assert!(!Q1_E_AT_MOST_MEDIAN.eval(12.0, &r));
        assert!(Q3_E_AT_LEAST_MEDIAN.eval(14.0, &r));
        assert!(!Q3_E_AT_LEAST_MEDIAN.eval(9.0, &r));
    }

    #[test]
    fn events_bounded_by_sample_size() {
        let r = row(&[("n.c", 100.0)]);
        assert!(EVENTS_C_WITHIN_N.eval(0.0, &r));
        assert!(EVENTS_C_WITHIN_N.eval(100.0, &r));
        assert!(!EVENTS_C_WITHIN_N.eval(150.0, &r));
        assert!(!EVENTS_C_WITHIN_N.eval(-1.0, &r));
    }

    #[test]
    fn missing_sibling_fails() {
        let r = row(&[]);
        assert!(!EVENTS_E_WITHIN_N.eval(5.0, &r));
        assert!(!Q1_C_AT_MOST_MEDIAN.eval(5.0, &r));
    }

    #[test]
    fn constraint_dispatches_on_tag() {
        let r = row(&[("median.c", 4.0)]);
        let cell = Constraint::Cell(POSITIVE);
        let row_rule = Constraint::Row(Q3_C_AT_LEAST_MEDIAN);
        assert!(cell.eval(2.0, &r));
        assert!(!row_rule.eval(2.0, &r));
        assert_eq!(row_rule.name(), "q3.c >= median.c");
    }
}
