use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use super::predicates::{
    CellPredicate, Constraint, RowPredicate, CORRELATION_BOUNDS, EVENTS_C_WITHIN_N,
    EVENTS_E_WITHIN_N, NON_NEGATIVE, POSITIVE, Q1_C_AT_MOST_MEDIAN, Q1_E_AT_MOST_MEDIAN,
    Q3_C_AT_LEAST_MEDIAN, Q3_E_AT_LEAST_MEDIAN,
};
use crate::error::{Result, ValidationError};

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

/// Meta-analysis family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AnalysisType {
    Continuous,
    ContinuousMedian,
    Binary,
    Generic,
    Correlation,
}

impl AnalysisType {
    pub const ALL: [AnalysisType; 5] = [
        AnalysisType::Continuous,
        AnalysisType::ContinuousMedian,
        AnalysisType::Binary,
        AnalysisType::Generic,
        AnalysisType::Correlation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::Continuous => "continuous",
            AnalysisType::ContinuousMedian => "continuous_median",
            AnalysisType::Binary => "binary",
            AnalysisType::Generic => "generic",
            AnalysisType::Correlation => "correlation",
        }
    }

    /// Variant used when the caller does not name one.
    pub fn default_variant(&self) -> StructureVariant {
        match self {
            AnalysisType::ContinuousMedian => StructureVariant::Median,
            _ => StructureVariant::Basic,
        }
    }

    /// Outcome family used by the settings catalog; median-reported
    /// continuous data shares the continuous settings.
    pub fn family(&self) -> AnalysisType {
        match self {
            AnalysisType::ContinuousMedian => AnalysisType::Continuous,
            other => *other,
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AnalysisType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl FromStr for AnalysisType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        AnalysisType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown analysis type: {s}"))
    }
}

/// Column layout within an analysis family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StructureVariant {
    Basic,
    Median,
}

impl StructureVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            StructureVariant::Basic => "basic",
            StructureVariant::Median => "median",
        }
    }
}

impl fmt::Display for StructureVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StructureVariant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "basic" => Ok(StructureVariant::Basic),
            "median" => Ok(StructureVariant::Median),
            other => Err(format!("unknown structure variant: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Semantic type of a declared column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Numeric,
}

/// A constraint attached to one column.
#[derive(Debug, Clone, Copy)]
pub struct ColumnConstraint {
    pub column: &'static str,
    pub constraint: Constraint,
}

/// Immutable column layout and validation rules for one analysis family.
#[derive(Debug)]
pub struct Schema {
    pub name: &'static str,
    pub required_columns: &'static [&'static str],
    pub optional_columns: &'static [&'static str],
    pub column_types: &'static [(&'static str, ColumnType)],
    /// Checked in declaration order.
    pub constraints: &'static [ColumnConstraint],
}

impl Schema {
    /// Declared-numeric columns in declaration order.
    pub fn numeric_columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.column_types
            .iter()
            .filter(|(_, ty)| *ty == ColumnType::Numeric)
            .map(|(col, _)| *col)
    }

    pub fn constraint_for(&self, column: &str) -> Option<&Constraint> {
        self.constraints
            .iter()
            .find(|c| c.column == column)
            .map(|c| &c.constraint)
    }
}

const fn cell(column: &'static str, p: CellPredicate) -> ColumnConstraint {
    ColumnConstraint {
        column,
        constraint: Constraint::Cell(p),
    }
}

const fn row(column: &'static str, p: RowPredicate) -> ColumnConstraint {
    ColumnConstraint {
        column,
        constraint: Constraint::Row(p),
    }
}

use ColumnType::Numeric;

pub static CONTINUOUS: Schema = Schema {
    name: "continuous",
    required_columns: &["studlab", "n.e", "mean.e", "sd.e", "n.c", "mean.c", "sd.c"],
    optional_columns: &["subgroup", "year", "age"],
    column_types: &[
        ("n.e", Numeric),
        ("mean.e", Numeric),
        ("sd.e", Numeric),
        ("n.c", Numeric),
        ("mean.c", Numeric),
        ("sd.c", Numeric),
    ],
    constraints: &[
        cell("n.e", POSITIVE),
        cell("n.c", POSITIVE),
        cell("sd.e", NON_NEGATIVE),
        cell("sd.c", NON_NEGATIVE),
    ],
};

pub static CONTINUOUS_MEDIAN: Schema = Schema {
    name: "continuous_median",
    required_columns: &[
        "studlab", "n.e", "median.e", "q1.e", "q3.e", "n.c", "median.c", "q1.c", "q3.c",
    ],
    optional_columns: &["subgroup", "year", "age"],
    column_types: &[
        ("n.e", Numeric),
        ("median.e", Numeric),
        ("q1.e", Numeric),
        ("q3.e", Numeric),
        ("n.c", Numeric),
        ("median.c", Numeric),
        ("q1.c", Numeric),
        ("q3.c", Numeric),
    ],
    constraints: &[
        cell("n.e", POSITIVE),
        cell("n.c", POSITIVE),
        row("q1.e", Q1_E_AT_MOST_MEDIAN),
        row("q3.e", Q3_E_AT_LEAST_MEDIAN),
        row("q1.c", Q1_C_AT_MOST_MEDIAN),
        row("q3.c", Q3_C_AT_LEAST_MEDIAN),
    ],
};

pub static BINARY: Schema = Schema {
    name: "binary",
    required_columns: &["studlab", "event.e", "n.e", "event.c", "n.c"],
    optional_columns: &["subgroup", "cluster", "rho"],
    column_types: &[
        ("event.e", Numeric),
        ("n.e", Numeric),
        ("event.c", Numeric),
        ("n.c", Numeric),
    ],
    constraints: &[
        row("event.e", EVENTS_E_WITHIN_N),
        row("event.c", EVENTS_C_WITHIN_N),
        cell("n.e", POSITIVE),
        cell("n.c", POSITIVE),
    ],
};

pub static GENERIC: Schema = Schema {
    name: "generic",
    required_columns: &["studlab", "TE", "seTE"],
    optional_columns: &["lower", "upper", "pval", "df", "subgroup"],
    column_types: &[("TE", Numeric), ("seTE", Numeric)],
    constraints: &[cell("seTE", POSITIVE)],
};

pub static CORRELATION: Schema = Schema {
    name: "correlation",
    required_columns: &["studlab", "cor", "n"],
    optional_columns: &["subgroup"],
    column_types: &[("cor", Numeric), ("n", Numeric)],
    constraints: &[cell("cor", CORRELATION_BOUNDS), cell("n", POSITIVE)],
};

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

static ENTRIES: [(AnalysisType, StructureVariant, &Schema); 6] = [
    (AnalysisType::Continuous, StructureVariant::Basic, &CONTINUOUS),
    (AnalysisType::Continuous, StructureVariant::Median, &CONTINUOUS_MEDIAN),
    (AnalysisType::ContinuousMedian, StructureVariant::Median, &CONTINUOUS_MEDIAN),
    (AnalysisType::Binary, StructureVariant::Basic, &BINARY),
    (AnalysisType::Generic, StructureVariant::Basic, &GENERIC),
    (AnalysisType::Correlation, StructureVariant::Basic, &CORRELATION),
];

/// Catalog of schemas keyed by (analysis type, structure variant).
pub struct SchemaRegistry;

impl SchemaRegistry {
    /// Every registered (analysis type, variant) pair with its schema.
    pub fn entries() -> &'static [(AnalysisType, StructureVariant, &'static Schema)] {
        &ENTRIES
    }

    pub fn get_schema(
        analysis_type: AnalysisType,
        variant: StructureVariant,
    ) -> Result<&'static Schema> {
        ENTRIES
            .iter()
            .find(|(t, v, _)| *t == analysis_type && *v == variant)
            .map(|(_, _, schema)| *schema)
            .ok_or_else(|| ValidationError::UnknownSchema {
                analysis_type: analysis_type.to_string(),
                structure_variant: variant.to_string(),
            })
    }

    /// Resolve a schema from string tags, as they arrive from a caller.
    pub fn get_schema_by_name(analysis_type: &str, variant: &str) -> Result<&'static Schema> {
        let unknown = || ValidationError::UnknownSchema {
            analysis_type: analysis_type.to_string(),
            structure_variant: variant.to_string(),
        };
        let t: AnalysisType = analysis_type.parse().map_err(|_| unknown())?;
        let v: StructureVariant = variant.parse().map_err(|_| unknown())?;
        Self::get_schema(t, v)
    }

    /// Look up a single column's constraint, for targeted checks.
    pub fn constraint(
        analysis_type: AnalysisType,
        variant: StructureVariant,
        column: &str,
    ) -> Result<Option<&'static Constraint>> {
        Ok(Self::get_schema(analysis_type, variant)?.constraint_for(column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_required_columns() {
        let expect: [(AnalysisType, StructureVariant, &[&str]); 5] = [
            (
                AnalysisType::Continuous,
                StructureVariant::Basic,
                &["studlab", "n.e", "mean.e", "sd.e", "n.c", "mean.c", "sd.c"],
            ),
            (
                AnalysisType::Continuous,
                StructureVariant::Median,
                &["studlab", "n.e", "median.e", "q1.e", "q3.e", "n.c", "median.c", "q1.c", "q3.c"],
            ),
            (
                AnalysisType::Binary,
                StructureVariant::Basic,
                &["studlab", "event.e", "n.e", "event.c", "n.c"],
            ),
            (AnalysisType::Generic, StructureVariant::Basic, &["studlab", "TE", "seTE"]),
            (AnalysisType::Correlation, StructureVariant::Basic, &["studlab", "cor", "n"]),
        ];
        for (t, v, cols) in expect {
            let schema = SchemaRegistry::get_schema(t, v).unwrap();
            assert_eq!(schema.required_columns, cols, "{t}/{v}");
        }
    }

    #[test]
    fn continuous_median_alias_shares_schema() {
        let a = SchemaRegistry::get_schema(AnalysisType::Continuous, StructureVariant::Median)
            .unwrap();
        let b = SchemaRegistry::get_schema(
            AnalysisType::ContinuousMedian,
            AnalysisType::ContinuousMedian.default_variant(),
        )
        .unwrap();
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn unregistered_pair_is_unknown() {
        let err = SchemaRegistry::get_schema(AnalysisType::Binary, StructureVariant::Median)
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownSchema {
                analysis_type: "binary".into(),
                structure_variant: "median".into(),
            }
        );
    }

    #[test]
    fn unknown_names_are_unknown_schema() {
        let err = SchemaRegistry::get_schema_by_name("continuous", "range").unwrap_err();
        assert!(matches!(err, ValidationError::UnknownSchema { .. }));
        let err = SchemaRegistry::get_schema_by_name("survival", "basic").unwrap_err();
        assert!(matches!(err, ValidationError::UnknownSchema { .. }));
        assert!(SchemaRegistry::get_schema_by_name("generic", "basic").is_ok());
    }

    #[test]
    fn constraints_are_addressable_per_column() {
        let c = SchemaRegistry::constraint(
            AnalysisType::Binary,
            StructureVariant::Basic,
            "event.e",
        )
        .unwrap()
        .unwrap();
        assert!(matches!(c, Constraint::Row(_)));
        let none = SchemaRegistry::constraint(
            AnalysisType::Generic,
            StructureVariant::Basic,
            "TE",
        )
        .unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn constrained_columns_are_numeric_and_required() {
        for (_, _, schema) in SchemaRegistry::entries() {
            let numeric: Vec<_> = schema.numeric_columns().collect();
            for c in schema.constraints {
                assert!(numeric.contains(&c.column), "{}: {}", schema.name, c.column);
                assert!(schema.required_columns.contains(&c.column));
            }
        }
    }

    #[test]
    fn analysis_type_round_trips_through_str() {
        for t in AnalysisType::ALL {
            assert_eq!(t.as_str().parse::<AnalysisType>().unwrap(), t);
        }
    }
}
