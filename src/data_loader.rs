use std::path::Path;

use crate::config::{LoaderConfig, ValidSettings};
use crate::data::loader::read_table;
use crate::data::model::Dataset;
use crate::error::Result;
use crate::schema::{AnalysisType, Schema, SchemaRegistry, StructureVariant};
use crate::validate::{coerce_numeric_columns, validate_constraints, validate_structure};

/// Reads study tables and validates them against a meta-analysis schema.
///
/// Holds no mutable state; one loader can serve any number of calls.
#[derive(Debug, Clone, Default)]
pub struct DataLoader {
    config: LoaderConfig,
}

impl DataLoader {
    pub fn new(config: LoaderConfig) -> Self {
        DataLoader { config }
    }

    /// Read `source` and validate it. On success the returned dataset has
    /// every declared-numeric column as `CellValue::Float`.
    pub fn load_and_validate(
        &self,
        source: impl AsRef<Path>,
        analysis_type: AnalysisType,
        variant: StructureVariant,
    ) -> Result<Dataset> {
        let path = self.config.resolve(source.as_ref());
        log::info!("loading {} as {analysis_type}/{variant}", path.display());

        let result = read_table(&path).and_then(|dataset| {
            let schema = SchemaRegistry::get_schema(analysis_type, variant)?;
            run_stages(dataset, schema)
        });
        log_outcome(&path, &result);
        result
    }

    /// Same as [`load_and_validate`](Self::load_and_validate) with string
    /// tags; tags that name no registered schema are `UnknownSchema`.
    pub fn load_and_validate_named(
        &self,
        source: impl AsRef<Path>,
        analysis_type: &str,
        variant: &str,
    ) -> Result<Dataset> {
        let path = self.config.resolve(source.as_ref());
        log::info!("loading {} as {analysis_type}/{variant}", path.display());

        let result = read_table(&path).and_then(|dataset| {
            let schema = SchemaRegistry::get_schema_by_name(analysis_type, variant)?;
            run_stages(dataset, schema)
        });
        log_outcome(&path, &result);
        result
    }

    /// Validate an in-memory dataset. The input is left as it was; the
    /// coerced copy is returned.
    pub fn validate(
        &self,
        dataset: &Dataset,
        analysis_type: AnalysisType,
        variant: StructureVariant,
    ) -> Result<Dataset> {
        let schema = SchemaRegistry::get_schema(analysis_type, variant)?;
        run_stages(dataset.clone(), schema)
    }

    /// Allowed report settings for an analysis type.
    pub fn available_settings(&self, analysis_type: AnalysisType) -> ValidSettings {
        ValidSettings::for_family(analysis_type)
    }
}

fn log_outcome(path: &Path, result: &Result<Dataset>) {
    match result {
        Ok(ds) => log::info!("{}: {} studies validated", path.display(), ds.len()),
        Err(err) => log::error!("Error loading meta-analysis data: {err}"),
    }
}

/// Structure, then coercion, then constraints. Each stage relies on the one
/// before it having passed.
fn run_stages(mut dataset: Dataset, schema: &Schema) -> Result<Dataset> {
    validate_structure(&dataset.column_set(), schema)?;
    coerce_numeric_columns(&mut dataset, schema)?;
    validate_constraints(&dataset, schema)?;
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Row};
    use crate::error::ValidationError;

    fn row(cells: &[(&str, CellValue)]) -> Row {
        cells
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn correlation(cor: CellValue, n: CellValue) -> Dataset {
        Dataset::from_rows(vec![row(&[
            ("studlab", "S1".into()),
            ("cor", cor),
            ("n", n),
        ])])
    }

    #[test]
    fn validate_returns_coerced_copy() {
        let input = correlation(CellValue::Text("0.45".into()), CellValue::Integer(100));
        let out = DataLoader::default()
            .validate(&input, AnalysisType::Correlation, StructureVariant::Basic)
            .unwrap();
        assert_eq!(out.rows[0]["cor"], CellValue::Float(0.45));
        assert_eq!(out.rows[0]["n"], CellValue::Float(100.0));
        assert_eq!(input.rows[0]["cor"], CellValue::Text("0.45".into()));
    }

    #[test]
    fn type_errors_come_before_constraint_errors() {
        let input = correlation(CellValue::Float(1.5), CellValue::Text("many".into()));
        let err = DataLoader::default()
            .validate(&input, AnalysisType::Correlation, StructureVariant::Basic)
            .unwrap_err();
        assert!(matches!(err, ValidationError::NonNumericColumn { ref column, .. } if column == "n"));
    }

    #[test]
    fn structure_errors_come_before_type_errors() {
        let input = Dataset::from_rows(vec![row(&[
            ("studlab", "S1".into()),
            ("cor", "high".into()),
        ])]);
        let err = DataLoader::default()
            .validate(&input, AnalysisType::Correlation, StructureVariant::Basic)
            .unwrap_err();
        assert!(matches!(err, ValidationError::MissingColumns { .. }));
    }

    #[test]
    fn unknown_schema_on_validate() {
        let input = correlation(CellValue::Float(0.1), CellValue::Integer(10));
        let err = DataLoader::default()
            .validate(&input, AnalysisType::Correlation, StructureVariant::Median)
            .unwrap_err();
        assert!(matches!(err, ValidationError::UnknownSchema { .. }));
    }

    #[test]
    fn available_settings_follow_family() {
        let loader = DataLoader::default();
        let s = loader.available_settings(AnalysisType::ContinuousMedian);
        assert_eq!(s.summary_measures, &["MD", "SMD", "ROM"]);
    }
}
