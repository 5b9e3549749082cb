//! Report layer seam: pooled results go in, one narrative per model comes
//! out. Text generation itself is done by [`ReportModel`] implementors.

pub mod compare;
pub mod results;

use std::collections::BTreeMap;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use serde::Serialize;

use crate::config::MetaSettings;
use crate::schema::AnalysisType;

pub use compare::{compare_reports, ComparisonMetrics};
pub use results::{format_results, AnalysisResults, FormattedResults};

/// Everything a model needs to write one report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRequest<'a> {
    pub results: FormattedResults,
    pub analysis_type: AnalysisType,
    pub settings: &'a MetaSettings,
    pub custom_instructions: Option<&'a str>,
}

/// A text-generation backend.
pub trait ReportModel {
    fn name(&self) -> &str;

    fn generate_report(&self, request: &ReportRequest<'_>) -> Result<String>;
}

/// One model's report and how long it took.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelReport {
    pub report: String,
    pub seconds: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparativeReport {
    pub timestamp: String,
    pub analysis_type: AnalysisType,
    pub settings_used: MetaSettings,
    pub input_data: AnalysisResults,
    pub reports: BTreeMap<String, ModelReport>,
    pub comparison: ComparisonMetrics,
}

/// Runs every registered model on the same results and compares the output.
#[derive(Default)]
pub struct ReportGenerator {
    models: Vec<Box<dyn ReportModel>>,
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: impl ReportModel + 'static) -> Self {
        self.models.push(Box::new(model));
        self
    }

    pub fn model_names(&self) -> Vec<&str> {
        self.models.iter().map(|m| m.name()).collect()
    }

    /// Generate one report per model, in registration order.
    ///
    /// Settings are validated for `analysis_type` before any model is called.
    pub fn generate_comparative_report(
        &self,
        results: &AnalysisResults,
        analysis_type: AnalysisType,
        settings: &MetaSettings,
        custom_instructions: Option<&str>,
    ) -> Result<ComparativeReport> {
        if self.models.is_empty() {
            bail!("no report models registered");
        }
        settings
            .validate(analysis_type)
            .with_context(|| format!("invalid meta-analysis settings for {analysis_type}"))?;

        let request = ReportRequest {
            results: format_results(results),
            analysis_type,
            settings,
            custom_instructions,
        };

        let mut reports = BTreeMap::new();
        for model in &self.models {
            let started = Instant::now();
            let report = model
                .generate_report(&request)
                .with_context(|| format!("generating report with {}", model.name()))?;
            let seconds = started.elapsed().as_secs_f64();
            log::info!(
                "{}: report of {} chars in {seconds:.2}s",
                model.name(),
                report.chars().count()
            );
            reports.insert(model.name().to_string(), ModelReport { report, seconds });
        }

        let texts: BTreeMap<String, String> = reports
            .iter()
            .map(|(name, r)| (name.clone(), r.report.clone()))
            .collect();

        Ok(ComparativeReport {
            timestamp: chrono::Local::now().to_rfc3339(),
            analysis_type,
            settings_used: settings.clone(),
            input_data: results.clone(),
            reports,
            comparison: compare_reports(&texts, analysis_type),
        })
    }
}
