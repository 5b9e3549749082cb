use std::collections::BTreeMap;

use serde::Serialize;

use crate::schema::AnalysisType;

/// Sections a complete interpretive report is expected to mention.
pub const KEY_SECTIONS: [&str; 5] = [
    "effect size",
    "heterogeneity",
    "confidence interval",
    "publication bias",
    "clinical implications",
];

/// Side-by-side heuristics over the reports of several models.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonMetrics {
    /// Model → report length in characters.
    pub lengths: BTreeMap<String, usize>,
    /// Model → section → mentioned?
    pub section_coverage: BTreeMap<String, BTreeMap<&'static str, bool>>,
    /// Model → family-specific phrase → mentioned? Empty for families
    /// without one.
    pub family_specific: BTreeMap<String, BTreeMap<&'static str, bool>>,
}

/// Phrases a report should use for the given outcome family.
fn family_phrases(analysis_type: AnalysisType) -> &'static [&'static str] {
    match analysis_type.family() {
        AnalysisType::Continuous => &["standardized mean"],
        AnalysisType::Binary => &["number needed to treat"],
        _ => &[],
    }
}

fn coverage(text: &str, phrases: &[&'static str]) -> BTreeMap<&'static str, bool> {
    phrases.iter().map(|p| (*p, text.contains(p))).collect()
}

pub fn compare_reports(
    reports: &BTreeMap<String, String>,
    analysis_type: AnalysisType,
) -> ComparisonMetrics {
    let phrases = family_phrases(analysis_type);
    let mut metrics = ComparisonMetrics {
        lengths: BTreeMap::new(),
        section_coverage: BTreeMap::new(),
        family_specific: BTreeMap::new(),
    };

    for (model, report) in reports {
        let lower = report.to_lowercase();
        metrics.lengths.insert(model.clone(), report.chars().count());
        metrics
            .section_coverage
            .insert(model.clone(), coverage(&lower, &KEY_SECTIONS));
        if !phrases.is_empty() {
            metrics
                .family_specific
                .insert(model.clone(), coverage(&lower, phrases));
        }
    }
    metrics
}
