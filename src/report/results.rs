use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Raw pooled-analysis output: field name → value (`effect_size`, `ci_lower`,
/// `i2`, `tau2`, `k`, ...).
pub type AnalysisResults = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectSize {
    pub value: Value,
    pub ci_lower: Option<Value>,
    pub ci_upper: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heterogeneity {
    pub i2: Option<Value>,
    pub q_statistic: Option<Value>,
    pub tau2: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudyCounts {
    pub count: Option<Value>,
    pub total_sample: Option<Value>,
}

/// Results grouped the way the report models receive them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedResults {
    pub model_type: Value,
    pub effect_size: EffectSize,
    pub heterogeneity: Heterogeneity,
    pub studies: StudyCounts,
}

pub fn format_results(results: &AnalysisResults) -> FormattedResults {
    let get = |key: &str| results.get(key).cloned();
    FormattedResults {
        model_type: get("model_type").unwrap_or_else(|| Value::from("Not specified")),
        effect_size: EffectSize {
            value: get("effect_size").unwrap_or_else(|| Value::from("Not available")),
            ci_lower: get("ci_lower"),
            ci_upper: get("ci_upper"),
        },
        heterogeneity: Heterogeneity {
            i2: get("i2"),
            q_statistic: get("q"),
            tau2: get("tau2"),
        },
        studies: StudyCounts {
            count: get("k"),
            total_sample: get("n"),
        },
    }
}
