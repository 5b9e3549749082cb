use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::AnalysisType;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no configuration file found in {}", .dir.display())]
    NotFound { dir: PathBuf },

    #[error("invalid {setting} for {analysis_type}: '{value}'")]
    Invalid {
        setting: &'static str,
        value: String,
        analysis_type: AnalysisType,
    },
}

// ---------------------------------------------------------------------------
// Loader configuration
// ---------------------------------------------------------------------------

/// Per-loader configuration, passed in explicitly.
#[derive(Debug, Clone, Default)]
pub struct LoaderConfig {
    /// Relative source paths are resolved against this directory.
    pub data_dir: Option<PathBuf>,
}

impl LoaderConfig {
    pub fn with_data_dir(dir: impl Into<PathBuf>) -> Self {
        LoaderConfig {
            data_dir: Some(dir.into()),
        }
    }

    pub fn resolve(&self, source: &Path) -> PathBuf {
        match &self.data_dir {
            Some(dir) if source.is_relative() => dir.join(source),
            _ => source.to_path_buf(),
        }
    }
}

// ---------------------------------------------------------------------------
// Settings file
// ---------------------------------------------------------------------------

/// Settings for one report model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    #[serde(alias = "timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub retry_attempts: u32,
    #[serde(alias = "retry_delay")]
    pub retry_delay_secs: u64,
    pub batch_size: usize,
    pub rate_limit: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            retry_attempts: 3,
            retry_delay_secs: 1,
            batch_size: 10,
            rate_limit: 60,
        }
    }
}

/// Meta-analysis method choices forwarded to the report layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaSettings {
    pub visualization_style: String,
    pub summary_measure: String,
    pub pooling_method: String,
    pub tau2_estimator: String,
    pub ci_method: String,
    pub hartung_knapp_adjustment: String,
    pub prediction_interval_method: String,
    pub tau2_ci_method: String,
    pub publication_bias_method: String,
}

impl Default for MetaSettings {
    fn default() -> Self {
        MetaSettings {
            visualization_style: "RevMan5".into(),
            summary_measure: "SMD".into(),
            pooling_method: "Inverse".into(),
            tau2_estimator: "REML".into(),
            ci_method: "classic".into(),
            hartung_knapp_adjustment: String::new(),
            prediction_interval_method: "HTS".into(),
            tau2_ci_method: "QP".into(),
            publication_bias_method: "Egger".into(),
        }
    }
}

impl MetaSettings {
    /// Check every choice against the catalog for `analysis_type`. Fields are
    /// checked in declaration order; the first invalid one is reported.
    pub fn validate(&self, analysis_type: AnalysisType) -> Result<(), SettingsError> {
        let valid = ValidSettings::for_family(analysis_type);
        let checks: [(&'static str, &str, &[&str]); 9] = [
            ("visualization style", self.visualization_style.as_str(), valid.visualization_styles),
            ("summary measure", self.summary_measure.as_str(), valid.summary_measures),
            ("pooling method", self.pooling_method.as_str(), valid.pooling_methods),
            ("tau2 estimator", self.tau2_estimator.as_str(), valid.tau2_estimators),
            ("CI method", self.ci_method.as_str(), valid.ci_methods),
            (
                "Hartung-Knapp adjustment",
                self.hartung_knapp_adjustment.as_str(),
                valid.hartung_knapp_adjustments,
            ),
            (
                "prediction interval method",
                self.prediction_interval_method.as_str(),
                valid.prediction_interval_methods,
            ),
            ("tau2 CI method", self.tau2_ci_method.as_str(), valid.tau2_ci_methods),
            (
                "publication bias method",
                self.publication_bias_method.as_str(),
                valid.publication_bias_methods,
            ),
        ];

        for (setting, value, allowed) in checks {
            if !allowed.contains(&value) {
                log::error!("meta-analysis settings: invalid {setting} '{value}' for {analysis_type}");
                return Err(SettingsError::Invalid {
                    setting,
                    value: value.to_string(),
                    analysis_type,
                });
            }
        }
        Ok(())
    }
}

/// Full settings file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Report model name → its settings.
    #[serde(default)]
    pub models: BTreeMap<String, LlmConfig>,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub meta_analysis: MetaSettings,
}

impl Settings {
    pub const ENV_VAR: &'static str = "METAMAR_ENV";

    /// Load `config.<env>.json` from `dir`, with `<env>` taken from
    /// `METAMAR_ENV` (default `development`).
    pub fn load(dir: &Path) -> Result<Self, SettingsError> {
        let env = std::env::var(Self::ENV_VAR).unwrap_or_else(|_| "development".to_string());
        Self::load_for_env(dir, &env)
    }

    /// Load `config.<env>.json`, falling back to `config.json`.
    pub fn load_for_env(dir: &Path, env: &str) -> Result<Self, SettingsError> {
        let env_path = dir.join(format!("config.{env}.json"));
        let path = if env_path.exists() {
            env_path
        } else {
            let fallback = dir.join("config.json");
            if !fallback.exists() {
                return Err(SettingsError::NotFound {
                    dir: dir.to_path_buf(),
                });
            }
            fallback
        };
        log::info!("loading settings from {}", path.display());
        Self::from_json_file(&path)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

// ---------------------------------------------------------------------------
// Catalog of valid choices
// ---------------------------------------------------------------------------

const VISUALIZATION_STYLES: &[&str] =
    &["RevMan5", "BMJ", "JAMA", "IQWiG5", "IQWiG6", "geneexpr", "meta4"];
const TAU2_ESTIMATORS: &[&str] = &["REML", "PM", "DL", "ML", "HS", "SJ", "HE", "EB"];
const CI_METHODS: &[&str] = &["classic", "HK", "KR"];
const HARTUNG_KNAPP_ADJUSTMENTS: &[&str] = &["", "se", "IQWiG6", "ci"];
const PREDICTION_INTERVAL_METHODS: &[&str] = &["HTS", "HK", "KR", "NNF", "S"];
const PREDICTION_INTERVAL_ADJUSTMENTS: &[&str] = &["", "se"];
const TAU2_CI_METHODS: &[&str] = &["J", "BJ", "QP", "PL", ""];
const PUBLICATION_BIAS_METHODS: &[&str] = &["Begg", "Egger", "Thompson", "Harbord", "Deeks"];

/// Allowed setting values for one outcome family.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidSettings {
    pub visualization_styles: &'static [&'static str],
    pub summary_measures: &'static [&'static str],
    pub pooling_methods: &'static [&'static str],
    pub random_effects_methods: &'static [&'static str],
    pub tau2_estimators: &'static [&'static str],
    pub ci_methods: &'static [&'static str],
    pub hartung_knapp_adjustments: &'static [&'static str],
    pub prediction_interval_methods: &'static [&'static str],
    pub prediction_interval_adjustments: &'static [&'static str],
    pub tau2_ci_methods: &'static [&'static str],
    pub publication_bias_methods: &'static [&'static str],
}

impl ValidSettings {
    pub fn for_family(analysis_type: AnalysisType) -> Self {
        let (summary_measures, pooling_methods): (&[&str], &[&str]) = match analysis_type.family()
        {
            AnalysisType::Binary => (&["OR", "RR", "RD"], &["MH", "Peto", "Inverse"]),
            AnalysisType::Generic => (
                &["MD", "SMD", "ROM", "OR", "RR", "RD", "HR", "IRR"],
                &["Inverse"],
            ),
            AnalysisType::Correlation => (&["ZCOR", "COR"], &["Inverse"]),
            _ => (&["MD", "SMD", "ROM"], &["Inverse", "Hedges", "Cohen", "Glass"]),
        };
        ValidSettings {
            visualization_styles: VISUALIZATION_STYLES,
            summary_measures,
            pooling_methods,
            random_effects_methods: TAU2_ESTIMATORS,
            tau2_estimators: TAU2_ESTIMATORS,
            ci_methods: CI_METHODS,
            hartung_knapp_adjustments: HARTUNG_KNAPP_ADJUSTMENTS,
            prediction_interval_methods: PREDICTION_INTERVAL_METHODS,
            prediction_interval_adjustments: PREDICTION_INTERVAL_ADJUSTMENTS,
            tau2_ci_methods: TAU2_CI_METHODS,
            publication_bias_methods: PUBLICATION_BIAS_METHODS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_settings_valid_for_continuous() {
        assert!(MetaSettings::default().validate(AnalysisType::Continuous).is_ok());
        assert!(MetaSettings::default()
            .validate(AnalysisType::ContinuousMedian)
            .is_ok());
    }

    #[test]
    fn summary_measure_checked_per_family() {
        let err = MetaSettings::default()
            .validate(AnalysisType::Binary)
            .unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid { setting: "summary measure", ref value, .. } if value == "SMD"
        ));

        let binary = MetaSettings {
            summary_measure: "OR".into(),
            pooling_method: "MH".into(),
            ..MetaSettings::default()
        };
        assert!(binary.validate(AnalysisType::Binary).is_ok());
    }

    #[test]
    fn non_binary_non_continuous_pool_inverse_only() {
        let s = MetaSettings {
            summary_measure: "ZCOR".into(),
            pooling_method: "Hedges".into(),
            ..MetaSettings::default()
        };
        let err = s.validate(AnalysisType::Correlation).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { setting: "pooling method", .. }));
    }

    #[test]
    fn loader_config_resolves_relative_paths() {
        let cfg = LoaderConfig::with_data_dir("/data");
        assert_eq!(cfg.resolve(Path::new("a.csv")), PathBuf::from("/data/a.csv"));
        assert_eq!(cfg.resolve(Path::new("/abs/a.csv")), PathBuf::from("/abs/a.csv"));
        assert_eq!(
            LoaderConfig::default().resolve(Path::new("a.csv")),
            PathBuf::from("a.csv")
        );
    }

    #[test]
    fn loads_env_file_then_falls_back() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("config.json"),
            r#"{ "meta_analysis": { "summary_measure": "MD" } }"#,
        )
        .unwrap();
        std::fs::write(
            tmp.path().join("config.production.json"),
            r#"{
                "models": { "gpt4": { "model": "gpt-4", "temperature": 0.2, "max_tokens": 2000, "timeout": 60 } },
                "api": { "retry_attempts": 5, "retry_delay": 2, "batch_size": 4, "rate_limit": 30 }
            }"#,
        )
        .unwrap();

        let dev = Settings::load_for_env(tmp.path(), "development").unwrap();
        assert_eq!(dev.meta_analysis.summary_measure, "MD");
        assert_eq!(dev.meta_analysis.tau2_estimator, "REML");

        let prod = Settings::load_for_env(tmp.path(), "production").unwrap();
        assert_eq!(prod.models["gpt4"].timeout_secs, 60);
        assert_eq!(prod.api.retry_attempts, 5);
    }

    #[test]
    fn missing_config_dir_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = Settings::load_for_env(tmp.path(), "development").unwrap_err();
        assert!(matches!(err, SettingsError::NotFound { .. }));
    }
}
