//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.riskboard.toml` files.

use anyhow::{bail, Context, Result};
use riskboard::models::DEFAULT_RISK_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name.
pub const CONFIG_FILE: &str = ".riskboard.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Dataset settings.
    #[serde(default)]
    pub data: DataConfig,

    /// Analysis defaults.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Scoring service settings.
    #[serde(default)]
    pub scoring: ScoringSettings,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "riskboard_report.md".to_string()
}

/// Dataset location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to the CSV dataset.
    #[serde(default = "default_data_path")]
    pub path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
        }
    }
}

fn default_data_path() -> String {
    "data/stroke_risk_dataset.csv".to_string()
}

/// Default filter and threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Risk percentage at or above which a patient counts as high risk.
    #[serde(default = "default_risk_threshold")]
    pub risk_threshold: f64,

    #[serde(default)]
    pub age_min: u32,

    #[serde(default = "default_age_max")]
    pub age_max: u32,

    /// Symptom used for the comparative box plot.
    #[serde(default = "default_selected_symptom")]
    pub selected_symptom: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            risk_threshold: default_risk_threshold(),
            age_min: 0,
            age_max: default_age_max(),
            selected_symptom: default_selected_symptom(),
        }
    }
}

fn default_risk_threshold() -> f64 {
    DEFAULT_RISK_THRESHOLD
}

fn default_age_max() -> u32 {
    120
}

fn default_selected_symptom() -> String {
    "High Blood Pressure".to_string()
}

/// Scoring service connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringSettings {
    /// Base URL of the scoring service.
    #[serde(default = "default_scoring_url")]
    pub url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            url: default_scoring_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_scoring_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Number of strongest symptom pairs to list.
    #[serde(default = "default_top_correlations")]
    pub top_correlations: usize,

    /// Include the per-patient age/risk table.
    #[serde(default)]
    pub include_age_series: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_correlations: default_top_correlations(),
            include_age_series: false,
        }
    }
}

fn default_top_correlations() -> usize {
    5
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref data) = args.data {
            self.data.path = data.display().to_string();
        }
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }

        if let Some(age_min) = args.age_min {
            self.analysis.age_min = age_min;
        }
        if let Some(age_max) = args.age_max {
            self.analysis.age_max = age_max;
        }
        if let Some(ref symptom) = args.symptom {
            self.analysis.selected_symptom = symptom.clone();
        }
        if let Some(threshold) = args.threshold {
            self.analysis.risk_threshold = threshold;
        }

        if let Some(ref url) = args.scoring_url {
            self.scoring.url = url.clone();
        }
        if let Some(timeout) = args.timeout {
            self.scoring.timeout_seconds = timeout;
        }

        if let Some(top) = args.top_correlations {
            self.report.top_correlations = top;
        }
        if args.include_age_series {
            self.report.include_age_series = true;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Check the merged settings.
    ///
    /// CLI values are validated in `Args::validate`; this catches the same
    /// problems when they come from the config file.
    pub fn validate(&self) -> Result<()> {
        if self.scoring.timeout_seconds == 0 {
            bail!("scoring.timeout_seconds must be at least 1");
        }

        let url = &self.scoring.url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            bail!("scoring.url must start with 'http://' or 'https://', got '{}'", url);
        }

        if !(0.0..=100.0).contains(&self.analysis.risk_threshold) {
            bail!(
                "analysis.risk_threshold must be between 0 and 100, got {}",
                self.analysis.risk_threshold
            );
        }

        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
