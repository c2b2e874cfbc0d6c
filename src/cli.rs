//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation. Filter values are optional here so that a
//! `.riskboard.toml` can supply them; see `Config::merge_with_args`.

use clap::{Parser, Subcommand};
use riskboard::models::Symptom;
use std::path::PathBuf;

/// Riskboard - stroke risk statistics for patient datasets
///
/// Loads a CSV of patient records and reports symptom correlations,
/// box-plot statistics and age trends for an age window.
///
/// Examples:
///   riskboard --data stroke.csv
///   riskboard --data stroke.csv --age-min 40 --age-max 65 --symptom "Chest Pain"
///   riskboard --data stroke.csv --format json --output payload.json
///   riskboard predict --age 62 --symptoms "Chest Pain,Dizziness"
///   riskboard --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the CSV dataset
    #[arg(short, long, value_name = "FILE", env = "RISKBOARD_DATA")]
    pub data: Option<PathBuf>,

    /// Output file path for the report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Lower bound of the age window (inclusive)
    #[arg(long, value_name = "AGE")]
    pub age_min: Option<u32>,

    /// Upper bound of the age window (inclusive)
    #[arg(long, value_name = "AGE")]
    pub age_max: Option<u32>,

    /// Symptom for the comparative box plot
    ///
    /// Must be one of the catalog names, see --list-symptoms.
    #[arg(short, long, value_name = "SYMPTOM")]
    pub symptom: Option<String>,

    /// Risk percentage at or above which a patient is high risk (0 - 100)
    #[arg(long, value_name = "PERCENT")]
    pub threshold: Option<f64>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Number of strongest symptom pairs listed in the Markdown report
    #[arg(long, value_name = "COUNT")]
    pub top_correlations: Option<usize>,

    /// Include the per-patient table in the Markdown report
    #[arg(long)]
    pub include_age_series: bool,

    /// Base URL of the scoring service
    #[arg(long, value_name = "URL", env = "RISKBOARD_SCORING_URL", global = true)]
    pub scoring_url: Option<String>,

    /// Scoring request timeout in seconds
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .riskboard.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Load and validate the dataset without aggregating
    #[arg(long)]
    pub dry_run: bool,

    /// Print the symptom catalog and exit
    #[arg(long)]
    pub list_symptoms: bool,

    /// Generate a default .riskboard.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Ask the external scoring service for a single prediction
    Predict {
        /// Patient age in years
        #[arg(long)]
        age: u32,

        /// Present symptoms (comma-separated catalog names)
        #[arg(long, value_delimiter = ',')]
        symptoms: Vec<String>,
    },
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config || self.list_symptoms {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let (Some(min), Some(max)) = (self.age_min, self.age_max) {
            if min > max {
                return Err(format!(
                    "Age range is inverted: --age-min {} > --age-max {}",
                    min, max
                ));
            }
        }

        if let Some(threshold) = self.threshold {
            if !(0.0..=100.0).contains(&threshold) {
                return Err("Threshold must be between 0 and 100".to_string());
            }
        }

        if let Some(ref symptom) = self.symptom {
            symptom.parse::<Symptom>().map_err(|e| e.to_string())?;
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(ref url) = self.scoring_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("Scoring URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(Command::Predict { ref symptoms, .. }) = self.command {
            for symptom in symptoms {
                symptom.parse::<Symptom>().map_err(|e| e.to_string())?;
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `config_verbose` is the `general.verbose` value from the config file;
    /// `--quiet` wins over both it and `--verbose`.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
