//! Riskboard - stroke risk statistics from the command line
//!
//! Loads a CSV dataset of patient records, aggregates it for an age window
//! and a selected symptom, and writes a Markdown or JSON report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Error (bad arguments, malformed dataset, scoring failure, etc.)

mod cli;
mod config;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, Command, OutputFormat};
use config::Config;
use riskboard::analysis::{Aggregator, AnalyticsFilter};
use riskboard::loader;
use riskboard::models::{PatientRecord, Symptom, SymptomSet, SYMPTOM_CATALOG};
use riskboard::report::{self, RenderOptions, Report, ReportMetadata};
use riskboard::scoring::{PredictionRequest, ScoringClient, ScoringConfig};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config and --list-symptoms early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }
    if args.list_symptoms {
        for symptom in SYMPTOM_CATALOG {
            println!("{}", symptom);
        }
        return Ok(());
    }

    // Configuration decides the log level, so it is loaded before logging starts
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(args.log_level(config.general.verbose));

    info!("Riskboard v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Configuration: {:?}", config);

    let result = match args.command.clone() {
        Some(Command::Predict { age, symptoms }) => run_predict(&config, age, &symptoms).await,
        None => run_analysis(&args, &config),
    };

    if let Err(e) = result {
        error!("Run failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .riskboard.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(config::CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            config::CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", config::CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", config::CONFIG_FILE);
    println!("   Edit it to set the dataset path, age window, symptom and threshold.");
    Ok(())
}

/// Initialize logging at the given level.
///
/// `RUST_LOG` takes precedence over the verbosity settings when set.
fn init_logging(level: tracing::Level) {
    let level = LevelFilter::from_level(level);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load configuration from file or use defaults, then apply CLI overrides.
///
/// Runs before the subscriber is installed, so problems go to stderr.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = if let Some(ref config_path) = args.config {
        Config::load(config_path)?
    } else {
        match Config::load_default() {
            Ok(Some(config)) => config,
            Ok(None) => Config::default(),
            Err(e) => {
                eprintln!("⚠️  Failed to load config, using defaults: {:#}", e);
                Config::default()
            }
        }
    };

    config.merge_with_args(args);
    config.validate()?;
    Ok(config)
}

/// Load, aggregate and write the report.
fn run_analysis(args: &Args, config: &Config) -> Result<()> {
    let start_time = Instant::now();

    // Validate the merged filter before touching the dataset
    let filter = AnalyticsFilter::new(
        config.analysis.age_min,
        config.analysis.age_max,
        &config.analysis.selected_symptom,
    )?;
    let aggregator = Aggregator::new(config.analysis.risk_threshold)?;

    let data_path = PathBuf::from(&config.data.path);
    println!("📥 Loading dataset: {}", data_path.display());
    let records = loader::load_records_from_path(&data_path)
        .with_context(|| format!("Failed to load dataset {}", data_path.display()))?;

    if args.dry_run {
        handle_dry_run(&records);
        return Ok(());
    }

    println!(
        "🔬 Aggregating ages {}-{}, selected symptom: {}",
        filter.age_range.min, filter.age_range.max, filter.selected_symptom
    );
    let payload = aggregator.build_payload(&records, &filter)?;

    let report = Report {
        metadata: ReportMetadata {
            dataset: data_path.display().to_string(),
            generated_at: Utc::now(),
            records_loaded: records.len(),
            duration_seconds: start_time.elapsed().as_secs_f64(),
        },
        payload,
    };

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => {
            let options = RenderOptions {
                top_correlations: config.report.top_correlations,
                include_age_series: config.report.include_age_series,
            };
            report::generate_markdown_report(&report, &options)
        }
    };

    let output_path = PathBuf::from(&config.general.output);
    report::write_report(&output, &output_path)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    let stats = &report.payload.summary_stats;
    println!("\n📊 Summary:");
    println!("   Patients in window: {}", stats.total_patients);
    match stats.average_risk {
        Some(avg) => println!("   Average risk: {:.1}%", avg),
        None => println!("   Average risk: n/a"),
    }
    println!(
        "   High risk: {} | Low risk: {}",
        stats.high_risk_cases,
        stats.low_risk_cases()
    );
    if !report.payload.comparative_box_plot.is_complete() {
        println!(
            "   ⚠️  No data available to compare patients with and without {}",
            filter.selected_symptom
        );
    }
    println!("\n✅ Report saved to: {}", output_path.display());

    Ok(())
}

/// Handle --dry-run: report what was loaded and exit.
fn handle_dry_run(records: &[PatientRecord]) {
    println!("\n🔍 Dry run: {} valid records loaded\n", records.len());

    for symptom in SYMPTOM_CATALOG {
        let present = records.iter().filter(|r| r.has(symptom)).count();
        println!("     {:<32} {:>6}", symptom.name(), present);
    }

    println!("\n✅ Dry run complete. No aggregation was performed.");
}

/// Forward a single prediction request to the scoring service.
async fn run_predict(config: &Config, age: u32, symptom_names: &[String]) -> Result<()> {

    let symptoms = symptom_names
        .iter()
        .map(|name| name.parse::<Symptom>())
        .collect::<riskboard::Result<SymptomSet>>()?;

    let client = ScoringClient::new(ScoringConfig {
        base_url: config.scoring.url.clone(),
        timeout_seconds: config.scoring.timeout_seconds,
    })?;

    println!("🤖 Requesting prediction from {}", config.scoring.url);
    let prediction = client
        .predict(&PredictionRequest::new(age, &symptoms))
        .await?;

    println!("\n📈 Predicted risk: {:.1}%", prediction.risk * 100.0);
    println!(
        "   Category: {}",
        if prediction.is_high_risk {
            "High Risk"
        } else {
            "Low Risk"
        }
    );

    Ok(())
}
