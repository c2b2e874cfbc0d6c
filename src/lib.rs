//! # Riskboard
//!
//! Statistical aggregation engine for stroke-risk patient datasets.
//!
//! This crate provides:
//! - A typed record model with a single fixed symptom catalog
//! - Pearson correlation between symptoms (and between symptoms and risk)
//! - Nearest-rank box-plot summaries, per symptom and comparative
//! - Age-binned risk trends and high/low risk category counts
//! - One facade, [`analysis::build_payload`], that produces everything a
//!   dashboard needs for a given age window and selected symptom
//!
//! ## Layout
//!
//! - `models`: Core types (Symptom, PatientRecord, payload structures)
//! - `loader`: CSV ingestion and validation
//! - `analysis`: Correlation, distribution, trend and the aggregation facade
//! - `report`: Markdown/JSON rendering of a payload
//! - `scoring`: Client for the external risk scoring service

pub mod analysis;
pub mod loader;
pub mod models;
pub mod report;
pub mod scoring;

pub use analysis::{build_payload, Aggregator, AnalyticsFilter};
pub use models::{AnalyticsPayload, PatientRecord, RiskCategory, Symptom, SYMPTOM_CATALOG};

/// Result type for Riskboard operations
pub type Result<T> = std::result::Result<T, RiskboardError>;

/// Main error type for Riskboard
#[derive(Debug, thiserror::Error)]
pub enum RiskboardError {
    #[error("Malformed record at row {row}, column '{column}': {reason}")]
    MalformedRecord {
        row: usize,
        column: String,
        reason: String,
    },

    #[error("Invalid patient record: {0}")]
    InvalidRecord(String),

    #[error("Dataset is missing required column '{0}'")]
    MissingColumn(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Scoring service error: {0}")]
    Scoring(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
