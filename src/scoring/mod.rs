//! Client for the external risk scoring service.
//!
//! The engine never scores patients itself. This is a pass-through to the
//! service behind the risk calculator: it sends an age and a symptom list
//! and returns the service's probability unchanged.

use crate::models::{Symptom, SymptomSet};
use crate::{Result, RiskboardError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Configuration for the scoring client.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_seconds: 30,
        }
    }
}

/// Prediction request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest {
    pub age: u32,
    pub symptoms: Vec<Symptom>,
}

impl PredictionRequest {
    pub fn new(age: u32, symptoms: &SymptomSet) -> Self {
        Self {
            age,
            symptoms: symptoms.iter_present().collect(),
        }
    }
}

/// Prediction returned by the scoring service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    /// Probability of being at risk, in `[0, 1]`.
    pub risk: f64,
    pub is_high_risk: bool,
}

impl Prediction {
    fn validate(self) -> Result<Self> {
        if !self.risk.is_finite() || !(0.0..=1.0).contains(&self.risk) {
            return Err(RiskboardError::Scoring(format!(
                "risk {} is outside [0, 1]",
                self.risk
            )));
        }
        Ok(self)
    }
}

/// HTTP client for `POST {base_url}/api/predict`.
pub struct ScoringClient {
    config: ScoringConfig,
    http_client: reqwest::Client,
}

impl ScoringClient {
    pub fn new(config: ScoringConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| RiskboardError::Scoring(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn predict_url(&self) -> String {
        format!("{}/api/predict", self.config.base_url.trim_end_matches('/'))
    }

    /// Ask the scoring service for a prediction.
    pub async fn predict(&self, request: &PredictionRequest) -> Result<Prediction> {
        let url = self.predict_url();
        debug!("Requesting prediction from {} for age {}", url, request.age);

        let response = self
            .http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RiskboardError::Scoring(format!(
                        "Request timed out after {}s",
                        self.config.timeout_seconds
                    ))
                } else if e.is_connect() {
                    RiskboardError::Scoring(format!(
                        "Cannot connect to scoring service at {}",
                        self.config.base_url
                    ))
                } else {
                    RiskboardError::Scoring(format!("Failed to send request: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RiskboardError::Scoring(format!(
                "Scoring API error {}: {}",
                status, body
            )));
        }

        let prediction: Prediction = response
            .json()
            .await
            .map_err(|e| RiskboardError::Scoring(format!("Failed to parse prediction: {}", e)))?;

        let prediction = prediction.validate()?;
        info!(
            "Prediction: risk {:.3}, high risk: {}",
            prediction.risk, prediction.is_high_risk
        );
        Ok(prediction)
    }
}
