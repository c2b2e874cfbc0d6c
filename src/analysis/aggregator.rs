//! Payload aggregation.
//!
//! This module combines the individual statistics into one
//! [`AnalyticsPayload`]. Every analysis runs over the same age-filtered
//! record set so that all charts agree with each other.

use crate::analysis::correlation::{correlate, risk_correlations};
use crate::analysis::distribution::{comparative_box_plot, symptom_box_plots};
use crate::analysis::filter::AnalyticsFilter;
use crate::analysis::trend::{aggregate_trend, age_risk_series, summary_stats};
use crate::models::{AnalyticsPayload, PatientRecord, DEFAULT_RISK_THRESHOLD};
use crate::{Result, RiskboardError};
use tracing::{debug, info};

/// Builds payloads with a fixed risk threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregator {
    risk_threshold: f64,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self {
            risk_threshold: DEFAULT_RISK_THRESHOLD,
        }
    }
}

impl Aggregator {
    /// Creates an aggregator; the threshold must lie in `[0, 100]`.
    pub fn new(risk_threshold: f64) -> Result<Self> {
        if !risk_threshold.is_finite() || !(0.0..=100.0).contains(&risk_threshold) {
            return Err(RiskboardError::InvalidFilter(format!(
                "risk threshold {} is outside [0, 100]",
                risk_threshold
            )));
        }
        Ok(Self { risk_threshold })
    }

    pub fn risk_threshold(&self) -> f64 {
        self.risk_threshold
    }

    /// Produce the full analytics payload for one filter.
    ///
    /// # Errors
    /// Returns `InvalidFilter` if the age range is inverted. Slices without
    /// data are reported as `None`/empty inside the payload, not as errors.
    pub fn build_payload(
        &self,
        records: &[PatientRecord],
        filter: &AnalyticsFilter,
    ) -> Result<AnalyticsPayload> {
        filter.age_range.validate()?;

        let filtered = filter.age_range.apply(records);
        debug!(
            "Age window {}-{} kept {} of {} records",
            filter.age_range.min,
            filter.age_range.max,
            filtered.len(),
            records.len()
        );

        let trend = aggregate_trend(&filtered, filter.age_range, self.risk_threshold);
        let comparative = comparative_box_plot(&filtered, filter.selected_symptom);
        if !comparative.is_complete() {
            debug!(
                "Comparative box plot for {} has an empty group",
                filter.selected_symptom
            );
        }

        let payload = AnalyticsPayload {
            filter: *filter,
            risk_threshold: self.risk_threshold,
            age_risk_series: age_risk_series(&filtered, self.risk_threshold),
            age_trend: trend.points,
            symptom_distribution: trend.symptom_distribution,
            summary_stats: summary_stats(&filtered, self.risk_threshold),
            correlation_matrix: correlate(&filtered),
            risk_correlations: risk_correlations(&filtered),
            box_plot_data: symptom_box_plots(&filtered),
            comparative_box_plot: comparative,
        };

        info!(
            "Built payload: {} patients, {} high risk, {} trend points",
            payload.summary_stats.total_patients,
            payload.summary_stats.high_risk_cases,
            payload.age_trend.len()
        );

        Ok(payload)
    }
}

/// Build a payload with the default 50% risk threshold.
pub fn build_payload(
    records: &[PatientRecord],
    filter: &AnalyticsFilter,
) -> Result<AnalyticsPayload> {
    Aggregator::default().build_payload(records, filter)
}
