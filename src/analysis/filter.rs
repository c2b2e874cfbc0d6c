//! Request filters: age window and selected symptom.

use crate::models::{PatientRecord, Symptom};
use crate::{Result, RiskboardError};
use serde::{Deserialize, Serialize};

/// Inclusive age window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: u32,
    pub max: u32,
}

impl AgeRange {
    /// Creates a range, rejecting `min > max`.
    pub fn new(min: u32, max: u32) -> Result<Self> {
        let range = Self { min, max };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min > self.max {
            return Err(RiskboardError::InvalidFilter(format!(
                "age range is inverted: {} > {}",
                self.min, self.max
            )));
        }
        Ok(())
    }

    pub fn contains(&self, age: u32) -> bool {
        (self.min..=self.max).contains(&age)
    }

    /// Records whose age falls inside the window, in input order.
    pub fn apply(&self, records: &[PatientRecord]) -> Vec<PatientRecord> {
        records
            .iter()
            .filter(|record| self.contains(record.age()))
            .cloned()
            .collect()
    }
}

/// Filter accepted by the aggregation facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsFilter {
    pub age_range: AgeRange,
    pub selected_symptom: Symptom,
}

impl AnalyticsFilter {
    /// Builds a filter from request-facing values.
    ///
    /// # Errors
    /// `InvalidFilter` if the range is inverted or the symptom is not in the
    /// catalog.
    pub fn new(age_min: u32, age_max: u32, selected_symptom: &str) -> Result<Self> {
        Ok(Self {
            age_range: AgeRange::new(age_min, age_max)?,
            selected_symptom: selected_symptom.parse()?,
        })
    }
}
