//! Box-plot statistics.
//!
//! Quartiles use the zero-indexed nearest-rank convention everywhere:
//! the element at `floor(n * p)` of the sorted sample, no interpolation.

use crate::models::{
    ComparativeBoxPlot, DistributionSummary, PatientRecord, Symptom, SymptomBoxPlot,
    SYMPTOM_CATALOG,
};

/// Five-number summary plus mean, or `None` for an empty sample.
pub fn summarize(values: &[f64]) -> Option<DistributionSummary> {
    if values.is_empty() {
        return None;
    }

    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    Some(DistributionSummary {
        min: sorted[0],
        q1: sorted[n / 4],
        median: sorted[n / 2],
        q3: sorted[n * 3 / 4],
        max: sorted[n - 1],
        mean,
        sample_size: n,
    })
}

fn risks_where<F>(records: &[PatientRecord], predicate: F) -> Vec<f64>
where
    F: Fn(&PatientRecord) -> bool,
{
    records
        .iter()
        .filter(|record| predicate(record))
        .map(|record| record.risk_percent())
        .collect()
}

/// Risk distribution among records presenting each symptom, in catalog order.
pub fn symptom_box_plots(records: &[PatientRecord]) -> Vec<SymptomBoxPlot> {
    SYMPTOM_CATALOG
        .iter()
        .map(|symptom| SymptomBoxPlot {
            symptom: *symptom,
            summary: summarize(&risks_where(records, |r| r.has(*symptom))),
        })
        .collect()
}

/// Splits `records` on the presence of `symptom` and summarizes both sides.
pub fn comparative_box_plot(records: &[PatientRecord], symptom: Symptom) -> ComparativeBoxPlot {
    ComparativeBoxPlot {
        symptom,
        with_symptom: summarize(&risks_where(records, |r| r.has(symptom))),
        without_symptom: summarize(&risks_where(records, |r| !r.has(symptom))),
    }
}
