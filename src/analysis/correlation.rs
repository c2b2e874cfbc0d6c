//! Pearson correlation between symptoms, and between symptoms and risk.

use crate::models::{
    CorrelationCell, CorrelationMatrix, PatientRecord, RiskCorrelation, Symptom, SYMPTOM_CATALOG,
};
use rayon::prelude::*;

/// Pearson product-moment correlation of two equally long series.
///
/// Returns `0.0` when the denominator is zero, i.e. when either series is
/// constant (this includes empty input).
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len());

    let n = x.len() as f64;
    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xy: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();
    let sum_x2: f64 = x.iter().map(|a| a * a).sum();
    let sum_y2: f64 = y.iter().map(|b| b * b).sum();

    let numerator = n * sum_xy - sum_x * sum_y;
    let denominator = ((n * sum_x2 - sum_x * sum_x) * (n * sum_y2 - sum_y * sum_y)).sqrt();

    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// 0/1 presence series for one symptom.
fn presence_series(records: &[PatientRecord], symptom: Symptom) -> Vec<f64> {
    records
        .iter()
        .map(|record| if record.has(symptom) { 1.0 } else { 0.0 })
        .collect()
}

/// Full symptom × symptom correlation matrix, diagonal included.
///
/// Rows are computed in parallel over the catalog; each cell is a
/// sequential reduction, so the output does not depend on scheduling.
pub fn correlate(records: &[PatientRecord]) -> CorrelationMatrix {
    let columns: Vec<Vec<f64>> = SYMPTOM_CATALOG
        .iter()
        .map(|symptom| presence_series(records, *symptom))
        .collect();

    let rows: Vec<Vec<CorrelationCell>> = SYMPTOM_CATALOG
        .as_slice()
        .par_iter()
        .map(|source| {
            SYMPTOM_CATALOG
                .iter()
                .map(|target| CorrelationCell {
                    source: *source,
                    target: *target,
                    value: pearson(&columns[source.index()], &columns[target.index()]),
                })
                .collect::<Vec<_>>()
        })
        .collect();

    CorrelationMatrix::from_cells(rows.into_iter().flatten().collect())
}

/// Correlation of each symptom with the risk percentage, strongest positive
/// first. Ties keep catalog order.
pub fn risk_correlations(records: &[PatientRecord]) -> Vec<RiskCorrelation> {
    let risks: Vec<f64> = records.iter().map(|r| r.risk_percent()).collect();

    let mut correlations: Vec<RiskCorrelation> = SYMPTOM_CATALOG
        .iter()
        .map(|symptom| RiskCorrelation {
            symptom: *symptom,
            value: pearson(&presence_series(records, *symptom), &risks),
        })
        .collect();

    correlations.sort_by(|a, b| b.value.total_cmp(&a.value));
    correlations
}
