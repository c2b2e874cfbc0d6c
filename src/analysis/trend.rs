//! Age trends, risk categories and headline counts.

use crate::analysis::filter::AgeRange;
use crate::models::{
    AgeRiskPoint, PatientRecord, RiskCategory, SummaryStats, SymptomRiskShare, TrendPoint,
    SYMPTOM_CATALOG,
};
use std::collections::BTreeMap;

/// Output of [`aggregate_trend`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrendAggregate {
    /// One point per distinct age, ascending.
    pub points: Vec<TrendPoint>,
    /// Stacked high/low shares per symptom; empty when no record is in range.
    pub symptom_distribution: Vec<SymptomRiskShare>,
}

/// Mean risk per age inside `age_range`, plus per-symptom risk shares.
pub fn aggregate_trend(
    records: &[PatientRecord],
    age_range: AgeRange,
    threshold: f64,
) -> TrendAggregate {
    let filtered: Vec<&PatientRecord> = records
        .iter()
        .filter(|record| age_range.contains(record.age()))
        .collect();

    // age -> (running mean, count)
    let mut by_age: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    for record in &filtered {
        let entry = by_age.entry(record.age()).or_insert((0.0, 0));
        let (mean, count) = *entry;
        *entry = (
            (mean * count as f64 + record.risk_percent()) / (count + 1) as f64,
            count + 1,
        );
    }

    let points = by_age
        .into_iter()
        .map(|(age, (mean_risk, count))| TrendPoint {
            age,
            mean_risk,
            count,
        })
        .collect();

    TrendAggregate {
        points,
        symptom_distribution: symptom_distribution(&filtered, threshold),
    }
}

fn symptom_distribution(filtered: &[&PatientRecord], threshold: f64) -> Vec<SymptomRiskShare> {
    if filtered.is_empty() {
        return Vec::new();
    }

    let total = filtered.len() as f64;
    SYMPTOM_CATALOG
        .iter()
        .map(|symptom| {
            let (high, low) = filtered
                .iter()
                .filter(|record| record.has(*symptom))
                .fold((0usize, 0usize), |(high, low), record| {
                    match record.category(threshold) {
                        RiskCategory::HighRisk => (high + 1, low),
                        RiskCategory::LowRisk => (high, low + 1),
                    }
                });

            SymptomRiskShare {
                symptom: *symptom,
                high_risk: high as f64 / total * 100.0,
                low_risk: low as f64 / total * 100.0,
            }
        })
        .collect()
}

/// Per-record scatter series, in input order.
pub fn age_risk_series(records: &[PatientRecord], threshold: f64) -> Vec<AgeRiskPoint> {
    records
        .iter()
        .map(|record| AgeRiskPoint {
            age: record.age(),
            risk: record.risk_percent(),
            category: record.category(threshold),
        })
        .collect()
}

/// Headline counts over `records`.
pub fn summary_stats(records: &[PatientRecord], threshold: f64) -> SummaryStats {
    let total_patients = records.len();
    let high_risk_cases = records
        .iter()
        .filter(|record| record.category(threshold) == RiskCategory::HighRisk)
        .count();
    let risk_factors = SYMPTOM_CATALOG
        .iter()
        .filter(|symptom| records.iter().any(|record| record.has(**symptom)))
        .count();
    let average_risk = if total_patients == 0 {
        None
    } else {
        Some(records.iter().map(|r| r.risk_percent()).sum::<f64>() / total_patients as f64)
    };

    SummaryStats {
        average_risk,
        high_risk_cases,
        risk_factors,
        total_patients,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Symptom, SymptomSet, DEFAULT_RISK_THRESHOLD};

    fn record(age: u32, risk: f64, symptoms: &[Symptom]) -> PatientRecord {
        PatientRecord::new(age, risk, symptoms.iter().copied().collect()).unwrap()
    }

    #[test]
    fn test_points_sorted_and_grouped() {
        let records = vec![
            record(60, 40.0, &[]),
            record(45, 70.0, &[]),
            record(60, 50.0, &[]),
            record(45, 10.0, &[]),
            record(52, 33.0, &[]),
        ];
        let trend = aggregate_trend(&records, AgeRange::new(0, 120).unwrap(), 50.0);

        let ages: Vec<u32> = trend.points.iter().map(|p| p.age).collect();
        assert_eq!(ages, vec![45, 52, 60]);
        assert!((trend.points[0].mean_risk - 40.0).abs() < 1e-9);
        assert_eq!(trend.points[0].count, 2);
        assert!((trend.points[2].mean_risk - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_incremental_mean_matches_plain_mean() {
        let risks = [12.5, 99.1, 0.3, 47.7, 63.2, 18.8, 71.4, 5.5, 88.0, 33.3];
        let records: Vec<PatientRecord> = risks.iter().map(|r| record(70, *r, &[])).collect();
        let trend = aggregate_trend(&records, AgeRange::new(70, 70).unwrap(), 50.0);

        let plain = risks.iter().sum::<f64>() / risks.len() as f64;
        assert_eq!(trend.points.len(), 1);
        assert!((trend.points[0].mean_risk - plain).abs() < 1e-9);
        assert_eq!(trend.points[0].count, risks.len());
    }

    #[test]
    fn test_range_filter_applies() {
        let records = vec![record(30, 10.0, &[]), record(40, 20.0, &[]), record(50, 30.0, &[])];
        let trend = aggregate_trend(&records, AgeRange::new(35, 45).unwrap(), 50.0);
        assert_eq!(trend.points.len(), 1);
        assert_eq!(trend.points[0].age, 40);
    }

    #[test]
    fn test_symptom_distribution_percentages() {
        let records = vec![
            record(40, 80.0, &[Symptom::ChestPain]),
            record(41, 20.0, &[Symptom::ChestPain]),
            record(42, 50.0, &[Symptom::Dizziness]),
            record(43, 10.0, &[]),
        ];
        let trend = aggregate_trend(&records, AgeRange::new(0, 100).unwrap(), 50.0);

        let chest = &trend.symptom_distribution[Symptom::ChestPain.index()];
        assert_eq!(chest.high_risk, 25.0);
        assert_eq!(chest.low_risk, 25.0);

        let dizzy = &trend.symptom_distribution[Symptom::Dizziness.index()];
        assert_eq!(dizzy.high_risk, 25.0);
        assert_eq!(dizzy.low_risk, 0.0);
    }

    #[test]
    fn test_empty_window() {
        let records = vec![record(30, 10.0, &[Symptom::ChestPain])];
        let trend = aggregate_trend(&records, AgeRange::new(80, 90).unwrap(), 50.0);
        assert!(trend.points.is_empty());
        assert!(trend.symptom_distribution.is_empty());

        let stats = summary_stats(&[], DEFAULT_RISK_THRESHOLD);
        assert_eq!(stats.average_risk, None);
        assert_eq!(stats.total_patients, 0);
    }

    #[test]
    fn test_category_partition() {
        let records: Vec<PatientRecord> = (0..=20)
            .map(|i| record(40 + i, f64::from(i * 5), &[]))
            .collect();
        let stats = summary_stats(&records, DEFAULT_RISK_THRESHOLD);
        let series = age_risk_series(&records, DEFAULT_RISK_THRESHOLD);

        let high = series
            .iter()
            .filter(|p| p.category == RiskCategory::HighRisk)
            .count();
        let low = series
            .iter()
            .filter(|p| p.category == RiskCategory::LowRisk)
            .count();

        assert_eq!(high + low, records.len());
        assert_eq!(stats.high_risk_cases, high);
        assert_eq!(stats.high_risk_cases + stats.low_risk_cases(), stats.total_patients);
        // 50, 55, ..., 100
        assert_eq!(high, 11);
    }

    #[test]
    fn test_summary_stats_risk_factors() {
        let records = vec![
            record(40, 60.0, &[Symptom::ChestPain, Symptom::Dizziness]),
            PatientRecord::new(41, 20.0, SymptomSet::new()).unwrap(),
            record(42, 40.0, &[Symptom::Dizziness]),
        ];
        let stats = summary_stats(&records, DEFAULT_RISK_THRESHOLD);
        assert_eq!(stats.risk_factors, 2);
        assert_eq!(stats.high_risk_cases, 1);
        assert_eq!(stats.average_risk, Some(40.0));
    }
}
