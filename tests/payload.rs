use riskboard::analysis::{build_payload, correlate, summarize, AgeRange, AnalyticsFilter};
use riskboard::loader::load_records_from_path;
use riskboard::models::{PatientRecord, Symptom, SymptomSet, SYMPTOM_CATALOG};
use riskboard::RiskboardError;
use std::path::Path;

fn record(age: u32, risk: f64, hbp: bool) -> PatientRecord {
    let mut symptoms = SymptomSet::new();
    symptoms.set(Symptom::HighBloodPressure, hbp);
    PatientRecord::new(age, risk, symptoms).unwrap()
}

fn fixture_records() -> Vec<PatientRecord> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/sample_patients.csv");
    load_records_from_path(&path).unwrap()
}

#[test]
fn comparative_box_plot_example() {
    let records = vec![
        record(45, 75.0, true),
        record(50, 65.0, true),
        record(35, 25.0, false),
        record(40, 30.0, false),
    ];
    let filter = AnalyticsFilter::new(35, 50, "High Blood Pressure").unwrap();
    let payload = build_payload(&records, &filter).unwrap();

    let plot = payload.comparative_box_plot;
    assert!(plot.is_complete());

    let with = plot.with_symptom.unwrap();
    assert_eq!(with.sample_size, 2);
    // floor(2 * 0.5) = 1 -> second element of [65, 75]
    assert_eq!(with.median, 75.0);
    assert_eq!(with.min, 65.0);
    assert_eq!(with.mean, 70.0);

    let without = plot.without_symptom.unwrap();
    assert_eq!(without.sample_size, 2);
    assert_eq!(without.min, 25.0);
    assert_eq!(without.median, 30.0);
    assert_eq!(without.max, 30.0);

    assert_eq!(payload.summary_stats.total_patients, 4);
    assert_eq!(payload.summary_stats.high_risk_cases, 2);
    assert_eq!(payload.summary_stats.average_risk, Some(48.75));
}

#[test]
fn unknown_symptom_is_rejected() {
    let err = AnalyticsFilter::new(20, 90, "Blurred Vision").unwrap_err();
    assert!(matches!(err, RiskboardError::InvalidFilter(_)));
}

#[test]
fn fixture_dataset_properties() {
    let records = fixture_records();
    assert_eq!(records.len(), 24);

    let filter = AnalyticsFilter::new(0, 120, "Chest Pain").unwrap();
    let payload = build_payload(&records, &filter).unwrap();

    // Everything in the fixture falls in the window.
    assert_eq!(payload.summary_stats.total_patients, records.len());
    assert_eq!(
        payload.age_trend.iter().map(|p| p.count).sum::<usize>(),
        records.len()
    );
    assert!(payload.age_trend.windows(2).all(|w| w[0].age < w[1].age));

    let matrix = &payload.correlation_matrix;
    for a in SYMPTOM_CATALOG {
        for b in SYMPTOM_CATALOG {
            assert_eq!(matrix.get(a, b), matrix.get(b, a));
        }
    }

    for plot in &payload.box_plot_data {
        if let Some(summary) = plot.summary {
            assert!(summary.min <= summary.q1);
            assert!(summary.q1 <= summary.median);
            assert!(summary.median <= summary.q3);
            assert!(summary.q3 <= summary.max);
        }
    }
}

#[test]
fn narrowing_the_window_updates_every_section() {
    let records = fixture_records();
    let wide_filter = AnalyticsFilter::new(0, 120, "Dizziness").unwrap();
    let narrow_filter = AnalyticsFilter::new(50, 70, "Dizziness").unwrap();
    let wide = build_payload(&records, &wide_filter).unwrap();
    let narrow = build_payload(&records, &narrow_filter).unwrap();

    let range = AgeRange::new(50, 70).unwrap();
    let in_window = range.apply(&records);

    assert_eq!(narrow.summary_stats.total_patients, in_window.len());
    assert_eq!(narrow.age_risk_series.len(), in_window.len());
    assert_eq!(narrow.correlation_matrix, correlate(&in_window));
    assert!(narrow.summary_stats.total_patients <= wide.summary_stats.total_patients);

    let risks: Vec<f64> = in_window
        .iter()
        .filter(|r| r.has(Symptom::Dizziness))
        .map(|r| r.risk_percent())
        .collect();
    assert_eq!(narrow.comparative_box_plot.with_symptom, summarize(&risks));
}
