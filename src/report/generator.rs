//! Markdown and JSON report generation.
//!
//! Reports only render what the aggregator produced; no statistic is
//! recomputed here.

use crate::models::{
    AnalyticsPayload, ComparativeBoxPlot, CorrelationMatrix, DistributionSummary, SummaryStats,
    SymptomBoxPlot, SymptomRiskShare, TrendPoint,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// Metadata about a generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Dataset the records were loaded from.
    pub dataset: String,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Records loaded before filtering.
    pub records_loaded: usize,
    /// Wall time spent loading and aggregating, in seconds.
    pub duration_seconds: f64,
}

/// A payload plus the context it was produced in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub payload: AnalyticsPayload,
}

/// Rendering options.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Number of strongest symptom pairs to list.
    pub top_correlations: usize,
    /// Include the per-record age/risk table.
    pub include_age_series: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            top_correlations: 5,
            include_age_series: false,
        }
    }
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report, options: &RenderOptions) -> String {
    let payload = &report.payload;
    let mut output = String::new();

    output.push_str("# Stroke Risk Report\n\n");
    output.push_str(&generate_metadata_section(report));
    output.push_str(&generate_summary_section(&payload.summary_stats));
    output.push_str(&generate_trend_section(&payload.age_trend));
    output.push_str(&generate_symptom_distribution_section(&payload.symptom_distribution));
    output.push_str(&generate_box_plot_section(&payload.box_plot_data));
    output.push_str(&generate_comparative_section(&payload.comparative_box_plot));
    output.push_str(&generate_correlation_section(
        &payload.correlation_matrix,
        options.top_correlations,
    ));
    output.push_str(&generate_risk_correlation_section(payload));

    if options.include_age_series {
        output.push_str(&generate_age_series_section(payload));
    }

    output.push_str("---\n\n*Report generated by riskboard*\n");
    output
}

/// Generate the metadata section.
fn generate_metadata_section(report: &Report) -> String {
    let metadata = &report.metadata;
    let filter = &report.payload.filter;
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Dataset:** {}\n", metadata.dataset));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Records Loaded:** {}\n", metadata.records_loaded));
    section.push_str(&format!(
        "- **Age Range:** {}-{}\n",
        filter.age_range.min, filter.age_range.max
    ));
    section.push_str(&format!("- **Selected Symptom:** {}\n", filter.selected_symptom));
    section.push_str(&format!(
        "- **Risk Threshold:** {:.1}%\n",
        report.payload.risk_threshold
    ));
    section.push_str(&format!("- **Duration:** {:.2}s\n\n", metadata.duration_seconds));

    section
}

/// Generate the summary section.
fn generate_summary_section(stats: &SummaryStats) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str("| Patients | Average Risk | High Risk | Low Risk | Risk Factors |\n");
    section.push_str("|:---:|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {} | {} |\n\n",
        stats.total_patients,
        stats
            .average_risk
            .map(|avg| format!("{:.1}%", avg))
            .unwrap_or_else(|| "n/a".to_string()),
        stats.high_risk_cases,
        stats.low_risk_cases(),
        stats.risk_factors
    ));

    section
}

/// Generate the age trend table.
fn generate_trend_section(points: &[TrendPoint]) -> String {
    let mut section = String::new();

    section.push_str("## Risk by Age\n\n");
    if points.is_empty() {
        section.push_str("No data for this selection.\n\n");
        return section;
    }

    section.push_str("| Age | Mean Risk | Patients |\n");
    section.push_str("|:---:|:---:|:---:|\n");
    for point in points {
        section.push_str(&format!(
            "| {} | {:.1}% | {} |\n",
            point.age, point.mean_risk, point.count
        ));
    }
    section.push('\n');

    section
}

/// Generate the per-symptom high/low risk share table.
fn generate_symptom_distribution_section(shares: &[SymptomRiskShare]) -> String {
    let mut section = String::new();

    section.push_str("## Symptom Distribution by Risk Category\n\n");
    if shares.is_empty() {
        section.push_str("No data for this selection.\n\n");
        return section;
    }

    section.push_str("| Symptom | High Risk | Low Risk |\n");
    section.push_str("|:---|:---:|:---:|\n");
    for share in shares {
        section.push_str(&format!(
            "| {} | {:.1}% | {:.1}% |\n",
            share.symptom, share.high_risk, share.low_risk
        ));
    }
    section.push('\n');

    section
}

/// Format the five-number summary as table cells.
fn summary_cells(summary: &DistributionSummary) -> String {
    format!(
        "{:.1} | {:.1} | {:.1} | {:.1} | {:.1} | {:.1} | {}",
        summary.min,
        summary.q1,
        summary.median,
        summary.q3,
        summary.max,
        summary.mean,
        summary.sample_size
    )
}

/// Generate the per-symptom box plot table.
fn generate_box_plot_section(plots: &[SymptomBoxPlot]) -> String {
    let mut section = String::new();

    section.push_str("## Risk Distribution by Symptom\n\n");
    section.push_str("| Symptom | Min | Q1 | Median | Q3 | Max | Mean | n |\n");
    section.push_str("|:---|:---:|:---:|:---:|:---:|:---:|:---:|:---:|\n");
    for plot in plots {
        match plot.summary {
            Some(ref summary) => {
                section.push_str(&format!("| {} | {} |\n", plot.symptom, summary_cells(summary)))
            }
            None => section.push_str(&format!(
                "| {} | - | - | - | - | - | - | 0 |\n",
                plot.symptom
            )),
        }
    }
    section.push('\n');

    section
}

/// Generate the with/without comparison for the selected symptom.
fn generate_comparative_section(plot: &ComparativeBoxPlot) -> String {
    let mut section = String::new();

    section.push_str(&format!("## Comparative Risk: {}\n\n", plot.symptom));

    match (plot.with_symptom, plot.without_symptom) {
        (Some(with), Some(without)) => {
            section.push_str("| Group | Min | Q1 | Median | Q3 | Max | Mean | n |\n");
            section.push_str("|:---|:---:|:---:|:---:|:---:|:---:|:---:|:---:|\n");
            section.push_str(&format!(
                "| With {} | {} |\n",
                plot.symptom,
                summary_cells(&with)
            ));
            section.push_str(&format!(
                "| Without {} | {} |\n\n",
                plot.symptom,
                summary_cells(&without)
            ));
        }
        _ => section.push_str("No data available for this comparison.\n\n"),
    }

    section
}

/// Generate the strongest symptom pair list.
fn generate_correlation_section(matrix: &CorrelationMatrix, top: usize) -> String {
    let mut section = String::new();

    section.push_str("## Strongest Symptom Correlations\n\n");
    let pairs = matrix.strongest_pairs(top);
    if pairs.is_empty() {
        return section;
    }

    section.push_str("| Symptom | Symptom | r |\n");
    section.push_str("|:---|:---|:---:|\n");
    for cell in pairs {
        section.push_str(&format!(
            "| {} | {} | {:+.3} |\n",
            cell.source, cell.target, cell.value
        ));
    }
    section.push('\n');

    section
}

/// Generate the symptom to risk correlation table.
fn generate_risk_correlation_section(payload: &AnalyticsPayload) -> String {
    let mut section = String::new();

    section.push_str("## Correlation with Stroke Risk\n\n");
    section.push_str("| Symptom | r |\n");
    section.push_str("|:---|:---:|\n");
    for correlation in &payload.risk_correlations {
        section.push_str(&format!(
            "| {} | {:+.3} |\n",
            correlation.symptom, correlation.value
        ));
    }
    section.push('\n');

    section
}

/// Generate the per-patient age/risk table.
fn generate_age_series_section(payload: &AnalyticsPayload) -> String {
    let mut section = String::new();

    section.push_str("## Patients\n\n");
    section.push_str("| Age | Risk | Category |\n");
    section.push_str("|:---:|:---:|:---|\n");
    for point in &payload.age_risk_series {
        section.push_str(&format!(
            "| {} | {:.1}% | {} |\n",
            point.age, point.risk, point.category
        ));
    }
    section.push('\n');

    section
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> anyhow::Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write rendered report content to a file.
pub fn write_report(content: &str, path: &Path) -> anyhow::Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{build_payload, AnalyticsFilter};
    use crate::models::{PatientRecord, Symptom};

    fn create_test_report(age_min: u32, age_max: u32) -> Report {
        let hbp = [Symptom::HighBloodPressure].into_iter().collect();
        let records = vec![
            PatientRecord::new(45, 75.0, hbp).unwrap(),
            PatientRecord::new(50, 65.0, hbp).unwrap(),
            PatientRecord::new(35, 25.0, Default::default()).unwrap(),
            PatientRecord::new(40, 30.0, Default::default()).unwrap(),
        ];
        let filter = AnalyticsFilter::new(age_min, age_max, "High Blood Pressure").unwrap();

        Report {
            metadata: ReportMetadata {
                dataset: "data/test.csv".to_string(),
                generated_at: Utc::now(),
                records_loaded: records.len(),
                duration_seconds: 0.5,
            },
            payload: build_payload(&records, &filter).unwrap(),
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report(35, 50);
        let markdown = generate_markdown_report(&report, &RenderOptions::default());

        assert!(markdown.contains("# Stroke Risk Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("data/test.csv"));
        assert!(markdown.contains("## Risk by Age"));
        assert!(markdown.contains("| With High Blood Pressure | 65.0 | 65.0 | 75.0 |"));
        assert!(!markdown.contains("## Patients"));
    }

    #[test]
    fn test_empty_comparison_reports_no_data() {
        let report = create_test_report(36, 44);
        let markdown = generate_markdown_report(&report, &RenderOptions::default());
        assert!(markdown.contains("No data available for this comparison."));
    }

    #[test]
    fn test_age_series_optional() {
        let report = create_test_report(35, 50);
        let options = RenderOptions {
            include_age_series: true,
            ..RenderOptions::default()
        };
        let markdown = generate_markdown_report(&report, &options);
        assert!(markdown.contains("## Patients"));
        assert!(markdown.contains("| 45 | 75.0% | High Risk |"));
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report(35, 50);
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"metadata\""));
        assert!(json.contains("\"ageRiskSeries\""));
        assert!(json.contains("\"comparativeBoxPlot\""));
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");
        write_report("# hello\n", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# hello\n");
    }
}
