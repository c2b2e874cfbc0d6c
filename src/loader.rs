//! Dataset loading and validation.
//!
//! This is the only module that touches untyped external data. Raw CSV
//! rows are validated into [`PatientRecord`] values here; a single bad row
//! fails the whole load so downstream statistics always see a fully typed
//! table.

use crate::models::{PatientRecord, SymptomSet, SYMPTOM_CATALOG, SYMPTOM_COUNT};
use crate::{Result, RiskboardError};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Column holding the patient age.
pub const AGE_COLUMN: &str = "Age";
/// Column holding the computed stroke risk percentage.
pub const RISK_COLUMN: &str = "Stroke Risk (%)";
/// Optional column holding the stored at-risk flag.
pub const AT_RISK_COLUMN: &str = "At Risk (Binary)";

/// Header positions resolved once per file.
struct ColumnLayout {
    age: usize,
    risk: usize,
    at_risk: Option<usize>,
    symptoms: [usize; SYMPTOM_COUNT],
}

impl ColumnLayout {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|header| header == name);
        let require =
            |name: &str| find(name).ok_or_else(|| RiskboardError::MissingColumn(name.to_string()));

        let mut symptoms = [0; SYMPTOM_COUNT];
        for symptom in SYMPTOM_CATALOG {
            symptoms[symptom.index()] = require(symptom.name())?;
        }

        Ok(Self {
            age: require(AGE_COLUMN)?,
            risk: require(RISK_COLUMN)?,
            at_risk: find(AT_RISK_COLUMN),
            symptoms,
        })
    }
}

/// Load patient records from CSV data with a header row.
///
/// Extra columns are ignored. Row numbers in errors are 1-based and count
/// data rows only.
pub fn load_records<R: Read>(reader: R) -> Result<Vec<PatientRecord>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?;
    if headers.is_empty() {
        debug!("Dataset has no header row, nothing to load");
        return Ok(Vec::new());
    }
    let layout = ColumnLayout::from_headers(headers)?;

    let mut records = Vec::new();
    for (i, row) in csv_reader.records().enumerate() {
        let row = row?;
        records.push(parse_row(&row, i + 1, &layout)?);
    }

    debug!("Loaded {} patient records", records.len());
    Ok(records)
}

/// Load patient records from a CSV file.
pub fn load_records_from_path(path: &Path) -> Result<Vec<PatientRecord>> {
    info!("Loading dataset from {}", path.display());
    let file = File::open(path)?;
    load_records(file)
}

fn parse_row(
    row: &StringRecord,
    row_number: usize,
    layout: &ColumnLayout,
) -> Result<PatientRecord> {
    let malformed = |column: &str, reason: String| RiskboardError::MalformedRecord {
        row: row_number,
        column: column.to_string(),
        reason,
    };
    let field = |index: usize, column: &str| match row.get(index) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(malformed(column, "missing value".to_string())),
    };

    let age = parse_age(field(layout.age, AGE_COLUMN)?).map_err(|e| malformed(AGE_COLUMN, e))?;
    let risk_raw = field(layout.risk, RISK_COLUMN)?;
    let risk: f64 = risk_raw
        .parse()
        .map_err(|_| malformed(RISK_COLUMN, format!("'{}' is not a number", risk_raw)))?;

    let mut symptoms = SymptomSet::new();
    for symptom in SYMPTOM_CATALOG {
        let raw = field(layout.symptoms[symptom.index()], symptom.name())?;
        let present = parse_flag(raw).map_err(|e| malformed(symptom.name(), e))?;
        symptoms.set(symptom, present);
    }

    let record = PatientRecord::new(age, risk, symptoms).map_err(|e| match e {
        RiskboardError::InvalidRecord(reason) => malformed(RISK_COLUMN, reason),
        other => other,
    })?;

    match layout.at_risk {
        Some(index) => {
            let flag = parse_flag(field(index, AT_RISK_COLUMN)?)
                .map_err(|e| malformed(AT_RISK_COLUMN, e))?;
            Ok(record.with_at_risk_binary(flag))
        }
        None => Ok(record),
    }
}

/// Accepts `0`/`1` (also `0.0`/`1.0`), `true`/`false` and `yes`/`no`.
fn parse_flag(raw: &str) -> std::result::Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => return Ok(true),
        "0" | "false" | "no" => return Ok(false),
        _ => {}
    }

    match raw.parse::<f64>() {
        Ok(v) if v == 1.0 => Ok(true),
        Ok(v) if v == 0.0 => Ok(false),
        _ => Err(format!("'{}' is not a boolean flag", raw)),
    }
}

/// Non-negative integer; integral floats such as `63.0` are accepted.
fn parse_age(raw: &str) -> std::result::Result<u32, String> {
    if let Ok(age) = raw.parse::<u32>() {
        return Ok(age);
    }

    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= f64::from(u32::MAX) => {
            Ok(v as u32)
        }
        _ => Err(format!("'{}' is not a non-negative integer age", raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Symptom;
    use std::io::Write;

    fn header(with_at_risk: bool) -> String {
        let mut columns: Vec<&str> = SYMPTOM_CATALOG.iter().map(|s| s.name()).collect();
        columns.push(AGE_COLUMN);
        columns.push(RISK_COLUMN);
        if with_at_risk {
            columns.push(AT_RISK_COLUMN);
        }
        columns.join(",")
    }

    fn row(flags: &[Symptom], age: &str, risk: &str, at_risk: Option<&str>) -> String {
        let mut fields: Vec<String> = SYMPTOM_CATALOG
            .iter()
            .map(|s| if flags.contains(s) { "1" } else { "0" }.to_string())
            .collect();
        fields.push(age.to_string());
        fields.push(risk.to_string());
        if let Some(flag) = at_risk {
            fields.push(flag.to_string());
        }
        fields.join(",")
    }

    #[test]
    fn test_load_valid_rows() {
        let data = format!(
            "{}\n{}\n{}\n",
            header(true),
            row(&[Symptom::HighBloodPressure], "45", "75.5", Some("1")),
            row(&[], "35.0", "25", Some("0")),
        );

        let records = load_records(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].age(), 45);
        assert_eq!(records[0].risk_percent(), 75.5);
        assert!(records[0].has(Symptom::HighBloodPressure));
        assert!(!records[0].has(Symptom::ChestPain));
        assert_eq!(records[0].at_risk_binary(), Some(true));
        assert_eq!(records[1].age(), 35);
        assert_eq!(records[1].symptoms().count(), 0);
    }

    #[test]
    fn test_header_only_is_empty() {
        let data = format!("{}\n", header(false));
        let records = load_records(data.as_bytes()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_empty_source_is_empty() {
        let records = load_records("".as_bytes()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_missing_column_fails() {
        let data = "Age,Stroke Risk (%)\n40,20\n";
        let err = load_records(data.as_bytes()).unwrap_err();
        assert!(matches!(err, RiskboardError::MissingColumn(ref c) if c == "Chest Pain"));
    }

    #[test]
    fn test_bad_flag_fails_whole_load() {
        let mut bad = row(&[], "50", "30", None);
        bad = bad.replacen('0', "maybe", 1);
        let data = format!("{}\n{}\n{}\n", header(false), row(&[], "40", "20", None), bad);

        let err = load_records(data.as_bytes()).unwrap_err();
        match err {
            RiskboardError::MalformedRecord { row, column, .. } => {
                assert_eq!(row, 2);
                assert_eq!(column, "Chest Pain");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_at_risk_flag_fails() {
        for flag in ["maybe", ""] {
            let data = format!("{}\n{}\n", header(true), row(&[], "40", "20", Some(flag)));
            let err = load_records(data.as_bytes()).unwrap_err();
            match err {
                RiskboardError::MalformedRecord { row, column, .. } => {
                    assert_eq!(row, 1);
                    assert_eq!(column, AT_RISK_COLUMN);
                }
                other => panic!("unexpected error for '{flag}': {other}"),
            }
        }
    }

    #[test]
    fn test_out_of_range_risk_fails() {
        let data = format!("{}\n{}\n", header(false), row(&[], "40", "120", None));
        let err = load_records(data.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            RiskboardError::MalformedRecord { ref column, .. } if column == RISK_COLUMN
        ));
    }

    #[test]
    fn test_short_row_reports_missing_value() {
        let data = format!("{}\n1,0,1\n", header(false));
        let err = load_records(data.as_bytes()).unwrap_err();
        assert!(matches!(err, RiskboardError::MalformedRecord { row: 1, .. }));
    }

    #[test]
    fn test_parse_flag_and_age() {
        assert_eq!(parse_flag("TRUE"), Ok(true));
        assert_eq!(parse_flag("no"), Ok(false));
        assert_eq!(parse_flag("1.0"), Ok(true));
        assert!(parse_flag("0.5").is_err());

        assert_eq!(parse_age("63"), Ok(63));
        assert_eq!(parse_age("63.0"), Ok(63));
        assert!(parse_age("63.5").is_err());
        assert!(parse_age("-4").is_err());
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", header(false)).unwrap();
        writeln!(file, "{}", row(&[Symptom::Dizziness], "61", "48.2", None)).unwrap();

        let records = load_records_from_path(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].has(Symptom::Dizziness));
        assert_eq!(records[0].at_risk_binary(), None);
    }
}
