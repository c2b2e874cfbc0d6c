//! Data models for the risk engine.
//!
//! This module contains the record model (symptom catalog, patient rows)
//! and every derived structure the analysis layer hands to consumers.

use crate::analysis::AnalyticsFilter;
use crate::RiskboardError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Risk percentage at or above which a record is classified as high risk.
pub const DEFAULT_RISK_THRESHOLD: f64 = 50.0;

/// Number of tracked symptoms.
pub const SYMPTOM_COUNT: usize = 15;

/// A tracked binary clinical indicator.
///
/// Discriminants follow catalog order, so `symptom as usize` is the
/// symptom's row/column index in every matrix the engine produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Symptom {
    #[serde(rename = "Chest Pain")]
    ChestPain,
    #[serde(rename = "Shortness of Breath")]
    ShortnessOfBreath,
    #[serde(rename = "Irregular Heartbeat")]
    IrregularHeartbeat,
    #[serde(rename = "Fatigue & Weakness")]
    FatigueWeakness,
    #[serde(rename = "Dizziness")]
    Dizziness,
    #[serde(rename = "Swelling (Edema)")]
    SwellingEdema,
    #[serde(rename = "Pain in Neck/Jaw/Shoulder/Back")]
    PainNeckJawShoulderBack,
    #[serde(rename = "Excessive Sweating")]
    ExcessiveSweating,
    #[serde(rename = "Persistent Cough")]
    PersistentCough,
    #[serde(rename = "Nausea/Vomiting")]
    NauseaVomiting,
    #[serde(rename = "High Blood Pressure")]
    HighBloodPressure,
    #[serde(rename = "Chest Discomfort (Activity)")]
    ChestDiscomfortActivity,
    #[serde(rename = "Cold Hands/Feet")]
    ColdHandsFeet,
    #[serde(rename = "Snoring/Sleep Apnea")]
    SnoringSleepApnea,
    #[serde(rename = "Anxiety/Feeling of Doom")]
    AnxietyFeelingOfDoom,
}

/// The fixed, ordered symptom catalog shared by loading, analysis and reporting.
pub const SYMPTOM_CATALOG: [Symptom; SYMPTOM_COUNT] = [
    Symptom::ChestPain,
    Symptom::ShortnessOfBreath,
    Symptom::IrregularHeartbeat,
    Symptom::FatigueWeakness,
    Symptom::Dizziness,
    Symptom::SwellingEdema,
    Symptom::PainNeckJawShoulderBack,
    Symptom::ExcessiveSweating,
    Symptom::PersistentCough,
    Symptom::NauseaVomiting,
    Symptom::HighBloodPressure,
    Symptom::ChestDiscomfortActivity,
    Symptom::ColdHandsFeet,
    Symptom::SnoringSleepApnea,
    Symptom::AnxietyFeelingOfDoom,
];

impl Symptom {
    /// Display label, also used as the dataset column header.
    pub fn name(&self) -> &'static str {
        match self {
            Symptom::ChestPain => "Chest Pain",
            Symptom::ShortnessOfBreath => "Shortness of Breath",
            Symptom::IrregularHeartbeat => "Irregular Heartbeat",
            Symptom::FatigueWeakness => "Fatigue & Weakness",
            Symptom::Dizziness => "Dizziness",
            Symptom::SwellingEdema => "Swelling (Edema)",
            Symptom::PainNeckJawShoulderBack => "Pain in Neck/Jaw/Shoulder/Back",
            Symptom::ExcessiveSweating => "Excessive Sweating",
            Symptom::PersistentCough => "Persistent Cough",
            Symptom::NauseaVomiting => "Nausea/Vomiting",
            Symptom::HighBloodPressure => "High Blood Pressure",
            Symptom::ChestDiscomfortActivity => "Chest Discomfort (Activity)",
            Symptom::ColdHandsFeet => "Cold Hands/Feet",
            Symptom::SnoringSleepApnea => "Snoring/Sleep Apnea",
            Symptom::AnxietyFeelingOfDoom => "Anxiety/Feeling of Doom",
        }
    }

    /// Position in [`SYMPTOM_CATALOG`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Symptom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Symptom {
    type Err = RiskboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SYMPTOM_CATALOG
            .iter()
            .copied()
            .find(|symptom| symptom.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| RiskboardError::InvalidFilter(format!("unknown symptom '{}'", wanted)))
    }
}

/// Presence flags for every symptom in the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SymptomSet([bool; SYMPTOM_COUNT]);

impl SymptomSet {
    /// An empty set (every symptom absent).
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a symptom as present.
    pub fn insert(&mut self, symptom: Symptom) {
        self.0[symptom.index()] = true;
    }

    /// Sets the presence flag for a symptom.
    pub fn set(&mut self, symptom: Symptom, present: bool) {
        self.0[symptom.index()] = present;
    }

    pub fn contains(&self, symptom: Symptom) -> bool {
        self.0[symptom.index()]
    }

    /// Present symptoms, in catalog order.
    pub fn iter_present(&self) -> impl Iterator<Item = Symptom> + '_ {
        SYMPTOM_CATALOG
            .iter()
            .copied()
            .filter(move |symptom| self.contains(*symptom))
    }

    pub fn count(&self) -> usize {
        self.0.iter().filter(|present| **present).count()
    }
}

impl FromIterator<Symptom> for SymptomSet {
    fn from_iter<I: IntoIterator<Item = Symptom>>(iter: I) -> Self {
        let mut set = Self::new();
        for symptom in iter {
            set.insert(symptom);
        }
        set
    }
}

/// Risk category of a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskCategory {
    #[serde(rename = "High Risk")]
    HighRisk,
    #[serde(rename = "Low Risk")]
    LowRisk,
}

impl RiskCategory {
    /// High risk iff `risk_percent >= threshold`.
    pub fn classify(risk_percent: f64, threshold: f64) -> Self {
        if risk_percent >= threshold {
            RiskCategory::HighRisk
        } else {
            RiskCategory::LowRisk
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskCategory::HighRisk => write!(f, "High Risk"),
            RiskCategory::LowRisk => write!(f, "Low Risk"),
        }
    }
}

/// One validated patient row. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientRecord {
    age: u32,
    risk_percent: f64,
    symptoms: SymptomSet,
    at_risk_binary: Option<bool>,
}

impl PatientRecord {
    /// Creates a record, rejecting risk values outside `[0, 100]`.
    pub fn new(age: u32, risk_percent: f64, symptoms: SymptomSet) -> crate::Result<Self> {
        if !risk_percent.is_finite() || !(0.0..=100.0).contains(&risk_percent) {
            return Err(RiskboardError::InvalidRecord(format!(
                "risk percentage {} is outside [0, 100]",
                risk_percent
            )));
        }

        Ok(Self {
            age,
            risk_percent,
            symptoms,
            at_risk_binary: None,
        })
    }

    /// Attaches the stored at-risk flag carried by some datasets.
    pub fn with_at_risk_binary(mut self, at_risk: bool) -> Self {
        self.at_risk_binary = Some(at_risk);
        self
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn risk_percent(&self) -> f64 {
        self.risk_percent
    }

    pub fn symptoms(&self) -> &SymptomSet {
        &self.symptoms
    }

    pub fn has(&self, symptom: Symptom) -> bool {
        self.symptoms.contains(symptom)
    }

    /// The stored at-risk flag, if the source provided one.
    pub fn at_risk_binary(&self) -> Option<bool> {
        self.at_risk_binary
    }

    pub fn category(&self, threshold: f64) -> RiskCategory {
        RiskCategory::classify(self.risk_percent, threshold)
    }
}

/// Five-number summary plus mean of a numeric sample.
///
/// An empty sample has no summary; see [`crate::analysis::summarize`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
    pub sample_size: usize,
}

/// Correlation between two symptoms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationCell {
    pub source: Symptom,
    pub target: Symptom,
    pub value: f64,
}

/// One row of the matrix in the `{symptom, correlations[]}` shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationRow {
    pub symptom: Symptom,
    pub correlations: Vec<f64>,
}

/// Full symptom × symptom correlation table, row-major in catalog order.
///
/// Serialized as the flat cell list. Deserializing checks that every
/// `(source, target)` pair is present in catalog order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CorrelationCell>", into = "Vec<CorrelationCell>")]
pub struct CorrelationMatrix {
    cells: Vec<CorrelationCell>,
}

impl TryFrom<Vec<CorrelationCell>> for CorrelationMatrix {
    type Error = String;

    fn try_from(cells: Vec<CorrelationCell>) -> Result<Self, Self::Error> {
        if cells.len() != SYMPTOM_COUNT * SYMPTOM_COUNT {
            return Err(format!(
                "correlation matrix needs {} cells, got {}",
                SYMPTOM_COUNT * SYMPTOM_COUNT,
                cells.len()
            ));
        }

        for (i, cell) in cells.iter().enumerate() {
            let source = SYMPTOM_CATALOG[i / SYMPTOM_COUNT];
            let target = SYMPTOM_CATALOG[i % SYMPTOM_COUNT];
            if cell.source != source || cell.target != target {
                return Err(format!(
                    "cell {} is {} / {}, expected {} / {}",
                    i, cell.source, cell.target, source, target
                ));
            }
        }

        Ok(Self { cells })
    }
}

impl From<CorrelationMatrix> for Vec<CorrelationCell> {
    fn from(matrix: CorrelationMatrix) -> Self {
        matrix.cells
    }
}

impl CorrelationMatrix {
    /// Wraps a row-major cell list of exactly `SYMPTOM_COUNT²` cells.
    pub(crate) fn from_cells(cells: Vec<CorrelationCell>) -> Self {
        debug_assert_eq!(cells.len(), SYMPTOM_COUNT * SYMPTOM_COUNT);
        Self { cells }
    }

    pub fn cells(&self) -> &[CorrelationCell] {
        &self.cells
    }

    pub fn get(&self, source: Symptom, target: Symptom) -> f64 {
        self.cells[source.index() * SYMPTOM_COUNT + target.index()].value
    }

    pub fn rows(&self) -> Vec<CorrelationRow> {
        self.cells
            .chunks(SYMPTOM_COUNT)
            .zip(SYMPTOM_CATALOG)
            .map(|(row, symptom)| CorrelationRow {
                symptom,
                correlations: row.iter().map(|cell| cell.value).collect(),
            })
            .collect()
    }

    /// Off-diagonal pairs (each unordered pair once) by descending |r|.
    pub fn strongest_pairs(&self, n: usize) -> Vec<CorrelationCell> {
        let mut pairs: Vec<CorrelationCell> = self
            .cells
            .iter()
            .filter(|cell| cell.source < cell.target)
            .copied()
            .collect();

        pairs.sort_by(|a, b| b.value.abs().total_cmp(&a.value.abs()));
        pairs.truncate(n);
        pairs
    }
}

/// Correlation between one symptom and the risk percentage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskCorrelation {
    pub symptom: Symptom,
    pub value: f64,
}

/// Mean risk for one exact age.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub age: u32,
    pub mean_risk: f64,
    pub count: usize,
}

/// Per-record scatter point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeRiskPoint {
    pub age: u32,
    pub risk: f64,
    pub category: RiskCategory,
}

/// Share of the filtered population that has the symptom and is high/low risk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomRiskShare {
    pub symptom: Symptom,
    pub high_risk: f64,
    pub low_risk: f64,
}

/// Headline numbers for the filtered population.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    /// `None` when no patient falls in the filter.
    pub average_risk: Option<f64>,
    pub high_risk_cases: usize,
    /// Distinct symptoms present in at least one filtered record.
    pub risk_factors: usize,
    pub total_patients: usize,
}

impl SummaryStats {
    pub fn low_risk_cases(&self) -> usize {
        self.total_patients - self.high_risk_cases
    }
}

/// Risk distribution among patients presenting one symptom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SymptomBoxPlot {
    pub symptom: Symptom,
    pub summary: Option<DistributionSummary>,
}

/// Risk distribution with vs without the selected symptom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparativeBoxPlot {
    pub symptom: Symptom,
    pub with_symptom: Option<DistributionSummary>,
    pub without_symptom: Option<DistributionSummary>,
}

impl ComparativeBoxPlot {
    /// Both groups have data; otherwise consumers report "no data available".
    pub fn is_complete(&self) -> bool {
        self.with_symptom.is_some() && self.without_symptom.is_some()
    }
}

/// Everything derived from one filtered view of the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsPayload {
    pub filter: AnalyticsFilter,
    pub risk_threshold: f64,
    pub age_risk_series: Vec<AgeRiskPoint>,
    pub age_trend: Vec<TrendPoint>,
    pub symptom_distribution: Vec<SymptomRiskShare>,
    pub summary_stats: SummaryStats,
    pub correlation_matrix: CorrelationMatrix,
    pub risk_correlations: Vec<RiskCorrelation>,
    pub box_plot_data: Vec<SymptomBoxPlot>,
    pub comparative_box_plot: ComparativeBoxPlot,
}
