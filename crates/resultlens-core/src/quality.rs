//! Completeness, accuracy and consistency scoring over result records.
//!
//! Records are read through the [`FieldSource`] trait so the scorer works on
//! loosely shaped JSON objects as well as the typed
//! [`LearnerResult`](crate::model::LearnerResult).

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::input::text_as_f64;
use crate::model::LearnerResult;
use crate::statistics::{mean, population_std_dev};

/// Missing share above which a field is a high-severity issue.
const HIGH_SEVERITY_PCT: f64 = 20.0;
/// Missing share above which a field is a medium-severity issue.
const MEDIUM_SEVERITY_PCT: f64 = 5.0;
/// Standard deviations from the mean beyond which a value is an outlier.
const OUTLIER_SIGMA: f64 = 3.0;

/// A field as seen by the scorer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Absent,
    Null,
    Bool(bool),
    Number(f64),
    Text(&'a str),
}

impl FieldValue<'_> {
    /// Absent, null, `false`, empty text and `NaN` are missing. `0` is a
    /// real value and is never missing.
    pub fn is_missing(&self) -> bool {
        match self {
            FieldValue::Absent | FieldValue::Null => true,
            FieldValue::Bool(b) => !b,
            FieldValue::Number(n) => n.is_nan(),
            FieldValue::Text(s) => s.is_empty(),
        }
    }

    /// Finite numbers, and text that parses as one the way the loader
    /// reads it.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) if n.is_finite() => Some(*n),
            FieldValue::Text(s) => text_as_f64(s),
            _ => None,
        }
    }

    /// Key used to detect duplicate identities. Values of different kinds
    /// never collide; every record without an identity shares `None`.
    fn identity_key(&self) -> Option<String> {
        match self {
            FieldValue::Absent | FieldValue::Null => None,
            FieldValue::Bool(b) => Some(format!("b:{b}")),
            FieldValue::Number(n) => Some(format!("n:{n}")),
            FieldValue::Text(s) => Some(format!("s:{s}")),
        }
    }
}

/// Anything the scorer can read named fields from.
pub trait FieldSource {
    fn field(&self, key: &str) -> FieldValue<'_>;
}

impl FieldSource for Map<String, Value> {
    fn field(&self, key: &str) -> FieldValue<'_> {
        match self.get(key) {
            None => FieldValue::Absent,
            Some(Value::Null) => FieldValue::Null,
            Some(Value::Bool(b)) => FieldValue::Bool(*b),
            Some(Value::Number(n)) => n.as_f64().map_or(FieldValue::Null, FieldValue::Number),
            Some(Value::String(s)) => FieldValue::Text(s),
            // Arrays and objects are present and truthy; expose them as
            // non-empty text so they count as filled in.
            Some(Value::Array(_)) | Some(Value::Object(_)) => FieldValue::Text("[structured]"),
        }
    }
}

impl FieldSource for Value {
    fn field(&self, key: &str) -> FieldValue<'_> {
        match self {
            Value::Object(map) => map.field(key),
            _ => FieldValue::Absent,
        }
    }
}

impl FieldSource for LearnerResult {
    fn field(&self, key: &str) -> FieldValue<'_> {
        fn text(v: &Option<String>) -> FieldValue<'_> {
            v.as_deref().map_or(FieldValue::Absent, FieldValue::Text)
        }
        fn number(v: Option<f64>) -> FieldValue<'static> {
            v.map_or(FieldValue::Absent, FieldValue::Number)
        }
        match key {
            "student_id" => text(&self.student_id),
            "register_number" => text(&self.register_number),
            "student_name" => text(&self.student_name),
            "program_id" => text(&self.program_id),
            "program_name" => text(&self.program_name),
            "semester" => number(self.semester.map(f64::from)),
            "cgpa" => number(self.cgpa),
            "percentage" => number(self.percentage),
            "gender" => text(&self.gender),
            _ => FieldValue::Absent,
        }
    }
}

/// A record field and the label it is reported under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCheck {
    pub key: String,
    pub label: String,
}

impl FieldCheck {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// A numeric field whose values must fall inside `[min, max]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeRule {
    pub key: String,
    pub min: f64,
    pub max: f64,
}

/// What the scorer inspects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityChecks {
    /// Field that identifies a learner; repeats lower consistency.
    pub identity_field: String,
    /// Fields checked for missing values.
    pub fields: Vec<FieldCheck>,
    /// Numeric field scanned for 3σ outliers.
    pub outlier_field: FieldCheck,
    /// The bounded field behind the accuracy score.
    pub accuracy: RangeRule,
}

impl Default for QualityChecks {
    fn default() -> Self {
        Self {
            identity_field: "student_id".into(),
            fields: vec![
                FieldCheck::new("student_id", "Student ID"),
                FieldCheck::new("percentage", "Percentage"),
                FieldCheck::new("cgpa", "CGPA"),
                FieldCheck::new("program_id", "Program"),
                FieldCheck::new("semester", "Semester"),
                FieldCheck::new("gender", "Gender"),
            ],
            outlier_field: FieldCheck::new("percentage", "Percentage"),
            accuracy: RangeRule {
                key: "percentage".into(),
                min: 0.0,
                max: 100.0,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    fn from_missing_percentage(pct: f64) -> Self {
        if pct > HIGH_SEVERITY_PCT {
            Severity::High
        } else if pct > MEDIUM_SEVERITY_PCT {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingValue {
    /// Display label of the field.
    pub field: String,
    pub count: usize,
    pub percentage: f64,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierReport {
    pub field: String,
    pub count: usize,
    pub description: String,
}

/// Data-quality scores for a record batch. Scores are integers in `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQualityMetrics {
    pub total_records: usize,
    /// Fields with at least one missing value, most incomplete first.
    pub missing_values: Vec<MissingValue>,
    pub outliers: Vec<OutlierReport>,
    pub data_completeness: u8,
    pub data_accuracy: u8,
    pub data_consistency: u8,
    pub last_updated: NaiveDate,
}

/// Traffic-light grade for a quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityGrade {
    Excellent,
    Fair,
    Poor,
}

impl QualityGrade {
    pub fn from_score(score: u8) -> Self {
        if score >= 90 {
            QualityGrade::Excellent
        } else if score >= 70 {
            QualityGrade::Fair
        } else {
            QualityGrade::Poor
        }
    }
}

impl DataQualityMetrics {
    /// Rounded mean of completeness, accuracy and consistency.
    pub fn overall_score(&self) -> u8 {
        let total = u32::from(self.data_completeness)
            + u32::from(self.data_accuracy)
            + u32::from(self.data_consistency);
        round_score(f64::from(total) / 3.0)
    }

    pub fn grade(&self) -> QualityGrade {
        QualityGrade::from_score(self.overall_score())
    }

    /// Missing-value entries with high severity.
    pub fn critical_issues(&self) -> impl Iterator<Item = &MissingValue> {
        self.missing_values
            .iter()
            .filter(|m| m.severity == Severity::High)
    }
}

/// Score `records` as of now.
pub fn score_data_quality<R: FieldSource>(records: &[R], checks: &QualityChecks) -> DataQualityMetrics {
    score_data_quality_at(records, checks, Utc::now())
}

/// Score `records`, stamping the result with `as_of`.
///
/// An empty batch scores 100 on every measure with no issues.
pub fn score_data_quality_at<R: FieldSource>(
    records: &[R],
    checks: &QualityChecks,
    as_of: DateTime<Utc>,
) -> DataQualityMetrics {
    let total_records = records.len();
    let last_updated = as_of.date_naive();
    if total_records == 0 {
        return DataQualityMetrics {
            total_records: 0,
            missing_values: Vec::new(),
            outliers: Vec::new(),
            data_completeness: 100,
            data_accuracy: 100,
            data_consistency: 100,
            last_updated,
        };
    }
    let total = total_records as f64;

    let mut missing_values: Vec<MissingValue> = checks
        .fields
        .iter()
        .filter_map(|check| {
            let count = records
                .iter()
                .filter(|r| r.field(&check.key).is_missing())
                .count();
            if count == 0 {
                return None;
            }
            let percentage = count as f64 / total * 100.0;
            Some(MissingValue {
                field: check.label.clone(),
                count,
                percentage,
                severity: Severity::from_missing_percentage(percentage),
            })
        })
        .collect();
    missing_values.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));

    let outliers = detect_outliers(records, &checks.outlier_field)
        .into_iter()
        .collect();

    let total_missing: usize = missing_values.iter().map(|m| m.count).sum();
    let total_checked = (checks.fields.len() * total_records) as f64;
    let data_completeness = if total_checked == 0.0 {
        100
    } else {
        round_score((total_checked - total_missing as f64) / total_checked * 100.0)
    };

    let in_range = records
        .iter()
        .filter_map(|r| r.field(&checks.accuracy.key).as_number())
        .filter(|v| (checks.accuracy.min..=checks.accuracy.max).contains(v))
        .count();
    let data_accuracy = round_score(in_range as f64 / total * 100.0);

    let unique_ids: HashSet<Option<String>> = records
        .iter()
        .map(|r| r.field(&checks.identity_field).identity_key())
        .collect();
    let data_consistency = round_score(unique_ids.len() as f64 / total * 100.0);

    tracing::debug!(
        records = total_records,
        missing_fields = missing_values.len(),
        data_completeness,
        data_accuracy,
        data_consistency,
        "data quality scored"
    );

    DataQualityMetrics {
        total_records,
        missing_values,
        outliers,
        data_completeness,
        data_accuracy,
        data_consistency,
        last_updated,
    }
}

fn detect_outliers<R: FieldSource>(records: &[R], field: &FieldCheck) -> Option<OutlierReport> {
    let values: Vec<f64> = records
        .iter()
        .filter_map(|r| r.field(&field.key).as_number())
        .collect();
    if values.is_empty() {
        return None;
    }
    let mean = mean(&values);
    let std_dev = population_std_dev(&values, mean);
    let count = values
        .iter()
        .filter(|v| (*v - mean).abs() > OUTLIER_SIGMA * std_dev)
        .count();
    (count > 0).then(|| OutlierReport {
        field: field.label.clone(),
        count,
        description: format!(
            "Values more than 3 standard deviations from mean ({mean:.1})"
        ),
    })
}

/// Round half up and clamp into a 0–100 score.
fn round_score(value: f64) -> u8 {
    (value + 0.5).floor().clamp(0.0, 100.0) as u8
}
