//! JSON input loading.
//!
//! Reads result records exported from the results API and turns them into
//! the samples the engine works on.

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::correlation::NumericRecord;
use crate::error::InputError;

/// A result record as loaded, before any field is interpreted.
pub type RawRecord = Map<String, Value>;

/// Load a record list from a JSON file.
///
/// The file holds either an array of objects or an object with a `records`
/// array.
pub fn load_records(path: &Path) -> Result<Vec<RawRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read records file: {}", path.display()))?;

    parse_records_str(&content, path)
}

/// Parse a record list from a JSON string (useful for testing).
pub fn parse_records_str(content: &str, source_path: &Path) -> Result<Vec<RawRecord>> {
    let document: Value = serde_json::from_str(content)
        .with_context(|| format!("failed to parse JSON: {}", source_path.display()))?;

    let items = match document {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("records") {
            Some(Value::Array(items)) => items,
            _ => return Err(InputError::NotARecordList.into()),
        },
        _ => return Err(InputError::NotARecordList.into()),
    };

    let records = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(map),
            _ => Err(InputError::NotAnObject { index }),
        })
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("invalid record list: {}", source_path.display()))?;

    tracing::debug!(records = records.len(), path = %source_path.display(), "records loaded");
    Ok(records)
}

/// Read a value as a number. Numeric strings are accepted since the API
/// serializes decimal columns as text.
pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => text_as_f64(s),
        _ => None,
    }
}

pub(crate) fn text_as_f64(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Extract the numeric values of `field`, in record order.
///
/// Records where the field is absent, null or non-numeric are skipped.
pub fn numeric_field(records: &[RawRecord], field: &str) -> Result<Vec<f64>, InputError> {
    let values: Vec<f64> = records
        .iter()
        .filter_map(|r| r.get(field).and_then(value_as_f64))
        .collect();

    let skipped = records.len() - values.len();
    if skipped > 0 {
        tracing::warn!(field, skipped, "skipped records without a numeric value");
    }
    if values.is_empty() {
        return Err(InputError::NoNumericValues {
            field: field.to_string(),
        });
    }
    Ok(values)
}

/// Project records onto the named variables for correlation.
///
/// Every variable must appear in at least one record. Non-numeric values are
/// left out of the projected record.
pub fn numeric_records<S: AsRef<str>>(
    records: &[RawRecord],
    variables: &[S],
) -> Result<Vec<NumericRecord>, InputError> {
    for var in variables {
        let var = var.as_ref();
        if !records.iter().any(|r| r.contains_key(var)) {
            return Err(InputError::UnknownVariable(var.to_string()));
        }
    }

    Ok(records
        .iter()
        .map(|r| {
            variables
                .iter()
                .filter_map(|var| {
                    let var = var.as_ref();
                    r.get(var)
                        .and_then(value_as_f64)
                        .map(|v| (var.to_string(), v))
                })
                .collect()
        })
        .collect())
}

/// Load any JSON document, such as a dashboard summary.
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read JSON file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse JSON: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::model::CollegeDashboard;

    const RECORDS: &str = r#"[
        {"student_id": "S1", "percentage": 72.5, "cgpa": 7.8},
        {"student_id": "S2", "percentage": "64.0", "cgpa": null},
        {"student_id": "S3", "cgpa": 9.1},
        {"student_id": "S4", "percentage": 88, "cgpa": 8.6}
    ]"#;

    fn parse(content: &str) -> Result<Vec<RawRecord>> {
        parse_records_str(content, &PathBuf::from("records.json"))
    }

    #[test]
    fn parse_array() {
        let records = parse(RECORDS).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[2]["student_id"], "S3");
    }

    #[test]
    fn parse_wrapped_records() {
        let records = parse(r#"{"records": [{"percentage": 50}], "total": 1}"#).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn reject_non_list() {
        let err = parse(r#"{"rows": []}"#).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InputError>(),
            Some(InputError::NotARecordList)
        ));
        assert!(parse("42").is_err());
    }

    #[test]
    fn reject_non_object_element() {
        let err = parse(r#"[{"percentage": 50}, 7]"#).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InputError>(),
            Some(InputError::NotAnObject { index: 1 })
        ));
    }

    #[test]
    fn parse_malformed_json() {
        let err = parse("[{").unwrap_err();
        assert!(err.to_string().contains("failed to parse JSON"));
    }

    #[test]
    fn numeric_field_skips_gaps() {
        let records = parse(RECORDS).unwrap();
        let values = numeric_field(&records, "percentage").unwrap();
        assert_eq!(values, vec![72.5, 64.0, 88.0]);
    }

    #[test]
    fn numeric_field_without_values() {
        let records = parse(RECORDS).unwrap();
        let err = numeric_field(&records, "attendance").unwrap_err();
        assert!(err.is_empty_input());
    }

    #[test]
    fn numeric_records_project_variables() {
        let records = parse(RECORDS).unwrap();
        let projected = numeric_records(&records, &["percentage", "cgpa"]).unwrap();
        assert_eq!(projected.len(), 4);
        assert_eq!(projected[0]["cgpa"], 7.8);
        assert!(!projected[1].contains_key("cgpa"));
        assert!(!projected[2].contains_key("percentage"));
    }

    #[test]
    fn numeric_records_unknown_variable() {
        let records = parse(RECORDS).unwrap();
        let err = numeric_records(&records, &["percentage", "attendance"]).unwrap_err();
        assert!(matches!(err, InputError::UnknownVariable(v) if v == "attendance"));
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");
        std::fs::write(&path, RECORDS).unwrap();
        assert_eq!(load_records(&path).unwrap().len(), 4);

        let missing = dir.path().join("missing.json");
        let err = load_records(&missing).unwrap_err();
        assert!(err.to_string().contains("failed to read records file"));
    }

    #[test]
    fn load_dashboard_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("college.json");
        std::fs::write(
            &path,
            r#"{"summary": {"pass_percentage": 65.0, "total_students_appeared": 120}}"#,
        )
        .unwrap();
        let dashboard: CollegeDashboard = load_json_file(&path).unwrap();
        assert_eq!(dashboard.summary.unwrap().pass_percentage, Some(65.0));
        assert!(dashboard.trends.is_empty());
    }
}
