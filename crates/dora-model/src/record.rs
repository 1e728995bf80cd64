//! Defensively parsed upstream records
//!
//! Upstream rows are treated as untrusted wire data. Missing or blank text
//! fields become [`UNKNOWN`]; values that are not numbers (or numeric
//! strings) become `0.0`. A single bad row never fails a whole payload.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Sentinel for missing text fields
pub const UNKNOWN: &str = "unknown";

const DIVISION_FIELDS: &[&str] = &["Division", "division"];
const CIO_FIELDS: &[&str] = &["CIO", "cio", "Cio"];
const OWNER_FIELDS: &[&str] = &["Portfolio_Owner", "owner", "Owner", "Data_Owner"];
const PERIOD_FIELDS: &[&str] = &["Period", "period"];
const VALUE_FIELDS: &[&str] = &["Value", "value"];

/// One owner's place in the division/CIO hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    /// Division name
    pub division: String,
    /// CIO name
    pub cio: String,
    /// Portfolio owner name
    pub owner: String,
}

impl AssignmentRecord {
    /// Create new assignment record
    #[inline]
    pub fn new(
        division: impl Into<String>,
        cio: impl Into<String>,
        owner: impl Into<String>,
    ) -> Self {
        Self {
            division: division.into(),
            cio: cio.into(),
            owner: owner.into(),
        }
    }

    /// Read an assignment row, substituting sentinels for missing fields
    #[must_use]
    pub fn from_row(row: &Map<String, Value>) -> Self {
        Self {
            division: text_field(row, DIVISION_FIELDS),
            cio: text_field(row, CIO_FIELDS),
            owner: text_field(row, OWNER_FIELDS),
        }
    }
}

/// One (owner, series, period) observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    /// Division name (often absent upstream)
    pub division: String,
    /// CIO name
    pub cio: String,
    /// Portfolio owner name
    pub owner: String,
    /// Opaque period label
    pub period: String,
    /// Observed value
    pub value: f64,
}

impl MetricRecord {
    /// Create new metric record
    #[inline]
    pub fn new(
        cio: impl Into<String>,
        owner: impl Into<String>,
        period: impl Into<String>,
        value: f64,
    ) -> Self {
        Self {
            division: UNKNOWN.to_string(),
            cio: cio.into(),
            owner: owner.into(),
            period: period.into(),
            value,
        }
    }

    /// Read a metric row, substituting sentinels for missing fields
    #[must_use]
    pub fn from_row(row: &Map<String, Value>) -> Self {
        Self {
            division: text_field(row, DIVISION_FIELDS),
            cio: text_field(row, CIO_FIELDS),
            owner: text_field(row, OWNER_FIELDS),
            period: text_field(row, PERIOD_FIELDS),
            value: VALUE_FIELDS
                .iter()
                .find_map(|name| row.get(*name))
                .map_or(0.0, coerce_value),
        }
    }
}

/// Coerce a JSON value into a finite number
///
/// Numbers pass through, numeric strings are parsed, everything else
/// (including NaN and infinities) is `0.0`.
#[must_use]
pub fn coerce_value(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(v) if v.is_finite() => v,
        _ => {
            if !value.is_null() {
                tracing::trace!(?value, "non-numeric metric value coerced to 0");
            }
            0.0
        }
    }
}

fn text_field(row: &Map<String, Value>, names: &[&str]) -> String {
    let raw = names.iter().find_map(|name| row.get(*name));
    match raw {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn metric_row_reads_wire_names() {
        let rec = MetricRecord::from_row(&row(json!({
            "CIO": "A",
            "Portfolio_Owner": "X",
            "Period": "2024-01",
            "Value": "3"
        })));
        assert_eq!(rec.cio, "A");
        assert_eq!(rec.owner, "X");
        assert_eq!(rec.period, "2024-01");
        assert_eq!(rec.value, 3.0);
        assert_eq!(rec.division, UNKNOWN);
    }

    #[test]
    fn metric_row_reads_lowercase_aliases() {
        let rec = MetricRecord::from_row(&row(json!({
            "division": "RFT",
            "cio": "A",
            "owner": "X",
            "period": "2024-02",
            "value": 5.5
        })));
        assert_eq!(rec.division, "RFT");
        assert_eq!(rec.value, 5.5);
    }

    #[test]
    fn missing_fields_become_sentinels() {
        let rec = MetricRecord::from_row(&row(json!({ "Value": 1 })));
        assert_eq!(rec.cio, UNKNOWN);
        assert_eq!(rec.owner, UNKNOWN);
        assert_eq!(rec.period, UNKNOWN);

        let rec = AssignmentRecord::from_row(&row(json!({ "CIO": "  ", "Portfolio_Owner": null })));
        assert_eq!(rec, AssignmentRecord::new(UNKNOWN, UNKNOWN, UNKNOWN));
    }

    #[test]
    fn coerce_value_never_fails() {
        assert_eq!(coerce_value(&json!(4)), 4.0);
        assert_eq!(coerce_value(&json!(" 2.25 ")), 2.25);
        assert_eq!(coerce_value(&json!("n/a")), 0.0);
        assert_eq!(coerce_value(&json!("inf")), 0.0);
        assert_eq!(coerce_value(&json!(true)), 0.0);
        assert_eq!(coerce_value(&Value::Null), 0.0);
        assert_eq!(coerce_value(&json!([1])), 0.0);
    }
}
