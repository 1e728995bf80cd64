//! Untyped upstream payloads, tagged by metric

use crate::error::{InputName, MalformedInput};
use crate::metric::MetricKey;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// The five raw payloads of one full fetch
///
/// Series are keyed by [`MetricKey`] so the join never depends on the order in
/// which fetches complete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPayloads {
    /// Assignment records payload
    pub assignments: Value,
    /// Metric series payloads
    #[serde(default)]
    pub series: BTreeMap<MetricKey, Value>,
}

impl RawPayloads {
    /// Create from an assignment payload with no series yet
    #[inline]
    #[must_use]
    pub fn new(assignments: Value) -> Self {
        Self {
            assignments,
            series: BTreeMap::new(),
        }
    }

    /// Attach one metric series payload
    #[inline]
    #[must_use]
    pub fn with_series(mut self, key: MetricKey, payload: Value) -> Self {
        self.series.insert(key, payload);
        self
    }

    /// Validate and borrow the assignment rows
    ///
    /// # Errors
    /// `MalformedInput` if the payload is not an array of objects.
    pub fn assignment_rows(&self) -> Result<Vec<&Map<String, Value>>, MalformedInput> {
        object_rows(InputName::Assignments, &self.assignments)
    }

    /// Validate and borrow one series' rows
    ///
    /// # Errors
    /// `MalformedInput` if the series is missing or not an array of objects.
    pub fn series_rows(&self, key: MetricKey) -> Result<Vec<&Map<String, Value>>, MalformedInput> {
        let input = InputName::Series(key);
        let payload = self
            .series
            .get(&key)
            .ok_or_else(|| MalformedInput::new(input, "payload missing"))?;
        object_rows(input, payload)
    }
}

fn object_rows(
    input: InputName,
    payload: &Value,
) -> Result<Vec<&Map<String, Value>>, MalformedInput> {
    let items = payload.as_array().ok_or_else(|| {
        MalformedInput::new(input, format!("expected array, got {}", kind(payload)))
    })?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_object().ok_or_else(|| {
                let reason = format!("element {i} is {}, expected object", kind(item));
                MalformedInput::new(input, reason)
            })
        })
        .collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
