//! Input validation errors

use crate::metric::MetricKey;
use std::fmt;

/// Identity of one of the five upstream payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputName {
    /// Owner/division/CIO assignment records
    Assignments,
    /// One metric series
    Series(MetricKey),
}

impl fmt::Display for InputName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assignments => f.write_str("assignments"),
            Self::Series(key) => write!(f, "series:{}", key.as_str()),
        }
    }
}

/// An upstream payload did not have the expected array-of-objects shape
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed input `{input}`: {reason}")]
pub struct MalformedInput {
    /// Which payload failed validation
    pub input: InputName,
    /// What was wrong with it
    pub reason: String,
}

impl MalformedInput {
    /// Create new malformed-input error
    #[inline]
    pub fn new(input: InputName, reason: impl Into<String>) -> Self {
        Self {
            input,
            reason: reason.into(),
        }
    }
}
