//! Error types for the dashboard controller
//!
//! Provides the taxonomy surfaced to the UI:
//! - Malformed upstream payloads
//! - Fetch failures and timeouts
//! - Configuration problems
//! - Invalid selections
//!
//! An empty result is not an error; it is reported through
//! [`Phase::Empty`](crate::state::Phase::Empty).

use dora_model::MalformedInput;
use dora_source::{Endpoint, SourceError};
use std::time::Duration;

/// Main dashboard error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DashboardError {
    /// An upstream payload was not an array of objects
    #[error(transparent)]
    MalformedInput(#[from] MalformedInput),

    /// A request failed; the whole fetch was abandoned
    #[error("fetch failed for `{endpoint}`: {reason}")]
    FetchFailure {
        /// Endpoint whose request failed
        endpoint: Endpoint,
        /// Failure detail
        reason: String,
    },

    /// The fetch did not complete within the configured bound
    #[error("fetch timed out after {}s", .after.as_secs_f64())]
    FetchTimeout {
        /// The bound that was exceeded
        after: Duration,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Selection does not exist in the current snapshot
    #[error("selection error: {0}")]
    Selection(#[from] SelectionError),
}

impl DashboardError {
    /// Message for the UI error banner
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::MalformedInput(e) => {
                format!("The {} data could not be read: {}", e.input, e.reason)
            }
            Self::FetchFailure { endpoint, .. } => {
                format!("Failed to load {endpoint} data. Please try again.")
            }
            Self::FetchTimeout { after } => format!(
                "Loading took longer than {}s and was abandoned.",
                after.as_secs_f64()
            ),
            other => other.to_string(),
        }
    }

    /// Check if refreshing again could succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::FetchFailure { .. } | Self::FetchTimeout { .. })
    }
}

impl From<SourceError> for DashboardError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::FetchFailure { endpoint, reason } => {
                Self::FetchFailure { endpoint, reason }
            }
            SourceError::FetchTimeout { after } => Self::FetchTimeout { after },
            SourceError::InvalidConfig(msg) => Self::Config(ConfigError::Invalid(msg)),
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("cannot read {path}: {reason}")]
    Io {
        /// Path that was read
        path: String,
        /// OS error detail
        reason: String,
    },

    /// Config file is not valid TOML for this schema
    #[error("invalid config: {0}")]
    Parse(String),

    /// A setting is out of range
    #[error("{0}")]
    Invalid(String),
}

/// Selection errors; state is left unchanged when one is returned
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// No snapshot has been loaded yet
    #[error("no data loaded")]
    NoSnapshot,

    /// A CIO was selected before a division
    #[error("select a division first")]
    NoDivision,

    /// An owner was selected before a CIO
    #[error("select a CIO first")]
    NoCio,

    /// Division not in the index
    #[error("unknown division: {0}")]
    UnknownDivision(String),

    /// CIO not under the selected division
    #[error("unknown CIO `{cio}` in division `{division}`")]
    UnknownCio {
        /// Selected division
        division: String,
        /// Requested CIO
        cio: String,
    },

    /// Owner not under the selected (division, CIO) pair
    #[error("unknown owner `{owner}` under CIO `{cio}`")]
    UnknownOwner {
        /// Selected CIO
        cio: String,
        /// Requested owner
        owner: String,
    },

    /// The selected CIO has no owners to navigate
    #[error("no owners to navigate")]
    NoOwners,
}

#[cfg(test)]
mod tests {
    use super::*;
    use dora_model::{InputName, MetricKey};

    #[test]
    fn source_errors_map_into_taxonomy() {
        let err: DashboardError =
            SourceError::fetch_failure(Endpoint::Series(MetricKey::ReleaseFrequency), "HTTP 503")
                .into();
        assert!(matches!(err, DashboardError::FetchFailure { .. }));
        assert!(err.is_retryable());
        assert!(err.user_message().contains("series:releaseFrequency"));

        let err: DashboardError = SourceError::FetchTimeout {
            after: Duration::from_secs(30),
        }
        .into();
        assert_eq!(err.to_string(), "fetch timed out after 30s");

        let err: DashboardError = SourceError::InvalidConfig("bad".into()).into();
        assert!(matches!(err, DashboardError::Config(ConfigError::Invalid(_))));
        assert!(!err.is_retryable());
    }

    #[test]
    fn malformed_input_message_names_payload() {
        let err: DashboardError =
            MalformedInput::new(InputName::Assignments, "expected array, got object").into();
        assert_eq!(
            err.user_message(),
            "The assignments data could not be read: expected array, got object"
        );
        assert!(!err.is_retryable());
    }

    #[test]
    fn selection_error_display() {
        let err = SelectionError::UnknownCio {
            division: "RFT".into(),
            cio: "Zed".into(),
        };
        assert_eq!(err.to_string(), "unknown CIO `Zed` in division `RFT`");
    }
}
