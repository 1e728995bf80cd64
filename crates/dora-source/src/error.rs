//! Data source errors

use crate::source::Endpoint;
use std::time::Duration;

/// Failure while talking to the upstream data source
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// A request failed, returned a non-success status, or had an unreadable body
    #[error("fetch failed for `{endpoint}`: {reason}")]
    FetchFailure {
        /// Which payload was being fetched
        endpoint: Endpoint,
        /// Transport, status or decoding detail
        reason: String,
    },

    /// The fan-out did not complete within the client-side bound
    #[error("fetch timed out after {}ms", .after.as_millis())]
    FetchTimeout {
        /// The bound that was exceeded
        after: Duration,
    },

    /// Source could not be constructed
    #[error("invalid source configuration: {0}")]
    InvalidConfig(String),
}

impl SourceError {
    /// Create fetch failure for an endpoint
    #[inline]
    pub fn fetch_failure(endpoint: Endpoint, reason: impl Into<String>) -> Self {
        Self::FetchFailure {
            endpoint,
            reason: reason.into(),
        }
    }

    /// Check if retrying the same request could succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::FetchFailure { .. } | Self::FetchTimeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dora_model::MetricKey;

    #[test]
    fn fetch_failure_names_endpoint() {
        let err = SourceError::fetch_failure(
            Endpoint::Series(MetricKey::LeadTimeForChange),
            "HTTP 502 Bad Gateway",
        );
        let msg = err.to_string();
        assert!(msg.contains("series:leadTimeForChange"));
        assert!(msg.contains("502"));
        assert!(err.is_retryable());
    }

    #[test]
    fn timeout_display() {
        let err = SourceError::FetchTimeout {
            after: Duration::from_secs(2),
        };
        assert_eq!(err.to_string(), "fetch timed out after 2000ms");
    }

    #[test]
    fn config_errors_are_not_retryable() {
        assert!(!SourceError::InvalidConfig("bad url".into()).is_retryable());
    }
}
