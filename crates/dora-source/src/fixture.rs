//! In-memory data source
//!
//! Serves payloads from a [`RawPayloads`] value, optionally loaded from a
//! JSON fixture file of the form
//! `{ "assignments": [...], "series": { "<metricKey>": [...] } }`.

use crate::error::SourceError;
use crate::source::{Endpoint, MetricSource};
use async_trait::async_trait;
use dora_model::RawPayloads;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Metric source serving fixed payloads
#[derive(Debug, Clone, Default)]
pub struct StaticMetricSource {
    payloads: RawPayloads,
    latency: Option<Duration>,
    origin: Option<PathBuf>,
}

impl StaticMetricSource {
    /// Create from payloads
    #[inline]
    #[must_use]
    pub fn new(payloads: RawPayloads) -> Self {
        Self {
            payloads,
            latency: None,
            origin: None,
        }
    }

    /// Load payloads from a JSON fixture file
    ///
    /// # Errors
    /// `InvalidConfig` if the file cannot be read or is not a fixture document.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| SourceError::InvalidConfig(format!("fixture {}: {e}", path.display())))?;
        let payloads: RawPayloads = serde_json::from_str(&text)
            .map_err(|e| SourceError::InvalidConfig(format!("fixture {}: {e}", path.display())))?;

        tracing::debug!(path = %path.display(), series = payloads.series.len(), "loaded fixture");
        Ok(Self {
            payloads,
            latency: None,
            origin: Some(path.to_path_buf()),
        })
    }

    /// Delay every response
    #[inline]
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }
}

#[async_trait]
impl MetricSource for StaticMetricSource {
    async fn fetch(&self, endpoint: Endpoint) -> Result<Value, SourceError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        match endpoint {
            Endpoint::Assignments => Ok(self.payloads.assignments.clone()),
            Endpoint::Series(key) => self
                .payloads
                .series
                .get(&key)
                .cloned()
                .ok_or_else(|| SourceError::fetch_failure(endpoint, "no payload for endpoint")),
        }
    }

    fn describe(&self) -> String {
        match &self.origin {
            Some(path) => format!("fixture {}", path.display()),
            None => "in-memory fixture".to_string(),
        }
    }
}
