//! HTTP data source
//!
//! One assignments endpoint plus one endpoint per metric, built from a base
//! URL and path templates. The series template substitutes `{metric}` with the
//! metric's slug; an optional owner filter is sent as the `owner` query
//! parameter on series requests.

use crate::error::SourceError;
use crate::source::{Endpoint, MetricSource};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Connection settings for [`HttpMetricSource`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSourceConfig {
    /// Base URL all paths are resolved against
    pub base_url: String,
    /// Path of the assignments endpoint
    pub assignments_path: String,
    /// Path template of the series endpoints (`{metric}` is substituted)
    pub series_path: String,
    /// Restrict series to one owner
    pub owner_filter: Option<String>,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api/".to_string(),
            assignments_path: "owners".to_string(),
            series_path: "metrics/{metric}".to_string(),
            owner_filter: None,
            request_timeout_secs: 30,
        }
    }
}

/// Metric source backed by a JSON HTTP API
#[derive(Debug, Clone)]
pub struct HttpMetricSource {
    http: Client,
    base: Url,
    config: HttpSourceConfig,
}

impl HttpMetricSource {
    /// Create a new source
    ///
    /// # Errors
    /// `InvalidConfig` if the base URL does not parse or the client cannot be
    /// built.
    pub fn new(config: HttpSourceConfig) -> Result<Self, SourceError> {
        let mut base_url = config.base_url.trim().to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base = Url::parse(&base_url)
            .map_err(|e| SourceError::InvalidConfig(format!("base url `{base_url}`: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(SourceError::InvalidConfig(format!(
                "base url `{base_url}` cannot carry paths"
            )));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs.max(1)))
            .build()
            .map_err(|e| SourceError::InvalidConfig(format!("http client: {e}")))?;

        Ok(Self { http, base, config })
    }

    /// Settings this source was built with
    #[inline]
    #[must_use]
    pub fn config(&self) -> &HttpSourceConfig {
        &self.config
    }

    /// Resolve the URL of an endpoint
    ///
    /// # Errors
    /// `InvalidConfig` if a configured path does not resolve against the base.
    pub fn url_for(&self, endpoint: Endpoint) -> Result<Url, SourceError> {
        let path = match endpoint {
            Endpoint::Assignments => self.config.assignments_path.clone(),
            Endpoint::Series(key) => self.config.series_path.replace("{metric}", key.slug()),
        };
        let mut url = self
            .base
            .join(path.trim_start_matches('/'))
            .map_err(|e| SourceError::InvalidConfig(format!("path `{path}`: {e}")))?;

        if let (Endpoint::Series(_), Some(owner)) = (endpoint, &self.config.owner_filter) {
            url.query_pairs_mut().append_pair("owner", owner);
        }
        Ok(url)
    }
}

#[async_trait]
impl MetricSource for HttpMetricSource {
    async fn fetch(&self, endpoint: Endpoint) -> Result<Value, SourceError> {
        let url = self.url_for(endpoint)?;
        tracing::debug!(%endpoint, %url, "fetching payload");

        let response = self
            .http
            .get(url.clone())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| SourceError::fetch_failure(endpoint, format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::fetch_failure(
                endpoint,
                format!(
                    "{url}: HTTP {status}: {}",
                    body.chars().take(200).collect::<String>()
                ),
            ));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| SourceError::fetch_failure(endpoint, format!("{url}: invalid JSON: {e}")))
    }

    fn describe(&self) -> String {
        format!("http {}", self.base)
    }
}
