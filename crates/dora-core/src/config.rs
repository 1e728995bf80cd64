//! Dashboard configuration
//!
//! Loaded from TOML; every field has a default so an empty file is valid.
//!
//! ```toml
//! fetch_timeout_secs = 30
//! identity_policy = "case-insensitive"
//! max_periods = 6
//!
//! [source]
//! kind = "http"
//! base_url = "https://metrics.example.com/api/"
//! series_path = "metrics/{metric}"
//! ```

use crate::error::ConfigError;
use dora_index::{SnapshotBuilder, DEFAULT_MAX_PERIODS};
use dora_model::IdentityPolicy;
use dora_source::{HttpMetricSource, HttpSourceConfig, MetricSource, StaticMetricSource};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Where payloads come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SourceConfig {
    /// JSON HTTP API
    Http(HttpSourceConfig),
    /// JSON fixture file
    Fixture {
        /// Fixture document path
        path: PathBuf,
    },
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::Http(HttpSourceConfig::default())
    }
}

/// Dashboard configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Payload source
    pub source: SourceConfig,
    /// Bound on one full fetch, in seconds
    pub fetch_timeout_secs: u64,
    /// How owner, CIO and division names are compared
    pub identity_policy: IdentityPolicy,
    /// Number of most recent periods kept per owner
    pub max_periods: usize,
}

impl DashboardConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With payload source
    #[inline]
    #[must_use]
    pub fn with_source(mut self, source: SourceConfig) -> Self {
        self.source = source;
        self
    }

    /// With fetch timeout
    #[inline]
    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout_secs = timeout.as_secs();
        self
    }

    /// With identity policy
    #[inline]
    #[must_use]
    pub fn with_identity_policy(mut self, policy: IdentityPolicy) -> Self {
        self.identity_policy = policy;
        self
    }

    /// Parse and validate a TOML document
    ///
    /// # Errors
    /// `Parse` for malformed TOML, `Invalid` for out-of-range settings.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    /// `Io` if the file cannot be read, otherwise as [`Self::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Check settings are in range
    ///
    /// # Errors
    /// `Invalid` naming the first offending setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "fetch_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.max_periods == 0 {
            return Err(ConfigError::Invalid(
                "max_periods must be at least 1".to_string(),
            ));
        }
        if let SourceConfig::Http(http) = &self.source {
            if !http.series_path.contains("{metric}") {
                return Err(ConfigError::Invalid(format!(
                    "series_path `{}` has no {{metric}} placeholder",
                    http.series_path
                )));
            }
        }
        Ok(())
    }

    /// Bound on one full fetch
    #[inline]
    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Snapshot builder using these settings
    #[must_use]
    pub fn snapshot_builder(&self) -> SnapshotBuilder {
        SnapshotBuilder::new()
            .with_policy(self.identity_policy)
            .with_max_periods(self.max_periods)
    }

    /// Construct the configured source
    ///
    /// # Errors
    /// `Invalid` if the HTTP base URL is unusable or the fixture cannot be read.
    pub async fn build_source(&self) -> Result<Arc<dyn MetricSource>, ConfigError> {
        let source: Arc<dyn MetricSource> = match &self.source {
            SourceConfig::Http(http) => Arc::new(
                HttpMetricSource::new(http.clone())
                    .map_err(|e| ConfigError::Invalid(e.to_string()))?,
            ),
            SourceConfig::Fixture { path } => Arc::new(
                StaticMetricSource::from_file(path)
                    .await
                    .map_err(|e| ConfigError::Invalid(e.to_string()))?,
            ),
        };
        Ok(source)
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            fetch_timeout_secs: 30,
            identity_policy: IdentityPolicy::default(),
            max_periods: DEFAULT_MAX_PERIODS,
        }
    }
}
