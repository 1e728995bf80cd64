//! The four tracked metric series

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four DORA-style delivery metrics
///
/// Declaration order is the fixed display order of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricKey {
    /// How often releases reach production
    #[serde(alias = "graph1")]
    ReleaseFrequency,
    /// Commit-to-production time
    #[serde(alias = "graph2")]
    LeadTimeForChange,
    /// Share of releases causing a failure
    #[serde(alias = "graph3")]
    ChangeFailureRate,
    /// Time to restore service after a failure
    #[serde(alias = "graph4")]
    MeanTimeToRecover,
}

impl MetricKey {
    /// All keys in display order
    pub const ALL: [MetricKey; 4] = [
        MetricKey::ReleaseFrequency,
        MetricKey::LeadTimeForChange,
        MetricKey::ChangeFailureRate,
        MetricKey::MeanTimeToRecover,
    ];

    /// Canonical camelCase identifier
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReleaseFrequency => "releaseFrequency",
            Self::LeadTimeForChange => "leadTimeForChange",
            Self::ChangeFailureRate => "changeFailureRate",
            Self::MeanTimeToRecover => "meanTimeToRecover",
        }
    }

    /// Legacy chart slot name (`graph1`..`graph4`)
    #[inline]
    #[must_use]
    pub fn graph_key(&self) -> &'static str {
        match self {
            Self::ReleaseFrequency => "graph1",
            Self::LeadTimeForChange => "graph2",
            Self::ChangeFailureRate => "graph3",
            Self::MeanTimeToRecover => "graph4",
        }
    }

    /// Human-readable chart title
    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::ReleaseFrequency => "Release Frequency",
            Self::LeadTimeForChange => "Lead Time For Change",
            Self::ChangeFailureRate => "Change Failure Rate",
            Self::MeanTimeToRecover => "Mean Time to Recover",
        }
    }

    /// Path segment used by per-metric upstream endpoints
    #[inline]
    #[must_use]
    pub fn slug(&self) -> &'static str {
        match self {
            Self::ReleaseFrequency => "release-frequency",
            Self::LeadTimeForChange => "lead-time-for-change",
            Self::ChangeFailureRate => "change-failure-rate",
            Self::MeanTimeToRecover => "mean-time-to-recover",
        }
    }

    /// KPI threshold drawn as a reference line on the chart
    #[inline]
    #[must_use]
    pub fn threshold(&self) -> f64 {
        match self {
            Self::ReleaseFrequency => 2.0,
            Self::LeadTimeForChange => 7.0,
            Self::ChangeFailureRate => 2.5,
            Self::MeanTimeToRecover => 12.0,
        }
    }

    /// Position in [`MetricKey::ALL`]
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised metric name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown metric key: {0}")]
pub struct UnknownMetricKey(pub String);

impl FromStr for MetricKey {
    type Err = UnknownMetricKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| s == k.as_str() || s == k.graph_key() || s == k.slug())
            .ok_or_else(|| UnknownMetricKey(s.to_string()))
    }
}
