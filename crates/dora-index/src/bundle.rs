//! Per-owner aligned metric series

use dora_model::{IdentityPolicy, MetricKey, PeriodKey, UNKNOWN};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::collections::BTreeMap;

/// Normalized (CIO, owner) identity of a bundle
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerKey {
    /// Normalized CIO key
    pub cio: String,
    /// Normalized owner key
    pub owner: String,
}

impl OwnerKey {
    /// Build a key under the given policy
    #[inline]
    #[must_use]
    pub fn new(policy: IdentityPolicy, cio: &str, owner: &str) -> Self {
        Self {
            cio: policy.key(cio).into_owned(),
            owner: policy.key(owner).into_owned(),
        }
    }
}

/// One owner's four series aligned to a shared, truncated period list
///
/// Invariant: every series has exactly `periods.len()` values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerMetricBundle {
    /// Division from the metric rows (often `unknown`)
    pub division: String,
    /// CIO display name
    pub cio: String,
    /// Owner display name
    pub owner: String,
    periods: Vec<String>,
    series: BTreeMap<MetricKey, Vec<f64>>,
}

impl OwnerMetricBundle {
    /// Chronologically ascending period labels
    #[inline]
    #[must_use]
    pub fn periods(&self) -> &[String] {
        &self.periods
    }

    /// Values of one metric aligned to [`Self::periods`]
    #[must_use]
    pub fn series(&self, key: MetricKey) -> &[f64] {
        self.series.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All series in metric order
    pub fn all_series(&self) -> impl Iterator<Item = (MetricKey, &[f64])> {
        self.series.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    /// Number of retained periods
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Check if no periods were retained
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}

/// Mutable accumulator used while the four series are being read
#[derive(Debug, Default)]
pub(crate) struct WorkingBundle {
    division: Option<String>,
    cio: String,
    owner: String,
    periods: IndexSet<String>,
    values: [IndexMap<String, f64>; 4],
}

impl WorkingBundle {
    pub(crate) fn new(cio: &str, owner: &str) -> Self {
        Self {
            cio: cio.to_string(),
            owner: owner.to_string(),
            ..Self::default()
        }
    }

    /// Record one observation; returns the replaced value on a duplicate period
    pub(crate) fn record(
        &mut self,
        key: MetricKey,
        division: &str,
        period: &str,
        value: f64,
    ) -> Option<f64> {
        if self.division.is_none() && division != UNKNOWN {
            self.division = Some(division.to_string());
        }
        self.periods.insert(period.to_string());
        self.values[key.index()].insert(period.to_string(), value)
    }

    /// Sort periods by date, keep the most recent `max_periods` and realign
    pub(crate) fn finalize(self, max_periods: usize) -> OwnerMetricBundle {
        let mut ordered: Vec<PeriodKey> =
            self.periods.iter().map(|p| PeriodKey::parse(p)).collect();
        ordered.sort();
        let skip = ordered.len().saturating_sub(max_periods);
        let periods: Vec<String> = ordered
            .into_iter()
            .skip(skip)
            .map(PeriodKey::into_label)
            .collect();

        let series: BTreeMap<MetricKey, Vec<f64>> = MetricKey::ALL
            .iter()
            .map(|key| {
                let recorded = &self.values[key.index()];
                let aligned: Vec<f64> = periods
                    .iter()
                    .map(|p| recorded.get(p).copied().unwrap_or(0.0))
                    .collect();
                (*key, aligned)
            })
            .collect();

        OwnerMetricBundle {
            division: self.division.unwrap_or_else(|| UNKNOWN.to_string()),
            cio: self.cio,
            owner: self.owner,
            periods,
            series,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn finalize_aligns_missing_periods_to_zero() {
        let mut working = WorkingBundle::new("A", "X");
        working.record(MetricKey::ReleaseFrequency, UNKNOWN, "2024-02", 5.0);
        working.record(MetricKey::ReleaseFrequency, UNKNOWN, "2024-01", 3.0);
        working.record(MetricKey::ChangeFailureRate, UNKNOWN, "2024-03", 1.5);

        let bundle = working.finalize(6);
        assert_eq!(bundle.periods(), ["2024-01", "2024-02", "2024-03"]);
        assert_eq!(bundle.series(MetricKey::ReleaseFrequency), [3.0, 5.0, 0.0]);
        assert_eq!(bundle.series(MetricKey::ChangeFailureRate), [0.0, 0.0, 1.5]);
        assert_eq!(bundle.series(MetricKey::LeadTimeForChange), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn finalize_keeps_most_recent_periods() {
        let mut working = WorkingBundle::new("A", "X");
        for month in 1..=12 {
            working.record(
                MetricKey::MeanTimeToRecover,
                UNKNOWN,
                &format!("2024-{month}"),
                f64::from(month),
            );
        }

        let bundle = working.finalize(6);
        assert_eq!(
            bundle.periods(),
            ["2024-7", "2024-8", "2024-9", "2024-10", "2024-11", "2024-12"]
        );
        assert_eq!(
            bundle.series(MetricKey::MeanTimeToRecover),
            [7.0, 8.0, 9.0, 10.0, 11.0, 12.0]
        );
    }

    #[test]
    fn duplicate_period_reports_replaced_value() {
        let mut working = WorkingBundle::new("A", "X");
        assert_eq!(working.record(MetricKey::ReleaseFrequency, UNKNOWN, "2024-01", 1.0), None);
        assert_eq!(
            working.record(MetricKey::ReleaseFrequency, UNKNOWN, "2024-01", 2.0),
            Some(1.0)
        );
        let bundle = working.finalize(6);
        assert_eq!(bundle.series(MetricKey::ReleaseFrequency), [2.0]);
    }

    #[test]
    fn division_taken_from_first_known_row() {
        let mut working = WorkingBundle::new("A", "X");
        working.record(MetricKey::ReleaseFrequency, UNKNOWN, "2024-01", 1.0);
        working.record(MetricKey::ReleaseFrequency, "RFT", "2024-02", 1.0);
        assert_eq!(working.finalize(6).division, "RFT");
    }

    #[test]
    fn owner_key_follows_policy() {
        assert_ne!(
            OwnerKey::new(IdentityPolicy::Exact, "A", "Alice"),
            OwnerKey::new(IdentityPolicy::Exact, "A", "alice")
        );
        assert_eq!(
            OwnerKey::new(IdentityPolicy::CaseInsensitive, "A", "Alice"),
            OwnerKey::new(IdentityPolicy::CaseInsensitive, "a", "alice ")
        );
    }
}
