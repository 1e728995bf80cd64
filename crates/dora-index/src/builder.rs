//! Filter-index builder
//!
//! Reshapes the five raw payloads of one fetch into a [`Snapshot`]:
//! 1. Validate every payload is an array of objects
//! 2. One pass over assignments builds the [`FilterIndex`]
//! 3. One pass per metric series accumulates per-owner observations
//! 4. Each owner's periods are date-sorted, truncated and realigned
//!
//! Metric rows without a period are skipped: they cannot be placed on the
//! time axis and would otherwise sort after every dated period.

use crate::bundle::{OwnerKey, WorkingBundle};
use crate::filter::FilterIndex;
use crate::snapshot::Snapshot;
use dora_model::{
    AssignmentRecord, IdentityPolicy, MalformedInput, MetricKey, MetricRecord, RawPayloads,
    UNKNOWN,
};
use indexmap::IndexMap;
use std::collections::BTreeMap;

/// Number of most recent periods kept per owner
pub const DEFAULT_MAX_PERIODS: usize = 6;

/// Builds snapshots under a fixed identity policy and period window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotBuilder {
    policy: IdentityPolicy,
    max_periods: usize,
}

impl SnapshotBuilder {
    /// Create builder with default policy and window
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With identity policy
    #[inline]
    #[must_use]
    pub fn with_policy(mut self, policy: IdentityPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// With period window (at least one)
    #[inline]
    #[must_use]
    pub fn with_max_periods(mut self, max_periods: usize) -> Self {
        self.max_periods = max_periods.max(1);
        self
    }

    /// Identity policy
    #[inline]
    #[must_use]
    pub fn policy(&self) -> IdentityPolicy {
        self.policy
    }

    /// Period window
    #[inline]
    #[must_use]
    pub fn max_periods(&self) -> usize {
        self.max_periods
    }

    /// Validate and reshape raw payloads
    ///
    /// # Errors
    /// `MalformedInput` naming the first payload (assignments, then series in
    /// metric order) that is not an array of objects. Nothing is built unless
    /// all five payloads validate.
    pub fn build(&self, payloads: &RawPayloads) -> Result<Snapshot, MalformedInput> {
        let assignment_rows = payloads.assignment_rows()?;
        let mut series_rows = Vec::with_capacity(MetricKey::ALL.len());
        for key in MetricKey::ALL {
            series_rows.push((key, payloads.series_rows(key)?));
        }

        let assignments: Vec<AssignmentRecord> = assignment_rows
            .into_iter()
            .map(AssignmentRecord::from_row)
            .collect();
        let series: BTreeMap<MetricKey, Vec<MetricRecord>> = series_rows
            .into_iter()
            .map(|(key, rows)| {
                let records = rows.into_iter().map(MetricRecord::from_row);
                (key, records.collect::<Vec<_>>())
            })
            .collect();

        Ok(self.build_records(&assignments, &series))
    }

    /// Reshape already-typed records
    ///
    /// Series absent from the map are treated as empty.
    #[must_use]
    pub fn build_records(
        &self,
        assignments: &[AssignmentRecord],
        series: &BTreeMap<MetricKey, Vec<MetricRecord>>,
    ) -> Snapshot {
        let mut index = FilterIndex::new(self.policy);
        index.extend(assignments);

        let mut working: IndexMap<OwnerKey, WorkingBundle> = IndexMap::new();
        let mut duplicates = 0usize;
        let mut undated = 0usize;
        for (key, records) in series {
            for record in records {
                if record.period == UNKNOWN {
                    undated += 1;
                    tracing::warn!(
                        metric = %key,
                        cio = %record.cio,
                        owner = %record.owner,
                        value = record.value,
                        "metric row without period; skipping"
                    );
                    continue;
                }
                let owner_key = OwnerKey::new(self.policy, &record.cio, &record.owner);
                let bundle = working
                    .entry(owner_key)
                    .or_insert_with(|| WorkingBundle::new(&record.cio, &record.owner));
                if let Some(previous) =
                    bundle.record(*key, &record.division, &record.period, record.value)
                {
                    duplicates += 1;
                    tracing::warn!(
                        metric = %key,
                        cio = %record.cio,
                        owner = %record.owner,
                        period = %record.period,
                        previous,
                        replacement = record.value,
                        "duplicate period in metric series; keeping the later value"
                    );
                }
            }
        }

        let bundles: IndexMap<_, _> = working
            .into_iter()
            .map(|(k, w)| (k, w.finalize(self.max_periods)))
            .collect();

        tracing::info!(
            divisions = index.division_count(),
            owners = index.owner_count(),
            bundles = bundles.len(),
            duplicates,
            undated,
            "built metric snapshot"
        );

        Snapshot { index, bundles }
    }
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self {
            policy: IdentityPolicy::default(),
            max_periods: DEFAULT_MAX_PERIODS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dora_model::InputName;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn owner_x_row(period: String, value: i32) -> serde_json::Value {
        json!({ "CIO": "A", "Portfolio_Owner": "X", "Period": period, "Value": value })
    }

    fn empty_series(payloads: RawPayloads) -> RawPayloads {
        MetricKey::ALL
            .into_iter()
            .fold(payloads, |p, key| p.with_series(key, json!([])))
    }

    #[test]
    fn end_to_end_example() {
        let payloads = empty_series(RawPayloads::new(json!([
            { "Division": "RFT", "CIO": "A", "Portfolio_Owner": "X" }
        ])))
        .with_series(
            MetricKey::ReleaseFrequency,
            json!([
                { "CIO": "A", "Portfolio_Owner": "X", "Period": "2024-01", "Value": "3" },
                { "CIO": "A", "Portfolio_Owner": "X", "Period": "2024-02", "Value": "5" }
            ]),
        );

        let snapshot = SnapshotBuilder::new().build(&payloads).unwrap();
        assert_eq!(snapshot.index().owners("RFT", "A"), ["X"]);

        let bundle = snapshot.bundle("A", "X").unwrap();
        assert_eq!(bundle.periods(), ["2024-01", "2024-02"]);
        assert_eq!(bundle.series(MetricKey::ReleaseFrequency), [3.0, 5.0]);
        assert_eq!(bundle.series(MetricKey::LeadTimeForChange), [0.0, 0.0]);
        assert_eq!(bundle.series(MetricKey::ChangeFailureRate), [0.0, 0.0]);
        assert_eq!(bundle.series(MetricKey::MeanTimeToRecover), [0.0, 0.0]);
    }

    #[test]
    fn object_assignment_payload_is_malformed() {
        let payloads = empty_series(RawPayloads::new(json!({ "Division": "RFT" })));
        let err = SnapshotBuilder::new().build(&payloads).unwrap_err();
        assert_eq!(err.input, InputName::Assignments);
    }

    #[test]
    fn malformed_series_is_named() {
        let payloads = empty_series(RawPayloads::new(json!([])))
            .with_series(MetricKey::LeadTimeForChange, json!("oops"));
        let err = SnapshotBuilder::new().build(&payloads).unwrap_err();
        assert_eq!(err.input, InputName::Series(MetricKey::LeadTimeForChange));
    }

    #[test]
    fn empty_payloads_build_empty_snapshot() {
        let snapshot = SnapshotBuilder::new()
            .build(&empty_series(RawPayloads::new(json!([]))))
            .unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn bad_rows_are_tolerated() {
        let payloads = empty_series(RawPayloads::new(json!([{}])))
            .with_series(
                MetricKey::ChangeFailureRate,
                json!([{ "Period": "2024-03", "Value": "n/a" }]),
            );
        let snapshot = SnapshotBuilder::new().build(&payloads).unwrap();

        assert_eq!(snapshot.index().owners("unknown", "unknown"), ["unknown"]);
        let bundle = snapshot.bundle("unknown", "unknown").unwrap();
        assert_eq!(bundle.series(MetricKey::ChangeFailureRate), [0.0]);
    }

    #[test]
    fn series_with_different_periods_are_realigned() {
        let payloads = empty_series(RawPayloads::new(json!([])))
            .with_series(
                MetricKey::ReleaseFrequency,
                json!([
                    { "CIO": "A", "Portfolio_Owner": "X", "Period": "2024-10", "Value": 4 },
                    { "CIO": "A", "Portfolio_Owner": "X", "Period": "2024-2", "Value": 2 }
                ]),
            )
            .with_series(
                MetricKey::MeanTimeToRecover,
                json!([
                    { "CIO": "A", "Portfolio_Owner": "X", "Period": "2024-5", "Value": 9 }
                ]),
            );
        let snapshot = SnapshotBuilder::new().build(&payloads).unwrap();
        let bundle = snapshot.bundle("A", "X").unwrap();

        assert_eq!(bundle.periods(), ["2024-2", "2024-5", "2024-10"]);
        assert_eq!(bundle.series(MetricKey::ReleaseFrequency), [2.0, 0.0, 4.0]);
        assert_eq!(bundle.series(MetricKey::MeanTimeToRecover), [0.0, 9.0, 0.0]);
    }

    #[test]
    fn case_insensitive_policy_merges_owner_spellings() {
        let payloads = empty_series(RawPayloads::new(json!([])))
            .with_series(
                MetricKey::ReleaseFrequency,
                json!([
                    { "CIO": "Ann", "Portfolio_Owner": "Alice", "Period": "2024-01", "Value": 1 }
                ]),
            )
            .with_series(
                MetricKey::LeadTimeForChange,
                json!([
                    { "CIO": "ann", "Portfolio_Owner": "ALICE", "Period": "2024-01", "Value": 8 }
                ]),
            );

        let exact = SnapshotBuilder::new().build(&payloads).unwrap();
        assert_eq!(exact.bundle_count(), 2);

        let folded = SnapshotBuilder::new()
            .with_policy(IdentityPolicy::CaseInsensitive)
            .build(&payloads)
            .unwrap();
        assert_eq!(folded.bundle_count(), 1);
        let bundle = folded.bundle("ANN", "alice").unwrap();
        assert_eq!(bundle.owner, "Alice");
        assert_eq!(bundle.series(MetricKey::LeadTimeForChange), [8.0]);
    }

    #[test]
    fn window_is_configurable() {
        let rows: Vec<_> = (1..=4)
            .map(|m| owner_x_row(format!("2024-0{m}"), m))
            .collect();
        let payloads = empty_series(RawPayloads::new(json!([])))
            .with_series(MetricKey::ReleaseFrequency, json!(rows));

        let snapshot = SnapshotBuilder::new()
            .with_max_periods(2)
            .build(&payloads)
            .unwrap();
        assert_eq!(snapshot.bundle("A", "X").unwrap().periods(), ["2024-03", "2024-04"]);

        assert_eq!(SnapshotBuilder::new().with_max_periods(0).max_periods(), 1);
    }

    #[test]
    fn rows_without_period_do_not_take_the_latest_slot() {
        let mut rows: Vec<_> = (1..=6)
            .map(|m| owner_x_row(format!("2024-{m}"), m))
            .collect();
        rows.push(json!({ "CIO": "A", "Portfolio_Owner": "X", "Value": 99 }));
        rows.push(json!({ "CIO": "A", "Portfolio_Owner": "X", "Period": "", "Value": 98 }));
        let payloads = empty_series(RawPayloads::new(json!([])))
            .with_series(MetricKey::ReleaseFrequency, json!(rows));

        let snapshot = SnapshotBuilder::new().build(&payloads).unwrap();
        let bundle = snapshot.bundle("A", "X").unwrap();
        assert_eq!(
            bundle.periods(),
            ["2024-1", "2024-2", "2024-3", "2024-4", "2024-5", "2024-6"]
        );
        assert_eq!(
            bundle.series(MetricKey::ReleaseFrequency),
            [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]
        );
    }

    #[test]
    fn owner_with_only_undated_rows_gets_no_bundle() {
        let payloads = empty_series(RawPayloads::new(json!([])))
            .with_series(
                MetricKey::ChangeFailureRate,
                json!([{ "CIO": "A", "Portfolio_Owner": "Y", "Value": 4 }]),
            );
        let snapshot = SnapshotBuilder::new().build(&payloads).unwrap();
        assert!(snapshot.bundle("A", "Y").is_none());
        assert!(snapshot.is_empty());
    }
}
