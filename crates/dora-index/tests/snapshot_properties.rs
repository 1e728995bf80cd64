//! Property tests for the snapshot builder.
//!
//! - owners only appear under the (division, CIO) pair they were assigned to
//! - every bundle has aligned series and at most the configured window
//! - truncation and alignment do not depend on record arrival order, for
//!   series without duplicate periods
//! - with duplicate periods, the last row in arrival order wins

use dora_index::{SnapshotBuilder, DEFAULT_MAX_PERIODS};
use dora_model::{AssignmentRecord, MetricKey, MetricRecord};
use dora_test_utils::{portfolio_payloads, portfolio_value};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap, HashSet};

fn name() -> impl Strategy<Value = String> {
    prop_oneof![Just("a"), Just("b"), Just("c"), Just("B")].prop_map(str::to_string)
}

fn assignment() -> impl Strategy<Value = AssignmentRecord> {
    (name(), name(), name()).prop_map(|(d, c, o)| AssignmentRecord::new(d, c, o))
}

fn metric_record() -> impl Strategy<Value = (MetricKey, MetricRecord)> {
    (
        0usize..4,
        name(),
        name(),
        2022i32..=2024,
        1u32..=12,
        -50i32..50,
    )
        .prop_map(|(k, cio, owner, year, month, value)| {
            let record =
                MetricRecord::new(cio, owner, format!("{year}-{month}"), f64::from(value));
            (MetricKey::ALL[k], record)
        })
}

/// Drop later duplicates of (metric, CIO, owner, period)
///
/// Duplicates resolve by arrival order, so the reordering property only
/// holds without them; `prop_last_duplicate_wins` covers that rule.
fn unique(records: Vec<(MetricKey, MetricRecord)>) -> Vec<(MetricKey, MetricRecord)> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|(k, r)| seen.insert((*k, r.cio.clone(), r.owner.clone(), r.period.clone())))
        .collect()
}

fn group(records: &[(MetricKey, MetricRecord)]) -> BTreeMap<MetricKey, Vec<MetricRecord>> {
    let mut series: BTreeMap<MetricKey, Vec<MetricRecord>> = BTreeMap::new();
    for (key, record) in records {
        series.entry(*key).or_default().push(record.clone());
    }
    series
}

proptest! {
    #[test]
    fn prop_owners_stay_under_their_assigned_pair(
        assignments in prop::collection::vec(assignment(), 0..40)
    ) {
        let snapshot = SnapshotBuilder::new().build_records(&assignments, &BTreeMap::new());
        let assigned: HashSet<_> = assignments
            .iter()
            .map(|a| (a.division.as_str(), a.cio.as_str(), a.owner.as_str()))
            .collect();
        let indexed: Vec<_> = snapshot.index().triples().collect();

        for triple in &indexed {
            prop_assert!(assigned.contains(triple));
        }
        prop_assert_eq!(indexed.len(), assigned.len());
    }

    #[test]
    fn prop_bundles_are_aligned_and_bounded(
        records in prop::collection::vec(metric_record(), 0..120)
    ) {
        let snapshot = SnapshotBuilder::new().build_records(&[], &group(&records));
        for (_, bundle) in snapshot.bundles() {
            prop_assert!(bundle.len() <= DEFAULT_MAX_PERIODS);
            for key in MetricKey::ALL {
                prop_assert_eq!(bundle.series(key).len(), bundle.periods().len());
            }
        }
    }

    #[test]
    fn prop_reordering_records_changes_nothing(
        (records, shuffled) in prop::collection::vec(metric_record(), 0..120)
            .prop_map(unique)
            .prop_flat_map(|records| {
                let shuffled = Just(records.clone()).prop_shuffle();
                (Just(records), shuffled)
            })
    ) {
        let builder = SnapshotBuilder::new();
        let a = builder.build_records(&[], &group(&records));
        let b = builder.build_records(&[], &group(&shuffled));

        prop_assert_eq!(a.bundle_count(), b.bundle_count());
        for (_, bundle) in a.bundles() {
            let other = b.bundle(&bundle.cio, &bundle.owner).unwrap();
            prop_assert_eq!(bundle.periods(), other.periods());
            for key in MetricKey::ALL {
                prop_assert_eq!(bundle.series(key), other.series(key));
            }
        }
    }

    #[test]
    fn prop_last_duplicate_wins(
        records in prop::collection::vec(metric_record(), 0..160)
    ) {
        let mut last: HashMap<(MetricKey, &str, &str, &str), f64> = HashMap::new();
        for (key, r) in &records {
            last.insert((*key, r.cio.as_str(), r.owner.as_str(), r.period.as_str()), r.value);
        }

        let snapshot = SnapshotBuilder::new().build_records(&[], &group(&records));
        for (_, bundle) in snapshot.bundles() {
            for key in MetricKey::ALL {
                for (period, value) in bundle.periods().iter().zip(bundle.series(key)) {
                    let expected = last
                        .get(&(key, bundle.cio.as_str(), bundle.owner.as_str(), period.as_str()))
                        .copied()
                        .unwrap_or(0.0);
                    prop_assert_eq!(*value, expected);
                }
            }
        }
    }
}

#[test]
fn portfolio_keeps_last_six_months() {
    let snapshot = SnapshotBuilder::new().build(&portfolio_payloads()).unwrap();

    assert_eq!(snapshot.index().divisions().collect::<Vec<_>>(), ["RFT", "Ops"]);
    assert_eq!(snapshot.index().cios("RFT"), ["Morgan", "Quinn"]);
    assert_eq!(snapshot.index().owners("RFT", "Morgan"), ["Payments", "Ledger"]);
    assert_eq!(snapshot.index().owners("Ops", "Quinn"), ["Platform"]);

    let ledger = snapshot.bundle("Morgan", "Ledger").unwrap();
    assert_eq!(
        ledger.periods(),
        ["2024-3", "2024-4", "2024-5", "2024-6", "2024-7", "2024-8"]
    );
    let expected: Vec<f64> = (3..=8)
        .map(|m| portfolio_value(10.0, MetricKey::LeadTimeForChange, m))
        .collect();
    assert_eq!(ledger.series(MetricKey::LeadTimeForChange), expected.as_slice());
}
