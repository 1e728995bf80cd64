use dora_index::SnapshotBuilder;
use dora_insight::{chart_floor, derive_bundle, Delta, DeltaSign};
use dora_model::MetricKey;
use dora_test_utils::example_payloads;
use proptest::prelude::*;

#[test]
fn example_owner_derivations() {
    let snapshot = SnapshotBuilder::new().build(&example_payloads()).unwrap();
    let bundle = snapshot.bundle("A", "X").unwrap();
    let [release, lead, failure, recover] = derive_bundle(bundle);

    assert_eq!(release.key, MetricKey::ReleaseFrequency);
    assert_eq!(release.latest_display(), "5.00");
    assert_eq!(release.delta.percent, Some(66.67));
    assert_eq!(release.delta.sign, DeltaSign::Positive);
    assert_eq!(release.chart_floor, 2.0);

    for other in [lead, failure, recover] {
        assert_eq!(other.latest_display(), "0.00");
        assert_eq!(other.delta.percent, Some(0.0));
        assert_eq!(other.delta.sign, DeltaSign::Neutral);
        assert_eq!(other.chart_floor, 0.0);
    }
}

proptest! {
    #[test]
    fn prop_chart_floor_is_non_negative_and_below_min(
        series in prop::collection::vec(-1_000.0f64..1_000.0, 1..12)
    ) {
        let floor = chart_floor(&series);
        let min = series.iter().copied().fold(f64::INFINITY, f64::min);
        prop_assert!(floor >= 0.0);
        prop_assert!(floor == 0.0 || floor <= min - 1.0);
        prop_assert_eq!(floor, floor.trunc());
    }

    #[test]
    fn prop_delta_matches_reference_formula(
        prev in prop_oneof![-1_000.0f64..-0.01, 0.01f64..1_000.0],
        curr in -1_000.0f64..1_000.0,
    ) {
        let delta = Delta::of(&[prev, curr]);

        let raw = (curr - prev) / prev * 100.0;
        let expected = (raw * 100.0 + 0.5).floor() / 100.0;
        prop_assert_eq!(delta.percent, Some(expected));

        if expected == 0.0 {
            prop_assert_eq!(delta.sign, DeltaSign::Neutral);
        } else if (curr > prev) == (prev > 0.0) {
            prop_assert_eq!(delta.sign, DeltaSign::Positive);
        } else {
            prop_assert_eq!(delta.sign, DeltaSign::Negative);
        }
    }

    #[test]
    fn prop_only_last_two_values_matter(
        head in prop::collection::vec(-1_000.0f64..1_000.0, 0..10),
        prev in 0.01f64..1_000.0,
        curr in -1_000.0f64..1_000.0,
    ) {
        let mut series = head;
        series.extend([prev, curr]);
        prop_assert_eq!(Delta::of(&series), Delta::of(&[prev, curr]));
    }
}
