//! Plain-text rendering

use dora_core::{DeltaSign, FilterIndex, OwnerView};
use std::fmt::Write;

/// Indented division / CIO / owner tree
pub(crate) fn filters(index: &FilterIndex) -> String {
    let mut out = String::new();
    for division in index.entries() {
        let _ = writeln!(out, "{}", division.name);
        for cio in division.cios() {
            let _ = writeln!(out, "  {}", cio.name);
            for owner in cio.owners() {
                let _ = writeln!(out, "    {owner}");
            }
        }
    }
    out
}

/// One block per metric panel
pub(crate) fn owner(view: &OwnerView) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} / {} / {}  ({})",
        view.division,
        view.cio,
        view.owner,
        view.position_caption()
    );
    if view.is_empty() {
        let _ = writeln!(out, "  no data");
        return out;
    }
    let _ = writeln!(out, "  periods: {}", view.periods.join(", "));

    for panel in &view.panels {
        let d = &panel.derivation;
        let arrow = match d.delta.sign {
            DeltaSign::Positive => "up",
            DeltaSign::Negative => "down",
            DeltaSign::Neutral => "flat",
        };
        let values: Vec<String> = panel.values.iter().map(|v| format!("{v}")).collect();
        let _ = writeln!(out, "  {}", panel.label);
        let _ = writeln!(
            out,
            "    latest {}  delta {} ({arrow})  threshold {}  floor {}",
            d.latest_display(),
            d.delta.display(),
            d.threshold,
            d.chart_floor
        );
        let _ = writeln!(out, "    [{}]", values.join(", "));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dora_core::SnapshotBuilder;
    use dora_test_utils::{example_payloads, portfolio_payloads};
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_filter_tree() {
        let snapshot = SnapshotBuilder::new().build(&portfolio_payloads()).unwrap();
        let expected = concat!(
            "RFT\n",
            "  Morgan\n    Payments\n    Ledger\n",
            "  Quinn\n    Mobile\n",
            "Ops\n",
            "  Quinn\n    Platform\n",
        );
        assert_eq!(filters(snapshot.index()), expected);
    }

    #[test]
    fn renders_owner_panels() {
        let snapshot = SnapshotBuilder::new().build(&example_payloads()).unwrap();
        let view = OwnerView::new("RFT", "A", "X", snapshot.bundle("A", "X"), (1, 1));
        let text = owner(&view);

        assert!(text.starts_with("RFT / A / X  (1 of 1)\n"));
        assert!(text.contains("periods: 2024-01, 2024-02"));
        assert!(text.contains("latest 5.00  delta +66.67% (up)"));
        assert!(text.contains("[3, 5]"));
    }

    #[test]
    fn owner_without_data() {
        let view = OwnerView::new("RFT", "A", "Y", None, (2, 2));
        assert_eq!(owner(&view), "RFT / A / Y  (2 of 2)\n  no data\n");
    }
}
