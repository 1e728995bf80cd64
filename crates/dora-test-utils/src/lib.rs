//! Testing utilities for DORA Pulse workspace
//!
//! Shared payload fixtures in the upstream wire shape.

#![allow(missing_docs)]

use dora_model::{MetricKey, RawPayloads};
use serde_json::{json, Value};

pub fn assignment_row(division: &str, cio: &str, owner: &str) -> Value {
    json!({ "Division": division, "CIO": cio, "Portfolio_Owner": owner })
}

pub fn metric_row(cio: &str, owner: &str, period: &str, value: impl Into<Value>) -> Value {
    json!({ "CIO": cio, "Portfolio_Owner": owner, "Period": period, "Value": value.into() })
}

/// Payloads with every series present; unlisted series are empty arrays
pub fn payloads_with(assignments: Vec<Value>, series: Vec<(MetricKey, Vec<Value>)>) -> RawPayloads {
    let mut payloads = MetricKey::ALL
        .into_iter()
        .fold(RawPayloads::new(Value::Array(assignments)), |p, key| {
            p.with_series(key, json!([]))
        });
    for (key, rows) in series {
        payloads = payloads.with_series(key, Value::Array(rows));
    }
    payloads
}

/// One owner, two release-frequency points, other series empty
pub fn example_payloads() -> RawPayloads {
    payloads_with(
        vec![assignment_row("RFT", "A", "X")],
        vec![(
            MetricKey::ReleaseFrequency,
            vec![
                metric_row("A", "X", "2024-01", "3"),
                metric_row("A", "X", "2024-02", "5"),
            ],
        )],
    )
}

/// Two divisions, three CIOs, four owners, eight months of every metric
///
/// Values are `base + month` where `base` differs per owner and metric, so
/// every aligned value is predictable.
pub fn portfolio_payloads() -> RawPayloads {
    let assignments = vec![
        assignment_row("RFT", "Morgan", "Payments"),
        assignment_row("RFT", "Morgan", "Ledger"),
        assignment_row("RFT", "Quinn", "Mobile"),
        assignment_row("Ops", "Quinn", "Platform"),
    ];
    let owners = [
        ("Morgan", "Payments", 0.0),
        ("Morgan", "Ledger", 10.0),
        ("Quinn", "Mobile", 20.0),
        ("Quinn", "Platform", 30.0),
    ];

    let series = MetricKey::ALL
        .into_iter()
        .map(|key| {
            let rows = owners
                .iter()
                .flat_map(|(cio, owner, base)| {
                    (1..=8u32).map(move |month| {
                        let value = base + key.threshold() + f64::from(month);
                        metric_row(cio, owner, &format!("2024-{month}"), value)
                    })
                })
                .collect();
            (key, rows)
        })
        .collect();

    payloads_with(assignments, series)
}

/// Expected aligned value of [`portfolio_payloads`]
pub fn portfolio_value(owner_base: f64, key: MetricKey, month: u32) -> f64 {
    owner_base + key.threshold() + f64::from(month)
}
