//! Latest value, period-over-period delta and chart floor per metric

use dora_index::OwnerMetricBundle;
use dora_model::MetricKey;
use serde::Serialize;

/// Direction of a period-over-period change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaSign {
    /// Rounded change above zero
    Positive,
    /// Rounded change below zero
    Negative,
    /// Rounded change of zero, division by zero, or too little data
    Neutral,
}

/// Percent change between the last two aligned values
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Delta {
    /// Rounded percent; absent with fewer than two values
    pub percent: Option<f64>,
    /// Classification of the rounded percent
    pub sign: DeltaSign,
}

impl Delta {
    /// Delta for a series with fewer than two values
    pub const UNAVAILABLE: Delta = Delta {
        percent: None,
        sign: DeltaSign::Neutral,
    };

    /// Compute from an aligned series
    ///
    /// `(curr - prev) / prev * 100` rounded to two decimals. A zero `prev`
    /// yields exactly 0% rather than an infinity.
    #[must_use]
    pub fn of(series: &[f64]) -> Self {
        let [.., prev, curr] = series else {
            return Self::UNAVAILABLE;
        };
        if *prev == 0.0 {
            return Self::from_percent(0.0);
        }
        Self::from_percent(round2((curr - prev) / prev * 100.0))
    }

    fn from_percent(percent: f64) -> Self {
        let sign = if percent > 0.0 {
            DeltaSign::Positive
        } else if percent < 0.0 {
            DeltaSign::Negative
        } else {
            DeltaSign::Neutral
        };
        Self {
            percent: Some(percent),
            sign,
        }
    }

    /// Badge text: `+66.67%`, `-10%`, `0%`, or empty when unavailable
    #[must_use]
    pub fn display(&self) -> String {
        match self.percent {
            Some(p) if p > 0.0 => format!("+{p}%"),
            Some(p) => format!("{p}%"),
            None => String::new(),
        }
    }
}

/// Presentation values for one metric of one owner
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDerivation {
    /// Metric this derivation belongs to
    pub key: MetricKey,
    /// Last aligned value; absent for an empty series
    pub latest_value: Option<f64>,
    /// Period-over-period change
    pub delta: Delta,
    /// Suggested y-axis minimum
    pub chart_floor: f64,
    /// KPI reference line
    pub threshold: f64,
}

impl MetricDerivation {
    /// Derive from one aligned series
    #[must_use]
    pub fn from_series(key: MetricKey, series: &[f64]) -> Self {
        Self {
            key,
            latest_value: latest_value(series),
            delta: Delta::of(series),
            chart_floor: chart_floor(series),
            threshold: key.threshold(),
        }
    }

    /// Latest value with two decimals, empty when absent
    #[must_use]
    pub fn latest_display(&self) -> String {
        self.latest_value.map(|v| format!("{v:.2}")).unwrap_or_default()
    }

    /// Chart title
    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.key.label()
    }

    /// Whether the latest value sits above the KPI threshold
    #[must_use]
    pub fn above_threshold(&self) -> Option<bool> {
        self.latest_value.map(|v| v > self.threshold)
    }
}

/// Derive all four metrics of a bundle, in metric order
#[must_use]
pub fn derive_bundle(bundle: &OwnerMetricBundle) -> [MetricDerivation; 4] {
    MetricKey::ALL.map(|key| MetricDerivation::from_series(key, bundle.series(key)))
}

/// Last element of the series
#[inline]
#[must_use]
pub fn latest_value(series: &[f64]) -> Option<f64> {
    series.last().copied()
}

/// `max(0, floor(min(series) - 1))`; 0 for an empty series
#[must_use]
pub fn chart_floor(series: &[f64]) -> f64 {
    let min = series.iter().copied().reduce(f64::min).unwrap_or(0.0);
    (min - 1.0).floor().max(0.0)
}

/// Round to two decimals, halves toward positive infinity
fn round2(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}
