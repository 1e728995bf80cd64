//! Render-ready view of the selected owner

use dora_index::OwnerMetricBundle;
use dora_insight::MetricDerivation;
use dora_model::MetricKey;
use serde::Serialize;

/// One chart panel
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricPanel {
    /// Metric shown
    pub key: MetricKey,
    /// Chart title
    pub label: &'static str,
    /// Values aligned to the owner's periods
    pub values: Vec<f64>,
    /// Stat badge values and axis floor
    pub derivation: MetricDerivation,
}

/// Everything needed to draw one owner's charts
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerView {
    /// Selected division
    pub division: String,
    /// Selected CIO
    pub cio: String,
    /// Selected owner
    pub owner: String,
    /// 1-based position among the CIO's owners
    pub position: usize,
    /// Number of owners under the CIO
    pub total: usize,
    /// Shared x-axis labels
    pub periods: Vec<String>,
    /// One panel per metric, in metric order
    pub panels: Vec<MetricPanel>,
}

impl OwnerView {
    /// Build from the owner's bundle; an owner without metric rows gets
    /// empty panels
    #[must_use]
    pub fn new(
        division: &str,
        cio: &str,
        owner: &str,
        bundle: Option<&OwnerMetricBundle>,
        (position, total): (usize, usize),
    ) -> Self {
        let panels = MetricKey::ALL
            .into_iter()
            .map(|key| {
                let values = bundle.map(|b| b.series(key).to_vec()).unwrap_or_default();
                MetricPanel {
                    key,
                    label: key.label(),
                    derivation: MetricDerivation::from_series(key, &values),
                    values,
                }
            })
            .collect();

        Self {
            division: division.to_string(),
            cio: cio.to_string(),
            owner: owner.to_string(),
            position,
            total,
            periods: bundle.map(|b| b.periods().to_vec()).unwrap_or_default(),
            panels,
        }
    }

    /// Check if there is nothing to chart
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Panel of one metric
    #[must_use]
    pub fn panel(&self, key: MetricKey) -> Option<&MetricPanel> {
        self.panels.iter().find(|p| p.key == key)
    }

    /// "owner i of n" caption
    #[must_use]
    pub fn position_caption(&self) -> String {
        format!("{} of {}", self.position, self.total)
    }
}
