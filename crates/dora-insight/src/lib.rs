//! DORA Pulse metric derivation
//!
//! Pure functions from one owner's aligned series to the values a chart
//! widget and its stat badges need: latest value, period-over-period delta
//! with sign, and a y-axis floor. Nothing here performs I/O or keeps state.

#![warn(unreachable_pub)]

pub mod derivation;

pub use derivation::{
    chart_floor, derive_bundle, latest_value, Delta, DeltaSign, MetricDerivation,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
