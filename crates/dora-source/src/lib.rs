//! DORA Pulse data sources
//!
//! All network I/O lives behind the [`MetricSource`] trait so the reshaping
//! and derivation crates stay testable without a live upstream:
//! - [`HttpMetricSource`]: JSON HTTP API via reqwest
//! - [`StaticMetricSource`]: in-memory or fixture-file payloads
//! - [`fetch_all`]: concurrent, all-or-nothing, time-bounded fetch of the
//!   five payloads
//!
//! # Example
//!
//! ```rust,ignore
//! use dora_source::{fetch_all, HttpMetricSource, HttpSourceConfig};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = HttpMetricSource::new(HttpSourceConfig::default())?;
//! let payloads = fetch_all(&source, Duration::from_secs(30)).await?;
//! println!("fetched {} series", payloads.series.len());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod error;
pub mod fetch;
pub mod fixture;
pub mod http;
pub mod source;

pub use error::SourceError;
pub use fetch::fetch_all;
pub use fixture::StaticMetricSource;
pub use http::{HttpMetricSource, HttpSourceConfig};
pub use source::{Endpoint, MetricSource};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
