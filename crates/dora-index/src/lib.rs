//! DORA Pulse filter index
//!
//! Turns the raw assignment and metric payloads of one fetch into a read-only
//! [`Snapshot`]:
//! - a cascading [`FilterIndex`] (division -> CIO -> owner, first-seen order)
//! - one [`OwnerMetricBundle`] per (CIO, owner) with the four series aligned to
//!   the owner's most recent periods
//!
//! # Example
//!
//! ```rust
//! use dora_index::SnapshotBuilder;
//! use dora_model::{MetricKey, RawPayloads};
//! use serde_json::json;
//!
//! let mut payloads = RawPayloads::new(json!([
//!     { "Division": "RFT", "CIO": "A", "Portfolio_Owner": "X" }
//! ]));
//! for key in MetricKey::ALL {
//!     payloads = payloads.with_series(key, json!([]));
//! }
//!
//! let snapshot = SnapshotBuilder::new().build(&payloads).unwrap();
//! assert_eq!(snapshot.index().owners("RFT", "A"), ["X"]);
//! ```

#![warn(unreachable_pub)]

pub mod builder;
pub mod bundle;
pub mod filter;
pub mod snapshot;

pub use builder::{SnapshotBuilder, DEFAULT_MAX_PERIODS};
pub use bundle::{OwnerKey, OwnerMetricBundle};
pub use filter::{CioEntry, DivisionEntry, FilterIndex};
pub use snapshot::Snapshot;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
