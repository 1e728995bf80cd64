//! DORA Pulse model types
//!
//! The vocabulary shared by every other crate in the workspace:
//! - [`MetricKey`]: the four tracked delivery-performance series
//! - [`AssignmentRecord`] / [`MetricRecord`]: defensively parsed wire records
//! - [`PeriodKey`]: date-aware ordering for opaque period labels
//! - [`IdentityPolicy`]: how CIO/owner names collapse into lookup keys
//! - [`RawPayloads`]: untyped upstream payloads, tagged by metric
//!
//! # Example
//!
//! ```rust
//! use dora_model::{MetricKey, PeriodKey};
//!
//! assert_eq!(MetricKey::ALL.len(), 4);
//! assert!(PeriodKey::parse("2024-2") < PeriodKey::parse("2024-10"));
//! ```

#![warn(unreachable_pub)]

pub mod error;
pub mod identity;
pub mod metric;
pub mod payload;
pub mod period;
pub mod record;

pub use error::{InputName, MalformedInput};
pub use identity::IdentityPolicy;
pub use metric::{MetricKey, UnknownMetricKey};
pub use payload::RawPayloads;
pub use period::{parse_period_date, PeriodKey};
pub use record::{coerce_value, AssignmentRecord, MetricRecord, UNKNOWN};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with DORA Pulse model types
    pub use crate::{
        AssignmentRecord, IdentityPolicy, InputName, MalformedInput, MetricKey, MetricRecord,
        PeriodKey, RawPayloads,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
