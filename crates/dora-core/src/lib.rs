//! DORA Pulse Core - dashboard controller
//!
//! Ties the workspace together:
//! - Loads [`DashboardConfig`] from TOML
//! - Fetches payloads through an injected [`MetricSource`]
//! - Rebuilds the snapshot and publishes it to [`DashboardState`]
//! - Validates cascading selections and owner navigation
//! - Produces render-ready [`OwnerView`]s
//!
//! # Example
//!
//! ```rust,ignore
//! use dora_core::{DashboardConfig, DashboardController, Phase};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DashboardConfig::load("dora.toml")?;
//! let mut controller = DashboardController::from_config(&config).await?;
//!
//! if controller.refresh().await == &Phase::Ready {
//!     controller.select_path("RFT", "Morgan", "Payments")?;
//!     if let Some(view) = controller.owner_view() {
//!         println!("{} ({})", view.owner, view.position_caption());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

// Core modules
pub mod config;
pub mod controller;
pub mod error;
pub mod state;
pub mod view;

// Re-exports for convenience
pub use config::{DashboardConfig, SourceConfig};
pub use controller::DashboardController;
pub use error::{ConfigError, DashboardError, SelectionError};
pub use state::{DashboardState, Direction, Phase, Selection};
pub use view::{MetricPanel, OwnerView};

pub use dora_index::{FilterIndex, Snapshot, SnapshotBuilder};
pub use dora_insight::{Delta, DeltaSign, MetricDerivation};
pub use dora_model::{IdentityPolicy, MetricKey};
pub use dora_source::{HttpMetricSource, HttpSourceConfig, MetricSource, StaticMetricSource};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with DORA Pulse Core
    pub use crate::{
        DashboardConfig, DashboardController, DashboardError, Direction, MetricKey, OwnerView,
        Phase, SelectionError,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
