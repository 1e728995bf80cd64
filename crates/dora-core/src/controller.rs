//! Dashboard controller
//!
//! Owns the [`DashboardState`] and the injected [`MetricSource`]. A refresh
//! fetches all payloads, rebuilds the snapshot and feeds the outcome back
//! through [`DashboardState::receive_fetch_result`]; it never returns an
//! error, failures land in [`Phase::Failed`].

use crate::config::DashboardConfig;
use crate::error::{DashboardError, SelectionError};
use crate::state::{DashboardState, Direction, Phase};
use crate::view::OwnerView;
use dora_index::{Snapshot, SnapshotBuilder};
use dora_source::{fetch_all, MetricSource};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Dashboard controller
pub struct DashboardController {
    source: Arc<dyn MetricSource>,
    builder: SnapshotBuilder,
    fetch_timeout: Duration,
    state: DashboardState,
}

impl DashboardController {
    /// Create a controller over an injected source
    #[must_use]
    pub fn new(source: Arc<dyn MetricSource>, config: &DashboardConfig) -> Self {
        Self {
            source,
            builder: config.snapshot_builder(),
            fetch_timeout: config.fetch_timeout(),
            state: DashboardState::new(),
        }
    }

    /// Create a controller with the source named in the config
    ///
    /// # Errors
    /// `Config` if the config is invalid or the source cannot be built.
    pub async fn from_config(config: &DashboardConfig) -> Result<Self, DashboardError> {
        config.validate()?;
        let source = config.build_source().await?;
        Ok(Self::new(source, config))
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Current load phase
    #[inline]
    #[must_use]
    pub fn phase(&self) -> &Phase {
        self.state.phase()
    }

    /// Current snapshot
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> Option<&Arc<Snapshot>> {
        self.state.snapshot()
    }

    /// Description of the data source
    #[must_use]
    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    /// Fetch, reshape and publish a new snapshot
    pub async fn refresh(&mut self) -> &Phase {
        self.state.begin_loading();
        let started = Instant::now();
        let result = self.load().await;

        match &result {
            Ok(snapshot) => info!(
                source = %self.source.describe(),
                divisions = snapshot.index().division_count(),
                owners = snapshot.bundle_count(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "refresh complete"
            ),
            Err(e) => warn!(
                source = %self.source.describe(),
                error = %e,
                retryable = e.is_retryable(),
                "refresh failed"
            ),
        }
        self.receive_fetch_result(result)
    }

    /// Apply an externally produced fetch outcome
    pub fn receive_fetch_result(&mut self, result: Result<Snapshot, DashboardError>) -> &Phase {
        let phase = self.state.receive_fetch_result(result);
        debug!(?phase, "phase changed");
        phase
    }

    /// Select a division
    ///
    /// # Errors
    /// See [`DashboardState::select_division`].
    pub fn select_division(&mut self, division: Option<&str>) -> Result<(), SelectionError> {
        self.state.select_division(division)?;
        debug!(division = ?self.state.selection().division, "division selected");
        Ok(())
    }

    /// Select a CIO
    ///
    /// # Errors
    /// See [`DashboardState::select_cio`].
    pub fn select_cio(&mut self, cio: Option<&str>) -> Result<(), SelectionError> {
        self.state.select_cio(cio)?;
        debug!(cio = ?self.state.selection().cio, "cio selected");
        Ok(())
    }

    /// Select an owner
    ///
    /// # Errors
    /// See [`DashboardState::select_owner`].
    pub fn select_owner(&mut self, owner: Option<&str>) -> Result<(), SelectionError> {
        self.state.select_owner(owner)?;
        debug!(owner = ?self.state.selection().owner, "owner selected");
        Ok(())
    }

    /// Select division, CIO and owner in one step
    ///
    /// # Errors
    /// The first failing selection; earlier levels stay applied.
    pub fn select_path(
        &mut self,
        division: &str,
        cio: &str,
        owner: &str,
    ) -> Result<(), SelectionError> {
        self.select_division(Some(division))?;
        self.select_cio(Some(cio))?;
        self.select_owner(Some(owner))
    }

    /// Move to the previous or next owner
    ///
    /// # Errors
    /// See [`DashboardState::navigate_owner`].
    pub fn navigate_owner(&mut self, direction: Direction) -> Result<String, SelectionError> {
        let owner = self.state.navigate_owner(direction)?;
        debug!(?direction, %owner, "owner navigated");
        Ok(owner)
    }

    /// View of the selected owner
    #[inline]
    #[must_use]
    pub fn owner_view(&self) -> Option<OwnerView> {
        self.state.owner_view()
    }

    async fn load(&self) -> Result<Snapshot, DashboardError> {
        let payloads = fetch_all(self.source.as_ref(), self.fetch_timeout).await?;
        Ok(self.builder.build(&payloads)?)
    }
}

impl std::fmt::Debug for DashboardController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardController")
            .field("source", &self.source.describe())
            .field("builder", &self.builder)
            .field("fetch_timeout", &self.fetch_timeout)
            .field("state", &self.state)
            .finish()
    }
}
