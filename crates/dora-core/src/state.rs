//! Dashboard state machine
//!
//! [`DashboardState`] holds the load phase, the current snapshot and the
//! cascading selection. It changes only through its transition methods:
//! - [`DashboardState::begin_loading`]
//! - [`DashboardState::receive_fetch_result`]
//! - [`DashboardState::select_division`], [`DashboardState::select_cio`],
//!   [`DashboardState::select_owner`]
//! - [`DashboardState::navigate_owner`]
//!
//! Selection transitions validate against the snapshot's filter index and
//! leave the state untouched when they fail. Selected names are stored in
//! their canonical display spelling.

use crate::error::{DashboardError, SelectionError};
use crate::view::OwnerView;
use dora_index::Snapshot;
use serde::Serialize;
use std::sync::Arc;

/// Load phase
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum Phase {
    /// Nothing requested yet
    #[default]
    Idle,
    /// A fetch is in flight
    Loading,
    /// The snapshot has data
    Ready,
    /// The fetch succeeded but produced nothing
    Empty,
    /// The last fetch or reshape failed
    Failed {
        /// Message for the error banner
        message: String,
    },
}

impl Phase {
    /// Check if a fetch is in flight
    #[inline]
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Error banner message, if the last refresh failed
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Failed { message } => Some(message),
            _ => None,
        }
    }
}

/// Cascading selection; a level is only set when every level above it is
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Selection {
    /// Selected division
    pub division: Option<String>,
    /// Selected CIO within the division
    pub cio: Option<String>,
    /// Selected owner within the CIO
    pub owner: Option<String>,
}

/// Previous/next owner navigation, wrapping at either end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Following owner
    Next,
    /// Preceding owner
    Previous,
}

/// Application state owned by the controller
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    phase: Phase,
    snapshot: Option<Arc<Snapshot>>,
    selection: Selection,
}

impl DashboardState {
    /// Create idle state with no snapshot
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current load phase
    #[inline]
    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Most recent successfully built snapshot
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> Option<&Arc<Snapshot>> {
        self.snapshot.as_ref()
    }

    /// Current selection
    #[inline]
    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Mark a fetch as in flight; the previous snapshot stays visible
    pub fn begin_loading(&mut self) {
        self.phase = Phase::Loading;
    }

    /// Apply the outcome of a fetch and reshape
    ///
    /// On success the snapshot is replaced and any part of the selection no
    /// longer present in the new index is cleared. On failure the previous
    /// snapshot and selection are kept.
    pub fn receive_fetch_result(&mut self, result: Result<Snapshot, DashboardError>) -> &Phase {
        match result {
            Ok(snapshot) => {
                self.selection = reconcile(&self.selection, &snapshot);
                self.phase = if snapshot.is_empty() {
                    Phase::Empty
                } else {
                    Phase::Ready
                };
                self.snapshot = Some(Arc::new(snapshot));
            }
            Err(e) => {
                self.phase = Phase::Failed {
                    message: e.user_message(),
                };
            }
        }
        &self.phase
    }

    /// Select a division, clearing CIO and owner
    ///
    /// # Errors
    /// `NoSnapshot` or `UnknownDivision`; the state is unchanged.
    pub fn select_division(&mut self, division: Option<&str>) -> Result<(), SelectionError> {
        let division = match division {
            Some(name) => {
                let snapshot = self.snapshot.as_ref().ok_or(SelectionError::NoSnapshot)?;
                let canonical = snapshot
                    .index()
                    .division_name(name)
                    .ok_or_else(|| SelectionError::UnknownDivision(name.to_string()))?;
                Some(canonical.to_string())
            }
            None => None,
        };
        self.selection = Selection {
            division,
            cio: None,
            owner: None,
        };
        Ok(())
    }

    /// Select a CIO within the selected division, clearing the owner
    ///
    /// # Errors
    /// `NoSnapshot`, `NoDivision` or `UnknownCio`; the state is unchanged.
    pub fn select_cio(&mut self, cio: Option<&str>) -> Result<(), SelectionError> {
        let cio = match cio {
            Some(name) => {
                let snapshot = self.snapshot.as_ref().ok_or(SelectionError::NoSnapshot)?;
                let division = self
                    .selection
                    .division
                    .as_deref()
                    .ok_or(SelectionError::NoDivision)?;
                let canonical = snapshot.index().cio_name(division, name).ok_or_else(|| {
                    SelectionError::UnknownCio {
                        division: division.to_string(),
                        cio: name.to_string(),
                    }
                })?;
                Some(canonical.to_string())
            }
            None => None,
        };
        self.selection.cio = cio;
        self.selection.owner = None;
        Ok(())
    }

    /// Select an owner within the selected (division, CIO) pair
    ///
    /// # Errors
    /// `NoSnapshot`, `NoDivision`, `NoCio` or `UnknownOwner`; the state is
    /// unchanged.
    pub fn select_owner(&mut self, owner: Option<&str>) -> Result<(), SelectionError> {
        let owner = match owner {
            Some(name) => {
                let (snapshot, division, cio) = self.scope()?;
                let canonical = snapshot
                    .index()
                    .owner_name(division, cio, name)
                    .ok_or_else(|| SelectionError::UnknownOwner {
                        cio: cio.to_string(),
                        owner: name.to_string(),
                    })?;
                Some(canonical.to_string())
            }
            None => None,
        };
        self.selection.owner = owner;
        Ok(())
    }

    /// Move to the previous or next owner under the selected CIO
    ///
    /// With no owner selected, `Next` picks the first and `Previous` the
    /// last. Returns the newly selected owner.
    ///
    /// # Errors
    /// `NoSnapshot`, `NoDivision`, `NoCio` or `NoOwners`; the state is
    /// unchanged.
    pub fn navigate_owner(&mut self, direction: Direction) -> Result<String, SelectionError> {
        let (snapshot, division, cio) = self.scope()?;
        let owners = snapshot.index().owners(division, cio);
        let total = owners.len();
        if total == 0 {
            return Err(SelectionError::NoOwners);
        }

        let current = self
            .selection
            .owner
            .as_deref()
            .and_then(|owner| owners.iter().position(|o| *o == owner));
        let target = match (current, direction) {
            (Some(i), Direction::Next) => (i + 1) % total,
            (Some(i), Direction::Previous) => (i + total - 1) % total,
            (None, Direction::Next) => 0,
            (None, Direction::Previous) => total - 1,
        };

        let owner = owners[target].to_string();
        self.selection.owner = Some(owner.clone());
        Ok(owner)
    }

    /// Division options in index order
    #[must_use]
    pub fn division_options(&self) -> Vec<&str> {
        self.snapshot
            .as_ref()
            .map(|s| s.index().divisions().collect())
            .unwrap_or_default()
    }

    /// CIO options under the selected division
    #[must_use]
    pub fn cio_options(&self) -> Vec<&str> {
        match (&self.snapshot, &self.selection.division) {
            (Some(snapshot), Some(division)) => snapshot.index().cios(division),
            _ => Vec::new(),
        }
    }

    /// Owner options under the selected CIO
    #[must_use]
    pub fn owner_options(&self) -> Vec<&str> {
        match self.scope() {
            Ok((snapshot, division, cio)) => snapshot.index().owners(division, cio),
            Err(_) => Vec::new(),
        }
    }

    /// View of the selected owner, if one is selected
    #[must_use]
    pub fn owner_view(&self) -> Option<OwnerView> {
        let (snapshot, division, cio) = self.scope().ok()?;
        let owner = self.selection.owner.as_deref()?;
        let owners = snapshot.index().owners(division, cio);
        let position = owners.iter().position(|o| *o == owner)? + 1;

        Some(OwnerView::new(
            division,
            cio,
            owner,
            snapshot.bundle(cio, owner),
            (position, owners.len()),
        ))
    }

    fn scope(&self) -> Result<(&Snapshot, &str, &str), SelectionError> {
        let snapshot = self.snapshot.as_deref().ok_or(SelectionError::NoSnapshot)?;
        let division = self
            .selection
            .division
            .as_deref()
            .ok_or(SelectionError::NoDivision)?;
        let cio = self.selection.cio.as_deref().ok_or(SelectionError::NoCio)?;
        Ok((snapshot, division, cio))
    }
}

/// Keep the longest prefix of the selection that still exists
fn reconcile(selection: &Selection, snapshot: &Snapshot) -> Selection {
    let index = snapshot.index();
    let division = selection
        .division
        .as_deref()
        .and_then(|d| index.division_name(d));
    let cio = division.and_then(|d| {
        selection
            .cio
            .as_deref()
            .and_then(|c| index.cio_name(d, c))
    });
    let owner = division.zip(cio).and_then(|(d, c)| {
        selection
            .owner
            .as_deref()
            .and_then(|o| index.owner_name(d, c, o))
    });

    Selection {
        division: division.map(str::to_string),
        cio: cio.map(str::to_string),
        owner: owner.map(str::to_string),
    }
}
