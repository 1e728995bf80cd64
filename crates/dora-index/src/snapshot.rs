//! Read-only result of one full reshape

use crate::bundle::{OwnerKey, OwnerMetricBundle};
use crate::filter::FilterIndex;
use dora_model::IdentityPolicy;
use indexmap::IndexMap;

/// Filter index plus per-owner bundles, built once per fetch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub(crate) index: FilterIndex,
    pub(crate) bundles: IndexMap<OwnerKey, OwnerMetricBundle>,
}

impl Snapshot {
    /// Filter index for the selection controls
    #[inline]
    #[must_use]
    pub fn index(&self) -> &FilterIndex {
        &self.index
    }

    /// Identity policy the snapshot was built with
    #[inline]
    #[must_use]
    pub fn policy(&self) -> IdentityPolicy {
        self.index.policy()
    }

    /// Look up one owner's bundle by display or key spelling
    #[must_use]
    pub fn bundle(&self, cio: &str, owner: &str) -> Option<&OwnerMetricBundle> {
        self.bundles.get(&OwnerKey::new(self.policy(), cio, owner))
    }

    /// All bundles in first-seen order
    pub fn bundles(&self) -> impl Iterator<Item = (&OwnerKey, &OwnerMetricBundle)> {
        self.bundles.iter()
    }

    /// Number of owner bundles
    #[inline]
    #[must_use]
    pub fn bundle_count(&self) -> usize {
        self.bundles.len()
    }

    /// Check if neither assignments nor metrics produced anything
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty() && self.bundles.is_empty()
    }
}
