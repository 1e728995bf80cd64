//! Cascading division -> CIO -> owner filter index
//!
//! Every level keeps first-seen insertion order, which is the order options
//! appear in the selection controls. Keys are normalized through the index's
//! [`IdentityPolicy`]; the first spelling seen is kept for display.

use dora_model::{AssignmentRecord, IdentityPolicy};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// Ordered lookup structure for the selection controls
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterIndex {
    #[serde(skip)]
    policy: IdentityPolicy,
    #[serde(serialize_with = "values_as_seq")]
    divisions: IndexMap<String, DivisionEntry>,
}

/// One division and its CIOs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DivisionEntry {
    /// Display name (first spelling seen)
    pub name: String,
    #[serde(serialize_with = "values_as_seq")]
    cios: IndexMap<String, CioEntry>,
}

/// One CIO within a division and its owners
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CioEntry {
    /// Display name (first spelling seen)
    pub name: String,
    #[serde(serialize_with = "values_as_seq")]
    owners: IndexMap<String, String>,
}

impl DivisionEntry {
    /// CIO entries in first-seen order
    pub fn cios(&self) -> impl Iterator<Item = &CioEntry> {
        self.cios.values()
    }
}

impl CioEntry {
    /// Owner display names in first-seen order
    pub fn owners(&self) -> impl Iterator<Item = &str> {
        self.owners.values().map(String::as_str)
    }
}

impl FilterIndex {
    /// Create empty index
    #[inline]
    #[must_use]
    pub fn new(policy: IdentityPolicy) -> Self {
        Self {
            policy,
            divisions: IndexMap::new(),
        }
    }

    /// Identity policy used for keys
    #[inline]
    #[must_use]
    pub fn policy(&self) -> IdentityPolicy {
        self.policy
    }

    /// Insert one assignment
    ///
    /// Returns `true` if the owner was not yet present under its
    /// (division, CIO) pair.
    pub fn insert(&mut self, record: &AssignmentRecord) -> bool {
        let division = self
            .divisions
            .entry(self.policy.key(&record.division).into_owned())
            .or_insert_with(|| DivisionEntry {
                name: record.division.clone(),
                cios: IndexMap::new(),
            });

        let cio = division
            .cios
            .entry(self.policy.key(&record.cio).into_owned())
            .or_insert_with(|| CioEntry {
                name: record.cio.clone(),
                owners: IndexMap::new(),
            });

        let owner_key = self.policy.key(&record.owner).into_owned();
        if cio.owners.contains_key(&owner_key) {
            return false;
        }
        cio.owners.insert(owner_key, record.owner.clone());
        true
    }

    /// Division entries in first-seen order
    pub fn entries(&self) -> impl Iterator<Item = &DivisionEntry> {
        self.divisions.values()
    }

    /// Division display names in first-seen order
    pub fn divisions(&self) -> impl Iterator<Item = &str> {
        self.divisions.values().map(|d| d.name.as_str())
    }

    /// CIO display names under a division (empty if unknown)
    #[must_use]
    pub fn cios(&self, division: &str) -> Vec<&str> {
        self.division_entry(division)
            .map(|d| d.cios.values().map(|c| c.name.as_str()).collect())
            .unwrap_or_default()
    }

    /// Owner display names under a (division, CIO) pair (empty if unknown)
    #[must_use]
    pub fn owners(&self, division: &str, cio: &str) -> Vec<&str> {
        self.cio_entry(division, cio)
            .map(|c| c.owners().collect())
            .unwrap_or_default()
    }

    /// Canonical display name of a division
    #[must_use]
    pub fn division_name(&self, division: &str) -> Option<&str> {
        self.division_entry(division).map(|d| d.name.as_str())
    }

    /// Canonical display name of a CIO within a division
    #[must_use]
    pub fn cio_name(&self, division: &str, cio: &str) -> Option<&str> {
        self.cio_entry(division, cio).map(|c| c.name.as_str())
    }

    /// Canonical display name of an owner within a (division, CIO) pair
    #[must_use]
    pub fn owner_name(&self, division: &str, cio: &str, owner: &str) -> Option<&str> {
        self.cio_entry(division, cio)
            .and_then(|c| c.owners.get(self.policy.key(owner).as_ref()))
            .map(String::as_str)
    }

    /// Every (division, CIO, owner) triple, in index order
    pub fn triples(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.divisions.values().flat_map(|d| {
            d.cios.values().flat_map(move |c| {
                c.owners
                    .values()
                    .map(move |o| (d.name.as_str(), c.name.as_str(), o.as_str()))
            })
        })
    }

    /// Number of divisions
    #[inline]
    #[must_use]
    pub fn division_count(&self) -> usize {
        self.divisions.len()
    }

    /// Number of (division, CIO, owner) triples
    #[must_use]
    pub fn owner_count(&self) -> usize {
        self.triples().count()
    }

    /// Check if nothing has been indexed
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.divisions.is_empty()
    }

    fn division_entry(&self, division: &str) -> Option<&DivisionEntry> {
        self.divisions.get(self.policy.key(division).as_ref())
    }

    fn cio_entry(&self, division: &str, cio: &str) -> Option<&CioEntry> {
        self.division_entry(division)
            .and_then(|d| d.cios.get(self.policy.key(cio).as_ref()))
    }
}

impl<'a> Extend<&'a AssignmentRecord> for FilterIndex {
    fn extend<I: IntoIterator<Item = &'a AssignmentRecord>>(&mut self, iter: I) {
        for record in iter {
            self.insert(record);
        }
    }
}

fn values_as_seq<S, V>(map: &IndexMap<String, V>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize,
{
    serializer.collect_seq(map.values())
}
