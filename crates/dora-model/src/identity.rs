//! Identity normalization for division, CIO and owner names

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// How raw names collapse into lookup keys
///
/// One policy is chosen per snapshot and applied to every insert and every
/// lookup; mixing policies would let `Alice` and `alice` collide in one place
/// and not in another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdentityPolicy {
    /// Case preserved; only surrounding whitespace is trimmed
    #[default]
    Exact,
    /// Trimmed and lower-cased
    CaseInsensitive,
}

impl IdentityPolicy {
    /// Normalize a raw name into its lookup key
    #[must_use]
    pub fn key<'a>(&self, raw: &'a str) -> Cow<'a, str> {
        let trimmed = raw.trim();
        match self {
            Self::Exact => Cow::Borrowed(trimmed),
            Self::CaseInsensitive if trimmed.chars().any(char::is_uppercase) => {
                Cow::Owned(trimmed.to_lowercase())
            }
            Self::CaseInsensitive => Cow::Borrowed(trimmed),
        }
    }
}
