//! Identity types for roster members and the scopes they appear in.
//!
//! A departure record is keyed by two levels of identity: the
//! [`ScopeAddress`] of the roster (usually a server address) and the
//! [`MemberId`] of the participant. Both are newtypes so the two keys can
//! never be swapped at a call site.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a roster member.
///
/// Member ids come from the host (for example a player UUID), so there is
/// no time-ordered generation here. [`MemberId::random`] exists for tests
/// and fixtures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MemberId(pub Uuid);

impl MemberId {
    /// Create a random (v4) member identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl core::fmt::Display for MemberId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MemberId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl From<Uuid> for MemberId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<MemberId> for Uuid {
    fn from(id: MemberId) -> Self {
        id.0
    }
}

/// Address identifying where a roster comes from, e.g. `play.example.net`.
///
/// Used verbatim as the outer key of the departure store, so two addresses
/// that differ only in case are distinct scopes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeAddress(String);

impl ScopeAddress {
    /// Wrap an address string.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Borrow the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ScopeAddress {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ScopeAddress {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

impl From<String> for ScopeAddress {
    fn from(address: String) -> Self {
        Self(address)
    }
}
