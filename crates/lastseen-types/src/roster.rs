//! Roster snapshots and the arrival/departure diff between two of them.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::ids::MemberId;

/// The complete set of members present at one poll instant.
///
/// Membership is a set, so duplicates collapse. Display names are optional
/// decoration supplied by the host and never take part in diffing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSnapshot {
    members: BTreeSet<MemberId>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    display_names: BTreeMap<MemberId, String>,
}

impl RosterSnapshot {
    /// Create an empty snapshot.
    pub const fn new() -> Self {
        Self {
            members: BTreeSet::new(),
            display_names: BTreeMap::new(),
        }
    }

    /// Add a member without a display name.
    pub fn insert(&mut self, member: MemberId) {
        self.members.insert(member);
    }

    /// Add a member together with the name the host shows for it.
    pub fn insert_named(&mut self, member: MemberId, name: impl Into<String>) {
        self.members.insert(member);
        self.display_names.insert(member, name.into());
    }

    /// Whether `member` is present.
    pub fn contains(&self, member: MemberId) -> bool {
        self.members.contains(&member)
    }

    /// Display name for `member`, if the host supplied one.
    pub fn display_name(&self, member: MemberId) -> Option<&str> {
        self.display_names.get(&member).map(String::as_str)
    }

    /// Number of members present.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether nobody is present.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterate over present members in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = MemberId> + '_ {
        self.members.iter().copied()
    }

    /// Compute who joined and who left going from `self` to `current`.
    pub fn diff(&self, current: &Self) -> RosterDiff {
        RosterDiff {
            joined: current.members.difference(&self.members).copied().collect(),
            left: self.members.difference(&current.members).copied().collect(),
        }
    }
}

impl FromIterator<MemberId> for RosterSnapshot {
    fn from_iter<I: IntoIterator<Item = MemberId>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().collect(),
            display_names: BTreeMap::new(),
        }
    }
}

/// Membership transitions between two consecutive snapshots.
///
/// Both lists are in ascending [`MemberId`] order, but callers should not
/// depend on any particular order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterDiff {
    /// Members present now but not in the previous snapshot.
    pub joined: Vec<MemberId>,
    /// Members present previously but not now.
    pub left: Vec<MemberId>,
}

impl RosterDiff {
    /// Whether nothing changed.
    pub fn is_empty(&self) -> bool {
        self.joined.is_empty() && self.left.is_empty()
    }
}
