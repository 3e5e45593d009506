//! Host events read from stdin, one JSON object per line.
//!
//! ```json
//! {"type":"tick","scope":"mc.example.net","local":"<uuid>","members":[{"id":"<uuid>","name":"Alex"}]}
//! {"type":"disconnect","scope":"mc.example.net","members":[{"id":"<uuid>"}]}
//! ```

use lastseen_types::{MemberId, RosterSnapshot, ScopeAddress};
use serde::Deserialize;

/// One member as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RosterEntry {
    /// Member identifier.
    pub id: MemberId,
    /// Display name, if the host knows it.
    #[serde(default)]
    pub name: Option<String>,
}

/// A host notification.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// Periodic poll of the visible roster.
    Tick {
        /// Scope the roster belongs to.
        scope: ScopeAddress,
        /// The local observer's own id.
        local: MemberId,
        /// Everyone currently visible.
        #[serde(default)]
        members: Vec<RosterEntry>,
    },
    /// The observer disconnected from `scope`.
    Disconnect {
        /// Scope that was left.
        scope: ScopeAddress,
        /// The last roster seen before disconnecting.
        #[serde(default)]
        members: Vec<RosterEntry>,
    },
}

impl HostEvent {
    /// Parse one input line.
    pub fn parse_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Build a snapshot from host roster entries.
pub fn snapshot(entries: &[RosterEntry]) -> RosterSnapshot {
    let mut snapshot = RosterSnapshot::new();
    for entry in entries {
        match &entry.name {
            Some(name) => snapshot.insert_named(entry.id, name.as_str()),
            None => snapshot.insert(entry.id),
        }
    }
    snapshot
}
