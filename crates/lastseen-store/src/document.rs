//! The in-memory shape of the departure store.
//!
//! Structurally `{ scope: { member: timestamp } }`, with every key and value
//! kept as a plain string so the on-disk form round-trips exactly. Sorted
//! maps keep the serialized file stable between writes.
//!
//! Loading is lenient: a scope that is not an object or a value that is not
//! a string is dropped on its own, so one bad entry never hides the rest.

use std::collections::BTreeMap;

use lastseen_types::{MemberId, ScopeAddress, Timestamp};
use serde::Serialize;
use serde_json::Value;

/// Departure entries for one scope, keyed by member id string.
pub type ScopeEntries = BTreeMap<String, String>;

/// Two-level mapping from scope address to member id to timestamp string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DepartureDocument(BTreeMap<String, ScopeEntries>);

impl DepartureDocument {
    /// Create an empty document.
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Build a document from parsed JSON, skipping entries of the wrong
    /// shape.
    ///
    /// Returns `None` if the top level is not an object.
    pub fn from_json(value: Value) -> Option<Self> {
        let Value::Object(scopes) = value else {
            return None;
        };

        let mut document = Self::new();
        for (scope, entries) in scopes {
            let Value::Object(entries) = entries else {
                tracing::warn!(%scope, "skipping departure scope that is not an object");
                continue;
            };
            let kept: ScopeEntries = entries
                .into_iter()
                .filter_map(|(member, value)| match value {
                    Value::String(at) => Some((member, at)),
                    _ => {
                        tracing::warn!(
                            %scope,
                            %member,
                            "skipping departure value that is not a string"
                        );
                        None
                    }
                })
                .collect();
            document.0.insert(scope, kept);
        }
        Some(document)
    }

    /// Raw stored value for `(scope, member)`, if present.
    pub fn get(&self, scope: &ScopeAddress, member: MemberId) -> Option<&str> {
        self.0
            .get(scope.as_str())
            .and_then(|entries| entries.get(&member.to_string()))
            .map(String::as_str)
    }

    /// Set or overwrite the departure for `(scope, member)`.
    ///
    /// The scope's sub-mapping is created on first use.
    pub fn set(&mut self, scope: &ScopeAddress, member: MemberId, at: Timestamp) {
        self.0
            .entry(scope.as_str().to_owned())
            .or_default()
            .insert(member.to_string(), at.to_string());
    }

    /// Entries recorded under `scope`.
    pub fn scope(&self, scope: &ScopeAddress) -> Option<&ScopeEntries> {
        self.0.get(scope.as_str())
    }

    /// Number of scopes with at least one sub-mapping.
    pub fn scope_count(&self) -> usize {
        self.0.len()
    }

    /// Insert a raw string value, bypassing timestamp formatting.
    ///
    /// Used to load or fabricate documents that may hold malformed values.
    pub fn set_raw(&mut self, scope: &str, member: &str, value: &str) {
        self.0
            .entry(scope.to_owned())
            .or_default()
            .insert(member.to_owned(), value.to_owned());
    }
}
