//! The [`DepartureLog`] trait and its in-memory implementation.

use lastseen_types::{MemberId, ScopeAddress, Timestamp};

use crate::document::DepartureDocument;

/// Persistent record of when each member last left each scope.
///
/// Both operations are infallible from the caller's point of view.
/// Implementations backed by fallible storage log the failure and degrade:
/// a failed record leaves the store unchanged, a failed lookup reports no
/// prior departure.
pub trait DepartureLog {
    /// Record that `member` left `scope` at `at`, replacing any earlier
    /// departure for the same pair.
    fn record_departure(&mut self, scope: &ScopeAddress, member: MemberId, at: Timestamp);

    /// The most recent recorded departure of `member` from `scope`.
    fn lookup_departure(&self, scope: &ScopeAddress, member: MemberId) -> Option<Timestamp>;
}

/// A [`DepartureLog`] that keeps its document in process memory.
///
/// Values are stored in the same string form as the file store, so a
/// malformed value inserted with [`DepartureDocument::set_raw`] behaves the
/// same way: the lookup reports absent.
#[derive(Debug, Clone, Default)]
pub struct MemoryDepartureStore {
    document: DepartureDocument,
}

impl MemoryDepartureStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            document: DepartureDocument::new(),
        }
    }

    /// Create a store pre-populated with `document`.
    pub const fn with_document(document: DepartureDocument) -> Self {
        Self { document }
    }

    /// Borrow the underlying document.
    pub const fn document(&self) -> &DepartureDocument {
        &self.document
    }
}

impl DepartureLog for MemoryDepartureStore {
    fn record_departure(&mut self, scope: &ScopeAddress, member: MemberId, at: Timestamp) {
        self.document.set(scope, member, at);
    }

    fn lookup_departure(&self, scope: &ScopeAddress, member: MemberId) -> Option<Timestamp> {
        let raw = self.document.get(scope, member)?;
        match Timestamp::parse(raw) {
            Ok(at) => Some(at),
            Err(e) => {
                tracing::warn!(%scope, %member, error = %e, "ignoring malformed departure");
                None
            }
        }
    }
}
