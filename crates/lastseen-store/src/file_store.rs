//! File-backed departure store.
//!
//! The whole document lives in one pretty-printed JSON file. Every record
//! is a read-modify-write of the entire file: fine for the expected volume
//! (members times scopes), but not crash-atomic and not safe against a
//! second process writing the same file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use lastseen_types::{MemberId, ScopeAddress, Timestamp};

use crate::departure::DepartureLog;
use crate::document::DepartureDocument;
use crate::error::StoreError;

/// Default store location, relative to the working directory.
pub const DEFAULT_DEPARTURES_PATH: &str = "lastseen-departures.json";

/// A [`DepartureLog`] persisted to a single JSON file.
///
/// Nothing touches the disk until the first departure is recorded; the
/// file and its parent directory are created lazily at that point.
#[derive(Debug, Clone)]
pub struct FileDepartureStore {
    path: PathBuf,
}

impl FileDepartureStore {
    /// Create a store bound to `path`. Does not touch the filesystem.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole document.
    ///
    /// Returns `Ok(None)` if the file does not exist. An empty file reads as
    /// an empty document. Entries of the wrong shape are skipped and logged;
    /// only a file that is not a JSON object at all is an error.
    pub fn read_document(&self) -> Result<Option<DepartureDocument>, StoreError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if contents.trim().is_empty() {
            return Ok(Some(DepartureDocument::new()));
        }

        let value: serde_json::Value =
            serde_json::from_str(&contents).map_err(|source| StoreError::Malformed {
                path: self.path.clone(),
                source,
            })?;

        DepartureDocument::from_json(value)
            .map(Some)
            .ok_or_else(|| StoreError::NotAnObject {
                path: self.path.clone(),
            })
    }

    /// Overwrite the file with `document`, creating the parent directory if
    /// needed.
    pub fn write_document(&self, document: &DepartureDocument) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let contents = serde_json::to_string_pretty(document)?;
        std::fs::write(&self.path, contents).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }

    /// Record a departure, reporting any failure to the caller.
    ///
    /// A file that is not a JSON object is replaced by a fresh document;
    /// a file that cannot be read at all is left untouched.
    pub fn try_record_departure(
        &self,
        scope: &ScopeAddress,
        member: MemberId,
        at: Timestamp,
    ) -> Result<(), StoreError> {
        let mut document = match self.read_document() {
            Ok(document) => document.unwrap_or_default(),
            Err(e @ (StoreError::Malformed { .. } | StoreError::NotAnObject { .. })) => {
                tracing::warn!(error = %e, "discarding unreadable departure store");
                DepartureDocument::new()
            }
            Err(e) => return Err(e),
        };

        document.set(scope, member, at);
        self.write_document(&document)?;

        tracing::debug!(%scope, %member, %at, path = %self.path.display(), "Recorded departure");
        Ok(())
    }

    /// Look up a departure, reporting any failure to the caller.
    ///
    /// A missing file, scope, or member is `Ok(None)`.
    pub fn try_lookup_departure(
        &self,
        scope: &ScopeAddress,
        member: MemberId,
    ) -> Result<Option<Timestamp>, StoreError> {
        let Some(document) = self.read_document()? else {
            return Ok(None);
        };
        let Some(raw) = document.get(scope, member) else {
            return Ok(None);
        };

        Timestamp::parse(raw)
            .map(Some)
            .map_err(|source| StoreError::Timestamp {
                scope: scope.to_string(),
                member: member.to_string(),
                source,
            })
    }
}

impl Default for FileDepartureStore {
    fn default() -> Self {
        Self::new(DEFAULT_DEPARTURES_PATH)
    }
}

impl DepartureLog for FileDepartureStore {
    fn record_departure(&mut self, scope: &ScopeAddress, member: MemberId, at: Timestamp) {
        if let Err(e) = self.try_record_departure(scope, member, at) {
            tracing::warn!(%scope, %member, error = %e, "departure not recorded");
        }
    }

    fn lookup_departure(&self, scope: &ScopeAddress, member: MemberId) -> Option<Timestamp> {
        self.try_lookup_departure(scope, member).unwrap_or_else(|e| {
            tracing::warn!(%scope, %member, error = %e, "departure lookup failed");
            None
        })
    }
}
