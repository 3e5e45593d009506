//! Error types for the departure store.
//!
//! These errors only surface through the `try_*` methods of
//! [`FileDepartureStore`](crate::FileDepartureStore). The
//! [`DepartureLog`](crate::DepartureLog) entry points log them and degrade
//! to a no-op or an absent result.

use std::path::PathBuf;

/// Errors that can occur while reading or writing the departure store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store file exists but could not be read.
    #[error("failed to read departure store {}: {source}", path.display())]
    Read {
        /// Path of the store file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The directory holding the store file could not be created.
    #[error("failed to create store directory {}: {source}", path.display())]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The store file could not be written.
    #[error("failed to write departure store {}: {source}", path.display())]
    Write {
        /// Path of the store file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The store file is not a valid departure document.
    #[error("malformed departure store {}: {source}", path.display())]
    Malformed {
        /// Path of the store file.
        path: PathBuf,
        /// The underlying parse error.
        source: serde_json::Error,
    },

    /// The store file is valid JSON but its top level is not an object.
    #[error("departure store {} is not a JSON object", path.display())]
    NotAnObject {
        /// Path of the store file.
        path: PathBuf,
    },

    /// A stored value is not a valid timestamp.
    #[error("bad timestamp for {member} on {scope}: {source}")]
    Timestamp {
        /// Scope key of the entry.
        scope: String,
        /// Member key of the entry.
        member: String,
        /// The underlying parse error.
        source: lastseen_types::TimestampParseError,
    },

    /// The document could not be serialized.
    #[error("failed to serialize departure store: {0}")]
    Serialize(#[from] serde_json::Error),
}
