//! Error types for the host binary.
//!
//! [`EngineError`] covers startup and input failures. Per-event problems
//! (a malformed line, an unwritable store) are logged and never reach it.

/// Top-level error for the host binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: lastseen_core::config::ConfigError,
    },

    /// Reading host events from stdin failed.
    #[error("input error: {source}")]
    Input {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
