//! Host binary for lastseen.
//!
//! Reads newline-delimited JSON host events from stdin, feeds them to a
//! [`PresenceTracker`] backed by the departure file and the message
//! template file, and prints one colored line per arrival on stdout. Logs
//! go to stderr.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `lastseen-config.yaml` (or the path given as
//!    the first argument)
//! 2. Initialize structured logging (tracing)
//! 3. Wire the departure store, template source and system clock into a
//!    tracker
//! 4. Process stdin until end of input
//! 5. Log the session totals
//!
//! [`PresenceTracker`]: lastseen_core::tracker::PresenceTracker

mod error;
mod events;
mod session;

use std::path::PathBuf;

use lastseen_core::clock::SystemClock;
use lastseen_core::config::{DEFAULT_CONFIG_PATH, LastseenConfig, LogFormat, LoggingConfig};
use lastseen_core::messages::FileTemplateSource;
use lastseen_core::tracker::PresenceTracker;
use lastseen_store::FileDepartureStore;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::session::{HostSession, TerminalSink};

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded or stdin cannot be
/// read. Problems with individual events are logged, not returned.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration.
    let config_path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let config = LastseenConfig::load_or_default(&config_path)?;

    // 2. Initialize structured logging.
    init_logging(&config.logging);

    // 3. Assemble the tracker.
    let departures = FileDepartureStore::new(&config.storage.departures_path);
    let templates = FileTemplateSource::new(&config.messages.path);
    info!(
        config = %config_path.display(),
        departures = %departures.path().display(),
        messages = %templates.path().display(),
        "lastseen-engine starting"
    );
    let tracker = PresenceTracker::new(departures, templates, SystemClock);
    let sink = TerminalSink::new(std::io::stdout(), true);
    let mut session = HostSession::new(tracker, sink);

    // 4. Process host events.
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        session.handle_line(&line);
    }

    // 5. Log results.
    let stats = session.stats();
    info!(
        ticks = stats.ticks,
        joins = stats.joins,
        leaves = stats.leaves,
        disconnects = stats.disconnects,
        "lastseen-engine shutdown complete"
    );

    Ok(())
}

/// Install the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    match config.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
