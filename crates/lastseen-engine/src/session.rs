//! One host session: a tracker, a terminal sink, and running totals.

use std::io::Write;

use lastseen_core::clock::Clock;
use lastseen_core::messages::TemplateSource;
use lastseen_core::template::ANSI_RESET;
use lastseen_core::tracker::{MessageSink, Notification, PresenceTracker};
use lastseen_store::DepartureLog;
use tracing::warn;

use crate::events::{self, HostEvent};

/// Prints notifications as colored lines.
pub struct TerminalSink<W> {
    out: W,
    color: bool,
}

impl<W: Write> TerminalSink<W> {
    /// Create a sink writing to `out`. `color` toggles ANSI escapes.
    pub const fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    /// Consume the sink and return the writer.
    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> MessageSink for TerminalSink<W> {
    fn display_message(&mut self, notification: &Notification) {
        let result = if self.color {
            writeln!(
                self.out,
                "{}{}{ANSI_RESET}",
                notification.color.ansi_code(),
                notification.text
            )
        } else {
            writeln!(self.out, "{}", notification.text)
        };
        if let Err(e) = result.and_then(|()| self.out.flush()) {
            warn!(error = %e, "failed to display notification");
        }
    }
}

/// Running totals for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Tick events processed.
    pub ticks: u64,
    /// Arrivals announced.
    pub joins: u64,
    /// Departures observed between ticks.
    pub leaves: u64,
    /// Disconnect events processed.
    pub disconnects: u64,
}

/// Routes host events to a tracker and keeps totals.
pub struct HostSession<L, T, C, W> {
    tracker: PresenceTracker<L, T, C>,
    sink: TerminalSink<W>,
    stats: SessionStats,
}

impl<L, T, C, W> HostSession<L, T, C, W>
where
    L: DepartureLog,
    T: TemplateSource,
    C: Clock,
    W: Write,
{
    /// Create a session around a tracker and a sink.
    pub const fn new(tracker: PresenceTracker<L, T, C>, sink: TerminalSink<W>) -> Self {
        Self {
            tracker,
            sink,
            stats: SessionStats {
                ticks: 0,
                joins: 0,
                leaves: 0,
                disconnects: 0,
            },
        }
    }

    /// Apply one host event.
    pub fn handle(&mut self, event: &HostEvent) {
        match event {
            HostEvent::Tick {
                scope,
                local,
                members,
            } => {
                let roster = events::snapshot(members);
                let summary = self.tracker.on_tick(&roster, scope, *local, &mut self.sink);
                self.stats.ticks = self.stats.ticks.saturating_add(1);
                self.stats.joins = self.stats.joins.saturating_add(to_u64(summary.diff.joined.len()));
                self.stats.leaves = self.stats.leaves.saturating_add(to_u64(summary.diff.left.len()));
            }
            HostEvent::Disconnect { scope, members } => {
                let roster = events::snapshot(members);
                self.tracker.on_disconnect_all(scope, &roster);
                self.stats.disconnects = self.stats.disconnects.saturating_add(1);
            }
        }
    }

    /// Parse and apply one input line. Blank lines are ignored; malformed
    /// lines are logged and skipped.
    pub fn handle_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        match HostEvent::parse_line(line) {
            Ok(event) => self.handle(&event),
            Err(e) => warn!(error = %e, line, "skipping malformed host event"),
        }
    }

    /// Totals so far.
    pub const fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Consume the session and return the sink.
    #[cfg(test)]
    pub fn into_sink(self) -> TerminalSink<W> {
        self.sink
    }
}

fn to_u64(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}
