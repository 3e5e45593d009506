//! Wall-clock source for departure and arrival times.
//!
//! The tracker never calls the system clock directly, so tests and replay
//! tools can pin "now" with [`FixedClock`].

use std::cell::Cell;
use std::rc::Rc;

use lastseen_types::Timestamp;

/// A source of the current local time.
pub trait Clock {
    /// The current time, truncated to the minute.
    fn now(&self) -> Timestamp;
}

/// Reads the host's local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now_local()
    }
}

/// A manually driven clock.
///
/// Clones share the same instant, so a test can keep one handle and pass
/// another to the tracker.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Rc<Cell<Timestamp>>,
}

impl FixedClock {
    /// Create a clock stopped at `at`.
    pub fn new(at: Timestamp) -> Self {
        Self {
            now: Rc::new(Cell::new(at)),
        }
    }

    /// Move the clock to `at`.
    pub fn set(&self, at: Timestamp) {
        self.now.set(at);
    }

    /// Move the clock forward by `minutes`.
    ///
    /// Leaves the clock unchanged if the result would be out of range.
    pub fn advance_minutes(&self, minutes: i64) {
        if let Some(next) = self.now.get().checked_add_minutes(minutes) {
            self.now.set(next);
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.now.get()
    }
}
