//! Minute-resolution local timestamps and elapsed-time decomposition.
//!
//! Departure times are stored as local wall-clock values without a time
//! zone, at day/month/year/hour/minute resolution. The canonical string
//! form is `YYYY-MM-DDTHH:MM`, and [`Timestamp::parse`] is the exact inverse
//! of [`Timestamp`]'s `Display` implementation.

use core::str::FromStr;

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Canonical serialization format (minute resolution).
const CANONICAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Longer ISO-8601 local form with seconds and optional fraction.
///
/// Accepted on parse only; the extra precision is truncated.
const EXTENDED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Minutes in one hour.
const MINUTES_PER_HOUR: u64 = 60;

/// Minutes in one day.
const MINUTES_PER_DAY: u64 = 1440;

/// Errors that can occur when parsing a stored timestamp string.
#[derive(Debug, thiserror::Error)]
#[error("invalid timestamp {input:?}: {source}")]
pub struct TimestampParseError {
    /// The string that failed to parse.
    pub input: String,
    /// The underlying chrono parse error.
    pub source: chrono::ParseError,
}

/// A local date-time truncated to the minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// Build a timestamp from any naive date-time, dropping seconds and
    /// sub-second precision.
    pub fn from_naive(value: NaiveDateTime) -> Self {
        let truncated = value
            .with_second(0)
            .and_then(|v| v.with_nanosecond(0))
            .unwrap_or(value);
        Self(truncated)
    }

    /// Build a timestamp from calendar components.
    ///
    /// Returns `None` if any component is out of range.
    pub fn from_ymd_hm(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, minute, 0))
            .map(Self)
    }

    /// The current local wall-clock time.
    pub fn now_local() -> Self {
        Self::from_naive(Local::now().naive_local())
    }

    /// Parse a stored timestamp string.
    ///
    /// Accepts the canonical `YYYY-MM-DDTHH:MM` form as well as the longer
    /// `YYYY-MM-DDTHH:MM:SS[.fff]` form.
    pub fn parse(input: &str) -> Result<Self, TimestampParseError> {
        let trimmed = input.trim();
        NaiveDateTime::parse_from_str(trimmed, CANONICAL_FORMAT)
            .or_else(|_err| NaiveDateTime::parse_from_str(trimmed, EXTENDED_FORMAT))
            .map(Self::from_naive)
            .map_err(|source| TimestampParseError {
                input: input.to_owned(),
                source,
            })
    }

    /// Calendar year.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Month of the year, 1-12.
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Day of the month, 1-31.
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Hour of the day, 0-23.
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    /// Minute of the hour, 0-59.
    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// Time elapsed from `self` until `later`.
    pub fn elapsed_until(&self, later: &Self) -> Elapsed {
        Elapsed::between(self, later)
    }

    /// Return a timestamp shifted forward by `minutes`.
    ///
    /// Returns `None` if the result falls outside chrono's date range.
    pub fn checked_add_minutes(&self, minutes: i64) -> Option<Self> {
        chrono::TimeDelta::try_minutes(minutes)
            .and_then(|delta| self.0.checked_add_signed(delta))
            .map(Self)
    }
}

impl core::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0.format(CANONICAL_FORMAT))
    }
}

impl FromStr for Timestamp {
    type Err = TimestampParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Timestamp {
    type Error = TimestampParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Timestamp> for String {
    fn from(value: Timestamp) -> Self {
        value.to_string()
    }
}

/// A non-negative span broken down into whole days, hours and minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Elapsed {
    /// Whole days.
    pub days: u64,
    /// Remaining hours after whole days, 0-23.
    pub hours: u64,
    /// Remaining minutes after whole hours, 0-59.
    pub minutes: u64,
}

impl Elapsed {
    /// Decompose the span from `earlier` to `later`.
    ///
    /// A negative span (the clock moved backwards) yields zero.
    pub fn between(earlier: &Timestamp, later: &Timestamp) -> Self {
        let total = later.0.signed_duration_since(earlier.0).num_minutes();
        Self::from_minutes(u64::try_from(total).unwrap_or(0))
    }

    /// Decompose a total number of minutes.
    pub fn from_minutes(total: u64) -> Self {
        let days = total.checked_div(MINUTES_PER_DAY).unwrap_or(0);
        let rem = total.checked_rem(MINUTES_PER_DAY).unwrap_or(0);
        Self {
            days,
            hours: rem.checked_div(MINUTES_PER_HOUR).unwrap_or(0),
            minutes: rem.checked_rem(MINUTES_PER_HOUR).unwrap_or(0),
        }
    }
}

impl core::fmt::Display for Elapsed {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} days {} hours {} minutes",
            self.days, self.hours, self.minutes
        )
    }
}
