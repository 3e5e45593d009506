//! Shared type definitions for lastseen roster tracking.
//!
//! # Modules
//!
//! - [`ids`] -- [`MemberId`] and [`ScopeAddress`], the two levels of
//!   departure-record identity
//! - [`time`] -- Minute-resolution [`Timestamp`] and [`Elapsed`] spans
//! - [`roster`] -- [`RosterSnapshot`] and the [`RosterDiff`] between polls

pub mod ids;
pub mod roster;
pub mod time;

pub use ids::{MemberId, ScopeAddress};
pub use roster::{RosterDiff, RosterSnapshot};
pub use time::{Elapsed, Timestamp, TimestampParseError};
