//! Departure timestamp persistence for lastseen roster tracking.
//!
//! Stores, per `(scope, member)` pair, the moment that member was last seen
//! leaving that scope. Only the most recent departure is kept.
//!
//! # Modules
//!
//! - [`departure`] -- The [`DepartureLog`] trait and
//!   [`MemoryDepartureStore`]
//! - [`document`] -- The nested `{ scope: { member: timestamp } }` document
//! - [`file_store`] -- [`FileDepartureStore`], the JSON file backend
//! - [`error`] -- [`StoreError`] for the fallible `try_*` entry points

pub mod departure;
pub mod document;
pub mod error;
pub mod file_store;

pub use departure::{DepartureLog, MemoryDepartureStore};
pub use document::DepartureDocument;
pub use error::StoreError;
pub use file_store::{DEFAULT_DEPARTURES_PATH, FileDepartureStore};
