//! Presence tracking, arrival templates, and configuration for lastseen.
//!
//! This crate owns the per-poll roster diff and the notifications it
//! produces for members who arrive.
//!
//! # Modules
//!
//! - [`tracker`] -- [`PresenceTracker`], the snapshot state machine, and the
//!   [`MessageSink`] host callback
//! - [`template`] -- `$(key)` placeholder rendering and chat [`Color`]s
//! - [`messages`] -- The two message templates and the
//!   [`TemplateSource`] they are loaded from
//! - [`clock`] -- [`Clock`] trait with system and fixed implementations
//! - [`config`] -- Configuration loading from `lastseen-config.yaml`
//!
//! [`PresenceTracker`]: tracker::PresenceTracker
//! [`MessageSink`]: tracker::MessageSink
//! [`Color`]: template::Color
//! [`TemplateSource`]: messages::TemplateSource
//! [`Clock`]: clock::Clock

pub mod clock;
pub mod config;
pub mod messages;
pub mod template;
pub mod tracker;
