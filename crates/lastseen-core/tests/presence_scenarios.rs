//! End-to-end presence scenarios against the file-backed store and
//! template file.
//!
//! Each test works in its own directory under the system temp dir and
//! removes it afterwards.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::missing_panics_doc
)]

use std::path::PathBuf;

use lastseen_core::clock::FixedClock;
use lastseen_core::messages::{
    FileTemplateSource, MessageConfig, MessageEntry, StaticTemplateSource, TemplateKind,
};
use lastseen_core::template::Color;
use lastseen_core::tracker::{Notification, PresenceTracker};
use lastseen_store::{DepartureDocument, DepartureLog, FileDepartureStore};
use lastseen_types::{MemberId, RosterSnapshot, ScopeAddress, Timestamp};

// =============================================================================
// Helpers
// =============================================================================

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "lastseen_scenario_{name}_{}",
        std::process::id()
    ));
    std::fs::remove_dir_all(&dir).ok();
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

fn ts(day: u32, hour: u32, minute: u32) -> Timestamp {
    Timestamp::from_ymd_hm(2025, 1, day, hour, minute).expect("valid timestamp")
}

fn roster(members: &[MemberId]) -> RosterSnapshot {
    members.iter().copied().collect()
}

/// Templates that expose every placeholder, for precise assertions.
fn verbose_templates() -> StaticTemplateSource {
    StaticTemplateSource(MessageConfig {
        join_message: MessageEntry::new("JOIN $(player) since=$(since) on $(server)", "yellow"),
        first_time_message: MessageEntry::new("FIRST $(player) on $(server)", "green"),
    })
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn first_arrival_on_empty_store_uses_first_time_template() {
    let dir = scratch_dir("first_time");
    let store = FileDepartureStore::new(dir.join("departures.json"));
    let clock = FixedClock::new(ts(10, 9, 0));
    let mut tracker = PresenceTracker::new(store, verbose_templates(), clock);

    let me = MemberId::random();
    let m = MemberId::random();
    let s1 = ScopeAddress::new("s1");
    let mut sink: Vec<Notification> = Vec::new();

    tracker.on_tick(&roster(&[me]), &s1, me, &mut sink);
    let mut next = roster(&[me]);
    next.insert_named(m, "M");
    tracker.on_tick(&next, &s1, me, &mut sink);

    assert_eq!(sink.len(), 1);
    assert_eq!(sink[0].kind, TemplateKind::FirstTime);
    assert_eq!(sink[0].text, "FIRST M on s1");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn rejoin_uses_join_template_with_elapsed_since_departure() {
    let dir = scratch_dir("rejoin");
    let store = FileDepartureStore::new(dir.join("departures.json"));
    let clock = FixedClock::new(ts(10, 9, 0));
    let mut tracker = PresenceTracker::new(store, verbose_templates(), clock.clone());

    let me = MemberId::random();
    let m = MemberId::random();
    let s1 = ScopeAddress::new("s1");
    let mut sink: Vec<Notification> = Vec::new();

    tracker.on_tick(&roster(&[me, m]), &s1, me, &mut sink);

    // T1: M departs.
    clock.set(ts(10, 9, 30));
    tracker.on_tick(&roster(&[me]), &s1, me, &mut sink);

    // T2: M returns 1 day 4 hours 15 minutes later.
    clock.set(ts(11, 13, 45));
    let mut back = roster(&[me]);
    back.insert_named(m, "M");
    tracker.on_tick(&back, &s1, me, &mut sink);

    assert_eq!(sink.len(), 1);
    assert_eq!(sink[0].kind, TemplateKind::Join);
    assert_eq!(sink[0].text, "JOIN M since=1 days 4 hours 15 minutes on s1");
    assert_eq!(sink[0].color, Color::Yellow);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn malformed_stored_value_is_treated_as_first_time() {
    let dir = scratch_dir("malformed");
    let store = FileDepartureStore::new(dir.join("departures.json"));
    let me = MemberId::random();
    let m = MemberId::random();

    let mut document = DepartureDocument::new();
    document.set_raw("s1", &m.to_string(), "31/12/2024 at noon");
    store.write_document(&document).expect("seed store");

    let s1 = ScopeAddress::new("s1");
    assert_eq!(store.lookup_departure(&s1, m), None);

    let clock = FixedClock::new(ts(10, 9, 0));
    let mut tracker = PresenceTracker::new(store, verbose_templates(), clock);
    let mut sink: Vec<Notification> = Vec::new();
    tracker.on_tick(&roster(&[me]), &s1, me, &mut sink);
    tracker.on_tick(&roster(&[me, m]), &s1, me, &mut sink);

    assert_eq!(sink[0].kind, TemplateKind::FirstTime);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_store_file_is_created_by_first_departure() {
    let dir = scratch_dir("lazy_create");
    let path = dir.join("state").join("departures.json");
    let store = FileDepartureStore::new(&path);
    let scope = ScopeAddress::new("s1");
    let me = MemberId::random();
    let m = MemberId::random();

    assert_eq!(store.lookup_departure(&scope, m), None);
    assert!(!path.exists());

    let clock = FixedClock::new(ts(10, 9, 0));
    let mut tracker = PresenceTracker::new(store, verbose_templates(), clock);
    let mut sink: Vec<Notification> = Vec::new();
    tracker.on_tick(&roster(&[me, m]), &scope, me, &mut sink);
    tracker.on_tick(&roster(&[me]), &scope, me, &mut sink);

    assert!(path.exists());
    assert_eq!(
        FileDepartureStore::new(&path).lookup_departure(&scope, m),
        Some(ts(10, 9, 0))
    );

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn unknown_placeholder_survives_rendering() {
    let templates = StaticTemplateSource(MessageConfig {
        join_message: MessageEntry::new("unused", "white"),
        first_time_message: MessageEntry::new("$(player) brought $(foo)", "not-a-color"),
    });
    let clock = FixedClock::new(ts(10, 9, 0));
    let mut tracker =
        PresenceTracker::new(lastseen_store::MemoryDepartureStore::new(), templates, clock);

    let me = MemberId::random();
    let m = MemberId::random();
    let scope = ScopeAddress::new("s1");
    let mut sink: Vec<Notification> = Vec::new();
    tracker.on_tick(&roster(&[me]), &scope, me, &mut sink);
    let mut next = roster(&[me]);
    next.insert_named(m, "Jo");
    tracker.on_tick(&next, &scope, me, &mut sink);

    assert_eq!(sink[0].text, "Jo brought $(foo)");
    assert_eq!(sink[0].color, Color::White);
}

#[test]
fn departures_are_isolated_per_scope() {
    let dir = scratch_dir("isolation");
    let store = FileDepartureStore::new(dir.join("departures.json"));
    let clock = FixedClock::new(ts(10, 9, 0));
    let mut tracker = PresenceTracker::new(store, verbose_templates(), clock);

    let me = MemberId::random();
    let m = MemberId::random();
    let a = ScopeAddress::new("a.example");
    let b = ScopeAddress::new("b.example");
    let mut sink: Vec<Notification> = Vec::new();

    tracker.on_tick(&roster(&[me, m]), &a, me, &mut sink);
    tracker.on_tick(&roster(&[me]), &a, me, &mut sink);

    // Same member shows up on another scope: never seen leaving there.
    tracker.on_disconnect_all(&a, &roster(&[me]));
    tracker.on_tick(&roster(&[me]), &b, me, &mut sink);
    tracker.on_tick(&roster(&[me, m]), &b, me, &mut sink);

    assert_eq!(sink.len(), 1);
    assert_eq!(sink[0].kind, TemplateKind::FirstTime);
    assert!(tracker.departures().lookup_departure(&a, m).is_some());
    assert!(tracker.departures().lookup_departure(&b, m).is_none());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn reconnect_after_disconnect_greets_returning_members() {
    let dir = scratch_dir("reconnect");
    let store = FileDepartureStore::new(dir.join("departures.json"));
    let clock = FixedClock::new(ts(10, 20, 0));
    let mut tracker = PresenceTracker::new(store, verbose_templates(), clock.clone());

    let me = MemberId::random();
    let friend = MemberId::random();
    let scope = ScopeAddress::new("s1");
    let mut sink: Vec<Notification> = Vec::new();

    let evening = roster(&[me, friend]);
    tracker.on_tick(&evening, &scope, me, &mut sink);
    tracker.on_disconnect_all(&scope, &evening);

    // Next morning the observer reconnects before the friend does.
    clock.set(ts(11, 8, 0));
    let summary = tracker.on_tick(&roster(&[me]), &scope, me, &mut sink);
    assert!(!summary.resynced, "observer is still in the remembered snapshot");
    assert_eq!(summary.diff.left, vec![friend]);

    clock.set(ts(11, 8, 10));
    let mut later = roster(&[me]);
    later.insert_named(friend, "Friend");
    tracker.on_tick(&later, &scope, me, &mut sink);

    assert_eq!(sink.len(), 1);
    assert_eq!(sink[0].text, "JOIN Friend since=0 days 0 hours 10 minutes on s1");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn template_file_is_created_and_used() {
    let dir = scratch_dir("template_file");
    let messages = dir.join("config").join("messages.json");
    let clock = FixedClock::new(ts(10, 9, 0));
    let mut tracker = PresenceTracker::new(
        lastseen_store::MemoryDepartureStore::new(),
        FileTemplateSource::new(&messages),
        clock,
    );

    let me = MemberId::random();
    let m = MemberId::random();
    let scope = ScopeAddress::new("mc.example.net");
    let mut sink: Vec<Notification> = Vec::new();
    tracker.on_tick(&roster(&[me]), &scope, me, &mut sink);
    let mut next = roster(&[me]);
    next.insert_named(m, "Ari");
    tracker.on_tick(&next, &scope, me, &mut sink);

    assert!(messages.exists());
    assert_eq!(
        sink[0].text,
        "Ari joined the game. (First time seen on this server)"
    );
    assert_eq!(sink[0].color, Color::Green);

    std::fs::remove_dir_all(&dir).ok();
}
