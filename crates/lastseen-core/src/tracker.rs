//! Presence tracking: diff consecutive roster snapshots and announce arrivals.
//!
//! The host drives a [`PresenceTracker`] with two callbacks:
//!
//! 1. [`PresenceTracker::on_tick`] on every poll, with the roster currently
//!    visible, the scope it belongs to, and the local observer's own id.
//!    Departures are recorded; each arrival is rendered through a template
//!    and handed to the host's [`MessageSink`].
//!
//! 2. [`PresenceTracker::on_disconnect_all`] when the observer leaves the
//!    scope, with the last roster it saw. Everyone in it is recorded as
//!    departed.
//!
//! # Resync
//!
//! If the local observer is missing from the remembered snapshot, the
//! remembered snapshot is stale: the tracker was just created, or the host
//! reconnected. The current roster is then adopted without reporting any
//! transitions. Both cases are handled the same way.

use lastseen_store::DepartureLog;
use lastseen_types::{MemberId, RosterDiff, RosterSnapshot, ScopeAddress, Timestamp};
use tracing::{debug, info};

use crate::clock::Clock;
use crate::messages::{TemplateKind, TemplateSource};
use crate::template::{Color, Substitutions};

/// A rendered arrival notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// The member who arrived.
    pub member: MemberId,
    /// Which template was used.
    pub kind: TemplateKind,
    /// Rendered text.
    pub text: String,
    /// Color to display the text in.
    pub color: Color,
}

/// Host callback that displays notifications.
pub trait MessageSink {
    /// Show one notification to the user.
    fn display_message(&mut self, notification: &Notification);
}

impl MessageSink for Vec<Notification> {
    fn display_message(&mut self, notification: &Notification) {
        self.push(notification.clone());
    }
}

/// Outcome of one [`PresenceTracker::on_tick`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Members who joined and left since the previous tick.
    pub diff: RosterDiff,
    /// Whether the remembered snapshot was stale and got replaced before
    /// diffing.
    pub resynced: bool,
    /// Number of notifications delivered to the sink.
    pub notifications: usize,
}

/// Tracks roster membership across polls for one host session.
pub struct PresenceTracker<L, T, C> {
    departures: L,
    templates: T,
    clock: C,
    last_snapshot: RosterSnapshot,
}

impl<L, T, C> PresenceTracker<L, T, C>
where
    L: DepartureLog,
    T: TemplateSource,
    C: Clock,
{
    /// Create a tracker with an empty remembered snapshot.
    pub const fn new(departures: L, templates: T, clock: C) -> Self {
        Self {
            departures,
            templates,
            clock,
            last_snapshot: RosterSnapshot::new(),
        }
    }

    /// Process one poll of the roster.
    pub fn on_tick(
        &mut self,
        current: &RosterSnapshot,
        scope: &ScopeAddress,
        local: MemberId,
        sink: &mut dyn MessageSink,
    ) -> TickSummary {
        let resynced = !self.last_snapshot.contains(local);
        let previous = if resynced {
            debug!(%scope, %local, members = current.len(), "Resyncing roster snapshot");
            current
        } else {
            &self.last_snapshot
        };
        let diff = previous.diff(current);

        let now = self.clock.now();

        for &member in &diff.left {
            debug!(%scope, %member, "Member left");
            self.departures.record_departure(scope, member, now);
        }

        let mut notifications: usize = 0;
        for &member in &diff.joined {
            let notification = self.announce(member, scope, current, now);
            debug!(%scope, %member, kind = ?notification.kind, "Member joined");
            sink.display_message(&notification);
            notifications = notifications.saturating_add(1);
        }

        if !diff.is_empty() {
            info!(
                %scope,
                joined = diff.joined.len(),
                left = diff.left.len(),
                present = current.len(),
                "Roster changed"
            );
        }

        self.last_snapshot = current.clone();

        TickSummary {
            diff,
            resynced,
            notifications,
        }
    }

    /// Record everyone in `final_roster` as departed from `scope`.
    ///
    /// The remembered snapshot is left alone; the next tick after a
    /// reconnect resyncs it. Returns the number of departures recorded.
    pub fn on_disconnect_all(&mut self, scope: &ScopeAddress, final_roster: &RosterSnapshot) -> usize {
        let now = self.clock.now();
        for member in final_roster.iter() {
            self.departures.record_departure(scope, member, now);
        }
        info!(%scope, departed = final_roster.len(), "Disconnected, recorded all departures");
        final_roster.len()
    }

    /// The roster as of the last tick.
    pub const fn last_snapshot(&self) -> &RosterSnapshot {
        &self.last_snapshot
    }

    /// Borrow the departure log.
    pub const fn departures(&self) -> &L {
        &self.departures
    }

    /// Render the arrival notification for `member`.
    fn announce(
        &self,
        member: MemberId,
        scope: &ScopeAddress,
        current: &RosterSnapshot,
        now: Timestamp,
    ) -> Notification {
        let prior = self.departures.lookup_departure(scope, member);
        let kind = if prior.is_some() {
            TemplateKind::Join
        } else {
            TemplateKind::FirstTime
        };

        // First-time templates should not use these, but fill them anyway.
        let reference = prior.unwrap_or(now);
        let substitutions = Substitutions {
            player: current
                .display_name(member)
                .map_or_else(|| format!("{{{member}}}"), str::to_owned),
            date: format_date(&reference),
            time: format_time(&reference),
            since: reference.elapsed_until(&now).to_string(),
            server: scope.to_string(),
        };

        let config = self.templates.load();
        let (text, color) = config.entry(kind).render(&substitutions);

        Notification {
            member,
            kind,
            text,
            color,
        }
    }
}

/// `D/M/YYYY`, without zero padding.
fn format_date(at: &Timestamp) -> String {
    format!("{}/{}/{}", at.day(), at.month(), at.year())
}

/// `<minute> minutes <hour> hours`.
fn format_time(at: &Timestamp) -> String {
    format!("{} minutes {} hours", at.minute(), at.hour())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use lastseen_store::MemoryDepartureStore;

    use super::*;
    use crate::clock::FixedClock;
    use crate::messages::{MessageConfig, MessageEntry, StaticTemplateSource};

    type TestTracker = PresenceTracker<MemoryDepartureStore, StaticTemplateSource, FixedClock>;

    fn ts(day: u32, hour: u32, minute: u32) -> Timestamp {
        Timestamp::from_ymd_hm(2024, 3, day, hour, minute).unwrap()
    }

    fn tracker(clock: &FixedClock) -> TestTracker {
        let templates = MessageConfig {
            join_message: MessageEntry::new(
                "$(player) back on $(server) after $(since), left $(date) at $(time)",
                "yellow",
            ),
            first_time_message: MessageEntry::new("$(player) is new on $(server)", "green"),
        };
        PresenceTracker::new(
            MemoryDepartureStore::new(),
            StaticTemplateSource(templates),
            clock.clone(),
        )
    }

    fn roster(members: &[MemberId]) -> RosterSnapshot {
        members.iter().copied().collect()
    }

    #[test]
    fn first_tick_resyncs_without_announcing() {
        let clock = FixedClock::new(ts(1, 12, 0));
        let mut tracker = tracker(&clock);
        let me = MemberId::random();
        let other = MemberId::random();
        let scope = ScopeAddress::new("s1");
        let mut sink = Vec::new();

        let summary = tracker.on_tick(&roster(&[me, other]), &scope, me, &mut sink);

        assert!(summary.resynced);
        assert!(summary.diff.is_empty());
        assert!(sink.is_empty());
        assert_eq!(tracker.last_snapshot(), &roster(&[me, other]));
    }

    #[test]
    fn arrival_without_history_uses_first_time_template() {
        let clock = FixedClock::new(ts(1, 12, 0));
        let mut tracker = tracker(&clock);
        let me = MemberId::random();
        let newcomer = MemberId::random();
        let scope = ScopeAddress::new("s1");
        let mut sink = Vec::new();

        tracker.on_tick(&roster(&[me]), &scope, me, &mut sink);
        let mut next = roster(&[me]);
        next.insert_named(newcomer, "Robin");
        let summary = tracker.on_tick(&next, &scope, me, &mut sink);

        assert!(!summary.resynced);
        assert_eq!(summary.diff.joined, vec![newcomer]);
        assert_eq!(summary.notifications, 1);
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].kind, TemplateKind::FirstTime);
        assert_eq!(sink[0].text, "Robin is new on s1");
        assert_eq!(sink[0].color, Color::Green);
    }

    #[test]
    fn departure_then_return_uses_join_template_with_elapsed_time() {
        let clock = FixedClock::new(ts(1, 12, 0));
        let mut tracker = tracker(&clock);
        let me = MemberId::random();
        let friend = MemberId::random();
        let scope = ScopeAddress::new("s1");
        let mut sink = Vec::new();

        tracker.on_tick(&roster(&[me, friend]), &scope, me, &mut sink);

        clock.set(ts(1, 13, 5));
        let summary = tracker.on_tick(&roster(&[me]), &scope, me, &mut sink);
        assert_eq!(summary.diff.left, vec![friend]);
        assert_eq!(
            tracker.departures().lookup_departure(&scope, friend),
            Some(ts(1, 13, 5))
        );

        clock.set(ts(3, 15, 45));
        let mut back = roster(&[me]);
        back.insert_named(friend, "Kim");
        tracker.on_tick(&back, &scope, me, &mut sink);

        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].kind, TemplateKind::Join);
        assert_eq!(
            sink[0].text,
            "Kim back on s1 after 2 days 2 hours 40 minutes, left 1/3/2024 at 5 minutes 13 hours"
        );
        assert_eq!(sink[0].color, Color::Yellow);
    }

    #[test]
    fn unnamed_member_renders_as_braced_uuid() {
        let clock = FixedClock::new(ts(1, 12, 0));
        let mut tracker = tracker(&clock);
        let me = MemberId::random();
        let anon = MemberId::random();
        let scope = ScopeAddress::new("s1");
        let mut sink = Vec::new();

        tracker.on_tick(&roster(&[me]), &scope, me, &mut sink);
        tracker.on_tick(&roster(&[me, anon]), &scope, me, &mut sink);

        assert_eq!(sink[0].text, format!("{{{anon}}} is new on s1"));
    }

    #[test]
    fn stayers_are_neither_joined_nor_left() {
        let clock = FixedClock::new(ts(1, 12, 0));
        let mut tracker = tracker(&clock);
        let me = MemberId::random();
        let stayer = MemberId::random();
        let leaver = MemberId::random();
        let joiner = MemberId::random();
        let scope = ScopeAddress::new("s1");
        let mut sink = Vec::new();

        tracker.on_tick(&roster(&[me, stayer, leaver]), &scope, me, &mut sink);
        let summary = tracker.on_tick(&roster(&[me, stayer, joiner]), &scope, me, &mut sink);

        assert_eq!(summary.diff.joined, vec![joiner]);
        assert_eq!(summary.diff.left, vec![leaver]);
        assert_eq!(tracker.departures().lookup_departure(&scope, stayer), None);
    }

    #[test]
    fn disconnect_records_everyone_and_keeps_snapshot() {
        let clock = FixedClock::new(ts(1, 12, 0));
        let mut tracker = tracker(&clock);
        let me = MemberId::random();
        let other = MemberId::random();
        let scope = ScopeAddress::new("s1");
        let mut sink = Vec::new();

        let present = roster(&[me, other]);
        tracker.on_tick(&present, &scope, me, &mut sink);

        clock.set(ts(1, 18, 30));
        let recorded = tracker.on_disconnect_all(&scope, &present);

        assert_eq!(recorded, 2);
        for member in [me, other] {
            assert_eq!(
                tracker.departures().lookup_departure(&scope, member),
                Some(ts(1, 18, 30))
            );
        }
        assert_eq!(tracker.last_snapshot(), &present);
    }

    #[test]
    fn observer_missing_from_memory_triggers_resync_mid_session() {
        let clock = FixedClock::new(ts(1, 12, 0));
        let mut tracker = tracker(&clock);
        let me = MemberId::random();
        let a = MemberId::random();
        let b = MemberId::random();
        let scope = ScopeAddress::new("s1");
        let mut sink = Vec::new();

        // The observer drops out of its own roster view (e.g. a respawn).
        tracker.on_tick(&roster(&[me, a]), &scope, me, &mut sink);
        tracker.on_tick(&roster(&[a]), &scope, me, &mut sink);

        let summary = tracker.on_tick(&roster(&[me, a, b]), &scope, me, &mut sink);
        assert!(summary.resynced);
        assert!(summary.diff.is_empty());
        assert!(sink.is_empty());
    }

    #[test]
    fn empty_roster_is_valid() {
        let clock = FixedClock::new(ts(1, 12, 0));
        let mut tracker = tracker(&clock);
        let mut sink = Vec::new();

        let summary = tracker.on_tick(
            &RosterSnapshot::new(),
            &ScopeAddress::new("s1"),
            MemberId::random(),
            &mut sink,
        );

        assert!(summary.diff.is_empty());
        assert_eq!(
            tracker.on_disconnect_all(&ScopeAddress::new("s1"), &RosterSnapshot::new()),
            0
        );
    }
}
