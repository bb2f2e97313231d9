//! Deadline clock: timed engine events on a min-heap.
//!
//! Time-delayed work (break reverts) is modelled as explicit scheduled
//! events with a deadline and a subject. The engine drains due events before
//! every operation, so handlers observe state at or after their deadline and
//! fire exactly once regardless of what happened in between.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bevy_ecs::prelude::{Entity, Resource};

pub const ONE_SEC_MS: u64 = 1000;
pub const ONE_MIN_MS: u64 = 60 * ONE_SEC_MS;
pub const ONE_HOUR_MS: u64 = 60 * ONE_MIN_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventKind {
    /// Scheduled end of a granted rest break; reverts `on_break` unconditionally.
    BreakExpired,
}

/// Entity the event acts on, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventSubject {
    Ambulance(Entity),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub timestamp: u64,
    pub kind: EventKind,
    pub subject: Option<EventSubject>,
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap a min-heap by timestamp.
        other
            .timestamp
            .cmp(&self.timestamp)
            .then_with(|| self.kind.cmp(&other.kind))
            .then_with(|| self.subject.cmp(&other.subject))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The event currently being processed; inserted by the engine before each
/// schedule run so systems can gate on it.
#[derive(Debug, Clone, Copy, Resource)]
pub struct CurrentEvent(pub Event);

/// Engine clock: monotonic milliseconds plus a heap of pending deadlines.
///
/// Engine time is `ms since engine start`; `with_epoch` records the Unix
/// wall-clock origin so callers can convert in both directions.
#[derive(Debug, Default, Resource)]
pub struct DispatchClock {
    now: u64,
    epoch_unix_ms: u64,
    events: BinaryHeap<Event>,
}

impl DispatchClock {
    pub fn with_epoch(epoch_unix_ms: u64) -> Self {
        Self {
            epoch_unix_ms,
            ..Self::default()
        }
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn schedule_at(&mut self, timestamp: u64, kind: EventKind, subject: Option<EventSubject>) {
        debug_assert!(
            timestamp >= self.now,
            "event timestamp must be >= current time"
        );
        self.events.push(Event {
            timestamp,
            kind,
            subject,
        });
    }

    pub fn schedule_in(&mut self, delay_ms: u64, kind: EventKind, subject: Option<EventSubject>) {
        self.schedule_at(self.now + delay_ms, kind, subject);
    }

    /// Pop the next event regardless of deadline, advancing `now` to it.
    pub fn pop_next(&mut self) -> Option<Event> {
        let event = self.events.pop()?;
        self.now = event.timestamp;
        Some(event)
    }

    /// Pop the next event only if its deadline is at or before `now_ms`,
    /// advancing `now` to the event timestamp.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<Event> {
        if self.events.peek().map(|e| e.timestamp <= now_ms)? {
            self.pop_next()
        } else {
            None
        }
    }

    /// Move `now` forward to `now_ms` (never backwards).
    pub fn advance_to(&mut self, now_ms: u64) {
        self.now = self.now.max(now_ms);
    }

    pub fn next_event_time(&self) -> Option<u64> {
        self.events.peek().map(|e| e.timestamp)
    }

    pub fn pending_event_count(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn sim_to_real_ms(&self, sim_ms: u64) -> u64 {
        self.epoch_unix_ms + sim_ms
    }

    pub fn real_to_sim_ms(&self, real_ms: u64) -> Option<u64> {
        real_ms.checked_sub(self.epoch_unix_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_pops_events_in_time_order() {
        let mut clock = DispatchClock::default();
        clock.schedule_at(10, EventKind::BreakExpired, None);
        clock.schedule_at(5, EventKind::BreakExpired, None);
        clock.schedule_at(20, EventKind::BreakExpired, None);

        let first = clock.pop_next().expect("first event");
        assert_eq!(first.timestamp, 5);
        assert_eq!(clock.now(), 5);

        let second = clock.pop_next().expect("second event");
        assert_eq!(second.timestamp, 10);

        let third = clock.pop_next().expect("third event");
        assert_eq!(third.timestamp, 20);
        assert_eq!(clock.now(), 20);

        assert!(clock.pop_next().is_none());
        assert!(clock.is_empty());
    }

    #[test]
    fn pop_due_respects_the_deadline() {
        let mut clock = DispatchClock::default();
        clock.schedule_in(ONE_HOUR_MS, EventKind::BreakExpired, None);

        assert!(clock.pop_due(ONE_HOUR_MS - 1).is_none());
        assert_eq!(clock.now(), 0, "peeking must not advance the clock");

        let event = clock.pop_due(ONE_HOUR_MS).expect("due event");
        assert_eq!(event.timestamp, ONE_HOUR_MS);
        assert_eq!(clock.now(), ONE_HOUR_MS);
    }

    #[test]
    fn advance_to_never_moves_backwards() {
        let mut clock = DispatchClock::default();
        clock.advance_to(500);
        clock.advance_to(100);
        assert_eq!(clock.now(), 500);
    }

    #[test]
    fn epoch_conversion_round_trips() {
        let clock = DispatchClock::with_epoch(1_700_000_000_000);
        assert_eq!(clock.sim_to_real_ms(1000), 1_700_000_001_000);
        assert_eq!(clock.real_to_sim_ms(1_700_000_001_000), Some(1000));
        assert_eq!(clock.real_to_sim_ms(1_699_999_999_000), None);
    }
}
