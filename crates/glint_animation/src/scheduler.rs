//! Virtual-time timer queue
//!
//! Replaces wall-clock timers for animation sequencing. Work is scheduled as
//! plain payload values; the owner pops whatever is due and dispatches it,
//! which keeps every multi-step animation drivable from tests by advancing
//! time manually.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Duration;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    pub struct TimerId;
}

struct Timer<T> {
    due: Duration,
    payload: T,
}

/// Queue of payloads ordered by due time.
///
/// Timers due at the same instant fire in scheduling order.
pub struct TimerQueue<T> {
    timers: SlotMap<TimerId, Timer<T>>,
    order: BinaryHeap<Reverse<(Duration, u64, TimerId)>>,
    now: Duration,
    next_seq: u64,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            order: BinaryHeap::new(),
            now: Duration::ZERO,
            next_seq: 0,
        }
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule a payload to become due `delay` after the current time.
    ///
    /// Due times saturate at `Duration::MAX`.
    pub fn schedule(&mut self, delay: Duration, payload: T) -> TimerId {
        let due = self.now.saturating_add(delay);
        let id = self.timers.insert(Timer { due, payload });
        self.order.push(Reverse((due, self.next_seq, id)));
        self.next_seq += 1;
        id
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Due time of a pending timer
    pub fn due_time(&self, id: TimerId) -> Option<Duration> {
        self.timers.get(id).map(|timer| timer.due)
    }

    /// Due time of the earliest pending timer
    pub fn next_due(&self) -> Option<Duration> {
        self.order.peek().map(|Reverse((due, _, _))| *due)
    }

    /// Pop the earliest timer due at or before `deadline`.
    ///
    /// The clock moves to the popped timer's due time, so anything scheduled
    /// while handling the payload is relative to when it fired.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<T> {
        let Reverse((due, _, _)) = *self.order.peek()?;
        if due > deadline {
            return None;
        }

        let Reverse((_, _, id)) = self.order.pop()?;
        let timer = self.timers.remove(id)?;
        self.now = self.now.max(timer.due);
        Some(timer.payload)
    }

    /// Move the clock forward without firing anything
    pub fn advance_clock(&mut self, to: Duration) {
        self.now = self.now.max(to);
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
