//! One-shot delayed actions on a virtual clock.
//!
//! Timers belong to a [`TimerGroup`] so that everything scheduled for one
//! scripted sequence can be revoked with a single call. The clock only moves
//! when the owner calls [`Scheduler::advance_to`], which keeps the widget
//! deterministic and lets tests step time explicitly.

use std::time::Duration;

use tracing::trace;

/// Handle to a group of timers that are canceled together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerGroup(u64);

/// Handle to a single scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Pending<A> {
    id: TimerId,
    group: TimerGroup,
    due: Duration,
    action: A,
}

/// Scheduler of cancelable one-shot actions.
#[derive(Debug)]
pub struct Scheduler<A> {
    now: Duration,
    next_timer: u64,
    next_group: u64,
    /// Kept sorted by (due, id)
    pending: Vec<Pending<A>>,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Scheduler<A> {
    /// Create an empty scheduler with its clock at zero.
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_timer: 0,
            next_group: 0,
            pending: Vec::new(),
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Open a fresh group for a new batch of timers.
    pub fn open_group(&mut self) -> TimerGroup {
        let group = TimerGroup(self.next_group);
        self.next_group += 1;
        group
    }

    /// Schedule `action` to fire `delay` after the current virtual time.
    pub fn schedule(&mut self, group: TimerGroup, delay: Duration, action: A) -> TimerId {
        let id = TimerId(self.next_timer);
        self.next_timer += 1;
        let due = self.now + delay;

        // Ids grow monotonically, so inserting after every timer with
        // due <= this one keeps ties in scheduling order.
        let index = self.pending.partition_point(|p| p.due <= due);
        self.pending.insert(
            index,
            Pending {
                id,
                group,
                due,
                action,
            },
        );
        id
    }

    /// Cancel a single timer. Returns whether it was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        before != self.pending.len()
    }

    /// Cancel every pending timer in `group`. Returns how many were removed.
    pub fn cancel_group(&mut self, group: TimerGroup) -> usize {
        let before = self.pending.len();
        self.pending.retain(|p| p.group != group);
        let removed = before - self.pending.len();
        trace!(group = group.0, removed, "canceled timer group");
        removed
    }

    /// Cancel everything. Returns how many timers were removed.
    pub fn cancel_all(&mut self) -> usize {
        let removed = self.pending.len();
        self.pending.clear();
        removed
    }

    /// Move the clock to `now` and take every action that has come due,
    /// earliest first. The clock never moves backwards.
    pub fn advance_to(&mut self, now: Duration) -> Vec<A> {
        if now > self.now {
            self.now = now;
        }
        let due = self.pending.partition_point(|p| p.due <= self.now);
        self.pending
            .drain(..due)
            .map(|p| {
                trace!(timer = p.id.0, due_ms = p.due.as_millis() as u64, "timer fired");
                p.action
            })
            .collect()
    }

    /// Number of timers still waiting to fire.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Number of timers still waiting in `group`.
    pub fn pending_in(&self, group: TimerGroup) -> usize {
        self.pending.iter().filter(|p| p.group == group).count()
    }

    /// When the next timer is due, if any.
    pub fn next_due(&self) -> Option<Duration> {
        self.pending.first().map(|p| p.due)
    }
}
