//! Virtual-time timer queue
//!
//! Every delay in the widget (simulated verification, result display,
//! refocus settling) is an entry here rather than a sleeping thread. The host
//! advances time explicitly, which keeps the whole widget single-threaded and
//! lets tests run the full submission cycle without wall-clock waits.

use std::collections::BTreeMap;
use std::time::Duration;

/// Work the controller performs when a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTask {
    /// The simulated verification delay elapsed
    ResolveSubmission,
    /// The result indicator has been visible long enough
    ResetForm,
    /// Give focus back to the hidden field after the reset settled
    RestoreFocus,
}

/// Cancellation handle returned by [`TimerQueue::schedule`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// Ordered set of pending timers over a virtual clock
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_id: u64,
    // (deadline, id) keeps same-deadline timers in scheduling order
    pending: BTreeMap<(Duration, u64), TimerTask>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedules `task` to fire `delay` after the current virtual time
    pub fn schedule(&mut self, delay: Duration, task: TimerTask) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.insert((self.now.saturating_add(delay), id), task);
        TimerHandle(id)
    }

    /// Cancels a pending timer, returning false if it already fired
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let key = self.pending.keys().find(|(_, id)| *id == handle.0).copied();
        match key {
            Some(key) => self.pending.remove(&key).is_some(),
            None => false,
        }
    }

    /// Drops every pending timer, returning how many were cancelled
    pub fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    /// Returns true if the timer behind `handle` has not fired yet
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.keys().any(|(_, id)| *id == handle.0)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Virtual time at which the earliest pending timer fires
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Removes the earliest timer due at or before `until`
    ///
    /// The clock moves to that timer's deadline, so anything the caller
    /// schedules while handling it is relative to the moment it fired.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerTask> {
        let (&(deadline, id), _) = self.pending.iter().next()?;
        if deadline > until {
            return None;
        }
        self.now = self.now.max(deadline);
        self.pending.remove(&(deadline, id))
    }

    /// Moves the clock forward to `until` without firing anything
    pub fn settle_at(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}
