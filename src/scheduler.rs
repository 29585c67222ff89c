//! One-shot timer queue for deferred output changes.
//!
//! Observers that need a timed effect (the indicator's flash sequences)
//! schedule actions here instead of sleeping inside the handler.  The main
//! loop advances the queue with a monotonic timestamp between ticks and
//! applies whatever came due.
//!
//! ```text
//!  handler ──schedule_in(delay, action)──▶ ┌──────────────┐
//!                                          │  Scheduler   │
//!  main loop ──advance(now)──────────────▶ │ (N entries)  │ ──▶ due actions
//!                                          └──────────────┘
//! ```
//!
//! Time is caller-supplied; the queue never reads a clock itself, which
//! keeps it deterministic under test.

use core::time::Duration;

use crate::error::ObserverError;

// ═══════════════════════════════════════════════════════════════
//  Entries
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy)]
struct Entry<A> {
    due: Duration,
    /// Insertion sequence number; breaks ties between equal `due` times.
    seq: u32,
    action: A,
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler engine
// ═══════════════════════════════════════════════════════════════

/// Fixed-capacity queue of up to `N` pending actions.
#[derive(Debug)]
pub struct Scheduler<A: Copy, const N: usize> {
    /// Last timestamp passed to [`advance`](Self::advance).
    now: Duration,
    entries: heapless::Vec<Entry<A>, N>,
    seq: u32,
}

impl<A: Copy, const N: usize> Default for Scheduler<A, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Copy, const N: usize> Scheduler<A, N> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            entries: heapless::Vec::new(),
            seq: 0,
        }
    }

    /// Queue `action` to come due `delay` after the current time.
    pub fn schedule_in(&mut self, delay: Duration, action: A) -> Result<(), ObserverError> {
        let entry = Entry {
            due: self.now + delay,
            seq: self.seq,
            action,
        };
        self.entries
            .push(entry)
            .map_err(|_| ObserverError::QueueFull("scheduler"))?;
        self.seq = self.seq.wrapping_add(1);
        Ok(())
    }

    /// Drop every pending action.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Move the clock to `now` and drain everything due at or before it,
    /// earliest first (ties in insertion order).
    ///
    /// The clock never runs backwards; an earlier `now` is ignored.
    pub fn advance(&mut self, now: Duration) -> heapless::Vec<A, N> {
        let mut due = heapless::Vec::new();
        while let Some(action) = self.peek_due(now) {
            // `due` has the same capacity as `entries`.
            let _ = due.push(action);
            self.pop_due();
        }
        due
    }

    /// Move the clock to `now` and return the earliest due action, leaving
    /// it queued until [`pop_due`](Self::pop_due).
    pub fn peek_due(&mut self, now: Duration) -> Option<A> {
        if now > self.now {
            self.now = now;
        }
        self.earliest_due().map(|i| self.entries[i].action)
    }

    /// Remove the action [`peek_due`](Self::peek_due) returned.
    pub fn pop_due(&mut self) -> Option<A> {
        self.earliest_due()
            .map(|i| self.entries.swap_remove(i).action)
    }

    fn earliest_due(&self) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= self.now)
            .min_by_key(|(_, e)| (e.due, e.seq))
            .map(|(i, _)| i)
    }

    /// Earliest pending due time, if any.
    pub fn next_due(&self) -> Option<Duration> {
        self.entries.iter().map(|e| e.due).min()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_idle(&self) -> bool {
        self.entries.is_empty()
    }
}
