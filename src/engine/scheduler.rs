/*
Cooperative Scheduler
=====================

Everything time-based in the game (the gap between passage notes, the
feedback delay, the pause before the next round) is a deferred task on one
virtual clock. Nothing blocks; the owner polls the scheduler with the current
time and handles whatever became due.

  schedule_in(0.7s, Step)          pop_due(now = 1.0s)
        │                                │
        ▼                                ▼
  ┌──────────────┐   due ≤ now?   ┌──────────────┐
  │ queue (heap) │ ─────────────→ │ Some(Step)   │  clock jumps to 0.7s
  └──────────────┘                └──────────────┘

Ordering is (due time, insertion order), so two tasks due at the same
instant fire in the order they were scheduled.

When an entry fires, the clock moves to the entry's due time, not to the
poll time. A task that schedules a follow-up "700ms from now" is therefore
anchored to the moment it was supposed to fire, and a late poll never
stretches the spacing between notes.

Cancellation
------------

A `CancelToken` is a shared flag. Entries scheduled with a token are
silently skipped once the token is cancelled. The token is checked when the
entry comes due, so cancelling is O(1) and never touches the heap.
*/

use std::cell::Cell;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::rc::Rc;
use std::time::Duration;

/// Shared cancellation flag for one or more scheduled entries.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel every entry tied to this token. Idempotent.
    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Handle to a single scheduled task.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    token: CancelToken,
}

impl TaskHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

struct Entry<T> {
    due: Duration,
    seq: u64,
    token: CancelToken,
    payload: T,
}

// BinaryHeap is a max-heap; invert so the earliest (due, seq) pops first.
impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

pub struct Scheduler<T> {
    now: Duration,
    next_seq: u64,
    queue: BinaryHeap<Entry<T>>,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            queue: BinaryHeap::new(),
        }
    }

    /// Current position of the virtual clock.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `payload` to fire `delay` after the current clock.
    pub fn schedule_in(&mut self, delay: Duration, payload: T) -> TaskHandle {
        let token = CancelToken::new();
        self.schedule_with(delay, payload, &token);
        TaskHandle { token }
    }

    /// Schedule `payload` under an existing token.
    pub fn schedule_with(&mut self, delay: Duration, payload: T, token: &CancelToken) {
        let entry = Entry {
            due: self.now + delay,
            seq: self.next_seq,
            token: token.clone(),
            payload,
        };
        self.next_seq += 1;
        self.queue.push(entry);
    }

    /// Pop the next live entry due at or before `until`.
    ///
    /// The clock advances to the entry's due time. Cancelled entries are
    /// discarded on the way. Returns `None` once nothing else is due; the
    /// caller then moves the clock with [`Scheduler::advance_to`].
    pub fn pop_due(&mut self, until: Duration) -> Option<T> {
        while let Some(head) = self.queue.peek() {
            if head.due > until {
                return None;
            }
            let entry = self.queue.pop()?;
            if entry.token.is_cancelled() {
                continue;
            }
            self.now = self.now.max(entry.due);
            return Some(entry.payload);
        }
        None
    }

    /// Move the clock forward. Never moves backwards.
    pub fn advance_to(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Number of entries that will still fire.
    pub fn pending(&self) -> usize {
        self.queue
            .iter()
            .filter(|e| !e.token.is_cancelled())
            .count()
    }

    /// Due time of the next live entry, if any.
    pub fn next_due(&self) -> Option<Duration> {
        self.queue
            .iter()
            .filter(|e| !e.token.is_cancelled())
            .map(|e| e.due)
            .min()
    }

    /// Drop every pending entry.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
