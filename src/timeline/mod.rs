//! Single-threaded cooperative timeline: one-shot timer entries ordered by due time.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use crate::foundation::core::FrameIndex;
use crate::foundation::error::QuoteResult;
use crate::render::backend::FrameRGBA;

/// Time source driving a [`Timeline`].
pub trait Clock {
    /// Milliseconds since the clock's origin.
    fn now_ms(&self) -> f64;
    /// Block (or jump) until `deadline_ms`. Never moves time backwards.
    fn wait_until(&mut self, deadline_ms: f64);
}

/// Deterministic clock that jumps straight to each deadline.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VirtualClock {
    now_ms: f64,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance time without waiting on an entry.
    pub fn advance(&mut self, delta_ms: f64) {
        if delta_ms.is_finite() && delta_ms > 0.0 {
            self.now_ms += delta_ms;
        }
    }
}

impl Clock for VirtualClock {
    fn now_ms(&self) -> f64 {
        self.now_ms
    }

    fn wait_until(&mut self, deadline_ms: f64) {
        if deadline_ms > self.now_ms {
            self.now_ms = deadline_ms;
        }
    }
}

/// Wall clock; `wait_until` sleeps the current thread.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    fn wait_until(&mut self, deadline_ms: f64) {
        let remaining = deadline_ms - self.now_ms();
        if remaining.is_finite() && remaining > 0.0 {
            std::thread::sleep(Duration::from_secs_f64(remaining / 1000.0));
        }
    }
}

/// Identifies one recording session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

/// Work scheduled on the timeline.
#[derive(Debug)]
pub enum TimelineEvent {
    /// Run the capture tick of `session`.
    Tick { session: SessionId },
    /// A snapshot requested by `session` for `frame` completed.
    SnapshotReady {
        session: SessionId,
        frame: FrameIndex,
        result: QuoteResult<FrameRGBA>,
    },
}

#[derive(Debug)]
struct Entry {
    due_ms: f64,
    seq: u64,
    event: TimelineEvent,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due_ms
            .total_cmp(&other.due_ms)
            .then(self.seq.cmp(&other.seq))
    }
}

/// Timer queue over a [`Clock`].
///
/// Entries fire in due-time order; entries due at the same instant fire in scheduling order.
pub struct Timeline<C: Clock = VirtualClock> {
    clock: C,
    queue: BinaryHeap<Reverse<Entry>>,
    seq: u64,
}

impl<C: Clock> Timeline<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            queue: BinaryHeap::new(),
            seq: 0,
        }
    }

    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Schedule `event` to fire `delay_ms` from now (negative or NaN delays fire immediately).
    pub fn schedule_after(&mut self, delay_ms: f64, event: TimelineEvent) {
        let delay = if delay_ms.is_finite() {
            delay_ms.max(0.0)
        } else {
            0.0
        };
        let entry = Entry {
            due_ms: self.clock.now_ms() + delay,
            seq: self.seq,
            event,
        };
        self.seq += 1;
        self.queue.push(Reverse(entry));
    }

    /// Number of entries not yet fired.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Due time of the earliest entry.
    pub fn next_due_ms(&self) -> Option<f64> {
        self.queue.peek().map(|Reverse(e)| e.due_ms)
    }

    /// Wait for the earliest entry and return its event.
    pub fn next_event(&mut self) -> Option<TimelineEvent> {
        let Reverse(entry) = self.queue.pop()?;
        self.clock.wait_until(entry.due_ms);
        Some(entry.event)
    }
}

impl Default for Timeline<VirtualClock> {
    fn default() -> Self {
        Self::new(VirtualClock::new())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/mod.rs"]
mod tests;
