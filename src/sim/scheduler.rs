//! Timer scheduling on a virtual clock
//!
//! Gameplay timers (production, arrivals, the countdown clock, unlock holds)
//! are data, not callbacks: each timer carries a payload that the tick
//! dispatcher matches on. Time only moves when the owner advances it, so the
//! same scheduler runs under real frame deltas or under a test's fixed steps.

use serde::{Deserialize, Serialize};

/// Handle to a scheduled timer, used for cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle(u32);

/// Scheduling interface used by the simulation
pub trait Scheduler<T> {
    /// Current time in milliseconds
    fn now_ms(&self) -> u64;

    /// Fire `payload` once, `delay_ms` from now
    fn after(&mut self, delay_ms: u64, payload: T) -> TimerHandle;

    /// Fire `payload` every `interval_ms`, starting one interval from now
    fn every(&mut self, interval_ms: u64, payload: T) -> TimerHandle;

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    fn cancel(&mut self, handle: TimerHandle) -> bool;

    /// Cancel everything
    fn clear(&mut self);

    /// Pop the earliest timer due at or before `until_ms`, moving the clock to
    /// its deadline. Repeating timers are re-armed before returning.
    fn next_due(&mut self, until_ms: u64) -> Option<T>;

    /// Move the clock forward to `until_ms` once nothing else is due
    fn settle(&mut self, until_ms: u64);
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Timer<T> {
    handle: TimerHandle,
    deadline_ms: u64,
    /// Some for repeating timers
    interval_ms: Option<u64>,
    payload: T,
}

/// Deterministic scheduler driven by explicit time advances
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VirtualClock<T> {
    now_ms: u64,
    timers: Vec<Timer<T>>,
    next_handle: u32,
}

impl<T> Default for VirtualClock<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> VirtualClock<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            timers: Vec::new(),
            next_handle: 1,
        }
    }

    /// Number of pending timers
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Whether a handle still refers to a pending timer
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|t| t.handle == handle)
    }

    fn push(&mut self, delay_ms: u64, interval_ms: Option<u64>, payload: T) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.timers.push(Timer {
            handle,
            deadline_ms: self.now_ms + delay_ms,
            interval_ms,
            payload,
        });
        handle
    }
}

impl<T: Clone> Scheduler<T> for VirtualClock<T> {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn after(&mut self, delay_ms: u64, payload: T) -> TimerHandle {
        self.push(delay_ms, None, payload)
    }

    fn every(&mut self, interval_ms: u64, payload: T) -> TimerHandle {
        // A zero interval would re-fire forever inside a single advance
        let interval_ms = interval_ms.max(1);
        self.push(interval_ms, Some(interval_ms), payload)
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.handle != handle);
        self.timers.len() != before
    }

    fn clear(&mut self) {
        self.timers.clear();
    }

    fn next_due(&mut self, until_ms: u64) -> Option<T> {
        // Earliest deadline wins; ties go to the timer scheduled first
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline_ms <= until_ms)
            .min_by_key(|(_, t)| (t.deadline_ms, t.handle.0))
            .map(|(i, _)| i)?;

        let timer = &mut self.timers[idx];
        self.now_ms = self.now_ms.max(timer.deadline_ms);
        match timer.interval_ms {
            Some(interval) => {
                timer.deadline_ms += interval;
                Some(timer.payload.clone())
            }
            None => Some(self.timers.swap_remove(idx).payload),
        }
    }

    fn settle(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }
}
