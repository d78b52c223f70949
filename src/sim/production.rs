//! Ovens and the ready-pizza rack

use serde::{Deserialize, Serialize};

use super::inventory::Produce;
use super::scheduler::TimerHandle;

/// Oven state shared by both ovens (they bake on the same timer)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Production {
    /// Oven level, starts at 1
    pub level: u32,
    /// Current bake interval
    pub interval_ms: u64,
    /// Ready pizzas, oldest first
    pub buffer: Vec<Produce>,
    pub capacity: usize,
    /// Repeating bake timer, replaced on every upgrade
    pub timer: Option<TimerHandle>,
}

impl Production {
    pub fn new(interval_ms: u64, capacity: usize) -> Self {
        Self {
            level: 1,
            interval_ms,
            buffer: Vec::with_capacity(capacity),
            capacity,
            timer: None,
        }
    }

    pub fn is_full(&self) -> bool {
        self.buffer.len() >= self.capacity
    }

    /// Put a fresh pizza on the rack. A full rack drops it.
    pub fn try_bake(&mut self, unit: Produce) -> bool {
        if self.is_full() {
            return false;
        }
        self.buffer.push(unit);
        true
    }

    /// Take the pizza placed most recently
    pub fn take_latest(&mut self) -> Option<Produce> {
        self.buffer.pop()
    }

    /// Level up: shorter interval, clamped at `floor_ms`. Returns the new interval.
    pub fn upgrade(&mut self, step_ms: u64, floor_ms: u64) -> u64 {
        self.level += 1;
        self.interval_ms = self.interval_ms.saturating_sub(step_ms).max(floor_ms);
        self.interval_ms
    }
}
