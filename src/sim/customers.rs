//! The waiting line

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::zones::CounterId;

/// A waiting customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: u32,
    /// Counter the customer walked up to (rendering only; any counter serves the head)
    pub counter: CounterId,
    /// Place in line at arrival time (rendering only)
    pub slot: u32,
}

/// Outcome of an arrival tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrival {
    Joined { slot: u32 },
    /// Line was already full: the shift is lost
    Overflow,
}

/// How close the line is to overflowing (HUD color bands)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueueUrgency {
    Calm,
    Busy,
    Critical,
}

/// First-come first-served line with a hard limit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerQueue {
    line: VecDeque<Customer>,
    capacity: usize,
}

impl CustomerQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            line: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.line.len()
    }

    pub fn is_empty(&self) -> bool {
        self.line.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn head(&self) -> Option<&Customer> {
        self.line.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Customer> {
        self.line.iter()
    }

    /// A new customer shows up. The full check happens before the append.
    pub fn arrive(&mut self, id: u32, counter: CounterId) -> Arrival {
        if self.line.len() >= self.capacity {
            return Arrival::Overflow;
        }
        let slot = self.line.len() as u32;
        self.line.push_back(Customer { id, counter, slot });
        Arrival::Joined { slot }
    }

    /// Serve the head of the line. No skipping ahead.
    pub fn serve(&mut self) -> Option<Customer> {
        self.line.pop_front()
    }

    pub fn urgency(&self) -> QueueUrgency {
        let n = self.line.len();
        if n + 2 >= self.capacity {
            QueueUrgency::Critical
        } else if n + 4 >= self.capacity {
            QueueUrgency::Busy
        } else {
            QueueUrgency::Calm
        }
    }
}
