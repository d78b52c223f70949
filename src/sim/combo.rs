//! Delivery combos
//!
//! Deliveries less than `window_ms` apart chain into a combo. The reward
//! multiplier grows by `step` per chained delivery up to `cap` deliveries.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComboTracker {
    pub count: u32,
    /// None until the first delivery of the session
    pub last_delivery_ms: Option<u64>,
}

impl ComboTracker {
    /// Record a delivery at `now_ms` and return the new combo count
    pub fn register(&mut self, now_ms: u64, window_ms: u64) -> u32 {
        let chained = self
            .last_delivery_ms
            .is_some_and(|last| now_ms.saturating_sub(last) < window_ms);
        self.count = if chained { self.count + 1 } else { 1 };
        self.last_delivery_ms = Some(now_ms);
        self.count
    }

    /// Whether a delivery at `now_ms` would still extend the combo
    pub fn is_live(&self, now_ms: u64, window_ms: u64) -> bool {
        self.last_delivery_ms
            .is_some_and(|last| now_ms.saturating_sub(last) < window_ms)
    }
}

/// Reward multiplier for a combo count: 1.0 at count 1, capped at `cap`
pub fn multiplier(count: u32, cap: u32, step: f32) -> f32 {
    let effective = count.clamp(1, cap.max(1));
    1.0 + (effective - 1) as f32 * step
}

/// Floor bills paid out for one delivery
pub fn reward_units(base_units: u32, multiplier: f32) -> u32 {
    (base_units as f32 * multiplier).ceil() as u32
}
