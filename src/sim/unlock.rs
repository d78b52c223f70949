//! Hold-to-purchase unlock pads
//!
//! Standing on a pad while the price is affordable fills a hold meter one
//! check step at a time. Stepping off, or the price becoming unaffordable,
//! empties it. A full meter buys the unlock and the pad disappears.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::economy::Cost;
use crate::consts::*;
use crate::tuning::Tuning;
use crate::within;

/// What a pad buys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnlockKind {
    /// Oven level up (faster baking)
    OvenLevel,
    SecondCounter,
    SecondOven,
}

impl UnlockKind {
    pub fn label(&self) -> &'static str {
        match self {
            UnlockKind::OvenLevel => "LVL OVEN",
            UnlockKind::SecondCounter => "COUNTER B",
            UnlockKind::SecondOven => "OVEN 2",
        }
    }
}

/// Hold meter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HoldState {
    #[default]
    Idle,
    Accumulating { held_ms: u64 },
}

/// Result of one check step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldCheck {
    Idle,
    Holding { held_ms: u64 },
    Complete,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockZone {
    pub kind: UnlockKind,
    pub pos: Vec2,
    pub radius: f32,
    pub cost: Cost,
    pub hold: HoldState,
}

impl UnlockZone {
    pub fn new(kind: UnlockKind, pos: Vec2, cost: Cost) -> Self {
        Self {
            kind,
            pos,
            radius: UNLOCK_RADIUS,
            cost,
            hold: HoldState::Idle,
        }
    }

    /// Advance the meter by one check step
    pub fn check(
        &mut self,
        avatar: Vec2,
        affordable: bool,
        step_ms: u64,
        threshold_ms: u64,
    ) -> HoldCheck {
        if !affordable || !within(avatar, self.pos, self.radius) {
            self.hold = HoldState::Idle;
            return HoldCheck::Idle;
        }
        let held_ms = match self.hold {
            HoldState::Idle => step_ms,
            HoldState::Accumulating { held_ms } => held_ms + step_ms,
        };
        self.hold = HoldState::Accumulating { held_ms };
        if held_ms >= threshold_ms {
            HoldCheck::Complete
        } else {
            HoldCheck::Holding { held_ms }
        }
    }

    /// Meter fill in [0, 1] for the progress ring
    pub fn progress(&self, threshold_ms: u64) -> f32 {
        match self.hold {
            HoldState::Idle => 0.0,
            HoldState::Accumulating { held_ms } => {
                (held_ms as f32 / threshold_ms.max(1) as f32).min(1.0)
            }
        }
    }
}

/// The three pads every shift starts with
pub fn standard_pads(tuning: &Tuning) -> Vec<UnlockZone> {
    vec![
        UnlockZone::new(
            UnlockKind::OvenLevel,
            UNLOCK_OVEN_LEVEL_POS,
            Cost::Tokens(tuning.oven_level_cost_tokens),
        ),
        UnlockZone::new(
            UnlockKind::SecondCounter,
            UNLOCK_COUNTER_B_POS,
            Cost::Cash(tuning.second_counter_cost_cash),
        ),
        UnlockZone::new(
            UnlockKind::SecondOven,
            UNLOCK_OVEN_2_POS,
            Cost::Cash(tuning.second_oven_cost_cash),
        ),
    ]
}
