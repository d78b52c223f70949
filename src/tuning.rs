//! Data-driven game balance
//!
//! Every number the simulation rules depend on lives in [`Tuning`]. The
//! default is the canonical rule set; [`Ruleset::Extended`] is the slower
//! purchase variant.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a balance table
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
    #[error("production floor {floor_ms}ms is above the starting interval {start_ms}ms")]
    FloorAboveStart { floor_ms: u64, start_ms: u64 },
    #[error("hold threshold {threshold_ms}ms is not a multiple of the check interval {check_ms}ms")]
    HoldGranularity { threshold_ms: u64, check_ms: u64 },
}

/// Named balance presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Ruleset {
    /// 2 second holds
    #[default]
    Classic,
    /// 3 second holds
    Extended,
}

impl Ruleset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ruleset::Classic => "Classic",
            Ruleset::Extended => "Extended",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(Ruleset::Classic),
            "extended" | "ext" => Some(Ruleset::Extended),
            _ => None,
        }
    }

    pub fn tuning(&self) -> Tuning {
        match self {
            Ruleset::Classic => Tuning::default(),
            Ruleset::Extended => Tuning {
                hold_threshold_ms: 3000,
                ..Tuning::default()
            },
        }
    }
}

/// How the exchange booth behaves while the avatar lingers on it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExchangePolicy {
    /// One conversion per frame for as long as the avatar stays in range
    #[default]
    EveryFrame,
    /// One conversion per visit; leaving the booth re-arms it
    OncePerVisit,
}

impl ExchangePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExchangePolicy::EveryFrame => "Every frame",
            ExchangePolicy::OncePerVisit => "Once per visit",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "every-frame" | "frame" => Some(ExchangePolicy::EveryFrame),
            "once-per-visit" | "once" => Some(ExchangePolicy::OncePerVisit),
            _ => None,
        }
    }
}

/// Balance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Inventory ===
    pub max_held_produce: usize,
    pub max_held_cash: usize,
    /// Value of one cash unit (held or on the floor)
    pub cash_unit_value: u64,

    // === Production ===
    pub buffer_capacity: usize,
    pub production_interval_ms: u64,
    pub production_step_ms: u64,
    pub production_floor_ms: u64,

    // === Customers ===
    pub arrival_interval_ms: u64,
    pub max_customers: usize,

    // === Combo ===
    pub combo_window_ms: u64,
    pub combo_cap: u32,
    pub combo_step: f32,
    pub base_reward_units: u32,

    // === Economy ===
    pub exchange_rate: u64,
    pub exchange_policy: ExchangePolicy,

    // === Unlocks ===
    pub unlock_check_ms: u64,
    pub hold_threshold_ms: u64,
    pub oven_level_cost_tokens: u64,
    pub second_counter_cost_cash: u64,
    pub second_oven_cost_cash: u64,

    // === Session ===
    pub session_secs: u32,
    pub countdown_step_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_held_produce: 6,
            max_held_cash: 10,
            cash_unit_value: 100,

            buffer_capacity: 10,
            production_interval_ms: 3000,
            production_step_ms: 700,
            production_floor_ms: 800,

            arrival_interval_ms: 5000,
            max_customers: 8,

            combo_window_ms: 8000,
            combo_cap: 5,
            combo_step: 0.25,
            base_reward_units: 2,

            exchange_rate: 1000,
            exchange_policy: ExchangePolicy::EveryFrame,

            unlock_check_ms: 100,
            hold_threshold_ms: 2000,
            oven_level_cost_tokens: 1,
            second_counter_cost_cash: 1500,
            second_oven_cost_cash: 2500,

            session_secs: 120,
            countdown_step_ms: 800,
        }
    }
}

impl Tuning {
    /// Parse a JSON balance table (missing fields fall back to defaults) and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject tables the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("max_held_produce", self.max_held_produce as u64),
            ("max_held_cash", self.max_held_cash as u64),
            ("buffer_capacity", self.buffer_capacity as u64),
            ("max_customers", self.max_customers as u64),
            ("production_floor_ms", self.production_floor_ms),
            ("arrival_interval_ms", self.arrival_interval_ms),
            ("unlock_check_ms", self.unlock_check_ms),
            ("exchange_rate", self.exchange_rate),
            ("combo_cap", self.combo_cap as u64),
            ("session_secs", self.session_secs as u64),
            ("countdown_step_ms", self.countdown_step_ms),
        ];
        if let Some(&(field, _)) = positive.iter().find(|(_, v)| *v == 0) {
            return Err(TuningError::Zero { field });
        }
        if self.production_floor_ms > self.production_interval_ms {
            return Err(TuningError::FloorAboveStart {
                floor_ms: self.production_floor_ms,
                start_ms: self.production_interval_ms,
            });
        }
        if self.hold_threshold_ms % self.unlock_check_ms != 0 {
            return Err(TuningError::HoldGranularity {
                threshold_ms: self.hold_threshold_ms,
                check_ms: self.unlock_check_ms,
            });
        }
        Ok(())
    }
}
