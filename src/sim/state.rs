//! Game state and core simulation types
//!
//! Everything that decides what the shift looks like at a given instant lives
//! in [`GameState`]. Presentation reads it and drains [`GameEvent`]s; it
//! never writes to it except through `tick` input.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::combo::ComboTracker;
use super::customers::CustomerQueue;
use super::economy::Wallet;
use super::inventory::{BoundedStack, OvenId, Produce};
use super::production::Production;
use super::scheduler::{Scheduler, VirtualClock};
use super::unlock::{UnlockKind, UnlockZone, standard_pads};
use super::zones::{self, CounterId, Upgrades, ZoneKind};
use crate::consts::*;
use crate::tuning::Tuning;
use crate::within;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for an authenticated player to start
    Lobby,
    /// Pre-shift countdown, `step` indexes [`COUNTDOWN_STEPS`]
    Countdown { step: usize },
    /// Shift in progress, all timers live
    Running,
    /// Shift over, all timers stopped
    Ended(Outcome),
}

/// How a shift ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Survived until the clock ran out
    Win,
    /// The line overflowed
    Lose,
}

/// Scheduler payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    Countdown,
    Production,
    Arrival,
    Clock,
    UnlockCheck,
}

/// What a pickup picked up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupItem {
    Produce(OvenId),
    Cash,
}

/// Final numbers handed to the result screen and the recorder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Vault total at the end of the shift
    pub score: u64,
    pub deliveries: u32,
    /// True when the line overflowed
    pub failed: bool,
}

/// One-shot notifications for presentation (VFX, audio, HUD pops)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    CountdownStep { step: usize, label: &'static str },
    ShiftStarted,
    UnitProduced { source: OvenId },
    CustomerArrived { slot: u32, counter: CounterId },
    CustomerServed { id: u32 },
    PickedUp { item: PickupItem },
    Delivered {
        counter: CounterId,
        combo: u32,
        multiplier: f32,
        reward_units: u32,
    },
    Deposited { amount: u64 },
    Exchanged { tokens: u64 },
    Unlocked { unlock: UnlockKind },
    OvenUpgraded { level: u32, interval_ms: u64 },
    ClockTick { remaining_secs: u32 },
    GameEnded { report: ScoreReport },
}

/// Clock color bands for the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockUrgency {
    Normal,
    Warning,
    Critical,
}

/// A bill lying on the floor near a counter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloorCash {
    pub id: u32,
    pub pos: Vec2,
}

/// RNG state wrapper for serialization. Each draw batch uses a fresh stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    pub fn next_rng(&mut self) -> Pcg32 {
        let rng = Pcg32::new(self.seed, self.stream);
        self.stream += 1;
        rng
    }
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng_state: RngState,
    /// Balance table the shift runs with
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// All gameplay timers
    pub clock: VirtualClock<TimerKind>,
    /// Avatar position (fed by presentation or the autopilot)
    pub avatar: Vec2,
    /// Pizzas in hand
    pub held_produce: BoundedStack<Produce>,
    pub wallet: Wallet,
    pub production: Production,
    pub customers: CustomerQueue,
    pub combo: ComboTracker,
    pub upgrades: Upgrades,
    /// Pads not bought yet
    pub unlocks: Vec<UnlockZone>,
    pub floor_cash: Vec<FloorCash>,
    pub time_remaining_secs: u32,
    pub total_deliveries: u32,
    /// Avatar was inside the exchange booth last frame
    pub in_exchange: bool,
    /// Pending notifications, drained by presentation
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng_state: RngState::new(seed),
            phase: GamePhase::Lobby,
            clock: VirtualClock::new(),
            avatar: AVATAR_START,
            held_produce: BoundedStack::new(tuning.max_held_produce),
            wallet: Wallet::new(tuning.max_held_cash),
            production: Production::new(tuning.production_interval_ms, tuning.buffer_capacity),
            customers: CustomerQueue::new(tuning.max_customers),
            combo: ComboTracker::default(),
            upgrades: Upgrades::default(),
            unlocks: standard_pads(&tuning),
            floor_cash: Vec::new(),
            time_remaining_secs: tuning.session_secs,
            total_deliveries: 0,
            in_exchange: false,
            events: Vec::new(),
            next_id: 1,
            tuning,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Simulation time in milliseconds since the state was created
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, GamePhase::Ended(_))
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending notifications
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Cash in hand, in currency
    pub fn pocket_amount(&self) -> u64 {
        self.wallet.pocket_amount(self.tuning.cash_unit_value)
    }

    /// Final report; only meaningful once the shift has ended
    pub fn report(&self) -> ScoreReport {
        ScoreReport {
            score: self.wallet.banked_cash,
            deliveries: self.total_deliveries,
            failed: self.phase == GamePhase::Ended(Outcome::Lose),
        }
    }

    pub fn clock_urgency(&self) -> ClockUrgency {
        match self.time_remaining_secs {
            0..=10 => ClockUrgency::Critical,
            11..=30 => ClockUrgency::Warning,
            _ => ClockUrgency::Normal,
        }
    }

    /// Whether the combo would still chain if a delivery happened now
    pub fn combo_live(&self) -> bool {
        self.combo.is_live(self.now_ms(), self.tuning.combo_window_ms)
    }

    /// Stations near the avatar whose action is available right now
    pub fn hints(&self) -> Vec<ZoneKind> {
        zones::active(self.upgrades, |_| true)
            .filter(|z| within(self.avatar, z.pos, HINT_RADIUS))
            .filter(|z| match z.kind {
                ZoneKind::Oven(_) => {
                    !self.production.buffer.is_empty() && !self.held_produce.is_full()
                }
                ZoneKind::Counter(_) => {
                    !self.held_produce.is_empty() && !self.customers.is_empty()
                }
                ZoneKind::Vault => !self.wallet.held_cash.is_empty(),
                ZoneKind::Exchange => self.wallet.banked_cash >= self.tuning.exchange_rate,
            })
            .map(|z| z.kind)
            .collect()
    }

    /// Unlock pad for `kind`, if it has not been bought yet
    pub fn unlock_pad(&self, kind: UnlockKind) -> Option<&UnlockZone> {
        self.unlocks.iter().find(|z| z.kind == kind)
    }
}
