//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through `tick`
//! - Seeded RNG only
//! - Timers fire in (deadline, schedule order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod combo;
pub mod customers;
pub mod economy;
pub mod inventory;
pub mod production;
pub mod scheduler;
pub mod state;
pub mod tick;
pub mod unlock;
pub mod zones;

pub use customers::{Customer, CustomerQueue, QueueUrgency};
pub use economy::{Cost, Wallet};
pub use inventory::{BoundedStack, CashUnit, OvenId, Produce};
pub use scheduler::{Scheduler, TimerHandle, VirtualClock};
pub use state::{
    ClockUrgency, FloorCash, GameEvent, GamePhase, GameState, Outcome, PickupItem, ScoreReport,
    TimerKind,
};
pub use tick::{TickInput, begin, end_session, tick};
pub use unlock::{HoldState, UnlockKind, UnlockZone};
pub use zones::{CounterId, Upgrades, ZoneKind};
