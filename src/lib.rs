//! Pizza Dash - a pizzeria rush arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (production, queue, economy, combos, unlocks)
//! - `platform`: Logging bootstrap and the identity collaborator
//! - `results`: Session result recording and the local leaderboard
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences

pub mod platform;
pub mod results;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use results::{Leaderboard, ResultRecorder, ScoreReport};
pub use settings::Settings;
pub use tuning::{Ruleset, Tuning};

use glam::Vec2;

/// Map layout and fixed interaction constants
pub mod consts {
    use glam::Vec2;

    /// Map dimensions
    pub const MAP_WIDTH: f32 = 450.0;
    pub const MAP_HEIGHT: f32 = 800.0;

    /// Avatar spawn point (bottom center)
    pub const AVATAR_START: Vec2 = Vec2::new(225.0, 650.0);
    /// Avatar top speed in units per second
    pub const AVATAR_MAX_SPEED: f32 = 300.0;

    /// Station positions
    pub const OVEN_PRIMARY_POS: Vec2 = Vec2::new(380.0, 500.0);
    pub const OVEN_SECONDARY_POS: Vec2 = Vec2::new(80.0, 500.0);
    pub const COUNTER_A_POS: Vec2 = Vec2::new(320.0, 250.0);
    pub const COUNTER_B_POS: Vec2 = Vec2::new(130.0, 250.0);
    pub const VAULT_POS: Vec2 = Vec2::new(380.0, 720.0);
    pub const EXCHANGE_POS: Vec2 = Vec2::new(80.0, 150.0);

    /// Unlock pads
    pub const UNLOCK_OVEN_LEVEL_POS: Vec2 = Vec2::new(225.0, 500.0);
    pub const UNLOCK_COUNTER_B_POS: Vec2 = Vec2::new(130.0, 250.0);
    pub const UNLOCK_OVEN_2_POS: Vec2 = Vec2::new(80.0, 500.0);

    /// Interaction radii (fixed per zone kind)
    pub const OVEN_RADIUS: f32 = 60.0;
    pub const COUNTER_RADIUS: f32 = 70.0;
    pub const VAULT_RADIUS: f32 = 60.0;
    pub const EXCHANGE_RADIUS: f32 = 60.0;
    pub const UNLOCK_RADIUS: f32 = 50.0;
    /// Floor cash is collected when the avatar overlaps a bill
    pub const FLOOR_CASH_RADIUS: f32 = 28.0;
    /// Prompt arrows appear inside this distance
    pub const HINT_RADIUS: f32 = 100.0;

    /// Floor cash scatter around the counter it was paid at
    pub const CASH_SCATTER_X: f32 = 40.0;
    pub const CASH_DROP_MIN_Y: f32 = 30.0;
    pub const CASH_DROP_MAX_Y: f32 = 60.0;

    /// Countdown labels shown before the shift starts
    pub const COUNTDOWN_STEPS: [&str; 4] = ["3", "2", "1", "GO!"];
}

/// Euclidean distance check used by every proximity gate
#[inline]
pub fn within(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance_squared(b) < radius * radius
}

/// Clamp a position to the playable map
#[inline]
pub fn clamp_to_map(pos: Vec2) -> Vec2 {
    pos.clamp(Vec2::ZERO, Vec2::new(consts::MAP_WIDTH, consts::MAP_HEIGHT))
}
