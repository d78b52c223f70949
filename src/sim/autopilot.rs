//! Demo-mode steering
//!
//! Picks the most useful station for the current inventory and walks the
//! avatar toward it at top speed. Used for attract mode and the headless
//! runner; it only ever produces a position, the same as player input.

use glam::Vec2;

use super::state::GameState;
use super::unlock::UnlockKind;
use super::zones::{self, ZoneKind};
use crate::clamp_to_map;
use crate::consts::*;

/// Next avatar position after `dt` seconds of autopilot steering
pub fn steer(state: &GameState, dt: f32) -> Vec2 {
    let target = choose_target(state);
    step_toward(state.avatar, target, AVATAR_MAX_SPEED * dt)
}

/// Move from `from` toward `to` by at most `max_step`, landing on the target when close
pub fn step_toward(from: Vec2, to: Vec2, max_step: f32) -> Vec2 {
    let delta = to - from;
    let dist = delta.length();
    if dist <= max_step || dist <= f32::EPSILON {
        return clamp_to_map(to);
    }
    clamp_to_map(from + delta / dist * max_step)
}

/// Where the autopilot wants to be right now
pub fn choose_target(state: &GameState) -> Vec2 {
    let wallet = &state.wallet;
    let carrying = !state.held_produce.is_empty();

    // Full pockets: bank first
    if wallet.held_cash.is_full() {
        return VAULT_POS;
    }

    // Serve while customers are waiting
    if carrying && !state.customers.is_empty() {
        if let Some(pos) = nearest_station(state, |k| matches!(k, ZoneKind::Counter(_))) {
            return pos;
        }
    }

    // Hold an affordable pad until it pays out
    if let Some(pad) = state
        .unlocks
        .iter()
        .find(|pad| wallet.can_afford(pad.cost))
    {
        return pad.pos;
    }

    if let Some(bill) = nearest(state.avatar, state.floor_cash.iter().map(|b| b.pos)) {
        return bill;
    }

    if !wallet.held_cash.is_empty() {
        return VAULT_POS;
    }

    // Save up a token for the oven level while it is still for sale
    if wallet.premium_tokens == 0
        && wallet.banked_cash >= state.tuning.exchange_rate
        && state.unlock_pad(UnlockKind::OvenLevel).is_some()
    {
        return EXCHANGE_POS;
    }

    if !state.production.buffer.is_empty() && !state.held_produce.is_full() {
        if let Some(pos) = nearest_station(state, |k| matches!(k, ZoneKind::Oven(_))) {
            return pos;
        }
    }

    OVEN_PRIMARY_POS
}

fn nearest_station(state: &GameState, filter: impl Fn(ZoneKind) -> bool) -> Option<Vec2> {
    nearest(
        state.avatar,
        zones::active(state.upgrades, filter).map(|z| z.pos),
    )
}

fn nearest(from: Vec2, candidates: impl Iterator<Item = Vec2>) -> Option<Vec2> {
    candidates.min_by(|a, b| {
        a.distance_squared(from)
            .partial_cmp(&b.distance_squared(from))
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}
