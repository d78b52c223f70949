//! Frame step and session transitions
//!
//! One call to [`tick`] advances the shift by one frame: it applies the avatar
//! position, fires every timer that came due during the frame, then runs the
//! proximity interactions in a fixed order (exchange, cash pickup, deposit,
//! pizza pickup, delivery). Each interaction fires at most once per frame.

use glam::Vec2;
use rand::Rng;

use super::autopilot;
use super::combo::{multiplier, reward_units};
use super::customers::Arrival;
use super::economy::Cost;
use super::inventory::{CashUnit, OvenId, Produce};
use super::scheduler::Scheduler;
use super::state::{FloorCash, GameEvent, GamePhase, GameState, Outcome, PickupItem, TimerKind};
use super::unlock::{HoldCheck, UnlockKind};
use super::zones::{self, CounterId};
use crate::consts::*;
use crate::platform::Identity;
use crate::tuning::ExchangePolicy;
use crate::{clamp_to_map, within};

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Avatar position reported by the input system
    pub avatar: Option<Vec2>,
    /// Demo mode - the autopilot steers the avatar
    pub autopilot: bool,
}

/// Leave the lobby and start the countdown. Refused unless a player is signed in.
pub fn begin(state: &mut GameState, identity: &dyn Identity) -> bool {
    if state.phase != GamePhase::Lobby {
        return false;
    }
    if !identity.is_authenticated() {
        log::info!("Start refused: no authenticated player");
        return false;
    }
    state.phase = GamePhase::Countdown { step: 0 };
    state.emit(GameEvent::CountdownStep {
        step: 0,
        label: COUNTDOWN_STEPS[0],
    });
    let delay = state.tuning.countdown_step_ms;
    state.clock.after(delay, TimerKind::Countdown);
    log::info!("Countdown started (seed {})", state.seed);
    true
}

/// Advance the game state by one frame of `dt_ms` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: u64) {
    match state.phase {
        GamePhase::Lobby | GamePhase::Ended(_) => return,
        GamePhase::Running => {
            if input.autopilot {
                state.avatar = autopilot::steer(state, dt_ms as f32 / 1000.0);
            } else if let Some(pos) = input.avatar {
                state.avatar = clamp_to_map(pos);
            }
        }
        GamePhase::Countdown { .. } => {}
    }

    let until = state.now_ms() + dt_ms;
    while !state.is_over() {
        match state.clock.next_due(until) {
            Some(timer) => dispatch(state, timer),
            None => break,
        }
    }
    state.clock.settle(until);

    if state.is_running() {
        try_exchange(state);
        try_collect_cash(state);
        try_deposit(state);
        try_pickup(state);
        try_deliver(state);
    }
}

fn dispatch(state: &mut GameState, timer: TimerKind) {
    match timer {
        TimerKind::Countdown => advance_countdown(state),
        TimerKind::Production => bake(state),
        TimerKind::Arrival => customer_arrives(state),
        TimerKind::Clock => clock_tick(state),
        TimerKind::UnlockCheck => check_unlocks(state),
    }
}

fn advance_countdown(state: &mut GameState) {
    let GamePhase::Countdown { step } = state.phase else {
        return;
    };
    let next = step + 1;
    if next < COUNTDOWN_STEPS.len() {
        state.phase = GamePhase::Countdown { step: next };
        state.emit(GameEvent::CountdownStep {
            step: next,
            label: COUNTDOWN_STEPS[next],
        });
        let delay = state.tuning.countdown_step_ms;
        state.clock.after(delay, TimerKind::Countdown);
    } else {
        start_shift(state);
    }
}

/// Countdown done: install the repeating timers and open the doors
fn start_shift(state: &mut GameState) {
    state.phase = GamePhase::Running;
    let t = &state.tuning;
    let (bake_ms, arrival_ms, check_ms) =
        (state.production.interval_ms, t.arrival_interval_ms, t.unlock_check_ms);

    state.production.timer = Some(state.clock.every(bake_ms, TimerKind::Production));
    state.clock.every(arrival_ms, TimerKind::Arrival);
    state.clock.every(1000, TimerKind::Clock);
    state.clock.every(check_ms, TimerKind::UnlockCheck);

    state.emit(GameEvent::ShiftStarted);
    log::info!("Shift started: {}s on the clock", state.time_remaining_secs);

    // First customer walks in with the opening
    customer_arrives(state);
}

/// Production timer: each unlocked oven adds one pizza if the rack has room
fn bake(state: &mut GameState) {
    let mut sources = vec![OvenId::Primary];
    if state.upgrades.second_oven {
        sources.push(OvenId::Secondary);
    }
    for source in sources {
        let id = state.next_entity_id();
        if state.production.try_bake(Produce { id, source }) {
            state.emit(GameEvent::UnitProduced { source });
        }
    }
}

fn customer_arrives(state: &mut GameState) {
    let counter = if state.upgrades.second_counter && state.rng_state.next_rng().random_bool(0.5)
    {
        CounterId::B
    } else {
        CounterId::A
    };
    let id = state.next_entity_id();
    match state.customers.arrive(id, counter) {
        Arrival::Joined { slot } => state.emit(GameEvent::CustomerArrived { slot, counter }),
        Arrival::Overflow => end_session(state, Outcome::Lose),
    }
}

fn clock_tick(state: &mut GameState) {
    state.time_remaining_secs = state.time_remaining_secs.saturating_sub(1);
    state.emit(GameEvent::ClockTick {
        remaining_secs: state.time_remaining_secs,
    });
    if state.time_remaining_secs == 0 {
        end_session(state, Outcome::Win);
    }
}

/// Hold meters: one check step for every remaining pad, in table order
fn check_unlocks(state: &mut GameState) {
    let step_ms = state.tuning.unlock_check_ms;
    let threshold_ms = state.tuning.hold_threshold_ms;
    let avatar = state.avatar;

    let mut i = 0;
    while i < state.unlocks.len() {
        let cost = state.unlocks[i].cost;
        let affordable = state.wallet.can_afford(cost);
        let check = state.unlocks[i].check(avatar, affordable, step_ms, threshold_ms);
        if check == HoldCheck::Complete && state.wallet.spend(cost) {
            let pad = state.unlocks.remove(i);
            apply_unlock(state, pad.kind, cost);
            continue;
        }
        i += 1;
    }
}

fn apply_unlock(state: &mut GameState, unlock: UnlockKind, cost: Cost) {
    match unlock {
        UnlockKind::OvenLevel => upgrade_oven(state),
        UnlockKind::SecondCounter => state.upgrades.second_counter = true,
        UnlockKind::SecondOven => state.upgrades.second_oven = true,
    }
    state.emit(GameEvent::Unlocked { unlock });
    log::info!("Unlocked {} for {:?}", unlock.label(), cost);
}

/// Level the ovens up and swap the bake timer for one at the new rate
pub fn upgrade_oven(state: &mut GameState) {
    let (step, floor) = (state.tuning.production_step_ms, state.tuning.production_floor_ms);
    let interval_ms = state.production.upgrade(step, floor);
    if state.is_running() {
        if let Some(handle) = state.production.timer.take() {
            state.clock.cancel(handle);
        }
        state.production.timer = Some(state.clock.every(interval_ms, TimerKind::Production));
    }
    let level = state.production.level;
    state.emit(GameEvent::OvenUpgraded { level, interval_ms });
    log::debug!("Oven level {} bakes every {}ms", level, interval_ms);
}

/// One-way transition into `Ended`. Later triggers are ignored.
pub fn end_session(state: &mut GameState, outcome: Outcome) {
    if state.is_over() {
        return;
    }
    state.phase = GamePhase::Ended(outcome);
    state.clock.clear();
    state.production.timer = None;
    let report = state.report();
    state.emit(GameEvent::GameEnded { report });
    match outcome {
        Outcome::Win => log::info!(
            "Time's up! vault ${} after {} deliveries",
            report.score,
            report.deliveries
        ),
        Outcome::Lose => log::info!(
            "Line overflow! vault ${} after {} deliveries",
            report.score,
            report.deliveries
        ),
    }
}

/// Exchange booth: banked cash into a premium token
pub fn try_exchange(state: &mut GameState) -> bool {
    if !state.is_running() {
        return false;
    }
    let inside = zones::exchange_in_range(state.avatar, &state.upgrades);
    state.in_exchange = inside;
    if !inside {
        state.wallet.rearm_exchange();
        return false;
    }
    let rate = state.tuning.exchange_rate;
    let done = match state.tuning.exchange_policy {
        ExchangePolicy::EveryFrame => state.wallet.exchange(rate),
        ExchangePolicy::OncePerVisit => state.wallet.exchange_once(rate),
    };
    if done {
        let tokens = state.wallet.premium_tokens;
        state.emit(GameEvent::Exchanged { tokens });
        log::debug!("Exchanged ${} for a token ({} held)", rate, tokens);
    }
    done
}

/// Scoop up the nearest floor bill the avatar is standing on
pub fn try_collect_cash(state: &mut GameState) -> bool {
    if !state.is_running() || state.wallet.held_cash.is_full() {
        return false;
    }
    let avatar = state.avatar;
    let nearest = state
        .floor_cash
        .iter()
        .enumerate()
        .filter(|(_, bill)| within(avatar, bill.pos, FLOOR_CASH_RADIUS))
        .min_by(|(_, a), (_, b)| {
            a.pos
                .distance_squared(avatar)
                .partial_cmp(&b.pos.distance_squared(avatar))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i);
    let Some(idx) = nearest else {
        return false;
    };
    let bill = state.floor_cash.swap_remove(idx);
    if state.wallet.held_cash.push(CashUnit { id: bill.id }).is_err() {
        state.floor_cash.push(bill);
        return false;
    }
    state.emit(GameEvent::PickedUp {
        item: PickupItem::Cash,
    });
    true
}

/// Empty the pocket into the vault
pub fn try_deposit(state: &mut GameState) -> bool {
    if !state.is_running() || !zones::vault_in_range(state.avatar, &state.upgrades) {
        return false;
    }
    let Some(amount) = state.wallet.deposit(state.tuning.cash_unit_value) else {
        return false;
    };
    state.emit(GameEvent::Deposited { amount });
    log::debug!("Deposited ${} (vault ${})", amount, state.wallet.banked_cash);
    true
}

/// Take the newest pizza off the rack
pub fn try_pickup(state: &mut GameState) -> bool {
    if !state.is_running()
        || state.held_produce.is_full()
        || zones::oven_in_range(state.avatar, &state.upgrades).is_none()
    {
        return false;
    }
    let Some(unit) = state.production.take_latest() else {
        return false;
    };
    if let Err(unit) = state.held_produce.push(unit) {
        // Unreachable with the fullness check above; keep the pizza on the rack
        state.production.buffer.push(unit);
        return false;
    }
    state.emit(GameEvent::PickedUp {
        item: PickupItem::Produce(unit.source),
    });
    true
}

/// Serve the head of the line from the nearest counter in range
pub fn try_deliver(state: &mut GameState) -> bool {
    if !state.is_running() || state.held_produce.is_empty() || state.customers.is_empty() {
        return false;
    }
    let Some(counter) = zones::counter_in_range(state.avatar, &state.upgrades) else {
        return false;
    };

    state.held_produce.pop();

    let now = state.now_ms();
    let t = &state.tuning;
    let (window, cap, step, base) = (t.combo_window_ms, t.combo_cap, t.combo_step, t.base_reward_units);
    let combo = state.combo.register(now, window);
    let multiplier = multiplier(combo, cap, step);
    let reward_units = reward_units(base, multiplier);

    spawn_floor_cash(state, counter, reward_units);
    if let Some(customer) = state.customers.serve() {
        state.emit(GameEvent::CustomerServed { id: customer.id });
    }
    state.total_deliveries += 1;

    state.emit(GameEvent::Delivered {
        counter,
        combo,
        multiplier,
        reward_units,
    });
    log::debug!(
        "Delivered at {:?}: combo x{} pays {} bills",
        counter,
        combo,
        reward_units
    );
    true
}

/// Drop `count` bills just below a counter
fn spawn_floor_cash(state: &mut GameState, counter: CounterId, count: u32) {
    let origin = counter.pos();
    let mut rng = state.rng_state.next_rng();
    for _ in 0..count {
        let offset = Vec2::new(
            rng.random_range(-CASH_SCATTER_X..=CASH_SCATTER_X),
            rng.random_range(CASH_DROP_MIN_Y..=CASH_DROP_MAX_Y),
        );
        let id = state.next_entity_id();
        state.floor_cash.push(FloorCash {
            id,
            pos: clamp_to_map(origin + offset),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{Authenticated, Guest};
    use crate::sim::unlock::HoldState;
    use crate::tuning::Tuning;

    const FRAME_MS: u64 = 100;

    fn idle() -> TickInput {
        TickInput::default()
    }

    fn at(pos: Vec2) -> TickInput {
        TickInput {
            avatar: Some(pos),
            autopilot: false,
        }
    }

    /// Run `ms` of simulated time in 100ms frames
    fn run(state: &mut GameState, input: &TickInput, ms: u64) {
        for _ in 0..ms / FRAME_MS {
            tick(state, input, FRAME_MS);
        }
    }

    /// A state that has just entered Running (first customer already in line)
    fn running(tuning: Tuning) -> GameState {
        let mut state = GameState::new(12345, tuning);
        assert!(begin(&mut state, &Authenticated));
        run(&mut state, &idle(), 4 * 800);
        assert_eq!(state.phase, GamePhase::Running);
        state.drain_events();
        state
    }

    fn give_produce(state: &mut GameState, n: u32) {
        for _ in 0..n {
            let id = state.next_entity_id();
            state
                .held_produce
                .push(Produce {
                    id,
                    source: OvenId::Primary,
                })
                .unwrap();
        }
    }

    fn give_cash(state: &mut GameState, n: u32) {
        for _ in 0..n {
            let id = state.next_entity_id();
            state.wallet.held_cash.push(CashUnit { id }).unwrap();
        }
    }

    #[test]
    fn guests_cannot_start() {
        let mut state = GameState::new(1, Tuning::default());
        assert!(!begin(&mut state, &Guest));
        assert_eq!(state.phase, GamePhase::Lobby);
        run(&mut state, &idle(), 10_000);
        assert_eq!(state.now_ms(), 0);
    }

    #[test]
    fn countdown_runs_four_steps_then_starts() {
        let mut state = GameState::new(1, Tuning::default());
        assert!(begin(&mut state, &Authenticated));
        assert!(!begin(&mut state, &Authenticated));
        run(&mut state, &idle(), 3100);
        assert_eq!(state.phase, GamePhase::Countdown { step: 3 });
        assert!(state.customers.is_empty());
        tick(&mut state, &idle(), FRAME_MS);
        assert_eq!(state.phase, GamePhase::Running);

        let labels: Vec<_> = state
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                GameEvent::CountdownStep { label, .. } => Some(label),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["3", "2", "1", "GO!"]);
        assert_eq!(state.customers.len(), 1);
    }

    #[test]
    fn avatar_frozen_during_countdown() {
        let mut state = GameState::new(1, Tuning::default());
        begin(&mut state, &Authenticated);
        tick(&mut state, &at(VAULT_POS), FRAME_MS);
        assert_eq!(state.avatar, AVATAR_START);
    }

    #[test]
    fn production_fills_rack_and_drops_overflow() {
        let mut state = running(Tuning::default());
        run(&mut state, &idle(), 3000);
        assert_eq!(state.production.buffer.len(), 1);
        // Park far from the oven and let the rack overflow
        run(&mut state, &idle(), 3000 * 12);
        assert_eq!(state.production.buffer.len(), 10);
    }

    #[test]
    fn second_oven_doubles_output() {
        let mut state = running(Tuning::default());
        state.upgrades.second_oven = true;
        run(&mut state, &idle(), 3000);
        assert_eq!(state.production.buffer.len(), 2);
        let sources: Vec<_> = state.production.buffer.iter().map(|u| u.source).collect();
        assert_eq!(sources, vec![OvenId::Primary, OvenId::Secondary]);
    }

    #[test]
    fn upgrade_reschedules_bake_timer() {
        let mut state = running(Tuning::default());
        run(&mut state, &idle(), 2000);
        upgrade_oven(&mut state);
        assert_eq!(state.production.interval_ms, 2300);
        // The old timer would have fired at 3000; the new one fires 2300 after the upgrade
        run(&mut state, &idle(), 2200);
        assert!(state.production.buffer.is_empty());
        run(&mut state, &idle(), 100);
        assert_eq!(state.production.buffer.len(), 1);
        assert_eq!(
            state.clock.pending(),
            4,
            "bake, arrival, clock and unlock timers"
        );
    }

    #[test]
    fn interval_clamps_at_floor() {
        let mut state = running(Tuning::default());
        let mut seen = vec![state.production.interval_ms];
        for _ in 0..5 {
            upgrade_oven(&mut state);
            seen.push(state.production.interval_ms);
        }
        assert_eq!(seen, vec![3000, 2300, 1600, 900, 800, 800]);
    }

    #[test]
    fn pickup_takes_newest_and_respects_hand_limit() {
        let mut state = running(Tuning::default());
        for id in 100..110 {
            state.production.try_bake(Produce {
                id,
                source: OvenId::Primary,
            });
        }
        let input = at(OVEN_PRIMARY_POS);
        tick(&mut state, &input, FRAME_MS);
        assert_eq!(state.held_produce.peek().map(|u| u.id), Some(109));
        // One pickup per frame
        assert_eq!(state.held_produce.len(), 1);
        run(&mut state, &input, 1000);
        assert_eq!(state.held_produce.len(), 6);
        assert_eq!(state.production.buffer.len(), 4);
    }

    #[test]
    fn pickup_needs_proximity() {
        let mut state = running(Tuning::default());
        state.production.try_bake(Produce {
            id: 1,
            source: OvenId::Primary,
        });
        tick(&mut state, &at(OVEN_PRIMARY_POS + Vec2::new(0.0, 61.0)), FRAME_MS);
        assert!(state.held_produce.is_empty());
        assert!(state.drain_events().iter().all(|e| !matches!(e, GameEvent::PickedUp { .. })));
    }

    #[test]
    fn delivery_combo_sequence() {
        let mut state = running(Tuning::default());
        give_produce(&mut state, 3);
        for id in 0..2 {
            state.customers.arrive(1000 + id, CounterId::A);
        }
        assert_eq!(state.customers.len(), 3);

        let far = at(Vec2::new(225.0, 400.0));
        let counter = at(COUNTER_A_POS);
        let mut delivered = Vec::new();
        for _ in 0..3 {
            tick(&mut state, &counter, FRAME_MS);
            for e in state.drain_events() {
                if let GameEvent::Delivered {
                    combo,
                    multiplier,
                    reward_units,
                    ..
                } = e
                {
                    delivered.push((combo, multiplier, reward_units));
                }
            }
            run(&mut state, &far, 1900);
        }
        assert_eq!(
            delivered,
            vec![(1, 1.0, 2), (2, 1.25, 3), (3, 1.5, 3)]
        );
        assert_eq!(state.total_deliveries, 3);
        assert!(state.customers.len() <= 1, "three served, at most one new arrival");
        assert_eq!(state.floor_cash.len(), 8);
        for bill in &state.floor_cash {
            assert!((bill.pos.x - COUNTER_A_POS.x).abs() <= CASH_SCATTER_X);
            assert!(bill.pos.y >= COUNTER_A_POS.y + CASH_DROP_MIN_Y);
            assert!(bill.pos.y <= COUNTER_A_POS.y + CASH_DROP_MAX_Y);
        }
    }

    #[test]
    fn combo_resets_after_window() {
        let mut state = running(Tuning::default());
        give_produce(&mut state, 2);
        state.customers.arrive(500, CounterId::A);
        tick(&mut state, &at(COUNTER_A_POS), FRAME_MS);
        assert_eq!(state.combo.count, 1);
        run(&mut state, &at(VAULT_POS), 8000);
        tick(&mut state, &at(COUNTER_A_POS), FRAME_MS);
        assert_eq!(state.combo.count, 1);
    }

    #[test]
    fn no_delivery_without_customer() {
        let mut state = running(Tuning::default());
        state.customers.serve();
        give_produce(&mut state, 1);
        tick(&mut state, &at(COUNTER_A_POS), FRAME_MS);
        assert_eq!(state.held_produce.len(), 1);
        assert_eq!(state.total_deliveries, 0);
    }

    #[test]
    fn counter_b_only_after_unlock() {
        let mut state = running(Tuning::default());
        give_produce(&mut state, 1);
        tick(&mut state, &at(COUNTER_B_POS), FRAME_MS);
        assert_eq!(state.total_deliveries, 0);
        state.upgrades.second_counter = true;
        tick(&mut state, &at(COUNTER_B_POS), FRAME_MS);
        assert_eq!(state.total_deliveries, 1);
        assert!(state.floor_cash.iter().all(|b| (b.pos.x - COUNTER_B_POS.x).abs() <= 40.0));
    }

    #[test]
    fn floor_cash_collected_one_per_frame_up_to_limit() {
        let mut state = running(Tuning::default());
        let spot = Vec2::new(225.0, 400.0);
        for _ in 0..12 {
            let id = state.next_entity_id();
            state.floor_cash.push(FloorCash { id, pos: spot });
        }
        let input = at(spot);
        tick(&mut state, &input, FRAME_MS);
        assert_eq!(state.wallet.held_cash.len(), 1);
        run(&mut state, &input, 2000);
        assert_eq!(state.wallet.held_cash.len(), 10);
        assert_eq!(state.floor_cash.len(), 2, "excess stays on the floor");
        assert_eq!(state.pocket_amount(), 1000);
    }

    #[test]
    fn deposit_then_exchange_scenario() {
        let mut state = running(Tuning::default());
        give_cash(&mut state, 3);
        tick(&mut state, &at(VAULT_POS), FRAME_MS);
        assert_eq!(state.wallet.banked_cash, 300);
        assert!(state.wallet.held_cash.is_empty());

        tick(&mut state, &at(EXCHANGE_POS), FRAME_MS);
        assert_eq!(state.wallet.premium_tokens, 0);

        give_cash(&mut state, 4);
        tick(&mut state, &at(VAULT_POS), FRAME_MS);
        give_cash(&mut state, 3);
        tick(&mut state, &at(VAULT_POS), FRAME_MS);
        assert_eq!(state.wallet.banked_cash, 1000);

        tick(&mut state, &at(EXCHANGE_POS), FRAME_MS);
        assert_eq!(state.wallet.banked_cash, 0);
        assert_eq!(state.wallet.premium_tokens, 1);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::Exchanged { tokens: 1 })
        );
    }

    #[test]
    fn lingering_exchanges_every_frame_by_default() {
        let mut state = running(Tuning::default());
        state.wallet.banked_cash = 3500;
        run(&mut state, &at(EXCHANGE_POS), 500);
        assert_eq!(state.wallet.premium_tokens, 3);
        assert_eq!(state.wallet.banked_cash, 500);
    }

    #[test]
    fn once_per_visit_policy() {
        let tuning = Tuning {
            exchange_policy: ExchangePolicy::OncePerVisit,
            ..Tuning::default()
        };
        let mut state = running(tuning);
        state.wallet.banked_cash = 3500;
        run(&mut state, &at(EXCHANGE_POS), 500);
        assert_eq!(state.wallet.premium_tokens, 1);
        tick(&mut state, &at(VAULT_POS), FRAME_MS);
        tick(&mut state, &at(EXCHANGE_POS), FRAME_MS);
        assert_eq!(state.wallet.premium_tokens, 2);
    }

    #[test]
    fn arrival_into_full_line_loses() {
        let mut state = running(Tuning::default());
        while state.customers.len() < state.customers.capacity() {
            let id = state.next_entity_id();
            state.customers.arrive(id, CounterId::A);
        }
        // Next arrival fires 5000ms after the opening
        run(&mut state, &idle(), 4900);
        assert!(state.is_running());
        tick(&mut state, &idle(), FRAME_MS);
        assert_eq!(state.phase, GamePhase::Ended(Outcome::Lose));
        assert_eq!(state.customers.len(), 8);
        assert_eq!(state.clock.pending(), 0);
        let ended: Vec<_> = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameEnded { .. }))
            .collect();
        assert_eq!(ended.len(), 1);
        assert!(state.report().failed);
    }

    #[test]
    fn idle_line_overflows_on_schedule() {
        // One customer at opening plus one every 5s: the 9th arrival at 40s overflows
        let mut state = running(Tuning::default());
        run(&mut state, &idle(), 39_900);
        assert!(state.is_running());
        assert_eq!(state.customers.len(), 8);
        tick(&mut state, &idle(), FRAME_MS);
        assert_eq!(state.phase, GamePhase::Ended(Outcome::Lose));
    }

    #[test]
    fn clock_runs_out_to_a_win() {
        let tuning = Tuning {
            session_secs: 3,
            ..Tuning::default()
        };
        let mut state = running(tuning);
        run(&mut state, &idle(), 2900);
        assert!(state.is_running());
        assert_eq!(state.time_remaining_secs, 1);
        tick(&mut state, &idle(), FRAME_MS);
        assert_eq!(state.phase, GamePhase::Ended(Outcome::Win));
        assert!(!state.report().failed);
    }

    #[test]
    fn ended_state_is_frozen() {
        let mut state = running(Tuning::default());
        end_session(&mut state, Outcome::Win);
        state.drain_events();
        end_session(&mut state, Outcome::Lose);
        assert_eq!(state.phase, GamePhase::Ended(Outcome::Win));
        assert!(state.drain_events().is_empty());

        give_cash(&mut state, 2);
        let before = state.now_ms();
        tick(&mut state, &at(VAULT_POS), FRAME_MS);
        assert_eq!(state.now_ms(), before);
        assert_eq!(state.wallet.banked_cash, 0);
        assert!(!try_deposit(&mut state));
    }

    #[test]
    fn hold_to_buy_second_oven() {
        let mut state = running(Tuning::default());
        state.wallet.banked_cash = 3000;
        let pad = at(UNLOCK_OVEN_2_POS);
        run(&mut state, &pad, 1900);
        assert!(!state.upgrades.second_oven);
        tick(&mut state, &pad, FRAME_MS);
        assert!(state.upgrades.second_oven);
        assert_eq!(state.wallet.banked_cash, 500);
        assert!(state.unlock_pad(UnlockKind::SecondOven).is_none());
        // Staying on the spot never buys it again
        run(&mut state, &pad, 5000);
        assert_eq!(state.wallet.banked_cash, 500);
        let unlocked = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::Unlocked { .. }))
            .count();
        assert_eq!(unlocked, 1);
    }

    #[test]
    fn leaving_the_pad_loses_progress() {
        let mut state = running(Tuning::default());
        state.wallet.banked_cash = 1500;
        let pad = at(UNLOCK_COUNTER_B_POS);
        run(&mut state, &pad, 1500);
        tick(&mut state, &at(Vec2::new(225.0, 400.0)), FRAME_MS);
        assert_eq!(
            state.unlock_pad(UnlockKind::SecondCounter).map(|p| p.hold),
            Some(HoldState::Idle)
        );
        run(&mut state, &pad, 1900);
        assert!(!state.upgrades.second_counter);
        tick(&mut state, &pad, FRAME_MS);
        assert!(state.upgrades.second_counter);
        assert_eq!(state.wallet.banked_cash, 0);
    }

    #[test]
    fn token_pad_levels_oven() {
        let mut state = running(Tuning::default());
        state.wallet.premium_tokens = 1;
        run(&mut state, &at(UNLOCK_OVEN_LEVEL_POS), 2000);
        assert_eq!(state.production.level, 2);
        assert_eq!(state.production.interval_ms, 2300);
        assert_eq!(state.wallet.premium_tokens, 0);
    }

    #[test]
    fn extended_ruleset_holds_longer() {
        let mut state = running(crate::Ruleset::Extended.tuning());
        state.wallet.premium_tokens = 1;
        run(&mut state, &at(UNLOCK_OVEN_LEVEL_POS), 2900);
        assert_eq!(state.production.level, 1);
        tick(&mut state, &at(UNLOCK_OVEN_LEVEL_POS), FRAME_MS);
        assert_eq!(state.production.level, 2);
    }

    #[test]
    fn same_seed_same_shift() {
        let mut a = running(Tuning::default());
        let mut b = running(Tuning::default());
        let input = TickInput {
            avatar: None,
            autopilot: true,
        };
        for _ in 0..600 {
            tick(&mut a, &input, 50);
            tick(&mut b, &input, 50);
        }
        assert_eq!(a.avatar, b.avatar);
        assert_eq!(a.report(), b.report());
        assert_eq!(a.floor_cash.len(), b.floor_cash.len());
    }
}
