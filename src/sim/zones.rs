//! Interaction zones
//!
//! Every station on the map is a row in [`STATIONS`]. Proximity checks walk
//! the table instead of hard-coding per-station conditionals; stations that
//! have to be bought first carry a [`Requirement`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::inventory::OvenId;
use crate::consts::*;
use crate::within;

/// Service counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CounterId {
    A,
    B,
}

impl CounterId {
    pub fn pos(&self) -> Vec2 {
        match self {
            CounterId::A => COUNTER_A_POS,
            CounterId::B => COUNTER_B_POS,
        }
    }
}

/// What a station does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneKind {
    Oven(OvenId),
    Counter(CounterId),
    Vault,
    Exchange,
}

/// Purchased unlocks gating a station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Requirement {
    Always,
    SecondOven,
    SecondCounter,
}

/// One-way upgrade flags bought during the shift
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upgrades {
    pub second_oven: bool,
    pub second_counter: bool,
}

impl Upgrades {
    pub fn satisfies(&self, req: Requirement) -> bool {
        match req {
            Requirement::Always => true,
            Requirement::SecondOven => self.second_oven,
            Requirement::SecondCounter => self.second_counter,
        }
    }
}

/// A fixed station on the map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zone {
    pub kind: ZoneKind,
    pub pos: Vec2,
    pub radius: f32,
    pub requires: Requirement,
}

impl Zone {
    pub fn is_active(&self, upgrades: &Upgrades) -> bool {
        upgrades.satisfies(self.requires)
    }

    pub fn contains(&self, pos: Vec2) -> bool {
        within(pos, self.pos, self.radius)
    }
}

/// The station table
pub const STATIONS: [Zone; 6] = [
    Zone {
        kind: ZoneKind::Oven(OvenId::Primary),
        pos: OVEN_PRIMARY_POS,
        radius: OVEN_RADIUS,
        requires: Requirement::Always,
    },
    Zone {
        kind: ZoneKind::Oven(OvenId::Secondary),
        pos: OVEN_SECONDARY_POS,
        radius: OVEN_RADIUS,
        requires: Requirement::SecondOven,
    },
    Zone {
        kind: ZoneKind::Counter(CounterId::A),
        pos: COUNTER_A_POS,
        radius: COUNTER_RADIUS,
        requires: Requirement::Always,
    },
    Zone {
        kind: ZoneKind::Counter(CounterId::B),
        pos: COUNTER_B_POS,
        radius: COUNTER_RADIUS,
        requires: Requirement::SecondCounter,
    },
    Zone {
        kind: ZoneKind::Vault,
        pos: VAULT_POS,
        radius: VAULT_RADIUS,
        requires: Requirement::Always,
    },
    Zone {
        kind: ZoneKind::Exchange,
        pos: EXCHANGE_POS,
        radius: EXCHANGE_RADIUS,
        requires: Requirement::Always,
    },
];

/// Active stations matching `filter`
pub fn active(
    upgrades: Upgrades,
    filter: impl Fn(ZoneKind) -> bool,
) -> impl Iterator<Item = &'static Zone> {
    STATIONS
        .iter()
        .filter(move |z| z.is_active(&upgrades) && filter(z.kind))
}

/// Nearest active station matching `filter` whose radius contains `pos`
pub fn nearest_in_range(
    pos: Vec2,
    upgrades: &Upgrades,
    filter: impl Fn(ZoneKind) -> bool,
) -> Option<&'static Zone> {
    active(*upgrades, filter)
        .filter(|z| z.contains(pos))
        .min_by(|a, b| {
            a.pos
                .distance_squared(pos)
                .partial_cmp(&b.pos.distance_squared(pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

pub fn oven_in_range(pos: Vec2, upgrades: &Upgrades) -> Option<OvenId> {
    match nearest_in_range(pos, upgrades, |k| matches!(k, ZoneKind::Oven(_)))?.kind {
        ZoneKind::Oven(id) => Some(id),
        _ => None,
    }
}

/// When both counters are in range the nearer one takes the delivery
pub fn counter_in_range(pos: Vec2, upgrades: &Upgrades) -> Option<CounterId> {
    match nearest_in_range(pos, upgrades, |k| matches!(k, ZoneKind::Counter(_)))?.kind {
        ZoneKind::Counter(id) => Some(id),
        _ => None,
    }
}

pub fn vault_in_range(pos: Vec2, upgrades: &Upgrades) -> bool {
    nearest_in_range(pos, upgrades, |k| k == ZoneKind::Vault).is_some()
}

pub fn exchange_in_range(pos: Vec2, upgrades: &Upgrades) -> bool {
    nearest_in_range(pos, upgrades, |k| k == ZoneKind::Exchange).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locked_stations_are_ignored() {
        let none = Upgrades::default();
        assert_eq!(oven_in_range(OVEN_SECONDARY_POS, &none), None);
        assert_eq!(counter_in_range(COUNTER_B_POS, &none), None);

        let all = Upgrades {
            second_oven: true,
            second_counter: true,
        };
        assert_eq!(oven_in_range(OVEN_SECONDARY_POS, &all), Some(OvenId::Secondary));
        assert_eq!(counter_in_range(COUNTER_B_POS, &all), Some(CounterId::B));
    }

    #[test]
    fn nearer_counter_wins() {
        let all = Upgrades {
            second_oven: true,
            second_counter: true,
        };
        let near_a = COUNTER_A_POS - Vec2::new(60.0, 0.0);
        assert_eq!(counter_in_range(near_a, &all), Some(CounterId::A));
        let near_b = COUNTER_B_POS + Vec2::new(10.0, 0.0);
        assert_eq!(counter_in_range(near_b, &all), Some(CounterId::B));
    }

    #[test]
    fn radii_per_kind() {
        let none = Upgrades::default();
        assert!(counter_in_range(COUNTER_A_POS + Vec2::new(0.0, 65.0), &none).is_some());
        assert!(oven_in_range(OVEN_PRIMARY_POS + Vec2::new(0.0, 65.0), &none).is_none());
        assert!(vault_in_range(VAULT_POS + Vec2::new(59.0, 0.0), &none));
        assert!(!exchange_in_range(EXCHANGE_POS + Vec2::new(61.0, 0.0), &none));
    }
}
