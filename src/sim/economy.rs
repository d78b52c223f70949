//! Cash flow: pocket, vault and premium tokens
//!
//! Cash moves one way: floor bills are picked up into the pocket, the pocket
//! is emptied into the vault, vault cash is exchanged for tokens or spent on
//! unlocks.

use serde::{Deserialize, Serialize};

use super::inventory::{BoundedStack, CashUnit};

/// Price of an unlock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cost {
    /// Paid from banked (vault) cash
    Cash(u64),
    /// Paid in premium tokens
    Tokens(u64),
}

/// The player's three balances
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    /// Bills carried by the avatar
    pub held_cash: BoundedStack<CashUnit>,
    /// Cash stored in the vault (the final score)
    pub banked_cash: u64,
    pub premium_tokens: u64,
    /// Cleared after a once-per-visit exchange, re-armed on leaving the booth
    exchange_armed: bool,
}

impl Wallet {
    pub fn new(max_held_cash: usize) -> Self {
        Self {
            held_cash: BoundedStack::new(max_held_cash),
            banked_cash: 0,
            premium_tokens: 0,
            exchange_armed: true,
        }
    }

    /// Value of the bills in hand
    pub fn pocket_amount(&self, unit_value: u64) -> u64 {
        self.held_cash.len() as u64 * unit_value
    }

    /// Move every held bill into the vault. Returns the amount banked, or
    /// None when the pocket was empty.
    pub fn deposit(&mut self, unit_value: u64) -> Option<u64> {
        if self.held_cash.is_empty() {
            return None;
        }
        let amount = self.held_cash.clear() as u64 * unit_value;
        self.banked_cash += amount;
        Some(amount)
    }

    /// Convert `rate` banked cash into one token
    pub fn exchange(&mut self, rate: u64) -> bool {
        if self.banked_cash < rate {
            return false;
        }
        self.banked_cash -= rate;
        self.premium_tokens += 1;
        true
    }

    /// Once-per-visit variant: converts at most once until [`Wallet::rearm_exchange`]
    pub fn exchange_once(&mut self, rate: u64) -> bool {
        if !self.exchange_armed {
            return false;
        }
        let done = self.exchange(rate);
        if done {
            self.exchange_armed = false;
        }
        done
    }

    pub fn rearm_exchange(&mut self) {
        self.exchange_armed = true;
    }

    pub fn can_afford(&self, cost: Cost) -> bool {
        match cost {
            Cost::Cash(n) => self.banked_cash >= n,
            Cost::Tokens(n) => self.premium_tokens >= n,
        }
    }

    /// Deduct a cost. All or nothing.
    pub fn spend(&mut self, cost: Cost) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        match cost {
            Cost::Cash(n) => self.banked_cash -= n,
            Cost::Tokens(n) => self.premium_tokens -= n,
        }
        true
    }
}
