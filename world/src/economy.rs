//! Currency, lives and wave counter.

use lane_defence_core::EconomyRules;

/// Balances mutated by spending, rewards and escapes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Economy {
    pub(crate) currency: u32,
    pub(crate) lives: i32,
    pub(crate) wave: u32,
}

impl Economy {
    pub(crate) fn new(rules: &EconomyRules) -> Self {
        Self {
            currency: rules.starting_currency,
            lives: rules.starting_lives,
            wave: 0,
        }
    }

    /// Debits `cost` when affordable, leaving the balance untouched otherwise.
    pub(crate) fn spend(&mut self, cost: u32) -> bool {
        match self.currency.checked_sub(cost) {
            Some(remaining) => {
                self.currency = remaining;
                true
            }
            None => false,
        }
    }

    pub(crate) fn earn(&mut self, amount: u32) {
        self.currency = self.currency.saturating_add(amount);
    }

    pub(crate) fn lose_life(&mut self) -> i32 {
        self.lives -= 1;
        self.lives
    }

    pub(crate) fn advance_wave(&mut self) -> u32 {
        self.wave = self.wave.saturating_add(1);
        self.wave
    }
}
