//! Voting power amounts.
//!
//! Power is a non-negative integer stored as `u128` raw units. All
//! arithmetic that could exceed the range is checked; callers decide
//! whether an overflow fails closed or saturates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Voting power of an account (or a weight derived from it).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct VotingPower(u128);

impl VotingPower {
    pub const ZERO: Self = Self(0);

    pub fn new(raw: u128) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// `self²`, or `None` when the square does not fit in `u128`.
    pub fn checked_square(self) -> Option<Self> {
        self.0.checked_mul(self.0).map(Self)
    }

    /// `self × bps / 10_000` without intermediate overflow.
    pub fn fraction_bps(self, bps: u32) -> Self {
        let bps = bps as u128;
        let whole = self.0 / 10_000;
        let rem = self.0 % 10_000;
        Self(whole.saturating_mul(bps).saturating_add(rem * bps / 10_000))
    }
}

impl From<u128> for VotingPower {
    fn from(raw: u128) -> Self {
        Self(raw)
    }
}

impl fmt::Display for VotingPower {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_overflow_is_none() {
        assert_eq!(VotingPower::new(10).checked_square(), Some(VotingPower::new(100)));
        assert_eq!(VotingPower::new(u128::MAX).checked_square(), None);
        assert_eq!(VotingPower::new(1u128 << 64).checked_square(), None);
        assert!(VotingPower::new((1u128 << 64) - 1).checked_square().is_some());
    }

    #[test]
    fn fraction_of_total_supply() {
        // 4% of 100M
        assert_eq!(
            VotingPower::new(100_000_000).fraction_bps(400),
            VotingPower::new(4_000_000)
        );
        assert_eq!(VotingPower::new(99).fraction_bps(10_000), VotingPower::new(99));
        assert_eq!(VotingPower::new(u128::MAX).fraction_bps(10_000).raw(), u128::MAX);
    }
}
