//! Vote costing: how much power a ballot consumes and how much weight it counts.
//!
//! - **Linear**: weight = power at the snapshot; nothing partial.
//! - **Quadratic**: the voter asks for `w` votes, which costs `w²`. The
//!   counted weight is `w`, not `w²`.
//!
//! Power is checked, never debited: each proposal reads its own snapshot, so
//! the same power can back maximal votes on several proposals at once.

use crate::error::GovernanceError;
use crate::proposal::VotingMode;
use agora_types::{AccountId, VotingPower};
use serde::{Deserialize, Serialize};

/// What the voter asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteRequest {
    /// Count the account's full snapshot power (linear proposals).
    FullPower,
    /// Cast this many votes (quadratic proposals).
    Weighted(u128),
}

/// Accepted cost of a ballot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCost {
    /// Votes added to the tally.
    pub weight: VotingPower,
    /// Power consumed to obtain that weight.
    pub power_spent: VotingPower,
}

/// Reject requests whose shape does not match the proposal's mode.
///
/// Runs before the oracle is consulted.
pub fn check_request(mode: VotingMode, request: VoteRequest) -> Result<(), GovernanceError> {
    match (mode, request) {
        (VotingMode::Linear, VoteRequest::FullPower) => Ok(()),
        (VotingMode::Linear, VoteRequest::Weighted(_)) => Err(GovernanceError::WeightNotAccepted),
        (VotingMode::Quadratic, VoteRequest::FullPower) => Err(GovernanceError::WeightRequired),
        (VotingMode::Quadratic, VoteRequest::Weighted(0)) => Err(GovernanceError::ZeroWeight),
        (VotingMode::Quadratic, VoteRequest::Weighted(_)) => Ok(()),
    }
}

/// Price a ballot against the voter's snapshot power.
///
/// Overflow while squaring fails closed with `InsufficientVotingPower`.
pub fn compute_cost(
    mode: VotingMode,
    request: VoteRequest,
    account: &AccountId,
    power: VotingPower,
) -> Result<VoteCost, GovernanceError> {
    check_request(mode, request)?;
    match request {
        VoteRequest::FullPower => {
            if power.is_zero() {
                return Err(GovernanceError::NoVotingPower {
                    account: account.clone(),
                });
            }
            Ok(VoteCost {
                weight: power,
                power_spent: power,
            })
        }
        VoteRequest::Weighted(requested) => {
            let insufficient = || GovernanceError::InsufficientVotingPower {
                account: account.clone(),
                requested,
                available: power,
            };
            let cost = VotingPower::new(requested)
                .checked_square()
                .ok_or_else(insufficient)?;
            if cost > power {
                return Err(insufficient());
            }
            Ok(VoteCost {
                weight: VotingPower::new(requested),
                power_spent: cost,
            })
        }
    }
}

/// Largest `w` with `w² ≤ power`, i.e. `floor(sqrt(power))`.
pub fn max_quadratic_votes(power: VotingPower) -> u128 {
    integer_sqrt(power.raw())
}

/// Integer square root by Newton's method, exact for the full `u128` range.
pub fn integer_sqrt(n: u128) -> u128 {
    if n < 2 {
        return n;
    }
    let mut x = n;
    let mut y = (x >> 1) + (x & 1);
    while y < x {
        x = y;
        y = (x + n / x) >> 1;
    }
    x
}
