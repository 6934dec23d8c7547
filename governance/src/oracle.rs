//! Voting power oracle: the external source of per-account power.

use crate::error::OracleError;
use agora_types::{AccountId, Timestamp, VotingPower};
use std::sync::Arc;

/// Reports voting power as of a snapshot point.
///
/// Answers must be stable for a fixed `(account, snapshot)` pair for as long
/// as any proposal using that snapshot is alive.
pub trait VotingPowerOracle: Send + Sync {
    /// Power held by `account` at `snapshot`.
    fn power_of(&self, account: &AccountId, snapshot: Timestamp)
        -> Result<VotingPower, OracleError>;

    /// Total power across all accounts at `snapshot` (used by fraction quorums).
    fn total_power(&self, snapshot: Timestamp) -> Result<VotingPower, OracleError>;
}

impl<T: VotingPowerOracle + ?Sized> VotingPowerOracle for Arc<T> {
    fn power_of(
        &self,
        account: &AccountId,
        snapshot: Timestamp,
    ) -> Result<VotingPower, OracleError> {
        (**self).power_of(account, snapshot)
    }

    fn total_power(&self, snapshot: Timestamp) -> Result<VotingPower, OracleError> {
        (**self).total_power(snapshot)
    }
}
