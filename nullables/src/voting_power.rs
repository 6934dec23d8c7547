//! Nullable voting power: an in-memory checkpointed power oracle.

use agora_governance::{OracleError, VotingPowerOracle};
use agora_types::{AccountId, Timestamp, VotingPower};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// Per-account power history.
///
/// A write recorded at `t` is visible only to snapshots strictly after `t`,
/// the way a past-votes lookup reads history. A proposal snapshotted at `t`
/// therefore never sees a same-instant write, and the answer for a fixed
/// `(account, snapshot)` stays the same once that snapshot is in the past.
/// Seeded balances are genesis state and visible at every snapshot.
#[derive(Default)]
pub struct NullVotingPower {
    /// `(visible_from, power)` per account, sorted by `visible_from`.
    checkpoints: Mutex<HashMap<AccountId, Vec<(Timestamp, VotingPower)>>>,
    offline: AtomicBool,
}

impl NullVotingPower {
    pub fn new() -> Self {
        Self::default()
    }

    /// Oracle with genesis balances.
    pub fn with_balances(balances: &[(&str, u128)]) -> Self {
        let oracle = Self::new();
        for (account, power) in balances {
            oracle.seed_power(&AccountId::new(*account), VotingPower::new(*power));
        }
        oracle
    }

    /// Genesis balance for `account`, visible at every snapshot.
    pub fn seed_power(&self, account: &AccountId, power: VotingPower) {
        self.checkpoint(account, Timestamp::EPOCH, power);
    }

    /// Record `power` for `account` at `at`. Snapshots after `at` see it;
    /// snapshots at or before `at` keep the previous value.
    pub fn set_power(&self, account: &AccountId, at: Timestamp, power: VotingPower) {
        self.checkpoint(account, at.plus_secs(1), power);
    }

    fn checkpoint(&self, account: &AccountId, visible_from: Timestamp, power: VotingPower) {
        let mut checkpoints = self.checkpoints.lock().unwrap_or_else(PoisonError::into_inner);
        let history = checkpoints.entry(account.clone()).or_default();
        match history.binary_search_by_key(&visible_from, |(t, _)| *t) {
            Ok(pos) => history[pos].1 = power,
            Err(pos) => history.insert(pos, (visible_from, power)),
        }
    }

    /// Make every query fail with `OracleError::Offline`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), OracleError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(OracleError::Offline("null oracle switched off".into()));
        }
        Ok(())
    }

    fn power_at(history: &[(Timestamp, VotingPower)], snapshot: Timestamp) -> VotingPower {
        let idx = history.partition_point(|(visible_from, _)| *visible_from <= snapshot);
        if idx == 0 {
            VotingPower::ZERO
        } else {
            history[idx - 1].1
        }
    }
}

impl VotingPowerOracle for NullVotingPower {
    fn power_of(&self, account: &AccountId, snapshot: Timestamp) -> Result<VotingPower, OracleError> {
        self.check_online()?;
        let checkpoints = self.checkpoints.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(checkpoints
            .get(account)
            .map(|history| Self::power_at(history, snapshot))
            .unwrap_or(VotingPower::ZERO))
    }

    fn total_power(&self, snapshot: Timestamp) -> Result<VotingPower, OracleError> {
        self.check_online()?;
        let checkpoints = self.checkpoints.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(checkpoints
            .values()
            .map(|history| Self::power_at(history, snapshot))
            .fold(VotingPower::ZERO, VotingPower::saturating_add))
    }
}
