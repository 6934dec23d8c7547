//! Vote ledger: one record per (proposal, account) and the running tally.

use crate::costing::{self, VoteRequest};
use crate::error::GovernanceError;
use crate::lifecycle::ProposalState;
use crate::oracle::VotingPowerOracle;
use crate::proposal::Proposal;
use crate::tally::Tally;
use agora_types::{AccountId, ProposalId, Timestamp, VotingPower};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Direction of a vote. Codes follow the usual governor convention.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Support {
    Against = 0,
    For = 1,
    Abstain = 2,
}

impl TryFrom<u8> for Support {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Support::Against),
            1 => Ok(Support::For),
            2 => Ok(Support::Abstain),
            other => Err(format!("unknown support code {other}")),
        }
    }
}

impl FromStr for Support {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "against" | "no" | "0" => Ok(Support::Against),
            "for" | "yes" | "1" => Ok(Support::For),
            "abstain" | "2" => Ok(Support::Abstain),
            other => Err(format!("unknown support {other:?}")),
        }
    }
}

impl fmt::Display for Support {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Support::Against => "against",
            Support::For => "for",
            Support::Abstain => "abstain",
        })
    }
}

/// A single cast vote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub account: AccountId,
    pub support: Support,
    /// Votes counted in the tally.
    pub weight: VotingPower,
    /// Power consumed to obtain `weight`.
    pub power_spent: VotingPower,
    /// Snapshot power the ballot was priced against.
    pub power_available: VotingPower,
    pub cast_at: Timestamp,
}

/// A vote as submitted by a caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ballot {
    pub account: AccountId,
    pub support: Support,
    pub request: VoteRequest,
}

/// Votes on one proposal.
///
/// Reads the proposal and its current state to decide admission but never
/// changes either.
#[derive(Clone, Debug)]
pub struct VoteLedger {
    proposal: ProposalId,
    records: HashMap<AccountId, VoteRecord>,
    tally: Tally,
}

impl VoteLedger {
    pub fn new(proposal: ProposalId) -> Self {
        Self {
            proposal,
            records: HashMap::new(),
            tally: Tally::default(),
        }
    }

    pub fn proposal(&self) -> &ProposalId {
        &self.proposal
    }

    pub fn tally(&self) -> &Tally {
        &self.tally
    }

    pub fn has_voted(&self, account: &AccountId) -> bool {
        self.records.contains_key(account)
    }

    pub fn get(&self, account: &AccountId) -> Option<&VoteRecord> {
        self.records.get(account)
    }

    pub fn records(&self) -> impl Iterator<Item = &VoteRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Admit, price and record a ballot.
    ///
    /// Checks run cheapest first: state, duplicate, request shape, then the
    /// oracle. Nothing is written unless every check passes.
    pub fn cast_vote<O: VotingPowerOracle + ?Sized>(
        &mut self,
        proposal: &Proposal,
        state: ProposalState,
        ballot: Ballot,
        oracle: &O,
        now: Timestamp,
    ) -> Result<VoteRecord, GovernanceError> {
        if state != ProposalState::Active {
            return Err(GovernanceError::NotActive { state });
        }
        if self.has_voted(&ballot.account) {
            return Err(GovernanceError::AlreadyVoted {
                account: ballot.account,
            });
        }
        costing::check_request(proposal.mode, ballot.request)?;

        let power = oracle.power_of(&ballot.account, proposal.snapshot)?;
        let cost = costing::compute_cost(proposal.mode, ballot.request, &ballot.account, power)?;

        let record = VoteRecord {
            account: ballot.account.clone(),
            support: ballot.support,
            weight: cost.weight,
            power_spent: cost.power_spent,
            power_available: power,
            cast_at: now,
        };
        self.tally.record(record.support, record.weight);
        self.records.insert(ballot.account, record.clone());
        Ok(record)
    }

    /// Rebuild the tally from the stored records.
    pub fn recompute_tally(&self) -> Tally {
        let mut tally = Tally::default();
        for record in self.records.values() {
            tally.record(record.support, record.weight);
        }
        tally
    }
}
