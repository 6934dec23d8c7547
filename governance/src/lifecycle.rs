//! Proposal lifecycle: states and the pure transition function.
//!
//! ```text
//!            create
//!              │
//!           Pending ──(now ≥ starts)──► Active ──(now ≥ ends)──► Succeeded ──queue()──► Queued ──execute()──► Executed
//!              │                          │                 └──► Defeated                │
//!              └────────cancel()──────────┴──► Canceled                                  └──(grace passed)──► Expired
//! ```
//!
//! Time-triggered edges are never applied by a timer. Every read recomputes
//! the state from the proposal's fixed facts, the explicit transitions and the
//! tally, so the answer depends only on `now`, never on when someone looked.

use crate::proposal::Proposal;
use crate::tally::{Tally, TallyEvaluator, TallyOutcome};
use agora_types::{ScheduleId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalState {
    Pending,
    Active,
    Canceled,
    Defeated,
    Succeeded,
    Queued,
    Expired,
    Executed,
}

impl ProposalState {
    pub const ALL: [ProposalState; 8] = [
        ProposalState::Pending,
        ProposalState::Active,
        ProposalState::Canceled,
        ProposalState::Defeated,
        ProposalState::Succeeded,
        ProposalState::Queued,
        ProposalState::Expired,
        ProposalState::Executed,
    ];

    /// No further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProposalState::Canceled
                | ProposalState::Defeated
                | ProposalState::Expired
                | ProposalState::Executed
        )
    }

    /// Numeric code in declaration order (Pending = 0 … Executed = 7).
    pub fn code(&self) -> u8 {
        *self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalState::Pending => "Pending",
            ProposalState::Active => "Active",
            ProposalState::Canceled => "Canceled",
            ProposalState::Defeated => "Defeated",
            ProposalState::Succeeded => "Succeeded",
            ProposalState::Queued => "Queued",
            ProposalState::Expired => "Expired",
            ProposalState::Executed => "Executed",
        }
    }
}

impl fmt::Display for ProposalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A batch handed to the execution queue by `queue()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedBatch {
    pub schedule_id: ScheduleId,
    pub queued_at: Timestamp,
    /// Earliest instant `execute()` is accepted.
    pub eta: Timestamp,
    /// First instant at which the batch counts as expired.
    pub expires_at: Timestamp,
}

/// Explicit transitions recorded against a proposal.
///
/// Canceled, Queued and Executed are the only states that are stored; every
/// other state is derived.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transitions {
    pub canceled_at: Option<Timestamp>,
    pub queued: Option<QueuedBatch>,
    pub executed_at: Option<Timestamp>,
}

/// Compute the state of `proposal` at `now`.
pub fn derive_state(
    proposal: &Proposal,
    transitions: &Transitions,
    tally: &Tally,
    now: Timestamp,
) -> ProposalState {
    if transitions.executed_at.is_some() {
        return ProposalState::Executed;
    }
    if transitions.canceled_at.is_some() {
        return ProposalState::Canceled;
    }
    if let Some(batch) = &transitions.queued {
        return if now >= batch.expires_at {
            ProposalState::Expired
        } else {
            ProposalState::Queued
        };
    }
    if now < proposal.voting_starts_at {
        return ProposalState::Pending;
    }
    if now < proposal.voting_ends_at {
        return ProposalState::Active;
    }
    match TallyEvaluator::evaluate(tally, proposal.quorum) {
        TallyOutcome::Succeeded => ProposalState::Succeeded,
        TallyOutcome::Defeated => ProposalState::Defeated,
    }
}
