//! Events emitted by the governor for an embedding service to process.

use crate::ledger::Support;
use crate::proposal::VotingMode;
use agora_types::{AccountId, ProposalId, ScheduleId, Timestamp, VotingPower};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GovernanceEvent {
    ProposalCreated {
        id: ProposalId,
        proposer: AccountId,
        mode: VotingMode,
        voting_starts_at: Timestamp,
        voting_ends_at: Timestamp,
        quorum: VotingPower,
    },
    VoteCast {
        id: ProposalId,
        voter: AccountId,
        support: Support,
        weight: VotingPower,
        power_spent: VotingPower,
    },
    ProposalCanceled {
        id: ProposalId,
        at: Timestamp,
    },
    /// Accepted by the execution queue; runnable from `eta`.
    ProposalQueued {
        id: ProposalId,
        schedule_id: ScheduleId,
        eta: Timestamp,
        expires_at: Timestamp,
    },
    ProposalExecuted {
        id: ProposalId,
        at: Timestamp,
    },
}

impl GovernanceEvent {
    pub fn proposal_id(&self) -> &ProposalId {
        match self {
            GovernanceEvent::ProposalCreated { id, .. }
            | GovernanceEvent::VoteCast { id, .. }
            | GovernanceEvent::ProposalCanceled { id, .. }
            | GovernanceEvent::ProposalQueued { id, .. }
            | GovernanceEvent::ProposalExecuted { id, .. } => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_a_tag() {
        let event = GovernanceEvent::ProposalCanceled {
            id: ProposalId::new([1; 32]),
            at: Timestamp::new(42),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "proposal_canceled");
        assert_eq!(json["at"], 42);

        let back: GovernanceEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
        assert_eq!(back.proposal_id(), &ProposalId::new([1; 32]));
    }
}
