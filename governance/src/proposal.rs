//! Governance proposals and their content-derived identity.

use agora_types::{AccountId, DescriptionHash, ProposalId, Timestamp, VotingPower};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One call executed if the proposal is approved.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProposalAction {
    /// Account the call is addressed to.
    pub target: AccountId,
    /// Value transferred with the call.
    pub value: u128,
    /// Opaque call payload.
    pub payload: Vec<u8>,
}

impl ProposalAction {
    pub fn new(target: impl Into<AccountId>, value: u128, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            target: target.into(),
            value,
            payload: payload.into(),
        }
    }
}

/// Vote accounting rule, fixed when the proposal is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VotingMode {
    /// One token, one vote: the full snapshot power is counted.
    Linear,
    /// Casting `w` votes costs `w²` power.
    Quadratic,
}

impl VotingMode {
    /// Quadratic iff `description` contains `tag`.
    pub fn from_description(description: &str, tag: &str) -> Self {
        if description.contains(tag) {
            VotingMode::Quadratic
        } else {
            VotingMode::Linear
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VotingMode::Linear => "linear",
            VotingMode::Quadratic => "quadratic",
        }
    }
}

impl fmt::Display for VotingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A governance proposal.
///
/// Holds only facts fixed at creation. The lifecycle state is never stored
/// here; it is derived on every read from these facts, the explicit
/// transitions recorded by the registry and the current tally.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub proposer: AccountId,
    /// Ordered calls; empty for a signal-only proposal.
    pub actions: Vec<ProposalAction>,
    pub description: String,
    pub description_hash: DescriptionHash,
    pub mode: VotingMode,
    /// Point at which voting power is measured.
    pub snapshot: Timestamp,
    pub voting_starts_at: Timestamp,
    pub voting_ends_at: Timestamp,
    /// Absolute quorum resolved at creation.
    pub quorum: VotingPower,
}

impl Proposal {
    pub fn is_signal_only(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Canonical byte encoding of an action list.
///
/// Every variable-length field is length-prefixed so distinct action lists can
/// never encode to the same bytes.
pub fn encode_actions(actions: &[ProposalAction]) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + actions.len() * 64);
    out.extend_from_slice(&(actions.len() as u64).to_le_bytes());
    for action in actions {
        let target = action.target.as_str().as_bytes();
        out.extend_from_slice(&(target.len() as u64).to_le_bytes());
        out.extend_from_slice(target);
        out.extend_from_slice(&action.value.to_le_bytes());
        out.extend_from_slice(&(action.payload.len() as u64).to_le_bytes());
        out.extend_from_slice(&action.payload);
    }
    out
}

/// Derive the identity of a proposal from its content.
pub fn proposal_id(actions: &[ProposalAction], description_hash: &DescriptionHash) -> ProposalId {
    agora_crypto::derive_proposal_id(&encode_actions(actions), description_hash)
}

/// Derive the identity of a proposal from its actions and raw description.
pub fn proposal_id_for(actions: &[ProposalAction], description: &str) -> ProposalId {
    proposal_id(actions, &agora_crypto::hash_description(description))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transfer(to: &str, amount: u128) -> ProposalAction {
        ProposalAction::new("token", 0, format!("transfer({to},{amount})").into_bytes())
    }

    #[test]
    fn identity_is_pure_function_of_content() {
        let actions = vec![transfer("owner", 1)];
        let a = proposal_id_for(&actions, "Proposal #1: Give owner 1 token");
        let b = proposal_id_for(&actions.clone(), "Proposal #1: Give owner 1 token");
        assert_eq!(a, b);
    }

    #[test]
    fn identity_changes_with_any_field() {
        let base = proposal_id_for(&[transfer("owner", 1)], "d");
        assert_ne!(base, proposal_id_for(&[transfer("owner", 2)], "d"));
        assert_ne!(base, proposal_id_for(&[transfer("owner", 1)], "d #QV"));
        assert_ne!(base, proposal_id_for(&[], "d"));
        let mut valued = transfer("owner", 1);
        valued.value = 7;
        assert_ne!(base, proposal_id_for(&[valued], "d"));
    }

    #[test]
    fn encoding_is_unambiguous_across_field_boundaries() {
        let a = vec![ProposalAction::new("ab", 0, b"c".to_vec())];
        let b = vec![ProposalAction::new("a", 0, b"bc".to_vec())];
        assert_ne!(encode_actions(&a), encode_actions(&b));
    }

    #[test]
    fn action_order_matters() {
        let x = transfer("x", 1);
        let y = transfer("y", 1);
        assert_ne!(
            proposal_id_for(&[x.clone(), y.clone()], "d"),
            proposal_id_for(&[y, x], "d")
        );
    }

    #[test]
    fn mode_detection_uses_tag() {
        assert_eq!(
            VotingMode::from_description("Proposal #2: QV Test #QV", "#QV"),
            VotingMode::Quadratic
        );
        assert_eq!(
            VotingMode::from_description("Proposal #1", "#QV"),
            VotingMode::Linear
        );
        // Tag match is case-sensitive.
        assert_eq!(VotingMode::from_description("#qv", "#QV"), VotingMode::Linear);
    }
}
