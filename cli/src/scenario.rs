//! Scripted governance scenarios for `agora simulate`.
//!
//! A scenario is a TOML file: optional governance overrides, initial balances
//! and an ordered list of steps. Proposals are referred to by a local label
//! instead of their 32-byte id.
//!
//! ```toml
//! [[balances]]
//! account = "voter1"
//! power = 100
//!
//! [[steps]]
//! action = "propose"
//! label = "qv"
//! proposer = "owner"
//! description = "Proposal #2: QV Test #QV"
//!
//! [[steps]]
//! action = "advance"
//! secs = 10
//!
//! [[steps]]
//! action = "vote"
//! label = "qv"
//! voter = "voter1"
//! support = "for"
//! weight = 10
//! ```

use crate::error::CliError;
use agora_governance::{ProposalAction, ProposalState, Support};
use agora_types::GovernanceConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Clock value before the first step.
    #[serde(default)]
    pub start_at: u64,

    #[serde(default)]
    pub balances: Vec<Balance>,

    #[serde(default)]
    pub steps: Vec<Step>,

    /// Replaces the configured governance parameters for this run.
    #[serde(default)]
    pub governance: Option<GovernanceConfig>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub account: String,
    pub power: u64,
}

/// One action in a proposal, as written in a scenario.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSpec {
    pub target: String,
    #[serde(default)]
    pub value: u64,
    /// Hex-encoded call payload.
    #[serde(default)]
    pub payload: String,
}

impl ActionSpec {
    pub fn to_action(&self) -> Result<ProposalAction, CliError> {
        let payload = hex::decode(self.payload.trim_start_matches("0x"))
            .map_err(|e| CliError::Scenario(format!("bad payload hex for {}: {e}", self.target)))?;
        Ok(ProposalAction::new(self.target.as_str(), self.value as u128, payload))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Record a power checkpoint at the current clock value. Proposals created
    /// at this instant or earlier keep their old snapshot.
    SetPower { account: String, power: u64 },
    Advance { secs: u64 },
    AdvanceTo { at: u64 },
    Propose {
        label: String,
        proposer: String,
        description: String,
        #[serde(default)]
        actions: Vec<ActionSpec>,
    },
    /// `weight` is required for quadratic proposals and rejected for linear ones.
    Vote {
        label: String,
        voter: String,
        support: Support,
        #[serde(default)]
        weight: Option<u64>,
    },
    Cancel { label: String, caller: String },
    Queue { label: String },
    Execute { label: String },
    /// Fail the run unless the proposal is in `state`.
    Expect { label: String, state: ProposalState },
    /// Switch the oracle offline or back online.
    OracleOffline { offline: bool },
    /// Make the timelock reject or accept calls.
    TimelockRejecting { rejecting: bool },
}

impl Scenario {
    pub fn from_toml_file(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CliError::Scenario(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, CliError> {
        toml::from_str(s).map_err(|e| CliError::Scenario(e.to_string()))
    }
}

/// Parse a `target:value[:hexpayload]` action argument.
pub fn parse_action(arg: &str) -> Result<ProposalAction, CliError> {
    let mut parts = arg.splitn(3, ':');
    let target = parts.next().filter(|t| !t.is_empty());
    let value = parts.next().and_then(|v| v.parse::<u128>().ok());
    let (Some(target), Some(value)) = (target, value) else {
        return Err(CliError::InvalidAction(arg.to_string()));
    };
    let payload = match parts.next() {
        Some(hex_str) => hex::decode(hex_str.trim_start_matches("0x"))
            .map_err(|_| CliError::InvalidAction(arg.to_string()))?,
        None => Vec::new(),
    };
    Ok(ProposalAction::new(target, value, payload))
}
