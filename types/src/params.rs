//! Governance parameters: the explicit configuration every `Governor` is built with.
//!
//! Nothing in the engine reads ambient global state: durations, quorum and the
//! timelock gate all come from this struct, which makes arbitrary values easy
//! to exercise in tests.

use crate::error::AgoraError;
use crate::power::VotingPower;
use serde::{Deserialize, Serialize};

/// Basis-point denominator (10_000 = 100%).
pub const BPS_DENOMINATOR: u32 = 10_000;

/// How the quorum threshold of a proposal is determined.
///
/// The rule is resolved once, when the proposal is created, and the resulting
/// absolute threshold stays fixed for the life of that proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuorumRule {
    /// A fixed amount of for + abstain votes.
    Absolute(u64),
    /// A fraction of total voting power at the proposal snapshot.
    Fraction { bps: u32 },
}

impl QuorumRule {
    /// Resolve the rule into an absolute threshold given total power at the snapshot.
    pub fn resolve(&self, total_power: VotingPower) -> VotingPower {
        match *self {
            QuorumRule::Absolute(amount) => VotingPower::new(amount as u128),
            QuorumRule::Fraction { bps } => total_power.fraction_bps(bps),
        }
    }

    /// Whether resolving this rule needs the total supply at the snapshot.
    pub fn needs_total_power(&self) -> bool {
        matches!(self, QuorumRule::Fraction { .. })
    }
}

/// All governance parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceConfig {
    /// Delay between proposal creation and the start of voting.
    /// Default: 1 day (7200 blocks at 12 s).
    #[serde(default = "default_voting_delay_secs")]
    pub voting_delay_secs: u64,

    /// Length of the voting window. Default: 1 week (50400 blocks at 12 s).
    #[serde(default = "default_voting_period_secs")]
    pub voting_period_secs: u64,

    /// Minimum delay the execution queue must enforce after `queue()`.
    #[serde(default)]
    pub timelock_min_delay_secs: u64,

    /// Window after the timelock delay during which `execute()` is accepted.
    /// Default: 14 days.
    #[serde(default = "default_grace_period_secs")]
    pub grace_period_secs: u64,

    /// Minimum voting power a proposer needs at creation time (0 disables).
    #[serde(default)]
    pub proposal_threshold: u64,

    /// Description substring that switches a proposal to quadratic voting.
    #[serde(default = "default_quadratic_tag")]
    pub quadratic_tag: String,

    /// Quorum rule, resolved at creation. Default: 4% of total power.
    /// Kept last: it serializes as a TOML table.
    #[serde(default = "default_quorum")]
    pub quorum: QuorumRule,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_voting_delay_secs() -> u64 {
    24 * 3600
}

fn default_voting_period_secs() -> u64 {
    7 * 24 * 3600
}

fn default_quorum() -> QuorumRule {
    QuorumRule::Fraction { bps: 400 }
}

fn default_grace_period_secs() -> u64 {
    14 * 24 * 3600
}

fn default_quadratic_tag() -> String {
    "#QV".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl GovernanceConfig {
    /// Short timelines for local simulation and tests.
    pub fn dev_defaults() -> Self {
        Self {
            voting_delay_secs: 10,
            voting_period_secs: 100,
            quorum: QuorumRule::Absolute(1),
            timelock_min_delay_secs: 20,
            grace_period_secs: 50,
            proposal_threshold: 0,
            quadratic_tag: default_quadratic_tag(),
        }
    }

    /// Reject parameter sets that would break lifecycle invariants.
    pub fn validate(&self) -> Result<(), AgoraError> {
        if self.voting_period_secs == 0 {
            return Err(AgoraError::InvalidConfig(
                "voting_period_secs must be greater than zero".into(),
            ));
        }
        if self.grace_period_secs == 0 {
            return Err(AgoraError::InvalidConfig(
                "grace_period_secs must be greater than zero".into(),
            ));
        }
        if let QuorumRule::Fraction { bps } = self.quorum {
            if bps > BPS_DENOMINATOR {
                return Err(AgoraError::InvalidConfig(format!(
                    "quorum fraction {bps} bps exceeds {BPS_DENOMINATOR}"
                )));
            }
        }
        if self.quadratic_tag.is_empty() {
            return Err(AgoraError::InvalidConfig(
                "quadratic_tag must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Default mirrors the deployed governor (1 day delay, 1 week vote, 4% quorum, 0 s timelock).
impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            voting_delay_secs: default_voting_delay_secs(),
            voting_period_secs: default_voting_period_secs(),
            quorum: default_quorum(),
            timelock_min_delay_secs: 0,
            grace_period_secs: default_grace_period_secs(),
            proposal_threshold: 0,
            quadratic_tag: default_quadratic_tag(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(GovernanceConfig::default().validate().is_ok());
        assert!(GovernanceConfig::dev_defaults().validate().is_ok());
    }

    #[test]
    fn zero_voting_period_rejected() {
        let config = GovernanceConfig {
            voting_period_secs: 0,
            ..GovernanceConfig::default()
        };
        assert!(matches!(config.validate(), Err(AgoraError::InvalidConfig(_))));
    }

    #[test]
    fn zero_grace_period_rejected() {
        let config = GovernanceConfig {
            grace_period_secs: 0,
            ..GovernanceConfig::dev_defaults()
        };
        assert_eq!(
            config.validate(),
            Err(AgoraError::InvalidConfig(
                "grace_period_secs must be greater than zero".into()
            ))
        );
    }

    #[test]
    fn oversized_fraction_rejected() {
        let config = GovernanceConfig {
            quorum: QuorumRule::Fraction { bps: 10_001 },
            ..GovernanceConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn quorum_resolution() {
        let total = VotingPower::new(100_000_000);
        assert_eq!(
            QuorumRule::Fraction { bps: 400 }.resolve(total),
            VotingPower::new(4_000_000)
        );
        assert_eq!(
            QuorumRule::Absolute(42).resolve(total),
            VotingPower::new(42)
        );
        assert!(!QuorumRule::Absolute(42).needs_total_power());
    }
}
