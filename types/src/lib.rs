//! Fundamental types for the agora governance engine.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! account identifiers, digests, voting power amounts, timestamps and the
//! governance configuration.

pub mod address;
pub mod error;
pub mod hash;
pub mod params;
pub mod power;
pub mod time;

pub use address::AccountId;
pub use error::AgoraError;
pub use hash::{DescriptionHash, ProposalId, ScheduleId};
pub use params::{GovernanceConfig, QuorumRule, BPS_DENOMINATOR};
pub use power::VotingPower;
pub use time::Timestamp;
