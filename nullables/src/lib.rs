//! Nullable infrastructure for deterministic testing and local simulation.
//!
//! The governance engine's collaborators (time, voting power, execution) sit
//! behind traits. This crate provides in-memory implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically (advance time, set power checkpoints,
//!   switch collaborators offline)
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests and in `agora simulate`.

pub mod clock;
pub mod timelock;
pub mod voting_power;

pub use clock::NullClock;
pub use timelock::NullTimelock;
pub use voting_power::NullVotingPower;
