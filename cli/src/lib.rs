//! Library half of the `agora` binary: configuration, scenario format and
//! the simulation runner, kept here so integration tests can drive them.

pub mod config;
pub mod error;
pub mod scenario;
pub mod simulate;

pub use config::AgoraConfig;
pub use error::CliError;
pub use scenario::{parse_action, ActionSpec, Balance, Scenario, Step};
pub use simulate::{simulate, ProposalReport, Simulation, SimulationReport, StepOutcome};
