//! Proposal governance for agora.
//!
//! Proposals move through a lifecycle that is derived lazily from time and the
//! recorded transitions:
//! Pending → Active → Succeeded/Defeated → Queued → Executed/Expired, with
//! Canceled reachable while the voting window is open.
//!
//! Votes are counted under one of two rules fixed at creation. Linear
//! proposals count an account's full snapshot power; proposals whose
//! description carries the quadratic tag let an account cast `w` votes at a
//! cost of `w²` power.
//!
//! Voting power and execution are external: the engine consumes a
//! [`VotingPowerOracle`] and an [`ExecutionQueue`] and never implements either.

pub mod costing;
pub mod error;
pub mod events;
pub mod governor;
pub mod ledger;
pub mod lifecycle;
pub mod oracle;
pub mod proposal;
pub mod queue;
mod registry;
pub mod tally;

pub use costing::{max_quadratic_votes, VoteCost, VoteRequest};
pub use error::{GovernanceError, OracleError, QueueError};
pub use events::GovernanceEvent;
pub use governor::{GovernanceOverview, Governor, ProposalSummary, QuorumProgress};
pub use ledger::{Ballot, Support, VoteLedger, VoteRecord};
pub use lifecycle::{derive_state, ProposalState, QueuedBatch, Transitions};
pub use oracle::VotingPowerOracle;
pub use proposal::{encode_actions, proposal_id, proposal_id_for, Proposal, ProposalAction, VotingMode};
pub use queue::ExecutionQueue;
pub use tally::{Tally, TallyEvaluator, TallyOutcome};
