use crate::lifecycle::ProposalState;
use agora_types::{AccountId, ProposalId, ScheduleId, Timestamp, VotingPower};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GovernanceError {
    #[error("proposal {0} already exists")]
    DuplicateProposal(ProposalId),

    #[error("proposal {0} not found")]
    NotFound(ProposalId),

    // ── Vote admission ───────────────────────────────────────────────────
    #[error("proposal is not accepting votes (state: {state})")]
    NotActive { state: ProposalState },

    #[error("account {account} has already voted on this proposal")]
    AlreadyVoted { account: AccountId },

    #[error("account {account} has no voting power at the proposal snapshot")]
    NoVotingPower { account: AccountId },

    #[error(
        "insufficient voting power: {account} asked for {requested} votes \
         (cost {requested}²) but holds {available}"
    )]
    InsufficientVotingPower {
        account: AccountId,
        requested: u128,
        available: VotingPower,
    },

    #[error("requested vote weight must be at least 1")]
    ZeroWeight,

    #[error("quadratic proposals require an explicit vote weight")]
    WeightRequired,

    #[error("linear proposals count full voting power and take no vote weight")]
    WeightNotAccepted,

    // ── Lifecycle ordering ───────────────────────────────────────────────
    #[error("proposal has not succeeded (state: {state})")]
    NotSucceeded { state: ProposalState },

    #[error("proposal is already queued")]
    AlreadyQueued,

    #[error("timelock has not elapsed: executable at {eta}, now {now}")]
    TooEarly { eta: Timestamp, now: Timestamp },

    #[error("execution window closed at {expired_at}")]
    Expired { expired_at: Timestamp },

    #[error("proposal has already been executed")]
    AlreadyExecuted,

    #[error("proposal was never queued (state: {state})")]
    NotQueued { state: ProposalState },

    #[error("only the proposer can cancel a proposal (caller: {caller})")]
    NotProposer { caller: AccountId },

    #[error("proposal can no longer be canceled (state: {state})")]
    NotCancelable { state: ProposalState },

    // ── Creation ─────────────────────────────────────────────────────────
    #[error("proposer power {power} is below the proposal threshold {threshold}")]
    BelowProposalThreshold {
        power: VotingPower,
        threshold: VotingPower,
    },

    #[error("invalid account identifier: {0:?}")]
    InvalidAccount(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Collaborators ────────────────────────────────────────────────────
    #[error("voting power oracle unavailable: {0}")]
    OracleUnavailable(#[from] OracleError),

    #[error("execution queue rejected the request: {0}")]
    QueueRejected(#[from] QueueError),
}

/// Failure reported by a [`VotingPowerOracle`](crate::VotingPowerOracle).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OracleError {
    #[error("oracle offline: {0}")]
    Offline(String),

    #[error("{0}")]
    Other(String),
}

/// Failure reported by an [`ExecutionQueue`](crate::ExecutionQueue).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("batch {0} is already scheduled")]
    AlreadyScheduled(ScheduleId),

    #[error("batch {0} is not scheduled")]
    NotScheduled(ScheduleId),

    #[error("batch is not ready until {ready_at}")]
    NotReady { ready_at: Timestamp },

    #[error("batch {0} has already run")]
    AlreadyRun(ScheduleId),

    #[error("delay {requested}s is below the queue minimum {minimum}s")]
    DelayTooShort { requested: u64, minimum: u64 },

    #[error("{0}")]
    Other(String),
}
