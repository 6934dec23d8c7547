//! Governor: the public surface tying registry, ledger and collaborators together.

use crate::costing::VoteRequest;
use crate::error::GovernanceError;
use crate::events::GovernanceEvent;
use crate::ledger::{Ballot, Support, VoteRecord};
use crate::lifecycle::{ProposalState, QueuedBatch};
use crate::oracle::VotingPowerOracle;
use crate::proposal::{Proposal, ProposalAction, VotingMode};
use crate::queue::ExecutionQueue;
use crate::registry::{lock_entry, ProposalEntry, ProposalRegistry};
use crate::tally::{Tally, TallyEvaluator};
use agora_types::{AccountId, AgoraError, GovernanceConfig, ProposalId, Timestamp, VotingPower};
use agora_utils::StatsCounter;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

const STAT_NAMES: &[&str] = &[
    "proposals_created",
    "proposals_canceled",
    "proposals_queued",
    "proposals_executed",
    "votes_cast",
    "votes_rejected",
];

/// One row of the proposal listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalSummary {
    pub id: ProposalId,
    pub proposer: AccountId,
    pub description: String,
    pub mode: VotingMode,
    pub state: ProposalState,
    pub tally: Tally,
    pub voters: usize,
    pub voting_ends_at: Timestamp,
}

/// Dashboard-level counts across every proposal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceOverview {
    pub total_proposals: usize,
    pub by_state: BTreeMap<ProposalState, usize>,
    pub votes_cast: usize,
}

impl GovernanceOverview {
    pub fn count(&self, state: ProposalState) -> usize {
        self.by_state.get(&state).copied().unwrap_or(0)
    }
}

/// Participation against the quorum fixed at creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuorumProgress {
    pub participation: VotingPower,
    pub quorum: VotingPower,
    pub reached: bool,
}

/// Governance engine over a voting power oracle and an execution queue.
///
/// Every operation takes `now` explicitly and reads it once, so boundary
/// decisions inside a single call can never disagree with each other.
pub struct Governor<O, Q> {
    config: GovernanceConfig,
    oracle: O,
    queue: Q,
    registry: ProposalRegistry,
    pending_events: Mutex<Vec<GovernanceEvent>>,
    stats: StatsCounter,
}

impl<O: VotingPowerOracle, Q: ExecutionQueue> Governor<O, Q> {
    pub fn new(config: GovernanceConfig, oracle: O, queue: Q) -> Result<Self, GovernanceError> {
        config
            .validate()
            .map_err(|AgoraError::InvalidConfig(msg)| GovernanceError::InvalidConfig(msg))?;
        Ok(Self {
            config,
            oracle,
            queue,
            registry: ProposalRegistry::new(),
            pending_events: Mutex::new(Vec::new()),
            stats: StatsCounter::new(STAT_NAMES),
        })
    }

    pub fn config(&self) -> &GovernanceConfig {
        &self.config
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn execution_queue(&self) -> &Q {
        &self.queue
    }

    pub fn stats(&self) -> &StatsCounter {
        &self.stats
    }

    // ── Mutations ──────────────────────────────────────────────────────

    /// Create a proposal. Its id is a pure function of `(actions, description)`.
    pub fn create(
        &self,
        proposer: &AccountId,
        actions: Vec<ProposalAction>,
        description: &str,
        now: Timestamp,
    ) -> Result<ProposalId, GovernanceError> {
        if !proposer.is_valid() {
            return Err(GovernanceError::InvalidAccount(proposer.as_str().to_string()));
        }
        if let Some(bad) = actions.iter().find(|a| !a.target.is_valid()) {
            return Err(GovernanceError::InvalidAccount(bad.target.as_str().to_string()));
        }

        let description_hash = agora_crypto::hash_description(description);
        let id = crate::proposal::proposal_id(&actions, &description_hash);
        if self.registry.contains(&id) {
            return Err(GovernanceError::DuplicateProposal(id));
        }

        let snapshot = now;
        if self.config.proposal_threshold > 0 {
            let threshold = VotingPower::new(self.config.proposal_threshold as u128);
            let power = self.oracle.power_of(proposer, snapshot).inspect_err(|e| {
                tracing::warn!(proposer = %proposer, error = %e, "threshold check failed: oracle unavailable");
            })?;
            if power < threshold {
                return Err(GovernanceError::BelowProposalThreshold { power, threshold });
            }
        }

        let total = if self.config.quorum.needs_total_power() {
            self.oracle.total_power(snapshot).inspect_err(|e| {
                tracing::warn!(error = %e, "quorum resolution failed: oracle unavailable");
            })?
        } else {
            VotingPower::ZERO
        };
        let quorum = self.config.quorum.resolve(total);

        let voting_starts_at = snapshot.plus_secs(self.config.voting_delay_secs);
        let voting_ends_at = voting_starts_at.plus_secs(self.config.voting_period_secs);
        if voting_ends_at <= voting_starts_at {
            return Err(GovernanceError::InvalidConfig(
                "voting window collapses at this timestamp".into(),
            ));
        }

        let mode = VotingMode::from_description(description, &self.config.quadratic_tag);
        let proposal = Proposal {
            id,
            proposer: proposer.clone(),
            actions,
            description: description.to_string(),
            description_hash,
            mode,
            snapshot,
            voting_starts_at,
            voting_ends_at,
            quorum,
        };
        self.registry.insert(ProposalEntry::new(proposal))?;

        tracing::info!(
            proposal = %id.short(),
            proposer = %proposer,
            mode = %mode,
            starts = voting_starts_at.as_secs(),
            ends = voting_ends_at.as_secs(),
            quorum = %quorum,
            "proposal created"
        );
        self.stats.increment("proposals_created");
        self.push_event(GovernanceEvent::ProposalCreated {
            id,
            proposer: proposer.clone(),
            mode,
            voting_starts_at,
            voting_ends_at,
            quorum,
        });
        Ok(id)
    }

    /// Vote with the account's full snapshot power (linear proposals).
    pub fn cast_vote(
        &self,
        id: &ProposalId,
        voter: &AccountId,
        support: Support,
        now: Timestamp,
    ) -> Result<VoteRecord, GovernanceError> {
        self.cast_ballot(
            id,
            Ballot {
                account: voter.clone(),
                support,
                request: VoteRequest::FullPower,
            },
            now,
        )
    }

    /// Cast `weight` votes at a cost of `weight²` power (quadratic proposals).
    pub fn cast_vote_with_weight(
        &self,
        id: &ProposalId,
        voter: &AccountId,
        support: Support,
        weight: u128,
        now: Timestamp,
    ) -> Result<VoteRecord, GovernanceError> {
        self.cast_ballot(
            id,
            Ballot {
                account: voter.clone(),
                support,
                request: VoteRequest::Weighted(weight),
            },
            now,
        )
    }

    fn cast_ballot(
        &self,
        id: &ProposalId,
        ballot: Ballot,
        now: Timestamp,
    ) -> Result<VoteRecord, GovernanceError> {
        let handle = self.registry.entry(id)?;
        let result = {
            let mut entry = lock_entry(&handle);
            let state = entry.state(now);
            let ProposalEntry { proposal, ledger, .. } = &mut *entry;
            ledger.cast_vote(proposal, state, ballot.clone(), &self.oracle, now)
        };

        match result {
            Ok(record) => {
                tracing::info!(
                    proposal = %id.short(),
                    account = %record.account,
                    support = %record.support,
                    weight = %record.weight,
                    power_spent = %record.power_spent,
                    "vote cast"
                );
                self.stats.increment("votes_cast");
                self.push_event(GovernanceEvent::VoteCast {
                    id: *id,
                    voter: record.account.clone(),
                    support: record.support,
                    weight: record.weight,
                    power_spent: record.power_spent,
                });
                Ok(record)
            }
            Err(e) => {
                self.stats.increment("votes_rejected");
                if matches!(e, GovernanceError::OracleUnavailable(_)) {
                    tracing::warn!(proposal = %id.short(), account = %ballot.account, error = %e, "vote failed");
                } else {
                    tracing::debug!(proposal = %id.short(), account = %ballot.account, error = %e, "vote rejected");
                }
                Err(e)
            }
        }
    }

    /// Cancel a proposal before its voting window closes. Proposer only.
    pub fn cancel(
        &self,
        id: &ProposalId,
        caller: &AccountId,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        let handle = self.registry.entry(id)?;
        lock_entry(&handle).cancel(caller, now)?;

        tracing::info!(proposal = %id.short(), caller = %caller, "proposal canceled");
        self.stats.increment("proposals_canceled");
        self.push_event(GovernanceEvent::ProposalCanceled { id: *id, at: now });
        Ok(())
    }

    /// Hand a succeeded proposal's actions to the execution queue.
    ///
    /// The entry lock is held across the queue call so a concurrent `queue()`
    /// on the same proposal sees `AlreadyQueued` rather than racing the queue.
    pub fn queue(&self, id: &ProposalId, now: Timestamp) -> Result<QueuedBatch, GovernanceError> {
        let handle = self.registry.entry(id)?;
        let batch = {
            let mut entry = lock_entry(&handle);
            entry.ensure_queueable(now)?;

            let min_delay = self.config.timelock_min_delay_secs;
            let schedule_id = self
                .queue
                .schedule(&entry.proposal.actions, &entry.proposal.description_hash, min_delay, now)
                .inspect_err(|e| {
                    tracing::warn!(proposal = %id.short(), error = %e, "execution queue rejected schedule");
                })?;
            let eta = now.plus_secs(min_delay);
            let batch = QueuedBatch {
                schedule_id,
                queued_at: now,
                eta,
                expires_at: eta.plus_secs(self.config.grace_period_secs),
            };
            entry.record_queued(batch);
            batch
        };

        tracing::info!(
            proposal = %id.short(),
            schedule = %batch.schedule_id.short(),
            eta = batch.eta.as_secs(),
            expires_at = batch.expires_at.as_secs(),
            "proposal queued"
        );
        self.stats.increment("proposals_queued");
        self.push_event(GovernanceEvent::ProposalQueued {
            id: *id,
            schedule_id: batch.schedule_id,
            eta: batch.eta,
            expires_at: batch.expires_at,
        });
        Ok(batch)
    }

    /// Run a queued proposal's actions. Succeeds at most once.
    pub fn execute(&self, id: &ProposalId, now: Timestamp) -> Result<(), GovernanceError> {
        let handle = self.registry.entry(id)?;
        {
            let mut entry = lock_entry(&handle);
            let batch = entry.ensure_executable(now)?;
            if !self.queue.is_ready(&batch.schedule_id, now) {
                return Err(GovernanceError::TooEarly { eta: batch.eta, now });
            }
            self.queue.run(&batch.schedule_id, now).inspect_err(|e| {
                tracing::warn!(proposal = %id.short(), error = %e, "execution queue rejected run");
            })?;
            entry.record_executed(now);
        }

        tracing::info!(proposal = %id.short(), "proposal executed");
        self.stats.increment("proposals_executed");
        self.push_event(GovernanceEvent::ProposalExecuted { id: *id, at: now });
        Ok(())
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn get(&self, id: &ProposalId) -> Result<Proposal, GovernanceError> {
        let handle = self.registry.entry(id)?;
        let proposal = lock_entry(&handle).proposal.clone();
        Ok(proposal)
    }

    /// Lifecycle state at `now`, derived on every call.
    pub fn state_of(&self, id: &ProposalId, now: Timestamp) -> Result<ProposalState, GovernanceError> {
        let handle = self.registry.entry(id)?;
        let state = lock_entry(&handle).state(now);
        tracing::debug!(proposal = %id.short(), state = %state, now = now.as_secs(), "state derived");
        Ok(state)
    }

    pub fn votes_of(&self, id: &ProposalId) -> Result<Tally, GovernanceError> {
        let handle = self.registry.entry(id)?;
        let tally = *lock_entry(&handle).ledger.tally();
        Ok(tally)
    }

    pub fn has_voted(&self, id: &ProposalId, account: &AccountId) -> Result<bool, GovernanceError> {
        let handle = self.registry.entry(id)?;
        let voted = lock_entry(&handle).ledger.has_voted(account);
        Ok(voted)
    }

    pub fn vote_of(
        &self,
        id: &ProposalId,
        account: &AccountId,
    ) -> Result<Option<VoteRecord>, GovernanceError> {
        let handle = self.registry.entry(id)?;
        let record = lock_entry(&handle).ledger.get(account).cloned();
        Ok(record)
    }

    pub fn quorum_progress(&self, id: &ProposalId) -> Result<QuorumProgress, GovernanceError> {
        let handle = self.registry.entry(id)?;
        let entry = lock_entry(&handle);
        let tally = entry.ledger.tally();
        Ok(QuorumProgress {
            participation: tally.participation(),
            quorum: entry.proposal.quorum,
            reached: TallyEvaluator::quorum_reached(tally, entry.proposal.quorum),
        })
    }

    /// Every proposal, newest first.
    pub fn list(&self, now: Timestamp) -> Vec<ProposalSummary> {
        self.registry
            .ids_newest_first()
            .into_iter()
            .filter_map(|id| self.registry.entry(&id).ok())
            .map(|handle| {
                let entry = lock_entry(&handle);
                ProposalSummary {
                    id: entry.proposal.id,
                    proposer: entry.proposal.proposer.clone(),
                    description: entry.proposal.description.clone(),
                    mode: entry.proposal.mode,
                    state: entry.state(now),
                    tally: *entry.ledger.tally(),
                    voters: entry.ledger.len(),
                    voting_ends_at: entry.proposal.voting_ends_at,
                }
            })
            .collect()
    }

    pub fn overview(&self, now: Timestamp) -> GovernanceOverview {
        let mut overview = GovernanceOverview::default();
        for summary in self.list(now) {
            overview.total_proposals += 1;
            *overview.by_state.entry(summary.state).or_insert(0) += 1;
            overview.votes_cast += summary.voters;
        }
        overview
    }

    // ── Events ─────────────────────────────────────────────────────────

    /// Take every event recorded since the last drain, oldest first.
    pub fn drain_events(&self) -> Vec<GovernanceEvent> {
        let mut events = self
            .pending_events
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *events)
    }

    fn push_event(&self, event: GovernanceEvent) {
        self.pending_events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{OracleError, QueueError};
    use agora_types::{DescriptionHash, QuorumRule, ScheduleId};
    use std::collections::HashMap;

    struct Flat(u128);

    impl VotingPowerOracle for Flat {
        fn power_of(&self, _: &AccountId, _: Timestamp) -> Result<VotingPower, OracleError> {
            Ok(VotingPower::new(self.0))
        }

        fn total_power(&self, _: Timestamp) -> Result<VotingPower, OracleError> {
            Ok(VotingPower::new(self.0 * 10))
        }
    }

    #[derive(Default)]
    struct Instant {
        scheduled: Mutex<HashMap<ScheduleId, (Timestamp, bool)>>,
    }

    impl ExecutionQueue for Instant {
        fn schedule(
            &self,
            actions: &[ProposalAction],
            hash: &DescriptionHash,
            delay: u64,
            now: Timestamp,
        ) -> Result<ScheduleId, QueueError> {
            let id = ScheduleId::new(*crate::proposal::proposal_id(actions, hash).as_bytes());
            let mut map = self.scheduled.lock().unwrap();
            if map.contains_key(&id) {
                return Err(QueueError::AlreadyScheduled(id));
            }
            map.insert(id, (now.plus_secs(delay), false));
            Ok(id)
        }

        fn is_ready(&self, id: &ScheduleId, now: Timestamp) -> bool {
            matches!(self.scheduled.lock().unwrap().get(id), Some((ready, false)) if now >= *ready)
        }

        fn run(&self, id: &ScheduleId, now: Timestamp) -> Result<(), QueueError> {
            let mut map = self.scheduled.lock().unwrap();
            match map.get_mut(id) {
                Some((_, true)) => Err(QueueError::AlreadyRun(*id)),
                Some((ready, done)) if now >= *ready => {
                    *done = true;
                    Ok(())
                }
                Some((ready, _)) => Err(QueueError::NotReady { ready_at: *ready }),
                None => Err(QueueError::NotScheduled(*id)),
            }
        }
    }

    fn governor(power: u128) -> Governor<Flat, Instant> {
        Governor::new(GovernanceConfig::dev_defaults(), Flat(power), Instant::default()).unwrap()
    }

    #[test]
    fn invalid_config_rejected() {
        let mut config = GovernanceConfig::dev_defaults();
        config.voting_period_secs = 0;
        let err = Governor::new(config, Flat(1), Instant::default()).err().unwrap();
        assert!(matches!(err, GovernanceError::InvalidConfig(_)));

        let mut config = GovernanceConfig::dev_defaults();
        config.grace_period_secs = 0;
        let err = Governor::new(config, Flat(1), Instant::default()).err().unwrap();
        assert!(matches!(err, GovernanceError::InvalidConfig(_)));
    }

    #[test]
    fn full_lifecycle_emits_events_in_order() {
        let gov = governor(100);
        let owner = AccountId::new("owner");
        let id = gov
            .create(&owner, vec![ProposalAction::new("token", 0, b"mint".to_vec())], "Give owner 1", Timestamp::new(0))
            .unwrap();
        assert_eq!(gov.state_of(&id, Timestamp::new(0)).unwrap(), ProposalState::Pending);

        gov.cast_vote(&id, &owner, Support::For, Timestamp::new(10)).unwrap();
        assert_eq!(gov.state_of(&id, Timestamp::new(110)).unwrap(), ProposalState::Succeeded);

        let batch = gov.queue(&id, Timestamp::new(110)).unwrap();
        assert_eq!(batch.eta, Timestamp::new(130));
        assert_eq!(batch.expires_at, Timestamp::new(180));
        gov.execute(&id, Timestamp::new(130)).unwrap();
        assert_eq!(gov.state_of(&id, Timestamp::new(131)).unwrap(), ProposalState::Executed);

        let kinds: Vec<&'static str> = gov
            .drain_events()
            .iter()
            .map(|e| match e {
                GovernanceEvent::ProposalCreated { .. } => "created",
                GovernanceEvent::VoteCast { .. } => "vote",
                GovernanceEvent::ProposalCanceled { .. } => "canceled",
                GovernanceEvent::ProposalQueued { .. } => "queued",
                GovernanceEvent::ProposalExecuted { .. } => "executed",
            })
            .collect();
        assert_eq!(kinds, vec!["created", "vote", "queued", "executed"]);
        assert!(gov.drain_events().is_empty());
        assert_eq!(gov.stats().get("proposals_executed"), 1);
    }

    #[test]
    fn fraction_quorum_resolved_at_creation() {
        let mut config = GovernanceConfig::dev_defaults();
        config.quorum = QuorumRule::Fraction { bps: 400 };
        let gov = Governor::new(config, Flat(1_000), Instant::default()).unwrap();
        let id = gov.create(&AccountId::new("a"), Vec::new(), "signal", Timestamp::new(0)).unwrap();
        // 4% of 10_000 total.
        assert_eq!(gov.get(&id).unwrap().quorum, VotingPower::new(400));
    }

    #[test]
    fn proposal_threshold_enforced() {
        let mut config = GovernanceConfig::dev_defaults();
        config.proposal_threshold = 500;
        let gov = Governor::new(config, Flat(100), Instant::default()).unwrap();
        let err = gov.create(&AccountId::new("a"), Vec::new(), "x", Timestamp::new(0)).unwrap_err();
        assert_eq!(
            err,
            GovernanceError::BelowProposalThreshold {
                power: VotingPower::new(100),
                threshold: VotingPower::new(500),
            }
        );
    }

    #[test]
    fn invalid_proposer_rejected() {
        let gov = governor(1);
        let err = gov.create(&AccountId::new(""), Vec::new(), "x", Timestamp::new(0)).unwrap_err();
        assert!(matches!(err, GovernanceError::InvalidAccount(_)));
    }

    #[test]
    fn overview_counts_states_and_votes() {
        let gov = governor(100);
        let a = gov.create(&AccountId::new("a"), Vec::new(), "one", Timestamp::new(0)).unwrap();
        let _b = gov.create(&AccountId::new("a"), Vec::new(), "two", Timestamp::new(0)).unwrap();
        gov.cast_vote(&a, &AccountId::new("v1"), Support::For, Timestamp::new(10)).unwrap();
        gov.cast_vote(&a, &AccountId::new("v2"), Support::Against, Timestamp::new(10)).unwrap();

        let overview = gov.overview(Timestamp::new(10));
        assert_eq!(overview.total_proposals, 2);
        assert_eq!(overview.count(ProposalState::Active), 2);
        assert_eq!(overview.votes_cast, 2);

        let listing = gov.list(Timestamp::new(10));
        assert_eq!(listing[0].description, "two");
        assert_eq!(listing[1].voters, 2);
    }

    #[test]
    fn quorum_progress_reports_participation() {
        let gov = governor(3);
        let id = gov.create(&AccountId::new("a"), Vec::new(), "q", Timestamp::new(0)).unwrap();
        let before = gov.quorum_progress(&id).unwrap();
        assert!(!before.reached);
        gov.cast_vote(&id, &AccountId::new("v"), Support::Abstain, Timestamp::new(10)).unwrap();
        let after = gov.quorum_progress(&id).unwrap();
        assert_eq!(after.participation, VotingPower::new(3));
        assert!(after.reached);
    }
}
