//! Proposal registry: every known proposal, its recorded transitions and its votes.
//!
//! The outer map lock is held only long enough to find or insert an entry.
//! Each entry carries its own mutex, so votes and transitions on one proposal
//! are serialized while unrelated proposals proceed in parallel.

use crate::error::GovernanceError;
use crate::ledger::VoteLedger;
use crate::lifecycle::{derive_state, ProposalState, QueuedBatch, Transitions};
use crate::proposal::Proposal;
use agora_types::{AccountId, ProposalId, Timestamp};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

/// A proposal together with everything recorded against it.
#[derive(Clone, Debug)]
pub(crate) struct ProposalEntry {
    pub(crate) proposal: Proposal,
    pub(crate) transitions: Transitions,
    pub(crate) ledger: VoteLedger,
}

impl ProposalEntry {
    pub(crate) fn new(proposal: Proposal) -> Self {
        let ledger = VoteLedger::new(proposal.id);
        Self {
            proposal,
            transitions: Transitions::default(),
            ledger,
        }
    }

    pub(crate) fn state(&self, now: Timestamp) -> ProposalState {
        derive_state(&self.proposal, &self.transitions, self.ledger.tally(), now)
    }

    /// Record a cancellation by the proposer while the proposal is still open.
    pub(crate) fn cancel(&mut self, caller: &AccountId, now: Timestamp) -> Result<(), GovernanceError> {
        if caller != &self.proposal.proposer {
            return Err(GovernanceError::NotProposer {
                caller: caller.clone(),
            });
        }
        match self.state(now) {
            ProposalState::Pending | ProposalState::Active => {
                self.transitions.canceled_at = Some(now);
                Ok(())
            }
            state => Err(GovernanceError::NotCancelable { state }),
        }
    }

    /// Check that the proposal can be handed to the execution queue.
    pub(crate) fn ensure_queueable(&self, now: Timestamp) -> Result<(), GovernanceError> {
        match self.state(now) {
            ProposalState::Succeeded => Ok(()),
            ProposalState::Queued | ProposalState::Expired => Err(GovernanceError::AlreadyQueued),
            ProposalState::Executed => Err(GovernanceError::AlreadyExecuted),
            state => Err(GovernanceError::NotSucceeded { state }),
        }
    }

    pub(crate) fn record_queued(&mut self, batch: QueuedBatch) {
        self.transitions.queued = Some(batch);
    }

    /// Check that the queued batch may run now and return it.
    ///
    /// Does not consult the execution queue; the caller does that under the
    /// same lock.
    pub(crate) fn ensure_executable(&self, now: Timestamp) -> Result<QueuedBatch, GovernanceError> {
        let state = self.state(now);
        match (state, self.transitions.queued) {
            (ProposalState::Executed, _) => Err(GovernanceError::AlreadyExecuted),
            (ProposalState::Expired, Some(batch)) => Err(GovernanceError::Expired {
                expired_at: batch.expires_at,
            }),
            (ProposalState::Queued, Some(batch)) => {
                if now < batch.eta {
                    Err(GovernanceError::TooEarly { eta: batch.eta, now })
                } else {
                    Ok(batch)
                }
            }
            (state, _) => Err(GovernanceError::NotQueued { state }),
        }
    }

    pub(crate) fn record_executed(&mut self, now: Timestamp) {
        self.transitions.executed_at = Some(now);
    }
}

#[derive(Default)]
struct Inner {
    by_id: HashMap<ProposalId, Arc<Mutex<ProposalEntry>>>,
    /// Creation order, oldest first.
    order: Vec<ProposalId>,
}

/// Thread-safe store of proposal entries keyed by content-derived id.
#[derive(Default)]
pub(crate) struct ProposalRegistry {
    inner: RwLock<Inner>,
}

impl ProposalRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register a new entry. Fails if the id is already known.
    pub(crate) fn insert(&self, entry: ProposalEntry) -> Result<(), GovernanceError> {
        let id = entry.proposal.id;
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if inner.by_id.contains_key(&id) {
            return Err(GovernanceError::DuplicateProposal(id));
        }
        inner.by_id.insert(id, Arc::new(Mutex::new(entry)));
        inner.order.push(id);
        Ok(())
    }

    pub(crate) fn contains(&self, id: &ProposalId) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .by_id
            .contains_key(id)
    }

    /// Handle to one entry. Lock it with [`lock_entry`].
    pub(crate) fn entry(&self, id: &ProposalId) -> Result<Arc<Mutex<ProposalEntry>>, GovernanceError> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .by_id
            .get(id)
            .cloned()
            .ok_or(GovernanceError::NotFound(*id))
    }

    /// Ids in reverse creation order.
    pub(crate) fn ids_newest_first(&self) -> Vec<ProposalId> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.order.iter().rev().copied().collect()
    }
}

/// Lock an entry, recovering from a poisoned mutex.
///
/// Every mutation on an entry validates before writing, so a panic mid-call
/// cannot leave a half-applied transition behind.
pub(crate) fn lock_entry(entry: &Mutex<ProposalEntry>) -> MutexGuard<'_, ProposalEntry> {
    entry.lock().unwrap_or_else(PoisonError::into_inner)
}
