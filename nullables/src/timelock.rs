//! Nullable timelock: an in-memory execution queue with a minimum delay.

use agora_governance::{encode_actions, ExecutionQueue, ProposalAction, QueueError};
use agora_types::{DescriptionHash, ScheduleId, Timestamp};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

#[derive(Clone, Debug)]
struct Batch {
    actions: Vec<ProposalAction>,
    ready_at: Timestamp,
    done: bool,
}

/// Records scheduled batches and "runs" them by appending their actions to an
/// execution log.
pub struct NullTimelock {
    min_delay_secs: u64,
    batches: Mutex<HashMap<ScheduleId, Batch>>,
    executed: Mutex<Vec<(ScheduleId, Vec<ProposalAction>)>>,
    rejecting: AtomicBool,
}

impl NullTimelock {
    pub fn new(min_delay_secs: u64) -> Self {
        Self {
            min_delay_secs,
            batches: Mutex::new(HashMap::new()),
            executed: Mutex::new(Vec::new()),
            rejecting: AtomicBool::new(false),
        }
    }

    pub fn min_delay_secs(&self) -> u64 {
        self.min_delay_secs
    }

    /// Reject every `schedule` and `run` call until switched back.
    pub fn set_rejecting(&self, rejecting: bool) {
        self.rejecting.store(rejecting, Ordering::SeqCst);
    }

    /// Batches that have run, in execution order.
    pub fn executed(&self) -> Vec<(ScheduleId, Vec<ProposalAction>)> {
        self.executed.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn scheduled_count(&self) -> usize {
        self.batches.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn check_accepting(&self) -> Result<(), QueueError> {
        if self.rejecting.load(Ordering::SeqCst) {
            return Err(QueueError::Other("null timelock is rejecting calls".into()));
        }
        Ok(())
    }
}

impl Default for NullTimelock {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ExecutionQueue for NullTimelock {
    fn schedule(
        &self,
        actions: &[ProposalAction],
        description_hash: &DescriptionHash,
        min_delay_secs: u64,
        now: Timestamp,
    ) -> Result<ScheduleId, QueueError> {
        self.check_accepting()?;
        if min_delay_secs < self.min_delay_secs {
            return Err(QueueError::DelayTooShort {
                requested: min_delay_secs,
                minimum: self.min_delay_secs,
            });
        }
        let id = agora_crypto::derive_schedule_id(&encode_actions(actions), description_hash);
        let mut batches = self.batches.lock().unwrap_or_else(PoisonError::into_inner);
        if batches.contains_key(&id) {
            return Err(QueueError::AlreadyScheduled(id));
        }
        batches.insert(
            id,
            Batch {
                actions: actions.to_vec(),
                ready_at: now.plus_secs(min_delay_secs),
                done: false,
            },
        );
        Ok(id)
    }

    fn is_ready(&self, id: &ScheduleId, now: Timestamp) -> bool {
        self.batches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .is_some_and(|b| !b.done && now >= b.ready_at)
    }

    fn run(&self, id: &ScheduleId, now: Timestamp) -> Result<(), QueueError> {
        self.check_accepting()?;
        let mut batches = self.batches.lock().unwrap_or_else(PoisonError::into_inner);
        let batch = batches.get_mut(id).ok_or(QueueError::NotScheduled(*id))?;
        if batch.done {
            return Err(QueueError::AlreadyRun(*id));
        }
        if now < batch.ready_at {
            return Err(QueueError::NotReady {
                ready_at: batch.ready_at,
            });
        }
        batch.done = true;
        self.executed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((*id, batch.actions.clone()));
        Ok(())
    }
}
