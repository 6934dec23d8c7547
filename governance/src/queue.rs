//! Execution queue: the external timelock that runs approved actions.

use crate::error::QueueError;
use crate::proposal::ProposalAction;
use agora_types::{DescriptionHash, ScheduleId, Timestamp};
use std::sync::Arc;

/// A minimum-delay gate between approval and execution.
///
/// Each call is atomic from the engine's point of view: it is either accepted
/// in full or rejected with no effect.
pub trait ExecutionQueue: Send + Sync {
    /// Schedule `actions` to become runnable `min_delay_secs` after `now`.
    ///
    /// Scheduling the same batch twice must be rejected.
    fn schedule(
        &self,
        actions: &[ProposalAction],
        description_hash: &DescriptionHash,
        min_delay_secs: u64,
        now: Timestamp,
    ) -> Result<ScheduleId, QueueError>;

    /// Whether the batch's delay has elapsed and it has not run yet.
    fn is_ready(&self, id: &ScheduleId, now: Timestamp) -> bool;

    /// Run the batch. Fails if it is not ready or has already run.
    fn run(&self, id: &ScheduleId, now: Timestamp) -> Result<(), QueueError>;
}

impl<T: ExecutionQueue + ?Sized> ExecutionQueue for Arc<T> {
    fn schedule(
        &self,
        actions: &[ProposalAction],
        description_hash: &DescriptionHash,
        min_delay_secs: u64,
        now: Timestamp,
    ) -> Result<ScheduleId, QueueError> {
        (**self).schedule(actions, description_hash, min_delay_secs, now)
    }

    fn is_ready(&self, id: &ScheduleId, now: Timestamp) -> bool {
        (**self).is_ready(id, now)
    }

    fn run(&self, id: &ScheduleId, now: Timestamp) -> Result<(), QueueError> {
        (**self).run(id, now)
    }
}
