//! The anchor queue — dequeue/report contract over the storage seam.

use std::sync::Arc;

use zid_store::{
    AnchorItemStatus, AnchorQueueStore, AnchorWorkItem, JobHistoryStore, StoreError, Versioned,
};
use zid_types::{JobHistoryId, Timestamp, VerificationStatus, WorkflowParams};

use crate::backoff::retry_delay_secs;
use crate::error::AnchorError;

/// Bounded retries for the record's conditional update.
const MAX_TRANSITION_RETRIES: usize = 3;

/// Dequeue and outcome-reporting operations for anchor work items.
pub struct AnchorQueue<S> {
    store: Arc<S>,
    params: WorkflowParams,
}

impl<S> AnchorQueue<S>
where
    S: AnchorQueueStore + JobHistoryStore,
{
    pub fn new(store: Arc<S>, params: WorkflowParams) -> Self {
        Self { store, params }
    }

    pub fn params(&self) -> &WorkflowParams {
        &self.params
    }

    /// Lease the next due work item, if any.
    pub fn dequeue_next(&self, now: Timestamp) -> Result<Option<AnchorWorkItem>, AnchorError> {
        Ok(self
            .store
            .lease_next(now, self.params.anchor_lease_secs)?)
    }

    /// Record a successful anchoring: the item is done and the record moves
    /// `VERIFIED → CONFIRMED_ONCHAIN` with the ledger reference.
    ///
    /// Re-anchoring a record that is already confirmed (a lease timed out
    /// and the item ran twice) is treated as success.
    pub fn report_success(
        &self,
        item: &AnchorWorkItem,
        reference: String,
        now: Timestamp,
    ) -> Result<(), AnchorError> {
        self.confirm_record(&item.job_history_id, &reference, now)?;

        let mut done = item.clone();
        done.status = AnchorItemStatus::Done;
        done.reference = Some(reference);
        done.lease_expires_at = None;
        done.last_error = None;
        self.store.update_item(&done)?;
        Ok(())
    }

    /// Record a failed attempt. Items with attempts remaining return to
    /// `pending` with an exponentially backed-off `next_attempt_at`; an
    /// exhausted item is marked `failed` and the record stays `VERIFIED`.
    ///
    /// Returns the item's resulting status.
    pub fn report_failure(
        &self,
        item: &AnchorWorkItem,
        error: String,
        now: Timestamp,
    ) -> Result<AnchorItemStatus, AnchorError> {
        let mut next = item.clone();
        next.last_error = Some(error);
        next.lease_expires_at = None;

        if next.attempts >= self.params.max_anchor_attempts {
            next.status = AnchorItemStatus::Failed;
        } else {
            next.status = AnchorItemStatus::Pending;
            let delay = retry_delay_secs(
                next.attempts,
                self.params.anchor_backoff_initial_secs,
                self.params.anchor_backoff_max_secs,
            );
            next.next_attempt_at = now.plus_secs(delay);
        }

        self.store.update_item(&next)?;
        Ok(next.status)
    }

    /// Permanently fail an item that can never succeed (e.g. its record was
    /// deleted).
    pub fn discard(&self, item: &AnchorWorkItem, reason: String) -> Result<(), AnchorError> {
        let mut dead = item.clone();
        dead.status = AnchorItemStatus::Failed;
        dead.last_error = Some(reason);
        dead.lease_expires_at = None;
        self.store.update_item(&dead)?;
        Ok(())
    }

    fn confirm_record(
        &self,
        id: &JobHistoryId,
        reference: &str,
        now: Timestamp,
    ) -> Result<(), AnchorError> {
        for _ in 0..MAX_TRANSITION_RETRIES {
            let Versioned {
                revision,
                doc: mut record,
            } = self.store.get_record(id)?;

            if record.verification_status == VerificationStatus::ConfirmedOnchain {
                return Ok(());
            }

            record
                .transition_to(VerificationStatus::ConfirmedOnchain, now)
                .map_err(|e| AnchorError::Transition(e.to_string()))?;
            record.onchain_confirmation_reference = Some(reference.to_string());

            match self.store.update_record(revision, &record) {
                Ok(_) => return Ok(()),
                Err(StoreError::Conflict(_)) => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(AnchorError::Transition(format!(
            "{id}: too many concurrent writers"
        )))
    }
}
