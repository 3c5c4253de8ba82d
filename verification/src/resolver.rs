//! Verification link resolver.
//!
//! The only public entry point into the state machine. Token consumption is
//! the winner-deciding step: for any token, exactly one resolution ever
//! applies a transition; every later attempt fails with
//! `TokenAlreadyConsumed`.

use std::sync::Arc;

use serde::Serialize;
use zid_store::{
    AnchorQueueStore, AnchorWorkItem, JobHistoryStore, StoreError, TokenStore, Versioned,
};
use zid_types::{
    JobHistoryId, JobHistoryRecord, Timestamp, TokenId, VerificationAction, VerificationStatus,
};

use crate::error::VerificationError;

/// Bounded retries for the record's conditional update. The token winner is
/// the only writer racing record edits from the issuer side, so conflicts
/// are rare and short-lived.
const MAX_TRANSITION_RETRIES: usize = 3;

/// The outcome of a successful resolution.
#[derive(Clone, Debug, Serialize)]
pub struct Resolution {
    pub job_history_id: JobHistoryId,
    pub action: VerificationAction,
    pub new_status: VerificationStatus,
}

/// Stateless resolver over the storage seam.
pub struct LinkResolver<S> {
    store: Arc<S>,
}

impl<S> LinkResolver<S>
where
    S: JobHistoryStore + TokenStore + AnchorQueueStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Resolve a verification link.
    ///
    /// On accept: record `PENDING → VERIFIED`, one anchor work item
    /// enqueued. On reject: `PENDING → REJECTED`. A token presented at or
    /// after its expiry fails with `TokenExpired` and drives the record to
    /// `EXPIRED` as a side effect.
    pub fn resolve(
        &self,
        token_id: &TokenId,
        action: VerificationAction,
        now: Timestamp,
    ) -> Result<Resolution, VerificationError> {
        let token = self.store.get_token(token_id).map_err(|e| match e {
            StoreError::NotFound(_) => VerificationError::TokenNotFound(token_id.clone()),
            other => other.into(),
        })?;

        if token.consumed {
            return Err(VerificationError::TokenAlreadyConsumed(token_id.clone()));
        }

        if token.is_expired(now) {
            match self.store.consume_token(token_id, now) {
                Ok(consumed) => {
                    self.transition_record(
                        &consumed.job_history_id,
                        VerificationStatus::Expired,
                        now,
                    )?;
                    tracing::info!(
                        record = %consumed.job_history_id,
                        token = %token_id,
                        "verification link expired"
                    );
                }
                // Lost the race — the winner records the expiry (or the
                // outcome, if it resolved in time).
                Err(StoreError::Conflict(_)) => {}
                Err(e) => return Err(e.into()),
            }
            return Err(VerificationError::TokenExpired(token_id.clone()));
        }

        if !token.permits(action) {
            return Err(VerificationError::InvalidAction(action.to_string()));
        }

        let consumed = self.store.consume_token(token_id, now).map_err(|e| match e {
            StoreError::Conflict(_) => VerificationError::TokenAlreadyConsumed(token_id.clone()),
            StoreError::NotFound(_) => VerificationError::TokenNotFound(token_id.clone()),
            other => other.into(),
        })?;

        let new_status = match action {
            VerificationAction::Accept => VerificationStatus::Verified,
            VerificationAction::Reject => VerificationStatus::Rejected,
        };

        self.transition_record(&consumed.job_history_id, new_status, now)?;

        if action == VerificationAction::Accept {
            let item = AnchorWorkItem::confirm_employment(consumed.job_history_id.clone(), now);
            self.store.enqueue_item(&item)?;
            tracing::info!(
                record = %consumed.job_history_id,
                item = %item.id,
                "employment confirmed; anchor work item enqueued"
            );
        } else {
            tracing::info!(record = %consumed.job_history_id, "employment verification rejected");
        }

        Ok(Resolution {
            job_history_id: consumed.job_history_id,
            action,
            new_status,
        })
    }

    /// Apply a status transition through a revision-checked update.
    fn transition_record(
        &self,
        id: &JobHistoryId,
        next: VerificationStatus,
        now: Timestamp,
    ) -> Result<JobHistoryRecord, VerificationError> {
        for _ in 0..MAX_TRANSITION_RETRIES {
            let Versioned {
                revision,
                doc: mut record,
            } = self.store.get_record(id).map_err(|e| match e {
                StoreError::NotFound(_) => VerificationError::RecordNotFound(id.clone()),
                other => other.into(),
            })?;

            record.transition_to(next, now)?;

            match self.store.update_record(revision, &record) {
                Ok(_) => return Ok(record),
                Err(StoreError::Conflict(_)) => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(StoreError::Conflict(format!("{id}: too many concurrent writers")).into())
    }
}
