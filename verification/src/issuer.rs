//! Verification request issuer.
//!
//! Creates the single-use token, moves the record to `PENDING`, and hands
//! the rendered email to the notification collaborator. Dispatch failure is
//! a hard failure: the token is deleted and the record restored, so a
//! record is never left `PENDING` without a deliverable token.

use std::sync::Arc;

use serde::Serialize;
use zid_notify::{Notifier, VerificationLinks, VerificationNotice};
use zid_store::{JobHistoryStore, StoreError, TokenStore, Versioned};
use zid_types::{
    EmailAddress, JobHistoryId, PrincipalId, Timestamp, TokenId, VerificationStatus,
    VerificationToken, WorkflowParams,
};

use crate::error::VerificationError;

/// The outcome of a successful issuance.
#[derive(Clone, Debug, Serialize)]
pub struct IssuedRequest {
    pub token_id: TokenId,
    pub expires_at: Timestamp,
}

/// Stateless issuer over the storage and notification seams.
pub struct RequestIssuer<S, N> {
    store: Arc<S>,
    notifier: N,
    params: WorkflowParams,
    base_url: String,
}

impl<S, N> RequestIssuer<S, N>
where
    S: JobHistoryStore + TokenStore,
    N: Notifier,
{
    pub fn new(
        store: Arc<S>,
        notifier: N,
        params: WorkflowParams,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            notifier,
            params,
            base_url: base_url.into(),
        }
    }

    /// Issue a verification request for `job_history_id`.
    ///
    /// Fails with `DuplicateRequest` while an unexpired token is
    /// outstanding. An outstanding token that has already expired is
    /// retired first (the record passes through `EXPIRED`), which is why
    /// re-issuance needs no sweeper process.
    pub async fn issue_request(
        &self,
        job_history_id: &JobHistoryId,
        verifier_email: &str,
        requested_by: PrincipalId,
        message: Option<String>,
        now: Timestamp,
    ) -> Result<IssuedRequest, VerificationError> {
        let email = EmailAddress::parse(verifier_email)
            .map_err(|_| VerificationError::InvalidEmail(verifier_email.to_string()))?;

        let mut versioned = self.load_record(job_history_id)?;

        if let Some(outstanding) = self.store.outstanding_token_for(job_history_id)? {
            if !outstanding.is_expired(now) {
                return Err(VerificationError::DuplicateRequest(job_history_id.clone()));
            }
            versioned = self.retire_expired_token(versioned, &outstanding.id, now)?;
        }

        let Versioned {
            revision,
            doc: mut record,
        } = versioned;

        if record.verification_status.is_verified() {
            return Err(VerificationError::AlreadyVerified(job_history_id.clone()));
        }

        // A PENDING record with no unconsumed token is a stranded request
        // (interrupted earlier run). Route it through EXPIRED so the graph
        // stays the single authority.
        if record.verification_status == VerificationStatus::Pending {
            record.transition_to(VerificationStatus::Expired, now)?;
        }

        let prior = record.clone();

        record.transition_to(VerificationStatus::Pending, now)?;
        record.verifier_email = Some(email.clone());
        record.verification_message = message.clone();
        record.verification_requested_by = Some(requested_by);
        record.verification_requested_at = Some(now);
        record.verification_processed_at = None;

        let token =
            VerificationToken::issue(job_history_id.clone(), now, self.params.token_ttl_secs);

        let new_revision = self
            .store
            .update_record(revision, &record)
            .map_err(|e| match e {
                // A concurrent issuance won the revision race.
                StoreError::Conflict(_) => {
                    VerificationError::DuplicateRequest(job_history_id.clone())
                }
                other => other.into(),
            })?;
        self.store.insert_token(&token)?;

        let links = VerificationLinks::build(&self.base_url, &token.id);
        let notice =
            VerificationNotice::verification_request(email, &record, message.as_deref(), &links);

        if let Err(dispatch) = self.notifier.send(&notice).await {
            self.roll_back(&token.id, new_revision, &prior);
            return Err(VerificationError::NotificationDispatchFailed(
                dispatch.to_string(),
            ));
        }

        tracing::info!(
            record = %job_history_id,
            verifier = %notice.to,
            expires_at = %token.expires_at,
            "verification request issued"
        );

        Ok(IssuedRequest {
            token_id: token.id,
            expires_at: token.expires_at,
        })
    }

    fn load_record(
        &self,
        id: &JobHistoryId,
    ) -> Result<Versioned<zid_types::JobHistoryRecord>, VerificationError> {
        self.store.get_record(id).map_err(|e| match e {
            StoreError::NotFound(_) => VerificationError::RecordNotFound(id.clone()),
            other => other.into(),
        })
    }

    /// Retire an expired-but-unconsumed token and move the record to
    /// `EXPIRED`. Consumption decides the single writer; a lost race just
    /// means someone else already recorded the expiry.
    fn retire_expired_token(
        &self,
        versioned: Versioned<zid_types::JobHistoryRecord>,
        token_id: &TokenId,
        now: Timestamp,
    ) -> Result<Versioned<zid_types::JobHistoryRecord>, VerificationError> {
        match self.store.consume_token(token_id, now) {
            Ok(_) => {
                let mut record = versioned.doc;
                record.transition_to(VerificationStatus::Expired, now)?;
                let revision = self.store.update_record(versioned.revision, &record)?;
                Ok(Versioned {
                    revision,
                    doc: record,
                })
            }
            Err(StoreError::Conflict(_)) => self.load_record(&versioned.doc.id),
            Err(e) => Err(e.into()),
        }
    }

    /// Undo a half-issued request after dispatch failure. Cleanup failures
    /// are logged, not surfaced — the caller already gets the dispatch error.
    fn roll_back(
        &self,
        token_id: &TokenId,
        revision: u64,
        prior: &zid_types::JobHistoryRecord,
    ) {
        if let Err(e) = self.store.remove_token(token_id) {
            tracing::error!(token = %token_id, error = %e, "rollback: failed to delete token");
        }
        if let Err(e) = self.store.update_record(revision, prior) {
            tracing::error!(record = %prior.id, error = %e, "rollback: failed to restore record");
        }
    }
}
