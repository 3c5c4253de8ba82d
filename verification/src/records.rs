//! Candidate-facing job-history record operations.

use std::sync::Arc;

use zid_store::{JobHistoryStore, StoreError, TokenStore};
use zid_types::{CandidateId, JobDetails, JobHistoryId, JobHistoryRecord, Timestamp};

use crate::error::VerificationError;

/// CRUD over job-history records, with the verification-aware delete guard.
pub struct RecordService<S> {
    store: Arc<S>,
}

impl<S> RecordService<S>
where
    S: JobHistoryStore + TokenStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create a work-experience entry for `candidate_id`.
    pub fn create_record(
        &self,
        candidate_id: CandidateId,
        mut details: JobDetails,
        now: Timestamp,
    ) -> Result<JobHistoryRecord, VerificationError> {
        if details.is_current_job {
            details.end_date = None;
        }
        let record = JobHistoryRecord::new(candidate_id, details, now);
        self.store.insert_record(&record)?;
        Ok(record)
    }

    pub fn get_record(&self, id: &JobHistoryId) -> Result<JobHistoryRecord, VerificationError> {
        self.store
            .get_record(id)
            .map(|versioned| versioned.doc)
            .map_err(|e| match e {
                StoreError::NotFound(_) => VerificationError::RecordNotFound(id.clone()),
                other => other.into(),
            })
    }

    pub fn list_records(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Vec<JobHistoryRecord>, VerificationError> {
        Ok(self.store.list_by_candidate(candidate_id)?)
    }

    /// Delete a record, unless an unexpired token still references it.
    pub fn delete_record(
        &self,
        id: &JobHistoryId,
        now: Timestamp,
    ) -> Result<(), VerificationError> {
        if let Some(token) = self.store.outstanding_token_for(id)? {
            if !token.is_expired(now) {
                return Err(VerificationError::RecordLocked(id.clone()));
            }
        }
        self.store.remove_record(id).map_err(|e| match e {
            StoreError::NotFound(_) => VerificationError::RecordNotFound(id.clone()),
            other => other.into(),
        })
    }
}
