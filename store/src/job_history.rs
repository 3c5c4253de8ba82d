//! Job-history record storage trait.

use crate::{StoreError, Versioned};
use zid_types::{CandidateId, JobHistoryId, JobHistoryRecord};

/// Storage for job-history records.
///
/// The only operations the workflow needs from the document database:
/// point-read by id, revision-checked update, and an equality-filtered list
/// by owner.
pub trait JobHistoryStore {
    /// Insert a new record. Fails with [`StoreError::Duplicate`] if the id
    /// already exists.
    fn insert_record(&self, record: &JobHistoryRecord) -> Result<(), StoreError>;

    /// Point-read a record together with its current revision.
    fn get_record(&self, id: &JobHistoryId) -> Result<Versioned<JobHistoryRecord>, StoreError>;

    /// Conditionally replace a record.
    ///
    /// Succeeds only if the stored revision still equals
    /// `expected_revision`; otherwise fails with [`StoreError::Conflict`]
    /// and writes nothing. Returns the new revision.
    fn update_record(
        &self,
        expected_revision: u64,
        record: &JobHistoryRecord,
    ) -> Result<u64, StoreError>;

    /// All records owned by `candidate_id`, in insertion order.
    fn list_by_candidate(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Vec<JobHistoryRecord>, StoreError>;

    /// Delete a record. The caller is responsible for the
    /// no-pending-token guard; the store just removes the document.
    fn remove_record(&self, id: &JobHistoryId) -> Result<(), StoreError>;

    /// Total number of records.
    fn record_count(&self) -> Result<u64, StoreError>;
}
