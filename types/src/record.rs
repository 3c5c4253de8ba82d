//! The job-history record — one work-experience entry on a candidate's
//! profile, plus its verification attributes.

use crate::email::EmailAddress;
use crate::error::TypeError;
use crate::id::{CandidateId, JobHistoryId, PrincipalId};
use crate::status::VerificationStatus;
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};

/// The descriptive attributes of a work-experience entry, as entered by the
/// candidate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDetails {
    pub company_name: String,
    pub job_title: String,
    pub start_date: Timestamp,
    /// None while `is_current_job` is true.
    pub end_date: Option<Timestamp>,
    pub is_current_job: bool,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub description: String,
}

/// One job-history record.
///
/// The `verification_*` fields are populated only by the verification
/// workflow; the descriptive fields only by the owning candidate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHistoryRecord {
    pub id: JobHistoryId,
    pub candidate_id: CandidateId,

    #[serde(flatten)]
    pub details: JobDetails,

    pub verification_status: VerificationStatus,
    pub verifier_email: Option<EmailAddress>,
    pub verification_message: Option<String>,
    pub verification_requested_by: Option<PrincipalId>,
    pub verification_requested_at: Option<Timestamp>,
    /// Set when the status reaches a verifier-decided outcome.
    pub verification_processed_at: Option<Timestamp>,
    /// Set only when the anchor worker completes.
    pub onchain_confirmation_reference: Option<String>,

    pub created_at: Timestamp,
}

impl JobHistoryRecord {
    /// Create a fresh, unverified record owned by `candidate_id`.
    pub fn new(candidate_id: CandidateId, details: JobDetails, now: Timestamp) -> Self {
        Self {
            id: JobHistoryId::generate(),
            candidate_id,
            details,
            verification_status: VerificationStatus::Unverified,
            verifier_email: None,
            verification_message: None,
            verification_requested_by: None,
            verification_requested_at: None,
            verification_processed_at: None,
            onchain_confirmation_reference: None,
            created_at: now,
        }
    }

    /// Move the record along the verification status graph.
    ///
    /// This is the only code path that writes `verification_status`.
    /// Verifier-decided and expiry outcomes stamp
    /// `verification_processed_at`; everything else leaves it alone.
    pub fn transition_to(
        &mut self,
        next: VerificationStatus,
        now: Timestamp,
    ) -> Result<(), TypeError> {
        let from = self.verification_status;
        if !from.can_transition_to(next) {
            return Err(TypeError::InvalidTransition { from, to: next });
        }
        self.verification_status = next;
        if matches!(
            next,
            VerificationStatus::Verified
                | VerificationStatus::Rejected
                | VerificationStatus::Expired
        ) {
            self.verification_processed_at = Some(now);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> JobDetails {
        JobDetails {
            company_name: "Globex".into(),
            job_title: "Engineer".into(),
            start_date: Timestamp::new(1_600_000_000),
            end_date: None,
            is_current_job: true,
            location: None,
            employment_type: Some("full-time".into()),
            description: "Built things".into(),
        }
    }

    #[test]
    fn new_record_starts_unverified() {
        let record = JobHistoryRecord::new(CandidateId::generate(), details(), Timestamp::new(1));
        assert_eq!(record.verification_status, VerificationStatus::Unverified);
        assert!(record.verifier_email.is_none());
        assert!(record.verification_requested_at.is_none());
        assert!(record.onchain_confirmation_reference.is_none());
    }

    #[test]
    fn records_get_distinct_ids() {
        let a = JobHistoryRecord::new(CandidateId::generate(), details(), Timestamp::new(1));
        let b = JobHistoryRecord::new(CandidateId::generate(), details(), Timestamp::new(1));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn transition_walks_the_graph_and_stamps_processed_at() {
        let mut record =
            JobHistoryRecord::new(CandidateId::generate(), details(), Timestamp::new(1));

        record
            .transition_to(VerificationStatus::Pending, Timestamp::new(10))
            .unwrap();
        assert!(record.verification_processed_at.is_none());

        record
            .transition_to(VerificationStatus::Verified, Timestamp::new(20))
            .unwrap();
        assert_eq!(record.verification_processed_at, Some(Timestamp::new(20)));

        record
            .transition_to(VerificationStatus::ConfirmedOnchain, Timestamp::new(30))
            .unwrap();
        // Anchoring does not overwrite the verifier's timestamp.
        assert_eq!(record.verification_processed_at, Some(Timestamp::new(20)));
    }

    #[test]
    fn transition_rejects_edges_outside_the_graph() {
        let mut record =
            JobHistoryRecord::new(CandidateId::generate(), details(), Timestamp::new(1));
        let err = record
            .transition_to(VerificationStatus::Verified, Timestamp::new(10))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid status transition: UNVERIFIED -> VERIFIED"
        );
        assert_eq!(record.verification_status, VerificationStatus::Unverified);
    }

    #[test]
    fn status_serializes_as_screaming_snake() {
        let record = JobHistoryRecord::new(CandidateId::generate(), details(), Timestamp::new(1));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["verification_status"], "UNVERIFIED");
    }
}
