use thiserror::Error;
use zid_store::StoreError;
use zid_types::{JobHistoryId, TokenId, TypeError, VerificationStatus};

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("job history record not found: {0}")]
    RecordNotFound(JobHistoryId),

    #[error("a verification request is already outstanding for {0}")]
    DuplicateRequest(JobHistoryId),

    #[error("record {0} is already verified")]
    AlreadyVerified(JobHistoryId),

    #[error("invalid verifier email: {0}")]
    InvalidEmail(String),

    #[error("notification dispatch failed: {0}")]
    NotificationDispatchFailed(String),

    #[error("verification token not found: {0}")]
    TokenNotFound(TokenId),

    #[error("verification token expired: {0}")]
    TokenExpired(TokenId),

    #[error("verification token already consumed: {0}")]
    TokenAlreadyConsumed(TokenId),

    #[error("invalid verification action: {0}")]
    InvalidAction(String),

    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: VerificationStatus,
        to: VerificationStatus,
    },

    #[error("record {0} has a pending verification and cannot be deleted")]
    RecordLocked(JobHistoryId),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl From<TypeError> for VerificationError {
    fn from(e: TypeError) -> Self {
        match e {
            TypeError::InvalidEmail(s) => Self::InvalidEmail(s),
            TypeError::InvalidAction(s) => Self::InvalidAction(s),
            TypeError::InvalidTransition { from, to } => Self::InvalidTransition { from, to },
            TypeError::InvalidId { value, .. } => Self::InvalidIdentifier(value),
        }
    }
}
