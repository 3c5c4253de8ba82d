use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypeError {
    #[error("invalid identifier: expected `{expected_prefix}` prefix, got `{value}`")]
    InvalidId {
        expected_prefix: &'static str,
        value: String,
    },

    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    #[error("invalid verification action: {0}")]
    InvalidAction(String),

    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: crate::status::VerificationStatus,
        to: crate::status::VerificationStatus,
    },
}
