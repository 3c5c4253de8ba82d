use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("mail webhook rejected the message: {0}")]
    Rejected(String),

    #[error("mail webhook unreachable: {0}")]
    Unreachable(String),
}
