use thiserror::Error;
use zid_store::StoreError;

#[derive(Debug, Error)]
pub enum AnchorError {
    #[error("work item not leased or unknown: {0}")]
    ItemNotLeased(String),

    #[error("record transition failed: {0}")]
    Transition(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
