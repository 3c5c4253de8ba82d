//! Abstract storage traits for the ZID verification service.
//!
//! The hosted document database, the embedded in-memory backend, and any
//! future backend implement these traits. The workflow engines depend only
//! on the traits — and on their concurrency contracts: revision-checked
//! updates for records, single-winner consumption for tokens, and atomic
//! leasing for anchor work items.

pub mod anchor;
pub mod error;
pub mod job_history;
pub mod token;

pub use anchor::{
    AnchorAction, AnchorItemStatus, AnchorQueueCounts, AnchorQueueStore, AnchorWorkItem,
};
pub use error::StoreError;
pub use job_history::JobHistoryStore;
pub use token::TokenStore;

/// A document together with the storage revision it was read at.
///
/// Passing the revision back to [`JobHistoryStore::update`] makes the write
/// conditional: it fails with [`StoreError::Conflict`] if anyone else wrote
/// in between.
#[derive(Clone, Debug)]
pub struct Versioned<T> {
    pub revision: u64,
    pub doc: T,
}
