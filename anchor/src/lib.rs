//! Asynchronous on-chain anchoring.
//!
//! Acceptance enqueues one work item; nothing in the user-facing path waits
//! for the ledger. A background worker leases items, calls the ledger
//! gateway, and retries with exponential backoff up to a bounded attempt
//! count. When the limit is exhausted the item is marked failed and the
//! record stays `VERIFIED` — the verifier's confirmation is never rolled
//! back because the optional anchoring could not complete.

pub mod backoff;
pub mod error;
pub mod ledger;
pub mod queue;
pub mod worker;

pub use error::AnchorError;
pub use ledger::{HttpLedger, LedgerClient, LedgerError};
pub use queue::AnchorQueue;
pub use worker::AnchorWorker;
