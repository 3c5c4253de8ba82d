//! Embedded in-memory implementation of the `zid-store` traits.
//!
//! Mirrors the semantics of the hosted document database: per-document
//! revisions with conditional updates, and mutex-serialized consume/lease
//! operations so that concurrent resolutions and worker dequeues have at
//! most one winner. Thread-safe; the default backend for tests and for
//! single-process deployments.

mod anchor;
mod job_history;
mod token;

use std::collections::HashMap;
use std::sync::Mutex;

use zid_store::AnchorWorkItem;
use zid_types::{JobHistoryRecord, VerificationToken};

/// A stored record with its revision and insertion sequence number.
pub(crate) struct RecordSlot {
    pub(crate) revision: u64,
    pub(crate) seq: u64,
    pub(crate) doc: JobHistoryRecord,
}

/// In-memory store implementing all three storage traits.
pub struct MemoryStore {
    pub(crate) records: Mutex<HashMap<String, RecordSlot>>,
    pub(crate) record_seq: Mutex<u64>,
    pub(crate) tokens: Mutex<HashMap<String, VerificationToken>>,
    pub(crate) items: Mutex<HashMap<String, AnchorWorkItem>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            record_seq: Mutex::new(0),
            tokens: Mutex::new(HashMap::new()),
            items: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}
