//! Anchor work-item model and queue storage trait.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use zid_types::{JobHistoryId, Timestamp, WorkItemId};

/// What an anchor work item asks the ledger to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorAction {
    /// Record the verifier-confirmed employment on the external ledger.
    ConfirmEmployment,
}

/// Queue status of an anchor work item.
///
/// Moves only forward: `Pending → InProgress → Done | Failed`, with
/// `InProgress → Pending` re-queues on retryable failure or lease expiry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorItemStatus {
    Pending,
    InProgress,
    Done,
    Failed,
}

impl fmt::Display for AnchorItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// One unit of asynchronous follow-up work created by an accepted
/// verification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorWorkItem {
    pub id: WorkItemId,
    pub action: AnchorAction,
    pub job_history_id: JobHistoryId,
    pub status: AnchorItemStatus,
    /// Number of attempts started so far. Monotonically increasing.
    pub attempts: u32,
    pub created_at: Timestamp,
    pub last_attempt_at: Option<Timestamp>,
    /// Earliest time the next attempt may start (backoff schedule).
    pub next_attempt_at: Timestamp,
    /// While in progress: when the current lease lapses and the item
    /// becomes eligible for re-dequeue.
    pub lease_expires_at: Option<Timestamp>,
    /// Ledger transaction reference, set on success.
    pub reference: Option<String>,
    pub last_error: Option<String>,
}

impl AnchorWorkItem {
    /// Create a confirm-employment item, immediately eligible for dequeue.
    pub fn confirm_employment(job_history_id: JobHistoryId, now: Timestamp) -> Self {
        Self {
            id: WorkItemId::generate(),
            action: AnchorAction::ConfirmEmployment,
            job_history_id,
            status: AnchorItemStatus::Pending,
            attempts: 0,
            created_at: now,
            last_attempt_at: None,
            next_attempt_at: now,
            lease_expires_at: None,
            reference: None,
            last_error: None,
        }
    }
}

/// Per-status item counts, for telemetry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AnchorQueueCounts {
    pub pending: u64,
    pub in_progress: u64,
    pub done: u64,
    pub failed: u64,
}

/// Storage for the anchor work queue.
pub trait AnchorQueueStore {
    /// Insert a new work item. Fails with [`StoreError::Duplicate`] if the
    /// id already exists.
    fn enqueue_item(&self, item: &AnchorWorkItem) -> Result<(), StoreError>;

    /// Point-read a work item.
    fn get_item(&self, id: &WorkItemId) -> Result<AnchorWorkItem, StoreError>;

    /// Atomically lease the next due item, if any.
    ///
    /// An item is due when it is `Pending` with `next_attempt_at <= now`,
    /// or `InProgress` with an expired lease (crashed worker). The earliest
    /// `next_attempt_at` wins. The returned item has been marked
    /// `InProgress` with `attempts` incremented, `last_attempt_at = now`,
    /// and a fresh lease of `lease_secs` — two concurrent workers can never
    /// lease the same item.
    fn lease_next(
        &self,
        now: Timestamp,
        lease_secs: u64,
    ) -> Result<Option<AnchorWorkItem>, StoreError>;

    /// Replace a work item. Only the current lease holder writes here.
    fn update_item(&self, item: &AnchorWorkItem) -> Result<(), StoreError>;

    /// Per-status counts.
    fn queue_counts(&self) -> Result<AnchorQueueCounts, StoreError>;
}
