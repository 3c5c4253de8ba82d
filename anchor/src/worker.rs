//! The anchor worker loop.
//!
//! Leases due items, submits them to the ledger gateway, and reports the
//! outcome. Runs as an independent tokio task; may be replicated, because
//! leasing is atomic and a crashed worker's items come back after the lease
//! timeout.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use zid_store::{AnchorItemStatus, AnchorQueueStore, AnchorWorkItem, JobHistoryStore, StoreError};
use zid_types::{Timestamp, WorkflowParams};
use zid_utils::{format_duration, StatsCounter};

use crate::error::AnchorError;
use crate::ledger::LedgerClient;
use crate::queue::AnchorQueue;

pub struct AnchorWorker<S, L> {
    queue: AnchorQueue<S>,
    store: Arc<S>,
    ledger: L,
    tick_interval: Duration,
    stats: StatsCounter,
}

impl<S, L> AnchorWorker<S, L>
where
    S: AnchorQueueStore + JobHistoryStore + Send + Sync,
    L: LedgerClient + Send + Sync,
{
    pub fn new(
        store: Arc<S>,
        ledger: L,
        params: WorkflowParams,
        tick_interval: Duration,
    ) -> Self {
        Self {
            queue: AnchorQueue::new(Arc::clone(&store), params),
            store,
            ledger,
            tick_interval,
            stats: StatsCounter::new(&["anchor_done", "anchor_failed", "anchor_retried"]),
        }
    }

    pub fn stats(&self) -> &StatsCounter {
        &self.stats
    }

    /// Run until the shutdown signal fires.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        let mut interval = tokio::time::interval(self.tick_interval);
        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    tracing::info!("anchor worker stopping");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.drain(Timestamp::now()).await {
                        tracing::error!(error = %e, "anchor drain aborted");
                    }
                }
            }
        }
    }

    /// Process every item that is due at `now`.
    pub async fn drain(&self, now: Timestamp) -> Result<(), AnchorError> {
        while let Some(item) = self.queue.dequeue_next(now)? {
            self.process(item, now).await?;
        }
        Ok(())
    }

    async fn process(&self, item: AnchorWorkItem, now: Timestamp) -> Result<(), AnchorError> {
        let record = match self.store.get_record(&item.job_history_id) {
            Ok(versioned) => versioned.doc,
            Err(StoreError::NotFound(_)) => {
                tracing::warn!(item = %item.id, record = %item.job_history_id, "record gone; discarding work item");
                self.queue.discard(&item, "job history record deleted".into())?;
                self.stats.increment("anchor_failed");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        match self.ledger.confirm_employment(&record).await {
            Ok(reference) => {
                self.queue.report_success(&item, reference.clone(), now)?;
                self.stats.increment("anchor_done");
                tracing::info!(
                    record = %item.job_history_id,
                    reference = %reference,
                    attempt = item.attempts,
                    "employment anchored on ledger"
                );
            }
            Err(e) => match self.queue.report_failure(&item, e.to_string(), now)? {
                AnchorItemStatus::Failed => {
                    self.stats.increment("anchor_failed");
                    tracing::warn!(
                        record = %item.job_history_id,
                        attempts = item.attempts,
                        error = %e,
                        "anchoring gave up; record stays VERIFIED"
                    );
                }
                _ => {
                    self.stats.increment("anchor_retried");
                    let updated = self.store.get_item(&item.id)?;
                    let delay = updated.next_attempt_at.as_secs().saturating_sub(now.as_secs());
                    tracing::warn!(
                        record = %item.job_history_id,
                        attempt = item.attempts,
                        error = %e,
                        "anchoring failed; retrying in {}",
                        format_duration(delay)
                    );
                }
            },
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::LedgerError;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use zid_store_memory::MemoryStore;
    use zid_types::{CandidateId, JobDetails, JobHistoryRecord, VerificationStatus};

    /// Ledger double fed a script of outcomes; anything past the script fails.
    struct ScriptedLedger {
        outcomes: Mutex<VecDeque<Result<String, String>>>,
        calls: Mutex<u32>,
    }

    impl ScriptedLedger {
        fn new(outcomes: Vec<Result<String, String>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    impl LedgerClient for ScriptedLedger {
        async fn confirm_employment(
            &self,
            _record: &JobHistoryRecord,
        ) -> Result<String, LedgerError> {
            *self.calls.lock().unwrap() += 1;
            match self.outcomes.lock().unwrap().pop_front() {
                Some(Ok(reference)) => Ok(reference),
                Some(Err(e)) => Err(LedgerError::Rejected(e)),
                None => Err(LedgerError::Unreachable("no script".into())),
            }
        }
    }

    fn params() -> WorkflowParams {
        WorkflowParams {
            max_anchor_attempts: 3,
            anchor_backoff_initial_secs: 10,
            anchor_backoff_max_secs: 100,
            anchor_lease_secs: 60,
            ..WorkflowParams::defaults()
        }
    }

    fn verified_record(store: &MemoryStore) -> JobHistoryRecord {
        let mut record = JobHistoryRecord::new(
            CandidateId::generate(),
            JobDetails {
                company_name: "Globex".into(),
                job_title: "Engineer".into(),
                start_date: Timestamp::new(0),
                end_date: None,
                is_current_job: true,
                location: None,
                employment_type: None,
                description: String::new(),
            },
            Timestamp::new(0),
        );
        record
            .transition_to(VerificationStatus::Pending, Timestamp::new(1))
            .unwrap();
        record
            .transition_to(VerificationStatus::Verified, Timestamp::new(2))
            .unwrap();
        store.insert_record(&record).unwrap();
        record
    }

    fn worker(
        store: &Arc<MemoryStore>,
        ledger: ScriptedLedger,
    ) -> AnchorWorker<MemoryStore, ScriptedLedger> {
        AnchorWorker::new(
            Arc::clone(store),
            ledger,
            params(),
            Duration::from_secs(1),
        )
    }

    #[tokio::test]
    async fn success_confirms_record_onchain() {
        let store = Arc::new(MemoryStore::new());
        let record = verified_record(&store);
        let item = AnchorWorkItem::confirm_employment(record.id.clone(), Timestamp::new(10));
        store.enqueue_item(&item).unwrap();

        let w = worker(&store, ScriptedLedger::new(vec![Ok("0xabc".into())]));
        w.drain(Timestamp::new(10)).await.unwrap();

        let stored = store.get_record(&record.id).unwrap().doc;
        assert_eq!(
            stored.verification_status,
            VerificationStatus::ConfirmedOnchain
        );
        assert_eq!(stored.onchain_confirmation_reference.as_deref(), Some("0xabc"));

        let done = store.get_item(&item.id).unwrap();
        assert_eq!(done.status, AnchorItemStatus::Done);
        assert_eq!(done.reference.as_deref(), Some("0xabc"));
        assert_eq!(w.stats().get("anchor_done"), 1);
    }

    #[tokio::test]
    async fn failure_requeues_with_backoff() {
        let store = Arc::new(MemoryStore::new());
        let record = verified_record(&store);
        let item = AnchorWorkItem::confirm_employment(record.id.clone(), Timestamp::new(10));
        store.enqueue_item(&item).unwrap();

        let w = worker(&store, ScriptedLedger::new(vec![Err("rpc down".into())]));
        w.drain(Timestamp::new(10)).await.unwrap();

        let requeued = store.get_item(&item.id).unwrap();
        assert_eq!(requeued.status, AnchorItemStatus::Pending);
        assert_eq!(requeued.attempts, 1);
        // attempts=1 → initial delay of 10s
        assert_eq!(requeued.next_attempt_at, Timestamp::new(20));
        assert_eq!(requeued.last_error.as_deref().map(|e| e.contains("rpc down")), Some(true));

        // Record untouched.
        let stored = store.get_record(&record.id).unwrap().doc;
        assert_eq!(stored.verification_status, VerificationStatus::Verified);
    }

    #[tokio::test]
    async fn exhausted_retries_leave_record_verified() {
        let store = Arc::new(MemoryStore::new());
        let record = verified_record(&store);
        let item = AnchorWorkItem::confirm_employment(record.id.clone(), Timestamp::new(0));
        store.enqueue_item(&item).unwrap();

        let ledger = ScriptedLedger::new(vec![
            Err("e1".into()),
            Err("e2".into()),
            Err("e3".into()),
        ]);
        let w = worker(&store, ledger);

        // Drive time past every backoff window until the item is terminal.
        let mut now = Timestamp::new(0);
        for _ in 0..10 {
            w.drain(now).await.unwrap();
            now = now.plus_secs(1000);
        }

        let dead = store.get_item(&item.id).unwrap();
        assert_eq!(dead.status, AnchorItemStatus::Failed);
        assert_eq!(dead.attempts, 3);
        assert_eq!(w.ledger.calls(), 3);

        let stored = store.get_record(&record.id).unwrap().doc;
        assert_eq!(stored.verification_status, VerificationStatus::Verified);
        assert!(stored.onchain_confirmation_reference.is_none());
        assert_eq!(w.stats().get("anchor_failed"), 1);
        assert_eq!(w.stats().get("anchor_retried"), 2);
    }

    #[tokio::test]
    async fn deleted_record_discards_item() {
        let store = Arc::new(MemoryStore::new());
        let record = verified_record(&store);
        let item = AnchorWorkItem::confirm_employment(record.id.clone(), Timestamp::new(0));
        store.enqueue_item(&item).unwrap();
        store.remove_record(&record.id).unwrap();

        let w = worker(&store, ScriptedLedger::new(vec![Ok("0xabc".into())]));
        w.drain(Timestamp::new(0)).await.unwrap();

        let dead = store.get_item(&item.id).unwrap();
        assert_eq!(dead.status, AnchorItemStatus::Failed);
        assert_eq!(w.ledger.calls(), 0);
    }

    #[tokio::test]
    async fn double_processing_after_lease_expiry_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let record = verified_record(&store);
        let item = AnchorWorkItem::confirm_employment(record.id.clone(), Timestamp::new(0));
        store.enqueue_item(&item).unwrap();

        // First worker leases but "crashes" (no outcome reported).
        store.lease_next(Timestamp::new(0), 60).unwrap().unwrap();

        // After the lease lapses a second worker finishes the job.
        let w = worker(&store, ScriptedLedger::new(vec![Ok("0xabc".into())]));
        w.drain(Timestamp::new(100)).await.unwrap();

        let stored = store.get_record(&record.id).unwrap().doc;
        assert_eq!(
            stored.verification_status,
            VerificationStatus::ConfirmedOnchain
        );
        let done = store.get_item(&item.id).unwrap();
        assert_eq!(done.status, AnchorItemStatus::Done);
        assert_eq!(done.attempts, 2);
    }
}
