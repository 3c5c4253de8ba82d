//! Anchor work-queue storage over the in-memory map.

use crate::MemoryStore;
use zid_store::{
    AnchorItemStatus, AnchorQueueCounts, AnchorQueueStore, AnchorWorkItem, StoreError,
};
use zid_types::{Timestamp, WorkItemId};

impl AnchorQueueStore for MemoryStore {
    fn enqueue_item(&self, item: &AnchorWorkItem) -> Result<(), StoreError> {
        let mut items = self.items.lock().unwrap();
        if items.contains_key(item.id.as_str()) {
            return Err(StoreError::Duplicate(item.id.to_string()));
        }
        items.insert(item.id.as_str().to_string(), item.clone());
        Ok(())
    }

    fn get_item(&self, id: &WorkItemId) -> Result<AnchorWorkItem, StoreError> {
        self.items
            .lock()
            .unwrap()
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn lease_next(
        &self,
        now: Timestamp,
        lease_secs: u64,
    ) -> Result<Option<AnchorWorkItem>, StoreError> {
        // Selection and lease-marking happen under one lock, so two workers
        // can never lease the same item.
        let mut items = self.items.lock().unwrap();

        let due_key = items
            .values()
            .filter(|item| match item.status {
                AnchorItemStatus::Pending => item.next_attempt_at.is_reached(now),
                AnchorItemStatus::InProgress => item
                    .lease_expires_at
                    .is_some_and(|lease| lease.is_reached(now)),
                AnchorItemStatus::Done | AnchorItemStatus::Failed => false,
            })
            .min_by_key(|item| (item.next_attempt_at, item.created_at, item.id.as_str().to_string()))
            .map(|item| item.id.as_str().to_string());

        let Some(key) = due_key else {
            return Ok(None);
        };

        let item = items.get_mut(&key).expect("due item vanished under lock");
        item.status = AnchorItemStatus::InProgress;
        item.attempts += 1;
        item.last_attempt_at = Some(now);
        item.lease_expires_at = Some(now.plus_secs(lease_secs));
        Ok(Some(item.clone()))
    }

    fn update_item(&self, item: &AnchorWorkItem) -> Result<(), StoreError> {
        let mut items = self.items.lock().unwrap();
        if !items.contains_key(item.id.as_str()) {
            return Err(StoreError::NotFound(item.id.to_string()));
        }
        items.insert(item.id.as_str().to_string(), item.clone());
        Ok(())
    }

    fn queue_counts(&self) -> Result<AnchorQueueCounts, StoreError> {
        let items = self.items.lock().unwrap();
        let mut counts = AnchorQueueCounts::default();
        for item in items.values() {
            match item.status {
                AnchorItemStatus::Pending => counts.pending += 1,
                AnchorItemStatus::InProgress => counts.in_progress += 1,
                AnchorItemStatus::Done => counts.done += 1,
                AnchorItemStatus::Failed => counts.failed += 1,
            }
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zid_types::JobHistoryId;

    fn item(now: u64) -> AnchorWorkItem {
        AnchorWorkItem::confirm_employment(JobHistoryId::generate(), Timestamp::new(now))
    }

    #[test]
    fn lease_marks_in_progress_and_counts_attempt() {
        let store = MemoryStore::new();
        let it = item(100);
        store.enqueue_item(&it).unwrap();

        let leased = store.lease_next(Timestamp::new(100), 300).unwrap().unwrap();
        assert_eq!(leased.id, it.id);
        assert_eq!(leased.status, AnchorItemStatus::InProgress);
        assert_eq!(leased.attempts, 1);
        assert_eq!(leased.last_attempt_at, Some(Timestamp::new(100)));
        assert_eq!(leased.lease_expires_at, Some(Timestamp::new(400)));
    }

    #[test]
    fn leased_item_is_invisible_until_lease_expires() {
        let store = MemoryStore::new();
        store.enqueue_item(&item(100)).unwrap();

        store.lease_next(Timestamp::new(100), 300).unwrap().unwrap();
        // Still leased at 399.
        assert!(store.lease_next(Timestamp::new(399), 300).unwrap().is_none());
        // Lease lapsed at 400 — a crashed worker's item comes back.
        let reclaimed = store.lease_next(Timestamp::new(400), 300).unwrap().unwrap();
        assert_eq!(reclaimed.attempts, 2);
    }

    #[test]
    fn items_not_yet_due_are_skipped() {
        let store = MemoryStore::new();
        let mut it = item(100);
        it.next_attempt_at = Timestamp::new(500);
        store.enqueue_item(&it).unwrap();

        assert!(store.lease_next(Timestamp::new(499), 300).unwrap().is_none());
        assert!(store.lease_next(Timestamp::new(500), 300).unwrap().is_some());
    }

    #[test]
    fn earliest_due_item_wins() {
        let store = MemoryStore::new();
        let mut early = item(100);
        early.next_attempt_at = Timestamp::new(100);
        let mut late = item(100);
        late.next_attempt_at = Timestamp::new(200);
        store.enqueue_item(&late).unwrap();
        store.enqueue_item(&early).unwrap();

        let leased = store.lease_next(Timestamp::new(300), 60).unwrap().unwrap();
        assert_eq!(leased.id, early.id);
    }

    #[test]
    fn done_and_failed_items_are_never_leased() {
        let store = MemoryStore::new();
        let mut it = item(100);
        store.enqueue_item(&it).unwrap();

        it.status = AnchorItemStatus::Done;
        store.update_item(&it).unwrap();
        assert!(store.lease_next(Timestamp::new(999), 60).unwrap().is_none());

        it.status = AnchorItemStatus::Failed;
        store.update_item(&it).unwrap();
        assert!(store.lease_next(Timestamp::new(999), 60).unwrap().is_none());
    }

    #[test]
    fn counts_track_statuses() {
        let store = MemoryStore::new();
        store.enqueue_item(&item(1)).unwrap();
        let mut done = item(1);
        done.status = AnchorItemStatus::Done;
        store.enqueue_item(&done).unwrap();

        let counts = store.queue_counts().unwrap();
        assert_eq!(counts.pending, 1);
        assert_eq!(counts.done, 1);
        assert_eq!(counts.in_progress + counts.failed, 0);
    }
}
