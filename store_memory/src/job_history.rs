//! Job-history record storage over the in-memory map.

use crate::{MemoryStore, RecordSlot};
use zid_store::{JobHistoryStore, StoreError, Versioned};
use zid_types::{CandidateId, JobHistoryId, JobHistoryRecord};

impl JobHistoryStore for MemoryStore {
    fn insert_record(&self, record: &JobHistoryRecord) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();
        if records.contains_key(record.id.as_str()) {
            return Err(StoreError::Duplicate(record.id.to_string()));
        }
        let mut seq = self.record_seq.lock().unwrap();
        *seq += 1;
        records.insert(
            record.id.as_str().to_string(),
            RecordSlot {
                revision: 1,
                seq: *seq,
                doc: record.clone(),
            },
        );
        Ok(())
    }

    fn get_record(&self, id: &JobHistoryId) -> Result<Versioned<JobHistoryRecord>, StoreError> {
        self.records
            .lock()
            .unwrap()
            .get(id.as_str())
            .map(|slot| Versioned {
                revision: slot.revision,
                doc: slot.doc.clone(),
            })
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn update_record(
        &self,
        expected_revision: u64,
        record: &JobHistoryRecord,
    ) -> Result<u64, StoreError> {
        let mut records = self.records.lock().unwrap();
        let slot = records
            .get_mut(record.id.as_str())
            .ok_or_else(|| StoreError::NotFound(record.id.to_string()))?;
        if slot.revision != expected_revision {
            return Err(StoreError::Conflict(format!(
                "{}: expected revision {expected_revision}, found {}",
                record.id, slot.revision
            )));
        }
        slot.revision += 1;
        slot.doc = record.clone();
        Ok(slot.revision)
    }

    fn list_by_candidate(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Vec<JobHistoryRecord>, StoreError> {
        let records = self.records.lock().unwrap();
        let mut owned: Vec<(u64, JobHistoryRecord)> = records
            .values()
            .filter(|slot| &slot.doc.candidate_id == candidate_id)
            .map(|slot| (slot.seq, slot.doc.clone()))
            .collect();
        owned.sort_by_key(|(seq, _)| *seq);
        Ok(owned.into_iter().map(|(_, doc)| doc).collect())
    }

    fn remove_record(&self, id: &JobHistoryId) -> Result<(), StoreError> {
        self.records
            .lock()
            .unwrap()
            .remove(id.as_str())
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn record_count(&self) -> Result<u64, StoreError> {
        Ok(self.records.lock().unwrap().len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zid_types::{JobDetails, Timestamp};

    fn record(candidate: &CandidateId) -> JobHistoryRecord {
        JobHistoryRecord::new(
            candidate.clone(),
            JobDetails {
                company_name: "Initech".into(),
                job_title: "Analyst".into(),
                start_date: Timestamp::new(100),
                end_date: Some(Timestamp::new(200)),
                is_current_job: false,
                location: Some("Remote".into()),
                employment_type: None,
                description: "TPS reports".into(),
            },
            Timestamp::new(50),
        )
    }

    #[test]
    fn insert_get_roundtrip() {
        let store = MemoryStore::new();
        let rec = record(&CandidateId::generate());
        store.insert_record(&rec).unwrap();

        let got = store.get_record(&rec.id).unwrap();
        assert_eq!(got.revision, 1);
        assert_eq!(got.doc, rec);
    }

    #[test]
    fn duplicate_insert_rejected() {
        let store = MemoryStore::new();
        let rec = record(&CandidateId::generate());
        store.insert_record(&rec).unwrap();
        assert!(matches!(
            store.insert_record(&rec),
            Err(StoreError::Duplicate(_))
        ));
    }

    #[test]
    fn conditional_update_detects_stale_revision() {
        let store = MemoryStore::new();
        let mut rec = record(&CandidateId::generate());
        store.insert_record(&rec).unwrap();

        rec.details.job_title = "Senior Analyst".into();
        let rev2 = store.update_record(1, &rec).unwrap();
        assert_eq!(rev2, 2);

        // A writer still holding revision 1 must lose.
        rec.details.job_title = "Stale".into();
        assert!(matches!(
            store.update_record(1, &rec),
            Err(StoreError::Conflict(_))
        ));

        assert_eq!(
            store.get_record(&rec.id).unwrap().doc.details.job_title,
            "Senior Analyst"
        );
    }

    #[test]
    fn list_by_candidate_preserves_insertion_order() {
        let store = MemoryStore::new();
        let candidate = CandidateId::generate();
        let first = record(&candidate);
        let second = record(&candidate);
        let other = record(&CandidateId::generate());

        store.insert_record(&first).unwrap();
        store.insert_record(&other).unwrap();
        store.insert_record(&second).unwrap();

        let listed = store.list_by_candidate(&candidate).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, first.id);
        assert_eq!(listed[1].id, second.id);
    }

    #[test]
    fn remove_unknown_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.remove_record(&JobHistoryId::generate()),
            Err(StoreError::NotFound(_))
        ));
    }
}
