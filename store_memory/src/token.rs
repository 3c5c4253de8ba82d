//! Verification token storage over the in-memory map.

use crate::MemoryStore;
use zid_store::{StoreError, TokenStore};
use zid_types::{JobHistoryId, Timestamp, TokenId, VerificationToken};

impl TokenStore for MemoryStore {
    fn insert_token(&self, token: &VerificationToken) -> Result<(), StoreError> {
        let mut tokens = self.tokens.lock().unwrap();
        if tokens.contains_key(token.id.as_str()) {
            return Err(StoreError::Duplicate(token.id.to_string()));
        }
        tokens.insert(token.id.as_str().to_string(), token.clone());
        Ok(())
    }

    fn get_token(&self, id: &TokenId) -> Result<VerificationToken, StoreError> {
        self.tokens
            .lock()
            .unwrap()
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn consume_token(
        &self,
        id: &TokenId,
        now: Timestamp,
    ) -> Result<VerificationToken, StoreError> {
        // The whole check-and-set happens under one lock: exactly one caller
        // per token ever gets Ok.
        let mut tokens = self.tokens.lock().unwrap();
        let token = tokens
            .get_mut(id.as_str())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if token.consumed {
            return Err(StoreError::Conflict(format!("{id}: already consumed")));
        }
        token.consumed = true;
        token.consumed_at = Some(now);
        Ok(token.clone())
    }

    fn outstanding_token_for(
        &self,
        job_history_id: &JobHistoryId,
    ) -> Result<Option<VerificationToken>, StoreError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .values()
            .find(|t| !t.consumed && &t.job_history_id == job_history_id)
            .cloned())
    }

    fn remove_token(&self, id: &TokenId) -> Result<(), StoreError> {
        self.tokens
            .lock()
            .unwrap()
            .remove(id.as_str())
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}
