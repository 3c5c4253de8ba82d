//! Verification token storage trait.

use crate::StoreError;
use zid_types::{JobHistoryId, Timestamp, TokenId, VerificationToken};

/// Storage for verification tokens.
///
/// [`consume_token`](TokenStore::consume_token) is the atomicity primitive
/// of the whole workflow: for any token it returns `Ok` to exactly one
/// caller, ever.
pub trait TokenStore {
    /// Insert a freshly issued token. Fails with [`StoreError::Duplicate`]
    /// if the id already exists.
    fn insert_token(&self, token: &VerificationToken) -> Result<(), StoreError>;

    /// Point-read a token.
    fn get_token(&self, id: &TokenId) -> Result<VerificationToken, StoreError>;

    /// Atomically mark a token consumed, stamping `consumed_at`.
    ///
    /// Returns the token as stored after consumption. Fails with
    /// [`StoreError::NotFound`] for an unknown id and
    /// [`StoreError::Conflict`] if the token was already consumed — two
    /// near-simultaneous calls on the same token must produce exactly one
    /// `Ok`.
    fn consume_token(&self, id: &TokenId, now: Timestamp)
        -> Result<VerificationToken, StoreError>;

    /// The unconsumed token currently referencing `job_history_id`, if any.
    /// Expired-but-unconsumed tokens are still returned; the caller decides
    /// what expiry means.
    fn outstanding_token_for(
        &self,
        job_history_id: &JobHistoryId,
    ) -> Result<Option<VerificationToken>, StoreError>;

    /// Delete a token. Used by the issuer's rollback path.
    fn remove_token(&self, id: &TokenId) -> Result<(), StoreError>;
}
