//! Nullable notifier — record notices without sending them.

use std::sync::Mutex;

use zid_notify::{Notifier, NotifyError, VerificationNotice};

/// A test notifier that records every notice instead of dispatching it.
///
/// Call [`fail_with`](NullNotifier::fail_with) to make subsequent sends
/// fail, for exercising the issuer's rollback path.
pub struct NullNotifier {
    sent: Mutex<Vec<VerificationNotice>>,
    failure: Mutex<Option<String>>,
}

impl NullNotifier {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
        }
    }

    /// Make every following send fail with `reason`.
    pub fn fail_with(&self, reason: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(reason.into());
    }

    /// Let sends succeed again.
    pub fn succeed(&self) {
        *self.failure.lock().unwrap() = None;
    }

    /// All notices "sent" so far (for assertions).
    pub fn sent(&self) -> Vec<VerificationNotice> {
        self.sent.lock().unwrap().clone()
    }

    /// Number of notices sent.
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl Default for NullNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for NullNotifier {
    async fn send(&self, notice: &VerificationNotice) -> Result<(), NotifyError> {
        if let Some(reason) = self.failure.lock().unwrap().clone() {
            return Err(NotifyError::Rejected(reason));
        }
        self.sent.lock().unwrap().push(notice.clone());
        Ok(())
    }
}
