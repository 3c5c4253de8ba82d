//! HTTP mail-webhook dispatcher.
//!
//! Posts the rendered notice as JSON to the configured mail webhook (the
//! hosted function that owns SMTP credentials) and treats anything other
//! than a 2xx as a dispatch failure, so the issuer can roll back.

use crate::{Notifier, NotifyError, VerificationNotice};

pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpMailer {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

impl Notifier for HttpMailer {
    async fn send(&self, notice: &VerificationNotice) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(notice)
            .send()
            .await
            .map_err(|e| NotifyError::Unreachable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(to = %notice.to, "verification email dispatched");
            Ok(())
        } else {
            let detail = response.text().await.unwrap_or_default();
            Err(NotifyError::Rejected(format!("{status}: {detail}")))
        }
    }
}
