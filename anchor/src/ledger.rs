//! Ledger gateway client.
//!
//! The gateway owns the chain credentials; this service only submits a
//! confirm-employment payload and records the returned transaction
//! reference.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zid_types::JobHistoryRecord;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger gateway rejected the submission: {0}")]
    Rejected(String),

    #[error("ledger gateway unreachable: {0}")]
    Unreachable(String),
}

/// The ledger collaborator: submit one confirmation, get back a reference.
pub trait LedgerClient {
    fn confirm_employment(
        &self,
        record: &JobHistoryRecord,
    ) -> impl std::future::Future<Output = Result<String, LedgerError>> + Send;
}

#[derive(Serialize)]
struct ConfirmEmploymentRequest<'a> {
    job_history_id: &'a str,
    candidate_id: &'a str,
    company_name: &'a str,
    job_title: &'a str,
}

#[derive(Deserialize)]
struct ConfirmEmploymentResponse {
    tx_hash: String,
}

/// HTTP client for the ledger gateway.
pub struct HttpLedger {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpLedger {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

impl LedgerClient for HttpLedger {
    async fn confirm_employment(&self, record: &JobHistoryRecord) -> Result<String, LedgerError> {
        let payload = ConfirmEmploymentRequest {
            job_history_id: record.id.as_str(),
            candidate_id: record.candidate_id.as_str(),
            company_name: &record.details.company_name,
            job_title: &record.details.job_title,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| LedgerError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(LedgerError::Rejected(format!("{status}: {detail}")));
        }

        let body: ConfirmEmploymentResponse = response
            .json()
            .await
            .map_err(|e| LedgerError::Rejected(format!("malformed response: {e}")))?;
        Ok(body.tx_hash)
    }
}
