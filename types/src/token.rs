//! The single-use verification token and the actions it authorizes.

use crate::error::TypeError;
use crate::id::{JobHistoryId, TokenId};
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a verification link asks the verifier to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationAction {
    Accept,
    Reject,
}

impl VerificationAction {
    /// Parse the `{action}` path segment of a verification link.
    pub fn parse(raw: &str) -> Result<Self, TypeError> {
        match raw {
            "accept" => Ok(Self::Accept),
            "reject" => Ok(Self::Reject),
            other => Err(TypeError::InvalidAction(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
        }
    }
}

impl fmt::Display for VerificationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single-use, expiring capability authorizing one verifier decision on
/// one job-history record.
///
/// The token id is the secret; the record id never appears in a link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationToken {
    pub id: TokenId,
    pub job_history_id: JobHistoryId,
    pub allowed_actions: Vec<VerificationAction>,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
    pub consumed: bool,
    pub consumed_at: Option<Timestamp>,
}

impl VerificationToken {
    /// Issue a fresh token for `job_history_id`, valid for `ttl_secs`.
    pub fn issue(job_history_id: JobHistoryId, now: Timestamp, ttl_secs: u64) -> Self {
        Self {
            id: TokenId::generate(),
            job_history_id,
            allowed_actions: vec![VerificationAction::Accept, VerificationAction::Reject],
            issued_at: now,
            expires_at: now.plus_secs(ttl_secs),
            consumed: false,
            consumed_at: None,
        }
    }

    /// Whether the token is past its expiry. The boundary itself counts as
    /// expired: resolving exactly at `expires_at` fails.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at.is_reached(now)
    }

    /// Whether the token authorizes `action`.
    pub fn permits(&self, action: VerificationAction) -> bool {
        self.allowed_actions.contains(&action)
    }
}
