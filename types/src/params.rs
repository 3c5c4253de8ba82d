//! Workflow parameters — every tunable of the verification lifecycle.

use serde::{Deserialize, Serialize};

/// Tunables for token expiry and the anchor worker's retry policy.
///
/// Loaded from the service configuration; tests construct their own with
/// short windows.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowParams {
    /// How long a verification token stays valid, in seconds.
    /// Default: 14 days. Generous on purpose — expiry comparisons must
    /// tolerate clock skew between issuing and resolving processes.
    pub token_ttl_secs: u64,

    /// Maximum ledger-anchoring attempts before a work item is marked failed.
    pub max_anchor_attempts: u32,

    /// First retry delay after a failed anchoring attempt, in seconds.
    pub anchor_backoff_initial_secs: u64,

    /// Cap on the exponential retry delay, in seconds.
    pub anchor_backoff_max_secs: u64,

    /// How long a leased work item stays invisible to other workers before
    /// it becomes eligible for re-dequeue, in seconds.
    pub anchor_lease_secs: u64,
}

impl WorkflowParams {
    pub const DEFAULT_TOKEN_TTL_SECS: u64 = 14 * 24 * 60 * 60;

    pub fn defaults() -> Self {
        Self {
            token_ttl_secs: Self::DEFAULT_TOKEN_TTL_SECS,
            max_anchor_attempts: 5,
            anchor_backoff_initial_secs: 30,
            anchor_backoff_max_secs: 3600,
            anchor_lease_secs: 300,
        }
    }
}

impl Default for WorkflowParams {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_token_ttl_is_fourteen_days() {
        assert_eq!(WorkflowParams::defaults().token_ttl_secs, 1_209_600);
    }
}
