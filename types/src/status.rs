//! The verification status machine for job-history records.
//!
//! One authoritative enumeration with one transition predicate. UI call
//! sites, RPC handlers, and the anchor worker all go through
//! [`VerificationStatus::can_transition_to`]; nothing else mutates a
//! record's status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The verification state of a job-history record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    /// Record exists; no verification has been requested.
    Unverified,
    /// A verification request has been issued; awaiting the verifier.
    Pending,
    /// The verifier accepted the claim.
    Verified,
    /// The accepted claim has been anchored on the external ledger.
    ConfirmedOnchain,
    /// The verifier declined the claim.
    Rejected,
    /// The verification link expired before the verifier acted.
    Expired,
}

impl VerificationStatus {
    /// Whether the directed transition graph admits `self → next`.
    ///
    /// `Rejected` and `Expired` admit a return to `Pending`: a fresh request
    /// may be issued once the prior token is consumed or expired.
    pub fn can_transition_to(&self, next: VerificationStatus) -> bool {
        use VerificationStatus::*;
        matches!(
            (self, next),
            (Unverified, Pending)
                | (Pending, Verified)
                | (Pending, Rejected)
                | (Pending, Expired)
                | (Verified, ConfirmedOnchain)
                | (Rejected, Pending)
                | (Expired, Pending)
        )
    }

    /// Whether a verification request is currently outstanding.
    pub fn has_outstanding_request(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Whether the record counts as verified (with or without anchoring).
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified | Self::ConfirmedOnchain)
    }

    /// Whether a new verification request may be issued from this state.
    pub fn accepts_new_request(&self) -> bool {
        matches!(self, Self::Unverified | Self::Rejected | Self::Expired)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unverified => "UNVERIFIED",
            Self::Pending => "PENDING",
            Self::Verified => "VERIFIED",
            Self::ConfirmedOnchain => "CONFIRMED_ONCHAIN",
            Self::Rejected => "REJECTED",
            Self::Expired => "EXPIRED",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
