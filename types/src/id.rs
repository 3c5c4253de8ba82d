//! Opaque prefixed identifiers.
//!
//! Every entity id is an opaque string with a fixed prefix followed by
//! hex-encoded random bytes. The token id doubles the entropy because it is
//! a bearer capability, not just a primary key.

use crate::error::TypeError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

fn random_hex(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::rng().fill_bytes(&mut buf);
    hex::encode(buf)
}

macro_rules! prefixed_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal, $entropy_bytes:literal) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// The fixed prefix for this identifier kind.
            pub const PREFIX: &'static str = $prefix;

            /// Generate a fresh identifier from a secure random source.
            pub fn generate() -> Self {
                Self(format!("{}{}", Self::PREFIX, random_hex($entropy_bytes)))
            }

            /// Parse an identifier received from an external caller.
            pub fn parse(raw: impl Into<String>) -> Result<Self, TypeError> {
                let s = raw.into();
                if s.starts_with(Self::PREFIX) && s.len() > Self::PREFIX.len() {
                    Ok(Self(s))
                } else {
                    Err(TypeError::InvalidId {
                        expected_prefix: Self::PREFIX,
                        value: s,
                    })
                }
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

prefixed_id!(
    /// Identifies one job-history record.
    JobHistoryId, "jh_", 16
);

prefixed_id!(
    /// Identifies the candidate a record belongs to.
    CandidateId, "cand_", 16
);

prefixed_id!(
    /// The unguessable, single-use verification capability.
    ///
    /// 32 bytes of entropy — the id itself is the secret embedded in the
    /// verification link, so it must be infeasible to guess.
    TokenId, "vtk_", 32
);

prefixed_id!(
    /// Identifies one anchor work item.
    WorkItemId, "awi_", 16
);

/// The opaque authenticated identity of an acting principal.
///
/// Supplied by the external identity collaborator. The service trusts the
/// value and attaches it to requests it issues; it imposes no format.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrincipalId(String);

impl PrincipalId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
