//! Timestamp type used throughout the workflow.
//!
//! Timestamps are Unix epoch seconds (UTC). Token expiry windows are days,
//! not seconds, so modest clock skew between the issuing and resolving
//! processes is tolerated by construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// Get the current system time as a `Timestamp`.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before Unix epoch")
            .as_secs();
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// This timestamp shifted forward by `secs` (saturating).
    pub fn plus_secs(&self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }

    /// Seconds elapsed since this timestamp (relative to `now`).
    pub fn elapsed_since(&self, now: Timestamp) -> u64 {
        now.0.saturating_sub(self.0)
    }

    /// Whether this deadline has been reached: `now` is at or past it.
    pub fn is_reached(&self, now: Timestamp) -> bool {
        now.0 >= self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_reached_at_and_after() {
        let deadline = Timestamp::new(100);
        assert!(!deadline.is_reached(Timestamp::new(99)));
        assert!(deadline.is_reached(Timestamp::new(100)));
        assert!(deadline.is_reached(Timestamp::new(101)));
    }

    #[test]
    fn plus_secs_saturates() {
        let t = Timestamp::new(u64::MAX - 1);
        assert_eq!(t.plus_secs(10).as_secs(), u64::MAX);
    }
}
