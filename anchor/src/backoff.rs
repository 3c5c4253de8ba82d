//! Exponential retry backoff.

/// Delay before the next attempt, given how many attempts have already
/// started. Doubles from `initial_secs` and caps at `max_secs`.
///
/// `attempts = 1` (first failure) waits `initial_secs`; each further
/// failure doubles the wait.
pub fn retry_delay_secs(attempts: u32, initial_secs: u64, max_secs: u64) -> u64 {
    let doublings = attempts.saturating_sub(1).min(63);
    initial_secs
        .saturating_mul(1u64 << doublings)
        .min(max_secs)
}
