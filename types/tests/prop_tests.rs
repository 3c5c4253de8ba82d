//! Property tests for the status machine and input validation.

use proptest::prelude::*;
use zid_types::{EmailAddress, VerificationStatus};

use VerificationStatus::*;

const ALL_STATUSES: [VerificationStatus; 6] =
    [Unverified, Pending, Verified, ConfirmedOnchain, Rejected, Expired];

fn any_status() -> impl Strategy<Value = VerificationStatus> {
    prop::sample::select(ALL_STATUSES.to_vec())
}

proptest! {
    /// Once anchored, nothing moves: CONFIRMED_ONCHAIN is a sink.
    #[test]
    fn confirmed_onchain_is_a_sink(next in any_status()) {
        prop_assert!(!ConfirmedOnchain.can_transition_to(next));
    }

    /// Only the resolver's fan-out leaves PENDING, and every exit from
    /// PENDING is a verifier- or expiry-decided outcome.
    #[test]
    fn pending_exits_are_outcomes(next in any_status()) {
        if Pending.can_transition_to(next) {
            prop_assert!(matches!(next, Verified | Rejected | Expired));
        }
    }

    /// Every state that accepts a new request transitions to PENDING and
    /// nowhere else.
    #[test]
    fn reissuable_states_only_reach_pending(from in any_status(), next in any_status()) {
        if from.accepts_new_request() && from.can_transition_to(next) {
            prop_assert_eq!(next, Pending);
        }
    }

    /// The graph is irreflexive — no state transitions to itself.
    #[test]
    fn no_self_loops(s in any_status()) {
        prop_assert!(!s.can_transition_to(s));
    }

    /// Whitespace anywhere makes an address invalid.
    #[test]
    fn email_rejects_whitespace(prefix in "[a-z]{1,8}", suffix in "[a-z]{1,8}") {
        let addr = format!("{prefix} {suffix}@example.com");
        prop_assert!(EmailAddress::parse(addr).is_err());
    }

    /// A missing `@` always fails, whatever the rest looks like.
    #[test]
    fn email_requires_at_sign(s in "[a-z0-9.]{1,20}") {
        prop_assert!(EmailAddress::parse(s).is_err());
    }

    /// Well-formed `local@label.tld` addresses always parse.
    #[test]
    fn email_accepts_dotted_domains(
        local in "[a-z][a-z0-9]{0,10}",
        label in "[a-z][a-z0-9]{0,10}",
        tld in "[a-z]{2,6}",
    ) {
        let addr = format!("{local}@{label}.{tld}");
        prop_assert!(EmailAddress::parse(addr).is_ok());
    }
}
