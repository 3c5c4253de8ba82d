//! Prometheus metrics for the workflow's HTTP surface.

use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

use crate::error::RpcError;

pub struct RpcMetrics {
    registry: Registry,
    pub requests_issued: IntCounter,
    pub resolutions_accepted: IntCounter,
    pub resolutions_rejected: IntCounter,
    pub resolution_failures: IntCounter,
}

impl RpcMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let requests_issued = IntCounter::new(
            "zid_verification_requests_issued_total",
            "Verification requests successfully issued",
        )
        .expect("valid counter definition");
        let resolutions_accepted = IntCounter::new(
            "zid_verification_resolutions_accepted_total",
            "Verification links resolved with accept",
        )
        .expect("valid counter definition");
        let resolutions_rejected = IntCounter::new(
            "zid_verification_resolutions_rejected_total",
            "Verification links resolved with reject",
        )
        .expect("valid counter definition");
        let resolution_failures = IntCounter::new(
            "zid_verification_resolution_failures_total",
            "Verification link resolutions that failed (expired, replayed, unknown)",
        )
        .expect("valid counter definition");

        for counter in [
            &requests_issued,
            &resolutions_accepted,
            &resolutions_rejected,
            &resolution_failures,
        ] {
            registry
                .register(Box::new(counter.clone()))
                .expect("counter registered once");
        }

        Self {
            registry,
            requests_issued,
            resolutions_accepted,
            resolutions_rejected,
            resolution_failures,
        }
    }

    /// Render the registry in the Prometheus text exposition format.
    pub fn render(&self) -> Result<String, RpcError> {
        let mut buf = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buf)
            .map_err(|e| RpcError::Server(e.to_string()))?;
        String::from_utf8(buf).map_err(|e| RpcError::Server(e.to_string()))
    }
}

impl Default for RpcMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_exposition() {
        let metrics = RpcMetrics::new();
        metrics.requests_issued.inc();
        metrics.resolutions_accepted.inc();
        metrics.resolutions_accepted.inc();

        let text = metrics.render().unwrap();
        assert!(text.contains("zid_verification_requests_issued_total 1"));
        assert!(text.contains("zid_verification_resolutions_accepted_total 2"));
    }
}
