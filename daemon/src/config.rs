//! Service configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use zid_types::WorkflowParams;

/// Configuration for the verification service.
///
/// Loaded from a TOML file via [`ServiceConfig::from_toml_file`] or built
/// from defaults; CLI flags and environment variables override file values.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Address the HTTP API binds to.
    pub bind_addr: String,

    /// Public base URL used when building verification links. Must be the
    /// externally reachable origin of this service.
    pub public_base_url: String,

    /// Mail webhook the issuer posts rendered notices to.
    pub mail_webhook_url: String,

    /// Ledger gateway the anchor worker submits confirmations to.
    pub ledger_gateway_url: String,

    /// Token expiry and anchor retry tunables.
    pub workflow: WorkflowParams,

    /// Anchor worker poll interval in seconds.
    pub worker_tick_secs: u64,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    pub log_level: String,

    /// Log format: "human" or "json".
    pub log_format: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:7080".into(),
            public_base_url: "http://localhost:7080".into(),
            mail_webhook_url: String::new(),
            ledger_gateway_url: String::new(),
            workflow: WorkflowParams::defaults(),
            worker_tick_secs: 5,
            log_level: "info".into(),
            log_format: "human".into(),
        }
    }
}

impl ServiceConfig {
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: ServiceConfig = toml::from_str("").unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:7080");
        assert_eq!(config.worker_tick_secs, 5);
        assert_eq!(config.workflow.token_ttl_secs, 1_209_600);
    }

    #[test]
    fn partial_workflow_section_keeps_other_defaults() {
        let config: ServiceConfig = toml::from_str(
            r#"
            public_base_url = "https://verify.example.com"

            [workflow]
            token_ttl_secs = 3600
            "#,
        )
        .unwrap();
        assert_eq!(config.public_base_url, "https://verify.example.com");
        assert_eq!(config.workflow.token_ttl_secs, 3600);
        assert_eq!(config.workflow.max_anchor_attempts, 5);
    }
}
