//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Public FAIR service origin.
pub const DEFAULT_BASE_URL: &str = "https://clarklab.uvarc.io";

/// Namespace used for minting and compute when the caller does not pick one.
pub const DEFAULT_NAMESPACE: &str = "99999";

/// Root configuration for the client.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Remote service location.
    pub service: ServiceConfig,

    /// Local filesystem settings for transfers.
    pub transfer: TransferConfig,

    /// Transport timeouts.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ClientConfig {
    /// Default configuration pointed at another origin, e.g. a local stub.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.service.base_url = base_url.into();
        config
    }

    /// Base URL without a trailing slash, ready for path concatenation.
    pub fn base_url(&self) -> &str {
        self.service.base_url.trim_end_matches('/')
    }
}

/// Remote service configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    /// Origin of the FAIR service (e.g., "https://clarklab.uvarc.io").
    pub base_url: String,

    /// Namespace for mint and compute when none is given.
    pub default_namespace: String,

    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_namespace: DEFAULT_NAMESPACE.to_string(),
            user_agent: format!("fair-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Transfer configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TransferConfig {
    /// Directory that downloads named after their distribution land in.
    pub download_dir: PathBuf,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("."),
        }
    }
}

/// Timeout configuration. Unset means wait indefinitely.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: Option<u64>,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: Option<u64>,
}

impl TimeoutConfig {
    pub fn connect(&self) -> Option<Duration> {
        self.connect_secs.map(Duration::from_secs)
    }

    pub fn request(&self) -> Option<Duration> {
        self.request_secs.map(Duration::from_secs)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.service.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.service.default_namespace, "99999");
        assert!(config.service.user_agent.starts_with("fair-client/"));
        assert_eq!(config.transfer.download_dir, PathBuf::from("."));
        assert!(config.timeouts.request().is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            [service]
            base_url = "http://127.0.0.1:9000/"

            [timeouts]
            request_secs = 30
            "#,
        )
        .unwrap();

        assert_eq!(config.base_url(), "http://127.0.0.1:9000");
        assert_eq!(config.service.default_namespace, DEFAULT_NAMESPACE);
        assert_eq!(config.timeouts.request(), Some(Duration::from_secs(30)));
        assert_eq!(config.timeouts.connect(), None);
        assert_eq!(config.observability.log_level, "info");
    }
}
