//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Base URL must be an absolute http(s) URL
//! - Value ranges (timeouts > 0, namespace non-empty)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ConfigIssue>>

use std::fmt;
use url::Url;

use crate::config::schema::ClientConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    /// Dotted path of the offending key.
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a configuration, collecting every issue.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ConfigIssue>> {
    let mut issues = Vec::new();

    match Url::parse(&config.service.base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => issues.push(ConfigIssue {
            field: "service.base_url",
            message: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(e) => issues.push(ConfigIssue {
            field: "service.base_url",
            message: format!("'{}' is not a valid URL: {}", config.service.base_url, e),
        }),
    }

    if config.service.default_namespace.trim().is_empty() {
        issues.push(ConfigIssue {
            field: "service.default_namespace",
            message: "must not be empty".into(),
        });
    }

    if config.timeouts.connect_secs == Some(0) {
        issues.push(ConfigIssue {
            field: "timeouts.connect_secs",
            message: "must be greater than zero".into(),
        });
    }
    if config.timeouts.request_secs == Some(0) {
        issues.push(ConfigIssue {
            field: "timeouts.request_secs",
            message: "must be greater than zero".into(),
        });
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}
