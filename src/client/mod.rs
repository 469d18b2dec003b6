//! HTTP transports for the FAIR service.
//!
//! # Data Flow
//! ```text
//! operation call
//!     → api::call (validate arguments, pick endpoint, abort before any I/O)
//!     → api::routes (method + URL)
//!     → async_client.rs (reqwest::Client) | blocking.rs (reqwest::blocking::Client)
//!     → non-2xx → FairError::Server
//!     → api::response (unwrap field or return raw body)
//! ```
//!
//! # Design Decisions
//! - One request per operation; download may look up metadata first
//! - No retries, no caching, no shared mutable state between calls
//! - Local files are read or written in one scoped call, never held open
//!   across a request

pub mod async_client;
pub mod blocking;

pub use async_client::FairClient;
pub use blocking::BlockingFairClient;

use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::api::response::distribution_name;
use crate::config::validation::validate_config;
use crate::config::{ClientConfig, ConfigError};
use crate::error::{Result, ValidationError};

/// Check the config before a transport is built on it.
fn checked_config(config: ClientConfig) -> Result<ClientConfig> {
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Caller-chosen download path, if one was actually given.
fn explicit_target(file_name: Option<&Path>) -> Option<PathBuf> {
    file_name
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
}

/// Download path derived from a metadata record's `distribution[0].name`.
///
/// Only the final path component of the remote name is used, placed under
/// `download_dir`.
fn distribution_target(download_dir: &Path, pid: &str, metadata: &Value) -> Result<PathBuf> {
    let name = distribution_name(metadata)
        .and_then(|name| Path::new(name).file_name())
        .ok_or_else(|| ValidationError::MissingDistribution(pid.to_string()))?;
    Ok(download_dir.join(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FairError;
    use serde_json::json;

    #[test]
    fn test_explicit_target() {
        assert_eq!(explicit_target(None), None);
        assert_eq!(explicit_target(Some(Path::new(""))), None);
        assert_eq!(
            explicit_target(Some(Path::new("out/result.csv"))),
            Some(PathBuf::from("out/result.csv"))
        );
    }

    #[test]
    fn test_distribution_target() {
        let meta = json!({"distribution": [{"name": "result.txt"}]});
        let target = distribution_target(Path::new("/downloads"), "ark:/1/a", &meta).unwrap();
        assert_eq!(target, PathBuf::from("/downloads/result.txt"));
    }

    #[test]
    fn test_distribution_target_strips_directories() {
        let meta = json!({"distribution": [{"name": "../../etc/passwd"}]});
        let target = distribution_target(Path::new("dl"), "ark:/1/a", &meta).unwrap();
        assert_eq!(target, PathBuf::from("dl/passwd"));

        let meta = json!({"distribution": [{"name": ".."}]});
        assert!(distribution_target(Path::new("dl"), "ark:/1/a", &meta).is_err());
    }

    #[test]
    fn test_distribution_target_missing() {
        let meta = json!({"name": "x"});
        let err = distribution_target(Path::new("."), "ark:/1/a", &meta).unwrap_err();
        assert!(matches!(
            err,
            FairError::Validation(ValidationError::MissingDistribution(ref pid))
                if pid == "ark:/1/a"
        ));
    }
}
