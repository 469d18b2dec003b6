//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ClientConfig;
use crate::config::validation::{validate_config, ConfigIssue};

/// Overrides `service.base_url`.
pub const ENV_BASE_URL: &str = "FAIR_BASE_URL";
/// Overrides `service.default_namespace`.
pub const ENV_NAMESPACE: &str = "FAIR_NAMESPACE";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_issues(.0))]
    Validation(Vec<ConfigIssue>),
}

fn join_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load, override from the environment, and validate a TOML config file.
pub fn load_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config = parse_config(&content, |key| std::env::var(key).ok())?;

    tracing::debug!(
        path = %path.display(),
        base_url = %config.service.base_url,
        "Configuration loaded"
    );

    Ok(config)
}

/// Defaults plus environment overrides, for running without a config file.
pub fn from_env() -> Result<ClientConfig, ConfigError> {
    let mut config = ClientConfig::default();
    apply_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Parse TOML, apply overrides from `lookup`, then validate.
pub fn parse_config<F>(content: &str, lookup: F) -> Result<ClientConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config: ClientConfig = toml::from_str(content)?;
    apply_overrides(&mut config, lookup);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply `FAIR_*` overrides. Empty values are ignored.
pub fn apply_overrides<F>(config: &mut ClientConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.is_empty()) {
        config.service.base_url = url;
    }
    if let Some(ns) = lookup(ENV_NAMESPACE).filter(|v| !v.is_empty()) {
        config.service.default_namespace = ns;
    }
}
