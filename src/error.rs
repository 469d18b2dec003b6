//! Error types for the FAIR client.
//!
//! Local argument checks surface as [`ValidationError`] before any request is
//! sent. Everything else wraps the failure that produced it.

use serde_json::Value;
use thiserror::Error;

use crate::api::routes::UrlError;
use crate::config::loader::ConfigError;

/// Argument checks performed before a request leaves the client.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Metadata (or a change set) did not serialize to a JSON object.
    #[error("{what} must be a JSON object, got {found}")]
    NotAMapping { what: &'static str, found: &'static str },

    /// Metadata could not be serialized at all.
    #[error("{what} could not be serialized: {reason}")]
    Unserializable { what: &'static str, reason: String },

    /// A PID argument was empty.
    #[error("PID must not be empty")]
    EmptyPid,

    /// A namespace argument was empty.
    #[error("namespace must not be empty")]
    EmptyNamespace,

    /// A search query was empty.
    #[error("search query must not be empty")]
    EmptyQuery,

    /// A path piece was `.` or `..`, which URL normalization would fold away.
    #[error("{what} contains a dot segment: {value:?}")]
    DotSegment { what: &'static str, value: String },

    /// Job type outside of spark, nipype, custom.
    #[error("job_type must be one of spark, nipype, custom; got {0:?}")]
    InvalidJobType(String),

    /// Custom jobs need the PID of the container to run in.
    #[error("custom jobs require a container id")]
    MissingContainerId,

    /// Upload source does not exist or is not a regular file.
    #[error("file not found: {0}")]
    FileNotFound(String),

    /// Metadata record has no usable `distribution[0].name`.
    #[error("PID {0} is missing a distribution entry")]
    MissingDistribution(String),
}

/// Unified error type for all client operations.
#[derive(Debug, Error)]
pub enum FairError {
    /// Rejected locally; no request was sent.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Transport failure (connection refused, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("server error: {status} - {body}")]
    Server { status: u16, body: String },

    /// A body that should have been JSON was not.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An expected response field was absent or malformed.
    #[error("response is missing field {field:?}: {body}")]
    MissingField { field: &'static str, body: Value },

    /// Local file read or write failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid base URL or request URL.
    #[error("invalid URL: {0}")]
    Url(#[from] UrlError),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, FairError>;
