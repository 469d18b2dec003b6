//! Response unwrapping.
//!
//! The service wraps most results in a single named field. When that field is
//! missing or has an unexpected shape the decoded body is handed back as
//! [`Extracted::Raw`] rather than raised, so callers always see what the
//! service actually said.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{FairError, Result};

/// Field carrying the PIDs minted by an upload.
pub const MINTED_IDENTIFIERS: &str = "Minted Identifiers";
/// Field carrying the PID created by a mint.
pub const CREATED: &str = "created";
/// Field carrying search hits.
pub const MATCHES: &str = "matches";
/// Field carrying the ids of running jobs.
pub const RUNNING_JOB_IDS: &str = "runningJobIds";
/// Metadata field listing downloadable files.
pub const DISTRIBUTION: &str = "distribution";

/// Either the unwrapped field or the raw body it was expected in.
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted<T> {
    Found(T),
    Raw { field: &'static str, body: Value },
}

impl<T> Extracted<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Extracted::Found(_))
    }

    pub fn is_raw(&self) -> bool {
        !self.is_found()
    }

    /// The unwrapped value, discarding a raw fallback.
    pub fn found(self) -> Option<T> {
        match self {
            Extracted::Found(value) => Some(value),
            Extracted::Raw { .. } => None,
        }
    }

    /// Treat a raw fallback as an error.
    pub fn into_found(self) -> Result<T> {
        match self {
            Extracted::Found(value) => Ok(value),
            Extracted::Raw { field, body } => Err(FairError::MissingField { field, body }),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Extracted<U> {
        match self {
            Extracted::Found(value) => Extracted::Found(f(value)),
            Extracted::Raw { field, body } => Extracted::Raw { field, body },
        }
    }
}

/// Unwrap `body[field]` as `T`.
pub fn extract<T: DeserializeOwned>(body: Value, field: &'static str) -> Extracted<T> {
    let decoded = body
        .get(field)
        .cloned()
        .map(serde_json::from_value::<T>);

    match decoded {
        Some(Ok(value)) => Extracted::Found(value),
        Some(Err(e)) => {
            tracing::warn!(field, error = %e, "Unexpected field shape, returning raw body");
            Extracted::Raw { field, body }
        }
        None => {
            tracing::warn!(field, "Field missing from response, returning raw body");
            Extracted::Raw { field, body }
        }
    }
}

/// Unwrap the first element of the array at `body[field]`.
pub fn extract_first<T: DeserializeOwned>(body: Value, field: &'static str) -> Extracted<T> {
    let first = body
        .get(field)
        .and_then(Value::as_array)
        .and_then(|items| items.first())
        .cloned()
        .and_then(|item| serde_json::from_value::<T>(item).ok());

    match first {
        Some(value) => Extracted::Found(value),
        None => {
            tracing::warn!(field, "No first element in response field, returning raw body");
            Extracted::Raw { field, body }
        }
    }
}

/// `distribution[0].name` of a metadata record, if present and non-empty.
pub fn distribution_name(metadata: &Value) -> Option<&str> {
    metadata
        .get(DISTRIBUTION)?
        .as_array()?
        .first()?
        .get("name")?
        .as_str()
        .filter(|name| !name.is_empty())
}

/// Decode a JSON body. Empty bodies decode to `null`.
pub fn parse_json(bytes: &[u8]) -> Result<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(bytes)?)
}

/// Job id from a compute submission body.
///
/// The service answers with the bare id as text; a JSON string literal is
/// unquoted as well.
pub fn job_id(body: &str) -> String {
    let trimmed = body.trim();
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::String(id)) => id,
        _ => trimmed.to_string(),
    }
}
