//! Argument types and local validation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Reject empty PIDs and PIDs with `.` or `..` pieces; anything else is
/// opaque to the client.
pub fn require_pid(pid: &str) -> Result<&str, ValidationError> {
    if pid.is_empty() {
        return Err(ValidationError::EmptyPid);
    }
    if pid.split('/').any(is_dot_segment) {
        return Err(ValidationError::DotSegment {
            what: "PID",
            value: pid.to_string(),
        });
    }
    Ok(pid)
}

/// A search query travels as one path segment, so it must be neither empty
/// nor a dot segment.
pub fn require_query(query: &str) -> Result<&str, ValidationError> {
    if query.is_empty() {
        return Err(ValidationError::EmptyQuery);
    }
    if is_dot_segment(query) {
        return Err(ValidationError::DotSegment {
            what: "search query",
            value: query.to_string(),
        });
    }
    Ok(query)
}

fn is_dot_segment(piece: &str) -> bool {
    piece == "." || piece == ".."
}

pub fn require_namespace(namespace: &str) -> Result<&str, ValidationError> {
    if namespace.is_empty() {
        return Err(ValidationError::EmptyNamespace);
    }
    Ok(namespace)
}

/// Serialize `value` and require the result to be a JSON object.
///
/// `what` names the argument in the error ("metadata", "changes", ...).
pub fn json_object<T>(what: &'static str, value: &T) -> Result<Map<String, Value>, ValidationError>
where
    T: Serialize + ?Sized,
{
    let value = serde_json::to_value(value).map_err(|e| ValidationError::Unserializable {
        what,
        reason: e.to_string(),
    })?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(ValidationError::NotAMapping {
            what,
            found: json_kind(&other),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Dataset PIDs a job runs on: one PID or several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataId {
    Single(String),
    Many(Vec<String>),
}

impl From<&str> for DataId {
    fn from(pid: &str) -> Self {
        Self::Single(pid.to_string())
    }
}

impl From<String> for DataId {
    fn from(pid: String) -> Self {
        Self::Single(pid)
    }
}

impl From<Vec<String>> for DataId {
    fn from(pids: Vec<String>) -> Self {
        Self::Many(pids)
    }
}

impl From<Vec<&str>> for DataId {
    fn from(pids: Vec<&str>) -> Self {
        Self::Many(pids.into_iter().map(String::from).collect())
    }
}

/// Compute backend a job is submitted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    Spark,
    Nipype,
    /// Runs in a caller-provided container.
    Custom,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::Spark => "spark",
            JobType::Nipype => "nipype",
            JobType::Custom => "custom",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spark" => Ok(JobType::Spark),
            "nipype" => Ok(JobType::Nipype),
            "custom" => Ok(JobType::Custom),
            other => Err(ValidationError::InvalidJobType(other.to_string())),
        }
    }
}

/// A compute job to submit.
///
/// ```
/// use fair_client::{JobRequest, JobType};
///
/// let job = JobRequest::new("ark:/99999/data", "ark:/99999/script", JobType::Custom)
///     .container("ark:/99999/image");
/// assert!(job.descriptor().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    pub data_id: DataId,
    pub script_id: String,
    pub job_type: JobType,
    pub container_id: Option<String>,
    /// `None` uses the client's configured default namespace.
    pub namespace: Option<String>,
}

impl JobRequest {
    pub fn new(
        data_id: impl Into<DataId>,
        script_id: impl Into<String>,
        job_type: JobType,
    ) -> Self {
        Self {
            data_id: data_id.into(),
            script_id: script_id.into(),
            job_type,
            container_id: None,
            namespace: None,
        }
    }

    pub fn container(mut self, container_id: impl Into<String>) -> Self {
        self.container_id = Some(container_id.into());
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Build the submission body, falling back to the default namespace
    /// `"99999"` when none was set.
    pub fn descriptor(&self) -> Result<Value, ValidationError> {
        self.descriptor_in(crate::config::schema::DEFAULT_NAMESPACE)
    }

    /// Build the submission body.
    ///
    /// `containerID` is only sent for custom jobs; a custom job without a
    /// non-empty container id is rejected.
    pub fn descriptor_in(&self, default_namespace: &str) -> Result<Value, ValidationError> {
        let namespace = self.namespace.as_deref().unwrap_or(default_namespace);
        let namespace = require_namespace(namespace)?;

        let mut job = Map::new();
        job.insert(
            "datasetID".into(),
            serde_json::to_value(&self.data_id).map_err(|e| ValidationError::Unserializable {
                what: "data_id",
                reason: e.to_string(),
            })?,
        );
        job.insert("scriptID".into(), Value::String(self.script_id.clone()));
        job.insert("namespace".into(), Value::String(namespace.to_string()));

        match (self.job_type, self.container_id.as_deref()) {
            (JobType::Custom, Some(id)) if !id.is_empty() => {
                job.insert("containerID".into(), Value::String(id.to_string()));
            }
            (JobType::Custom, _) => return Err(ValidationError::MissingContainerId),
            (_, Some(id)) if !id.is_empty() => {
                tracing::debug!(
                    job_type = %self.job_type,
                    container_id = id,
                    "Ignoring container id for non-custom job"
                );
            }
            _ => {}
        }

        Ok(Value::Object(job))
    }
}
