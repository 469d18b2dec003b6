//! Validated requests, ready for either transport.
//!
//! Each constructor runs the local checks of one operation and picks its
//! endpoint. A transport only has to attach the body and send it.

use serde::Serialize;
use serde_json::Value;
use std::path::Path;

use crate::api::routes::Endpoint;
use crate::api::types::{json_object, require_namespace, require_pid, require_query, JobRequest};
use crate::error::ValidationError;

/// Request body of a non-upload call.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    Json(Value),
}

/// One checked request: where it goes and what it carries.
#[derive(Debug, Clone, PartialEq)]
pub struct Call<'a> {
    pub endpoint: Endpoint<'a>,
    pub body: Body,
}

impl<'a> Call<'a> {
    fn empty(endpoint: Endpoint<'a>) -> Self {
        Self { endpoint, body: Body::Empty }
    }

    fn json(endpoint: Endpoint<'a>, body: Value) -> Self {
        Self { endpoint, body: Body::Json(body) }
    }

    pub fn search(query: &'a str) -> Result<Self, ValidationError> {
        let query = require_query(query)?;
        Ok(Self::empty(Endpoint::Search { query }))
    }

    pub fn mint<M>(metadata: &M, namespace: &'a str) -> Result<Self, ValidationError>
    where
        M: Serialize + ?Sized,
    {
        let metadata = json_object("metadata", metadata)?;
        let namespace = require_namespace(namespace)?;
        Ok(Self::json(Endpoint::Mint { namespace }, Value::Object(metadata)))
    }

    pub fn delete_id(pid: &'a str) -> Result<Self, ValidationError> {
        let pid = require_pid(pid)?;
        Ok(Self::empty(Endpoint::DeleteId { pid }))
    }

    pub fn update_pid<M>(pid: &'a str, changes: &M) -> Result<Self, ValidationError>
    where
        M: Serialize + ?Sized,
    {
        let pid = require_pid(pid)?;
        let changes = json_object("changes", changes)?;
        Ok(Self::json(Endpoint::UpdateMetadata { pid }, Value::Object(changes)))
    }

    pub fn retrieve_metadata(pid: &'a str) -> Result<Self, ValidationError> {
        let pid = require_pid(pid)?;
        Ok(Self::empty(Endpoint::RetrieveMetadata { pid }))
    }

    pub fn create_namespace<M>(namespace: &'a str, meta: &M) -> Result<Self, ValidationError>
    where
        M: Serialize + ?Sized,
    {
        let namespace = require_namespace(namespace)?;
        let meta = json_object("namespace metadata", meta)?;
        Ok(Self::json(Endpoint::CreateNamespace { namespace }, Value::Object(meta)))
    }

    /// `default_namespace` applies when the job names none.
    pub fn compute(job: &JobRequest, default_namespace: &str) -> Result<Self, ValidationError> {
        let descriptor = job.descriptor_in(default_namespace)?;
        Ok(Self::json(Endpoint::Compute { job_type: job.job_type }, descriptor))
    }

    pub fn list_running_jobs() -> Self {
        Self::empty(Endpoint::ListJobs)
    }

    pub fn check_job_status(pid: &'a str) -> Result<Self, ValidationError> {
        let pid = require_pid(pid)?;
        Ok(Self::empty(Endpoint::JobStatus { pid }))
    }

    pub fn evidence_graph(pid: &'a str) -> Result<Self, ValidationError> {
        let pid = require_pid(pid)?;
        Ok(Self::empty(Endpoint::EvidenceGraph { pid }))
    }

    pub fn download(pid: &'a str) -> Result<Self, ValidationError> {
        let pid = require_pid(pid)?;
        Ok(Self::empty(Endpoint::Download { pid }))
    }
}

/// Text parts of an upload; the file bytes are read by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    /// Name sent with the `files` part.
    pub file_name: String,
    /// Serialized `metadata` part.
    pub metadata: String,
}

impl Upload {
    /// Check metadata first, then that `path` is an existing regular file.
    pub fn prepare<M>(path: &Path, is_file: bool, metadata: &M) -> Result<Self, ValidationError>
    where
        M: Serialize + ?Sized,
    {
        let metadata = Value::Object(json_object("metadata", metadata)?).to_string();
        if !is_file {
            return Err(ValidationError::FileNotFound(path.display().to_string()));
        }
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self { file_name, metadata })
    }
}
