//! Blocking FAIR client on `reqwest::blocking::Client`.
//!
//! Same operations and checks as [`FairClient`](super::FairClient); every
//! call blocks the current thread until the single round trip completes.
//! Must not be created or used from inside an async runtime.

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::call::{Body, Call, Upload};
use crate::api::response::{
    self, extract, extract_first, Extracted, CREATED, MATCHES, MINTED_IDENTIFIERS,
    RUNNING_JOB_IDS,
};
use crate::api::routes::Endpoint;
use crate::api::types::JobRequest;
use crate::config::ClientConfig;
use crate::error::{FairError, Result};

use super::{checked_config, distribution_target, explicit_target};

/// Blocking client for the FAIR service.
#[derive(Clone)]
pub struct BlockingFairClient {
    http: reqwest::blocking::Client,
    config: ClientConfig,
}

impl BlockingFairClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let config = checked_config(config)?;

        let mut builder = reqwest::blocking::Client::builder()
            .user_agent(config.service.user_agent.as_str())
            .timeout(config.timeouts.request());
        if let Some(connect) = config.timeouts.connect() {
            builder = builder.connect_timeout(connect);
        }
        let http = builder.build()?;

        tracing::debug!(base_url = %config.service.base_url, "Blocking FAIR client initialized");

        Ok(Self { http, config })
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::new(ClientConfig::with_base_url(base_url))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Upload a file with its metadata. Returns the first minted PID.
    pub fn upload_file<M>(
        &self,
        file_path: impl AsRef<Path>,
        metadata: &M,
    ) -> Result<Extracted<String>>
    where
        M: Serialize + ?Sized,
    {
        let file_path = file_path.as_ref();
        let is_file = fs::metadata(file_path).map(|m| m.is_file()).unwrap_or(false);
        let upload = Upload::prepare(file_path, is_file, metadata)?;

        let content = fs::read(file_path)?;
        tracing::debug!(
            file = %file_path.display(),
            bytes = content.len(),
            "Uploading file"
        );

        let form = Form::new()
            .part("files", Part::bytes(content).file_name(upload.file_name))
            .text("metadata", upload.metadata);

        let request = self.request(Endpoint::Upload)?.multipart(form);
        let bytes = self.execute(request)?.bytes()?;
        Ok(extract_first(response::parse_json(&bytes)?, MINTED_IDENTIFIERS))
    }

    pub fn search(&self, query: &str) -> Result<Extracted<Vec<Value>>> {
        let body = self.call(Call::search(query)?)?;
        Ok(extract(body, MATCHES))
    }

    pub fn mint_id<M>(&self, metadata: &M, namespace: Option<&str>) -> Result<Extracted<String>>
    where
        M: Serialize + ?Sized,
    {
        let namespace = namespace.unwrap_or(&self.config.service.default_namespace);
        let body = self.call(Call::mint(metadata, namespace)?)?;
        Ok(extract(body, CREATED))
    }

    pub fn delete_id(&self, pid: &str) -> Result<Value> {
        self.call(Call::delete_id(pid)?)
    }

    pub fn update_pid<M>(&self, pid: &str, changes: &M) -> Result<Value>
    where
        M: Serialize + ?Sized,
    {
        self.call(Call::update_pid(pid, changes)?)
    }

    pub fn retrieve_metadata(&self, pid: &str) -> Result<Value> {
        self.call(Call::retrieve_metadata(pid)?)
    }

    pub fn create_namespace<M>(&self, namespace: &str, namespace_meta: &M) -> Result<Value>
    where
        M: Serialize + ?Sized,
    {
        self.call(Call::create_namespace(namespace, namespace_meta)?)
    }

    pub fn compute(&self, job: &JobRequest) -> Result<String> {
        let call = Call::compute(job, &self.config.service.default_namespace)?;
        let text = self.send(call)?.text()?;
        let job_id = response::job_id(&text);

        tracing::info!(job_type = %job.job_type, job_id = %job_id, "Compute job submitted");
        Ok(job_id)
    }

    pub fn list_running_jobs(&self) -> Result<Extracted<Vec<String>>> {
        let body = self.call(Call::list_running_jobs())?;
        Ok(extract(body, RUNNING_JOB_IDS))
    }

    pub fn check_job_status(&self, pid: &str) -> Result<Value> {
        self.call(Call::check_job_status(pid)?)
    }

    pub fn evidence_graph(&self, pid: &str) -> Result<Value> {
        self.call(Call::evidence_graph(pid)?)
    }

    /// Download the data behind `pid`.
    ///
    /// Same target rules as [`FairClient::download_file`](super::FairClient::download_file).
    pub fn download_file(&self, pid: &str, file_name: Option<&Path>) -> Result<PathBuf> {
        let download = Call::download(pid)?;
        let target = match explicit_target(file_name) {
            Some(path) => path,
            None => {
                let metadata = self.retrieve_metadata(pid)?;
                distribution_target(&self.config.transfer.download_dir, pid, &metadata)?
            }
        };

        let content = self.send(download)?.bytes()?;
        fs::write(&target, &content)?;

        tracing::info!(
            pid,
            path = %target.display(),
            bytes = content.len(),
            "Download written"
        );
        Ok(target)
    }

    fn call(&self, call: Call<'_>) -> Result<Value> {
        let bytes = self.send(call)?.bytes()?;
        response::parse_json(&bytes)
    }

    fn send(&self, call: Call<'_>) -> Result<Response> {
        let request = self.request(call.endpoint)?;
        let request = match call.body {
            Body::Empty => request,
            Body::Json(body) => request.json(&body),
        };
        self.execute(request)
    }

    fn request(&self, endpoint: Endpoint<'_>) -> Result<RequestBuilder> {
        let method = endpoint.method();
        let url = endpoint.url(self.config.base_url())?;
        tracing::debug!(method = %method, url = %url, "Sending request");
        Ok(self.http.request(method, url))
    }

    fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let resp = request.send()?;
        let status = resp.status();
        tracing::debug!(status = status.as_u16(), "Response received");

        if !status.is_success() {
            return Err(FairError::Server {
                status: status.as_u16(),
                body: resp.text().unwrap_or_default(),
            });
        }
        Ok(resp)
    }
}

impl std::fmt::Debug for BlockingFairClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingFairClient")
            .field("base_url", &self.config.service.base_url)
            .finish()
    }
}
