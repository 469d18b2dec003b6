//! Async FAIR client on `reqwest::Client`.

use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
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

/// Async client for the FAIR data-management and compute service.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct FairClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl FairClient {
    /// Create a client from a validated configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let config = checked_config(config)?;

        let mut builder =
            reqwest::Client::builder().user_agent(config.service.user_agent.as_str());
        if let Some(connect) = config.timeouts.connect() {
            builder = builder.connect_timeout(connect);
        }
        if let Some(request) = config.timeouts.request() {
            builder = builder.timeout(request);
        }
        let http = builder.build()?;

        tracing::debug!(base_url = %config.service.base_url, "FAIR client initialized");

        Ok(Self { http, config })
    }

    /// Client with default settings against `base_url`.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::new(ClientConfig::with_base_url(base_url))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Upload a file with its metadata through the transfer service.
    ///
    /// Returns the first minted PID, or the raw body if none came back.
    pub async fn upload_file<M>(
        &self,
        file_path: impl AsRef<Path>,
        metadata: &M,
    ) -> Result<Extracted<String>>
    where
        M: Serialize + ?Sized,
    {
        let file_path = file_path.as_ref();
        let is_file = tokio::fs::metadata(file_path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        let upload = Upload::prepare(file_path, is_file, metadata)?;

        let content = tokio::fs::read(file_path).await?;
        tracing::debug!(
            file = %file_path.display(),
            bytes = content.len(),
            "Uploading file"
        );

        let form = Form::new()
            .part("files", Part::bytes(content).file_name(upload.file_name))
            .text("metadata", upload.metadata);

        let request = self.request(Endpoint::Upload)?.multipart(form);
        let bytes = self.execute(request).await?.bytes().await?;
        Ok(extract_first(response::parse_json(&bytes)?, MINTED_IDENTIFIERS))
    }

    /// Full-text search over registered metadata.
    pub async fn search(&self, query: &str) -> Result<Extracted<Vec<Value>>> {
        let body = self.call(Call::search(query)?).await?;
        Ok(extract(body, MATCHES))
    }

    /// Mint a PID for `metadata` under `namespace` (default from config).
    pub async fn mint_id<M>(
        &self,
        metadata: &M,
        namespace: Option<&str>,
    ) -> Result<Extracted<String>>
    where
        M: Serialize + ?Sized,
    {
        let namespace = namespace.unwrap_or(&self.config.service.default_namespace);
        let body = self.call(Call::mint(metadata, namespace)?).await?;
        Ok(extract(body, CREATED))
    }

    pub async fn delete_id(&self, pid: &str) -> Result<Value> {
        self.call(Call::delete_id(pid)?).await
    }

    /// Apply `changes` to the metadata record of `pid`.
    pub async fn update_pid<M>(&self, pid: &str, changes: &M) -> Result<Value>
    where
        M: Serialize + ?Sized,
    {
        self.call(Call::update_pid(pid, changes)?).await
    }

    pub async fn retrieve_metadata(&self, pid: &str) -> Result<Value> {
        self.call(Call::retrieve_metadata(pid)?).await
    }

    /// Register a new namespace root described by `namespace_meta`.
    pub async fn create_namespace<M>(&self, namespace: &str, namespace_meta: &M) -> Result<Value>
    where
        M: Serialize + ?Sized,
    {
        self.call(Call::create_namespace(namespace, namespace_meta)?).await
    }

    /// Submit a compute job. Returns the job id.
    pub async fn compute(&self, job: &JobRequest) -> Result<String> {
        let call = Call::compute(job, &self.config.service.default_namespace)?;
        let text = self.send(call).await?.text().await?;
        let job_id = response::job_id(&text);

        tracing::info!(job_type = %job.job_type, job_id = %job_id, "Compute job submitted");
        Ok(job_id)
    }

    pub async fn list_running_jobs(&self) -> Result<Extracted<Vec<String>>> {
        let body = self.call(Call::list_running_jobs()).await?;
        Ok(extract(body, RUNNING_JOB_IDS))
    }

    pub async fn check_job_status(&self, pid: &str) -> Result<Value> {
        self.call(Call::check_job_status(pid)?).await
    }

    pub async fn evidence_graph(&self, pid: &str) -> Result<Value> {
        self.call(Call::evidence_graph(pid)?).await
    }

    /// Download the data behind `pid`.
    ///
    /// Without a `file_name` the target is `distribution[0].name` from the
    /// PID's metadata, placed in the configured download directory. Existing
    /// files are overwritten. Returns the path written.
    pub async fn download_file(&self, pid: &str, file_name: Option<&Path>) -> Result<PathBuf> {
        let download = Call::download(pid)?;
        let target = match explicit_target(file_name) {
            Some(path) => path,
            None => {
                let metadata = self.retrieve_metadata(pid).await?;
                distribution_target(&self.config.transfer.download_dir, pid, &metadata)?
            }
        };

        let content = self.send(download).await?.bytes().await?;
        tokio::fs::write(&target, &content).await?;

        tracing::info!(
            pid,
            path = %target.display(),
            bytes = content.len(),
            "Download written"
        );
        Ok(target)
    }

    async fn call(&self, call: Call<'_>) -> Result<Value> {
        let bytes = self.send(call).await?.bytes().await?;
        response::parse_json(&bytes)
    }

    async fn send(&self, call: Call<'_>) -> Result<Response> {
        let request = self.request(call.endpoint)?;
        let request = match call.body {
            Body::Empty => request,
            Body::Json(body) => request.json(&body),
        };
        self.execute(request).await
    }

    fn request(&self, endpoint: Endpoint<'_>) -> Result<RequestBuilder> {
        let method = endpoint.method();
        let url = endpoint.url(self.config.base_url())?;
        tracing::debug!(method = %method, url = %url, "Sending request");
        Ok(self.http.request(method, url))
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let resp = request.send().await?;
        let status = resp.status();
        tracing::debug!(status = status.as_u16(), "Response received");

        if !status.is_success() {
            return Err(FairError::Server {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }
        Ok(resp)
    }
}

impl std::fmt::Debug for FairClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FairClient")
            .field("base_url", &self.config.service.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use serde_json::json;

    // Port 9 (discard) on loopback; any request sent here fails fast, so an
    // Ok or a Validation error proves the call never reached the network.
    fn unreachable_client() -> FairClient {
        FairClient::with_base_url("http://127.0.0.1:9").unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let err = FairClient::with_base_url("nowhere").unwrap_err();
        assert!(matches!(err, FairError::Config(_)));
    }

    #[tokio::test]
    async fn test_validation_happens_before_io() {
        let client = unreachable_client();

        let err = client.mint_id(&json!(["not", "a", "map"]), None).await.unwrap_err();
        assert!(matches!(err, FairError::Validation(ValidationError::NotAMapping { .. })));

        let err = client.retrieve_metadata("").await.unwrap_err();
        assert!(matches!(err, FairError::Validation(ValidationError::EmptyPid)));

        let err = client.search("").await.unwrap_err();
        assert!(matches!(err, FairError::Validation(ValidationError::EmptyQuery)));

        let err = client.search("..").await.unwrap_err();
        assert!(matches!(err, FairError::Validation(ValidationError::DotSegment { .. })));

        let err = client.delete_id("ark:/99999/../x").await.unwrap_err();
        assert!(matches!(err, FairError::Validation(ValidationError::DotSegment { .. })));

        let err = client
            .upload_file("/no/such/file.bin", &json!({"title": "x"}))
            .await
            .unwrap_err();
        assert!(matches!(err, FairError::Validation(ValidationError::FileNotFound(_))));
    }

    #[test]
    fn test_debug_hides_transport() {
        let client = unreachable_client();
        assert_eq!(
            format!("{:?}", client),
            "FairClient { base_url: \"http://127.0.0.1:9\" }"
        );
    }
}
