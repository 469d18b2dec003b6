//! Endpoint table of the FAIR service.
//!
//! PIDs look like `ark:/99999/abc` and the service routes on the embedded
//! slashes, so a PID is split on `/` and every piece becomes its own path
//! segment. Each segment is percent-encoded on its own: `?`, `#` and spaces
//! stay part of the PID instead of starting a query or fragment. Search
//! queries are a single segment.

use reqwest::Method;
use thiserror::Error;
use url::Url;

use crate::api::types::JobType;

/// Failure to turn an endpoint into a request URL.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("{0}")]
    Parse(#[from] url::ParseError),

    /// Base URLs like `mailto:` have no hierarchical path to append to.
    #[error("'{0}' cannot carry a path")]
    CannotBeABase(String),

    /// `.` and `..` would be folded away by URL normalization.
    #[error("dot segment {0:?} in request path")]
    DotSegment(String),
}

/// One remote operation: method plus path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    Upload,
    Download { pid: &'a str },
    Search { query: &'a str },
    Mint { namespace: &'a str },
    CreateNamespace { namespace: &'a str },
    RetrieveMetadata { pid: &'a str },
    UpdateMetadata { pid: &'a str },
    DeleteId { pid: &'a str },
    Compute { job_type: JobType },
    ListJobs,
    JobStatus { pid: &'a str },
    EvidenceGraph { pid: &'a str },
}

impl Endpoint<'_> {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::Upload
            | Endpoint::Mint { .. }
            | Endpoint::CreateNamespace { .. }
            | Endpoint::Compute { .. } => Method::POST,
            Endpoint::UpdateMetadata { .. } => Method::PUT,
            Endpoint::DeleteId { .. } => Method::DELETE,
            Endpoint::Download { .. }
            | Endpoint::Search { .. }
            | Endpoint::RetrieveMetadata { .. }
            | Endpoint::ListJobs
            | Endpoint::JobStatus { .. }
            | Endpoint::EvidenceGraph { .. } => Method::GET,
        }
    }

    /// Unencoded path segments below the service origin.
    pub fn segments(&self) -> Vec<String> {
        match self {
            // Trailing empty segment keeps the slash the service expects.
            Endpoint::Upload => fixed(&["transfer", "data", ""]),
            Endpoint::Download { pid } => with_pid(&["transfer", "data"], *pid),
            Endpoint::Search { query } => fixed(&["search", *query]),
            Endpoint::Mint { namespace } => {
                vec!["mds".into(), "shoulder".into(), format!("ark:{}", namespace)]
            }
            Endpoint::CreateNamespace { namespace } => {
                vec!["mds".into(), format!("ark:{}", namespace)]
            }
            Endpoint::RetrieveMetadata { pid }
            | Endpoint::UpdateMetadata { pid }
            | Endpoint::DeleteId { pid } => with_pid(&["mds"], *pid),
            Endpoint::Compute { job_type } => fixed(&["compute", job_type.as_str()]),
            Endpoint::ListJobs => fixed(&["compute", "job"]),
            Endpoint::JobStatus { pid } => with_pid(&["compute", "job"], *pid),
            Endpoint::EvidenceGraph { pid } => with_pid(&["evidencegraph"], *pid),
        }
    }

    /// Absolute URL under `base_url`, any path on the base kept as a prefix.
    pub fn url(&self, base_url: &str) -> Result<Url, UrlError> {
        let segments = self.segments();
        if let Some(dot) = segments.iter().find(|s| *s == "." || *s == "..") {
            return Err(UrlError::DotSegment(dot.clone()));
        }

        let mut url = Url::parse(base_url)?;
        url.path_segments_mut()
            .map_err(|_| UrlError::CannotBeABase(base_url.to_string()))?
            .pop_if_empty()
            .extend(&segments);
        Ok(url)
    }
}

fn fixed(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}

fn with_pid(parts: &[&str], pid: &str) -> Vec<String> {
    let mut segments = fixed(parts);
    segments.extend(pid.split('/').map(String::from));
    segments
}
