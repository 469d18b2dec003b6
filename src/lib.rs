//! Client library for the FAIR data-management and compute service.
//!
//! Wraps the service's REST endpoints: file transfer, the persistent
//! identifier (PID) metadata store, compute-job submission and evidence-graph
//! retrieval. Every operation validates its arguments locally, fires a single
//! request and unwraps the interesting field of the JSON answer.
//!
//! ```no_run
//! use fair_client::{BlockingFairClient, ClientConfig, Extracted};
//! use serde_json::json;
//!
//! # fn main() -> fair_client::Result<()> {
//! let client = BlockingFairClient::new(ClientConfig::default())?;
//! match client.mint_id(&json!({"name": "scan-01"}), None)? {
//!     Extracted::Found(pid) => println!("minted {}", pid),
//!     Extracted::Raw { body, .. } => eprintln!("unexpected answer: {}", body),
//! }
//! # Ok(())
//! # }
//! ```

// Request/response contract
pub mod api;
pub mod client;
pub mod error;

// Cross-cutting concerns
pub mod config;
pub mod observability;

pub use api::{DataId, Endpoint, Extracted, JobRequest, JobType};
pub use client::{BlockingFairClient, FairClient};
pub use config::ClientConfig;
pub use error::{FairError, Result, ValidationError};
