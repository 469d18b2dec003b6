//! Request/response contract shared by both transports.
//!
//! # Data Flow
//! ```text
//! caller arguments
//!     → types.rs (local validation: PIDs, metadata, job descriptors)
//!     → call.rs (checked endpoint + body per operation)
//!     → routes.rs (endpoint → method + URL)
//!     → [transport: client::FairClient or client::BlockingFairClient]
//!     → response.rs (unwrap named field or fall back to raw body)
//! ```
//!
//! # Design Decisions
//! - Nothing in here performs I/O; both transports run the same checks
//! - Validation always happens before the request is built
//! - A missing response field is never an error by itself, see [`Extracted`]

pub mod call;
pub mod response;
pub mod routes;
pub mod types;

pub use call::{Body, Call, Upload};
pub use response::Extracted;
pub use routes::{Endpoint, UrlError};
pub use types::{DataId, JobRequest, JobType};
