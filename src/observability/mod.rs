//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Client operations produce:
//!     → tracing events (request dispatch, status, raw-body fallbacks, file writes)
//!
//! Consumers:
//!     → logging.rs subscriber (stderr), installed by binaries
//!     → or whatever subscriber the embedding application installs
//! ```
//!
//! # Design Decisions
//! - The library only emits events; it never installs a subscriber itself
//! - `RUST_LOG` takes precedence over the configured level

pub mod logging;

pub use logging::init_logging;
