//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Forwarder and server produce:
//!     → tracing events (structured fields: request_id, status, origin_url)
//!     → logging.rs subscriber (pretty or JSON on stdout)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every event of a request via a span
//! - `RUST_LOG` overrides the configured level

pub mod logging;

pub use logging::init_tracing;
