//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Any response leaving the relay:
//!     → headers.rs (CORS allow/expose set, nosniff, frame denial, no referrer)
//!     → Send to client
//! ```
//!
//! Request-side header filtering lives with the forwarder (`relay::headers`).

pub mod headers;

pub use headers::{apply_security_headers, security_headers_middleware, SECURITY_HEADERS};
