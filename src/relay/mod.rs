//! Relay subsystem.
//!
//! # Data Flow
//! ```text
//! InboundRequest (types.rs)
//!     → forwarder.rs (method gate, `url` presence)
//!     → types.rs (percent-decode, parse, scheme gate → Target)
//!     → headers.rs (request allow-list + defaults)
//!     → outbound client (timeout, redirects)
//!     → headers.rs (response allow-list)
//!     → streamed body back to the client
//!
//! Failures at any step:
//!     → error.rs (RelayError) → JSON body (http/response.rs)
//! ```
//!
//! # Design Decisions
//! - No state survives a request; the forwarder holds only immutable config
//! - The origin body is piped chunk by chunk, never buffered
//! - No retries: every failure is terminal for its request

pub mod error;
pub mod forwarder;
pub mod headers;
pub mod types;

pub use error::RelayError;
pub use forwarder::{Forwarder, ForwarderError};
pub use types::{InboundRequest, InvalidUrl, OutboundRequest, Target};
