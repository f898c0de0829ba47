//! CORS relay library: forwards GET/HEAD requests to the origin named by a
//! `url` query parameter and streams the answer back with CORS headers.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;
pub mod security;

pub use config::RelayConfig;
pub use http::RelayServer;
pub use lifecycle::Shutdown;
pub use relay::Forwarder;
