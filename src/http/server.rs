//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the relay handler on every path
//! - Wire up middleware (tracing, request ID, security headers)
//! - Bind server to listener
//! - Hand each request to the forwarder

use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware,
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::Instrument;

use crate::config::RelayConfig;
use crate::http::request::{request_id_of, MakeRequestUuidV4, X_REQUEST_ID};
use crate::relay::{Forwarder, ForwarderError, InboundRequest};
use crate::security::security_headers_middleware;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Forwarder,
}

/// HTTP server for the relay.
pub struct RelayServer {
    router: Router,
    config: RelayConfig,
}

impl RelayServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Result<Self, ForwarderError> {
        let state = AppState {
            forwarder: Forwarder::new(&config)?,
        };

        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(relay_handler))
            .route("/", any(relay_handler))
            .with_state(state)
            .layer(middleware::from_fn(security_headers_middleware))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
    }

    /// The fully layered router, for driving the relay in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until a
    /// shutdown signal is broadcast.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            request_timeout_secs = self.config.timeouts.request_secs,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

/// Relay handler: every method, every path.
async fn relay_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let request_id = request_id_of(&request);
    let (parts, _body) = request.into_parts();
    let inbound = InboundRequest::from_parts(&parts);

    let span = tracing::info_span!("relay", request_id = %request_id, method = %parts.method);
    async move {
        tracing::debug!(url_param = ?inbound.url_param, "Relaying request");
        let response = state.forwarder.handle(inbound).await;
        tracing::debug!(
            status = %response.status(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Response headers ready"
        );
        response
    }
    .instrument(span)
    .await
}
