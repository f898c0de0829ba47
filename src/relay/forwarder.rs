//! The forwarder: one inbound request in, one relayed response out.
//!
//! ```text
//! OPTIONS ─────────────────────────────────────────▶ 200 (empty)
//! other than GET/HEAD ─────────────────────────────▶ 405
//! no `url` ────────────────────────────────────────▶ 400
//! decode/parse failure ────────────────────────────▶ 500
//! scheme not http(s) ──────────────────────────────▶ 400
//! dispatch ─┬─ timeout ────────────────────────────▶ 408
//!           ├─ connect/DNS/TLS failure ────────────▶ 502
//!           ├─ other client failure ───────────────▶ 500
//!           ├─ origin not ok ──────────────────────▶ origin status, JSON
//!           └─ origin ok ──────────────────────────▶ origin status, streamed body
//! ```

use std::time::{Duration, Instant};

use axum::{
    body::Body,
    http::{
        header::{ACCEPT, ACCEPT_LANGUAGE, USER_AGENT},
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    response::{IntoResponse, Response},
};
use futures_util::TryStreamExt;
use hyper::ext::ReasonPhrase;
use reqwest::{redirect, Client};

use crate::config::RelayConfig;
use crate::relay::error::RelayError;
use crate::relay::headers::{outbound_headers, relayed_headers};
use crate::relay::types::{InboundRequest, OutboundRequest, Target};

/// Error building the forwarder.
#[derive(Debug, thiserror::Error)]
pub enum ForwarderError {
    #[error("invalid default header `{0}`")]
    DefaultHeader(&'static str),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Issues outbound requests and relays their responses.
///
/// Holds only immutable state: the outbound client and the default request
/// headers. Cloning is cheap and clones share the client's connection reuse.
#[derive(Clone)]
pub struct Forwarder {
    client: Client,
    defaults: HeaderMap,
}

impl Forwarder {
    pub fn new(config: &RelayConfig) -> Result<Self, ForwarderError> {
        let upstream = &config.upstream;

        let mut defaults = HeaderMap::new();
        defaults.insert(
            ACCEPT,
            HeaderValue::from_str(&upstream.default_accept)
                .map_err(|_| ForwarderError::DefaultHeader("default_accept"))?,
        );
        defaults.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&upstream.default_accept_language)
                .map_err(|_| ForwarderError::DefaultHeader("default_accept_language"))?,
        );
        if let Some(agent) = &upstream.user_agent {
            defaults.insert(
                USER_AGENT,
                HeaderValue::from_str(agent)
                    .map_err(|_| ForwarderError::DefaultHeader("user_agent"))?,
            );
        }

        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .redirect(redirect::Policy::limited(upstream.max_redirects));
        if !upstream.system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;

        Ok(Self { client, defaults })
    }

    /// Run one request through the relay. Never fails: every error becomes
    /// its JSON response.
    pub async fn handle(&self, inbound: InboundRequest) -> Response {
        match self.try_handle(inbound).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(status = %err.status(), error = %err, "Relay failed");
                err.into_response()
            }
        }
    }

    async fn try_handle(&self, inbound: InboundRequest) -> Result<Response, RelayError> {
        if inbound.method == Method::OPTIONS {
            return Ok(StatusCode::OK.into_response());
        }

        let outbound = self.prepare(inbound)?;
        self.dispatch(outbound).await
    }

    /// Validate an inbound request and derive the outbound one.
    pub fn prepare(&self, inbound: InboundRequest) -> Result<OutboundRequest, RelayError> {
        if inbound.method != Method::GET && inbound.method != Method::HEAD {
            return Err(RelayError::DisallowedMethod(inbound.method));
        }

        let url_param = inbound
            .url_param
            .filter(|param| !param.is_empty())
            .ok_or(RelayError::MissingParameter)?;

        let target = match Target::resolve(&url_param) {
            Ok(target) => target,
            Err(source) => return Err(RelayError::InvalidUrl { url: url_param, source }),
        };

        Ok(OutboundRequest {
            method: inbound.method,
            target,
            headers: outbound_headers(&inbound.headers, &self.defaults),
            url_param,
        })
    }

    /// Send the outbound request and turn the origin's answer into a response.
    pub async fn dispatch(&self, outbound: OutboundRequest) -> Result<Response, RelayError> {
        let start = Instant::now();
        tracing::debug!(
            method = %outbound.method,
            origin_url = %outbound.target.as_str(),
            "Dispatching to origin"
        );

        let origin = self
            .client
            .request(outbound.method.clone(), outbound.target.url().clone())
            .headers(outbound.headers)
            .send()
            .await
            .map_err(|err| RelayError::from_upstream(err, &outbound.url_param))?;

        let status = origin.status();
        if !status.is_success() {
            return Err(RelayError::UpstreamStatus {
                status,
                reason: reason_phrase(&origin),
                url: outbound.target.decoded().to_string(),
            });
        }

        tracing::info!(
            status = %status,
            origin_url = %outbound.target.as_str(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Origin responded, streaming body"
        );

        let headers = relayed_headers(origin.headers());
        let target = outbound.target.as_str().to_string();
        let body = origin.bytes_stream().inspect_err(move |err| {
            tracing::error!(origin_url = %target, error = %err, "Origin body stream failed");
        });

        let mut response = Response::new(Body::from_stream(body));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Ok(response)
    }
}

/// Status text as sent by the origin, falling back to the canonical reason.
fn reason_phrase(origin: &reqwest::Response) -> String {
    match origin.extensions().get::<ReasonPhrase>() {
        Some(reason) => String::from_utf8_lossy(reason.as_bytes()).into_owned(),
        None => origin.status().canonical_reason().unwrap_or_default().to_string(),
    }
}
