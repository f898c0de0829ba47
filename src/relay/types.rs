//! Per-request values flowing through the forwarder.

use std::borrow::Cow;

use axum::http::{request::Parts, HeaderMap, Method};
use percent_encoding::percent_decode_str;
use thiserror::Error;
use url::Url;

/// Name of the query parameter carrying the target URL.
pub const URL_PARAM: &str = "url";

/// What the relay needs from a client request.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    /// Raw `url` query parameter, after query-string decoding only.
    pub url_param: Option<String>,
    pub headers: HeaderMap,
}

impl InboundRequest {
    pub fn from_parts(parts: &Parts) -> Self {
        Self {
            method: parts.method.clone(),
            url_param: parts.uri.query().and_then(find_url_param),
            headers: parts.headers.clone(),
        }
    }
}

/// First `url` pair of a query string. Later duplicates are ignored.
fn find_url_param(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == URL_PARAM)
        .map(|(_, value)| value.into_owned())
}

/// Why a `url` parameter could not become a forwardable target.
#[derive(Debug, Error)]
pub enum InvalidUrl {
    #[error("URI malformed")]
    Decode,

    #[error("Invalid URL: {0}")]
    Parse(#[from] url::ParseError),

    #[error("scheme `{0}` is not forwarded")]
    Scheme(String),
}

/// A validated http(s) origin URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    url: Url,
    /// The percent-decoded parameter exactly as written, before URL normalization.
    decoded: String,
}

impl Target {
    /// Percent-decode, parse and scheme-check a `url` parameter.
    pub fn resolve(raw: &str) -> Result<Self, InvalidUrl> {
        let decoded = decode_component(raw)?;
        let url = Url::parse(&decoded)?;

        match url.scheme() {
            "http" | "https" => Ok(Self {
                url,
                decoded: decoded.into_owned(),
            }),
            other => Err(InvalidUrl::Scheme(other.to_string())),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// The decoded `url` parameter, echoed in origin status errors.
    pub fn decoded(&self) -> &str {
        &self.decoded
    }
}

/// Strict percent-decoding: every `%` must start a two digit hex escape and
/// the decoded bytes must be UTF-8.
fn decode_component(raw: &str) -> Result<Cow<'_, str>, InvalidUrl> {
    for (idx, _) in raw.match_indices('%') {
        let escape = raw.get(idx + 1..idx + 3);
        if !escape.is_some_and(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit())) {
            return Err(InvalidUrl::Decode);
        }
    }

    percent_decode_str(raw)
        .decode_utf8()
        .map_err(|_| InvalidUrl::Decode)
}

/// The request the forwarder issues to the origin.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub target: Target,
    pub headers: HeaderMap,
    /// The client's `url` parameter, echoed back in error bodies.
    pub url_param: String,
}
