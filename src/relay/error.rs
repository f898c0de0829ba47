//! Failure taxonomy of a single relay pass.

use axum::http::{Method, StatusCode};
use thiserror::Error;

use crate::relay::types::InvalidUrl;

/// Every way one request can end without a successful relay.
///
/// All variants are terminal for the request that produced them; nothing
/// is retried. `url` fields hold the client's `url` parameter as received,
/// except [`RelayError::UpstreamStatus`] which carries the decoded target.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("URL parameter is required")]
    MissingParameter,

    #[error("Method not allowed: {0}")]
    DisallowedMethod(Method),

    #[error("{source}")]
    InvalidUrl { url: String, source: InvalidUrl },

    #[error("Request timeout")]
    UpstreamTimeout { url: String },

    #[error("Network error: {source}")]
    UpstreamNetwork { url: String, source: reqwest::Error },

    #[error("Source returned {}", .status.as_u16())]
    UpstreamStatus {
        status: StatusCode,
        reason: String,
        url: String,
    },

    #[error("Proxy request failed: {message}")]
    Unknown { url: String, message: String },
}

impl RelayError {
    /// Classify an outbound client failure.
    pub fn from_upstream(err: reqwest::Error, url: &str) -> Self {
        let url = url.to_string();
        if err.is_timeout() {
            RelayError::UpstreamTimeout { url }
        } else if err.is_connect() {
            RelayError::UpstreamNetwork { url, source: err }
        } else {
            RelayError::Unknown {
                url,
                message: err.to_string(),
            }
        }
    }

    /// Status code sent to the client.
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MissingParameter => StatusCode::BAD_REQUEST,
            RelayError::DisallowedMethod(_) => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::InvalidUrl {
                source: InvalidUrl::Scheme(_),
                ..
            } => StatusCode::BAD_REQUEST,
            RelayError::InvalidUrl { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::UpstreamTimeout { .. } => StatusCode::REQUEST_TIMEOUT,
            RelayError::UpstreamNetwork { .. } => StatusCode::BAD_GATEWAY,
            RelayError::UpstreamStatus { status, .. } => *status,
            RelayError::Unknown { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(RelayError::MissingParameter.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            RelayError::DisallowedMethod(Method::POST).status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            RelayError::InvalidUrl {
                url: "ftp://a".into(),
                source: InvalidUrl::Scheme("ftp".into()),
            }
            .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RelayError::InvalidUrl {
                url: "%zz".into(),
                source: InvalidUrl::Decode,
            }
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            RelayError::UpstreamTimeout { url: "u".into() }.status(),
            StatusCode::REQUEST_TIMEOUT
        );
        assert_eq!(
            RelayError::UpstreamStatus {
                status: StatusCode::NOT_FOUND,
                reason: "Not Found".into(),
                url: "u".into(),
            }
            .status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn upstream_status_message_uses_numeric_code() {
        let err = RelayError::UpstreamStatus {
            status: StatusCode::SERVICE_UNAVAILABLE,
            reason: "Service Unavailable".into(),
            url: "http://a.test".into(),
        };
        assert_eq!(err.to_string(), "Source returned 503");
    }
}
