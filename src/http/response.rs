//! Response handling and transformation.
//!
//! # Responsibilities
//! - Map relay failures to status codes and JSON error bodies
//! - Echo the client's `url` parameter for diagnostics
//!
//! # Design Decisions
//! - Error bodies always carry `error`; `details` and `url` only where known
//! - Security and CORS headers are added by middleware, not here

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::relay::{InvalidUrl, RelayError};

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ErrorBody {
    fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            url: None,
        }
    }

    fn detailed(error: impl Into<String>, details: impl Into<String>, url: &str) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
            url: Some(url.to_string()),
        }
    }
}

impl From<&RelayError> for ErrorBody {
    fn from(err: &RelayError) -> Self {
        match err {
            RelayError::MissingParameter => ErrorBody::message("URL parameter is required"),
            RelayError::DisallowedMethod(_) => ErrorBody::message("Method not allowed"),
            RelayError::InvalidUrl {
                source: InvalidUrl::Scheme(_),
                ..
            } => ErrorBody::message("Invalid protocol. Only HTTP/HTTPS allowed."),
            RelayError::InvalidUrl { url, source } => {
                ErrorBody::detailed("Proxy request failed", source.to_string(), url)
            }
            RelayError::UpstreamTimeout { url } => {
                ErrorBody::detailed("Request timeout", "The request took too long to complete", url)
            }
            RelayError::UpstreamNetwork { url, .. } => {
                ErrorBody::detailed("Network error", "Unable to connect to the source", url)
            }
            RelayError::UpstreamStatus {
                status,
                reason,
                url,
            } => ErrorBody::detailed(
                format!("Source returned {}", status.as_u16()),
                reason.as_str(),
                url,
            ),
            RelayError::Unknown { url, message } => {
                ErrorBody::detailed("Proxy request failed", message.as_str(), url)
            }
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status: StatusCode = self.status();
        (status, Json(ErrorBody::from(&self))).into_response()
    }
}
