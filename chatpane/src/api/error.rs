//! Errors raised at the HTTP seam.

use reqwest::StatusCode;
use thiserror::Error;

/// A failed backend call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    /// The response body did not have the expected shape.
    #[error("failed to decode response from {url}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// HTTP status of the failure, when the server answered at all.
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
