//! Transport-level error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HttpError {
    /// The server answered, but not with a decodable success.
    #[error("HTTP {status}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    #[error("connection timeout to {url}")]
    Timeout { url: String },

    #[error("connection refused: {0}")]
    ConnectionRefused(String),

    #[error("request to {url} failed: {message}")]
    RequestFailed { url: String, message: String },

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl HttpError {
    /// Body of the failed response, when the server sent one
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}

impl UserFacingError for HttpError {
    fn user_message(&self) -> Cow<'_, str> {
        match self {
            Self::Status { body, .. } => Cow::Borrowed(body.as_str()),
            _ => Cow::Owned(self.to_string()),
        }
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::Status { status: 401 | 403, .. } => {
                Some("The service rejected the credentials; check user id, password or API key.")
            }
            Self::Timeout { .. } | Self::ConnectionRefused(_) => {
                Some("Check network connectivity to the service and retry.")
            }
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status >= 500,
            Self::Timeout { .. } | Self::ConnectionRefused(_) => true,
            Self::RequestFailed { .. } | Self::InvalidUrl(_) => false,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::Status { status: 404, .. } => "http.not_found",
            Self::Status { .. } => "http.status",
            Self::Timeout { .. } => "http.timeout",
            Self::ConnectionRefused(_) => "http.connection_refused",
            Self::RequestFailed { .. } => "http.request_failed",
            Self::InvalidUrl(_) => "http.invalid_url",
        })
    }
}
