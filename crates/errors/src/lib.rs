#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for the streamsx client
//!
//! Errors are grouped by the component that raises them. Every variant carries
//! enough context (URL, status, raw body) to diagnose a failure without
//! re-running the call. Nothing in this workspace retries on its own; the
//! `is_retryable` hint exists for callers that layer their own policy.

use std::borrow::Cow;

use thiserror::Error;

pub mod auth;
pub mod config;
pub mod http;
pub mod protocol;
pub mod resolution;

pub use auth::AuthError;
pub use config::ConfigError;
pub use http::HttpError;
pub use protocol::ProtocolError;
pub use resolution::ResolutionError;

/// Generic error type for cross-crate boundaries
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("endpoint resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    #[error("http error: {0}")]
    Http(#[from] HttpError),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("I/O error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },
}

impl Error {
    /// Create an internal error with a message
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Create an Io error with an associated path
    pub fn io_with_path(err: &std::io::Error, path: impl AsRef<std::path::Path>) -> Self {
        Self::Io {
            message: err.to_string(),
            path: Some(path.as_ref().display().to_string()),
        }
    }

    /// HTTP status carried by this error, if the failure reached the server
    #[must_use]
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Error::Http(HttpError::Status { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            path: None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON error: {err}"))
    }
}

/// Result type alias for streamsx operations
pub type Result<T> = std::result::Result<T, Error>;

/// Minimal interface for rendering user-facing error information.
pub trait UserFacingError {
    /// Short message suitable for CLI output.
    fn user_message(&self) -> Cow<'_, str>;

    /// Optional remediation hint.
    fn user_hint(&self) -> Option<&'static str> {
        None
    }

    /// Whether retrying the same operation is likely to succeed.
    fn is_retryable(&self) -> bool {
        false
    }

    /// Stable error code for structured reporting.
    fn user_code(&self) -> Option<&'static str> {
        None
    }
}

impl UserFacingError for Error {
    fn user_message(&self) -> Cow<'_, str> {
        match self {
            Error::Http(err) => err.user_message(),
            Error::Io { message, .. } => Cow::Owned(message.clone()),
            _ => Cow::Owned(self.to_string()),
        }
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Error::Config(err) => err.user_hint(),
            Error::Auth(err) => err.user_hint(),
            Error::Resolution(err) => err.user_hint(),
            Error::Http(err) => err.user_hint(),
            Error::Protocol(err) => err.user_hint(),
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Error::Auth(err) => err.is_retryable(),
            Error::Http(err) => err.is_retryable(),
            _ => false,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            Error::Config(err) => err.user_code(),
            Error::Auth(err) => err.user_code(),
            Error::Resolution(err) => err.user_code(),
            Error::Http(err) => err.user_code(),
            Error::Protocol(err) => err.user_code(),
            Error::Internal(_) => Some("error.internal"),
            Error::Io { .. } => Some("error.io"),
        }
    }
}
