//! Authentication error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AuthError {
    #[error("missing credential field: {field}")]
    MissingCredential { field: String },

    #[error("token refresh against {url} failed: {message}")]
    RefreshFailed { url: String, message: String },

    #[error("token response from {url} is missing {field}")]
    MalformedToken { url: String, field: String },
}

impl UserFacingError for AuthError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingCredential { .. } => {
                Some("Add the missing field to the service credentials.")
            }
            Self::RefreshFailed { .. } | Self::MalformedToken { .. } => {
                Some("Check the API key and token endpoint in the service credentials.")
            }
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::RefreshFailed { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::MissingCredential { .. } => "auth.missing_credential",
            Self::RefreshFailed { .. } => "auth.refresh_failed",
            Self::MalformedToken { .. } => "auth.malformed_token",
        })
    }
}
