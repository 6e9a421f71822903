//! Endpoint resolution error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResolutionError {
    #[error("service descriptor is missing {field}")]
    MissingField { field: String },

    #[error("unexpected jobs URL: {url}")]
    UnexpectedJobsUrl { url: String },

    #[error("resources response from {url} is missing {field}")]
    MissingResource { url: String, field: String },

    #[error("artifact is missing {field}")]
    MissingArtifactField { field: String },
}

impl UserFacingError for ResolutionError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::UnexpectedJobsUrl { .. } | Self::MissingResource { .. } => {
                Some("The service speaks a different protocol version than its credentials suggest.")
            }
            Self::MissingField { .. } => Some("Add the missing field to the service credentials."),
            Self::MissingArtifactField { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::MissingField { .. } => "resolution.missing_field",
            Self::UnexpectedJobsUrl { .. } => "resolution.unexpected_jobs_url",
            Self::MissingResource { .. } => "resolution.missing_resource",
            Self::MissingArtifactField { .. } => "resolution.missing_artifact_field",
        })
    }
}
