//! Errors for decoded responses that lack what the protocol promises

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProtocolError {
    #[error("response from {url} is missing {field}: {body}")]
    MissingField {
        url: String,
        field: String,
        body: String,
    },

    #[error("response from {url} has unexpected {field}: {body}")]
    UnexpectedValue {
        url: String,
        field: String,
        body: String,
    },

    #[error("build {build_id} not present in response from {url}")]
    BuildNotListed { url: String, build_id: String },

    #[error("build {build_id} is {status}, not built")]
    BuildNotReady { build_id: String, status: String },

    #[error("instance is not running: enabled={enabled}, status={status}")]
    InstanceNotRunning { enabled: bool, status: String },
}

impl UserFacingError for ProtocolError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::BuildNotReady { .. } => Some("Poll the build until it reaches `built`."),
            Self::InstanceNotRunning { .. } => {
                Some("Start the service instance before submitting jobs.")
            }
            _ => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::MissingField { .. } => "protocol.missing_field",
            Self::UnexpectedValue { .. } => "protocol.unexpected_value",
            Self::BuildNotListed { .. } => "protocol.build_not_listed",
            Self::BuildNotReady { .. } => "protocol.build_not_ready",
            Self::InstanceNotRunning { .. } => "protocol.instance_not_running",
        })
    }
}
