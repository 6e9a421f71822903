//! Configuration error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ConfigError {
    #[error("service credentials do not identify a known protocol version")]
    UnknownProtocol,

    #[error("service descriptor is not a JSON object")]
    NotAnObject,

    #[error("config file not found: {path}")]
    NotFound { path: String },

    #[error("parse error: {message}")]
    ParseError { message: String },

    #[error("missing required field: {field}")]
    MissingField { field: String },

    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("no streaming-analytics service named {name}")]
    ServiceNotFound { name: String },
}

impl UserFacingError for ConfigError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::UnknownProtocol => Some(
                "Credentials need either `service_id` (V2) or `userid` and `password` (V1).",
            ),
            Self::NotFound { .. } => Some("Check the path passed with --config."),
            Self::MissingField { field } => Some(match field.as_str() {
                "vcap_services" => "Set VCAP_SERVICES or pass --credentials.",
                "service_name" => "Set STREAMING_ANALYTICS_SERVICE_NAME or pass --service-name.",
                _ => "Add the missing configuration field noted in the error message.",
            }),
            Self::ServiceNotFound { .. } => {
                Some("The service name must match an entry of the streaming-analytics array.")
            }
            Self::InvalidValue { .. } | Self::ParseError { .. } | Self::NotAnObject => {
                Some("Fix the configuration value and retry the command.")
            }
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::UnknownProtocol => "config.unknown_protocol",
            Self::NotAnObject => "config.not_an_object",
            Self::NotFound { .. } => "config.not_found",
            Self::ParseError { .. } => "config.parse_error",
            Self::MissingField { .. } => "config.missing_field",
            Self::InvalidValue { .. } => "config.invalid_value",
            Self::ServiceNotFound { .. } => "config.service_not_found",
        })
    }
}
