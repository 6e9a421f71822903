//! Service descriptors and protocol classification
//!
//! A descriptor is the credentials document handed out for a Streaming
//! Analytics service instance. Which fields it carries decides the protocol
//! generation, and the generation in turn fixes both the authentication scheme
//! and the endpoint derivation rules.

use std::fmt;

use serde_json::Value;
use streamsx_errors::{ConfigError, Error};

use crate::json::JsonObject;

const SERVICE_ID: &str = "service_id";
const USER_ID: &str = "userid";
const PASSWORD: &str = "password";

/// Service credentials as supplied by the caller.
///
/// Accepts either a full service entry (`{"name": .., "credentials": {..}}`)
/// or the bare credentials object.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDescriptor {
    name: Option<String>,
    credentials: JsonObject,
}

impl ServiceDescriptor {
    /// Wrap a bare credentials object
    #[must_use]
    pub fn from_credentials(credentials: JsonObject) -> Self {
        Self {
            name: None,
            credentials,
        }
    }

    /// Build a descriptor from a decoded JSON document
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotAnObject` if the document (or its
    /// `credentials` member) is not a JSON object.
    pub fn from_value(value: Value) -> Result<Self, Error> {
        let Value::Object(mut entry) = value else {
            return Err(ConfigError::NotAnObject.into());
        };

        match entry.remove("credentials") {
            Some(Value::Object(credentials)) => Ok(Self {
                name: entry.get("name").and_then(Value::as_str).map(str::to_string),
                credentials,
            }),
            Some(_) => Err(ConfigError::NotAnObject.into()),
            None => Ok(Self::from_credentials(entry)),
        }
    }

    /// Parse a descriptor from JSON text
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` for malformed JSON and
    /// `ConfigError::NotAnObject` for a non-object document.
    pub fn from_json_str(text: &str) -> Result<Self, Error> {
        let value: Value = serde_json::from_str(text).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        Self::from_value(value)
    }

    /// Service name, when the descriptor was a full service entry
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn credentials(&self) -> &JsonObject {
        &self.credentials
    }

    /// Whether the credentials carry a non-null member
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.credentials.get(field).is_some_and(|v| !v.is_null())
    }

    /// String member of the credentials
    #[must_use]
    pub fn string(&self, field: &str) -> Option<&str> {
        self.credentials.get(field).and_then(Value::as_str)
    }

    /// Replace a credentials member, used by configuration overrides
    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.credentials
            .insert(field.to_string(), Value::String(value.into()));
    }

    fn required(&self, field: &str) -> Result<String, Error> {
        match self.credentials.get(field) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Err(ConfigError::InvalidValue {
                field: field.to_string(),
                value: other.to_string(),
            }
            .into()),
            None => Err(ConfigError::MissingField {
                field: field.to_string(),
            }
            .into()),
        }
    }

    fn optional(&self, field: &str) -> Option<String> {
        self.string(field).map(str::to_string)
    }
}

/// Backend protocol generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolVersion {
    /// Basic credentials, endpoint paths fixed in the credentials
    V1,
    /// Bearer tokens, endpoints discovered from a resources URL
    V2,
    Unknown,
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1 => write!(f, "v1"),
            Self::V2 => write!(f, "v2"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Decide the protocol generation from the credential fields present.
///
/// A `service_id` wins over user credentials; anything else is `Unknown`.
#[must_use]
pub fn classify(descriptor: &ServiceDescriptor) -> ProtocolVersion {
    if descriptor.has(SERVICE_ID) {
        ProtocolVersion::V2
    } else if descriptor.has(USER_ID) && descriptor.has(PASSWORD) {
        ProtocolVersion::V1
    } else {
        ProtocolVersion::Unknown
    }
}

/// Credentials of a V1 service.
///
/// Endpoint fields stay optional here; the resolver reports them missing when
/// it actually needs them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct V1Config {
    pub userid: String,
    pub password: String,
    pub rest_url: Option<String>,
    pub status_path: Option<String>,
    pub jobs_path: Option<String>,
}

/// Credentials of a V2 service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct V2Config {
    pub service_id: String,
    pub resources_url: Option<String>,
    pub iam_url: Option<String>,
    pub api_key: Option<String>,
}

/// Protocol-specific view of a descriptor, selected once by [`classify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolConfig {
    V1(V1Config),
    V2(V2Config),
}

impl ProtocolConfig {
    /// Classify a descriptor and extract the fields its protocol uses
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownProtocol` when the descriptor matches
    /// neither generation, and `ConfigError::InvalidValue` when a classifying
    /// field is not a string.
    pub fn from_descriptor(descriptor: &ServiceDescriptor) -> Result<Self, Error> {
        match classify(descriptor) {
            ProtocolVersion::V1 => Ok(Self::V1(V1Config {
                userid: descriptor.required(USER_ID)?,
                password: descriptor.required(PASSWORD)?,
                rest_url: descriptor.optional("rest_url"),
                status_path: descriptor.optional("status_path"),
                jobs_path: descriptor.optional("jobs_path"),
            })),
            ProtocolVersion::V2 => Ok(Self::V2(V2Config {
                service_id: descriptor.required(SERVICE_ID)?,
                resources_url: descriptor.optional("resources_url"),
                iam_url: descriptor.optional("iam_url"),
                api_key: descriptor
                    .optional("apikey")
                    .or_else(|| descriptor.optional("apiKey")),
            })),
            ProtocolVersion::Unknown => Err(ConfigError::UnknownProtocol.into()),
        }
    }

    #[must_use]
    pub fn version(&self) -> ProtocolVersion {
        match self {
            Self::V1(_) => ProtocolVersion::V1,
            Self::V2(_) => ProtocolVersion::V2,
        }
    }

    /// Member of a job-submission response that names the new job
    #[must_use]
    pub fn job_id_field(&self) -> &'static str {
        match self {
            Self::V1(_) => "jobId",
            Self::V2(_) => "id",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor(value: Value) -> ServiceDescriptor {
        ServiceDescriptor::from_value(value).unwrap()
    }

    #[test]
    fn test_service_id_classifies_v2() {
        let d = descriptor(json!({"service_id": "abc", "userid": "u", "password": "p"}));
        assert_eq!(classify(&d), ProtocolVersion::V2);
    }

    #[test]
    fn test_user_and_password_classify_v1() {
        let d = descriptor(json!({"userid": "u", "password": "p", "rest_url": "https://h"}));
        assert_eq!(classify(&d), ProtocolVersion::V1);
    }

    #[test]
    fn test_partial_credentials_are_unknown() {
        assert_eq!(
            classify(&descriptor(json!({"userid": "u"}))),
            ProtocolVersion::Unknown
        );
        assert_eq!(
            classify(&descriptor(json!({"password": "p"}))),
            ProtocolVersion::Unknown
        );
        assert_eq!(classify(&descriptor(json!({}))), ProtocolVersion::Unknown);
        assert_eq!(
            classify(&descriptor(json!({"service_id": null}))),
            ProtocolVersion::Unknown
        );
    }

    #[test]
    fn test_unknown_is_configuration_error() {
        let d = descriptor(json!({"rest_url": "https://h"}));
        let err = ProtocolConfig::from_descriptor(&d).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::UnknownProtocol)
        ));
    }

    #[test]
    fn test_service_entry_unwraps_credentials() {
        let d = descriptor(json!({
            "name": "streams-1",
            "credentials": {"service_id": "abc", "resources_url": "https://h/r"}
        }));
        assert_eq!(d.name(), Some("streams-1"));
        assert_eq!(d.string("resources_url"), Some("https://h/r"));
        assert_eq!(classify(&d), ProtocolVersion::V2);
    }

    #[test]
    fn test_v2_accepts_legacy_api_key_spelling() {
        let d = descriptor(json!({"service_id": "abc", "apiKey": "k"}));
        match ProtocolConfig::from_descriptor(&d).unwrap() {
            ProtocolConfig::V2(cfg) => assert_eq!(cfg.api_key.as_deref(), Some("k")),
            other @ ProtocolConfig::V1(_) => panic!("unexpected config: {other:?}"),
        }
    }

    #[test]
    fn test_non_string_password_is_invalid() {
        let d = descriptor(json!({"userid": "u", "password": 12}));
        let err = ProtocolConfig::from_descriptor(&d).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_job_id_field_per_generation() {
        let v1 = descriptor(json!({"userid": "u", "password": "p"}));
        let v2 = descriptor(json!({"service_id": "abc"}));
        assert_eq!(
            ProtocolConfig::from_descriptor(&v1).unwrap().job_id_field(),
            "jobId"
        );
        assert_eq!(
            ProtocolConfig::from_descriptor(&v2).unwrap().job_id_field(),
            "id"
        );
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(ServiceDescriptor::from_value(json!([1, 2])).is_err());
        assert!(ServiceDescriptor::from_json_str("not json").is_err());
    }
}
