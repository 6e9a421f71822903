//! Service selection and credential overrides

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use streamsx_errors::{ConfigError, Error};
use streamsx_types::{classify, ProtocolVersion, ServiceDescriptor};
use tokio::fs;
use tracing::debug;

const STREAMING_ANALYTICS: &str = "streaming-analytics";

/// Which service instance to talk to and how to authenticate
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServiceConfig {
    /// VCAP services document, inline JSON or a path to a JSON file
    pub vcap_services: Option<String>,
    /// Entry of the `streaming-analytics` array to use
    pub service_name: Option<String>,
    /// Bare credentials file; takes precedence over `vcap_services`
    pub credentials_file: Option<PathBuf>,
    /// Replaces `rest_url` (V1) or `resources_url` (V2)
    pub endpoint: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ServiceConfig {
    pub(crate) fn merge_env(&mut self) {
        let vars = [
            ("VCAP_SERVICES", &mut self.vcap_services),
            ("STREAMING_ANALYTICS_SERVICE_NAME", &mut self.service_name),
            ("STREAMS_REST_URL", &mut self.endpoint),
            ("STREAMS_USERNAME", &mut self.username),
            ("STREAMS_PASSWORD", &mut self.password),
        ];
        for (name, slot) in vars {
            if let Ok(value) = std::env::var(name) {
                *slot = Some(value);
            }
        }
    }

    /// Produce the descriptor of the configured service, overrides applied
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if no credential source is configured, a source
    /// cannot be read or parsed, or the named service is not listed.
    pub async fn service_descriptor(&self) -> Result<ServiceDescriptor, Error> {
        let mut descriptor = if let Some(path) = &self.credentials_file {
            debug!(path = %path.display(), "reading service credentials");
            ServiceDescriptor::from_json_str(&read_source(path).await?)?
        } else if let Some(vcap) = &self.vcap_services {
            let name = self
                .service_name
                .as_deref()
                .ok_or_else(|| ConfigError::MissingField {
                    field: "service_name".to_string(),
                })?;
            let services = vcap_document(vcap).await?;
            select_service(services, name)?
        } else {
            return Err(ConfigError::MissingField {
                field: "vcap_services".to_string(),
            }
            .into());
        };

        self.apply_overrides(&mut descriptor);
        Ok(descriptor)
    }

    fn apply_overrides(&self, descriptor: &mut ServiceDescriptor) {
        if let Some(username) = &self.username {
            descriptor.set("userid", username.as_str());
        }
        if let Some(password) = &self.password {
            descriptor.set("password", password.as_str());
        }
        // Credential overrides above decide which endpoint field applies
        if let Some(endpoint) = &self.endpoint {
            let field = match classify(descriptor) {
                ProtocolVersion::V2 => "resources_url",
                ProtocolVersion::V1 | ProtocolVersion::Unknown => "rest_url",
            };
            debug!(field, endpoint = %endpoint, "overriding service endpoint");
            descriptor.set(field, endpoint.as_str());
        }
    }
}

async fn read_source(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path).await.map_err(|_| {
        ConfigError::NotFound {
            path: path.display().to_string(),
        }
        .into()
    })
}

async fn vcap_document(vcap: &str) -> Result<Value, Error> {
    let text = if vcap.trim_start().starts_with('{') {
        vcap.to_string()
    } else {
        read_source(Path::new(vcap)).await?
    };

    serde_json::from_str(&text).map_err(|e| {
        ConfigError::ParseError {
            message: format!("VCAP services: {e}"),
        }
        .into()
    })
}

/// Pick the named entry of the `streaming-analytics` array
///
/// # Errors
///
/// Returns `ConfigError::ServiceNotFound` if no entry has the name.
pub(crate) fn select_service(services: Value, name: &str) -> Result<ServiceDescriptor, Error> {
    let Value::Object(mut services) = services else {
        return Err(ConfigError::NotAnObject.into());
    };

    let entries = match services.remove(STREAMING_ANALYTICS) {
        Some(Value::Array(entries)) => entries,
        _ => Vec::new(),
    };

    let entry = entries
        .into_iter()
        .find(|entry| entry.get("name").and_then(Value::as_str) == Some(name))
        .ok_or_else(|| ConfigError::ServiceNotFound {
            name: name.to_string(),
        })?;

    ServiceDescriptor::from_value(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use streamsx_types::JsonObject;

    fn vcap() -> Value {
        json!({
            "streaming-analytics": [
                {"name": "first", "credentials": {"userid": "u1", "password": "p1"}},
                {"name": "second", "credentials": {"service_id": "svc", "resources_url": "https://h/r"}}
            ]
        })
    }

    #[test]
    fn test_select_by_name() {
        let descriptor = select_service(vcap(), "second").unwrap();
        assert_eq!(descriptor.name(), Some("second"));
        assert_eq!(classify(&descriptor), ProtocolVersion::V2);
    }

    #[test]
    fn test_unknown_name() {
        let err = select_service(vcap(), "third").unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::ServiceNotFound { .. })
        ));
    }

    #[test]
    fn test_missing_array_is_not_found() {
        let err = select_service(json!({"cloudantNoSQLDB": []}), "first").unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::ServiceNotFound { .. })
        ));
    }

    #[test]
    fn test_endpoint_override_follows_version() {
        let config = ServiceConfig {
            endpoint: Some("https://override".into()),
            username: Some("admin".into()),
            ..ServiceConfig::default()
        };

        let mut v1 = select_service(vcap(), "first").unwrap();
        config.apply_overrides(&mut v1);
        assert_eq!(v1.string("rest_url"), Some("https://override"));
        assert_eq!(v1.string("userid"), Some("admin"));

        let mut v2 = select_service(vcap(), "second").unwrap();
        config.apply_overrides(&mut v2);
        assert_eq!(v2.string("resources_url"), Some("https://override"));
    }

    #[test]
    fn test_override_credentials_select_rest_url() {
        let config = ServiceConfig {
            endpoint: Some("https://override".into()),
            username: Some("u".into()),
            password: Some("p".into()),
            ..ServiceConfig::default()
        };

        let mut bare = ServiceDescriptor::from_credentials(JsonObject::new());
        config.apply_overrides(&mut bare);
        assert_eq!(classify(&bare), ProtocolVersion::V1);
        assert_eq!(bare.string("rest_url"), Some("https://override"));
    }
}
