//! Integration tests for config

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;
    use std::time::Duration;
    use streamsx_config::*;
    use streamsx_errors::{ConfigError, Error};
    use tempfile::NamedTempFile;

    // Mutex to ensure env var tests don't run concurrently
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_VARS: [&str; 7] = [
        "VCAP_SERVICES",
        "STREAMING_ANALYTICS_SERVICE_NAME",
        "STREAMS_REST_URL",
        "STREAMS_USERNAME",
        "STREAMS_PASSWORD",
        "STREAMSX_TIMEOUT",
        "STREAMSX_POLL_INTERVAL",
    ];

    fn clear_env() {
        for name in ENV_VARS {
            std::env::remove_var(name);
        }
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[service]
service_name = "streams-1"
endpoint = "https://override.example.com"

[network]
timeout = 60

[poll]
interval = 2
max_attempts = 10
        "#
        )
        .unwrap();

        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.service.service_name.as_deref(), Some("streams-1"));
        assert_eq!(config.network.timeout, 60);
        assert_eq!(config.network.connect_timeout, 30);
        assert_eq!(config.poll.max_attempts, 10);
        assert_eq!(config.poll_interval(), Duration::from_secs(2));
        assert_eq!(config.net_config().timeout, Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let err = Config::load_from_file(std::path::Path::new("/nonexistent/streamsx.toml"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::NotFound { .. })));
    }

    #[test]
    fn test_merge_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("STREAMING_ANALYTICS_SERVICE_NAME", "from-env");
        std::env::set_var("STREAMS_PASSWORD", "secret");
        std::env::set_var("STREAMSX_TIMEOUT", "42");

        let mut config = Config::default();
        config.merge_env().unwrap();

        assert_eq!(config.service.service_name.as_deref(), Some("from-env"));
        assert_eq!(config.service.password.as_deref(), Some("secret"));
        assert_eq!(config.network.timeout, 42);

        clear_env();
    }

    #[test]
    fn test_invalid_env_value() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("STREAMSX_POLL_INTERVAL", "soon");

        let mut config = Config::default();
        let result = config.merge_env();
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue { .. }))
        ));

        clear_env();
    }

    #[tokio::test]
    async fn test_descriptor_from_inline_vcap() {
        let config = Config {
            service: ServiceConfig {
                vcap_services: Some(
                    r#"{"streaming-analytics": [{"name": "sa", "credentials": {"userid": "u", "password": "p", "rest_url": "https://h"}}]}"#
                        .to_string(),
                ),
                service_name: Some("sa".to_string()),
                password: Some("override".to_string()),
                ..ServiceConfig::default()
            },
            ..Config::default()
        };

        let descriptor = config.service.service_descriptor().await.unwrap();
        assert_eq!(descriptor.name(), Some("sa"));
        assert_eq!(descriptor.string("password"), Some("override"));
        assert_eq!(descriptor.string("rest_url"), Some("https://h"));
    }

    #[tokio::test]
    async fn test_descriptor_from_vcap_file() {
        let mut vcap_file = NamedTempFile::new().unwrap();
        write!(
            vcap_file,
            r#"{{"streaming-analytics": [{{"name": "sa", "credentials": {{"service_id": "svc"}}}}]}}"#
        )
        .unwrap();

        let service = ServiceConfig {
            vcap_services: Some(vcap_file.path().display().to_string()),
            service_name: Some("sa".to_string()),
            endpoint: Some("https://h/resources".to_string()),
            ..ServiceConfig::default()
        };

        let descriptor = service.service_descriptor().await.unwrap();
        assert_eq!(descriptor.string("service_id"), Some("svc"));
        assert_eq!(descriptor.string("resources_url"), Some("https://h/resources"));
    }

    #[tokio::test]
    async fn test_credentials_file_wins() {
        let mut credentials = NamedTempFile::new().unwrap();
        write!(credentials, r#"{{"userid": "u", "password": "p"}}"#).unwrap();

        let service = ServiceConfig {
            credentials_file: Some(credentials.path().to_path_buf()),
            vcap_services: Some("{}".to_string()),
            ..ServiceConfig::default()
        };

        let descriptor = service.service_descriptor().await.unwrap();
        assert_eq!(descriptor.name(), None);
        assert_eq!(descriptor.string("userid"), Some("u"));
    }

    #[tokio::test]
    async fn test_vcap_requires_service_name() {
        let service = ServiceConfig {
            vcap_services: Some("{}".to_string()),
            ..ServiceConfig::default()
        };

        match service.service_descriptor().await.unwrap_err() {
            Error::Config(ConfigError::MissingField { field }) => assert_eq!(field, "service_name"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_credential_source() {
        match ServiceConfig::default().service_descriptor().await.unwrap_err() {
            Error::Config(ConfigError::MissingField { field }) => assert_eq!(field, "vcap_services"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
