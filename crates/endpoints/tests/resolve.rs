//! Endpoint resolution against a mocked resources URL

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use httpmock::prelude::*;
    use serde_json::json;
    use streamsx_auth::Authenticator;
    use streamsx_endpoints::*;
    use streamsx_errors::{Error, HttpError, ResolutionError};
    use streamsx_net::NetClient;
    use streamsx_types::{ProtocolConfig, V1Config, V2Config};

    fn v2_resolver(server: &MockServer) -> EndpointResolver {
        let config = ProtocolConfig::V2(V2Config {
            service_id: "svc".into(),
            resources_url: Some(server.url("/v2/resources")),
            iam_url: None,
            api_key: None,
        });
        EndpointResolver::new(
            config,
            Arc::new(Authenticator::basic("u", "p")),
            NetClient::with_defaults().unwrap(),
        )
    }

    fn v1_resolver() -> EndpointResolver {
        let config = ProtocolConfig::V1(V1Config {
            userid: "u".into(),
            password: "p".into(),
            rest_url: Some("https://host/streaming_analytics/abc".into()),
            status_path: Some("/status".into()),
            jobs_path: Some("/jobs".into()),
        });
        EndpointResolver::new(
            config,
            Arc::new(Authenticator::basic("u", "p")),
            NetClient::with_defaults().unwrap(),
        )
    }

    #[tokio::test]
    async fn test_v2_resolution_is_cached() {
        let server = MockServer::start();
        let jobs = server.url("/v2/instances/svc/jobs");
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v2/resources")
                .header("authorization", "Basic dTpw");
            then.status(200).json_body(json!({"jobs": jobs}));
        });

        let resolver = v2_resolver(&server);
        let first = resolver.resolve().await.unwrap();
        let second = resolver.resolve().await.unwrap();

        mock.assert_hits(1);
        assert_eq!(first, second);
        assert_eq!(first.status_url, server.url("/v2/resources"));
        assert_eq!(first.builds_url, server.url("/v2/instances/svc/builds"));
    }

    #[tokio::test]
    async fn test_concurrent_first_resolutions_share_one_discovery() {
        let server = MockServer::start();
        let jobs = server.url("/v2/instances/svc/jobs");
        let mock = server.mock(|when, then| {
            when.method(GET).path("/v2/resources");
            then.status(200).json_body(json!({"jobs": jobs}));
        });

        let resolver = v2_resolver(&server);
        let resolved = futures::future::join_all((0..8).map(|_| resolver.resolve())).await;

        mock.assert_hits(1);
        let builds = server.url("/v2/instances/svc/builds");
        assert!(resolved
            .iter()
            .all(|r| r.as_ref().is_ok_and(|set| set.builds_url == builds)));
    }

    #[tokio::test]
    async fn test_reset_forces_rediscovery() {
        let server = MockServer::start();
        let jobs = server.url("/v2/instances/svc/jobs");
        let mock = server.mock(|when, then| {
            when.method(GET).path("/v2/resources");
            then.status(200).json_body(json!({"jobs": jobs}));
        });

        let resolver = v2_resolver(&server);
        resolver.resolve().await.unwrap();
        resolver.reset().await;
        resolver.resolve().await.unwrap();

        mock.assert_hits(2);
    }

    #[tokio::test]
    async fn test_jobs_url_without_jobs_segment_fails() {
        let server = MockServer::start();
        let apps = server.url("/v2/instances/svc/apps");
        server.mock(|when, then| {
            when.method(GET).path("/v2/resources");
            then.status(200).json_body(json!({"jobs": apps}));
        });

        let resolver = v2_resolver(&server);
        let err = resolver.resolve().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Resolution(ResolutionError::UnexpectedJobsUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_failed_discovery_is_not_cached() {
        let server = MockServer::start();
        let mut mock = server.mock(|when, then| {
            when.method(GET).path("/v2/resources");
            then.status(503).body("maintenance");
        });

        let resolver = v2_resolver(&server);
        let err = resolver.resolve().await.unwrap_err();
        assert!(matches!(err, Error::Http(HttpError::Status { status: 503, .. })));

        mock.delete();
        let jobs = server.url("/v2/instances/svc/jobs");
        mock = server.mock(|when, then| {
            when.method(GET).path("/v2/resources");
            then.status(200).json_body(json!({"jobs": jobs}));
        });

        assert!(resolver.resolve().await.is_ok());
        mock.assert_hits(1);
    }

    #[tokio::test]
    async fn test_v2_operation_urls() {
        let server = MockServer::start();
        let jobs = server.url("/v2/instances/svc/jobs");
        server.mock(|when, then| {
            when.method(GET).path("/v2/resources");
            then.status(200).json_body(json!({"jobs": jobs}));
        });

        let resolver = v2_resolver(&server);
        let builds = server.url("/v2/instances/svc/builds");

        assert_eq!(resolver.new_build_url("app").await.unwrap(), builds);
        assert_eq!(
            resolver.build_url("b 1").await.unwrap(),
            format!("{builds}/b+1")
        );
        assert_eq!(
            resolver.build_output_url("b-1", "o-2").await.unwrap(),
            format!("{builds}/b-1?output_id=o-2")
        );
        assert_eq!(
            resolver.job_submit_url("my app.sab").await.unwrap(),
            format!("{}?bundle_id=my+app.sab", server.url("/v2/instances/svc/jobs"))
        );

        let artifact = json!({"id": "a-1", "submit_job": "https://h/artifacts/a-1/jobs"});
        assert_eq!(
            resolver
                .artifact_submit_url(artifact.as_object().unwrap())
                .await
                .unwrap(),
            "https://h/artifacts/a-1/jobs"
        );
    }

    #[tokio::test]
    async fn test_v2_artifact_without_submit_url() {
        let server = MockServer::start();
        let resolver = v2_resolver(&server);
        let artifact = json!({"id": "a-1"});
        let err = resolver
            .artifact_submit_url(artifact.as_object().unwrap())
            .await
            .unwrap_err();
        match err {
            Error::Resolution(ResolutionError::MissingArtifactField { field }) => {
                assert_eq!(field, "submit_job");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_v1_operation_urls() {
        let resolver = v1_resolver();
        let builds = "https://host/streaming_analytics/abc/builds";

        assert_eq!(
            resolver.new_build_url("my app").await.unwrap(),
            format!("{builds}?build_name=my+app")
        );
        assert_eq!(
            resolver.build_url("7").await.unwrap(),
            format!("{builds}?build_id=7")
        );
        assert_eq!(
            resolver.build_output_url("7", "9").await.unwrap(),
            format!("{builds}?build_id=7&output_id=9")
        );

        let artifact = json!({"id": 11});
        assert_eq!(
            resolver
                .artifact_submit_url(artifact.as_object().unwrap())
                .await
                .unwrap(),
            format!("{builds}?artifact_id=11")
        );
    }

    #[tokio::test]
    async fn test_v2_missing_resources_url() {
        let resolver = EndpointResolver::new(
            ProtocolConfig::V2(V2Config {
                service_id: "svc".into(),
                resources_url: None,
                iam_url: None,
                api_key: None,
            }),
            Arc::new(Authenticator::basic("u", "p")),
            NetClient::with_defaults().unwrap(),
        );
        match resolver.resolve().await.unwrap_err() {
            Error::Resolution(ResolutionError::MissingField { field }) => {
                assert_eq!(field, "resources_url");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
