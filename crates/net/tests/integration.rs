//! Integration tests for net crate

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;
    use streamsx_errors::{Error, HttpError};
    use streamsx_net::*;
    use streamsx_types::Archive;

    #[tokio::test]
    async fn test_get_json_sends_authorization() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/status")
                .header("authorization", "Basic dTpw")
                .header("accept", "application/json");
            then.status(200).json_body(json!({"status": "running"}));
        });

        let client = NetClient::with_defaults().unwrap();
        let body = client
            .get_json(&server.url("/status"), Some("Basic dTpw"))
            .await
            .unwrap();

        mock.assert();
        assert_eq!(body["status"], "running");
    }

    #[tokio::test]
    async fn test_not_found_message_is_surfaced() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/jobs/9");
            then.status(404).body("job not found");
        });

        let client = NetClient::with_defaults().unwrap();
        let error = client
            .get_json(&server.url("/jobs/9"), None)
            .await
            .unwrap_err();

        match error {
            Error::Http(HttpError::Status { status, body, .. }) => {
                assert_eq!(status, 404);
                assert_eq!(body, "job not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_not_found_names_url() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/jobs/9");
            then.status(404);
        });

        let client = NetClient::with_defaults().unwrap();
        let url = server.url("/jobs/9");
        let error = client.get_json(&url, None).await.unwrap_err();

        match error {
            Error::Http(HttpError::Status { status, body, .. }) => {
                assert_eq!(status, 404);
                assert!(body.contains("404"));
                assert!(body.contains(&url));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_put_json_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/builds")
                .header("content-type", "application/json")
                .json_body(json!({"jobName": "x"}));
            then.status(200).json_body(json!({"jobId": "7"}));
        });

        let client = NetClient::with_defaults().unwrap();
        let body = client
            .put_json(&server.url("/builds"), "Basic x", &json!({"jobName": "x"}))
            .await
            .unwrap();

        mock.assert();
        assert_eq!(body["jobId"], "7");
    }

    #[tokio::test]
    async fn test_post_form_is_urlencoded() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/token")
                .header("content-type", "application/x-www-form-urlencoded")
                .body("grant_type=a%3Ab&apikey=k");
            then.status(200).json_body(json!({"access_token": "T"}));
        });

        let client = NetClient::with_defaults().unwrap();
        let body = client
            .post_form(&server.url("/token"), &[("grant_type", "a:b"), ("apikey", "k")])
            .await
            .unwrap();

        mock.assert();
        assert_eq!(body["access_token"], "T");
    }

    #[tokio::test]
    async fn test_post_multipart_parts() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/jobs")
                .body_contains("name=\"sab\"")
                .body_contains("filename=\"app.sab\"")
                .body_contains("name=\"jobConfigOverlays\"");
            then.status(201).json_body(json!({"jobId": "3"}));
        });

        let archive = Archive::new("app.sab", bytes::Bytes::from_static(b"PK\x03\x04"));
        let form = Form::new()
            .part("sab", archive_part(&archive, "application/octet-stream").unwrap())
            .part("jobConfigOverlays", json_part(&json!({})).unwrap());

        let client = NetClient::with_defaults().unwrap();
        let body = client
            .post_multipart(&server.url("/jobs"), "Basic x", form)
            .await
            .unwrap();

        mock.assert();
        assert_eq!(body["jobId"], "3");
    }

    #[tokio::test]
    async fn test_connection_refused_is_typed() {
        let client = NetClient::with_defaults().unwrap();
        let error = client
            .get_json("http://127.0.0.1:9/unreachable", None)
            .await
            .unwrap_err();
        assert!(matches!(error, Error::Http(_)));
        assert_eq!(error.http_status(), None);
    }
}
