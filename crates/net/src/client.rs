//! HTTP client used for every call to the service
//!
//! Requests are single-shot. Retry policy belongs to the caller.

use reqwest::multipart::Form;
use reqwest::{header, Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;
use streamsx_errors::{Error, HttpError};
use streamsx_types::JsonObject;
use tracing::debug;

use crate::decode::decode;

const APPLICATION_JSON: &str = "application/json";

/// Network client configuration
#[derive(Debug, Clone)]
pub struct NetConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub pool_idle_timeout: Duration,
    pub user_agent: String,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300), // archives can be large
            connect_timeout: Duration::from_secs(30),
            pool_idle_timeout: Duration::from_secs(90),
            user_agent: format!("streamsx/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP client wrapper that decodes every response to a JSON object
#[derive(Clone)]
pub struct NetClient {
    client: Client,
}

impl NetClient {
    /// Create a new network client
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to initialize.
    pub fn new(config: &NetConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| HttpError::ConnectionRefused(e.to_string()))?;

        Ok(Self { client })
    }

    /// Create with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created with default settings.
    pub fn with_defaults() -> Result<Self, Error> {
        Self::new(&NetConfig::default())
    }

    /// GET a JSON resource
    ///
    /// # Errors
    ///
    /// Returns a transport error, or the decoder's `HttpError` for anything but
    /// a JSON object with status 200/201.
    pub async fn get_json(
        &self,
        url: &str,
        authorization: Option<&str>,
    ) -> Result<JsonObject, Error> {
        let mut request = self.client.get(url);
        if let Some(auth) = authorization {
            request = request.header(header::AUTHORIZATION, auth);
        }
        Self::execute("GET", url, request).await
    }

    /// POST a multipart form
    ///
    /// # Errors
    ///
    /// Same as [`NetClient::get_json`].
    pub async fn post_multipart(
        &self,
        url: &str,
        authorization: &str,
        form: Form,
    ) -> Result<JsonObject, Error> {
        let request = self
            .client
            .post(url)
            .header(header::AUTHORIZATION, authorization)
            .multipart(form);
        Self::execute("POST", url, request).await
    }

    /// PUT a JSON document
    ///
    /// # Errors
    ///
    /// Same as [`NetClient::get_json`].
    pub async fn put_json(
        &self,
        url: &str,
        authorization: &str,
        body: &Value,
    ) -> Result<JsonObject, Error> {
        let request = self
            .client
            .put(url)
            .header(header::AUTHORIZATION, authorization)
            .header(header::CONTENT_TYPE, APPLICATION_JSON)
            .body(body.to_string());
        Self::execute("PUT", url, request).await
    }

    /// POST an `application/x-www-form-urlencoded` body
    ///
    /// # Errors
    ///
    /// Same as [`NetClient::get_json`].
    pub async fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<JsonObject, Error> {
        let request = self.client.post(url).form(fields);
        Self::execute("POST", url, request).await
    }

    async fn execute(
        method: &str,
        url: &str,
        request: RequestBuilder,
    ) -> Result<JsonObject, Error> {
        debug!(method, url, "sending request");

        let response = request
            .header(header::ACCEPT, APPLICATION_JSON)
            .send()
            .await
            .map_err(|e| Self::transport_error(&e, url))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Self::transport_error(&e, url))?;

        debug!(method, url, status, bytes = body.len(), "received response");
        decode(status, &body, url)
    }

    fn transport_error(e: &reqwest::Error, url: &str) -> Error {
        if e.is_timeout() {
            HttpError::Timeout {
                url: url.to_string(),
            }
            .into()
        } else if e.is_connect() {
            HttpError::ConnectionRefused(e.to_string()).into()
        } else if e.is_builder() {
            HttpError::InvalidUrl(format!("{url}: {e}")).into()
        } else {
            HttpError::RequestFailed {
                url: url.to_string(),
                message: e.to_string(),
            }
            .into()
        }
    }

    /// Get the underlying reqwest client for advanced usage
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.client
    }
}
