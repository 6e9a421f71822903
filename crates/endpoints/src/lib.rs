#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Endpoint resolution for streamsx
//!
//! Turns a protocol configuration into the absolute URLs every operation
//! needs. V1 derives them from the descriptor alone; V2 asks the resources URL
//! once and caches the answer until [`EndpointResolver::reset`].

mod derive;

pub use derive::{builds_url_from_jobs, v1_endpoints, v2_endpoints, with_query};

use std::sync::Arc;

use serde_json::Value;
use streamsx_auth::Authenticator;
use streamsx_errors::{Error, ResolutionError};
use streamsx_net::{encode_component, NetClient};
use streamsx_types::{JsonObject, ProtocolConfig, V2Config};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Operational URLs of one service instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSet {
    pub status_url: String,
    pub jobs_url: String,
    pub builds_url: String,
}

/// Lazily resolves and caches the [`EndpointSet`]
pub struct EndpointResolver {
    config: ProtocolConfig,
    auth: Arc<Authenticator>,
    net: NetClient,
    cache: Mutex<Option<EndpointSet>>,
}

impl EndpointResolver {
    #[must_use]
    pub fn new(config: ProtocolConfig, auth: Arc<Authenticator>, net: NetClient) -> Self {
        Self {
            config,
            auth,
            net,
            cache: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    /// Resolve the endpoint set, serving it from cache after the first success
    ///
    /// # Errors
    ///
    /// Returns a `ResolutionError` for missing or malformed descriptor fields
    /// or discovery responses. For V2 the discovery call can also fail with an
    /// `AuthError` or `HttpError`. Failures are not cached.
    pub async fn resolve(&self) -> Result<EndpointSet, Error> {
        let mut cache = self.cache.lock().await;
        if let Some(endpoints) = cache.as_ref() {
            return Ok(endpoints.clone());
        }

        let endpoints = match &self.config {
            ProtocolConfig::V1(v1) => v1_endpoints(v1)?,
            ProtocolConfig::V2(v2) => self.discover(v2).await?,
        };
        debug!(
            status_url = %endpoints.status_url,
            jobs_url = %endpoints.jobs_url,
            builds_url = %endpoints.builds_url,
            "resolved endpoints"
        );

        *cache = Some(endpoints.clone());
        Ok(endpoints)
    }

    /// Forget the cached endpoints so the next call resolves again
    pub async fn reset(&self) {
        self.cache.lock().await.take();
    }

    async fn discover(&self, config: &V2Config) -> Result<EndpointSet, Error> {
        let resources_url =
            config
                .resources_url
                .as_deref()
                .ok_or_else(|| ResolutionError::MissingField {
                    field: "resources_url".to_string(),
                })?;

        let authorization = self.auth.current_authorization_header().await?;
        info!(url = resources_url, "discovering service endpoints");
        let resources = self
            .net
            .get_json(resources_url, Some(&authorization))
            .await?;

        v2_endpoints(resources_url, &resources)
    }

    /// URL for submitting an application bundle directly as a job
    ///
    /// # Errors
    ///
    /// Propagates any [`EndpointResolver::resolve`] failure.
    pub async fn job_submit_url(&self, bundle_file_name: &str) -> Result<String, Error> {
        let endpoints = self.resolve().await?;
        Ok(with_query(&endpoints.jobs_url, "bundle_id", bundle_file_name))
    }

    /// URL for submitting a job from an already built artifact
    ///
    /// V1 addresses the artifact by id under the builds collection; V2 hands
    /// out the URL verbatim in the artifact's `submit_job` member.
    ///
    /// # Errors
    ///
    /// Returns `ResolutionError::MissingArtifactField` if the artifact lacks
    /// the member its protocol needs.
    pub async fn artifact_submit_url(&self, artifact: &JsonObject) -> Result<String, Error> {
        let missing = |field: &str| ResolutionError::MissingArtifactField {
            field: field.to_string(),
        };

        match &self.config {
            ProtocolConfig::V1(_) => {
                let artifact_id = match artifact.get("id") {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Number(n)) => n.to_string(),
                    _ => return Err(missing("id").into()),
                };
                let endpoints = self.resolve().await?;
                Ok(with_query(&endpoints.builds_url, "artifact_id", &artifact_id))
            }
            ProtocolConfig::V2(_) => artifact
                .get("submit_job")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| missing("submit_job").into()),
        }
    }

    /// URL a new build is POSTed to
    ///
    /// # Errors
    ///
    /// Propagates any [`EndpointResolver::resolve`] failure.
    pub async fn new_build_url(&self, build_name: &str) -> Result<String, Error> {
        let endpoints = self.resolve().await?;
        Ok(match &self.config {
            ProtocolConfig::V1(_) => with_query(&endpoints.builds_url, "build_name", build_name),
            ProtocolConfig::V2(_) => endpoints.builds_url,
        })
    }

    /// URL that reports a single build
    ///
    /// V1 only offers a query over the shared builds collection; V2 has a
    /// resource per build.
    ///
    /// # Errors
    ///
    /// Propagates any [`EndpointResolver::resolve`] failure.
    pub async fn build_url(&self, build_id: &str) -> Result<String, Error> {
        let endpoints = self.resolve().await?;
        Ok(match &self.config {
            ProtocolConfig::V1(_) => with_query(&endpoints.builds_url, "build_id", build_id),
            ProtocolConfig::V2(_) => {
                format!("{}/{}", endpoints.builds_url, encode_component(build_id))
            }
        })
    }

    /// URL that reports one output of a build
    ///
    /// # Errors
    ///
    /// Propagates any [`EndpointResolver::resolve`] failure.
    pub async fn build_output_url(&self, build_id: &str, output_id: &str) -> Result<String, Error> {
        let build_url = self.build_url(build_id).await?;
        Ok(with_query(&build_url, "output_id", output_id))
    }
}
