#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Build and job submission against a Streaming Analytics service
//!
//! [`StreamsService`] composes the authenticator and endpoint resolver chosen
//! by credential classification and drives the upload, build and submission
//! workflow. Every call is single-shot; polling a build until it settles is
//! left to the caller.

mod build;
mod instance;
mod job;
mod wire;

pub use job::read_archive;

use std::sync::Arc;

use streamsx_auth::Authenticator;
use streamsx_endpoints::{EndpointResolver, EndpointSet};
use streamsx_errors::Error;
use streamsx_net::NetClient;
use streamsx_types::{ProtocolConfig, ProtocolVersion, ServiceDescriptor};
use tracing::debug;

use crate::wire::{wire_for, Wire};

/// Client for one service instance
pub struct StreamsService {
    name: Option<String>,
    auth: Arc<Authenticator>,
    endpoints: EndpointResolver,
    net: NetClient,
}

impl StreamsService {
    /// Classify a descriptor and assemble the matching client
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the descriptor matches no protocol
    /// generation.
    pub fn from_descriptor(descriptor: &ServiceDescriptor, net: NetClient) -> Result<Self, Error> {
        let config = ProtocolConfig::from_descriptor(descriptor)?;
        debug!(
            service = descriptor.name().unwrap_or("<unnamed>"),
            version = %config.version(),
            "classified service credentials"
        );

        let mut service = Self::new(config, net);
        service.name = descriptor.name().map(str::to_string);
        Ok(service)
    }

    /// Assemble a client for an already classified configuration
    #[must_use]
    pub fn new(config: ProtocolConfig, net: NetClient) -> Self {
        let auth = Arc::new(Authenticator::for_config(&config, net.clone()));
        let endpoints = EndpointResolver::new(config, Arc::clone(&auth), net.clone());
        Self {
            name: None,
            auth,
            endpoints,
            net,
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn version(&self) -> ProtocolVersion {
        self.endpoints.config().version()
    }

    /// Resolve the service's endpoints
    ///
    /// # Errors
    ///
    /// See [`EndpointResolver::resolve`].
    pub async fn resolve(&self) -> Result<EndpointSet, Error> {
        self.endpoints.resolve().await
    }

    /// Drop cached endpoints, forcing rediscovery on the next call
    pub async fn reset_endpoints(&self) {
        self.endpoints.reset().await;
    }

    /// Authorization header for the next request
    ///
    /// # Errors
    ///
    /// Returns an `AuthError` if a token cannot be obtained.
    pub async fn current_authorization_header(&self) -> Result<String, Error> {
        self.auth.current_authorization_header().await
    }

    fn wire(&self) -> &'static Wire {
        wire_for(self.endpoints.config())
    }
}
