//! Instance status checks

use streamsx_errors::{Error, ProtocolError};
use streamsx_types::InstanceStatus;
use tracing::debug;

use crate::StreamsService;

impl StreamsService {
    /// Fetch the instance status document
    ///
    /// # Errors
    ///
    /// Returns any resolution, authentication or HTTP failure.
    pub async fn instance_status(&self) -> Result<InstanceStatus, Error> {
        let endpoints = self.resolve().await?;
        let authorization = self.current_authorization_header().await?;
        let body = self
            .net
            .get_json(&endpoints.status_url, Some(&authorization))
            .await?;

        let status = InstanceStatus::from_json(body);
        debug!(
            enabled = ?status.enabled,
            status = status.status.as_deref().unwrap_or("<none>"),
            "fetched instance status"
        );
        Ok(status)
    }

    /// Fail unless the instance is enabled and running
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::InstanceNotRunning` for a stopped or disabled
    /// instance, plus any failure of [`StreamsService::instance_status`].
    pub async fn ensure_running(&self) -> Result<InstanceStatus, Error> {
        let status = self.instance_status().await?;
        if status.is_running() {
            return Ok(status);
        }

        Err(ProtocolError::InstanceNotRunning {
            enabled: status.enabled.unwrap_or(false),
            status: status
                .status
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
        }
        .into())
    }
}
