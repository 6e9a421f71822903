//! Caller-side build polling

use std::time::Duration;

use streamsx_service::StreamsService;
use streamsx_types::BuildRecord;
use tracing::info;

use crate::error::CliError;

/// How often and how long to poll a build
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

/// Poll a build until it is `built` or `failed`
pub async fn wait_for_build(
    service: &StreamsService,
    mut record: BuildRecord,
    policy: PollPolicy,
) -> Result<BuildRecord, CliError> {
    let mut attempts = 0;
    while !record.status.is_terminal() {
        if attempts >= policy.max_attempts {
            return Err(CliError::BuildTimeout {
                build_id: record.id,
                attempts,
            });
        }

        tokio::time::sleep(policy.interval).await;
        record = service.get_build(&record.id).await?;
        attempts += 1;
        info!(build_id = %record.id, status = %record.status, attempts, "polled build");
    }
    Ok(record)
}
