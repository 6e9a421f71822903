//! Job submission from artifacts and from prebuilt bundles

use std::path::Path;

use serde_json::Value;
use streamsx_errors::Error;
use streamsx_net::{archive_part, json_part, Form};
use streamsx_types::json::required_id;
use streamsx_types::{Archive, JobSubmission, JsonObject};
use tracing::info;

use crate::wire::{JobSubmit, OCTET_STREAM};
use crate::StreamsService;

impl StreamsService {
    /// Submit a job from a built artifact
    ///
    /// `submit_url` comes from [`streamsx_endpoints::EndpointResolver::artifact_submit_url`].
    ///
    /// # Errors
    ///
    /// Returns an `HttpError` for a rejected submission and a `ProtocolError`
    /// if the response does not name the new job.
    pub async fn submit_job(
        &self,
        submit_url: &str,
        job_config: &Value,
    ) -> Result<JobSubmission, Error> {
        let authorization = self.current_authorization_header().await?;
        info!(url = submit_url, "submitting job");

        let response = match self.wire().job_submit {
            JobSubmit::PutJson => {
                self.net
                    .put_json(submit_url, &authorization, job_config)
                    .await?
            }
            JobSubmit::MultipartPart(part) => {
                let form = Form::new().part(part, json_part(job_config)?);
                self.net
                    .post_multipart(submit_url, &authorization, form)
                    .await?
            }
        };

        self.job_submission(response, submit_url)
    }

    /// Submit a prebuilt application bundle directly as a job
    ///
    /// No build record is created.
    ///
    /// # Errors
    ///
    /// Same as [`StreamsService::submit_job`], plus any resolution failure.
    pub async fn submit_bundle(
        &self,
        bundle: &Archive,
        job_config: &Value,
    ) -> Result<JobSubmission, Error> {
        let url = self.endpoints.job_submit_url(&bundle.file_name).await?;
        let authorization = self.current_authorization_header().await?;
        let wire = self.wire();

        let form = Form::new()
            .part(wire.bundle_part, archive_part(bundle, OCTET_STREAM)?)
            .part(wire.bundle_config_part, json_part(job_config)?);

        info!(
            url = %url,
            bundle = %bundle.file_name,
            bytes = bundle.len(),
            "submitting bundle"
        );
        let response = self.net.post_multipart(&url, &authorization, form).await?;
        self.job_submission(response, &url)
    }

    fn job_submission(&self, response: JsonObject, url: &str) -> Result<JobSubmission, Error> {
        let job_id = required_id(&response, self.endpoints.config().job_id_field(), url)?;
        info!(job_id = %job_id, "job submitted");
        Ok(JobSubmission {
            job_id,
            raw_response: response,
        })
    }
}

/// Load an archive from disk, keeping its file name for the upload
///
/// # Errors
///
/// Returns an I/O error naming the path if the file cannot be read, or if the
/// path has no file name.
pub async fn read_archive(path: impl AsRef<Path>) -> Result<Archive, Error> {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::Io {
            message: "archive path has no file name".to_string(),
            path: Some(path.display().to_string()),
        })?
        .to_string();

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| Error::io_with_path(&e, path))?;

    Ok(Archive::new(file_name, bytes))
}
