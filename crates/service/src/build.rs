//! Build submission, queries, and the build-then-submit workflow

use serde_json::Value;
use streamsx_errors::{Error, ProtocolError};
use streamsx_net::{archive_part, json_part, Form};
use streamsx_types::json::{required_array, required_object};
use streamsx_types::{
    BuildProgress, BuildRecord, BuildRequest, BuildStatus, JobSubmission, JsonObject,
};
use tracing::{debug, info, warn};

use crate::wire::{BuildUpload, ZIP};
use crate::StreamsService;

impl StreamsService {
    /// Upload an archive and start a build
    ///
    /// # Errors
    ///
    /// Returns an `HttpError` for a rejected upload and a `ProtocolError` if
    /// the response does not carry a build record.
    pub async fn submit_build(&self, request: &BuildRequest) -> Result<BuildRecord, Error> {
        let url = self.endpoints.new_build_url(&request.build_name).await?;
        let authorization = self.current_authorization_header().await?;
        let wire = self.wire();

        let archive = archive_part(&request.archive, ZIP)?;
        let form = match wire.build_upload {
            BuildUpload::ArchiveNamedPart => {
                if !request.build_config.is_empty() {
                    warn!(
                        keys = request.build_config.len(),
                        "build options are not supported by this service; ignoring them"
                    );
                }
                Form::new().part(request.archive.file_name.clone(), archive)
            }
            BuildUpload::OptionsAndArchive {
                options,
                archive: archive_name,
            } => {
                let mut build_options = request.build_config.clone();
                build_options.insert(
                    "buildName".to_string(),
                    Value::String(request.build_name.clone()),
                );
                Form::new()
                    .part(options, json_part(&Value::Object(build_options))?)
                    .part(archive_name, archive)
            }
        };

        info!(
            url = %url,
            build_name = %request.build_name,
            archive = %request.archive.file_name,
            bytes = request.archive.len(),
            "submitting build"
        );
        let response = self.net.post_multipart(&url, &authorization, form).await?;

        let build = match wire.build_envelope {
            Some(member) => required_object(&response, member, &url)?,
            None => &response,
        };
        let record = BuildRecord::from_json(build, &url)?;
        info!(build_id = %record.id, status = %record.status, "build submitted");
        Ok(record)
    }

    /// Report the current state of a build
    ///
    /// A single request; callers poll by calling again.
    ///
    /// # Errors
    ///
    /// Returns an `HttpError` if the query fails and a `ProtocolError` if the
    /// build is not in the response or is malformed.
    pub async fn get_build(&self, build_id: &str) -> Result<BuildRecord, Error> {
        let url = self.endpoints.build_url(build_id).await?;
        let build = self.fetch_build_entry(&url, build_id).await?;
        let record = BuildRecord::from_json(&build, &url)?;
        debug!(build_id, status = %record.status, "fetched build");
        Ok(record)
    }

    /// Fetch one output of a build, typically its artifact
    ///
    /// # Errors
    ///
    /// Same as [`StreamsService::get_build`].
    pub async fn get_build_output(
        &self,
        build_id: &str,
        output_id: &str,
    ) -> Result<JsonObject, Error> {
        let url = self.endpoints.build_output_url(build_id, output_id).await?;
        self.fetch_build_entry(&url, build_id).await
    }

    async fn fetch_build_entry(&self, url: &str, build_id: &str) -> Result<JsonObject, Error> {
        let authorization = self.current_authorization_header().await?;
        let response = self.net.get_json(url, Some(&authorization)).await?;

        let Some(collection) = self.wire().build_collection else {
            return Ok(response);
        };

        // The collection endpoint may answer with every build; pick ours.
        required_array(&response, collection, url)?
            .iter()
            .filter_map(Value::as_object)
            .find(|entry| entry_id(entry).as_deref() == Some(build_id))
            .cloned()
            .ok_or_else(|| {
                ProtocolError::BuildNotListed {
                    url: url.to_string(),
                    build_id: build_id.to_string(),
                }
                .into()
            })
    }

    /// Submit a job from a build the caller has seen reach `built`
    ///
    /// The artifact is the first output whose kind names an artifact; a build
    /// without one is addressed by its own id.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::BuildNotReady` if the record is not `built`,
    /// otherwise any failure of the output fetch or job submission.
    pub async fn submit_built(
        &self,
        record: &BuildRecord,
        job_config: &Value,
    ) -> Result<JobSubmission, Error> {
        if record.status != BuildStatus::Built {
            return Err(ProtocolError::BuildNotReady {
                build_id: record.id.clone(),
                status: record.status.to_string(),
            }
            .into());
        }

        let output_id = record.artifact().map_or(record.id.as_str(), |o| o.id.as_str());
        let artifact = self.get_build_output(&record.id, output_id).await?;
        let submit_url = self.endpoints.artifact_submit_url(&artifact).await?;
        self.submit_job(&submit_url, job_config).await
    }

    /// Submit a build and, if it finishes immediately, its job
    ///
    /// A build still in progress comes back as [`BuildProgress::Pending`] for
    /// the caller to poll with [`StreamsService::get_build`] and finish with
    /// [`StreamsService::submit_built`].
    ///
    /// # Errors
    ///
    /// Any failure of the steps taken. A build the service reports as failed
    /// is not an error; it is returned as [`BuildProgress::Failed`].
    pub async fn build_and_submit(
        &self,
        request: &BuildRequest,
        job_config: &Value,
    ) -> Result<BuildProgress, Error> {
        let record = self.submit_build(request).await?;
        match record.status {
            BuildStatus::Built => Ok(BuildProgress::Submitted(
                self.submit_built(&record, job_config).await?,
            )),
            BuildStatus::Failed => {
                warn!(build_id = %record.id, "build failed");
                Ok(BuildProgress::Failed(record))
            }
            BuildStatus::Submitted | BuildStatus::Building => Ok(BuildProgress::Pending(record)),
        }
    }
}

fn entry_id(entry: &JsonObject) -> Option<String> {
    match entry.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
