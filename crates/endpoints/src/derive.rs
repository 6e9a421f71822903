//! Pure URL derivation from descriptor fields and discovery responses

use serde_json::Value;
use streamsx_errors::{Error, ResolutionError};
use streamsx_net::encode_component;
use streamsx_types::{JsonObject, V1Config};

use crate::EndpointSet;

const JOBS_SUFFIX: &str = "/jobs";

/// Builds URL derived by swapping the trailing `jobs` segment for `builds`
///
/// # Errors
///
/// Returns `ResolutionError::UnexpectedJobsUrl` if the URL does not end with
/// `/jobs`.
pub fn builds_url_from_jobs(jobs_url: &str) -> Result<String, Error> {
    jobs_url
        .strip_suffix(JOBS_SUFFIX)
        .map(|base| format!("{base}/builds"))
        .ok_or_else(|| {
            ResolutionError::UnexpectedJobsUrl {
                url: jobs_url.to_string(),
            }
            .into()
        })
}

fn v1_field<'a>(value: Option<&'a String>, field: &str) -> Result<&'a str, Error> {
    value.map(String::as_str).ok_or_else(|| {
        ResolutionError::MissingField {
            field: field.to_string(),
        }
        .into()
    })
}

/// V1 endpoints are the REST base URL joined with the fixed paths
///
/// # Errors
///
/// Returns a `ResolutionError` if `rest_url`, `status_path` or `jobs_path` is
/// missing, or the jobs path does not end in `/jobs`.
pub fn v1_endpoints(config: &V1Config) -> Result<EndpointSet, Error> {
    let rest_url = v1_field(config.rest_url.as_ref(), "rest_url")?;
    let status_path = v1_field(config.status_path.as_ref(), "status_path")?;
    let jobs_path = v1_field(config.jobs_path.as_ref(), "jobs_path")?;

    let jobs_url = format!("{rest_url}{jobs_path}");
    Ok(EndpointSet {
        status_url: format!("{rest_url}{status_path}"),
        builds_url: builds_url_from_jobs(&jobs_url)?,
        jobs_url,
    })
}

/// V2 endpoints come from the `jobs` member of the resources document
///
/// # Errors
///
/// Returns `ResolutionError::MissingResource` if `jobs` is absent and
/// `ResolutionError::UnexpectedJobsUrl` if it does not end in `/jobs`.
pub fn v2_endpoints(resources_url: &str, resources: &JsonObject) -> Result<EndpointSet, Error> {
    let jobs_url = resources
        .get("jobs")
        .and_then(Value::as_str)
        .ok_or_else(|| ResolutionError::MissingResource {
            url: resources_url.to_string(),
            field: "jobs".to_string(),
        })?;

    Ok(EndpointSet {
        status_url: resources_url.to_string(),
        builds_url: builds_url_from_jobs(jobs_url)?,
        jobs_url: jobs_url.to_string(),
    })
}

/// Append one encoded query parameter
#[must_use]
pub fn with_query(url: &str, name: &str, value: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{name}={}", encode_component(value))
}
