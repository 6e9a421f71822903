//! Per-generation wire details
//!
//! Both generations run the same workflow; only part names, envelopes and the
//! job-submission method differ. Each generation is one constant here so the
//! workflow code never branches on the version itself.

use streamsx_types::ProtocolConfig;

pub(crate) const ZIP: &str = "application/zip";
pub(crate) const OCTET_STREAM: &str = "application/octet-stream";

/// How a build upload is laid out
pub(crate) enum BuildUpload {
    /// A single file part named after the archive
    ArchiveNamedPart,
    /// A JSON options part plus a file part under fixed names
    OptionsAndArchive {
        options: &'static str,
        archive: &'static str,
    },
}

/// How a job is submitted from an artifact
pub(crate) enum JobSubmit {
    /// The job configuration is the JSON request body of a PUT
    PutJson,
    /// The job configuration travels as one multipart POST part
    MultipartPart(&'static str),
}

pub(crate) struct Wire {
    pub build_upload: BuildUpload,
    /// Member wrapping the build object in build-submission responses
    pub build_envelope: Option<&'static str>,
    /// Build queries return the shared collection under this member
    pub build_collection: Option<&'static str>,
    pub job_submit: JobSubmit,
    pub bundle_part: &'static str,
    pub bundle_config_part: &'static str,
}

static V1: Wire = Wire {
    build_upload: BuildUpload::ArchiveNamedPart,
    build_envelope: Some("build"),
    build_collection: Some("builds"),
    job_submit: JobSubmit::PutJson,
    bundle_part: "sab",
    bundle_config_part: "jobConfigOverlays",
};

static V2: Wire = Wire {
    build_upload: BuildUpload::OptionsAndArchive {
        options: "build_options",
        archive: "archive_file",
    },
    build_envelope: None,
    build_collection: None,
    job_submit: JobSubmit::MultipartPart("job_options"),
    bundle_part: "bundle_file",
    bundle_config_part: "job_options",
};

/// Wire description of a classified generation
pub(crate) fn wire_for(config: &ProtocolConfig) -> &'static Wire {
    match config {
        ProtocolConfig::V1(_) => &V1,
        ProtocolConfig::V2(_) => &V2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use streamsx_types::{V1Config, V2Config};

    fn v1() -> ProtocolConfig {
        ProtocolConfig::V1(V1Config {
            userid: "u".into(),
            password: "p".into(),
            rest_url: None,
            status_path: None,
            jobs_path: None,
        })
    }

    fn v2() -> ProtocolConfig {
        ProtocolConfig::V2(V2Config {
            service_id: "svc".into(),
            resources_url: None,
            iam_url: None,
            api_key: None,
        })
    }

    #[test]
    fn test_job_submission_method() {
        assert!(matches!(wire_for(&v1()).job_submit, JobSubmit::PutJson));
        assert!(matches!(
            wire_for(&v2()).job_submit,
            JobSubmit::MultipartPart("job_options")
        ));
    }

    #[test]
    fn test_bundle_parts() {
        let v1 = wire_for(&v1());
        assert_eq!((v1.bundle_part, v1.bundle_config_part), ("sab", "jobConfigOverlays"));
        let v2 = wire_for(&v2());
        assert_eq!((v2.bundle_part, v2.bundle_config_part), ("bundle_file", "job_options"));
    }
}
