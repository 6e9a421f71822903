//! Build and job submission records

use std::fmt;

use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;
use streamsx_errors::{Error, ProtocolError};

use crate::json::{required_id, required_str, JsonObject};

/// An application archive produced by the packaging step
#[derive(Debug, Clone)]
pub struct Archive {
    pub file_name: String,
    pub bytes: Bytes,
}

impl Archive {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// What the caller asks the build service to compile
#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub archive: Archive,
    pub build_name: String,
    /// Extra build options, merged into the V2 `build_options` part
    pub build_config: JsonObject,
}

impl BuildRequest {
    pub fn new(archive: Archive, build_name: impl Into<String>) -> Self {
        Self {
            archive,
            build_name: build_name.into(),
            build_config: JsonObject::new(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, build_config: JsonObject) -> Self {
        self.build_config = build_config;
        self
    }
}

/// Server-side state of a build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildStatus {
    Submitted,
    Building,
    Built,
    Failed,
}

impl BuildStatus {
    /// Parse the status string a build service reports
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "submitted" => Some(Self::Submitted),
            "building" => Some(Self::Building),
            "built" => Some(Self::Built),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// `built` and `failed` never change again
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Built | Self::Failed)
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Submitted => write!(f, "submitted"),
            Self::Building => write!(f, "building"),
            Self::Built => write!(f, "built"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// An artifact reference or diagnostic attached to a build
#[derive(Debug, Clone, Serialize)]
pub struct Output {
    pub id: String,
    pub kind: Option<String>,
    pub payload: Value,
}

impl Output {
    fn from_json(obj: &JsonObject, url: &str) -> Result<Self, Error> {
        Ok(Self {
            id: required_id(obj, "id", url)?,
            kind: obj
                .get("kind")
                .or_else(|| obj.get("type"))
                .and_then(Value::as_str)
                .map(str::to_string),
            payload: Value::Object(obj.clone()),
        })
    }

    /// Whether this output references a runnable artifact
    #[must_use]
    pub fn is_artifact(&self) -> bool {
        self.kind
            .as_deref()
            .is_some_and(|k| k.to_ascii_lowercase().contains("artifact"))
    }
}

/// One build as last reported by the service
#[derive(Debug, Clone, Serialize)]
pub struct BuildRecord {
    pub id: String,
    pub status: BuildStatus,
    pub outputs: Vec<Output>,
    pub raw: JsonObject,
}

impl BuildRecord {
    /// Decode a build object; `url` is only used for error context
    ///
    /// # Errors
    ///
    /// Returns a `ProtocolError` if `id` or `status` is missing, the status is
    /// not a known build state, or an output entry is malformed.
    pub fn from_json(obj: &JsonObject, url: &str) -> Result<Self, Error> {
        let id = required_id(obj, "id", url)?;
        let status_text = required_str(obj, "status", url)?;
        let status = BuildStatus::parse(&status_text).ok_or_else(|| {
            ProtocolError::UnexpectedValue {
                url: url.to_string(),
                field: "status".to_string(),
                body: Value::Object(obj.clone()).to_string(),
            }
        })?;

        let mut outputs = Vec::new();
        if let Some(entries) = obj.get("outputs").and_then(Value::as_array) {
            for entry in entries {
                let entry = entry
                    .as_object()
                    .ok_or_else(|| ProtocolError::UnexpectedValue {
                        url: url.to_string(),
                        field: "outputs".to_string(),
                        body: Value::Object(obj.clone()).to_string(),
                    })?;
                outputs.push(Output::from_json(entry, url)?);
            }
        }

        Ok(Self {
            id,
            status,
            outputs,
            raw: obj.clone(),
        })
    }

    /// First output that references an artifact
    #[must_use]
    pub fn artifact(&self) -> Option<&Output> {
        self.outputs.iter().find(|o| o.is_artifact())
    }
}

/// Terminal result of the submission workflow
#[derive(Debug, Clone, Serialize)]
pub struct JobSubmission {
    pub job_id: String,
    pub raw_response: JsonObject,
}

/// Where a build-then-submit run stopped
#[derive(Debug, Clone)]
pub enum BuildProgress {
    Submitted(JobSubmission),
    /// Still compiling; poll the record and continue once it is built
    Pending(BuildRecord),
    Failed(BuildRecord),
}

/// Instance status as reported by the status URL
#[derive(Debug, Clone, Serialize)]
pub struct InstanceStatus {
    pub enabled: Option<bool>,
    pub status: Option<String>,
    pub raw: JsonObject,
}

impl InstanceStatus {
    #[must_use]
    pub fn from_json(obj: JsonObject) -> Self {
        Self {
            enabled: obj.get("enabled").and_then(Value::as_bool),
            status: obj.get("status").and_then(Value::as_str).map(str::to_string),
            raw: obj,
        }
    }

    /// Enabled and reporting `running`
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.enabled == Some(true) && self.status.as_deref() == Some("running")
    }
}
