#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for the streamsx client
//!
//! This crate holds the data model shared by every layer: the service
//! descriptor and its protocol classification, build records and their
//! outputs, and the results of job submission.

pub mod build;
pub mod descriptor;
pub mod json;

pub use build::{
    Archive, BuildProgress, BuildRecord, BuildRequest, BuildStatus, InstanceStatus,
    JobSubmission, Output,
};
pub use descriptor::{
    classify, ProtocolConfig, ProtocolVersion, ServiceDescriptor, V1Config, V2Config,
};
pub use json::JsonObject;
