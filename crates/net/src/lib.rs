#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Network operations for streamsx
//!
//! This crate owns the HTTP transport and the response decoder. Every call
//! returns either a decoded JSON object or a typed error carrying the status,
//! URL and body of the failed exchange.

mod client;
mod decode;

pub use client::{NetClient, NetConfig};
pub use decode::decode;
pub use reqwest::multipart::Form;

use reqwest::multipart::Part;
use reqwest::Body;
use serde_json::Value;
use streamsx_errors::{Error, HttpError};
use streamsx_types::Archive;
use url::Url;

/// Build a multipart part holding an archive's bytes under its file name
///
/// # Errors
///
/// Returns an error if `mime` is not a valid media type.
pub fn archive_part(archive: &Archive, mime: &str) -> Result<Part, Error> {
    Part::stream_with_length(Body::from(archive.bytes.clone()), archive.len() as u64)
        .file_name(archive.file_name.clone())
        .mime_str(mime)
        .map_err(|e| Error::internal(format!("invalid media type {mime}: {e}")))
}

/// Build a multipart part holding a JSON document
///
/// # Errors
///
/// Returns an error if the JSON media type is rejected, which cannot happen
/// for the constant used here but is still propagated.
pub fn json_part(value: &Value) -> Result<Part, Error> {
    Part::text(value.to_string())
        .mime_str("application/json")
        .map_err(|e| Error::internal(format!("invalid media type: {e}")))
}

/// Percent-encode a query or path component the way HTML forms do
#[must_use]
pub fn encode_component(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Parse and validate a URL
///
/// # Errors
///
/// Returns an error if the URL string is malformed or invalid according to RFC 3986.
pub fn parse_url(url: &str) -> Result<Url, Error> {
    Url::parse(url).map_err(|e| HttpError::InvalidUrl(format!("{url}: {e}")).into())
}
