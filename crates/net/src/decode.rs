//! Maps a transport response onto a decoded JSON object or an `HttpError`

use serde_json::Value;
use streamsx_errors::{Error, HttpError};
use streamsx_types::JsonObject;

const NO_RESOURCE: &str = "No resource from service";

/// Decode a response body.
///
/// Only 200 and 201 carrying a JSON object succeed. A 404 whose body holds a
/// diagnostic message surfaces that message verbatim; every other failure gets
/// a status line naming the URL, with any raw body appended.
///
/// # Errors
///
/// Returns `HttpError::Status` for a non-success status, an empty body, or a
/// body that is not a JSON object.
pub fn decode(status: u16, body: &str, url: &str) -> Result<JsonObject, Error> {
    if status != 200 && status != 201 {
        return Err(HttpError::Status {
            status,
            url: url.to_string(),
            body: failure_message(status, body, url),
        }
        .into());
    }

    if body.trim().is_empty() {
        return Err(HttpError::Status {
            status,
            url: url.to_string(),
            body: NO_RESOURCE.to_string(),
        }
        .into());
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(obj)) => Ok(obj),
        _ => Err(HttpError::Status {
            status,
            url: url.to_string(),
            body: body.to_string(),
        }
        .into()),
    }
}

fn failure_message(status: u16, body: &str, url: &str) -> String {
    let body = body.trim();
    if status == 404 && !body.is_empty() {
        return body.to_string();
    }

    let mut message = format!("HttpStatus is {status} for url {url}");
    if !body.is_empty() {
        message.push_str(" -- ");
        message.push_str(body);
    }
    message
}
