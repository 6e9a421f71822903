//! Field extraction over decoded JSON responses
//!
//! A missing or ill-typed field is always an error naming the URL and the raw
//! body it came from; nothing here substitutes a default.

use serde_json::{Map, Value};
use streamsx_errors::{Error, ProtocolError};

/// A decoded JSON object, the unit every response decodes to.
pub type JsonObject = Map<String, Value>;

fn missing(obj: &JsonObject, field: &str, url: &str) -> Error {
    ProtocolError::MissingField {
        url: url.to_string(),
        field: field.to_string(),
        body: Value::Object(obj.clone()).to_string(),
    }
    .into()
}

/// Read a required string member.
///
/// # Errors
///
/// Returns `ProtocolError::MissingField` if the member is absent, null, or
/// not a string.
pub fn required_str(obj: &JsonObject, field: &str, url: &str) -> Result<String, Error> {
    obj.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| missing(obj, field, url))
}

/// Read a required identifier, which services send either as a string or as
/// an integer.
///
/// # Errors
///
/// Returns `ProtocolError::MissingField` if the member is absent or is neither
/// a string nor a number.
pub fn required_id(obj: &JsonObject, field: &str, url: &str) -> Result<String, Error> {
    match obj.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(missing(obj, field, url)),
    }
}

/// Read a required nested object.
///
/// # Errors
///
/// Returns `ProtocolError::MissingField` if the member is absent or not an
/// object.
pub fn required_object<'a>(
    obj: &'a JsonObject,
    field: &str,
    url: &str,
) -> Result<&'a JsonObject, Error> {
    obj.get(field)
        .and_then(Value::as_object)
        .ok_or_else(|| missing(obj, field, url))
}

/// Read a required array.
///
/// # Errors
///
/// Returns `ProtocolError::MissingField` if the member is absent or not an
/// array.
pub fn required_array<'a>(
    obj: &'a JsonObject,
    field: &str,
    url: &str,
) -> Result<&'a Vec<Value>, Error> {
    obj.get(field)
        .and_then(Value::as_array)
        .ok_or_else(|| missing(obj, field, url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_required_id_accepts_numbers() {
        let o = obj(json!({"jobId": 17}));
        assert_eq!(required_id(&o, "jobId", "u").unwrap(), "17");
    }

    #[test]
    fn test_missing_field_carries_body() {
        let o = obj(json!({"name": "x"}));
        let err = required_str(&o, "id", "https://host/builds").unwrap_err();
        match err {
            Error::Protocol(ProtocolError::MissingField { url, field, body }) => {
                assert_eq!(url, "https://host/builds");
                assert_eq!(field, "id");
                assert!(body.contains("\"name\""));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_null_is_missing() {
        let o = obj(json!({"id": null}));
        assert!(required_str(&o, "id", "u").is_err());
        assert!(required_id(&o, "id", "u").is_err());
    }
}
