//! Body and query string serialization.

use bytes::Bytes;

use crate::{BuildError, Result};

/// MIME type set by the JSON body encoder.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Serialize a value to JSON bytes.
///
/// # Example
///
/// ```
/// use courier_core::{Parameters, to_json};
///
/// let body = to_json(&Parameters::from([("name", "Alice")])).expect("serialize");
/// assert_eq!(&body[..], br#"{"name":"Alice"}"#);
/// ```
pub fn to_json<T: serde::Serialize>(value: &T) -> std::result::Result<Bytes, BuildError> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(Into::into)
}

/// Serialize key/value pairs to an `application/x-www-form-urlencoded` query string.
///
/// # Example
///
/// ```
/// use courier_core::to_query_string;
///
/// let query = to_query_string(&[("q", "New York"), ("units", "metric")]).expect("serialize");
/// assert_eq!(query, "q=New+York&units=metric");
/// ```
pub fn to_query_string<T: serde::Serialize + ?Sized>(
    value: &T,
) -> std::result::Result<String, BuildError> {
    serde_html_form::to_string(value).map_err(Into::into)
}

/// Deserialize JSON bytes, reporting the path of the failing field.
///
/// # Errors
///
/// Returns [`crate::Error::DecodingFailed`]; its `path` is empty for syntax
/// errors and e.g. `city.name` for a missing nested field.
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        let path = e.path().to_string();
        // serde_path_to_error renders the root as "."
        let path = if path == "." { String::new() } else { path };
        crate::Error::decoding_failed(path, e.inner().to_string())
    })
}
