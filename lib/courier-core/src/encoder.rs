//! Parameter encoders.
//!
//! Each encoder writes a [`Parameters`] bag into an in-progress request:
//! [`UrlEncoder`] into the query string, [`JsonEncoder`] into the body.

use crate::{BuildError, JSON_CONTENT_TYPE, Parameters, RequestBuilder, to_json, to_query_string};

/// Strategy for writing parameters into a request.
pub trait ParameterEncoder {
    /// Encode `parameters` into `request`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Encoding`] if the parameters cannot be serialized.
    fn encode(
        &self,
        request: RequestBuilder,
        parameters: &Parameters,
    ) -> Result<RequestBuilder, BuildError>;
}

/// Appends parameters to the URL query string.
///
/// Values are rendered with their `Display` form and form-urlencoded.
/// Any query already present on the URL is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlEncoder;

impl ParameterEncoder for UrlEncoder {
    fn encode(
        &self,
        mut request: RequestBuilder,
        parameters: &Parameters,
    ) -> Result<RequestBuilder, BuildError> {
        if parameters.is_empty() {
            return Ok(request);
        }

        let encoded = to_query_string(&parameters.to_pairs())?;
        let url = request.url_mut();
        let query = match url.query() {
            Some(existing) if !existing.is_empty() => format!("{existing}&{encoded}"),
            _ => encoded,
        };
        url.set_query(Some(&query));

        Ok(request)
    }
}

/// Serializes parameters as a JSON object body.
///
/// Sets `Content-Type: application/json`, replacing any value set before.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder;

impl ParameterEncoder for JsonEncoder {
    fn encode(
        &self,
        request: RequestBuilder,
        parameters: &Parameters,
    ) -> Result<RequestBuilder, BuildError> {
        let body = to_json(parameters)?;
        Ok(request.header("Content-Type", JSON_CONTENT_TYPE).body(body))
    }
}
