//! HTTP responses and decoded results.

use std::collections::HashMap;

use bytes::Bytes;

/// Status codes accepted as success.
pub const SUCCESS_STATUS: std::ops::Range<u16> = 200..300;

/// HTTP response with status, headers, and body.
#[derive(Debug, Clone)]
pub struct Response<B = Bytes> {
    status: u16,
    headers: HashMap<String, String>,
    body: B,
}

impl<B> Response<B> {
    /// Creates a new response.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, String>, body: B) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Response body.
    #[must_use]
    pub const fn body(&self) -> &B {
        &self.body
    }

    /// Consume into (status, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (u16, HashMap<String, String>, B) {
        (self.status, self.headers, self.body)
    }

    /// Status is within [`SUCCESS_STATUS`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= SUCCESS_STATUS.start && self.status < SUCCESS_STATUS.end
    }

    /// Transform the body with a function.
    pub fn map_body<F, B2>(self, f: F) -> Response<B2>
    where
        F: FnOnce(B) -> B2,
    {
        Response {
            status: self.status,
            headers: self.headers,
            body: f(self.body),
        }
    }
}

impl Response<Bytes> {
    /// Deserialize the response body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DecodingFailed`] if the body does not match `T`.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> crate::Result<T> {
        crate::from_json(&self.body)
    }

    /// Get the response body as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid UTF-8.
    pub fn text(self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.to_vec())
    }
}

/// A decoded body together with the response metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct SuccessResult<T> {
    value: T,
    status: u16,
    headers: HashMap<String, String>,
}

impl<T> SuccessResult<T> {
    /// Creates a success result.
    #[must_use]
    pub fn new(value: T, status: u16, headers: HashMap<String, String>) -> Self {
        Self {
            value,
            status,
            headers,
        }
    }

    /// Decoded body.
    #[must_use]
    pub const fn value(&self) -> &T {
        &self.value
    }

    /// Consume into the decoded body.
    #[must_use]
    pub fn into_value(self) -> T {
        self.value
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Transform the decoded value, keeping the metadata.
    pub fn map<U, F>(self, f: F) -> SuccessResult<U>
    where
        F: FnOnce(T) -> U,
    {
        SuccessResult {
            value: f(self.value),
            status: self.status,
            headers: self.headers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range_bounds() {
        for (status, expected) in [
            (199, false),
            (200, true),
            (204, true),
            (299, true),
            (300, false),
        ] {
            let response = Response::new(status, HashMap::new(), Bytes::new());
            assert_eq!(response.is_success(), expected, "status {status}");
        }
    }

    #[test]
    fn header_lookup_ignores_case() {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        let response = Response::new(200, headers, Bytes::new());

        assert_eq!(response.header("Content-Type"), Some("application/json"));
    }

    #[test]
    fn response_json() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct City {
            name: String,
        }

        let response = Response::new(200, HashMap::new(), Bytes::from(r#"{"name":"Istanbul"}"#));
        let city: City = response.json().expect("deserialize");
        assert_eq!(city.name, "Istanbul");
    }

    #[test]
    fn response_text() {
        let response = Response::new(200, HashMap::new(), Bytes::from("Hello, World!"));
        assert_eq!(response.text().expect("text"), "Hello, World!");
    }

    #[test]
    fn success_result_map_keeps_metadata() {
        let mut headers = HashMap::new();
        headers.insert("x-request-id".to_string(), "abc".to_string());

        let result = SuccessResult::new(vec![1, 2, 3], 201, headers).map(|v| v.len());

        assert_eq!(*result.value(), 3);
        assert_eq!(result.status(), 201);
        assert_eq!(result.header("X-Request-Id"), Some("abc"));
    }
}
