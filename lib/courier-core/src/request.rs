//! Wire-ready HTTP requests.
//!
//! [`Request`] is what a [`crate::Transport`] executes. It is normally produced
//! by [`crate::RequestFactory`], but can be assembled by hand:
//!
//! ```
//! use courier_core::{Method, Request};
//! use bytes::Bytes;
//!
//! let request = Request::<Bytes>::builder(Method::Get, "https://api.example.com".parse().unwrap())
//!     .header("Accept", "application/json")
//!     .query("page", "1")
//!     .build();
//! assert_eq!(request.url().query(), Some("page=1"));
//! ```

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;

use crate::{JSON_CONTENT_TYPE, Method};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Caching behaviour requested from the transport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CachePolicy {
    /// Always fetch fresh; ask intermediaries not to serve cached data.
    #[default]
    BypassCaches,
    /// Leave caching to the protocol defaults.
    ProtocolDefault,
}

/// An HTTP request with method, URL, headers, optional body and execution hints.
#[derive(Debug, Clone)]
pub struct Request<B = Bytes> {
    method: Method,
    url: url::Url,
    headers: HashMap<String, String>,
    body: Option<B>,
    timeout: Duration,
    cache_policy: CachePolicy,
}

impl<B> Request<B> {
    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(method: Method, url: url::Url) -> RequestBuilder<B> {
        RequestBuilder::new(method, url)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Absolute request URL, query string included.
    #[must_use]
    pub fn url(&self) -> &url::Url {
        &self.url
    }

    /// Request headers.
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

    /// Request body.
    #[must_use]
    pub const fn body(&self) -> Option<&B> {
        self.body.as_ref()
    }

    /// Time allowed for the whole exchange.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Requested caching behaviour.
    #[must_use]
    pub const fn cache_policy(&self) -> CachePolicy {
        self.cache_policy
    }

    /// Consume into (method, url, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (Method, url::Url, HashMap<String, String>, Option<B>) {
        (self.method, self.url, self.headers, self.body)
    }
}

/// Builder for constructing [`Request`] instances.
#[derive(Debug, Clone)]
pub struct RequestBuilder<B = Bytes> {
    method: Method,
    url: url::Url,
    headers: HashMap<String, String>,
    body: Option<B>,
    timeout: Duration,
    cache_policy: CachePolicy,
}

impl<B> RequestBuilder<B> {
    /// Creates a new builder with [`DEFAULT_TIMEOUT`] and [`CachePolicy::BypassCaches`].
    #[must_use]
    pub fn new(method: Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: HashMap::new(),
            body: None,
            timeout: DEFAULT_TIMEOUT,
            cache_policy: CachePolicy::default(),
        }
    }

    /// Current URL.
    #[must_use]
    pub fn url(&self) -> &url::Url {
        &self.url
    }

    /// Mutable access to the URL.
    pub fn url_mut(&mut self) -> &mut url::Url {
        &mut self.url
    }

    /// Sets a header, replacing any previous value with the same name.
    ///
    /// Names compare case-insensitively.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(name.into(), value.into());
        self
    }

    /// Sets multiple headers.
    #[must_use]
    pub fn headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        for (name, value) in headers {
            self.set_header(name, value);
        }
        self
    }

    fn set_header(&mut self, name: String, value: String) {
        self.headers.retain(|key, _| !key.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value);
    }

    /// Appends a query parameter to the URL.
    #[must_use]
    pub fn query(mut self, name: &str, value: &str) -> Self {
        self.url.query_pairs_mut().append_pair(name, value);
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: B) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the cache policy.
    #[must_use]
    pub const fn cache_policy(mut self, cache_policy: CachePolicy) -> Self {
        self.cache_policy = cache_policy;
        self
    }

    /// Builds the [`Request`].
    #[must_use]
    pub fn build(self) -> Request<B> {
        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
            timeout: self.timeout,
            cache_policy: self.cache_policy,
        }
    }
}

impl RequestBuilder<Bytes> {
    /// Set a JSON body and its `Content-Type`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn json<T: serde::Serialize>(self, value: &T) -> Result<Self, crate::BuildError> {
        let body = crate::to_json(value)?;
        Ok(self
            .header("Content-Type", JSON_CONTENT_TYPE)
            .body(body))
    }
}
