//! Turning endpoints into wire-ready requests.
//!
//! [`RequestFactory::build`] is the only place where defaults meet call-site
//! parameters. The steps run in a fixed order:
//!
//! 1. parse the environment base URL and append the endpoint path,
//! 2. set method, timeout and cache policy,
//! 3. check and apply the endpoint headers,
//! 4. merge and encode the body bag (JSON),
//! 5. merge and encode the URL bag (query string).
//!
//! Because headers come before encoding, an endpoint-supplied `Content-Type`
//! is replaced by the JSON encoder whenever a body bag is present.

use std::time::Duration;

use url::Url;

use crate::{
    BuildError, CachePolicy, DEFAULT_TIMEOUT, Endpoint, JsonEncoder, ParameterEncoder, Parameters,
    Request, UrlEncoder,
};

/// Parameters merged into every request built by a [`RequestFactory`].
///
/// A default bag only affects requests whose endpoint supplies the same kind
/// of bag; defaults never add a query string or a body on their own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefaultParameters {
    /// Merged into every URL bag.
    pub url: Option<Parameters>,
    /// Merged into every body bag.
    pub body: Option<Parameters>,
}

impl DefaultParameters {
    /// No defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default URL parameters.
    #[must_use]
    pub fn with_url(mut self, parameters: Parameters) -> Self {
        self.url = Some(parameters);
        self
    }

    /// Sets the default body parameters.
    #[must_use]
    pub fn with_body(mut self, parameters: Parameters) -> Self {
        self.body = Some(parameters);
        self
    }
}

/// Builds [`Request`]s from [`Endpoint`]s.
#[derive(Debug, Clone, Default)]
pub struct RequestFactory {
    defaults: DefaultParameters,
    timeout: Option<Duration>,
    cache_policy: CachePolicy,
}

impl RequestFactory {
    /// Creates a factory with the given defaults, a 10 second timeout and
    /// [`CachePolicy::BypassCaches`].
    #[must_use]
    pub fn new(defaults: DefaultParameters) -> Self {
        Self {
            defaults,
            ..Self::default()
        }
    }

    /// Overrides the timeout applied to every request.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Overrides the cache policy applied to every request.
    #[must_use]
    pub const fn with_cache_policy(mut self, cache_policy: CachePolicy) -> Self {
        self.cache_policy = cache_policy;
        self
    }

    /// The configured defaults.
    #[must_use]
    pub const fn defaults(&self) -> &DefaultParameters {
        &self.defaults
    }

    /// Timeout applied to every request.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Builds the request for `endpoint`.
    ///
    /// # Errors
    ///
    /// - [`BuildError::InvalidBaseUrl`] / [`BuildError::CannotBeABase`] if the
    ///   environment base URL is unusable,
    /// - [`BuildError::InvalidPath`] if the path has a `.` or `..` segment,
    /// - [`BuildError::InvalidHeader`] if a header cannot be sent over HTTP,
    /// - [`BuildError::Encoding`] if a parameter bag cannot be serialized.
    pub fn build<E: Endpoint + ?Sized>(&self, endpoint: &E) -> Result<Request, BuildError> {
        let url = endpoint_url(endpoint)?;

        let mut request = Request::builder(endpoint.method(), url)
            .timeout(self.timeout())
            .cache_policy(self.cache_policy);

        if let Some(headers) = endpoint.headers() {
            for (name, value) in &headers {
                validate_header(name, value)?;
            }
            request = request.headers(headers);
        }

        if let Some(mut body) = endpoint.body_parameters() {
            if let Some(defaults) = &self.defaults.body {
                body.overlay(defaults);
            }
            request = JsonEncoder.encode(request, &body)?;
        }

        if let Some(mut query) = endpoint.url_parameters() {
            if let Some(defaults) = &self.defaults.url {
                query.overlay(defaults);
            }
            request = UrlEncoder.encode(request, &query)?;
        }

        Ok(request.build())
    }
}

/// Base URL of the endpoint environment with the endpoint path appended as
/// path segments.
fn endpoint_url<E: Endpoint + ?Sized>(endpoint: &E) -> Result<Url, BuildError> {
    let environment = endpoint.environment();
    let mut url = environment.parse()?;
    let path = endpoint.path();
    let path = path.trim_matches('/');

    if path.split('/').any(|segment| segment == "." || segment == "..") {
        return Err(BuildError::InvalidPath {
            path: path.to_string(),
        });
    }

    if !path.is_empty() {
        let Ok(mut segments) = url.path_segments_mut() else {
            return Err(BuildError::CannotBeABase {
                base_url: environment.base_url().to_string(),
            });
        };
        segments.pop_if_empty().extend(path.split('/'));
    }

    Ok(url)
}

fn validate_header(name: &str, value: &str) -> Result<(), BuildError> {
    let invalid = |reason: String| BuildError::InvalidHeader {
        name: name.to_string(),
        reason,
    };
    http::HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
    http::HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
    Ok(())
}
