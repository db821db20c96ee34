//! Endpoint descriptors.
//!
//! An [`Endpoint`] describes one logical API call. Implement it on your own
//! request types, or use [`EndpointSpec`] directly.
//!
//! # Example
//!
//! ```
//! use std::borrow::Cow;
//!
//! use courier_core::{Endpoint, Environment, Method, Parameters};
//!
//! enum Forecast {
//!     ByCity(String),
//!     ByCoordinates { lat: f64, lon: f64 },
//! }
//!
//! impl Endpoint for Forecast {
//!     fn path(&self) -> Cow<'_, str> {
//!         Cow::Borrowed("forecast")
//!     }
//!
//!     fn method(&self) -> Method {
//!         Method::Get
//!     }
//!
//!     fn url_parameters(&self) -> Option<Parameters> {
//!         let params = match self {
//!             Self::ByCity(city) => Parameters::new().with("q", city.as_str()),
//!             Self::ByCoordinates { lat, lon } => {
//!                 Parameters::new().with("lat", *lat).with("lon", *lon)
//!             }
//!         };
//!         Some(params.with("units", "metric"))
//!     }
//!
//!     fn environment(&self) -> Environment {
//!         Environment::new("https://api.openweathermap.org/data/2.5/")
//!     }
//! }
//! ```

use std::borrow::Cow;
use std::collections::HashMap;

use crate::{Environment, Method, Parameters};

/// Header name to value mapping.
pub type Headers = HashMap<String, String>;

/// Description of one API call.
///
/// Only [`Endpoint::path`], [`Endpoint::method`] and [`Endpoint::environment`]
/// are required; headers and parameter bags default to absent.
pub trait Endpoint: Send + Sync {
    /// Path relative to the environment base URL.
    fn path(&self) -> Cow<'_, str>;

    /// HTTP method.
    fn method(&self) -> Method;

    /// Headers applied verbatim to the request.
    fn headers(&self) -> Option<Headers> {
        None
    }

    /// Query string parameters.
    fn url_parameters(&self) -> Option<Parameters> {
        None
    }

    /// JSON body parameters.
    fn body_parameters(&self) -> Option<Parameters> {
        None
    }

    /// Target environment.
    fn environment(&self) -> Environment;
}

impl<E: Endpoint + ?Sized> Endpoint for &E {
    fn path(&self) -> Cow<'_, str> {
        (**self).path()
    }

    fn method(&self) -> Method {
        (**self).method()
    }

    fn headers(&self) -> Option<Headers> {
        (**self).headers()
    }

    fn url_parameters(&self) -> Option<Parameters> {
        (**self).url_parameters()
    }

    fn body_parameters(&self) -> Option<Parameters> {
        (**self).body_parameters()
    }

    fn environment(&self) -> Environment {
        (**self).environment()
    }
}

/// Owned, concrete [`Endpoint`].
///
/// Also used as the snapshot of the called endpoint carried by
/// [`crate::Error::InvalidStatusCode`].
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointSpec {
    method: Method,
    path: String,
    headers: Option<Headers>,
    url_parameters: Option<Parameters>,
    body_parameters: Option<Parameters>,
    environment: Environment,
}

impl EndpointSpec {
    /// Creates an endpoint without headers or parameters.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>, environment: Environment) -> Self {
        Self {
            method,
            path: path.into(),
            headers: None,
            url_parameters: None,
            body_parameters: None,
            environment,
        }
    }

    /// Snapshots any endpoint.
    #[must_use]
    pub fn capture<E: Endpoint + ?Sized>(endpoint: &E) -> Self {
        Self {
            method: endpoint.method(),
            path: endpoint.path().into_owned(),
            headers: endpoint.headers(),
            url_parameters: endpoint.url_parameters(),
            body_parameters: endpoint.body_parameters(),
            environment: endpoint.environment(),
        }
    }

    /// Sets a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(Headers::new)
            .insert(name.into(), value.into());
        self
    }

    /// Sets a query parameter, creating the URL bag if needed.
    #[must_use]
    pub fn url_parameter(
        mut self,
        key: impl Into<String>,
        value: impl Into<crate::Value>,
    ) -> Self {
        self.url_parameters
            .get_or_insert_with(Parameters::new)
            .insert(key, value);
        self
    }

    /// Replaces the URL bag.
    #[must_use]
    pub fn with_url_parameters(mut self, parameters: Parameters) -> Self {
        self.url_parameters = Some(parameters);
        self
    }

    /// Sets a body parameter, creating the body bag if needed.
    #[must_use]
    pub fn body_parameter(
        mut self,
        key: impl Into<String>,
        value: impl Into<crate::Value>,
    ) -> Self {
        self.body_parameters
            .get_or_insert_with(Parameters::new)
            .insert(key, value);
        self
    }

    /// Replaces the body bag.
    #[must_use]
    pub fn with_body_parameters(mut self, parameters: Parameters) -> Self {
        self.body_parameters = Some(parameters);
        self
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Relative path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Headers, if any were set.
    #[must_use]
    pub const fn headers(&self) -> Option<&Headers> {
        self.headers.as_ref()
    }

    /// Target environment.
    #[must_use]
    pub const fn environment(&self) -> &Environment {
        &self.environment
    }
}

impl Endpoint for EndpointSpec {
    fn path(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.path)
    }

    fn method(&self) -> Method {
        self.method
    }

    fn headers(&self) -> Option<Headers> {
        self.headers.clone()
    }

    fn url_parameters(&self) -> Option<Parameters> {
        self.url_parameters.clone()
    }

    fn body_parameters(&self) -> Option<Parameters> {
        self.body_parameters.clone()
    }

    fn environment(&self) -> Environment {
        self.environment.clone()
    }
}
