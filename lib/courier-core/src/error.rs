//! Error types for courier.
//!
//! Three layers of failure are kept apart:
//! - [`BuildError`]: the endpoint could not be turned into a [`crate::Request`].
//! - [`TransportError`]: the transport could not produce a response.
//! - [`Error`]: the closed set delivered to callers for every failed call.

use bytes::Bytes;
use derive_more::{Display, Error, From};

use crate::EndpointSpec;

// ============================================================================
// Build Errors
// ============================================================================

/// Failure while building a request from an endpoint.
#[derive(Debug, Display, Error, From)]
pub enum BuildError {
    /// The environment base URL does not parse as an absolute URL.
    #[display("invalid base URL '{base_url}': {source}")]
    #[from(skip)]
    InvalidBaseUrl {
        /// The offending base URL string.
        base_url: String,
        /// Parser diagnostic.
        source: url::ParseError,
    },

    /// The environment base URL parses but cannot carry a path (e.g. `mailto:`).
    #[display("base URL '{base_url}' cannot carry a path")]
    #[from(skip)]
    CannotBeABase {
        /// The offending base URL string.
        base_url: String,
    },

    /// The endpoint path contains a `.` or `..` segment.
    #[display("path '{path}' contains a dot segment")]
    #[from(skip)]
    InvalidPath {
        /// The offending endpoint path.
        path: String,
    },

    /// A header name or value cannot be carried over HTTP.
    #[display("invalid header '{name}': {reason}")]
    #[from(skip)]
    InvalidHeader {
        /// The offending header name.
        name: String,
        /// Why the header was rejected.
        reason: String,
    },

    /// Method name not supported by the client.
    #[display("unsupported HTTP method: {_0}")]
    #[from(skip)]
    UnsupportedMethod(#[error(not(source))] String),

    /// Parameters could not be serialized.
    #[display("parameter encoding failed: {_0}")]
    #[from(skip)]
    Encoding(#[error(not(source))] String),
}

impl BuildError {
    /// Returns `true` if the environment base URL was rejected.
    #[must_use]
    pub const fn is_invalid_base_url(&self) -> bool {
        matches!(self, Self::InvalidBaseUrl { .. } | Self::CannotBeABase { .. })
    }
}

impl From<serde_json::Error> for BuildError {
    fn from(err: serde_json::Error) -> Self {
        Self::Encoding(err.to_string())
    }
}

impl From<serde_html_form::ser::Error> for BuildError {
    fn from(err: serde_html_form::ser::Error) -> Self {
        Self::Encoding(err.to_string())
    }
}

// ============================================================================
// Transport Errors
// ============================================================================

/// Failure reported by a [`crate::Transport`] before any response was available.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum TransportError {
    /// Network/connection errors (DNS, refused, reset).
    #[display("connection error: {_0}")]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    Tls(#[error(not(source))] String),

    /// The request exceeded its timeout.
    #[display("request timeout")]
    Timeout,

    /// The transport refused the request before sending it.
    #[display("request rejected by transport: {_0}")]
    Rejected(#[error(not(source))] String),
}

impl TransportError {
    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Returns `true` if this is a timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

// ============================================================================
// Error Type
// ============================================================================

/// Outcome of a failed call.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// The request could not be built; no network call was made.
    #[display("invalid request: {_0}")]
    #[from]
    InvalidRequest(BuildError),

    /// Transport-level failure (connectivity, DNS, timeout).
    #[display("{_0}")]
    #[from(skip)]
    Custom(#[error(not(source))] String),

    /// The server answered with a status outside `200..300`.
    #[display("invalid status code {status} for {} {}", request.method(), request.path())]
    #[from(skip)]
    InvalidStatusCode {
        /// HTTP status code.
        status: u16,
        /// Raw response body, if the server sent one.
        #[error(not(source))]
        body: Option<Bytes>,
        /// Snapshot of the endpoint that was called.
        #[error(not(source))]
        request: Box<EndpointSpec>,
    },

    /// The body of a successful response did not match the expected type.
    #[display("decoding failed at '{path}': {message}")]
    #[from(skip)]
    DecodingFailed {
        /// JSON path to the failing field (empty for syntax errors).
        path: String,
        /// Decoder diagnostic.
        message: String,
    },
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl From<TransportError> for Error {
    fn from(err: TransportError) -> Self {
        Self::Custom(err.to_string())
    }
}

impl Error {
    /// Create a custom (transport-level) error.
    #[must_use]
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }

    /// Create a decoding error.
    #[must_use]
    pub fn decoding_failed(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DecodingFailed {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if the environment base URL was rejected.
    #[must_use]
    pub const fn is_invalid_base_url(&self) -> bool {
        match self {
            Self::InvalidRequest(err) => err.is_invalid_base_url(),
            _ => false,
        }
    }

    /// Returns `true` if the body could not be decoded.
    #[must_use]
    pub const fn is_decoding_failed(&self) -> bool {
        matches!(self, Self::DecodingFailed { .. })
    }

    /// Returns the HTTP status code if the server answered with one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::InvalidStatusCode { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the raw error response body, if any.
    #[must_use]
    pub fn body(&self) -> Option<&Bytes> {
        match self {
            Self::InvalidStatusCode { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Returns the endpoint snapshot of an [`Error::InvalidStatusCode`].
    #[must_use]
    pub fn request(&self) -> Option<&EndpointSpec> {
        match self {
            Self::InvalidStatusCode { request, .. } => Some(request),
            _ => None,
        }
    }

    /// Whether repeating the same call could succeed.
    ///
    /// Transport failures, 5xx and 429 are retryable; build and decoding
    /// failures are not.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Custom(_) => true,
            Self::InvalidStatusCode { status, .. } => *status >= 500 || *status == 429,
            Self::InvalidRequest(_) | Self::DecodingFailed { .. } => false,
        }
    }

    /// Decode the server-provided error payload as JSON.
    ///
    /// Returns `None` when there is no error body.
    ///
    /// # Example
    ///
    /// ```ignore
    /// #[derive(Debug, Deserialize)]
    /// struct ApiError {
    ///     cod: String,
    ///     message: String,
    /// }
    ///
    /// if let Some(Ok(api_error)) = err.decode_body::<ApiError>() {
    ///     eprintln!("{}: {}", api_error.cod, api_error.message);
    /// }
    /// ```
    pub fn decode_body<T: serde::de::DeserializeOwned>(&self) -> Option<Result<T>> {
        self.body().map(|body| crate::from_json(body))
    }
}
