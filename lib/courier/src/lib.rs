//! Single-shot HTTP API client.
//!
//! Describe an endpoint once, merge configured default parameters into it,
//! and receive a typed result through a completion callback or a future.
//!
//! # Example
//!
//! ```ignore
//! use courier::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! let client = ApiClient::new(ClientConfig::default())?;
//! let endpoint = EndpointSpec::new(
//!     Method::Get,
//!     "users/42",
//!     Environment::new("https://api.example.com"),
//! );
//!
//! let user: SuccessResult<User> = client.fetch(&endpoint).await?;
//! ```

mod client;
mod config;
mod connector;
mod logging;
pub mod prelude;
mod queue;
mod transport;

pub use client::ApiClient;
pub use config::{ClientConfig, ClientConfigBuilder, ConfigError};
pub use connector::https_connector;
pub use logging::{LogLevel, Logging, LoggingLayer};
pub use queue::{CompletionQueue, Immediate, Job, MainQueue, MainQueueRunner, RuntimeQueue};
pub use transport::{BoxedService, HyperTransport, HyperTransportBuilder, ServiceFuture};

// Re-export tower for custom transport layers
pub use tower;

// Re-export core types
pub use courier_core::{
    BuildError, CachePolicy, DEFAULT_TIMEOUT, DefaultParameters, Endpoint, EndpointSpec,
    Environment, Error, Headers, JSON_CONTENT_TYPE, JsonEncoder, Method, ParameterEncoder,
    Parameters, Request, RequestBuilder, RequestFactory, Response, Result, SUCCESS_STATUS,
    SuccessResult, Transport, TransportError, UrlEncoder, Value, from_json, resolve, to_json,
    to_query_string,
};
