//! Request construction and response resolution for courier.
//!
//! This crate holds everything between an endpoint description and a typed
//! result, with no I/O of its own:
//! - [`Parameters`] and [`Value`] - loosely-typed parameter bags
//! - [`Environment`] - deployment target (base URL)
//! - [`Endpoint`] and [`EndpointSpec`] - endpoint descriptors
//! - [`UrlEncoder`] and [`JsonEncoder`] - [`ParameterEncoder`] strategies
//! - [`RequestFactory`] and [`DefaultParameters`] - request building
//! - [`Request`] and [`Response`] - wire-level types
//! - [`Transport`] - execution seam implemented by the HTTP stack
//! - [`resolve`] - status classification and body decoding
//! - [`Error`], [`BuildError`], [`TransportError`] - error taxonomy

mod body;
mod encoder;
mod endpoint;
mod environment;
mod error;
mod factory;
mod method;
mod outcome;
mod params;
pub mod prelude;
mod request;
mod response;
mod transport;

pub use body::{JSON_CONTENT_TYPE, from_json, to_json, to_query_string};
pub use encoder::{JsonEncoder, ParameterEncoder, UrlEncoder};
pub use endpoint::{Endpoint, EndpointSpec, Headers};
pub use environment::Environment;
pub use error::{BuildError, Error, Result, TransportError};
pub use factory::{DefaultParameters, RequestFactory};
pub use method::Method;
pub use outcome::resolve;
pub use params::{Parameters, Value};
pub use request::{CachePolicy, DEFAULT_TIMEOUT, Request, RequestBuilder};
pub use response::{Response, SUCCESS_STATUS, SuccessResult};
pub use transport::Transport;
