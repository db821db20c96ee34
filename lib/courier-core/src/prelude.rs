//! Prelude module for convenient imports.
//!
//! ```ignore
//! use courier_core::prelude::*;
//! ```

pub use crate::{
    DefaultParameters, Endpoint, EndpointSpec, Environment, Error, Headers, Method, Parameters,
    Request, RequestFactory, Response, Result, SuccessResult, Transport, TransportError, Value,
};
