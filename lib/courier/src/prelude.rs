//! Prelude module for convenient imports.
//!
//! ```ignore
//! use courier::prelude::*;
//! ```

pub use crate::{
    ApiClient, ClientConfig, CompletionQueue, DefaultParameters, Endpoint, EndpointSpec,
    Environment, Error, Headers, Immediate, MainQueue, Method, Parameters, Result, SuccessResult,
    Transport, Value,
};
pub use serde::{Deserialize, Serialize};
