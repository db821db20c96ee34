//! Transport abstraction.
//!
//! A [`Transport`] executes one [`Request`] and hands back the buffered
//! [`Response`]. Implement it to plug in another HTTP stack, or a spy in tests.

use std::future::Future;

use crate::{Request, Response, TransportError};

/// Executes wire-ready requests.
///
/// Implementations must honour [`Request::timeout`] and report it as
/// [`TransportError::Timeout`]. A non-2xx status is not an error at this
/// level: it is returned as a normal [`Response`].
pub trait Transport: Clone + Send + Sync + 'static {
    /// Execute an HTTP request and return the response.
    ///
    /// # Errors
    ///
    /// Returns an error if no response could be obtained:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    fn execute(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<Response, TransportError>> + Send;
}
