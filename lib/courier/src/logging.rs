//! Request/response logging layer.
//!
//! Wraps a transport service and records each exchange with `tracing`.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use tower::Layer;
use tower_service::Service;
use tracing::{Instrument, Level, debug, info, span, warn};

use courier_core::{Request, Response, TransportError};

/// Layer that adds request/response logging to a transport.
///
/// # Example
///
/// ```ignore
/// use courier::{HyperTransport, LoggingLayer};
///
/// let transport = HyperTransport::builder()
///     .layer(LoggingLayer::debug())
///     .build();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer {
    level: LogLevel,
}

/// Verbosity of [`LoggingLayer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Method, URL and request headers at debug level.
    Debug,
    /// Method and URL at info level.
    #[default]
    Info,
}

impl LoggingLayer {
    /// Create a new logging layer with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a logging layer that logs at debug level.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            level: LogLevel::Debug,
        }
    }

    /// The configured verbosity.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging {
            inner,
            level: self.level,
        }
    }
}

/// Service produced by [`LoggingLayer`].
#[derive(Debug, Clone)]
pub struct Logging<S> {
    inner: S,
    level: LogLevel,
}

impl<S> Service<Request> for Logging<S>
where
    S: Service<Request, Response = Response, Error = TransportError> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = TransportError;
    type Future = Pin<Box<dyn Future<Output = Result<Response, TransportError>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), TransportError>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let method = request.method();
        let url = request.url().to_string();
        let level = self.level;

        let span = span!(Level::INFO, "http_request", %method, %url);

        // The readied service handles this call, a fresh clone waits for the next one
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(
            async move {
                let start = Instant::now();

                let timeout_ms = u64::try_from(request.timeout().as_millis()).unwrap_or(u64::MAX);
                match level {
                    LogLevel::Debug => {
                        debug!(headers = ?request.headers(), timeout_ms, "sending request");
                    }
                    LogLevel::Info => info!("sending request"),
                }

                let result = inner.call(request).await;
                let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

                match &result {
                    Ok(response) if response.is_success() => {
                        info!(status = response.status(), elapsed_ms, "request completed");
                    }
                    Ok(response) => {
                        let status = response.status();
                        warn!(status, elapsed_ms, "request failed with HTTP error");
                    }
                    Err(err) => {
                        warn!(error = %err, elapsed_ms, "request failed");
                    }
                }

                result
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use bytes::Bytes;
    use courier_core::Method;
    use tower::ServiceExt;

    use super::*;

    #[test]
    fn default_level_is_info() {
        assert_eq!(LoggingLayer::new().level(), LogLevel::Info);
        assert_eq!(LoggingLayer::debug().level(), LogLevel::Debug);
    }

    #[tokio::test]
    async fn passes_responses_through() {
        let inner = tower::service_fn(|_request: Request| async {
            Ok::<_, TransportError>(Response::new(
                418,
                HashMap::new(),
                Bytes::from_static(b"teapot"),
            ))
        });
        let service = LoggingLayer::debug().layer(inner);
        let url = url::Url::parse("https://api.example.com/tea").expect("url");

        let response = service
            .oneshot(Request::builder(Method::Get, url).build())
            .await
            .expect("response");

        assert_eq!(response.status(), 418);
        assert_eq!(&response.body()[..], b"teapot");
    }

    #[tokio::test]
    async fn passes_errors_through() {
        let inner = tower::service_fn(|_request: Request| async {
            Err::<Response, _>(TransportError::Timeout)
        });
        let service = LoggingLayer::new().layer(inner);
        let url = url::Url::parse("https://api.example.com/slow").expect("url");

        let err = service
            .oneshot(Request::builder(Method::Get, url).build())
            .await
            .expect_err("timeout");

        assert!(err.is_timeout());
    }

    /// Answers 204 only when `poll_ready` ran on this very instance.
    #[derive(Clone, Default)]
    struct ReadyGate {
        ready: bool,
    }

    impl Service<Request> for ReadyGate {
        type Response = Response;
        type Error = TransportError;
        type Future = std::future::Ready<Result<Response, TransportError>>;

        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), TransportError>> {
            self.ready = true;
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, _request: Request) -> Self::Future {
            std::future::ready(if std::mem::take(&mut self.ready) {
                Ok(Response::new(204, HashMap::new(), Bytes::new()))
            } else {
                Err(TransportError::Rejected("called before poll_ready".to_string()))
            })
        }
    }

    #[tokio::test]
    async fn inner_service_is_called_once_ready() {
        let mut service = LoggingLayer::new().layer(ReadyGate::default());
        let url = url::Url::parse("https://api.example.com/ready").expect("url");

        for _ in 0..2 {
            let response = service
                .ready()
                .await
                .expect("ready")
                .call(Request::builder(Method::Get, url.clone()).build())
                .await
                .expect("inner service was ready");
            assert_eq!(response.status(), 204);
        }
    }
}
