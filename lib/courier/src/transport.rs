//! Default transport using hyper-util.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use tower::util::BoxCloneService;
use tower::{Layer, ServiceExt};
use tower_service::Service;

use courier_core::{CachePolicy, Request, Response, Transport, TransportError};

use crate::{ClientConfig, LoggingLayer, connector::https_connector};

// ============================================================================
// Type-Erased Service for Middleware Composition
// ============================================================================

/// Type-erased transport service, the unit that layers wrap.
pub type BoxedService = BoxCloneService<Request, Response, TransportError>;

/// Future type for Tower Service implementation.
pub type ServiceFuture =
    Pin<Box<dyn Future<Output = Result<Response, TransportError>> + Send + 'static>>;

/// Makes a [`BoxedService`] `Sync` so the transport can be shared.
#[derive(Clone)]
struct SyncService {
    inner: Arc<Mutex<BoxedService>>,
}

impl SyncService {
    fn new(service: BoxedService) -> Self {
        Self {
            inner: Arc::new(Mutex::new(service)),
        }
    }

    fn call(&self, request: Request) -> ServiceFuture {
        // Clone out of the lock so concurrent calls never wait on each other
        let service = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();

        Box::pin(service.oneshot(request))
    }
}

// ============================================================================
// Raw Transport
// ============================================================================

#[derive(Clone)]
struct RawHyperTransport {
    inner: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
}

impl RawHyperTransport {
    fn new(connect_timeout: Duration) -> Self {
        let inner = Client::builder(TokioExecutor::new()).build(https_connector(connect_timeout));
        Self { inner }
    }

    fn build_hyper_request(
        request: Request,
    ) -> Result<(http::Request<Full<Bytes>>, Duration), TransportError> {
        let timeout = request.timeout();
        let cache_policy = request.cache_policy();
        let (method, url, headers, body) = request.into_parts();

        let mut builder = http::Request::builder()
            .method(http::Method::from(method))
            .uri(url.as_str());

        let has_cache_control = headers
            .keys()
            .any(|name| name.eq_ignore_ascii_case("cache-control"));
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if cache_policy == CachePolicy::BypassCaches && !has_cache_control {
            builder = builder.header(http::header::CACHE_CONTROL, "no-cache");
        }

        let body = body.map_or_else(Full::default, Full::new);
        let http_request = builder
            .body(body)
            .map_err(|e| TransportError::Rejected(e.to_string()))?;

        Ok((http_request, timeout))
    }

    fn extract_headers(headers: &http::HeaderMap) -> HashMap<String, String> {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect()
    }

    async fn execute(&self, request: Request) -> Result<Response, TransportError> {
        let (hyper_request, timeout) = Self::build_hyper_request(request)?;

        let exchange = async {
            let response = self
                .inner
                .request(hyper_request)
                .await
                .map_err(Self::map_hyper_error)?;

            let status = response.status().as_u16();
            let headers = Self::extract_headers(response.headers());
            let body = response
                .into_body()
                .collect()
                .await
                .map_err(|e| TransportError::connection(e.to_string()))?
                .to_bytes();

            Ok(Response::new(status, headers, body))
        };

        tokio::time::timeout(timeout, exchange)
            .await
            .map_err(|_| TransportError::Timeout)?
    }

    #[allow(clippy::needless_pass_by_value)]
    fn map_hyper_error(err: hyper_util::client::legacy::Error) -> TransportError {
        let msg = error_chain(&err);

        if is_tls_failure(&err) {
            return TransportError::Tls(msg);
        }

        TransportError::connection(msg)
    }
}

/// Whether a [`rustls::Error`] sits anywhere in the source chain of `err`.
///
/// TLS failures reach us wrapped in an [`std::io::Error`], whose `source()`
/// skips the wrapped error, so those are unwrapped explicitly.
fn is_tls_failure(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(err) = current {
        if err.is::<rustls::Error>() {
            return true;
        }
        if let Some(io) = err.downcast_ref::<std::io::Error>()
            && io.get_ref().is_some_and(|inner| inner.is::<rustls::Error>())
        {
            return true;
        }
        current = err.source();
    }
    false
}

/// `err` followed by each of its sources, separated by `": "`.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut msg = err.to_string();
    let mut current = err.source();
    while let Some(err) = current {
        msg.push_str(": ");
        msg.push_str(&err.to_string());
        current = err.source();
    }
    msg
}

impl Service<Request> for RawHyperTransport {
    type Response = Response;
    type Error = TransportError;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), TransportError>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let transport = self.clone();
        Box::pin(async move { transport.execute(request).await })
    }
}

// ============================================================================
// Public Transport
// ============================================================================

/// HTTP transport over hyper-util with rustls TLS.
///
/// The whole exchange, body included, is bounded by [`Request::timeout`].
/// With [`CachePolicy::BypassCaches`] a `Cache-Control: no-cache` header is
/// sent unless the request already carries a `Cache-Control` header.
///
/// # Example
///
/// ```ignore
/// use courier::HyperTransport;
///
/// let transport = HyperTransport::builder()
///     .connect_timeout(std::time::Duration::from_secs(3))
///     .with_logging()
///     .build();
/// ```
#[derive(Clone)]
pub struct HyperTransport {
    service: SyncService,
    connect_timeout: Duration,
}

impl std::fmt::Debug for HyperTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransport")
            .field("connect_timeout", &self.connect_timeout)
            .finish_non_exhaustive()
    }
}

impl HyperTransport {
    /// Create a transport with default settings and no layers.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create the transport described by a [`ClientConfig`].
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        let builder = Self::builder().connect_timeout(config.connect_timeout);
        if config.log_requests {
            builder.with_logging().build()
        } else {
            builder.build()
        }
    }

    /// Create a new transport builder.
    #[must_use]
    pub fn builder() -> HyperTransportBuilder {
        HyperTransportBuilder::default()
    }

    /// Connection timeout.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HyperTransport {
    fn execute(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<Response, TransportError>> + Send {
        self.service.call(request)
    }
}

/// Builder for [`HyperTransport`].
#[derive(Default)]
pub struct HyperTransportBuilder {
    connect_timeout: Option<Duration>,
    layers: Vec<Arc<dyn Fn(BoxedService) -> BoxedService + Send + Sync>>,
}

impl std::fmt::Debug for HyperTransportBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransportBuilder")
            .field("connect_timeout", &self.connect_timeout)
            .field("layers_count", &self.layers.len())
            .finish()
    }
}

impl HyperTransportBuilder {
    /// Set the connection timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Add a Tower layer around the transport.
    ///
    /// Layers are applied in order: first added = innermost.
    #[must_use]
    pub fn layer<L>(mut self, layer: L) -> Self
    where
        L: Layer<BoxedService> + Send + Sync + 'static,
        L::Service: Service<Request, Response = Response, Error = TransportError>
            + Clone
            + Send
            + 'static,
        <L::Service as Service<Request>>::Future: Send,
    {
        self.layers.push(Arc::new(move |service| {
            BoxCloneService::new(layer.layer(service))
        }));
        self
    }

    /// Add request/response logging at info level.
    #[must_use]
    pub fn with_logging(self) -> Self {
        self.layer(LoggingLayer::new())
    }

    /// Add request/response logging at debug level (includes headers).
    #[must_use]
    pub fn with_debug_logging(self) -> Self {
        self.layer(LoggingLayer::debug())
    }

    /// Build the transport.
    #[must_use]
    pub fn build(self) -> HyperTransport {
        let connect_timeout = self
            .connect_timeout
            .unwrap_or_else(|| ClientConfig::default().connect_timeout);

        let mut service: BoxedService =
            BoxCloneService::new(RawHyperTransport::new(connect_timeout));
        for layer_fn in self.layers {
            service = layer_fn(service);
        }

        HyperTransport {
            service: SyncService::new(service),
            connect_timeout,
        }
    }
}
