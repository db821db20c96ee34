//! The API client.
//!
//! [`ApiClient`] ties a [`RequestFactory`], a [`Transport`] and a
//! [`CompletionQueue`] together. A call goes through four stages:
//!
//! 1. the endpoint is built into a [`Request`] with the configured defaults,
//! 2. the request is spawned on the Tokio runtime and executed,
//! 3. the outcome is classified by [`resolve`],
//! 4. the completion receives the result on its queue, exactly once.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::runtime::Handle;
use tracing::{debug, warn};

use courier_core::{
    BuildError, Endpoint, EndpointSpec, Error, Request, RequestFactory, Result, SuccessResult,
    Transport, resolve,
};

use crate::{ClientConfig, CompletionQueue, ConfigError, HyperTransport, Immediate};

/// Message delivered when a call ends without producing an outcome.
const NO_RESPONSE: &str = "no response";

/// Client executing [`Endpoint`] calls.
///
/// The client is cheap to clone; clones share the transport, the defaults
/// and the completion queue.
///
/// # Example
///
/// ```ignore
/// use courier::prelude::*;
///
/// #[derive(Debug, Deserialize)]
/// struct Forecast {
///     name: String,
/// }
///
/// let config = ClientConfig::builder()
///     .default_parameters(
///         DefaultParameters::new().with_url(Parameters::from([("appid", "secret")])),
///     )
///     .build();
/// let client = ApiClient::new(config)?;
///
/// let endpoint = EndpointSpec::new(
///     Method::Get,
///     "weather",
///     Environment::new("https://api.openweathermap.org/data/2.5"),
/// )
/// .url_parameter("q", "Istanbul");
///
/// client.request(&endpoint, |result: courier::Result<SuccessResult<Forecast>>| {
///     match result {
///         Ok(forecast) => println!("{}", forecast.value().name),
///         Err(err) => eprintln!("{err}"),
///     }
/// });
/// ```
pub struct ApiClient<T: Transport = HyperTransport> {
    transport: T,
    factory: Arc<RequestFactory>,
    runtime: Handle,
    queue: Arc<dyn CompletionQueue>,
}

impl<T: Transport> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            factory: Arc::clone(&self.factory),
            runtime: self.runtime.clone(),
            queue: Arc::clone(&self.queue),
        }
    }
}

impl<T: Transport> fmt::Debug for ApiClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("factory", &self.factory)
            .finish_non_exhaustive()
    }
}

impl ApiClient<HyperTransport> {
    /// Create a client over [`HyperTransport`] on the current Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoRuntime`] when called outside a Tokio runtime.
    pub fn new(config: ClientConfig) -> std::result::Result<Self, ConfigError> {
        let runtime = Handle::try_current().map_err(|_| ConfigError::NoRuntime)?;
        let transport = HyperTransport::from_config(&config);
        Ok(Self::with_runtime(transport, config, runtime))
    }
}

impl<T: Transport> ApiClient<T> {
    /// Create a client over `transport` on the current Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoRuntime`] when called outside a Tokio runtime.
    pub fn with_transport(
        transport: T,
        config: ClientConfig,
    ) -> std::result::Result<Self, ConfigError> {
        let runtime = Handle::try_current().map_err(|_| ConfigError::NoRuntime)?;
        Ok(Self::with_runtime(transport, config, runtime))
    }

    /// Create a client that spawns its calls on `runtime`.
    ///
    /// Usable from threads that are not part of any runtime.
    #[must_use]
    pub fn with_runtime(transport: T, config: ClientConfig, runtime: Handle) -> Self {
        Self {
            transport,
            factory: Arc::new(config.request_factory()),
            runtime,
            queue: Arc::new(Immediate),
        }
    }

    /// Replace the queue used by [`ApiClient::request`].
    #[must_use]
    pub fn with_completion_queue(mut self, queue: impl CompletionQueue) -> Self {
        self.queue = Arc::new(queue);
        self
    }

    /// The underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// The factory turning endpoints into requests.
    #[must_use]
    pub fn factory(&self) -> &RequestFactory {
        &self.factory
    }

    /// Build the request `endpoint` would send, without sending it.
    pub fn build_request<E: Endpoint + ?Sized>(
        &self,
        endpoint: &E,
    ) -> std::result::Result<Request, BuildError> {
        self.factory.build(endpoint)
    }

    /// Execute `endpoint` and decode a 2xx body as `R`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidRequest`] if the request cannot be built,
    /// - [`Error::Custom`] if the transport fails,
    /// - [`Error::InvalidStatusCode`] for a status outside `200..300`,
    /// - [`Error::DecodingFailed`] if the body does not match `R`.
    pub async fn fetch<R, E>(&self, endpoint: &E) -> Result<SuccessResult<R>>
    where
        R: DeserializeOwned,
        E: Endpoint + ?Sized,
    {
        let spec = EndpointSpec::capture(endpoint);
        let request = self.prepare(&spec)?;
        perform(&self.transport, request, &spec).await
    }

    /// Execute `endpoint` in the background and hand the result to `completion`
    /// on the client's completion queue.
    ///
    /// Returns immediately. If the request cannot be built, `completion`
    /// runs before this method returns, on the calling thread.
    pub fn request<R, E, F>(&self, endpoint: &E, completion: F)
    where
        R: DeserializeOwned + Send + 'static,
        E: Endpoint + ?Sized,
        F: FnOnce(Result<SuccessResult<R>>) + Send + 'static,
    {
        self.dispatch(endpoint, Arc::clone(&self.queue), completion);
    }

    /// Like [`ApiClient::request`], delivering the result on `queue`.
    pub fn request_on<R, E, Q, F>(&self, endpoint: &E, queue: Q, completion: F)
    where
        R: DeserializeOwned + Send + 'static,
        E: Endpoint + ?Sized,
        Q: CompletionQueue,
        F: FnOnce(Result<SuccessResult<R>>) + Send + 'static,
    {
        self.dispatch(endpoint, Arc::new(queue), completion);
    }

    fn dispatch<R, E, F>(&self, endpoint: &E, queue: Arc<dyn CompletionQueue>, completion: F)
    where
        R: DeserializeOwned + Send + 'static,
        E: Endpoint + ?Sized,
        F: FnOnce(Result<SuccessResult<R>>) + Send + 'static,
    {
        let spec = EndpointSpec::capture(endpoint);
        let request = match self.prepare(&spec) {
            Ok(request) => request,
            Err(err) => {
                completion(Err(err));
                return;
            }
        };

        let delivery: Delivery<R, F> = Delivery::new(queue, completion);
        let transport = self.transport.clone();
        self.runtime.spawn(async move {
            let result = perform(&transport, request, &spec).await;
            delivery.complete(result);
        });
    }

    fn prepare(&self, spec: &EndpointSpec) -> Result<Request> {
        match self.factory.build(spec) {
            Ok(request) => {
                debug!(method = %request.method(), url = %request.url(), "request built");
                Ok(request)
            }
            Err(err) => {
                let method = spec.method();
                warn!(%method, path = spec.path(), error = %err, "cannot build request");
                Err(Error::InvalidRequest(err))
            }
        }
    }
}

async fn perform<T, R>(
    transport: &T,
    request: Request,
    spec: &EndpointSpec,
) -> Result<SuccessResult<R>>
where
    T: Transport,
    R: DeserializeOwned,
{
    let outcome = transport.execute(request).await;
    if let Err(err) = &outcome {
        warn!(method = %spec.method(), path = spec.path(), error = %err, "transport failed");
    }

    let result = resolve(outcome, spec);
    match &result {
        Err(Error::InvalidStatusCode { status, .. }) => {
            warn!(method = %spec.method(), path = spec.path(), status, "unexpected status code");
        }
        Err(Error::DecodingFailed { path, message }) => {
            debug!(json_path = %path, %message, "cannot decode response body");
        }
        _ => {}
    }
    result
}

/// Hands a single result to a completion.
///
/// Dropping an undelivered `Delivery` sends `Custom("no response")`, so the
/// completion runs even when the call task is cancelled or panics.
struct Delivery<R, F>
where
    R: Send + 'static,
    F: FnOnce(Result<SuccessResult<R>>) + Send + 'static,
{
    completion: Option<F>,
    queue: Arc<dyn CompletionQueue>,
    _result: std::marker::PhantomData<fn() -> R>,
}

impl<R, F> Delivery<R, F>
where
    R: Send + 'static,
    F: FnOnce(Result<SuccessResult<R>>) + Send + 'static,
{
    fn new(queue: Arc<dyn CompletionQueue>, completion: F) -> Self {
        Self {
            completion: Some(completion),
            queue,
            _result: std::marker::PhantomData,
        }
    }

    fn complete(mut self, result: Result<SuccessResult<R>>) {
        self.deliver(result);
    }

    fn deliver(&mut self, result: Result<SuccessResult<R>>) {
        if let Some(completion) = self.completion.take() {
            self.queue.dispatch(Box::new(move || completion(result)));
        }
    }
}

impl<R, F> Drop for Delivery<R, F>
where
    R: Send + 'static,
    F: FnOnce(Result<SuccessResult<R>>) + Send + 'static,
{
    fn drop(&mut self) {
        if self.completion.is_some() {
            warn!("call ended without an outcome");
            self.deliver(Err(Error::custom(NO_RESPONSE)));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;

    use super::*;

    fn recorder() -> (
        Arc<AtomicUsize>,
        mpsc::Receiver<Result<SuccessResult<u32>>>,
        impl FnOnce(Result<SuccessResult<u32>>) + Send + 'static,
    ) {
        let calls = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = mpsc::channel();
        let counter = Arc::clone(&calls);
        let completion = move |result| {
            counter.fetch_add(1, Ordering::SeqCst);
            let _ = tx.send(result);
        };
        (calls, rx, completion)
    }

    #[test]
    fn delivery_sends_once() {
        let (calls, rx, completion) = recorder();
        let delivery = Delivery::<u32, _>::new(Arc::new(Immediate), completion);

        delivery.complete(Ok(SuccessResult::new(7, 200, Default::default())));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let result = rx.recv().expect("result").expect("success");
        assert_eq!(*result.value(), 7);
    }

    #[test]
    fn dropped_delivery_reports_no_response() {
        let (calls, rx, completion) = recorder();
        drop(Delivery::<u32, _>::new(Arc::new(Immediate), completion));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let err = rx.recv().expect("result").expect_err("no response");
        assert!(matches!(err, Error::Custom(message) if message == NO_RESPONSE));
    }

    #[test]
    fn new_outside_runtime_fails() {
        let err = ApiClient::new(ClientConfig::default()).expect_err("no runtime");
        assert!(matches!(err, ConfigError::NoRuntime));
    }

    #[tokio::test]
    async fn new_inside_runtime_succeeds() {
        let client = ApiClient::new(ClientConfig::default()).expect("client");
        assert!(format!("{client:?}").starts_with("ApiClient"));
    }
}
