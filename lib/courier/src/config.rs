//! Client configuration types.

use std::time::Duration;

use derive_more::{Display, Error};

use courier_core::{CachePolicy, DEFAULT_TIMEOUT, DefaultParameters, RequestFactory};

/// Configuration for [`crate::ApiClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Parameters merged into every call.
    pub default_parameters: DefaultParameters,
    /// Request timeout duration.
    pub timeout: Duration,
    /// Connection timeout duration.
    pub connect_timeout: Duration,
    /// Caching behaviour requested for every call.
    pub cache_policy: CachePolicy,
    /// Wrap the transport in [`crate::LoggingLayer`].
    pub log_requests: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            default_parameters: DefaultParameters::default(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: Duration::from_secs(10),
            cache_policy: CachePolicy::default(),
            log_requests: false,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// The request factory described by this configuration.
    #[must_use]
    pub fn request_factory(&self) -> RequestFactory {
        RequestFactory::new(self.default_parameters.clone())
            .with_timeout(self.timeout)
            .with_cache_policy(self.cache_policy)
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    default_parameters: Option<DefaultParameters>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    cache_policy: Option<CachePolicy>,
    log_requests: Option<bool>,
}

impl ClientConfigBuilder {
    /// Set the parameters merged into every call.
    #[must_use]
    pub fn default_parameters(mut self, defaults: DefaultParameters) -> Self {
        self.default_parameters = Some(defaults);
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the cache policy.
    #[must_use]
    pub const fn cache_policy(mut self, cache_policy: CachePolicy) -> Self {
        self.cache_policy = Some(cache_policy);
        self
    }

    /// Enable or disable request/response logging.
    #[must_use]
    pub const fn log_requests(mut self, enabled: bool) -> Self {
        self.log_requests = Some(enabled);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> ClientConfig {
        let defaults = ClientConfig::default();
        ClientConfig {
            default_parameters: self
                .default_parameters
                .unwrap_or(defaults.default_parameters),
            timeout: self.timeout.unwrap_or(defaults.timeout),
            connect_timeout: self.connect_timeout.unwrap_or(defaults.connect_timeout),
            cache_policy: self.cache_policy.unwrap_or(defaults.cache_policy),
            log_requests: self.log_requests.unwrap_or(defaults.log_requests),
        }
    }
}

/// A client could not be constructed.
#[derive(Debug, Display, Error)]
pub enum ConfigError {
    /// No Tokio runtime was running and none was supplied.
    #[display("no Tokio runtime available: build the client inside a runtime or pass a handle")]
    NoRuntime,
}

#[cfg(test)]
mod tests {
    use courier_core::Parameters;

    use super::*;

    #[test]
    fn default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.cache_policy, CachePolicy::BypassCaches);
        assert_eq!(config.default_parameters, DefaultParameters::default());
        assert!(!config.log_requests);
    }

    #[test]
    fn builder_overrides() {
        let defaults =
            DefaultParameters::new().with_url(Parameters::from([("appid", "secret")]));
        let config = ClientConfig::builder()
            .default_parameters(defaults.clone())
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(5))
            .log_requests(true)
            .build();

        assert_eq!(config.default_parameters, defaults);
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert!(config.log_requests);
    }

    #[test]
    fn request_factory_carries_settings() {
        let factory = ClientConfig::builder()
            .timeout(Duration::from_secs(2))
            .build()
            .request_factory();

        assert_eq!(factory.timeout(), Duration::from_secs(2));
        assert!(factory.defaults().url.is_none());
    }
}
