//! Deployment targets.

use url::Url;

use crate::BuildError;

/// A deployment target identified by its base URL.
///
/// The base URL is validated lazily, when a request is built against it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Environment {
    base_url: String,
}

impl Environment {
    /// Creates an environment for the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// The base URL as configured.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Parses the base URL.
    ///
    /// Fails unless the base URL is absolute and able to carry a path.
    pub fn parse(&self) -> Result<Url, BuildError> {
        let url = Url::parse(&self.base_url).map_err(|source| BuildError::InvalidBaseUrl {
            base_url: self.base_url.clone(),
            source,
        })?;

        if url.cannot_be_a_base() {
            return Err(BuildError::CannotBeABase {
                base_url: self.base_url.clone(),
            });
        }

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_absolute_url() {
        let env = Environment::new("https://api.openweathermap.org/data/2.5/");
        let url = env.parse().expect("valid base");
        assert_eq!(url.host_str(), Some("api.openweathermap.org"));
        assert_eq!(url.path(), "/data/2.5/");
    }

    #[test]
    fn rejects_relative_url() {
        let err = Environment::new("not a url").parse().expect_err("relative");
        assert!(err.is_invalid_base_url());
        assert!(matches!(err, BuildError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn rejects_url_without_path() {
        let err = Environment::new("mailto:ops@example.com")
            .parse()
            .expect_err("cannot be a base");
        assert!(matches!(err, BuildError::CannotBeABase { .. }));
    }
}
