//! Client configuration.

use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

/// Backend origin used when `ZENWATCH_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Request timeout applied to every call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding the backend origin.
const API_URL_ENV: &str = "ZENWATCH_API_URL";

/// Environment variable overriding the request timeout, in seconds.
const TIMEOUT_ENV: &str = "ZENWATCH_API_TIMEOUT_SECS";

/// API client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend origin, always with a trailing slash.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl ClientConfig {
    /// Creates a configuration for `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid http(s) URL.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::builder(base_url).build()
    }

    /// Creates a configuration builder.
    #[must_use]
    pub fn builder(base_url: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder::new(base_url)
    }

    /// Reads `ZENWATCH_API_URL` and `ZENWATCH_API_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns an error if either variable holds an invalid value.
    pub fn from_env() -> Result<Self> {
        let base = std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let mut builder = Self::builder(base);

        if let Ok(raw) = std::env::var(TIMEOUT_ENV) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("{TIMEOUT_ENV} must be a number of seconds")))?;
            builder = builder.timeout(Duration::from_secs(secs));
        }

        builder.build()
    }

    /// Resolves an API path against the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the joined URL is invalid.
    pub fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    base_url: String,
    timeout: Duration,
    user_agent: Option<String>,
}

impl ClientConfigBuilder {
    /// Creates a new builder for the given origin.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or not http(s).
    pub fn build(self) -> Result<ClientConfig> {
        let mut raw = self.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base_url = Url::parse(&raw)?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "unsupported scheme {:?} in API URL",
                base_url.scheme()
            )));
        }

        Ok(ClientConfig {
            base_url,
            timeout: self.timeout,
            user_agent: self
                .user_agent
                .unwrap_or_else(|| concat!("zenwatch/", env!("CARGO_PKG_VERSION")).to_string()),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::new("http://api.example.com").unwrap();
        assert_eq!(config.base_url.as_str(), "http://api.example.com/");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("zenwatch/"));
    }

    #[test]
    fn test_url_join_keeps_prefix() {
        let config = ClientConfig::new("https://example.com/zen").unwrap();
        assert_eq!(
            config.url("/api/articles").unwrap().as_str(),
            "https://example.com/zen/api/articles"
        );
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::builder("http://localhost:9000/")
            .timeout(Duration::from_secs(5))
            .user_agent("test-agent")
            .build()
            .unwrap();
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "test-agent");
    }

    #[test]
    fn test_rejects_bad_scheme() {
        assert!(matches!(
            ClientConfig::new("ftp://example.com"),
            Err(Error::Config(_))
        ));
        assert!(ClientConfig::new("not a url").is_err());
    }
}
