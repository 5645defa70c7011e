use std::time::Duration;

/// Default control-plane endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.cirro.cloud";

/// Configuration for [`ApiClient`](crate::ApiClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the control-plane API.
    pub endpoint: String,

    /// API key, sent as the Basic auth username.
    pub api_key: String,

    /// API secret, sent as the Basic auth password.
    pub api_secret: String,

    /// Per-request timeout (default: 60 seconds).
    pub timeout: Duration,

    /// Maximum retries on HTTP 429 (default: 5).
    pub retries: u32,

    /// Cap on the exponential backoff delay (default: 12 seconds).
    pub retry_max_delay: Duration,

    /// Whether to skip TLS certificate verification.
    /// This should only be enabled for testing.
    pub danger_accept_invalid_certs: bool,

    /// User-Agent header value.
    pub user_agent: String,
}

impl ClientConfig {
    /// Creates a configuration for the default endpoint with the given
    /// credentials.
    #[must_use]
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            timeout: Duration::from_secs(60),
            retries: 5,
            retry_max_delay: Duration::from_secs(12),
            danger_accept_invalid_certs: false,
            user_agent: format!("cirro/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Sets the API endpoint. A trailing slash is stripped.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum number of retries on HTTP 429.
    #[must_use]
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Sets the backoff delay cap.
    #[must_use]
    pub fn with_retry_max_delay(mut self, delay: Duration) -> Self {
        self.retry_max_delay = delay;
        self
    }

    /// Disables TLS certificate verification. Testing only.
    #[must_use]
    pub fn with_danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.danger_accept_invalid_certs = accept;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("AKIRRO", "secret");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.retries, 5);
        assert_eq!(config.retry_max_delay, Duration::from_secs(12));
        assert!(!config.danger_accept_invalid_certs);
        assert!(config.user_agent.starts_with("cirro/"));
    }

    #[test]
    fn test_endpoint_trailing_slash_stripped() {
        let config = ClientConfig::new("k", "s").with_endpoint("https://api.example.test/");
        assert_eq!(config.endpoint, "https://api.example.test");
    }

    #[test]
    fn test_builder_overrides() {
        let config = ClientConfig::new("k", "s")
            .with_timeout(Duration::from_secs(5))
            .with_retries(2)
            .with_retry_max_delay(Duration::from_millis(100));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.retries, 2);
        assert_eq!(config.retry_max_delay, Duration::from_millis(100));
    }
}
