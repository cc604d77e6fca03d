//! Configuration module for the Mercado Pago client.
//!
//! Provides the transport defaults: base URL, timeout and retry settings,
//! overridable per call through [`RequestOptions`](crate::transport::RequestOptions).

use std::time::Duration;

use crate::errors::{ErrorResponse, MercadoPagoResult};
use crate::resilience::RetryConfig;

/// Default base URL for the Mercado Pago API.
pub const DEFAULT_BASE_URL: &str = "https://api.mercadopago.com";

/// Default timeout for a whole call, retries included (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of retry attempts.
pub const DEFAULT_RETRY_COUNT: u32 = 3;

/// Default wait between retry attempts.
pub const DEFAULT_RETRY_WAIT: Duration = Duration::from_secs(5);

/// Default `User-Agent` header.
pub const DEFAULT_USER_AGENT: &str = concat!("mercadopago-rust/", env!("CARGO_PKG_VERSION"));

/// Transport configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Base URL for API requests, without a trailing slash.
    pub base_url: String,
    /// Timeout applied when a call sets none.
    pub timeout: Duration,
    /// Retry attempts applied when a call sets none.
    pub retry_count: u32,
    /// Retry wait applied when a call sets none.
    pub retry_wait: Duration,
    /// `User-Agent` sent by the default engine.
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry_count: DEFAULT_RETRY_COUNT,
            retry_wait: DEFAULT_RETRY_WAIT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl TransportConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> TransportConfigBuilder {
        TransportConfigBuilder::new()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `MERCADOPAGO_BASE_URL` (optional): Custom base URL
    /// - `MERCADOPAGO_TIMEOUT` (optional): Timeout in seconds
    /// - `MERCADOPAGO_MAX_RETRIES` (optional): Retry attempts
    /// - `MERCADOPAGO_RETRY_WAIT_MS` (optional): Wait between retries in milliseconds
    ///
    /// Unparseable numbers are ignored and the default is kept.
    pub fn from_env() -> MercadoPagoResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> MercadoPagoResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = TransportConfigBuilder::new();

        if let Some(base_url) = lookup("MERCADOPAGO_BASE_URL") {
            builder = builder.base_url(base_url);
        }

        if let Some(secs) = lookup("MERCADOPAGO_TIMEOUT").and_then(|v| v.parse::<u64>().ok()) {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        if let Some(count) = lookup("MERCADOPAGO_MAX_RETRIES").and_then(|v| v.parse::<u32>().ok())
        {
            builder = builder.retry_count(count);
        }

        if let Some(ms) = lookup("MERCADOPAGO_RETRY_WAIT_MS").and_then(|v| v.parse::<u64>().ok()) {
            builder = builder.retry_wait(Duration::from_millis(ms));
        }

        builder.build()
    }

    /// Returns the full URL for an endpoint path.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Returns the default retry settings.
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::new()
            .attempts(self.retry_count)
            .wait(self.retry_wait)
    }
}

/// Builder for `TransportConfig`.
#[derive(Debug, Default)]
pub struct TransportConfigBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    retry_count: Option<u32>,
    retry_wait: Option<Duration>,
    user_agent: Option<String>,
}

impl TransportConfigBuilder {
    /// Creates a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the default timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the default number of retry attempts; must be at least one.
    pub fn retry_count(mut self, count: u32) -> Self {
        self.retry_count = Some(count);
        self
    }

    /// Sets the default wait between retry attempts.
    pub fn retry_wait(mut self, wait: Duration) -> Self {
        self.retry_wait = Some(wait);
        self
    }

    /// Sets the `User-Agent`.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> MercadoPagoResult<TransportConfig> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        if base_url.is_empty() {
            return Err(ErrorResponse::construction("base URL cannot be empty"));
        }

        let parsed = url::Url::parse(&base_url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ErrorResponse::construction(format!(
                "base URL must use http or https, got {}",
                parsed.scheme()
            )));
        }

        if parsed.scheme() == "http" {
            tracing::warn!(base_url = %base_url, "Base URL does not use HTTPS");
        }

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(ErrorResponse::construction("timeout must be greater than zero"));
        }

        let retry_count = self.retry_count.unwrap_or(DEFAULT_RETRY_COUNT);
        if retry_count == 0 {
            return Err(ErrorResponse::construction(
                "retry count must be greater than zero",
            ));
        }

        Ok(TransportConfig {
            base_url,
            timeout,
            retry_count,
            retry_wait: self.retry_wait.unwrap_or(DEFAULT_RETRY_WAIT),
            user_agent: self
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use std::collections::HashMap;

    #[test]
    fn test_config_builder_success() {
        let config = TransportConfig::builder()
            .base_url("https://sandbox.mercadopago.test/")
            .timeout(Duration::from_secs(10))
            .retry_count(5)
            .retry_wait(Duration::from_millis(250))
            .build()
            .unwrap();

        assert_eq!(config.base_url, "https://sandbox.mercadopago.test");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.retry_count, 5);
        assert_eq!(config.retry_wait, Duration::from_millis(250));
    }

    #[test]
    fn test_config_builder_defaults() {
        let config = TransportConfig::builder().build().unwrap();

        assert_eq!(config, TransportConfig::default());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.retry_count, DEFAULT_RETRY_COUNT);
        assert_eq!(config.retry_wait, DEFAULT_RETRY_WAIT);
    }

    #[test]
    fn test_config_builder_invalid_base_url() {
        let err = TransportConfig::builder()
            .base_url("ftp://files.example.com")
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Construction);

        assert!(TransportConfig::builder().base_url("/").build().is_err());
        assert!(TransportConfig::builder().base_url("not a url").build().is_err());
    }

    #[test]
    fn test_config_builder_zero_timeout() {
        let result = TransportConfig::builder().timeout(Duration::ZERO).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_config_builder_zero_retry_count() {
        let err = TransportConfig::builder().retry_count(0).build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Construction);
        assert!(err.message.contains("retry count"));
    }

    #[test]
    fn test_endpoint_url() {
        let config = TransportConfig::default();
        assert_eq!(
            config.endpoint_url("/v1/payments"),
            "https://api.mercadopago.com/v1/payments"
        );
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("MERCADOPAGO_BASE_URL", "http://localhost:8080"),
            ("MERCADOPAGO_TIMEOUT", "12"),
            ("MERCADOPAGO_MAX_RETRIES", "1"),
            ("MERCADOPAGO_RETRY_WAIT_MS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let config =
            TransportConfig::from_lookup(|name| vars.get(name).map(ToString::to_string)).unwrap();

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout, Duration::from_secs(12));
        assert_eq!(config.retry_count, 1);
        assert_eq!(config.retry_wait, DEFAULT_RETRY_WAIT);
    }

    #[test]
    fn test_retry_config() {
        let config = TransportConfig::builder()
            .retry_count(2)
            .retry_wait(Duration::from_secs(1))
            .build()
            .unwrap();

        let retry = config.retry_config();
        assert_eq!(retry.attempts, 2);
        assert_eq!(retry.wait, Duration::from_secs(1));
    }
}
