//! Exponential backoff retry policy.

use async_trait::async_trait;
use std::time::Duration;
use tracing::instrument;

use super::retry::run_attempts;
use super::{Outcome, RetryPolicy};
use crate::transport::{HttpEngine, OutgoingRequest, RequestOptions};

/// Backoff configuration.
#[derive(Debug, Clone)]
pub struct BackoffConfig {
    /// Number of attempts after the initial request.
    pub attempts: u32,
    /// Delay before the first attempt.
    pub initial_delay: Duration,
    /// Maximum delay between attempts.
    pub max_delay: Duration,
    /// Delay multiplier for exponential backoff.
    pub multiplier: f64,
    /// Whether to add jitter.
    pub jitter: bool,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
            jitter: true,
        }
    }
}

impl BackoffConfig {
    /// Creates a new backoff configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of attempts.
    pub fn attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Sets the initial delay.
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the maximum delay.
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Sets the multiplier.
    pub fn multiplier(mut self, mult: f64) -> Self {
        self.multiplier = mult;
        self
    }

    /// Sets whether to use jitter.
    pub fn jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }
}

/// Retry policy whose wait grows geometrically with each attempt.
#[derive(Debug, Clone, Default)]
pub struct ExponentialBackoffRetry {
    config: BackoffConfig,
}

impl ExponentialBackoffRetry {
    /// Creates a new backoff policy.
    pub fn new(config: BackoffConfig) -> Self {
        Self { config }
    }

    /// Calculates the wait before a 1-based attempt.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn calculate_delay(&self, initial: Duration, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let max_ms = self.config.max_delay.as_millis() as f64;
        let base_ms = initial.as_millis() as f64 * self.config.multiplier.powi(exponent);

        // 0-25% random variation
        let delay_ms = if self.config.jitter {
            base_ms * (1.0 + rand::random::<f64>() * 0.25)
        } else {
            base_ms
        };

        Duration::from_millis(delay_ms.min(max_ms) as u64)
    }
}

#[async_trait]
impl RetryPolicy for ExponentialBackoffRetry {
    #[instrument(skip_all, fields(method = %request.method(), url = %request.url()))]
    async fn retry(
        &self,
        request: &OutgoingRequest,
        engine: &dyn HttpEngine,
        options: &RequestOptions,
    ) -> Outcome {
        let attempts = options
            .effective_retry_count()
            .unwrap_or(self.config.attempts);
        let initial = options
            .effective_retry_wait()
            .unwrap_or(self.config.initial_delay);

        run_attempts(request, engine, attempts, |attempt| {
            self.calculate_delay(initial, attempt)
        })
        .await
    }
}
