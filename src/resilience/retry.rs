//! Fixed-wait retry policy.

use async_trait::async_trait;
use std::time::Duration;
use tracing::instrument;

use super::{should_stop, Outcome, RetryPolicy};
use crate::transport::{HttpEngine, OutgoingRequest, RequestOptions, TransportError};

/// Retry configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Number of attempts after the initial request.
    pub attempts: u32,
    /// Wait before each attempt.
    pub wait: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: 3,
            wait: Duration::from_secs(5),
        }
    }
}

impl RetryConfig {
    /// Creates a new retry configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of attempts after the initial request.
    ///
    /// Zero is treated as one: a policy is only invoked once a retry is due.
    pub fn attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Sets the wait between attempts.
    pub fn wait(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }
}

/// Position of a retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    /// Nothing has happened yet.
    Idle,
    /// Sleeping before the given attempt.
    Waiting {
        /// 1-based attempt number.
        attempt: u32,
    },
    /// Sending the given attempt.
    Attempting {
        /// 1-based attempt number.
        attempt: u32,
    },
    /// The loop is finished.
    Done,
}

impl RetryState {
    /// Returns the next state. `stopped` is only consulted after an attempt.
    pub fn next(self, stopped: bool, attempts: u32) -> Self {
        match self {
            RetryState::Idle => RetryState::Waiting { attempt: 1 },
            RetryState::Waiting { attempt } => RetryState::Attempting { attempt },
            RetryState::Attempting { attempt } if stopped || attempt >= attempts => {
                RetryState::Done
            }
            RetryState::Attempting { attempt } => RetryState::Waiting {
                attempt: attempt + 1,
            },
            RetryState::Done => RetryState::Done,
        }
    }
}

/// Drives the retry state machine, sleeping `delay(attempt)` before each attempt.
pub(crate) async fn run_attempts<F>(
    request: &OutgoingRequest,
    engine: &dyn HttpEngine,
    attempts: u32,
    delay: F,
) -> Outcome
where
    F: Fn(u32) -> Duration + Send + Sync,
{
    let attempts = attempts.max(1);
    let mut state = RetryState::Idle;
    let mut last: Option<Outcome> = None;

    loop {
        match state {
            RetryState::Idle => {
                state = state.next(false, attempts);
            }
            RetryState::Waiting { attempt } => {
                let wait = delay(attempt);
                tracing::info!(
                    attempt,
                    max_attempts = attempts,
                    wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                    "Waiting before retry"
                );

                if let Err(err) = request.context().sleep(wait).await {
                    tracing::debug!(attempt, error = %err, "Retry wait interrupted");
                    return Err(err.into());
                }
                state = state.next(false, attempts);
            }
            RetryState::Attempting { attempt } => {
                let outcome = engine.execute(request).await;
                let stopped = should_stop(&outcome);

                match &outcome {
                    Ok(response) => {
                        tracing::debug!(attempt, status = response.status, "Retry attempt finished");
                    }
                    Err(err) => {
                        tracing::warn!(attempt, error = %err, "Retry attempt failed");
                    }
                }

                last = Some(outcome);
                state = state.next(stopped, attempts);
            }
            RetryState::Done => break,
        }
    }

    last.unwrap_or_else(|| {
        Err(TransportError::Other {
            message: "retry finished without an attempt".to_string(),
        })
    })
}

/// Retry policy with a fixed wait between attempts.
#[derive(Debug, Clone, Default)]
pub struct DefaultRetryPolicy {
    config: RetryConfig,
}

impl DefaultRetryPolicy {
    /// Creates a new retry policy.
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }
}

#[async_trait]
impl RetryPolicy for DefaultRetryPolicy {
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
        let wait = options.effective_retry_wait().unwrap_or(self.config.wait);

        run_attempts(request, engine, attempts, |_| wait).await
    }
}
