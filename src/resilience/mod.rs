//! Resilience layer for the Mercado Pago client.
//!
//! The transport executes every request once and hands retryable outcomes to
//! a [`RetryPolicy`]. Two policies ship with the crate: [`DefaultRetryPolicy`]
//! waits a fixed interval between attempts, [`ExponentialBackoffRetry`] grows
//! the wait geometrically.

mod backoff;
mod retry;

pub use backoff::{BackoffConfig, ExponentialBackoffRetry};
pub use retry::{DefaultRetryPolicy, RetryConfig, RetryState};

use async_trait::async_trait;

use crate::transport::{HttpEngine, HttpResponse, OutgoingRequest, RequestOptions, TransportError};

/// Outcome of one HTTP exchange.
pub type Outcome = Result<HttpResponse, TransportError>;

/// Strategy that re-issues a request after a retryable outcome.
///
/// Implementations wait before every attempt, abort the wait as soon as the
/// request context ends, and return the outcome of the last attempt.
#[async_trait]
pub trait RetryPolicy: Send + Sync {
    /// Re-sends `request` through `engine` until a terminal outcome or until
    /// the attempts are exhausted.
    async fn retry(
        &self,
        request: &OutgoingRequest,
        engine: &dyn HttpEngine,
        options: &RequestOptions,
    ) -> Outcome;
}

/// Returns true if the outcome warrants a retry: a transport error or a 5xx.
pub fn should_retry(outcome: &Outcome) -> bool {
    match outcome {
        Ok(response) => response.status >= 500,
        Err(_) => true,
    }
}

/// Returns true once an outcome is terminal.
pub fn should_stop(outcome: &Outcome) -> bool {
    !should_retry(outcome)
}
