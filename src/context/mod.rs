//! Request-scoped cancellation.
//!
//! A [`RequestContext`] pairs a cancellation token with an optional deadline.
//! Contexts form a tree: a derived context is cancelled whenever its parent
//! is, and its deadline is never later than the parent's.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Reason a context ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContextError {
    /// The context was cancelled explicitly.
    #[error("context canceled")]
    Cancelled,
    /// The context deadline elapsed.
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// Cancellation token plus optional deadline attached to a request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// Creates a context that never ends on its own.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context driven by an existing cancellation token.
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Derives a child context that also ends after `timeout`.
    ///
    /// A timeout too large to represent as an instant adds no deadline of its
    /// own; the child keeps the parent's.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self.child(),
        }
    }

    /// Derives a child context that also ends at `deadline`.
    ///
    /// The child keeps the parent's deadline when that one is earlier.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(current) if current <= deadline => current,
            _ => deadline,
        };

        Self {
            token: self.token.child_token(),
            deadline: Some(deadline),
        }
    }

    /// Derives a child context that can be cancelled without touching the parent.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Cancels this context and every context derived from it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns the token backing this context.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Returns the deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns why the context ended, or `None` while it is still live.
    pub fn err(&self) -> Option<ContextError> {
        if self.token.is_cancelled() {
            return Some(ContextError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(ContextError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Resolves once the context ends.
    pub async fn done(&self) -> ContextError {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    () = self.token.cancelled() => ContextError::Cancelled,
                    () = tokio::time::sleep_until(deadline) => ContextError::DeadlineExceeded,
                }
            }
            None => {
                self.token.cancelled().await;
                ContextError::Cancelled
            }
        }
    }

    /// Runs `future` until it completes or the context ends, whichever is first.
    pub async fn run<F>(&self, future: F) -> Result<F::Output, ContextError>
    where
        F: Future,
    {
        if let Some(err) = self.err() {
            return Err(err);
        }

        tokio::select! {
            biased;
            err = self.done() => Err(err),
            output = future => Ok(output),
        }
    }

    /// Sleeps for `duration` unless the context ends first.
    pub async fn sleep(&self, duration: Duration) -> Result<(), ContextError> {
        self.run(tokio::time::sleep(duration)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_timeout_ends_context() {
        let ctx = RequestContext::new().with_timeout(Duration::from_millis(100));
        assert_eq!(ctx.err(), None);

        let started = Instant::now();
        assert_eq!(ctx.done().await, ContextError::DeadlineExceeded);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(100));
        assert!(elapsed < Duration::from_millis(200));
        assert_eq!(ctx.err(), Some(ContextError::DeadlineExceeded));
    }

    #[tokio::test(start_paused = true)]
    async fn test_child_deadline_never_extends_parent() {
        let parent = RequestContext::new().with_timeout(Duration::from_secs(1));
        let child = parent.with_timeout(Duration::from_secs(30));

        assert_eq!(child.deadline(), parent.deadline());

        let shorter = parent.with_timeout(Duration::from_millis(10));
        assert!(shorter.deadline() < parent.deadline());
    }

    #[tokio::test]
    async fn test_unrepresentable_timeout_keeps_parent_deadline() {
        let ctx = RequestContext::new().with_timeout(Duration::MAX);
        assert_eq!(ctx.deadline(), None);
        assert_eq!(ctx.err(), None);

        let parent = RequestContext::new().with_timeout(Duration::from_secs(1));
        let child = parent.with_timeout(Duration::MAX);
        assert_eq!(child.deadline(), parent.deadline());

        parent.cancel();
        assert_eq!(child.err(), Some(ContextError::Cancelled));
    }

    #[tokio::test]
    async fn test_parent_cancellation_propagates() {
        let parent = RequestContext::new();
        let child = parent.with_timeout(Duration::from_secs(30));

        parent.cancel();

        assert_eq!(child.err(), Some(ContextError::Cancelled));
        assert_eq!(child.done().await, ContextError::Cancelled);
    }

    #[tokio::test]
    async fn test_child_cancellation_leaves_parent_live() {
        let parent = RequestContext::new();
        let child = parent.child();

        child.cancel();

        assert_eq!(child.err(), Some(ContextError::Cancelled));
        assert_eq!(parent.err(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_aborts_on_cancel() {
        let ctx = RequestContext::new();
        let canceller = ctx.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        });

        let started = Instant::now();
        let result = ctx.sleep(Duration::from_secs(5)).await;

        assert_eq!(result, Err(ContextError::Cancelled));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_run_returns_output() {
        let ctx = RequestContext::new().with_timeout(Duration::from_secs(5));
        let value = ctx.run(async { 7 }).await;
        assert_eq!(value, Ok(7));
    }

    #[tokio::test]
    async fn test_run_rejects_already_cancelled_context() {
        let ctx = RequestContext::new();
        ctx.cancel();
        assert_eq!(ctx.run(async { 7 }).await, Err(ContextError::Cancelled));
    }
}
