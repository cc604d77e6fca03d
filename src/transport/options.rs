//! Per-call overrides.

use http::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;

/// Per-call overrides for timeout, headers and retry behaviour.
///
/// Every setter overwrites its field; a zero timeout, wait or count is
/// accepted here and treated as "use the default" by the transport.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    timeout: Option<Duration>,
    custom_headers: Option<HeaderMap>,
    retry_count: Option<u32>,
    retry_wait: Option<Duration>,
}

impl RequestOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the timeout covering the whole call, retries included.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replaces the extra headers merged into the request.
    pub fn custom_headers(mut self, headers: HeaderMap) -> Self {
        self.custom_headers = Some(headers);
        self
    }

    /// Appends one extra header.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.custom_headers
            .get_or_insert_with(HeaderMap::new)
            .append(name, value);
        self
    }

    /// Sets the number of retry attempts.
    pub fn retry_count(mut self, count: u32) -> Self {
        self.retry_count = Some(count);
        self
    }

    /// Sets the wait between retry attempts.
    pub fn retry_wait(mut self, wait: Duration) -> Self {
        self.retry_wait = Some(wait);
        self
    }

    /// Returns the timeout override.
    pub fn get_timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns the extra headers.
    pub fn get_custom_headers(&self) -> Option<&HeaderMap> {
        self.custom_headers.as_ref()
    }

    /// Returns the retry count override.
    pub fn get_retry_count(&self) -> Option<u32> {
        self.retry_count
    }

    /// Returns the retry wait override.
    pub fn get_retry_wait(&self) -> Option<Duration> {
        self.retry_wait
    }

    /// Returns the timeout if set and non-zero.
    pub(crate) fn effective_timeout(&self) -> Option<Duration> {
        self.timeout.filter(|t| !t.is_zero())
    }

    /// Returns the retry count if set and non-zero.
    pub(crate) fn effective_retry_count(&self) -> Option<u32> {
        self.retry_count.filter(|count| *count > 0)
    }

    /// Returns the retry wait if set and non-zero.
    pub(crate) fn effective_retry_wait(&self) -> Option<Duration> {
        self.retry_wait.filter(|wait| !wait.is_zero())
    }
}
