//! Mock implementations for testing.
//!
//! [`MockEngine`] stands in for the network: it serves queued responses,
//! records every request it sees, and can simulate transport failures, slow
//! servers and bodies that break mid-stream.

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Method};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;
use url::Url;

use crate::transport::{HttpEngine, HttpResponse, OutgoingRequest, TransportError};

/// A recorded request.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: Method,
    /// Request URL.
    pub url: Url,
    /// Request headers, as they were when the engine saw them.
    pub headers: HeaderMap,
    /// Request body.
    pub body: Option<Bytes>,
}

impl RecordedRequest {
    /// Returns every value of a header as strings.
    pub fn header_values(&self, name: &str) -> Vec<String> {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect()
    }
}

/// A mock response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body.
    pub body: Bytes,
    /// Delay before the response head is returned.
    pub delay: Option<Duration>,
    /// If set, the body stream fails with this message after the body bytes.
    pub body_error: Option<String>,
}

impl MockResponse {
    /// Creates a response with an empty body.
    pub fn status(status: u16) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            delay: None,
            body_error: None,
        }
    }

    /// Creates a JSON response.
    pub fn json<T: serde::Serialize>(status: u16, value: &T) -> Self {
        let body = serde_json::to_vec(value).unwrap_or_default();
        Self::status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
    }

    /// Sets the body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Adds a header.
    pub fn with_header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers.append(name, HeaderValue::from_static(value));
        self
    }

    /// Delays the response.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Makes the body stream fail.
    pub fn with_body_error(mut self, message: impl Into<String>) -> Self {
        self.body_error = Some(message.into());
        self
    }

    fn into_response(self) -> HttpResponse {
        let mut chunks = vec![Ok(self.body)];
        if let Some(message) = self.body_error {
            chunks.push(Err(TransportError::Body { message }));
        }

        HttpResponse::new(
            self.status,
            self.headers,
            Box::pin(futures::stream::iter(chunks)),
        )
    }
}

#[derive(Debug, Clone)]
enum MockOutcome {
    Response(MockResponse),
    Error(TransportError),
}

/// Mock HTTP engine for testing.
pub struct MockEngine {
    outcomes: Mutex<VecDeque<MockOutcome>>,
    requests: Mutex<Vec<RecordedRequest>>,
    default_response: Mutex<Option<MockResponse>>,
}

impl MockEngine {
    /// Creates a new mock engine.
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            default_response: Mutex::new(None),
        }
    }

    /// Queues a response.
    pub fn queue(&self, response: MockResponse) {
        self.outcomes.lock().push_back(MockOutcome::Response(response));
    }

    /// Queues a JSON response.
    pub fn queue_json<T: serde::Serialize>(&self, status: u16, value: &T) {
        self.queue(MockResponse::json(status, value));
    }

    /// Queues a transport failure.
    pub fn queue_error(&self, error: TransportError) {
        self.outcomes.lock().push_back(MockOutcome::Error(error));
    }

    /// Sets the response served once the queue is empty.
    pub fn set_default(&self, response: MockResponse) {
        *self.default_response.lock() = Some(response);
    }

    /// Gets all recorded requests.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Gets the last recorded request.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().last().cloned()
    }

    /// Returns the number of requests made.
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    fn next_outcome(&self) -> MockOutcome {
        if let Some(outcome) = self.outcomes.lock().pop_front() {
            return outcome;
        }

        let default = self.default_response.lock().clone();
        MockOutcome::Response(default.unwrap_or_else(|| {
            MockResponse::status(500).with_body("No mock response configured")
        }))
    }
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpEngine for MockEngine {
    async fn execute(&self, request: &OutgoingRequest) -> Result<HttpResponse, TransportError> {
        if let Some(err) = request.context().err() {
            return Err(err.into());
        }

        self.requests.lock().push(RecordedRequest {
            method: request.method().clone(),
            url: request.url().clone(),
            headers: request.headers().clone(),
            body: request.body().cloned(),
        });

        match self.next_outcome() {
            MockOutcome::Error(err) => Err(err),
            MockOutcome::Response(response) => {
                if let Some(delay) = response.delay {
                    request.context().sleep(delay).await?;
                }
                Ok(response.into_response())
            }
        }
    }
}

impl std::fmt::Debug for MockEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockEngine")
            .field("request_count", &self.request_count())
            .finish()
    }
}

/// Test fixtures for common response bodies.
pub mod fixtures {
    use serde_json::{json, Value};

    /// A payment as returned by the payments endpoints.
    pub fn payment(id: i64, status: &str) -> Value {
        json!({
            "id": id,
            "status": status,
            "status_detail": "accredited",
            "description": "Test payment",
            "payment_method_id": "visa",
            "payment_type_id": "credit_card",
            "currency_id": "BRL",
            "transaction_amount": 100.0,
            "captured": true,
            "date_created": "2024-01-10T10:00:00.000-04:00",
            "payer": {
                "id": "1",
                "email": "buyer@example.com"
            }
        })
    }

    /// A search result page.
    pub fn search_page(ids: &[i64]) -> Value {
        let results: Vec<Value> = ids.iter().map(|id| payment(*id, "approved")).collect();
        json!({
            "paging": {"total": ids.len(), "limit": 30, "offset": 0},
            "results": results
        })
    }

    /// A payment methods listing.
    pub fn payment_methods() -> Value {
        json!([
            {
                "id": "visa",
                "name": "Visa",
                "payment_type_id": "credit_card",
                "status": "active",
                "min_allowed_amount": 0.5,
                "max_allowed_amount": 60000.0
            },
            {
                "id": "pix",
                "name": "PIX",
                "payment_type_id": "bank_transfer",
                "status": "active"
            }
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ContextError, RequestContext};

    fn request(path: &str) -> OutgoingRequest {
        OutgoingRequest::get(&format!("https://api.mercadopago.com{path}")).unwrap()
    }

    #[tokio::test]
    async fn test_mock_engine_queue() {
        let engine = MockEngine::new();
        engine.queue_json(200, &serde_json::json!({"test": "value"}));

        let response = engine.execute(&request("/test")).await.unwrap();
        assert_eq!(response.status, 200);

        let body = response.bytes(&RequestContext::new()).await.unwrap();
        assert!(String::from_utf8_lossy(&body).contains("value"));
    }

    #[tokio::test]
    async fn test_mock_engine_records_requests() {
        let engine = MockEngine::new();
        engine.set_default(MockResponse::status(204));

        engine.execute(&request("/path1")).await.unwrap();
        engine.execute(&request("/path2")).await.unwrap();

        let requests = engine.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].url.path(), "/path1");
        assert_eq!(requests[1].url.path(), "/path2");
    }

    #[tokio::test]
    async fn test_mock_engine_without_responses_returns_500() {
        let engine = MockEngine::new();
        let response = engine.execute(&request("/test")).await.unwrap();
        assert_eq!(response.status, 500);
    }

    #[tokio::test]
    async fn test_mock_engine_body_error() {
        let engine = MockEngine::new();
        engine.queue(MockResponse::status(200).with_body("{").with_body_error("reset"));

        let response = engine.execute(&request("/test")).await.unwrap();
        let err = response.bytes(&RequestContext::new()).await.unwrap_err();
        assert!(matches!(err, TransportError::Body { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_engine_delay_honours_deadline() {
        let engine = MockEngine::new();
        engine.queue(MockResponse::status(200).with_delay(Duration::from_secs(10)));

        let ctx = RequestContext::new().with_timeout(Duration::from_millis(100));
        let err = engine
            .execute(&request("/slow").with_context(ctx))
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::Context(ContextError::DeadlineExceeded)));
    }
}
