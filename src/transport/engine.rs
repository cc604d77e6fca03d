//! HTTP engine abstraction and the reqwest implementation.

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};
use http::HeaderMap;
use reqwest::{Client, ClientBuilder};
use std::pin::Pin;
use std::time::Duration;
use tracing::instrument;

use super::{OutgoingRequest, TransportError};
use crate::context::RequestContext;

/// Streamed response body.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>;

/// Response returned by an [`HttpEngine`]; the body is not read yet.
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HeaderMap,
    body: ByteStream,
}

impl HttpResponse {
    /// Creates a response over a body stream.
    pub fn new(status: u16, headers: HeaderMap, body: ByteStream) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Creates a response whose body is already in memory.
    pub fn from_bytes(status: u16, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        Self::new(
            status,
            headers,
            Box::pin(futures::stream::once(async move {
                Ok::<_, TransportError>(body)
            })),
        )
    }

    /// Returns true if the status indicates success (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Splits the response into status, headers and body stream.
    pub fn into_parts(self) -> (u16, HeaderMap, ByteStream) {
        (self.status, self.headers, self.body)
    }

    /// Drains the body, stopping early if `context` ends.
    pub async fn bytes(self, context: &RequestContext) -> Result<Bytes, TransportError> {
        let mut body = self.body;
        let drain = async move {
            let mut buffer = BytesMut::new();
            while let Some(chunk) = body.next().await {
                buffer.extend_from_slice(&chunk?);
            }
            Ok::<_, TransportError>(buffer.freeze())
        };

        context.run(drain).await?
    }
}

impl std::fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Executes a single HTTP exchange.
///
/// Implementations must stop waiting as soon as the request context ends and
/// report that with [`TransportError::Context`].
#[async_trait]
pub trait HttpEngine: Send + Sync {
    /// Sends `request` once and returns the response head plus body stream.
    async fn execute(&self, request: &OutgoingRequest) -> Result<HttpResponse, TransportError>;
}

/// HTTP engine backed by a shared reqwest connection pool.
#[derive(Clone)]
pub struct ReqwestEngine {
    client: Client,
}

impl ReqwestEngine {
    /// Creates an engine with the given `User-Agent`.
    pub fn new(user_agent: &str) -> Result<Self, TransportError> {
        let client = ClientBuilder::new()
            .user_agent(user_agent)
            .connect_timeout(Duration::from_secs(10))
            .tcp_keepalive(Duration::from_secs(60))
            .build()
            .map_err(|e| TransportError::Connection {
                message: e.to_string(),
            })?;

        Ok(Self { client })
    }

    /// Wraps an existing reqwest client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpEngine for ReqwestEngine {
    #[instrument(skip(self, request), fields(method = %request.method(), url = %request.url()))]
    async fn execute(&self, request: &OutgoingRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method().clone(), request.url().clone())
            .headers(request.headers().clone());

        if let Some(body) = request.body() {
            builder = builder.body(body.clone());
        }

        let response = request.context().run(builder.send()).await??;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        tracing::debug!(status, "Received response head");

        let body = response
            .bytes_stream()
            .map(|chunk| {
                chunk.map_err(|e| TransportError::Body {
                    message: e.to_string(),
                })
            })
            .boxed();

        Ok(HttpResponse::new(status, headers, body))
    }
}

impl std::fmt::Debug for ReqwestEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestEngine").finish_non_exhaustive()
    }
}
