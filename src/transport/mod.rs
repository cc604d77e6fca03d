//! HTTP transport layer for the Mercado Pago client.
//!
//! Turns an [`OutgoingRequest`] into an authenticated HTTP call with
//! idempotency, timeout and retry handling, and maps failures onto
//! [`ErrorResponse`](crate::errors::ErrorResponse).

mod client;
mod engine;
mod options;
mod request;

pub use client::{TransportClient, TransportClientBuilder, TransportResponse};
pub use engine::{ByteStream, HttpEngine, HttpResponse, ReqwestEngine};
pub use options::RequestOptions;
pub use request::OutgoingRequest;

use crate::context::ContextError;

/// Header carrying the idempotency key.
pub const IDEMPOTENCY_KEY_HEADER: &str = "x-idempotency-key";

/// Transport error types.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// Connection error.
    #[error("Connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// The HTTP engine gave up waiting.
    #[error("Timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
    },

    /// The request context ended.
    #[error(transparent)]
    Context(#[from] ContextError),

    /// The engine rejected the request before sending it.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Error message.
        message: String,
    },

    /// The response body stream failed.
    #[error("Body error: {message}")]
    Body {
        /// Error message.
        message: String,
    },

    /// Any other engine failure.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();
        if err.is_timeout() {
            TransportError::Timeout { message }
        } else if err.is_connect() {
            TransportError::Connection { message }
        } else if err.is_builder() {
            TransportError::InvalidRequest { message }
        } else if err.is_body() || err.is_decode() {
            TransportError::Body { message }
        } else {
            TransportError::Other { message }
        }
    }
}
