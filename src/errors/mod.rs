//! Error types for the Mercado Pago client.
//!
//! Every failure surfaced by the transport or an endpoint client is an
//! [`ErrorResponse`]. The [`ErrorKind`] tells where the failure originated,
//! the status code is the HTTP status when a response exists.

use http::{HeaderMap, HeaderValue};
use std::fmt;
use thiserror::Error;

use crate::context::ContextError;
use crate::transport::TransportError;

/// Result type alias for Mercado Pago operations.
pub type MercadoPagoResult<T> = Result<T, ErrorResponse>;

/// Synthetic status used when no response exists to take a status from.
pub const INTERNAL_ERROR_STATUS: u16 = 500;

/// Status reported when the request never produced a response.
pub const NO_RESPONSE_STATUS: u16 = 0;

/// Origin of an [`ErrorResponse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request could not be built (bad method, URL, header or body).
    Construction,
    /// The network exchange failed.
    Transport,
    /// The request context was cancelled by the caller.
    Cancelled,
    /// The request context deadline elapsed.
    DeadlineExceeded,
    /// A response arrived but its body could not be read.
    BodyRead,
    /// The server answered with a status outside 200-299.
    Api,
    /// The body was read but is not the expected JSON shape.
    Decode,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Construction => "construction",
            ErrorKind::Transport => "transport",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::DeadlineExceeded => "deadline_exceeded",
            ErrorKind::BodyRead => "body_read",
            ErrorKind::Api => "api",
            ErrorKind::Decode => "decode",
        };
        f.write_str(name)
    }
}

/// Error returned by every Mercado Pago operation.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ErrorResponse {
    /// Where the failure originated.
    pub kind: ErrorKind,
    /// HTTP status code, or a synthetic one when no response exists.
    pub status_code: u16,
    /// Human readable message; the raw server body for API errors.
    pub message: String,
    /// Response headers, when a response was received.
    pub headers: Option<HeaderMap>,
}

impl ErrorResponse {
    /// Creates an error without headers.
    pub fn new(kind: ErrorKind, status_code: u16, message: impl Into<String>) -> Self {
        Self {
            kind,
            status_code,
            message: message.into(),
            headers: None,
        }
    }

    /// Request could not be built.
    pub fn construction(message: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::Construction,
            INTERNAL_ERROR_STATUS,
            format!("error creating request: {message}"),
        )
    }

    /// Request body could not be serialized.
    pub fn marshal(err: &serde_json::Error) -> Self {
        Self::new(
            ErrorKind::Construction,
            INTERNAL_ERROR_STATUS,
            format!("error marshaling request body: {err}"),
        )
    }

    /// The exchange failed before any final response was received.
    pub fn sending(err: &TransportError) -> Self {
        let kind = match err {
            TransportError::Context(ContextError::Cancelled) => ErrorKind::Cancelled,
            TransportError::Context(ContextError::DeadlineExceeded) => ErrorKind::DeadlineExceeded,
            _ => ErrorKind::Transport,
        };

        Self::new(
            kind,
            NO_RESPONSE_STATUS,
            format!("error sending request: {err}"),
        )
    }

    /// The response body could not be drained.
    pub fn body_read(status_code: u16, headers: HeaderMap, err: &TransportError) -> Self {
        Self {
            kind: ErrorKind::BodyRead,
            status_code,
            message: format!("error reading response body: {err}"),
            headers: Some(headers),
        }
    }

    /// The server answered with a non-2xx status; the body is the message.
    pub fn api(status_code: u16, body: &[u8], headers: HeaderMap) -> Self {
        Self {
            kind: ErrorKind::Api,
            status_code,
            message: String::from_utf8_lossy(body).into_owned(),
            headers: Some(headers),
        }
    }

    /// A successful body did not match the expected JSON shape.
    pub fn decode(err: &serde_json::Error) -> Self {
        Self::new(
            ErrorKind::Decode,
            INTERNAL_ERROR_STATUS,
            format!("error unmarshaling response body: {err}"),
        )
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns true for API errors with a 4xx status.
    pub fn is_client_error(&self) -> bool {
        self.kind == ErrorKind::Api && (400..500).contains(&self.status_code)
    }

    /// Returns true for API errors with a 5xx status.
    pub fn is_server_error(&self) -> bool {
        self.kind == ErrorKind::Api && self.status_code >= 500
    }

    /// Returns true if the request context ended the call.
    pub fn is_context_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Cancelled | ErrorKind::DeadlineExceeded)
    }

    /// Returns the first value of a response header, if any.
    pub fn header(&self, name: &str) -> Option<&HeaderValue> {
        self.headers.as_ref().and_then(|headers| headers.get(name))
    }

    /// Returns the `x-request-id` response header for support tickets.
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id").and_then(|v| v.to_str().ok())
    }
}

impl From<url::ParseError> for ErrorResponse {
    fn from(err: url::ParseError) -> Self {
        ErrorResponse::construction(format!("invalid URL: {err}"))
    }
}
