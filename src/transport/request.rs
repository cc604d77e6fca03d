//! Outgoing request representation.

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;
use url::Url;

use crate::context::RequestContext;
use crate::errors::{ErrorResponse, MercadoPagoResult};

/// A request about to be sent through the transport.
///
/// The body is kept as [`Bytes`] so every retry resends the same payload.
#[derive(Debug, Clone)]
pub struct OutgoingRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Bytes>,
    context: RequestContext,
}

impl OutgoingRequest {
    /// Creates a request from a method name and an absolute URL.
    pub fn new(method: &str, url: &str) -> MercadoPagoResult<Self> {
        let method = Method::from_bytes(method.as_bytes())
            .map_err(|e| ErrorResponse::construction(format!("invalid method {method:?}: {e}")))?;
        let url = Url::parse(url)?;

        Ok(Self::from_parts(method, url))
    }

    /// Creates a request from already validated parts.
    pub fn from_parts(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            context: RequestContext::new(),
        }
    }

    /// Creates a new GET request.
    pub fn get(url: &str) -> MercadoPagoResult<Self> {
        Self::new("GET", url)
    }

    /// Creates a new POST request.
    pub fn post(url: &str) -> MercadoPagoResult<Self> {
        Self::new("POST", url)
    }

    /// Creates a new PUT request.
    pub fn put(url: &str) -> MercadoPagoResult<Self> {
        Self::new("PUT", url)
    }

    /// Sets the raw request body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serializes `value` as the JSON body and sets `Content-Type`.
    pub fn with_json<T: Serialize + ?Sized>(mut self, value: &T) -> MercadoPagoResult<Self> {
        let body = serde_json::to_vec(value).map_err(|e| ErrorResponse::marshal(&e))?;
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.body = Some(Bytes::from(body));
        Ok(self)
    }

    /// Appends a header.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Attaches a caller context.
    pub fn with_context(mut self, context: RequestContext) -> Self {
        self.context = context;
        self
    }

    /// Returns the method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the headers for in-place edits.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Returns the body, if any.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Returns the attached context.
    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// Replaces the attached context and returns the previous one.
    pub fn set_context(&mut self, context: RequestContext) -> RequestContext {
        std::mem::replace(&mut self.context, context)
    }
}
