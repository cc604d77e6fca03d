//! Mercado Pago Client Library
//!
//! An async Rust client for the Mercado Pago payments API. The heart of the
//! crate is its transport layer, which turns an [`OutgoingRequest`] into an
//! authenticated HTTP call and maps every failure onto an [`ErrorResponse`].
//!
//! # Features
//!
//! - **Credentials**: a shared [`CredentialStore`] whose token can be swapped
//!   at runtime; the next request picks it up
//! - **Idempotency**: every request carries an `X-Idempotency-Key`, generated
//!   once per call and reused by its retries
//! - **Timeouts and cancellation**: each call runs under a [`RequestContext`]
//!   bound to the effective timeout
//! - **Retries**: transport errors and 5xx responses go through a pluggable
//!   [`RetryPolicy`]
//! - **Observability**: `tracing` spans and events, with credentials redacted
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use integrations_mercadopago::{MercadoPagoClient, PaymentRequest, RequestOptions};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MercadoPagoClient::builder()
//!         .access_token("APP_USR-your-access-token")
//!         .build()?;
//!
//!     let options = RequestOptions::new()
//!         .timeout(Duration::from_secs(10))
//!         .retry_count(2);
//!
//!     let request = PaymentRequest::new(100.0, "pix", "buyer@example.com");
//!     let payment = client.payments().create(&request, &options).await?;
//!     println!("payment {} is {}", payment.id, payment.status);
//!
//!     let methods = client.payment_methods().list(&RequestOptions::new()).await?;
//!     println!("{} payment methods available", methods.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod auth;
pub mod client;
pub mod config;
pub mod context;
pub mod errors;
pub mod observability;
pub mod resilience;
pub mod services;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use auth::{AuthProvider, CredentialStore, Credentials};
pub use client::{MercadoPagoClient, MercadoPagoClientBuilder};
pub use config::{TransportConfig, TransportConfigBuilder};
pub use context::{ContextError, RequestContext};
pub use errors::{ErrorKind, ErrorResponse, MercadoPagoResult};
pub use resilience::{
    BackoffConfig, DefaultRetryPolicy, ExponentialBackoffRetry, RetryConfig, RetryPolicy,
};
pub use services::{PaymentClient, PaymentMethodClient};
pub use transport::{
    HttpEngine, HttpResponse, OutgoingRequest, RequestOptions, TransportClient, TransportError,
    TransportResponse,
};

// Type re-exports
pub use types::payment::{
    CancelRequest, CaptureRequest, Identification, Payer, PayerRequest, PaymentRequest,
    PaymentResponse, Paging, SearchFilters, SearchResponse,
};
pub use types::payment_method::PaymentMethod;

/// Mock implementations for testing.
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
