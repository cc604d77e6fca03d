//! Endpoint clients for the Mercado Pago API.
//!
//! Each client builds a request from a fixed path template, sends it through
//! the shared [`TransportClient`](crate::transport::TransportClient) and
//! decodes the JSON body.

mod payment;
mod payment_method;

pub use payment::PaymentClient;
pub use payment_method::PaymentMethodClient;
