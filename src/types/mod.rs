//! Type definitions for the Mercado Pago API.
//!
//! Request and response bodies of the payments and payment methods endpoints.

pub mod payment;
pub mod payment_method;

pub use payment::{
    CancelRequest, CaptureRequest, Identification, Payer, PayerRequest, PaymentRequest,
    PaymentResponse, Paging, SearchFilters, SearchResponse,
};
pub use payment_method::PaymentMethod;
