//! Payment methods service.

use std::sync::Arc;
use tracing::instrument;
use url::Url;

use crate::errors::{ErrorResponse, MercadoPagoResult};
use crate::transport::{OutgoingRequest, RequestOptions, TransportClient};
use crate::types::payment_method::PaymentMethod;

const PAYMENT_METHODS_PATH: &str = "/v1/payment_methods";

/// Client for the payment methods endpoint.
#[derive(Debug, Clone)]
pub struct PaymentMethodClient {
    transport: Arc<TransportClient>,
}

impl PaymentMethodClient {
    /// Creates a new payment methods client.
    pub fn new(transport: Arc<TransportClient>) -> Self {
        Self { transport }
    }

    /// Lists the payment methods available to the account.
    #[instrument(skip_all)]
    pub async fn list(&self, options: &RequestOptions) -> MercadoPagoResult<Vec<PaymentMethod>> {
        let url = Url::parse(&self.transport.config().endpoint_url(PAYMENT_METHODS_PATH))?;
        let mut request = OutgoingRequest::from_parts(http::Method::GET, url);

        let body = self.transport.send(&mut request, options).await?;
        let methods: Vec<PaymentMethod> =
            serde_json::from_slice(&body).map_err(|e| ErrorResponse::decode(&e))?;

        tracing::debug!(count = methods.len(), "Listed payment methods");
        Ok(methods)
    }
}
