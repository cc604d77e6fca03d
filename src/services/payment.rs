//! Payments service.

use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::instrument;
use url::Url;

use crate::context::RequestContext;
use crate::errors::{ErrorResponse, MercadoPagoResult};
use crate::transport::{OutgoingRequest, RequestOptions, TransportClient};
use crate::types::payment::{
    CancelRequest, CaptureRequest, PaymentRequest, PaymentResponse, SearchFilters, SearchResponse,
};

const PAYMENTS_PATH: &str = "/v1/payments";
const SEARCH_PATH: &str = "/v1/payments/search";
const PAYMENT_PATH: &str = "/v1/payments/{id}";

/// Client for the payments endpoints.
#[derive(Debug, Clone)]
pub struct PaymentClient {
    transport: Arc<TransportClient>,
}

impl PaymentClient {
    /// Creates a new payments client.
    pub fn new(transport: Arc<TransportClient>) -> Self {
        Self { transport }
    }

    /// Creates a payment.
    #[instrument(skip_all, fields(amount = request.transaction_amount))]
    pub async fn create(
        &self,
        request: &PaymentRequest,
        options: &RequestOptions,
    ) -> MercadoPagoResult<PaymentResponse> {
        self.create_with_context(request, options, RequestContext::new())
            .await
    }

    /// Creates a payment bound to a caller context.
    pub async fn create_with_context(
        &self,
        request: &PaymentRequest,
        options: &RequestOptions,
        context: RequestContext,
    ) -> MercadoPagoResult<PaymentResponse> {
        let url = self.url(PAYMENTS_PATH)?;
        let mut http_request = OutgoingRequest::from_parts(http::Method::POST, url)
            .with_json(request)?
            .with_context(context);

        self.send(&mut http_request, options).await
    }

    /// Searches payments.
    #[instrument(skip_all)]
    pub async fn search(
        &self,
        filters: &SearchFilters,
        options: &RequestOptions,
    ) -> MercadoPagoResult<SearchResponse> {
        let mut url = self.url(SEARCH_PATH)?;
        let query = filters.to_query();
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        let mut http_request = OutgoingRequest::from_parts(http::Method::GET, url);
        self.send(&mut http_request, options).await
    }

    /// Gets a payment by ID.
    #[instrument(skip(self, options))]
    pub async fn get(&self, id: i64, options: &RequestOptions) -> MercadoPagoResult<PaymentResponse> {
        let url = self.payment_url(id)?;
        let mut http_request = OutgoingRequest::from_parts(http::Method::GET, url);
        self.send(&mut http_request, options).await
    }

    /// Cancels a pending payment.
    #[instrument(skip(self, options))]
    pub async fn cancel(
        &self,
        id: i64,
        options: &RequestOptions,
    ) -> MercadoPagoResult<PaymentResponse> {
        self.update(id, &CancelRequest::default(), options).await
    }

    /// Captures the full authorized amount.
    #[instrument(skip(self, options))]
    pub async fn capture(
        &self,
        id: i64,
        options: &RequestOptions,
    ) -> MercadoPagoResult<PaymentResponse> {
        self.update(id, &CaptureRequest::full(), options).await
    }

    /// Captures part of the authorized amount.
    #[instrument(skip(self, options))]
    pub async fn capture_amount(
        &self,
        id: i64,
        amount: f64,
        options: &RequestOptions,
    ) -> MercadoPagoResult<PaymentResponse> {
        self.update(id, &CaptureRequest::amount(amount), options)
            .await
    }

    async fn update<B: serde::Serialize + Sync>(
        &self,
        id: i64,
        body: &B,
        options: &RequestOptions,
    ) -> MercadoPagoResult<PaymentResponse> {
        let url = self.payment_url(id)?;
        let mut http_request = OutgoingRequest::from_parts(http::Method::PUT, url).with_json(body)?;
        self.send(&mut http_request, options).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: &mut OutgoingRequest,
        options: &RequestOptions,
    ) -> MercadoPagoResult<T> {
        let body = self.transport.send(request, options).await?;
        serde_json::from_slice(&body).map_err(|e| ErrorResponse::decode(&e))
    }

    fn url(&self, path: &str) -> MercadoPagoResult<Url> {
        Ok(Url::parse(&self.transport.config().endpoint_url(path))?)
    }

    fn payment_url(&self, id: i64) -> MercadoPagoResult<Url> {
        self.url(&PAYMENT_PATH.replacen("{id}", &id.to_string(), 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::mocks::{fixtures, MockEngine, MockResponse};
    use http::Method;
    use serde_json::json;

    fn client(engine: &Arc<MockEngine>) -> PaymentClient {
        let transport = TransportClient::builder()
            .access_token("TEST-token")
            .engine(Arc::clone(engine))
            .build()
            .unwrap();
        PaymentClient::new(Arc::new(transport))
    }

    fn body_json(engine: &MockEngine) -> serde_json::Value {
        let body = engine.last_request().unwrap().body.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_create() {
        let engine = Arc::new(MockEngine::new());
        engine.queue_json(201, &fixtures::payment(42, "pending"));

        let request = PaymentRequest::new(100.0, "pix", "buyer@example.com");
        let payment = client(&engine)
            .create(&request, &RequestOptions::new())
            .await
            .unwrap();

        assert_eq!(payment.id, 42);
        assert_eq!(payment.status, "pending");

        let sent = engine.last_request().unwrap();
        assert_eq!(sent.method, Method::POST);
        assert_eq!(sent.url.as_str(), "https://api.mercadopago.com/v1/payments");
        assert_eq!(sent.header_values("content-type"), vec!["application/json"]);
        assert_eq!(body_json(&engine)["payment_method_id"], "pix");
    }

    #[tokio::test]
    async fn test_search_encodes_filters() {
        let engine = Arc::new(MockEngine::new());
        engine.queue_json(200, &fixtures::search_page(&[1, 2]));

        let filters = SearchFilters::new().external_reference("order 7");
        let page = client(&engine)
            .search(&filters, &RequestOptions::new())
            .await
            .unwrap();

        assert_eq!(page.len(), 2);
        assert_eq!(page.paging.total, 2);

        let sent = engine.last_request().unwrap();
        assert_eq!(sent.url.path(), "/v1/payments/search");
        assert_eq!(sent.url.query(), Some("external_reference=order+7"));
    }

    #[tokio::test]
    async fn test_get_substitutes_id() {
        let engine = Arc::new(MockEngine::new());
        engine.queue_json(200, &fixtures::payment(123456, "approved"));

        let payment = client(&engine)
            .get(123456, &RequestOptions::new())
            .await
            .unwrap();

        assert!(payment.is_approved());
        let sent = engine.last_request().unwrap();
        assert_eq!(sent.method, Method::GET);
        assert_eq!(sent.url.path(), "/v1/payments/123456");
        assert!(sent.body.is_none());
    }

    #[tokio::test]
    async fn test_cancel_and_capture_bodies() {
        let engine = Arc::new(MockEngine::new());
        engine.set_default(MockResponse::json(200, &fixtures::payment(9, "cancelled")));
        let client = client(&engine);

        client.cancel(9, &RequestOptions::new()).await.unwrap();
        assert_eq!(engine.last_request().unwrap().method, Method::PUT);
        assert_eq!(body_json(&engine), json!({"status": "cancelled"}));

        client.capture(9, &RequestOptions::new()).await.unwrap();
        assert_eq!(body_json(&engine), json!({"capture": true}));

        client
            .capture_amount(9, 25.5, &RequestOptions::new())
            .await
            .unwrap();
        assert_eq!(
            body_json(&engine),
            json!({"transaction_amount": 25.5, "capture": true})
        );
    }

    #[tokio::test]
    async fn test_malformed_json_is_decode_error() {
        let engine = Arc::new(MockEngine::new());
        engine.queue(MockResponse::status(200).with_body("not json"));

        let err = client(&engine)
            .get(1, &RequestOptions::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(err.message.starts_with("error unmarshaling response body: "));
    }
}
