//! Mercado Pago API client.
//!
//! Provides the main client interface for interacting with the Mercado Pago API.

use std::sync::Arc;

use crate::auth::CredentialStore;
use crate::config::{TransportConfig, TransportConfigBuilder};
use crate::errors::{ErrorResponse, MercadoPagoResult};
use crate::resilience::RetryPolicy;
use crate::services::{PaymentClient, PaymentMethodClient};
use crate::transport::{HttpEngine, TransportClient, TransportClientBuilder};

/// The main Mercado Pago client.
///
/// # Example
///
/// ```rust,no_run
/// use integrations_mercadopago::{MercadoPagoClient, PaymentRequest, RequestOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = MercadoPagoClient::builder()
///         .access_token("APP_USR-your-access-token")
///         .build()?;
///
///     let request = PaymentRequest::new(100.0, "pix", "buyer@example.com");
///     let payment = client.payments().create(&request, &RequestOptions::new()).await?;
///     println!("created payment {} ({})", payment.id, payment.status);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MercadoPagoClient {
    transport: Arc<TransportClient>,
    payments: PaymentClient,
    payment_methods: PaymentMethodClient,
}

impl MercadoPagoClient {
    /// Creates a new client builder.
    pub fn builder() -> MercadoPagoClientBuilder {
        MercadoPagoClientBuilder::new()
    }

    /// Creates a client from environment variables.
    ///
    /// Reads `MERCADOPAGO_ACCESS_TOKEN` and the variables understood by
    /// [`TransportConfig::from_env`].
    pub fn from_env() -> MercadoPagoResult<Self> {
        let access_token = std::env::var("MERCADOPAGO_ACCESS_TOKEN").map_err(|_| {
            ErrorResponse::construction("MERCADOPAGO_ACCESS_TOKEN environment variable not set")
        })?;

        MercadoPagoClientBuilder::new()
            .config(TransportConfig::from_env()?)
            .access_token(access_token)
            .build()
    }

    /// Creates a client from an access token.
    pub fn from_access_token(access_token: impl Into<String>) -> MercadoPagoResult<Self> {
        MercadoPagoClientBuilder::new()
            .access_token(access_token)
            .build()
    }

    /// Wraps an existing transport.
    pub fn from_transport(transport: Arc<TransportClient>) -> Self {
        Self {
            payments: PaymentClient::new(Arc::clone(&transport)),
            payment_methods: PaymentMethodClient::new(Arc::clone(&transport)),
            transport,
        }
    }

    /// Returns the payments client.
    pub fn payments(&self) -> &PaymentClient {
        &self.payments
    }

    /// Returns the payment methods client.
    pub fn payment_methods(&self) -> &PaymentMethodClient {
        &self.payment_methods
    }

    /// Returns the underlying transport.
    pub fn transport(&self) -> &Arc<TransportClient> {
        &self.transport
    }

    /// Returns the credential store; updates apply to the next request.
    pub fn credentials(&self) -> &CredentialStore {
        self.transport.credentials()
    }
}

/// Builder for the Mercado Pago client.
#[derive(Default)]
pub struct MercadoPagoClientBuilder {
    config: Option<TransportConfig>,
    config_builder: TransportConfigBuilder,
    transport: TransportClientBuilder,
}

impl MercadoPagoClientBuilder {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a complete configuration; individual setters below are then ignored.
    pub fn config(mut self, config: TransportConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.base_url(base_url);
        self
    }

    /// Sets the default timeout.
    pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config_builder = self.config_builder.timeout(timeout);
        self
    }

    /// Sets the default number of retry attempts.
    pub fn retry_count(mut self, count: u32) -> Self {
        self.config_builder = self.config_builder.retry_count(count);
        self
    }

    /// Sets the default wait between retry attempts.
    pub fn retry_wait(mut self, wait: std::time::Duration) -> Self {
        self.config_builder = self.config_builder.retry_wait(wait);
        self
    }

    /// Uses a dedicated credential store holding `access_token`.
    pub fn access_token(mut self, access_token: impl Into<String>) -> Self {
        self.transport = self.transport.access_token(access_token);
        self
    }

    /// Uses an existing credential store.
    pub fn credentials(mut self, credentials: CredentialStore) -> Self {
        self.transport = self.transport.credentials(credentials);
        self
    }

    /// Sets a custom HTTP engine.
    pub fn engine<E: HttpEngine + 'static>(mut self, engine: Arc<E>) -> Self {
        self.transport = self.transport.engine(engine);
        self
    }

    /// Sets a custom retry policy.
    pub fn retry_policy<P: RetryPolicy + 'static>(mut self, policy: P) -> Self {
        self.transport = self.transport.retry_policy(policy);
        self
    }

    /// Builds the client.
    pub fn build(self) -> MercadoPagoResult<MercadoPagoClient> {
        let config = match self.config {
            Some(config) => config,
            None => self.config_builder.build()?,
        };

        let transport = self.transport.config(config).build()?;
        Ok(MercadoPagoClient::from_transport(Arc::new(transport)))
    }
}
