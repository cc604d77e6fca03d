//! The transport client: authentication, idempotency, timeout and retry.

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use super::{HttpEngine, OutgoingRequest, ReqwestEngine, RequestOptions, IDEMPOTENCY_KEY_HEADER};
use crate::auth::{AuthProvider, CredentialStore};
use crate::config::TransportConfig;
use crate::errors::{ErrorResponse, MercadoPagoResult};
use crate::observability::redact_headers;
use crate::resilience::{should_retry, DefaultRetryPolicy, RetryPolicy};

/// Successful response of a transport call.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code (always 2xx).
    pub status: u16,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body.
    pub body: Bytes,
}

/// Sends requests to the Mercado Pago API.
///
/// Every call is bound to a timeout, carries the current credentials and an
/// idempotency key, and is retried through the configured [`RetryPolicy`]
/// when the first attempt fails with a transport error or a 5xx status.
pub struct TransportClient {
    engine: Arc<dyn HttpEngine>,
    retry_policy: Arc<dyn RetryPolicy>,
    credentials: CredentialStore,
    config: TransportConfig,
}

impl TransportClient {
    /// Creates a new client builder.
    pub fn builder() -> TransportClientBuilder {
        TransportClientBuilder::new()
    }

    /// Returns the configuration.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Returns the credential store read by every call.
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Sends `request` and returns the raw response body.
    pub async fn send(
        &self,
        request: &mut OutgoingRequest,
        options: &RequestOptions,
    ) -> MercadoPagoResult<Bytes> {
        self.execute(request, options).await.map(|response| response.body)
    }

    /// Sends `request` and returns status, headers and body.
    ///
    /// The request's headers are updated in place. Its context is replaced by
    /// a child bound to the effective timeout for the duration of the call,
    /// then restored.
    #[instrument(
        skip_all,
        fields(
            method = %request.method(),
            url = %request.url(),
            timeout_ms = tracing::field::Empty
        )
    )]
    pub async fn execute(
        &self,
        request: &mut OutgoingRequest,
        options: &RequestOptions,
    ) -> MercadoPagoResult<TransportResponse> {
        let timeout = options.effective_timeout().unwrap_or(self.config.timeout);
        tracing::Span::current().record(
            "timeout_ms",
            u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        );

        let bound = request.context().with_timeout(timeout);
        let caller = request.set_context(bound);

        let result = self.dispatch(request, options).await;

        request.set_context(caller);
        result
    }

    async fn dispatch(
        &self,
        request: &mut OutgoingRequest,
        options: &RequestOptions,
    ) -> MercadoPagoResult<TransportResponse> {
        self.prepare_headers(request.headers_mut(), options)?;
        tracing::debug!(headers = ?redact_headers(request.headers()), "Sending request");

        let outcome = match self.engine.execute(request).await {
            first if should_retry(&first) => {
                match &first {
                    Ok(response) => {
                        tracing::info!(status = response.status, "Server error, retrying");
                    }
                    Err(err) => tracing::warn!(error = %err, "Transport error, retrying"),
                }
                drop(first);
                self.retry_policy
                    .retry(request, self.engine.as_ref(), options)
                    .await
            }
            first => first,
        };

        let mut response = outcome.map_err(|err| {
            tracing::warn!(error = %err, "Request failed");
            ErrorResponse::sending(&err)
        })?;

        let status = response.status;
        let headers = std::mem::take(&mut response.headers);

        let body = match response.bytes(request.context()).await {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(status, error = %err, "Failed to read response body");
                return Err(ErrorResponse::body_read(status, headers, &err));
            }
        };

        if !(200..300).contains(&status) {
            tracing::debug!(status, "API error response");
            return Err(ErrorResponse::api(status, &body, headers));
        }

        tracing::debug!(status, body_len = body.len(), "Request succeeded");
        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }

    /// Merges custom headers, then writes credentials and the idempotency key.
    ///
    /// A caller-supplied idempotency key in `options` replaces the one already
    /// on the request, so exactly one key goes on the wire.
    fn prepare_headers(
        &self,
        headers: &mut HeaderMap,
        options: &RequestOptions,
    ) -> MercadoPagoResult<()> {
        let key = HeaderName::from_static(IDEMPOTENCY_KEY_HEADER);

        if let Some(custom) = options.get_custom_headers() {
            for (name, value) in custom {
                if *name != key {
                    headers.append(name.clone(), value.clone());
                }
            }
            if let Some(value) = custom.get(&key) {
                headers.insert(key.clone(), value.clone());
            }
        }

        self.credentials.apply_auth(headers)?;

        if !headers.contains_key(&key) {
            let value = HeaderValue::try_from(Uuid::new_v4().to_string())
                .map_err(ErrorResponse::construction)?;
            headers.insert(key, value);
        }

        Ok(())
    }
}

impl std::fmt::Debug for TransportClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportClient")
            .field("config", &self.config)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

/// Builder for [`TransportClient`].
#[derive(Default)]
pub struct TransportClientBuilder {
    config: Option<TransportConfig>,
    credentials: Option<CredentialStore>,
    engine: Option<Arc<dyn HttpEngine>>,
    retry_policy: Option<Arc<dyn RetryPolicy>>,
}

impl TransportClientBuilder {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    pub fn config(mut self, config: TransportConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Uses `credentials` instead of the process-wide store.
    pub fn credentials(mut self, credentials: CredentialStore) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Uses a dedicated store holding `access_token`.
    pub fn access_token(mut self, access_token: impl Into<String>) -> Self {
        self.credentials = Some(CredentialStore::new(access_token));
        self
    }

    /// Sets a custom HTTP engine.
    pub fn engine<E: HttpEngine + 'static>(mut self, engine: Arc<E>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Sets a custom retry policy.
    pub fn retry_policy<P: RetryPolicy + 'static>(mut self, policy: P) -> Self {
        self.retry_policy = Some(Arc::new(policy));
        self
    }

    /// Builds the client.
    pub fn build(self) -> MercadoPagoResult<TransportClient> {
        let config = self.config.unwrap_or_default();

        let engine: Arc<dyn HttpEngine> = match self.engine {
            Some(engine) => engine,
            None => Arc::new(
                ReqwestEngine::new(&config.user_agent).map_err(ErrorResponse::construction)?,
            ),
        };

        let retry_policy = self
            .retry_policy
            .unwrap_or_else(|| Arc::new(DefaultRetryPolicy::new(config.retry_config())));

        let credentials = self
            .credentials
            .unwrap_or_else(|| CredentialStore::global().clone());

        if !credentials.is_initialized() {
            tracing::warn!("Credential store has no access token; requests will be rejected");
        }

        Ok(TransportClient {
            engine,
            retry_policy,
            credentials,
            config,
        })
    }
}
