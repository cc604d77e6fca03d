//! Authentication for the Mercado Pago client.
//!
//! Credentials live in a [`CredentialStore`], a cheap-to-clone handle over a
//! lock-guarded value. Every request reads the store when it is prepared, so
//! a token swapped with [`CredentialStore::set_access_token`] is picked up by
//! the next call without rebuilding any client.

use http::header::AUTHORIZATION;
use http::{HeaderMap, HeaderName, HeaderValue};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

use crate::errors::{ErrorResponse, MercadoPagoResult};

/// Product identifier sent with every request.
pub const DEFAULT_PRODUCT_ID: &str = "123";

/// Header carrying the product identifier.
pub const PRODUCT_ID_HEADER: &str = "x-product-id";

static GLOBAL_STORE: Lazy<CredentialStore> = Lazy::new(CredentialStore::empty);

/// Applies authentication to outgoing request headers.
pub trait AuthProvider: Send + Sync {
    /// Writes the authentication headers, replacing any existing values.
    ///
    /// Fails with a construction error, leaving `headers` untouched, when the
    /// credentials cannot be encoded as header values.
    fn apply_auth(&self, headers: &mut HeaderMap) -> MercadoPagoResult<()>;

    /// Get the authentication scheme name.
    fn scheme(&self) -> &str {
        "Bearer"
    }
}

/// Access token and product identifier.
#[derive(Clone)]
pub struct Credentials {
    access_token: SecretString,
    product_id: String,
}

impl Credentials {
    /// Creates credentials with the fixed product identifier.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: SecretString::new(access_token.into()),
            product_id: DEFAULT_PRODUCT_ID.to_string(),
        }
    }

    /// Returns the access token (exposing the secret).
    pub fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }

    /// Returns the product identifier.
    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    /// Returns a hint of the token for debugging (last 4 characters).
    pub fn token_hint(&self) -> String {
        let token = self.access_token.expose_secret();
        let count = token.chars().count();
        if count > 4 {
            let tail: String = token.chars().skip(count - 4).collect();
            format!("...{tail}")
        } else {
            "****".to_string()
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"[REDACTED]")
            .field("product_id", &self.product_id)
            .finish()
    }
}

/// Shared, synchronized holder of the current credentials.
#[derive(Clone)]
pub struct CredentialStore {
    inner: Arc<RwLock<Credentials>>,
}

impl CredentialStore {
    /// Creates a store holding `access_token`.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Credentials::new(access_token))),
        }
    }

    /// Creates a store with an empty token; call [`initialize`](Self::initialize) before use.
    pub fn empty() -> Self {
        Self::new(String::new())
    }

    /// Returns the process-wide store.
    pub fn global() -> &'static CredentialStore {
        &GLOBAL_STORE
    }

    /// Replaces the credentials: sets the token and resets the product id.
    pub fn initialize(&self, access_token: impl Into<String>) {
        *self.inner.write() = Credentials::new(access_token);
    }

    /// Updates the token in place. Requests already dispatched keep the old one.
    pub fn set_access_token(&self, access_token: impl Into<String>) {
        self.inner.write().access_token = SecretString::new(access_token.into());
    }

    /// Returns the current access token.
    pub fn access_token(&self) -> SecretString {
        self.inner.read().access_token.clone()
    }

    /// Returns the current product identifier.
    pub fn product_id(&self) -> String {
        self.inner.read().product_id.clone()
    }

    /// Returns a consistent copy of the current credentials.
    pub fn snapshot(&self) -> Credentials {
        self.inner.read().clone()
    }

    /// Returns true once a non-empty token has been set.
    pub fn is_initialized(&self) -> bool {
        !self.inner.read().access_token.expose_secret().is_empty()
    }
}

impl AuthProvider for CredentialStore {
    fn apply_auth(&self, headers: &mut HeaderMap) -> MercadoPagoResult<()> {
        let credentials = self.snapshot();

        let mut authorization =
            HeaderValue::try_from(format!("{} {}", self.scheme(), credentials.access_token()))
                .map_err(|_| {
                    tracing::warn!(
                        token_hint = %credentials.token_hint(),
                        "Access token is not a valid header value"
                    );
                    ErrorResponse::construction("access token is not a valid header value")
                })?;
        authorization.set_sensitive(true);

        let product_id = HeaderValue::try_from(credentials.product_id())
            .map_err(|_| ErrorResponse::construction("product id is not a valid header value"))?;

        headers.insert(AUTHORIZATION, authorization);
        headers.insert(HeaderName::from_static(PRODUCT_ID_HEADER), product_id);
        Ok(())
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("credentials", &*self.inner.read())
            .finish()
    }
}

/// Initializes the process-wide store.
pub fn initialize(access_token: impl Into<String>) {
    CredentialStore::global().initialize(access_token);
}

/// Updates the token of the process-wide store.
pub fn set_access_token(access_token: impl Into<String>) {
    CredentialStore::global().set_access_token(access_token);
}
