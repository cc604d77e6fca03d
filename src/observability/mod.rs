//! Observability module for the Mercado Pago client.
//!
//! Structured logging through `tracing`, a subscriber initialiser, and
//! helpers that keep credentials out of log output.

mod logging;

pub use logging::{init_logging, LogFormat, LogLevel, LoggingConfig, LoggingError};

use http::header::AUTHORIZATION;
use http::{HeaderMap, HeaderValue};

const REDACTED: &str = "[REDACTED]";

/// Returns a copy of `headers` with credential values masked.
pub fn redact_headers(headers: &HeaderMap) -> HeaderMap {
    let mut redacted = HeaderMap::with_capacity(headers.len());

    for (name, value) in headers {
        if *name == AUTHORIZATION || value.is_sensitive() {
            redacted.append(name.clone(), HeaderValue::from_static(REDACTED));
        } else {
            redacted.append(name.clone(), value.clone());
        }
    }

    redacted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_headers_masks_authorization() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer APP_USR-secret"));
        headers.insert("x-product-id", HeaderValue::from_static("123"));

        let redacted = redact_headers(&headers);
        let debug_str = format!("{:?}", redacted);

        assert_eq!(redacted.get(AUTHORIZATION).unwrap(), REDACTED);
        assert_eq!(redacted.get("x-product-id").unwrap(), "123");
        assert!(!debug_str.contains("APP_USR-secret"));
    }

    #[test]
    fn test_redact_headers_masks_sensitive_values() {
        let mut value = HeaderValue::from_static("session-secret");
        value.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert("x-session", value);

        let redacted = redact_headers(&headers);
        assert_eq!(redacted.get("x-session").unwrap(), REDACTED);
    }
}
