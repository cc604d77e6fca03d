//! Shared helpers for the WireMock integration tests.

#![allow(dead_code)]

use integrations_mercadopago::{MercadoPagoClient, TransportClient, TransportConfig};
use std::time::Duration;
use wiremock::{MockServer, Request, ResponseTemplate};

pub const TEST_TOKEN: &str = "TEST-1234567890";

/// Starts a fresh mock server.
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Transport configuration pointing at `server` with short retry waits.
pub fn test_config(server: &MockServer) -> TransportConfig {
    TransportConfig::builder()
        .base_url(server.uri())
        .retry_count(3)
        .retry_wait(Duration::from_millis(20))
        .timeout(Duration::from_secs(5))
        .build()
        .expect("valid test config")
}

/// Transport client with its own credential store.
pub fn transport(server: &MockServer) -> TransportClient {
    TransportClient::builder()
        .config(test_config(server))
        .access_token(TEST_TOKEN)
        .build()
        .expect("Failed to build transport")
}

/// Full client with its own credential store.
pub fn client(server: &MockServer) -> MercadoPagoClient {
    MercadoPagoClient::builder()
        .config(test_config(server))
        .access_token(TEST_TOKEN)
        .build()
        .expect("Failed to build client")
}

/// Success response with a JSON body.
pub fn success_response(body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

/// Values of `name` across the requests, one entry per header occurrence.
pub fn header_values(requests: &[Request], name: &str) -> Vec<String> {
    requests
        .iter()
        .flat_map(|request| {
            request
                .headers
                .get_all(name)
                .iter()
                .filter_map(|value| value.to_str().ok().map(str::to_string))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Requests received so far.
pub async fn received(server: &MockServer) -> Vec<Request> {
    server
        .received_requests()
        .await
        .expect("request recording enabled")
}
