//! Retry behaviour against a real HTTP server.

mod common;

use common::*;
use integrations_mercadopago::{ErrorKind, OutgoingRequest, RequestContext, RequestOptions};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::{Duration, Instant};
use wiremock::matchers::method;
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_server_errors_then_success() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(success_response(json!({"id": 7})))
        .mount(&server)
        .await;

    let mut request = OutgoingRequest::post(&format!("{}/v1/payments", server.uri())).unwrap();
    let started = Instant::now();
    let body = transport(&server)
        .send(
            &mut request,
            &RequestOptions::new().retry_wait(Duration::from_millis(300)),
        )
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert_eq!(body.as_ref(), br#"{"id":7}"#);
    // Two waits of 300ms; a third would push past 900ms.
    assert!(elapsed >= Duration::from_millis(600), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_millis(900), "elapsed {elapsed:?}");

    let requests = received(&server).await;
    assert_eq!(requests.len(), 3);

    let keys = header_values(&requests, "x-idempotency-key");
    assert_eq!(keys.len(), 3);
    assert!(keys.iter().all(|key| key == &keys[0]));
}

#[tokio::test]
async fn test_exhausted_retries_return_last_response() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let mut request = OutgoingRequest::get(&format!("{}/v1/payments/1", server.uri())).unwrap();
    let err = transport(&server)
        .send(&mut request, &RequestOptions::new().retry_count(2))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(err.status_code, 502);
    assert_eq!(err.message, "bad gateway");
    assert_eq!(received(&server).await.len(), 3);
}

#[tokio::test]
async fn test_retry_count_from_config_applies_without_override() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut request = OutgoingRequest::get(&format!("{}/v1/payments/1", server.uri())).unwrap();
    let err = transport(&server)
        .send(&mut request, &RequestOptions::new())
        .await
        .unwrap_err();

    assert!(err.is_server_error());
    // One initial request plus three retries.
    assert_eq!(received(&server).await.len(), 4);
}

#[tokio::test]
async fn test_cancel_during_retry_wait_returns_promptly() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let ctx = RequestContext::new();
    let canceller = ctx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let mut request = OutgoingRequest::get(&format!("{}/v1/payments/1", server.uri()))
        .unwrap()
        .with_context(ctx);

    let started = Instant::now();
    let err = transport(&server)
        .send(
            &mut request,
            &RequestOptions::new().retry_wait(Duration::from_secs(30)),
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Cancelled);
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(received(&server).await.len(), 1);
}

#[tokio::test]
async fn test_already_cancelled_context_sends_nothing() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .respond_with(success_response(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let ctx = RequestContext::new();
    ctx.cancel();

    let mut request = OutgoingRequest::get(&format!("{}/v1/payments/1", server.uri()))
        .unwrap()
        .with_context(ctx);

    let err = transport(&server)
        .send(&mut request, &RequestOptions::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Cancelled);
}
