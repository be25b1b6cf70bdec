//! Tests for the HTTP client module

use super::*;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.max_retries, 3);
    assert!(config.rate_limit.is_some());
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .timeout(Duration::from_secs(60))
        .max_retries(5)
        .backoff(Duration::from_millis(200), Duration::from_secs(30))
        .user_agent("test-agent/1.0")
        .no_rate_limit()
        .build();

    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.max_retries, 5);
    assert_eq!(config.initial_backoff, Duration::from_millis(200));
    assert_eq!(config.max_backoff, Duration::from_secs(30));
    assert_eq!(config.user_agent, "test-agent/1.0");
    assert!(config.rate_limit.is_none());
}

#[test]
fn test_calculate_backoff_doubles_and_caps() {
    let config = HttpClientConfig::builder()
        .backoff(Duration::from_millis(100), Duration::from_millis(500))
        .no_rate_limit()
        .build();
    let client = HttpClient::with_config(config);

    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(1), Duration::from_millis(200));
    assert_eq!(client.calculate_backoff(2), Duration::from_millis(400));
    assert_eq!(client.calculate_backoff(3), Duration::from_millis(500));
    assert_eq!(client.calculate_backoff(10), Duration::from_millis(500));
}

#[tokio::test]
async fn test_post_json_sends_bearer_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/query"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_json(json!({"startRow": 0})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"rows": []})))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(
        HttpClientConfig::builder().no_rate_limit().build(),
    );

    let body: Value = client
        .post_json(
            &format!("{}/query", mock_server.uri()),
            &json!({"startRow": 0}),
            "test-token",
        )
        .await
        .unwrap();

    assert_eq!(body, json!({"rows": []}));
}

#[tokio::test]
async fn test_post_json_retries_server_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(
        HttpClientConfig::builder()
            .max_retries(3)
            .backoff(Duration::from_millis(1), Duration::from_millis(5))
            .no_rate_limit()
            .build(),
    );

    let body: Value = client
        .post_json(&format!("{}/query", mock_server.uri()), &json!({}), "t")
        .await
        .unwrap();
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_post_json_exhausts_retries_on_persistent_5xx() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend error"))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(
        HttpClientConfig::builder()
            .max_retries(2)
            .backoff(Duration::from_millis(1), Duration::from_millis(5))
            .no_rate_limit()
            .build(),
    );

    let err = client
        .post_json::<_, Value>(&format!("{}/query", mock_server.uri()), &json!({}), "t")
        .await
        .unwrap_err();

    match err {
        crate::error::Error::HttpStatus { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "backend error");
        }
        other => panic!("Expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_post_json_does_not_retry_client_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(
        HttpClientConfig::builder().max_retries(3).no_rate_limit().build(),
    );

    let err = client
        .post_json::<_, Value>(&format!("{}/query", mock_server.uri()), &json!({}), "t")
        .await
        .unwrap_err();

    match &err {
        crate::error::Error::HttpStatus { status, .. } => assert_eq!(*status, 403),
        other => panic!("Expected HttpStatus, got {other:?}"),
    }
    assert!(!err.is_retryable());
}
