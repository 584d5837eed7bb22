//! HTTP behaviour of the client against a local mock server.

use exchange_rate_client::{ExchangeRateClient, ExchangeRateError};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ExchangeRateClient {
    ExchangeRateClient::new(&format!("{}/v6", server.uri()), "test-key".into())
}

#[tokio::test]
async fn latest_requests_key_and_base_in_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v6/test-key/latest/CAD"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "success",
            "base_code": "CAD",
            "conversion_rates": { "CAD": 1, "USD": 0.7312 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let rates = client(&server).latest("CAD").await.unwrap();

    assert_eq!(rates.base_code, "CAD");
    assert_eq!(rates.rate("USD"), Some(0.7312));
}

#[tokio::test]
async fn rate_picks_the_quote_currency() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v6/test-key/latest/CAD"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "success",
            "base_code": "CAD",
            "conversion_rates": { "USD": 0.69 }
        })))
        .mount(&server)
        .await;

    let client = client(&server);
    assert_eq!(client.rate("CAD", "USD").await.unwrap(), 0.69);
    assert!(matches!(
        client.rate("CAD", "EUR").await.unwrap_err(),
        ExchangeRateError::Parse(_)
    ));
}

#[tokio::test]
async fn non_2xx_is_api_error_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    match client(&server).latest("CAD").await.unwrap_err() {
        ExchangeRateError::Api { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, "forbidden");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn error_result_in_200_body_is_unsuccessful() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "error",
            "error-type": "invalid-key"
        })))
        .mount(&server)
        .await;

    let err = client(&server).latest("CAD").await.unwrap_err();
    assert!(matches!(err, ExchangeRateError::Unsuccessful(reason) if reason == "invalid-key"));
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    let server = MockServer::start().await;
    let client = client(&server);
    drop(server);

    assert!(matches!(
        client.latest("CAD").await.unwrap_err(),
        ExchangeRateError::Network(_)
    ));
}
