//! # Integration Tests for the Receipt and Advice Model Client
//!
//! | Operation          | Method | Path                                                  |
//! |--------------------|--------|-------------------------------------------------------|
//! | `analyze_receipt`  | POST   | `/v1beta/models/gemini-2.5-flash-image:generateContent` |
//! | `financial_advice` | POST   | `/v1beta/models/gemini-3-flash-preview:generateContent` |

use klaar_client::{ClientConfig, ClientError, KlaarClient, OutputSource};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> KlaarClient {
    let config = ClientConfig::local_mock(&server.uri(), "test-key").expect("config");
    KlaarClient::new(config).expect("client")
}

fn offline_client() -> KlaarClient {
    let mut config = ClientConfig::local_mock("http://127.0.0.1:1", "unused").unwrap();
    config.model_api_key = None;
    KlaarClient::new(config).unwrap()
}

fn text_response(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{"content": {"parts": [{"text": text}], "role": "model"}}]
    })
}

#[tokio::test]
async fn receipt_is_parsed_from_fenced_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash-image:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(serde_json::json!({
            "contents": [{"parts": [{"inline_data": {"mime_type": "image/jpeg", "data": "aGk="}}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response(
            "```json\n{\"vendor\":\"Rimi\",\"amount\":12.4,\"date\":\"2026-03-01\",\"category\":\"Büroo\",\"summary\":\"Kohv.\"}\n```",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let out = client
        .vision()
        .analyze_receipt("aGk=", "image/jpeg")
        .await
        .expect("analysis");
    assert_eq!(out.source, OutputSource::Model);
    assert_eq!(out.value.vendor, "Rimi");
    assert_eq!(out.value.amount, 12.4);
}

#[tokio::test]
async fn receipt_amount_given_as_text_is_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response(
            r#"{"vendor":"Alexela","amount":"125.50","date":"2026-02-11","category":"Transport","summary":"Kütus."}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let out = client
        .vision()
        .analyze_receipt("aGk=", "image/jpeg")
        .await
        .expect("analysis");
    assert_eq!(out.value.amount, 125.5);
    assert_eq!(out.value.category, "Transport");
}

#[tokio::test]
async fn unparseable_receipt_is_model_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response("Ei saa aru.")))
        .mount(&server)
        .await;

    let client = test_client(&server);
    assert!(matches!(
        client.vision().analyze_receipt("aGk=", "image/png").await,
        Err(ClientError::Model(_))
    ));
}

#[tokio::test]
async fn advice_uses_text_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-3-flash-preview:generateContent"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(text_response(" Hoia kahe kuu puhvrit. ")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let out = client
        .vision()
        .financial_advice(12000.0, 3500.0, 0.5)
        .await
        .expect("advice");
    assert_eq!(out.value, "Hoia kahe kuu puhvrit.");
    assert!(!out.is_placeholder());
}

#[tokio::test]
async fn model_error_status_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    assert!(matches!(
        client.vision().financial_advice(1.0, 1.0, 0.0).await,
        Err(ClientError::ApiError { status: 429, .. })
    ));
}

#[tokio::test]
async fn missing_key_returns_placeholders_without_requests() {
    let client = offline_client();
    assert!(client.vision().is_placeholder_mode());

    let receipt = client.vision().analyze_receipt("aGk=", "image/jpeg").await.unwrap();
    assert!(receipt.is_placeholder());
    assert_eq!(receipt.value.vendor, "Mock Vendor OÜ (Demo)");

    let advice = client.vision().financial_advice(100.0, 900.0, 0.95).await.unwrap();
    assert_eq!(advice.source, OutputSource::Placeholder);
    assert!(advice.value.contains("Hoiatus"));
}
