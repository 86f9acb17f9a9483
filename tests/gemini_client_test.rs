use eco_choice::core::RecommendationService;
use eco_choice::{EcoError, GeminiClient, ServiceError, ServiceSettings};
use httpmock::prelude::*;
use serde_json::json;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn client_for(server: &MockServer) -> GeminiClient<ServiceSettings> {
    let settings = ServiceSettings::new("test-key").with_api_base(server.base_url());
    GeminiClient::new(settings).unwrap()
}

/// Wraps model output text the way the generateContent endpoint does.
fn envelope(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

fn service_error(result: eco_choice::Result<eco_choice::SustainableProductRecommendation>) -> ServiceError {
    match assert_err!(result) {
        EcoError::ServiceError(e) => e,
        other => panic!("expected a service error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_alternative_returns_recommendation() {
    let server = MockServer::start();
    let payload = json!({
        "name": "Stainless Steel Water Bottle",
        "description": "A durable bottle you can refill for years.",
        "sustainability_features": ["Reusable", "Recyclable", "Reduces plastic waste"],
        "original_product_category": "Kitchen Supplies"
    });

    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path(GENERATE_PATH)
            .header("x-goog-api-key", "test-key")
            .body_contains("\\\"plastic water bottle\\\"")
            .body_contains("\"temperature\":0.7")
            .body_contains("\"responseMimeType\":\"application/json\"");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(envelope(&payload.to_string()));
    });

    let client = client_for(&server);
    let recommendation = assert_ok!(client.fetch_alternative("plastic water bottle").await);

    api_mock.assert();
    assert_eq!(recommendation.name, "Stainless Steel Water Bottle");
    assert_eq!(
        recommendation.description,
        "A durable bottle you can refill for years."
    );
    assert_eq!(
        recommendation.sustainability_features,
        vec!["Reusable", "Recyclable", "Reduces plastic waste"]
    );
    assert_eq!(recommendation.original_product_category, "Kitchen Supplies");
}

#[tokio::test]
async fn test_empty_text_is_an_empty_response() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH);
        then.status(200).json_body(envelope("   \n"));
    });

    let result = client_for(&server).fetch_alternative("paper towels").await;

    api_mock.assert();
    assert!(matches!(service_error(result), ServiceError::EmptyResponse));
}

#[tokio::test]
async fn test_no_candidates_is_an_empty_response() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH);
        then.status(200)
            .json_body(json!({ "promptFeedback": { "blockReason": "OTHER" } }));
    });

    let result = client_for(&server).fetch_alternative("paper towels").await;
    assert!(matches!(service_error(result), ServiceError::EmptyResponse));
}

#[tokio::test]
async fn test_non_json_text_is_a_malformed_response() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH);
        then.status(200)
            .json_body(envelope("Sure! Try a bamboo toothbrush."));
    });

    let result = client_for(&server).fetch_alternative("toothbrush").await;
    assert!(matches!(
        service_error(result),
        ServiceError::MalformedResponse(_)
    ));
}

#[tokio::test]
async fn test_missing_field_is_rejected() {
    let server = MockServer::start();
    let payload = json!({
        "name": "Bamboo Toothbrush",
        "sustainability_features": ["Biodegradable"],
        "original_product_category": "Personal Care"
    });
    server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH);
        then.status(200).json_body(envelope(&payload.to_string()));
    });

    let result = client_for(&server).fetch_alternative("toothbrush").await;
    match service_error(result) {
        ServiceError::MissingRequiredFields { fields } => assert_eq!(fields, vec!["description"]),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_http_error_status_is_a_service_error() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH);
        then.status(500).body("internal error");
    });

    let result = client_for(&server).fetch_alternative("paper towels").await;

    api_mock.assert();
    match service_error(result) {
        ServiceError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "internal error");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_failed_request_is_not_retried() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH);
        then.status(503);
    });

    let result = client_for(&server).fetch_alternative("paper towels").await;

    assert!(result.is_err());
    api_mock.assert_hits(1);
}

#[tokio::test]
async fn test_timeout_is_a_transport_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH);
        then.status(200)
            .delay(Duration::from_secs(2))
            .json_body(envelope("{}"));
    });

    let settings = ServiceSettings::new("test-key")
        .with_api_base(server.base_url())
        .with_timeout(Duration::from_millis(200));
    let client = GeminiClient::new(settings).unwrap();

    let result = client.fetch_alternative("paper towels").await;
    assert!(matches!(service_error(result), ServiceError::Transport(_)));
}
