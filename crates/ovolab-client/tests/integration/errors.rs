//! Error extraction from backend responses.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use ovolab_client::Error;
use ovolab_core::RecordId;

use crate::common::TestHarness;

#[tokio::test]
async fn test_validation_detail_list_is_joined() {
    let harness = TestHarness::logged_in().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/gfe/3"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": [
                {"loc": ["path", "gfe_id"], "msg": "value is not a valid integer", "type": "type_error"},
                {"loc": ["query", "x"], "msg": "extra fields not permitted", "type": "extra"}
            ]
        })))
        .mount(&harness.server)
        .await;

    let err = harness.client.gfe().get(RecordId::new(3)).await.unwrap_err();

    assert_eq!(
        err.user_message(),
        "value is not a valid integer; extra fields not permitted"
    );
    assert_eq!(err.status(), Some(422));
}

#[tokio::test]
async fn test_not_found_detail() {
    let harness = TestHarness::logged_in().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/fecundacion/9"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "Fecundación no encontrada"})),
        )
        .mount(&harness.server)
        .await;

    let err = harness
        .client
        .fecundaciones()
        .get(RecordId::new(9))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "API error (404): Fecundación no encontrada");
}

#[tokio::test]
async fn test_plain_text_body_is_the_message() {
    let harness = TestHarness::logged_in().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/transferencia/1"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&harness.server)
        .await;

    let err = harness
        .client
        .transferencias()
        .get(RecordId::new(1))
        .await
        .unwrap_err();

    let Error::Api { status, message } = err else {
        unreachable!()
    };
    assert_eq!(status, 502);
    assert_eq!(message, "Bad Gateway");
}

#[tokio::test]
async fn test_malformed_success_body_is_serialization_error() {
    let harness = TestHarness::logged_in().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/sesion-transferencia/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy login</html>"))
        .mount(&harness.server)
        .await;

    let err = harness
        .client
        .sesiones_transferencia()
        .get(RecordId::new(1))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Serialization(_)));
}

#[tokio::test]
async fn test_invalid_input_never_reaches_backend() {
    let harness = TestHarness::logged_in().await;
    let input = ovolab_core::types::TransferenciaInput::default();

    let err = harness.client.transferencias().create(&input).await.unwrap_err();

    let Error::Validation(errors) = &err else {
        unreachable!()
    };
    assert_eq!(errors[0].field, "numero_secuencial");
    assert_eq!(harness.request_count().await, 0);
}

#[tokio::test]
async fn test_health_is_outside_api_prefix() {
    let harness = TestHarness::new().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "degraded",
            "database": "error",
            "latency_ms": 12.5
        })))
        .expect(1)
        .mount(&harness.server)
        .await;

    let health = harness.client.health().check().await.unwrap();

    assert!(!health.is_healthy());
    assert_eq!(health.database.as_deref(), Some("error"));
}
