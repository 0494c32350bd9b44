//! Draft endpoints.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use ovolab_core::types::{DraftInput, EstadoDraft, FormState};

use crate::common::{TestHarness, draft_json};

fn form() -> FormState {
    let mut form = FormState::new();
    form.insert("cliente".to_string(), json!("Hacienda Sur"));
    form
}

#[tokio::test]
async fn test_save_posts_json() {
    let harness = TestHarness::logged_in().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/drafts/"))
        .and(body_partial_json(json!({
            "modulo": "opu",
            "tipo_registro": "sesion",
            "datos_json": {"cliente": "Hacienda Sur"}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(draft_json(5, "opu", "sesion")))
        .expect(1)
        .mount(&harness.server)
        .await;

    let draft = harness
        .client
        .drafts()
        .save(&DraftInput::new("opu", "sesion", form()))
        .await
        .unwrap();

    assert_eq!(draft.estado, EstadoDraft::Draft);
    assert_eq!(draft.datos_json, form());
}

#[tokio::test]
async fn test_list_filters_by_form() {
    let harness = TestHarness::logged_in().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/drafts/"))
        .and(query_param("modulo", "gfe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([draft_json(8, "gfe", "chequeo")])))
        .expect(1)
        .mount(&harness.server)
        .await;

    let drafts = harness.client.drafts().list(Some("gfe"), None).await.unwrap();

    assert_eq!(drafts.len(), 1);
    let requests = harness.server.received_requests().await.unwrap();
    assert!(!requests[0].url.as_str().contains("tipo_registro"));
}

#[tokio::test]
async fn test_discard_matching_completes_each_draft() {
    let harness = TestHarness::logged_in().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/drafts/"))
        .and(query_param("modulo", "opu"))
        .and(query_param("tipo_registro", "sesion"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            draft_json(1, "opu", "sesion"),
            draft_json(2, "opu", "sesion")
        ])))
        .mount(&harness.server)
        .await;
    for id in [1, 2] {
        Mock::given(method("POST"))
            .and(path(format!("/api/v1/drafts/{id}/complete")))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&harness.server)
            .await;
    }

    let closed = harness
        .client
        .drafts()
        .discard_matching("opu", "sesion")
        .await
        .unwrap();

    assert_eq!(closed, 2);
}

#[tokio::test]
async fn test_invalid_draft_is_rejected_locally() {
    let harness = TestHarness::logged_in().await;
    let err = harness
        .client
        .drafts()
        .save(&DraftInput::new("", "sesion", form()))
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "modulo: is required");
    assert_eq!(harness.request_count().await, 0);
}
