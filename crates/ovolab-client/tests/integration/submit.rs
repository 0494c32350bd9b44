//! Double-submission guard on record creation.

use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use ovolab_client::GuardedForm;
use ovolab_client::resources::ChequeosGfe;
use ovolab_core::SubmissionGuard;
use ovolab_core::types::{ChequeoGfeInput, EstadoGestacion};

use crate::common::{TestHarness, draft_json};

fn chequeo_input() -> ChequeoGfeInput {
    ChequeoGfeInput {
        transferencia_id: None,
        receptora: "R-10".to_string(),
        tecnico_chequeo: "Ana".to_string(),
        hacienda: None,
        fecha: chrono::NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
        hora_inicio: None,
        hora_final: None,
        cliente: "Hacienda Sur".to_string(),
        estado: EstadoGestacion::Prenada,
        nota: None,
    }
}

fn chequeo_json() -> serde_json::Value {
    json!({
        "id": 21,
        "receptora": "R-10",
        "tecnico_chequeo": "Ana",
        "fecha": "2024-07-01",
        "cliente": "Hacienda Sur",
        "estado": "preñada"
    })
}

#[tokio::test]
async fn test_double_submit_creates_once() {
    let harness = TestHarness::logged_in().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/gfe/"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(chequeo_json())
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&harness.server)
        .await;

    let form = GuardedForm::new(harness.client.gfe(), SubmissionGuard::new("gfe/nuevo"));
    let input = chequeo_input();

    let (first, second) = tokio::join!(form.submit(&input), form.submit(&input));

    let created = first.unwrap().unwrap();
    assert_eq!(created.estado, EstadoGestacion::Prenada);
    assert!(second.unwrap().is_none());
    assert!(!form.guard().is_in_flight());
}

#[tokio::test]
async fn test_guard_resets_after_failure() {
    let harness = TestHarness::logged_in().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/gfe/"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "Error interno"})))
        .up_to_n_times(1)
        .mount(&harness.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/gfe/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(chequeo_json()))
        .mount(&harness.server)
        .await;

    let form = GuardedForm::new(harness.client.gfe(), SubmissionGuard::new("gfe/nuevo"));

    let err = form.submit(&chequeo_input()).await.unwrap_err();
    assert_eq!(err.user_message(), "Error interno");
    assert!(!form.guard().is_in_flight());

    let retried = form.submit(&chequeo_input()).await.unwrap();
    assert!(retried.is_some());
}

#[tokio::test]
async fn test_successful_submit_closes_drafts() {
    let harness = TestHarness::logged_in().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/gfe/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(chequeo_json()))
        .mount(&harness.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/drafts/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([draft_json(3, "gfe", "chequeo")])))
        .mount(&harness.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/drafts/3/complete"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&harness.server)
        .await;

    let form = GuardedForm::new(harness.client.gfe(), SubmissionGuard::new("gfe/nuevo"))
        .with_drafts(harness.client.drafts(), "gfe", "chequeo");

    assert!(form.submit(&chequeo_input()).await.unwrap().is_some());
}

#[tokio::test]
async fn test_draft_cleanup_failure_does_not_fail_submit() {
    let harness = TestHarness::logged_in().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/gfe/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(chequeo_json()))
        .mount(&harness.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/drafts/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&harness.server)
        .await;

    let form = GuardedForm::new(harness.client.gfe(), SubmissionGuard::new("gfe/nuevo"))
        .with_drafts(harness.client.drafts(), "gfe", "chequeo");

    assert!(form.submit(&chequeo_input()).await.unwrap().is_some());
}

#[tokio::test]
async fn test_client_forms_share_guard_by_id() {
    let harness = TestHarness::logged_in().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/gfe/"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(chequeo_json())
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&harness.server)
        .await;

    let clone = harness.client.clone();
    let first = harness.client.form::<ChequeosGfe>("gfe/nuevo");
    let second = clone.form::<ChequeosGfe>("gfe/nuevo");
    let other = harness.client.form::<ChequeosGfe>("gfe/editar");
    let input = chequeo_input();

    let (a, b) = tokio::join!(first.submit(&input), second.submit(&input));

    assert!(a.unwrap().is_some());
    assert!(b.unwrap().is_none());
    assert!(!other.guard().is_in_flight());
}
