//! Transfer session deletion.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use ovolab_client::delete_transferencia_session;
use ovolab_core::RecordId;
use ovolab_core::types::SesionTransferencia;

use crate::common::{TestHarness, sesion_transferencia_json, transferencia_json};

fn sesion() -> SesionTransferencia {
    serde_json::from_value(sesion_transferencia_json(
        7,
        vec![
            transferencia_json(1, 1),
            transferencia_json(2, 2),
            transferencia_json(3, 3),
        ],
    ))
    .unwrap()
}

async fn mount_delete(harness: &TestHarness, url: &str, status: u16, expected: u64) {
    let template = if status == 204 {
        ResponseTemplate::new(204)
    } else {
        ResponseTemplate::new(status).set_body_json(json!({"detail": "Transferencia no encontrada"}))
    };
    Mock::given(method("DELETE"))
        .and(path(url))
        .respond_with(template)
        .expect(expected)
        .mount(&harness.server)
        .await;
}

#[tokio::test]
async fn test_all_deleted_then_session() {
    let harness = TestHarness::logged_in().await;
    for id in 1..=3 {
        mount_delete(&harness, &format!("/api/v1/transferencia/{id}"), 204, 1).await;
    }
    mount_delete(&harness, "/api/v1/sesion-transferencia/7", 204, 1).await;

    let report = delete_transferencia_session(&harness.client, &sesion())
        .await
        .unwrap();

    assert!(report.is_complete());
    assert!(report.session_deleted);
    assert_eq!(
        report.deleted,
        [RecordId::new(1), RecordId::new(2), RecordId::new(3)]
    );
}

#[tokio::test]
async fn test_partial_failure_keeps_session_and_continues() {
    let harness = TestHarness::logged_in().await;
    mount_delete(&harness, "/api/v1/transferencia/1", 204, 1).await;
    mount_delete(&harness, "/api/v1/transferencia/2", 404, 1).await;
    mount_delete(&harness, "/api/v1/transferencia/3", 204, 1).await;
    mount_delete(&harness, "/api/v1/sesion-transferencia/7", 204, 0).await;

    let report = delete_transferencia_session(&harness.client, &sesion())
        .await
        .unwrap();

    assert!(!report.is_complete());
    assert!(!report.session_deleted);
    assert_eq!(report.deleted, [RecordId::new(1), RecordId::new(3)]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].id, RecordId::new(2));
    assert!(report.failed[0].error.is_not_found());
}

#[tokio::test]
async fn test_session_delete_failure_is_reported() {
    let harness = TestHarness::logged_in().await;
    for id in 1..=3 {
        mount_delete(&harness, &format!("/api/v1/transferencia/{id}"), 204, 1).await;
    }
    mount_delete(&harness, "/api/v1/sesion-transferencia/7", 500, 1).await;

    let report = delete_transferencia_session(&harness.client, &sesion())
        .await
        .unwrap();

    assert_eq!(report.deleted.len(), 3);
    assert!(!report.session_deleted);
    assert!(report.session_error.is_some());
    assert!(!report.is_complete());
}

#[tokio::test]
async fn test_unauthorized_aborts_batch() {
    let harness = TestHarness::logged_in().await;
    mount_delete(&harness, "/api/v1/transferencia/1", 204, 1).await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/transferencia/2"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Token expirado"})))
        .expect(1)
        .mount(&harness.server)
        .await;
    mount_delete(&harness, "/api/v1/transferencia/3", 204, 0).await;

    let err = delete_transferencia_session(&harness.client, &sesion())
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
    assert!(!harness.client.session().is_authenticated());
}

#[tokio::test]
async fn test_empty_session_deletes_only_parent() {
    let harness = TestHarness::logged_in().await;
    mount_delete(&harness, "/api/v1/sesion-transferencia/7", 204, 1).await;
    let empty: SesionTransferencia =
        serde_json::from_value(sesion_transferencia_json(7, vec![])).unwrap();

    let report = delete_transferencia_session(&harness.client, &empty)
        .await
        .unwrap();

    assert!(report.session_deleted);
    assert!(report.deleted.is_empty());
}
