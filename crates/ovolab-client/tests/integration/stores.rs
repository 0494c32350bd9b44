//! Store-backed CRUD and transfer numbering.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use ovolab_core::types::{SesionTransferencia, Transferencia, TransferenciaInput};
use ovolab_core::{EntityStore, RecordId};

use crate::common::{TestHarness, sesion_transferencia_json, transferencia_json};

fn transferencia_input() -> TransferenciaInput {
    TransferenciaInput {
        sesion_transferencia_id: None,
        numero_secuencial: 0,
        donadora_id: None,
        toro: Some("Titan".to_string()),
        raza_toro: None,
        estadio: Some("Blastocisto".to_string()),
        receptora: Some("R-40".to_string()),
        ciclado_izquierdo: None,
        ciclado_derecho: None,
        observaciones: None,
    }
}

fn ids(store: &EntityStore<Transferencia>) -> Vec<i64> {
    store.iter().map(|t| t.id.get()).collect()
}

#[tokio::test]
async fn test_store_follows_successful_writes() {
    let harness = TestHarness::logged_in().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/transferencia/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([transferencia_json(1, 1), transferencia_json(2, 2)])),
        )
        .mount(&harness.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/transferencia/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(transferencia_json(3, 3)))
        .mount(&harness.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/transferencia/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(transferencia_json(2, 9)))
        .mount(&harness.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/transferencia/1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&harness.server)
        .await;

    let api = harness.client.transferencias();
    let mut store = EntityStore::default();

    api.refresh(&mut store).await.unwrap();
    assert_eq!(ids(&store), [1, 2]);

    let mut input = transferencia_input();
    input.numero_secuencial = 3;
    api.create_in(&mut store, &input).await.unwrap();
    assert_eq!(ids(&store), [3, 1, 2]);

    api.update_in(&mut store, RecordId::new(2), &input).await.unwrap();
    assert_eq!(store.get(RecordId::new(2)).unwrap().numero_secuencial, 9);

    api.delete_in(&mut store, RecordId::new(1)).await.unwrap();
    assert_eq!(ids(&store), [3, 2]);
}

#[tokio::test]
async fn test_failed_write_leaves_store_alone() {
    let harness = TestHarness::logged_in().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/transferencia/5"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "No encontrada"})))
        .mount(&harness.server)
        .await;

    let record: Transferencia = serde_json::from_value(transferencia_json(5, 1)).unwrap();
    let mut store = EntityStore::new(vec![record]);
    let before = store.clone();

    let err = harness
        .client
        .transferencias()
        .delete_in(&mut store, RecordId::new(5))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(store.same_snapshot(&before));
}

#[tokio::test]
async fn test_append_numbers_after_highest_transfer() {
    let harness = TestHarness::logged_in().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/transferencia/"))
        .and(body_partial_json(json!({
            "sesion_transferencia_id": 7,
            "numero_secuencial": 6,
            "receptora": "R-40"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(transferencia_json(10, 6)))
        .expect(1)
        .mount(&harness.server)
        .await;

    let sesion: SesionTransferencia = serde_json::from_value(sesion_transferencia_json(
        7,
        vec![transferencia_json(1, 2), transferencia_json(2, 5)],
    ))
    .unwrap();

    let created = harness
        .client
        .transferencias()
        .append_to(&sesion, transferencia_input())
        .await
        .unwrap();

    assert_eq!(created.numero_secuencial, 6);
}
