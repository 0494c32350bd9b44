//! Donor listing, multipart writes and photo uploads.

use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use ovolab_client::Photo;
use ovolab_core::RecordId;
use ovolab_core::types::{DonadoraFilter, DonadoraInput, FotoEntidad, TipoGanado};

use crate::common::{TestHarness, donadora_json};

fn input() -> DonadoraInput {
    DonadoraInput {
        nombre: "Luna".to_string(),
        numero_registro: "BR-1".to_string(),
        raza: "Gyr".to_string(),
        tipo_ganado: TipoGanado::Leche,
        fecha_nacimiento: chrono::NaiveDate::from_ymd_opt(2019, 3, 14),
        propietario_nombre: "Pedro".to_string(),
        propietario_contacto: Some(String::new()),
        peso_kg: Some(512.5),
        notas: None,
    }
}

fn foto_json(id: i64, orden: u32) -> serde_json::Value {
    json!({
        "id": id,
        "entidad_tipo": "donadora",
        "entidad_id": 4,
        "orden": orden,
        "url": format!("https://cdn.example/{id}.jpg"),
        "public_id": format!("ovolab/{id}"),
        "fecha_creacion": "2024-06-01T10:00:00Z"
    })
}

#[tokio::test]
async fn test_list_sends_filter_as_query() {
    let harness = TestHarness::logged_in().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/donadoras/"))
        .and(query_param("skip", "30"))
        .and(query_param("limit", "30"))
        .and(query_param("q", "luna"))
        .and(query_param("tipo_ganado", "leche"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "donadoras": [donadora_json(4, "Luna", "BR-1")],
            "total": 31,
            "page": 2,
            "limit": 30,
            "total_pages": 2
        })))
        .expect(1)
        .mount(&harness.server)
        .await;

    let filter = DonadoraFilter {
        tipo_ganado: Some(TipoGanado::Leche),
        ..DonadoraFilter::default().search("luna").page(2)
    };
    let page = harness.client.donadoras().list(&filter).await.unwrap();

    assert_eq!(page.total, 31);
    assert_eq!(page.donadoras[0].nombre, "Luna");
}

#[tokio::test]
async fn test_create_is_multipart_without_blank_fields() {
    let harness = TestHarness::logged_in().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/donadoras/"))
        .and(body_string_contains("name=\"nombre\""))
        .and(body_string_contains("2019-03-14"))
        .and(body_string_contains("512.5"))
        .and(body_string_contains("filename=\"luna.jpg\""))
        .respond_with(ResponseTemplate::new(201).set_body_json(donadora_json(4, "Luna", "BR-1")))
        .expect(1)
        .mount(&harness.server)
        .await;

    let photo = Photo::new("luna.jpg", b"jpeg-bytes".to_vec());
    let created = harness
        .client
        .donadoras()
        .create(&input(), Some(photo))
        .await
        .unwrap();
    assert_eq!(created.id, RecordId::new(4));

    let requests = harness.server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(!body.contains("propietario_contacto"));
    assert!(!body.contains("name=\"notas\""));
    assert!(body.contains("Content-Type: image/jpeg") || body.contains("content-type: image/jpeg"));
}

#[tokio::test]
async fn test_update_and_set_active_use_put() {
    let harness = TestHarness::logged_in().await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/donadoras/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(donadora_json(4, "Luna", "BR-1")))
        .expect(2)
        .mount(&harness.server)
        .await;

    let api = harness.client.donadoras();
    api.update(RecordId::new(4), &input(), None).await.unwrap();
    api.set_active(RecordId::new(4), false).await.unwrap();

    let requests = harness.server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[1].body);
    assert!(body.contains("name=\"activo\""));
    assert!(body.contains("false"));
}

#[tokio::test]
async fn test_stats() {
    let harness = TestHarness::logged_in().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/donadoras/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_activas": 12,
            "total_inactivas": 3,
            "por_raza": {"Gyr": 9, "Brahman": 3},
            "por_tipo_ganado": {"leche": 10, "carne": 2},
            "por_propietario": [{"nombre": "Pedro", "count": 7}]
        })))
        .mount(&harness.server)
        .await;

    let stats = harness.client.donadoras().stats().await.unwrap();

    assert_eq!(stats.total_activas, 12);
    assert_eq!(stats.por_raza["Gyr"], 9);
    assert_eq!(stats.por_propietario[0].nombre, "Pedro");
}

#[tokio::test]
async fn test_upload_many_keeps_successes() {
    let harness = TestHarness::logged_in().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/fotos/"))
        .and(body_string_contains("filename=\"b.png\""))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"detail": "Archivo demasiado grande"})),
        )
        .with_priority(1)
        .mount(&harness.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/fotos/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(foto_json(10, 0)))
        .mount(&harness.server)
        .await;

    let photos = vec![
        Photo::new("a.jpg", b"aaa".to_vec()),
        Photo::new("b.png", b"bbb".to_vec()),
    ];
    let stored = harness
        .client
        .fotos()
        .upload_many(&FotoEntidad::donadora(RecordId::new(4)), photos)
        .await
        .unwrap();

    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, RecordId::new(10));
    assert_eq!(harness.request_count().await, 2);
}

#[tokio::test]
async fn test_fotos_by_entity() {
    let harness = TestHarness::logged_in().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/fotos/donadora/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entidad_tipo": "donadora",
            "entidad_id": 4,
            "fotos": [foto_json(10, 0), foto_json(11, 1)],
            "total": 2
        })))
        .mount(&harness.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/fotos/donadora/4"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&harness.server)
        .await;

    let entidad = FotoEntidad::donadora(RecordId::new(4));
    let page = harness.client.fotos().list_for(&entidad).await.unwrap();
    assert_eq!(page.total, 2);
    harness.client.fotos().delete_all(&entidad).await.unwrap();
}

#[tokio::test]
async fn test_list_tolerates_unknown_tipo_ganado() {
    let harness = TestHarness::logged_in().await;
    let mut odd = donadora_json(5, "Nube", "BR-2");
    odd["tipo_ganado"] = json!("doble propósito");
    Mock::given(method("GET"))
        .and(path("/api/v1/donadoras/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "donadoras": [donadora_json(4, "Luna", "BR-1"), odd],
            "total": 2,
            "page": 1,
            "limit": 30,
            "total_pages": 1
        })))
        .mount(&harness.server)
        .await;

    let page = harness
        .client
        .donadoras()
        .list(&DonadoraFilter::default())
        .await
        .unwrap();

    assert_eq!(page.donadoras.len(), 2);
    assert_eq!(page.donadoras[1].tipo_ganado, TipoGanado::Otro);
}

#[tokio::test]
async fn test_export_csv_passes_activo_filter() {
    let harness = TestHarness::logged_in().await;
    let csv = "ID,Nombre,Número Registro\n4,Luna,BR-1\n";
    Mock::given(method("GET"))
        .and(path("/api/v1/donadoras/export/csv"))
        .and(query_param("activo", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_string(csv))
        .expect(1)
        .mount(&harness.server)
        .await;

    let exported = harness
        .client
        .donadoras()
        .export_csv(Some(false))
        .await
        .unwrap();

    assert_eq!(exported, csv);
}
