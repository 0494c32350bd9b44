//! Login, bearer attachment and logout on 401.

use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{TOKEN, TestHarness, donadora_json, usuario_json};

#[tokio::test]
async fn test_login_stores_token_and_profile() {
    let harness = TestHarness::new().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("username=ana"))
        .and(body_string_contains("password=secreto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh-token",
            "token_type": "bearer",
            "user": usuario_json()
        })))
        .expect(1)
        .mount(&harness.server)
        .await;

    let user = harness.client.login("ana", "secreto").await.unwrap();

    assert_eq!(user.usuario, "ana");
    assert_eq!(harness.client.session().token().as_deref(), Some("fresh-token"));
    let stored = std::fs::read_to_string(&harness.credentials).unwrap();
    assert!(stored.contains("fresh-token"));
    assert!(stored.contains("Ana Pérez"));
}

#[tokio::test]
async fn test_bad_credentials_report_backend_detail() {
    let harness = TestHarness::new().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"detail": "Usuario o contraseña incorrectos"})),
        )
        .mount(&harness.server)
        .await;

    let err = harness.client.login("ana", "mal").await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.user_message(), "Usuario o contraseña incorrectos");
    assert!(!harness.client.session().is_authenticated());
}

#[tokio::test]
async fn test_requests_carry_bearer_token() {
    let harness = TestHarness::logged_in().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/donadoras/4"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(donadora_json(4, "Luna", "BR-1")))
        .expect(1)
        .mount(&harness.server)
        .await;

    let donadora = harness
        .client
        .donadoras()
        .get(ovolab_core::RecordId::new(4))
        .await
        .unwrap();
    assert_eq!(donadora.label(), "Luna (BR-1)");
}

#[tokio::test]
async fn test_any_401_logs_out() {
    let harness = TestHarness::logged_in().await;
    assert!(harness.credentials.exists());
    Mock::given(method("GET"))
        .and(path("/api/v1/opu/"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Could not validate credentials"})),
        )
        .mount(&harness.server)
        .await;

    let err = harness.client.opu().list().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(harness.client.session().token(), None);
    assert!(!harness.credentials.exists());
}

#[tokio::test]
async fn test_forbidden_keeps_session() {
    let harness = TestHarness::logged_in().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"detail": "Usuario inactivo"})))
        .mount(&harness.server)
        .await;

    let err = harness.client.me().await.unwrap_err();

    assert_eq!(err.status(), Some(403));
    assert!(harness.client.session().is_authenticated());
}

#[tokio::test]
async fn test_me_refreshes_cached_profile() {
    let harness = TestHarness::logged_in().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(usuario_json()))
        .mount(&harness.server)
        .await;

    harness.client.me().await.unwrap();

    let user = harness.client.session().user().unwrap();
    assert_eq!(user.nombre_completo, "Ana Pérez");
}

#[tokio::test]
async fn test_logout_removes_credentials() {
    let harness = TestHarness::logged_in().await;
    harness.client.logout();
    assert!(!harness.client.session().is_authenticated());
    assert!(!harness.credentials.exists());
}
