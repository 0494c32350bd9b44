//! Autosave against the draft endpoint.

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use ovolab_client::Autosaver;
use ovolab_core::types::FormState;

use crate::common::{TestHarness, draft_json};

const DELAY: Duration = Duration::from_millis(100);

fn form(receptora: &str) -> FormState {
    let mut form = FormState::new();
    form.insert("receptora".to_string(), json!(receptora));
    form
}

#[tokio::test]
async fn test_burst_of_edits_saves_last_state_once() {
    let harness = TestHarness::logged_in().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/drafts/"))
        .and(body_partial_json(json!({
            "modulo": "gfe",
            "tipo_registro": "chequeo",
            "datos_json": {"receptora": "R-103"}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(draft_json(4, "gfe", "chequeo")))
        .expect(1)
        .mount(&harness.server)
        .await;

    let handle = Autosaver::spawn(Arc::new(harness.client.drafts()), "gfe", "chequeo", DELAY);
    for receptora in ["R-1", "R-10", "R-103"] {
        handle.update(form(receptora));
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    tokio::time::sleep(Duration::from_millis(400)).await;

    assert_eq!(harness.request_count().await, 1);
}

#[tokio::test]
async fn test_dropped_form_never_saves() {
    let harness = TestHarness::logged_in().await;
    let handle = Autosaver::spawn(Arc::new(harness.client.drafts()), "gfe", "chequeo", DELAY);
    handle.update(form("R-1"));
    drop(handle);

    tokio::time::sleep(Duration::from_millis(300)).await;

    assert_eq!(harness.request_count().await, 0);
}

#[tokio::test]
async fn test_backend_failure_is_swallowed() {
    let harness = TestHarness::logged_in().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/drafts/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&harness.server)
        .await;

    let handle = Autosaver::spawn(Arc::new(harness.client.drafts()), "gfe", "chequeo", DELAY);
    handle.update(form("R-1"));
    tokio::time::sleep(Duration::from_millis(300)).await;
    handle.update(form("R-2"));
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert!(handle.is_active());
    assert_eq!(harness.request_count().await, 2);
}

#[tokio::test]
async fn test_client_autosave_uses_configured_delay() {
    let harness = TestHarness::logged_in().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/drafts/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(draft_json(5, "opu", "sesion")))
        .mount(&harness.server)
        .await;

    let quick = harness.client_with(|c| c.autosave_delay_ms = 50);
    let fast = quick.autosave("opu", "sesion");
    let slow = harness.client.autosave("opu", "sesion");
    fast.update(form("R-1"));
    slow.update(form("R-2"));
    tokio::time::sleep(Duration::from_millis(400)).await;

    assert_eq!(harness.request_count().await, 1);
}
