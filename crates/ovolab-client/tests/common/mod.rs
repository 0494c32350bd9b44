//! Common test utilities: a mock backend and JSON fixtures.

#![allow(dead_code)]

use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::MockServer;

use ovolab_client::{ApiClient, AuthSession, ClientConfig, CredentialStore, StoredSession};

/// Token used by [`TestHarness::logged_in`].
pub const TOKEN: &str = "test-token";

/// A client wired to a fresh mock backend.
pub struct TestHarness {
    /// The mock backend.
    pub server: MockServer,
    /// Client pointed at `<server>/api/v1`.
    pub client: ApiClient,
    /// Credentials file used by the client.
    pub credentials: PathBuf,
    _dir: TempDir,
}

impl TestHarness {
    /// A logged-out client.
    pub async fn new() -> Self {
        Self::start(None).await
    }

    /// A client holding [`TOKEN`], as if restored from a previous run.
    pub async fn logged_in() -> Self {
        Self::start(Some(TOKEN)).await
    }

    async fn start(token: Option<&str>) -> Self {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let credentials = dir.path().join("session.json");
        let store = CredentialStore::new(&credentials);
        if let Some(token) = token {
            store
                .save(&StoredSession {
                    token: token.to_string(),
                    user: None,
                })
                .unwrap();
        }
        let config = test_config(&server, &credentials);
        let session = AuthSession::open(store).unwrap();
        let client = ApiClient::with_session(&config, session).unwrap();
        Self {
            server,
            client,
            credentials,
            _dir: dir,
        }
    }

    /// Another client on the same backend and credentials, with `edit`
    /// applied to its configuration.
    pub fn client_with(&self, edit: impl FnOnce(&mut ClientConfig)) -> ApiClient {
        let mut config = test_config(&self.server, &self.credentials);
        edit(&mut config);
        let session = AuthSession::open(CredentialStore::new(&self.credentials)).unwrap();
        ApiClient::with_session(&config, session).unwrap()
    }

    /// Number of requests the backend has seen.
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|r| r.len())
            .unwrap_or_default()
    }
}

fn test_config(server: &MockServer, credentials: &Path) -> ClientConfig {
    ClientConfig {
        api_url: format!("{}/api/v1", server.uri()),
        timeout_secs: 5,
        credentials_path: Some(credentials.to_path_buf()),
        ..Default::default()
    }
}

pub fn usuario_json() -> Value {
    json!({
        "id": 1,
        "usuario": "ana",
        "email": "ana@lab.example",
        "nombre_completo": "Ana Pérez",
        "rol": "tecnico",
        "activo": true,
        "fecha_creacion": "2024-01-01T08:00:00"
    })
}

pub fn donadora_json(id: i64, nombre: &str, registro: &str) -> Value {
    json!({
        "id": id,
        "nombre": nombre,
        "numero_registro": registro,
        "raza": "Gyr",
        "tipo_ganado": "leche",
        "propietario_nombre": "Pedro",
        "activo": true,
        "fecha_creacion": "2024-01-01T08:00:00"
    })
}

pub fn transferencia_json(id: i64, numero: i32) -> Value {
    json!({
        "id": id,
        "sesion_transferencia_id": 7,
        "numero_secuencial": numero,
        "estadio": "Blastocisto"
    })
}

pub fn sesion_transferencia_json(id: i64, transferencias: Vec<Value>) -> Value {
    json!({
        "id": id,
        "fecha": "2024-06-01",
        "tecnico_transferencia": "Ana",
        "cliente": "Hacienda Sur",
        "transferencias_realizadas": transferencias
    })
}

pub fn draft_json(id: i64, modulo: &str, tipo_registro: &str) -> Value {
    json!({
        "id": id,
        "usuario_id": 1,
        "modulo": modulo,
        "tipo_registro": tipo_registro,
        "datos_json": {"cliente": "Hacienda Sur"},
        "estado": "draft",
        "fecha_creacion": "2024-06-01T10:00:00"
    })
}
