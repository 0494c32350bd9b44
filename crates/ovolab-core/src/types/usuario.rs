//! Users, login responses and backend health.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::RecordId;

/// Role of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rol {
    /// Full access.
    Admin,
    /// Field technician.
    Tecnico,
    /// Lab technician.
    Laboratorista,
    /// Read-only.
    Visualizador,
}

impl fmt::Display for Rol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Admin => "admin",
            Self::Tecnico => "tecnico",
            Self::Laboratorista => "laboratorista",
            Self::Visualizador => "visualizador",
        })
    }
}

/// The profile of a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usuario {
    /// Server id.
    pub id: RecordId,
    /// Login name.
    pub usuario: String,
    /// Email address.
    pub email: String,
    /// Display name.
    pub nombre_completo: String,
    /// Role.
    pub rol: Rol,
    /// Whether the account may log in.
    pub activo: bool,
    /// Account creation timestamp.
    #[serde(with = "crate::types::timestamp")]
    pub fecha_creacion: DateTime<Utc>,
    /// Last login timestamp.
    #[serde(default, with = "crate::types::timestamp::option")]
    pub ultima_conexion: Option<DateTime<Utc>>,
}

/// Response of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token.
    pub access_token: String,
    /// Always `bearer`.
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Profile of the signed-in user.
    pub user: Usuario,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Response of the backend health probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// `healthy` or `degraded`.
    pub status: String,
    /// Database probe result, `ok` or `error`.
    #[serde(default)]
    pub database: Option<String>,
    /// Database round trip in milliseconds.
    #[serde(default)]
    pub latency_ms: Option<f64>,
}

impl HealthStatus {
    /// Whether the backend reports itself fully healthy.
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
