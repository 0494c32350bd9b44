//! GFE pregnancy checks.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{RecordId, fold_label};

/// Outcome of a pregnancy check.
///
/// The backend stores the outcome as free text. Decoding ignores case and
/// accents, and any other value becomes [`EstadoGestacion::Otro`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum EstadoGestacion {
    /// Pregnant.
    Prenada,
    /// Not pregnant.
    Vacia,
    /// An outcome this client does not recognise; never counted as pregnant.
    Otro,
}

impl EstadoGestacion {
    /// Whether the recipient is pregnant.
    pub fn is_prenada(self) -> bool {
        matches!(self, Self::Prenada)
    }
}

impl From<String> for EstadoGestacion {
    fn from(s: String) -> Self {
        match fold_label(&s).as_str() {
            "prenada" => Self::Prenada,
            "vacia" => Self::Vacia,
            other => {
                tracing::debug!(estado = other, "unrecognised pregnancy outcome");
                Self::Otro
            }
        }
    }
}

impl fmt::Display for EstadoGestacion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Prenada => "prenada",
            Self::Vacia => "vacia",
            Self::Otro => "otro",
        })
    }
}

/// A pregnancy check on one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChequeoGfe {
    /// Server id.
    pub id: RecordId,
    /// Transfer being checked.
    #[serde(default)]
    pub transferencia_id: Option<RecordId>,
    /// Recipient cow.
    pub receptora: String,
    /// Checking technician.
    pub tecnico_chequeo: String,
    /// Farm.
    #[serde(default)]
    pub hacienda: Option<String>,
    /// Check date.
    pub fecha: NaiveDate,
    /// Start time.
    #[serde(default)]
    pub hora_inicio: Option<String>,
    /// End time.
    #[serde(default)]
    pub hora_final: Option<String>,
    /// Client.
    pub cliente: String,
    /// Outcome.
    pub estado: EstadoGestacion,
    /// Free-form note.
    #[serde(default)]
    pub nota: Option<String>,
    /// Creation timestamp.
    #[serde(default, with = "crate::types::timestamp::option")]
    pub fecha_creacion: Option<DateTime<Utc>>,
}

/// Check fields accepted on create/update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChequeoGfeInput {
    /// Transfer being checked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transferencia_id: Option<RecordId>,
    /// Recipient cow.
    pub receptora: String,
    /// Checking technician.
    pub tecnico_chequeo: String,
    /// Farm.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hacienda: Option<String>,
    /// Check date.
    pub fecha: NaiveDate,
    /// Start time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hora_inicio: Option<String>,
    /// End time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hora_final: Option<String>,
    /// Client.
    pub cliente: String,
    /// Outcome.
    pub estado: EstadoGestacion,
    /// Free-form note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nota: Option<String>,
}
