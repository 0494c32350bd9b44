//! Autosaved form drafts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RecordId;

/// A form snapshot: field name to field value.
pub type FormState = serde_json::Map<String, serde_json::Value>;

/// Lifecycle state of a draft.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstadoDraft {
    /// Still being edited.
    Draft,
    /// Superseded by a committed record.
    Completado,
    /// Any state this client does not know about.
    #[serde(other)]
    Otro,
}

/// A draft as stored by the backend, owned by the creating user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    /// Server id.
    pub id: RecordId,
    /// Owner.
    pub usuario_id: RecordId,
    /// Module, e.g. `opu`.
    pub modulo: String,
    /// Record type within the module, e.g. `sesion`.
    pub tipo_registro: String,
    /// Record being edited, when the draft is an edit.
    #[serde(default)]
    pub registro_id: Option<RecordId>,
    /// Saved field values.
    pub datos_json: FormState,
    /// Lifecycle state.
    pub estado: EstadoDraft,
    /// Creation timestamp.
    #[serde(with = "crate::types::timestamp")]
    pub fecha_creacion: DateTime<Utc>,
    /// Last save timestamp.
    #[serde(default, with = "crate::types::timestamp::option")]
    pub fecha_actualizacion: Option<DateTime<Utc>>,
}

/// Draft fields sent on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftInput {
    /// Module (1-50 chars).
    pub modulo: String,
    /// Record type (1-50 chars).
    pub tipo_registro: String,
    /// Record being edited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registro_id: Option<RecordId>,
    /// Field values.
    pub datos_json: FormState,
}

impl DraftInput {
    /// Creates a draft for a new record.
    pub fn new(modulo: impl Into<String>, tipo_registro: impl Into<String>, datos_json: FormState) -> Self {
        Self {
            modulo: modulo.into(),
            tipo_registro: tipo_registro.into(),
            registro_id: None,
            datos_json,
        }
    }
}
