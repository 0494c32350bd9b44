//! Embryo transfer sessions and the transfers performed in them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::RecordId;

/// One embryo transferred into a recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transferencia {
    /// Server id.
    pub id: RecordId,
    /// Owning session, if any.
    #[serde(default)]
    pub sesion_transferencia_id: Option<RecordId>,
    /// Position within the session, starting at 1.
    pub numero_secuencial: i32,
    /// Embryo donor.
    #[serde(default)]
    pub donadora_id: Option<RecordId>,
    /// Sire.
    #[serde(default)]
    pub toro: Option<String>,
    /// Sire breed.
    #[serde(default)]
    pub raza_toro: Option<String>,
    /// Embryo development stage.
    #[serde(default)]
    pub estadio: Option<String>,
    /// Legacy stage column, still present on older rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estado: Option<String>,
    /// Recipient cow.
    #[serde(default)]
    pub receptora: Option<String>,
    /// Left ovary cycling.
    #[serde(default)]
    pub ciclado_izquierdo: Option<String>,
    /// Right ovary cycling.
    #[serde(default)]
    pub ciclado_derecho: Option<String>,
    /// Free-form notes.
    #[serde(default)]
    pub observaciones: Option<String>,
    /// Transfer date on rows recorded outside a session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha: Option<NaiveDate>,
    /// Technician on rows recorded outside a session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tecnico_transferencia: Option<String>,
    /// Client on rows recorded outside a session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cliente: Option<String>,
    /// Embryo kind (`Fresh` / `VIT`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finalidad: Option<String>,
    /// Creation timestamp.
    #[serde(default, with = "crate::types::timestamp::option")]
    pub fecha_creacion: Option<DateTime<Utc>>,
}

impl Transferencia {
    /// Development stage, falling back to the legacy column.
    pub fn etapa(&self) -> Option<&str> {
        self.estadio
            .as_deref()
            .or(self.estado.as_deref())
            .filter(|s| !s.trim().is_empty())
    }
}

/// A persisted transfer session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SesionTransferencia {
    /// Server id.
    pub id: RecordId,
    /// Session date.
    pub fecha: NaiveDate,
    /// Transferring technician.
    pub tecnico_transferencia: String,
    /// Start time.
    #[serde(default)]
    pub hora_inicio: Option<String>,
    /// End time.
    #[serde(default)]
    pub hora_final: Option<String>,
    /// Farm.
    #[serde(default)]
    pub hacienda: Option<String>,
    /// Recipients note.
    #[serde(default)]
    pub receptoras: Option<String>,
    /// Client.
    pub cliente: String,
    /// Creation timestamp.
    #[serde(default, with = "crate::types::timestamp::option")]
    pub fecha_creacion: Option<DateTime<Utc>>,
    /// Transfers owned by this session.
    #[serde(default)]
    pub transferencias_realizadas: Vec<Transferencia>,
}

impl SesionTransferencia {
    /// Flattens the owned transfers into rows tagged with session fields.
    pub fn filas(&self) -> impl Iterator<Item = TransferenciaFila<'_>> {
        self.transferencias_realizadas
            .iter()
            .map(move |transferencia| TransferenciaFila {
                sesion_id: self.id,
                sesion_fecha: self.fecha,
                sesion_tecnico: &self.tecnico_transferencia,
                transferencia,
            })
    }
}

/// A transfer seen through its owning session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferenciaFila<'a> {
    /// Owning session id.
    pub sesion_id: RecordId,
    /// Owning session date.
    pub sesion_fecha: NaiveDate,
    /// Owning session technician.
    pub sesion_tecnico: &'a str,
    /// The transfer.
    pub transferencia: &'a Transferencia,
}

/// Transfer session fields accepted on create/update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SesionTransferenciaInput {
    /// Session date.
    pub fecha: NaiveDate,
    /// Transferring technician (max 100 chars).
    pub tecnico_transferencia: String,
    /// Start time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hora_inicio: Option<String>,
    /// End time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hora_final: Option<String>,
    /// Farm.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hacienda: Option<String>,
    /// Recipients note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receptoras: Option<String>,
    /// Client (max 100 chars).
    pub cliente: String,
}

/// Transfer fields accepted on create/update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferenciaInput {
    /// Owning session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sesion_transferencia_id: Option<RecordId>,
    /// Position within the session, starting at 1.
    pub numero_secuencial: i32,
    /// Embryo donor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donadora_id: Option<RecordId>,
    /// Sire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toro: Option<String>,
    /// Sire breed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raza_toro: Option<String>,
    /// Development stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estadio: Option<String>,
    /// Recipient cow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receptora: Option<String>,
    /// Left ovary cycling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ciclado_izquierdo: Option<String>,
    /// Right ovary cycling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ciclado_derecho: Option<String>,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observaciones: Option<String>,
}
