//! Oocyte pick-up (OPU) sessions and their per-donor extractions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{RecordId, fold_label};
use super::donadora::TipoGanado;

/// Destination of the oocytes collected in a session.
///
/// Decoded leniently; unknown destinations become [`Finalidad::Otra`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Finalidad {
    /// Fresh transfer.
    Fresco,
    /// Vitrified for later use.
    Vitrificado,
    /// A destination this client does not recognise.
    Otra,
}

impl From<String> for Finalidad {
    fn from(s: String) -> Self {
        match fold_label(&s).as_str() {
            "fresco" => Self::Fresco,
            "vitrificado" => Self::Vitrificado,
            _ => Self::Otra,
        }
    }
}

impl fmt::Display for Finalidad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fresco => "fresco",
            Self::Vitrificado => "vitrificado",
            Self::Otra => "otra",
        })
    }
}

/// Oocyte counts by quality grade.
///
/// Irregular oocytes are counted but never viable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grados {
    /// Grade I oocytes.
    #[serde(default)]
    pub grado_1: u32,
    /// Grade II oocytes.
    #[serde(default)]
    pub grado_2: u32,
    /// Grade III oocytes.
    #[serde(default)]
    pub grado_3: u32,
    /// Denuded oocytes.
    #[serde(default)]
    pub desnudos: u32,
    /// Irregular oocytes.
    #[serde(default)]
    pub irregular: u32,
}

impl Grados {
    /// Viable oocytes: grades I-III plus denuded.
    pub fn viables(&self) -> u32 {
        self.grado_1 + self.grado_2 + self.grado_3 + self.desnudos
    }

    /// All oocytes, viable and irregular.
    pub fn total(&self) -> u32 {
        self.viables() + self.irregular
    }
}

/// One donor's extraction within an OPU session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraccion {
    /// Server id.
    pub id: RecordId,
    /// Position within the session, starting at 1.
    pub numero_secuencial: i32,
    /// Start time, `HH:MM`.
    #[serde(default)]
    pub hora_inicio: Option<String>,
    /// End time, `HH:MM`.
    #[serde(default)]
    pub hora_fin: Option<String>,
    /// Donor the oocytes came from.
    pub donadora_id: RecordId,
    /// First bull.
    #[serde(default)]
    pub toro_a: Option<String>,
    /// Second bull.
    #[serde(default)]
    pub toro_b: Option<String>,
    /// Bull breed.
    #[serde(default)]
    pub raza_toro: Option<String>,
    /// Corpus luteum notes.
    #[serde(default)]
    pub ct: Option<String>,
    /// Body condition.
    #[serde(default)]
    pub cc: Option<String>,
    /// Ovarian state.
    #[serde(default)]
    pub eo: Option<String>,
    /// Field forecast of oocytes.
    #[serde(default)]
    pub prevision_campo: Option<i32>,
    /// Grade counts.
    #[serde(flatten)]
    pub grados: Grados,
    /// Photo URL.
    #[serde(default)]
    pub foto_ruta: Option<String>,
    /// Photo thumbnail URL.
    #[serde(default)]
    pub foto_thumbnail: Option<String>,
    /// Photo storage id.
    #[serde(default)]
    pub foto_public_id: Option<String>,
}

impl Extraccion {
    /// Viable oocytes of this extraction.
    pub fn viables(&self) -> u32 {
        self.grados.viables()
    }

    /// Total oocytes of this extraction.
    pub fn total_ovocitos(&self) -> u32 {
        self.grados.total()
    }
}

/// A persisted OPU session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SesionOpu {
    /// Server id.
    pub id: RecordId,
    /// Session date.
    pub fecha: NaiveDate,
    /// Aspirating technician.
    pub tecnico_opu: String,
    /// Searching technician.
    pub tecnico_busqueda: String,
    /// Client.
    pub cliente: String,
    /// Collection medium.
    #[serde(default)]
    pub medio: Option<String>,
    /// Recipients note.
    #[serde(default)]
    pub receptoras: Option<String>,
    /// Farm.
    #[serde(default)]
    pub hacienda: Option<String>,
    /// Lot.
    #[serde(default)]
    pub lote: Option<String>,
    /// Start time.
    #[serde(default)]
    pub hora_inicio: Option<String>,
    /// End time.
    #[serde(default)]
    pub hora_final: Option<String>,
    /// Oocyte destination.
    pub finalidad: Finalidad,
    /// Free-form notes.
    #[serde(default)]
    pub observaciones: Option<String>,
    /// Creation timestamp.
    #[serde(default, with = "crate::types::timestamp::option")]
    pub fecha_creacion: Option<DateTime<Utc>>,
    /// Creating user.
    #[serde(default)]
    pub usuario_creacion_id: Option<RecordId>,
    /// Extractions, in sequence order as served.
    #[serde(default)]
    pub extracciones: Vec<Extraccion>,
}

/// Minimal donor created inline with an extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NuevaDonadora {
    /// Animal name.
    pub nombre: String,
    /// Registry number.
    pub numero_registro: String,
    /// Breed.
    pub raza: String,
    /// Herd purpose.
    pub tipo_ganado: TipoGanado,
    /// Owner name.
    pub propietario_nombre: String,
}

/// Extraction fields accepted on create/update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraccionInput {
    /// Position within the session, starting at 1.
    pub numero_secuencial: i32,
    /// Start time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hora_inicio: Option<String>,
    /// End time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hora_fin: Option<String>,
    /// Existing donor; either this or `nueva_donadora` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donadora_id: Option<RecordId>,
    /// First bull.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toro_a: Option<String>,
    /// Second bull.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toro_b: Option<String>,
    /// Bull breed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raza_toro: Option<String>,
    /// Corpus luteum notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ct: Option<String>,
    /// Body condition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc: Option<String>,
    /// Ovarian state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eo: Option<String>,
    /// Field forecast.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prevision_campo: Option<i32>,
    /// Grade counts.
    #[serde(flatten)]
    pub grados: Grados,
    /// Donor to create alongside the extraction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nueva_donadora: Option<NuevaDonadora>,
}

/// OPU session fields accepted on create/update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SesionOpuInput {
    /// Session date.
    pub fecha: NaiveDate,
    /// Aspirating technician.
    pub tecnico_opu: String,
    /// Searching technician.
    pub tecnico_busqueda: String,
    /// Client.
    pub cliente: String,
    /// Collection medium.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medio: Option<String>,
    /// Recipients note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receptoras: Option<String>,
    /// Farm.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hacienda: Option<String>,
    /// Lot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lote: Option<String>,
    /// Start time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hora_inicio: Option<String>,
    /// End time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hora_final: Option<String>,
    /// Oocyte destination.
    pub finalidad: Finalidad,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observaciones: Option<String>,
    /// Extractions to create with the session.
    #[serde(default)]
    pub extracciones: Vec<ExtraccionInput>,
}
