//! In-vitro fertilization (fecundación) entries.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::RecordId;

/// One maturation/fertilization entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fecundacion {
    /// Server id.
    pub id: RecordId,
    /// Donor.
    #[serde(default)]
    pub donadora_id: Option<RecordId>,
    /// Source OPU extraction.
    #[serde(default)]
    pub extraccion_donadora_id: Option<RecordId>,
    /// Lab technician.
    pub laboratorista: String,
    /// Maturation start date.
    pub fecha_inicio_maduracion: NaiveDate,
    /// Maturation start time.
    #[serde(default)]
    pub hora_inicio_maduracion: Option<String>,
    /// Maturation medium.
    #[serde(default)]
    pub medio_maduracion: Option<String>,
    /// Incubation temperature in °C.
    #[serde(default)]
    pub temperatura: Option<f64>,
    /// Maturation time.
    #[serde(default)]
    pub tiempo_maduracion: Option<String>,
    /// Fertilization date; absent until fertilized.
    #[serde(default)]
    pub fecha_fertilizacion: Option<NaiveDate>,
    /// Fertilization time.
    #[serde(default)]
    pub hora_fertilizacion: Option<String>,
    /// Semen used.
    #[serde(default)]
    pub semen_utilizado: Option<String>,
    /// Fertilization medium.
    #[serde(default)]
    pub medio_fertilizacion: Option<String>,
    /// Sperm concentration.
    #[serde(default)]
    pub concentracion_espermatica: Option<String>,
    /// Co-incubation time.
    #[serde(default)]
    pub tiempo_coincubacion: Option<String>,
    /// Microscope photo path.
    #[serde(default)]
    pub foto_microscopica_ruta: Option<String>,
    /// Creation timestamp.
    #[serde(default, with = "crate::types::timestamp::option")]
    pub fecha_creacion: Option<DateTime<Utc>>,
    /// Creating user.
    #[serde(default)]
    pub usuario_creacion_id: Option<RecordId>,
}

impl Fecundacion {
    /// Whether fertilization has been recorded.
    pub fn fertilizada(&self) -> bool {
        self.fecha_fertilizacion.is_some()
    }
}

/// Fields accepted on create/update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FecundacionInput {
    /// Donor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donadora_id: Option<RecordId>,
    /// Source OPU extraction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraccion_donadora_id: Option<RecordId>,
    /// Lab technician.
    pub laboratorista: String,
    /// Maturation start date.
    pub fecha_inicio_maduracion: NaiveDate,
    /// Maturation start time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hora_inicio_maduracion: Option<String>,
    /// Maturation medium.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medio_maduracion: Option<String>,
    /// Incubation temperature in °C.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperatura: Option<f64>,
    /// Maturation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiempo_maduracion: Option<String>,
    /// Fertilization date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_fertilizacion: Option<NaiveDate>,
    /// Fertilization time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hora_fertilizacion: Option<String>,
    /// Semen used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semen_utilizado: Option<String>,
    /// Fertilization medium.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medio_fertilizacion: Option<String>,
    /// Sperm concentration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concentracion_espermatica: Option<String>,
    /// Co-incubation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiempo_coincubacion: Option<String>,
    /// Microscope photo path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foto_microscopica_ruta: Option<String>,
}

impl FecundacionInput {
    /// Creates an input with the required fields only.
    pub fn new(laboratorista: impl Into<String>, fecha_inicio_maduracion: NaiveDate) -> Self {
        Self {
            donadora_id: None,
            extraccion_donadora_id: None,
            laboratorista: laboratorista.into(),
            fecha_inicio_maduracion,
            hora_inicio_maduracion: None,
            medio_maduracion: None,
            temperatura: None,
            tiempo_maduracion: None,
            fecha_fertilizacion: None,
            hora_fertilizacion: None,
            semen_utilizado: None,
            medio_fertilizacion: None,
            concentracion_espermatica: None,
            tiempo_coincubacion: None,
            foto_microscopica_ruta: None,
        }
    }
}
