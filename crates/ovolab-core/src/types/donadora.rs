//! Donor cows (donadoras).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::{RecordId, fold_label};

/// Herd purpose of a donor.
///
/// Decoded leniently; unknown purposes become [`TipoGanado::Otro`], which
/// is never accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum TipoGanado {
    /// Beef cattle.
    Carne,
    /// Dairy cattle.
    Leche,
    /// A purpose this client does not recognise.
    Otro,
}

impl TipoGanado {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Carne => "carne",
            Self::Leche => "leche",
            Self::Otro => "otro",
        }
    }
}

impl fmt::Display for TipoGanado {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TipoGanado {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match fold_label(s).as_str() {
            "carne" => Ok(Self::Carne),
            "leche" => Ok(Self::Leche),
            other => Err(format!("unknown tipo_ganado '{other}' (expected carne or leche)")),
        }
    }
}

impl From<String> for TipoGanado {
    fn from(s: String) -> Self {
        s.parse().unwrap_or(Self::Otro)
    }
}

/// A donor cow as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donadora {
    /// Server id.
    pub id: RecordId,
    /// Animal name.
    pub nombre: String,
    /// Registry number, unique per backend.
    pub numero_registro: String,
    /// Breed.
    pub raza: String,
    /// Herd purpose.
    pub tipo_ganado: TipoGanado,
    /// Birth date, when known.
    #[serde(default)]
    pub fecha_nacimiento: Option<NaiveDate>,
    /// Owner name.
    pub propietario_nombre: String,
    /// Owner contact details.
    #[serde(default)]
    pub propietario_contacto: Option<String>,
    /// Weight in kilograms.
    #[serde(default)]
    pub peso_kg: Option<f64>,
    /// Free-form notes.
    #[serde(default)]
    pub notas: Option<String>,
    /// Full-size photo URL.
    #[serde(default)]
    pub foto_ruta: Option<String>,
    /// Thumbnail URL.
    #[serde(default)]
    pub foto_thumbnail: Option<String>,
    /// Photo storage id.
    #[serde(default)]
    pub foto_public_id: Option<String>,
    /// Soft-delete flag.
    pub activo: bool,
    /// Creation timestamp.
    #[serde(with = "crate::types::timestamp")]
    pub fecha_creacion: DateTime<Utc>,
    /// Last update timestamp.
    #[serde(default, with = "crate::types::timestamp::option")]
    pub fecha_actualizacion: Option<DateTime<Utc>>,
}

impl Donadora {
    /// Display label used in lists and reports: `nombre (registro)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.nombre, self.numero_registro)
    }

    /// Case-insensitive match of `term` against name and registry number.
    ///
    /// An empty term matches every donor.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        format!("{} {}", self.nombre, self.numero_registro)
            .to_lowercase()
            .contains(&term)
    }
}

/// Fields accepted when creating or updating a donor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonadoraInput {
    /// Animal name (1-100 chars).
    pub nombre: String,
    /// Registry number (1-50 chars).
    pub numero_registro: String,
    /// Breed.
    pub raza: String,
    /// Herd purpose.
    pub tipo_ganado: TipoGanado,
    /// Birth date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_nacimiento: Option<NaiveDate>,
    /// Owner name.
    pub propietario_nombre: String,
    /// Owner contact details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub propietario_contacto: Option<String>,
    /// Weight in kilograms; must be positive when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peso_kg: Option<f64>,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notas: Option<String>,
}

impl From<&Donadora> for DonadoraInput {
    fn from(d: &Donadora) -> Self {
        Self {
            nombre: d.nombre.clone(),
            numero_registro: d.numero_registro.clone(),
            raza: d.raza.clone(),
            tipo_ganado: d.tipo_ganado,
            fecha_nacimiento: d.fecha_nacimiento,
            propietario_nombre: d.propietario_nombre.clone(),
            propietario_contacto: d.propietario_contacto.clone(),
            peso_kg: d.peso_kg,
            notas: d.notas.clone(),
        }
    }
}

/// One page of the donor listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonadoraPage {
    /// Donors on this page.
    pub donadoras: Vec<Donadora>,
    /// Total matching donors across all pages.
    pub total: u64,
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
    /// Number of pages.
    pub total_pages: u32,
}

/// Default page size of the donor listing.
pub const DEFAULT_PAGE_LIMIT: u32 = 30;

/// Query parameters of the donor listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonadoraFilter {
    /// Records to skip.
    pub skip: u32,
    /// Page size.
    pub limit: u32,
    /// Restrict to active or inactive donors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activo: Option<bool>,
    /// Breed filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raza: Option<String>,
    /// Herd purpose filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tipo_ganado: Option<TipoGanado>,
    /// Owner filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub propietario_nombre: Option<String>,
    /// Free-text search over name and registry number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
}

impl Default for DonadoraFilter {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_PAGE_LIMIT,
            activo: None,
            raza: None,
            tipo_ganado: None,
            propietario_nombre: None,
            q: None,
        }
    }
}

impl DonadoraFilter {
    /// Positions the filter on a 1-based page, keeping the current limit.
    pub fn page(mut self, page: u32) -> Self {
        self.skip = page.saturating_sub(1).saturating_mul(self.limit);
        self
    }

    /// Sets the free-text search term; blank terms clear it.
    pub fn search(mut self, q: impl Into<String>) -> Self {
        let q = q.into();
        self.q = if q.trim().is_empty() { None } else { Some(q) };
        self
    }
}

/// Owner entry of the donor statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropietarioCount {
    /// Owner name.
    pub nombre: String,
    /// Number of active donors.
    pub count: u64,
}

/// Aggregate counts served by `GET /donadoras/stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonadoraStats {
    /// Active donors.
    pub total_activas: u64,
    /// Inactive donors.
    pub total_inactivas: u64,
    /// Active donors per breed.
    #[serde(default)]
    pub por_raza: BTreeMap<String, u64>,
    /// Active donors per herd purpose.
    #[serde(default)]
    pub por_tipo_ganado: BTreeMap<String, u64>,
    /// Top owners by donor count.
    #[serde(default)]
    pub por_propietario: Vec<PropietarioCount>,
}
