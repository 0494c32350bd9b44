//! Session grouping.
//!
//! Flat record lists are collapsed into logical sessions keyed by a date and
//! one secondary field (technician, lab technician or client). Groups are
//! recomputed from the current list every time; nothing here mutates input.
//!
//! # Ordering
//!
//! Groups come out newest date first. Two groups on the same date keep the
//! order in which their first member was encountered, and members keep their
//! encounter order inside a group.
//!
//! # Missing keys
//!
//! A record whose key function returns `None` (missing date, missing or
//! blank secondary field) is left out of every group.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt;

use crate::types::{
    ChequeoGfe, Fecundacion, SesionOpu, SesionTransferencia, Transferencia, TransferenciaFila,
};

// ============================================================================
// Keys and groups
// ============================================================================

/// Grouping key: a date plus one secondary field.
///
/// Keys compare field by field; the `fecha|secondary` rendering of
/// `Display` is for presentation only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionKey {
    /// Session date.
    pub fecha: NaiveDate,
    /// Technician, lab technician or client.
    pub secondary: String,
}

impl SessionKey {
    /// Creates a key.
    pub fn new(fecha: NaiveDate, secondary: impl Into<String>) -> Self {
        Self {
            fecha,
            secondary: secondary.into(),
        }
    }

    /// Builds a key from optional fields; missing or blank fields yield `None`.
    pub fn from_parts(fecha: Option<NaiveDate>, secondary: Option<&str>) -> Option<Self> {
        let fecha = fecha?;
        let secondary = secondary.filter(|s| !s.trim().is_empty())?;
        Some(Self::new(fecha, secondary))
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.fecha.format("%Y-%m-%d"), self.secondary)
    }
}

/// A derived session: its key and the records sharing it.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionGroup<R> {
    /// Shared key.
    pub key: SessionKey,
    /// Members in encounter order.
    pub members: Vec<R>,
}

impl<R> SessionGroup<R> {
    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the group has no members. Never true for grouper output.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Number of members matching `pred`.
    pub fn count<P>(&self, pred: P) -> usize
    where
        P: Fn(&R) -> bool,
    {
        self.members.iter().filter(|&m| pred(m)).count()
    }

    /// Percentage of members matching `pred`, rounded to `decimals`.
    pub fn rate<P>(&self, pred: P, decimals: u32) -> f64
    where
        P: Fn(&R) -> bool,
    {
        rate(self.count(pred), self.len(), decimals)
    }
}

/// Groups `records` by `key_fn`, newest date first.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use ovolab_core::grouping::{SessionKey, group_sessions};
///
/// let d1 = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
/// let d2 = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
/// let rows = [(d1, "Ana"), (d2, "Ana"), (d1, "Ana"), (d1, "")];
///
/// let groups = group_sessions(&rows, |(f, t)| SessionKey::from_parts(Some(*f), Some(*t)));
/// assert_eq!(groups[0].key.to_string(), "2024-01-06|Ana");
/// assert_eq!(groups[1].len(), 2);
/// assert_eq!(groups.len(), 2);
/// ```
pub fn group_sessions<I, R, F>(records: I, key_fn: F) -> Vec<SessionGroup<R>>
where
    I: IntoIterator<Item = R>,
    F: Fn(&R) -> Option<SessionKey>,
{
    let mut index: HashMap<SessionKey, usize> = HashMap::new();
    let mut groups: Vec<SessionGroup<R>> = Vec::new();

    for record in records {
        let Some(key) = key_fn(&record) else {
            continue;
        };
        match index.get(&key) {
            Some(&slot) => groups[slot].members.push(record),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(SessionGroup {
                    key,
                    members: vec![record],
                });
            }
        }
    }

    // sort_by is stable: same-date groups stay in first-seen order
    groups.sort_by(|a, b| b.key.fecha.cmp(&a.key.fecha));
    groups
}

/// `matching / total * 100`, rounded half away from zero to `decimals`.
///
/// Defined as `0` when `total` is `0`.
///
/// ```
/// use ovolab_core::grouping::rate;
///
/// assert_eq!(rate(1, 4, 0), 25.0);
/// assert_eq!(rate(2, 3, 1), 66.7);
/// assert_eq!(rate(0, 0, 1), 0.0);
/// ```
pub fn rate(matching: usize, total: usize, decimals: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_to(matching as f64 / total as f64 * 100.0, decimals)
}

pub(crate) fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

// ============================================================================
// OPU
// ============================================================================

/// Per-session OPU counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpuSummary {
    /// Number of extractions.
    pub extracciones: usize,
    /// Viable oocytes (grades I-III plus denuded).
    pub viables: u32,
    /// Irregular oocytes.
    pub irregular: u32,
    /// All oocytes.
    pub total_ovocitos: u32,
    /// Viable share of all oocytes, whole percent.
    pub tasa_viabilidad: f64,
}

impl OpuSummary {
    /// Summarizes one OPU session.
    pub fn of(sesion: &SesionOpu) -> Self {
        let viables: u32 = sesion.extracciones.iter().map(|e| e.viables()).sum();
        let irregular: u32 = sesion.extracciones.iter().map(|e| e.grados.irregular).sum();
        let total_ovocitos = viables + irregular;
        Self {
            extracciones: sesion.extracciones.len(),
            viables,
            irregular,
            total_ovocitos,
            tasa_viabilidad: rate(viables as usize, total_ovocitos as usize, 0),
        }
    }
}

/// OPU sessions newest first, same-date sessions in served order.
pub fn opu_sessions_sorted(sesiones: &[SesionOpu]) -> Vec<&SesionOpu> {
    let mut sorted: Vec<&SesionOpu> = sesiones.iter().collect();
    sorted.sort_by(|a, b| b.fecha.cmp(&a.fecha));
    sorted
}

// ============================================================================
// Fecundación
// ============================================================================

/// Session key of a fecundación entry: maturation date and lab technician.
pub fn fecundacion_key(f: &Fecundacion) -> Option<SessionKey> {
    SessionKey::from_parts(Some(f.fecha_inicio_maduracion), Some(&f.laboratorista))
}

/// Groups fecundación entries into lab sessions.
pub fn fecundacion_sessions(registros: &[Fecundacion]) -> Vec<SessionGroup<&Fecundacion>> {
    group_sessions(registros, |f| fecundacion_key(f))
}

/// Per-session fecundación counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FecundacionSummary {
    /// Entries.
    pub total: usize,
    /// Entries with a fertilization date.
    pub con_fertilizacion: usize,
    /// Entries with a temperature reading.
    pub con_temperatura: usize,
    /// Fertilized share, one decimal.
    pub tasa_fertilizacion: f64,
}

impl FecundacionSummary {
    /// Summarizes one lab session.
    pub fn of(group: &SessionGroup<&Fecundacion>) -> Self {
        let con_fertilizacion = group.count(|f| f.fertilizada());
        Self {
            total: group.len(),
            con_fertilizacion,
            con_temperatura: group.count(|f| f.temperatura.is_some()),
            tasa_fertilizacion: rate(con_fertilizacion, group.len(), 1),
        }
    }
}

// ============================================================================
// Transferencia
// ============================================================================

/// Per-session transfer counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferenciaSummary {
    /// Transfers.
    pub total: usize,
    /// Transfers with a known donor.
    pub con_donadora: usize,
    /// Distinct embryo stages.
    pub estadios: usize,
    /// Distinct recipients.
    pub receptoras: usize,
}

impl TransferenciaSummary {
    /// Summarizes a set of transfers.
    pub fn of<'a>(transferencias: impl IntoIterator<Item = &'a Transferencia>) -> Self {
        let mut total = 0;
        let mut con_donadora = 0;
        let mut estadios = std::collections::HashSet::new();
        let mut receptoras = std::collections::HashSet::new();
        for t in transferencias {
            total += 1;
            if t.donadora_id.is_some() {
                con_donadora += 1;
            }
            if let Some(etapa) = t.etapa() {
                estadios.insert(etapa);
            }
            if let Some(r) = t.receptora.as_deref().filter(|r| !r.trim().is_empty()) {
                receptoras.insert(r);
            }
        }
        Self {
            total,
            con_donadora,
            estadios: estadios.len(),
            receptoras: receptoras.len(),
        }
    }

    /// Summarizes a persisted session.
    pub fn of_sesion(sesion: &SesionTransferencia) -> Self {
        Self::of(&sesion.transferencias_realizadas)
    }
}

/// Transfer sessions newest first, same-date sessions in served order.
pub fn transferencia_sessions_sorted(sesiones: &[SesionTransferencia]) -> Vec<&SesionTransferencia> {
    let mut sorted: Vec<&SesionTransferencia> = sesiones.iter().collect();
    sorted.sort_by(|a, b| b.fecha.cmp(&a.fecha));
    sorted
}

/// Flattens persisted sessions into rows and regroups them by
/// (session date, session technician), merging same-day sessions of one
/// technician.
pub fn transferencia_rows_by_technician(
    sesiones: &[SesionTransferencia],
) -> Vec<SessionGroup<TransferenciaFila<'_>>> {
    group_sessions(sesiones.iter().flat_map(|s| s.filas()), |fila| {
        SessionKey::from_parts(Some(fila.sesion_fecha), Some(fila.sesion_tecnico))
    })
}

/// Next sequence number for a new transfer: highest existing plus one.
///
/// Non-positive numbers count as zero; an empty list yields `1`.
pub fn next_numero_secuencial<'a>(transferencias: impl IntoIterator<Item = &'a Transferencia>) -> i32 {
    transferencias
        .into_iter()
        .map(|t| t.numero_secuencial.max(0))
        .max()
        .unwrap_or(0)
        .saturating_add(1)
}

// ============================================================================
// GFE
// ============================================================================

/// Secondary field used to group GFE checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GfeGrouping {
    /// By client.
    #[default]
    Cliente,
    /// By checking technician.
    Tecnico,
}

impl GfeGrouping {
    /// Session key of a check under this grouping.
    pub fn key(self, c: &ChequeoGfe) -> Option<SessionKey> {
        let secondary = match self {
            Self::Cliente => &c.cliente,
            Self::Tecnico => &c.tecnico_chequeo,
        };
        SessionKey::from_parts(Some(c.fecha), Some(secondary))
    }
}

/// Groups GFE checks into check sessions.
pub fn gfe_sessions(chequeos: &[ChequeoGfe], by: GfeGrouping) -> Vec<SessionGroup<&ChequeoGfe>> {
    group_sessions(chequeos, |c| by.key(c))
}

/// Per-session GFE counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GfeSummary {
    /// Checks.
    pub total: usize,
    /// Pregnant recipients.
    pub prenadas: usize,
    /// Recipients not confirmed pregnant.
    pub vacias: usize,
    /// Pregnancy rate, one decimal.
    pub tasa_prenez: f64,
}

impl GfeSummary {
    /// Summarizes one check session.
    pub fn of(group: &SessionGroup<&ChequeoGfe>) -> Self {
        let prenadas = group.count(|c| c.estado.is_prenada());
        Self {
            total: group.len(),
            prenadas,
            vacias: group.len() - prenadas,
            tasa_prenez: rate(prenadas, group.len(), 1),
        }
    }
}
