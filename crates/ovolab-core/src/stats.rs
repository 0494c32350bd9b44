//! Detail statistics for a single derived session.
//!
//! Inputs are the members of one session as produced by
//! [`grouping`](crate::grouping). A statistic with no data (for example the
//! most common farm when no check records a farm) is `None`.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::grouping::{rate, round_to};
use crate::report::DonorLookup;
use crate::types::{ChequeoGfe, Fecundacion, RecordId, Transferencia};

// ============================================================================
// Tallies
// ============================================================================

/// Counts occurrences, preserving first-seen order.
pub fn tally<K, I>(items: I) -> Vec<(K, usize)>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = K>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, usize)> = Vec::new();
    for item in items {
        match index.get(&item) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(item.clone(), counts.len());
                counts.push((item, 1));
            }
        }
    }
    counts
}

/// The most frequent key; ties go to the key seen first.
pub fn most_common<K: Clone>(counts: &[(K, usize)]) -> Option<K> {
    top_n(counts, 1).into_iter().next().map(|(k, _)| k)
}

/// The `n` most frequent keys, highest first, ties in first-seen order.
pub fn top_n<K: Clone>(counts: &[(K, usize)], n: usize) -> Vec<(K, usize)> {
    let mut sorted = counts.to_vec();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));
    sorted.truncate(n);
    sorted
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

// ============================================================================
// GFE
// ============================================================================

/// Statistics of one GFE check session.
#[derive(Debug, Clone, PartialEq)]
pub struct GfeSessionStats {
    /// Checks.
    pub total: usize,
    /// Pregnant recipients.
    pub prenadas: usize,
    /// Recipients not confirmed pregnant.
    pub vacias: usize,
    /// Pregnancy rate, one decimal.
    pub tasa_exito: f64,
    /// Technician with the most checks.
    pub tecnico_mas_activo: Option<String>,
    /// Farm seen most often.
    pub hacienda_mas_comun: Option<String>,
    /// Distinct recipients.
    pub receptoras_unicas: usize,
    /// Top three technicians by check count.
    pub top_tecnicos: Vec<(String, usize)>,
}

impl GfeSessionStats {
    /// Computes the statistics of `chequeos`.
    pub fn compute<'a>(chequeos: impl IntoIterator<Item = &'a ChequeoGfe>) -> Self {
        let chequeos: Vec<&ChequeoGfe> = chequeos.into_iter().collect();
        let total = chequeos.len();
        let prenadas = chequeos.iter().filter(|c| c.estado.is_prenada()).count();

        let tecnicos = tally(
            chequeos
                .iter()
                .map(|c| c.tecnico_chequeo.as_str())
                .filter(|t| !t.trim().is_empty())
                .map(str::to_string),
        );
        let haciendas = tally(chequeos.iter().filter_map(|c| non_blank(&c.hacienda)));
        let receptoras: HashSet<&str> = chequeos
            .iter()
            .map(|c| c.receptora.as_str())
            .filter(|r| !r.trim().is_empty())
            .collect();

        Self {
            total,
            prenadas,
            vacias: total - prenadas,
            tasa_exito: rate(prenadas, total, 1),
            tecnico_mas_activo: most_common(&tecnicos),
            hacienda_mas_comun: most_common(&haciendas).map(str::to_string),
            receptoras_unicas: receptoras.len(),
            top_tecnicos: top_n(&tecnicos, 3),
        }
    }
}

// ============================================================================
// Fecundación
// ============================================================================

/// Statistics of one fecundación lab session.
#[derive(Debug, Clone, PartialEq)]
pub struct FecundacionSessionStats {
    /// Entries.
    pub total: usize,
    /// Mean temperature over entries with a reading, one decimal; `0` without readings.
    pub temperatura_promedio: f64,
    /// Entries with a fertilization date.
    pub con_fertilizacion: usize,
    /// Fertilized share, one decimal.
    pub tasa_fertilizacion: f64,
    /// Most used maturation medium.
    pub medio_maduracion_mas_usado: Option<String>,
    /// Most used fertilization medium.
    pub medio_fertilizacion_mas_usado: Option<String>,
    /// Entries per maturation medium.
    pub medios_maduracion: Vec<(String, usize)>,
    /// Entries per fertilization medium.
    pub medios_fertilizacion: Vec<(String, usize)>,
}

impl FecundacionSessionStats {
    /// Computes the statistics of `registros`.
    pub fn compute<'a>(registros: impl IntoIterator<Item = &'a Fecundacion>) -> Self {
        let registros: Vec<&Fecundacion> = registros.into_iter().collect();
        let total = registros.len();

        let temperaturas: Vec<f64> = registros.iter().filter_map(|r| r.temperatura).collect();
        let temperatura_promedio = if temperaturas.is_empty() {
            0.0
        } else {
            round_to(temperaturas.iter().sum::<f64>() / temperaturas.len() as f64, 1)
        };

        let con_fertilizacion = registros.iter().filter(|r| r.fertilizada()).count();
        let medios_maduracion: Vec<(String, usize)> = tally(
            registros
                .iter()
                .filter_map(|r| non_blank(&r.medio_maduracion))
                .map(str::to_string),
        );
        let medios_fertilizacion: Vec<(String, usize)> = tally(
            registros
                .iter()
                .filter_map(|r| non_blank(&r.medio_fertilizacion))
                .map(str::to_string),
        );

        Self {
            total,
            temperatura_promedio,
            con_fertilizacion,
            tasa_fertilizacion: rate(con_fertilizacion, total, 1),
            medio_maduracion_mas_usado: most_common(&medios_maduracion),
            medio_fertilizacion_mas_usado: most_common(&medios_fertilizacion),
            medios_maduracion,
            medios_fertilizacion,
        }
    }
}

// ============================================================================
// Transferencia
// ============================================================================

/// A donor ranked by number of transfers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonorCount {
    /// Donor id.
    pub donadora_id: RecordId,
    /// Resolved label, or a placeholder when the donor is unknown.
    pub label: String,
    /// Transfers from this donor.
    pub count: usize,
}

/// Statistics of one transfer session.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferenciaSessionStats {
    /// Transfers.
    pub total: usize,
    /// Most common embryo stage.
    pub estadio_mas_comun: Option<String>,
    /// Distinct recipients.
    pub receptoras_unicas: usize,
    /// Distinct donors.
    pub donadoras_unicas: usize,
    /// Most used sire.
    pub toro_mas_usado: Option<String>,
    /// Top five sires.
    pub top_toros: Vec<(String, usize)>,
    /// Top three donors by transfer count.
    pub top_donadoras: Vec<DonorCount>,
    /// Transfers with left-ovary cycling recorded.
    pub ciclado_izquierdo: usize,
    /// Transfers with right-ovary cycling recorded.
    pub ciclado_derecho: usize,
}

impl TransferenciaSessionStats {
    /// Computes the statistics of `transferencias`, labelling donors via `donors`.
    pub fn compute<'a>(
        transferencias: impl IntoIterator<Item = &'a Transferencia>,
        donors: &DonorLookup,
    ) -> Self {
        let transferencias: Vec<&Transferencia> = transferencias.into_iter().collect();

        let estadios = tally(transferencias.iter().filter_map(|t| t.etapa()));
        let toros = tally(transferencias.iter().filter_map(|t| non_blank(&t.toro)));
        let donadoras = tally(transferencias.iter().filter_map(|t| t.donadora_id));
        let receptoras: HashSet<&str> = transferencias
            .iter()
            .filter_map(|t| non_blank(&t.receptora))
            .collect();

        Self {
            total: transferencias.len(),
            estadio_mas_comun: most_common(&estadios).map(str::to_string),
            receptoras_unicas: receptoras.len(),
            donadoras_unicas: donadoras.len(),
            toro_mas_usado: most_common(&toros).map(str::to_string),
            top_toros: top_n(&toros, 5)
                .into_iter()
                .map(|(t, n)| (t.to_string(), n))
                .collect(),
            top_donadoras: top_n(&donadoras, 3)
                .into_iter()
                .map(|(id, count)| DonorCount {
                    donadora_id: id,
                    label: donors.label(Some(id)),
                    count,
                })
                .collect(),
            ciclado_izquierdo: transferencias
                .iter()
                .filter(|t| non_blank(&t.ciclado_izquierdo).is_some())
                .count(),
            ciclado_derecho: transferencias
                .iter()
                .filter(|t| non_blank(&t.ciclado_derecho).is_some())
                .count(),
        }
    }
}
