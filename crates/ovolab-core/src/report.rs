//! Printable HTML reports for persisted sessions.
//!
//! Rendering is pure: a report depends only on the session and the donor
//! lookup, contains no timestamps, and identical inputs produce
//! byte-identical output. All text is escaped by `maud`.

use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::collections::HashMap;

use crate::grouping::{OpuSummary, TransferenciaSummary};
use crate::types::{Donadora, RecordId, SesionOpu, SesionTransferencia};

const MISSING: &str = "—";

const CSS: &str = r#"
body { font-family: Arial, Helvetica, sans-serif; margin: 24px; color: #1f2937; }
h1 { font-size: 20px; margin-bottom: 4px; }
.meta { display: grid; grid-template-columns: repeat(2, max-content); gap: 2px 16px; margin-bottom: 12px; }
.meta dt { font-weight: bold; }
.meta dd { margin: 0; }
.totals span { display: inline-block; margin-right: 16px; }
table { border-collapse: collapse; width: 100%; font-size: 12px; margin-top: 12px; }
th, td { border: 1px solid #d1d5db; padding: 4px 6px; text-align: left; }
th { background: #f3f4f6; }
@media print { body { margin: 0; } }
"#;

// ============================================================================
// Donor lookup
// ============================================================================

/// Resolves donor ids to display labels.
#[derive(Debug, Clone, Default)]
pub struct DonorLookup {
    labels: HashMap<RecordId, String>,
}

impl DonorLookup {
    /// Builds a lookup from a donor list.
    pub fn new(donadoras: &[Donadora]) -> Self {
        donadoras.iter().collect()
    }

    /// The `nombre (registro)` label of a known donor.
    pub fn get(&self, id: RecordId) -> Option<&str> {
        self.labels.get(&id).map(String::as_str)
    }

    /// Label for an optional donor reference.
    ///
    /// Unknown ids fall back to `Donadora #<id>`; a missing reference
    /// renders as a dash.
    pub fn label(&self, id: Option<RecordId>) -> String {
        match id {
            Some(id) => self
                .get(id)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Donadora #{id}")),
            None => MISSING.to_string(),
        }
    }

    /// Number of known donors.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether no donors are known.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl<'a> FromIterator<&'a Donadora> for DonorLookup {
    fn from_iter<T: IntoIterator<Item = &'a Donadora>>(iter: T) -> Self {
        Self {
            labels: iter.into_iter().map(|d| (d.id, d.label())).collect(),
        }
    }
}

// ============================================================================
// Reports
// ============================================================================

fn text(value: &Option<String>) -> &str {
    value
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(MISSING)
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="es" {
            head {
                meta charset="UTF-8";
                title { (title) }
                style { (PreEscaped(CSS)) }
            }
            body { (body) }
        }
    }
    .into_string()
}

/// Renders a transfer session with one row per transfer.
pub fn transferencia_report(sesion: &SesionTransferencia, donors: &DonorLookup) -> String {
    let summary = TransferenciaSummary::of_sesion(sesion);
    let title = format!("Sesión de transferencia #{}", sesion.id);
    let body = html! {
        h1 { (title) }
        dl.meta {
            dt { "Fecha" } dd { (sesion.fecha.format("%Y-%m-%d")) }
            dt { "Técnico" } dd { (sesion.tecnico_transferencia) }
            dt { "Cliente" } dd { (sesion.cliente) }
            dt { "Hacienda" } dd { (text(&sesion.hacienda)) }
            dt { "Horario" } dd { (text(&sesion.hora_inicio)) " - " (text(&sesion.hora_final)) }
        }
        div.totals {
            span { "Transferencias: " strong { (summary.total) } }
            span { "Con donadora: " strong { (summary.con_donadora) } }
            span { "Receptoras: " strong { (summary.receptoras) } }
            span { "Estadios: " strong { (summary.estadios) } }
        }
        table {
            thead {
                tr {
                    th { "#" } th { "Donadora" } th { "Toro" } th { "Raza toro" }
                    th { "Estadio" } th { "Receptora" } th { "Ciclado izq." }
                    th { "Ciclado der." } th { "Observaciones" }
                }
            }
            tbody {
                @for t in &sesion.transferencias_realizadas {
                    tr {
                        td { (t.numero_secuencial) }
                        td { (donors.label(t.donadora_id)) }
                        td { (text(&t.toro)) }
                        td { (text(&t.raza_toro)) }
                        td { (t.etapa().unwrap_or(MISSING)) }
                        td { (text(&t.receptora)) }
                        td { (text(&t.ciclado_izquierdo)) }
                        td { (text(&t.ciclado_derecho)) }
                        td { (text(&t.observaciones)) }
                    }
                }
            }
        }
    };
    page(&title, body)
}

/// Renders an OPU session with one row per extraction.
pub fn opu_report(sesion: &SesionOpu, donors: &DonorLookup) -> String {
    let summary = OpuSummary::of(sesion);
    let title = format!("Sesión OPU #{}", sesion.id);
    let body = html! {
        h1 { (title) }
        dl.meta {
            dt { "Fecha" } dd { (sesion.fecha.format("%Y-%m-%d")) }
            dt { "Técnico OPU" } dd { (sesion.tecnico_opu) }
            dt { "Técnico búsqueda" } dd { (sesion.tecnico_busqueda) }
            dt { "Cliente" } dd { (sesion.cliente) }
            dt { "Hacienda" } dd { (text(&sesion.hacienda)) }
            dt { "Finalidad" } dd { (sesion.finalidad) }
        }
        div.totals {
            span { "Extracciones: " strong { (summary.extracciones) } }
            span { "Viables: " strong { (summary.viables) } }
            span { "Irregulares: " strong { (summary.irregular) } }
            span { "Total ovocitos: " strong { (summary.total_ovocitos) } }
            span { "Viabilidad: " strong { (summary.tasa_viabilidad) "%" } }
        }
        table {
            thead {
                tr {
                    th { "#" } th { "Donadora" } th { "Toro A" } th { "Toro B" }
                    th { "G1" } th { "G2" } th { "G3" } th { "Desnudos" }
                    th { "Irregular" } th { "Viables" }
                }
            }
            tbody {
                @for e in &sesion.extracciones {
                    tr {
                        td { (e.numero_secuencial) }
                        td { (donors.label(Some(e.donadora_id))) }
                        td { (text(&e.toro_a)) }
                        td { (text(&e.toro_b)) }
                        td { (e.grados.grado_1) }
                        td { (e.grados.grado_2) }
                        td { (e.grados.grado_3) }
                        td { (e.grados.desnudos) }
                        td { (e.grados.irregular) }
                        td { (e.viables()) }
                    }
                }
            }
        }
    };
    page(&title, body)
}
