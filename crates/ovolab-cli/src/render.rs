//! Plain-text rendering of listings and session summaries.

use std::collections::HashSet;
use std::fmt;

use ovolab_core::{DonorLookup, RecordId};
use ovolab_core::grouping::{
    FecundacionSummary, GfeGrouping, GfeSummary, OpuSummary, TransferenciaSummary,
    fecundacion_sessions, gfe_sessions, opu_sessions_sorted, transferencia_rows_by_technician,
    transferencia_sessions_sorted,
};
use ovolab_core::pagination::{PageItem, item_range, page_window};
use ovolab_core::stats::{FecundacionSessionStats, GfeSessionStats, TransferenciaSessionStats};
use ovolab_core::types::{
    ChequeoGfe, DonadoraPage, DonadoraStats, Draft, EstadoDraft, Fecundacion, HealthStatus,
    SesionOpu, SesionTransferencia, Usuario,
};

const NONE: &str = "-";

// ============================================================================
// Table
// ============================================================================

/// Left-aligned, space-separated columns.
#[derive(Debug)]
pub struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&'static str]) -> Self {
        Self {
            headers: headers.to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.chars().count());
                }
            }
        }
        widths
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();
        let header: Vec<String> = self.headers.iter().map(|h| h.to_string()).collect();
        for row in std::iter::once(&header).chain(&self.rows) {
            let mut line = String::new();
            for (cell, width) in row.iter().zip(&widths) {
                line.push_str(&format!("{cell:<width$}  "));
            }
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

fn opt(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(NONE)
        .to_string()
}

fn percent(rate: f64) -> String {
    format!("{rate:.1}%")
}

// ============================================================================
// Account
// ============================================================================

pub fn usuario(user: &Usuario) -> String {
    format!(
        "{} ({}, {})\n{}\n",
        user.usuario, user.nombre_completo, user.rol, user.email
    )
}

pub fn health(status: &HealthStatus) -> String {
    let mut out = format!("status:   {}\n", status.status);
    out.push_str(&format!(
        "database: {}\n",
        status.database.as_deref().unwrap_or(NONE)
    ));
    if let Some(ms) = status.latency_ms {
        out.push_str(&format!("latency:  {ms:.1} ms\n"));
    }
    out
}

// ============================================================================
// Donadoras
// ============================================================================

/// Pagination bar with the current page in brackets.
pub fn pagination_bar(current: u32, total_pages: u32) -> String {
    page_window(current, total_pages)
        .into_iter()
        .map(|item| match item {
            PageItem::Page(p) if p == current => format!("[{p}]"),
            PageItem::Page(p) => p.to_string(),
            PageItem::Ellipsis => "...".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn donadoras_page(page: &DonadoraPage) -> String {
    if page.donadoras.is_empty() {
        return "No donors found.\n".to_string();
    }
    let mut table = Table::new(&[
        "ID",
        "NOMBRE",
        "REGISTRO",
        "RAZA",
        "TIPO",
        "PROPIETARIO",
        "ACTIVA",
    ]);
    for d in &page.donadoras {
        table.row(vec![
            d.id.to_string(),
            d.nombre.clone(),
            d.numero_registro.clone(),
            d.raza.clone(),
            d.tipo_ganado.to_string(),
            d.propietario_nombre.clone(),
            if d.activo { "si" } else { "no" }.to_string(),
        ]);
    }
    let mut out = table.to_string();
    if let Some((first, last)) = item_range(page.page, page.limit, page.total) {
        out.push_str(&format!("\nShowing {first}-{last} of {}\n", page.total));
    }
    if page.total_pages > 1 {
        out.push_str(&pagination_bar(page.page, page.total_pages));
        out.push('\n');
    }
    out
}

pub fn donadora_stats(stats: &DonadoraStats) -> String {
    let mut out = format!(
        "Activas:   {}\nInactivas: {}\n",
        stats.total_activas, stats.total_inactivas
    );
    let sections = [
        ("RAZA", &stats.por_raza),
        ("TIPO", &stats.por_tipo_ganado),
    ];
    for (header, counts) in sections {
        if counts.is_empty() {
            continue;
        }
        let mut table = Table::new(&[header, "DONADORAS"]);
        for (name, count) in counts {
            table.row(vec![name.clone(), count.to_string()]);
        }
        out.push('\n');
        out.push_str(&table.to_string());
    }
    if !stats.por_propietario.is_empty() {
        let mut table = Table::new(&["PROPIETARIO", "DONADORAS"]);
        for p in &stats.por_propietario {
            table.row(vec![p.nombre.clone(), p.count.to_string()]);
        }
        out.push('\n');
        out.push_str(&table.to_string());
    }
    out
}

// ============================================================================
// Sessions
// ============================================================================

pub fn opu_sessions(sesiones: &[SesionOpu]) -> String {
    if sesiones.is_empty() {
        return "No OPU sessions.\n".to_string();
    }
    let mut table = Table::new(&[
        "ID",
        "FECHA",
        "CLIENTE",
        "TECNICO",
        "EXTRACCIONES",
        "VIABLES",
        "TOTAL",
        "VIABILIDAD",
    ]);
    for sesion in opu_sessions_sorted(sesiones) {
        let summary = OpuSummary::of(sesion);
        table.row(vec![
            sesion.id.to_string(),
            sesion.fecha.to_string(),
            sesion.cliente.clone(),
            sesion.tecnico_opu.clone(),
            summary.extracciones.to_string(),
            summary.viables.to_string(),
            summary.total_ovocitos.to_string(),
            format!("{:.0}%", summary.tasa_viabilidad),
        ]);
    }
    table.to_string()
}

pub fn fecundacion_sessions_text(registros: &[Fecundacion], detail: bool) -> String {
    let groups = fecundacion_sessions(registros);
    if groups.is_empty() {
        return "No fecundación sessions.\n".to_string();
    }
    let mut table = Table::new(&["FECHA", "LABORATORISTA", "REGISTROS", "FERTILIZADOS", "TASA"]);
    for group in &groups {
        let summary = FecundacionSummary::of(group);
        table.row(vec![
            group.key.fecha.to_string(),
            group.key.secondary.clone(),
            summary.total.to_string(),
            summary.con_fertilizacion.to_string(),
            percent(summary.tasa_fertilizacion),
        ]);
    }
    let mut out = table.to_string();
    if detail {
        for group in &groups {
            let stats = FecundacionSessionStats::compute(group.members.iter().copied());
            out.push_str(&format!("\n{} {}\n", group.key.fecha, group.key.secondary));
            out.push_str(&format!(
                "  temperatura promedio:     {:.1}\n",
                stats.temperatura_promedio
            ));
            out.push_str(&format!(
                "  medio de maduracion:      {}\n",
                opt(&stats.medio_maduracion_mas_usado)
            ));
            out.push_str(&format!(
                "  medio de fertilizacion:   {}\n",
                opt(&stats.medio_fertilizacion_mas_usado)
            ));
        }
    }
    out
}

pub fn transferencia_sessions_text(
    sesiones: &[SesionTransferencia],
    donors: Option<&DonorLookup>,
) -> String {
    if sesiones.is_empty() {
        return "No transfer sessions.\n".to_string();
    }
    let sorted = transferencia_sessions_sorted(sesiones);
    let mut table = Table::new(&[
        "ID",
        "FECHA",
        "TECNICO",
        "CLIENTE",
        "TRANSFERENCIAS",
        "CON DONADORA",
        "RECEPTORAS",
    ]);
    for sesion in &sorted {
        let summary = TransferenciaSummary::of_sesion(sesion);
        table.row(vec![
            sesion.id.to_string(),
            sesion.fecha.to_string(),
            sesion.tecnico_transferencia.clone(),
            sesion.cliente.clone(),
            summary.total.to_string(),
            summary.con_donadora.to_string(),
            summary.receptoras.to_string(),
        ]);
    }
    let mut out = table.to_string();
    let Some(donors) = donors else {
        return out;
    };
    for sesion in &sorted {
        let stats = TransferenciaSessionStats::compute(&sesion.transferencias_realizadas, donors);
        out.push_str(&format!("\n#{} {} {}\n", sesion.id, sesion.fecha, sesion.tecnico_transferencia));
        out.push_str(&format!("  estadio mas comun:  {}\n", opt(&stats.estadio_mas_comun)));
        out.push_str(&format!("  toro mas usado:     {}\n", opt(&stats.toro_mas_usado)));
        out.push_str(&format!("  donadoras unicas:   {}\n", stats.donadoras_unicas));
        out.push_str(&format!(
            "  ciclado izq/der:    {}/{}\n",
            stats.ciclado_izquierdo, stats.ciclado_derecho
        ));
        for donor in &stats.top_donadoras {
            out.push_str(&format!("  {:<20}{}\n", donor.label, donor.count));
        }
    }
    out
}

/// Transfers regrouped by (date, technician) across sessions.
pub fn transferencia_days_text(sesiones: &[SesionTransferencia]) -> String {
    let groups = transferencia_rows_by_technician(sesiones);
    if groups.is_empty() {
        return "No transfers.\n".to_string();
    }
    let mut table = Table::new(&[
        "FECHA",
        "TECNICO",
        "SESIONES",
        "TRANSFERENCIAS",
        "CON DONADORA",
        "RECEPTORAS",
    ]);
    for group in &groups {
        let sesion_ids: HashSet<RecordId> = group.members.iter().map(|f| f.sesion_id).collect();
        let summary = TransferenciaSummary::of(group.members.iter().map(|f| f.transferencia));
        table.row(vec![
            group.key.fecha.to_string(),
            group.key.secondary.clone(),
            sesion_ids.len().to_string(),
            summary.total.to_string(),
            summary.con_donadora.to_string(),
            summary.receptoras.to_string(),
        ]);
    }
    table.to_string()
}

pub fn gfe_sessions_text(chequeos: &[ChequeoGfe], by: GfeGrouping, detail: bool) -> String {
    let groups = gfe_sessions(chequeos, by);
    if groups.is_empty() {
        return "No GFE sessions.\n".to_string();
    }
    let secondary = match by {
        GfeGrouping::Cliente => "CLIENTE",
        GfeGrouping::Tecnico => "TECNICO",
    };
    let mut table = Table::new(&["FECHA", secondary, "CHEQUEOS", "PRENADAS", "VACIAS", "TASA"]);
    for group in &groups {
        let summary = GfeSummary::of(group);
        table.row(vec![
            group.key.fecha.to_string(),
            group.key.secondary.clone(),
            summary.total.to_string(),
            summary.prenadas.to_string(),
            summary.vacias.to_string(),
            percent(summary.tasa_prenez),
        ]);
    }
    let mut out = table.to_string();
    if detail {
        for group in &groups {
            let stats = GfeSessionStats::compute(group.members.iter().copied());
            out.push_str(&format!("\n{} {}\n", group.key.fecha, group.key.secondary));
            out.push_str(&format!(
                "  tecnico mas activo:  {}\n",
                opt(&stats.tecnico_mas_activo)
            ));
            out.push_str(&format!(
                "  hacienda mas comun:  {}\n",
                opt(&stats.hacienda_mas_comun)
            ));
            out.push_str(&format!("  receptoras unicas:   {}\n", stats.receptoras_unicas));
        }
    }
    out
}

// ============================================================================
// Drafts
// ============================================================================

fn estado(estado: &EstadoDraft) -> &'static str {
    match estado {
        EstadoDraft::Draft => "draft",
        EstadoDraft::Completado => "completado",
        EstadoDraft::Otro => "?",
    }
}

pub fn drafts(drafts: &[Draft]) -> String {
    if drafts.is_empty() {
        return "No drafts.\n".to_string();
    }
    let mut table = Table::new(&["ID", "MODULO", "TIPO", "ESTADO", "ACTUALIZADO", "CAMPOS"]);
    for d in drafts {
        let updated = d.fecha_actualizacion.unwrap_or(d.fecha_creacion);
        table.row(vec![
            d.id.to_string(),
            d.modulo.clone(),
            d.tipo_registro.clone(),
            estado(&d.estado).to_string(),
            updated.format("%Y-%m-%d %H:%M").to_string(),
            d.datos_json.len().to_string(),
        ]);
    }
    table.to_string()
}
