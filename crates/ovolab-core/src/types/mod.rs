//! Wire records mirroring the backend schemas.

mod donadora;
mod draft;
mod fecundacion;
mod foto;
mod gfe;
mod ids;
mod opu;
mod proptests;
pub(crate) mod timestamp;
mod transferencia;
mod usuario;

pub use donadora::{
    DEFAULT_PAGE_LIMIT, Donadora, DonadoraFilter, DonadoraInput, DonadoraPage, DonadoraStats,
    PropietarioCount, TipoGanado,
};
pub use draft::{Draft, DraftInput, EstadoDraft, FormState};
pub use fecundacion::{Fecundacion, FecundacionInput};
pub use foto::{Foto, FotoEntidad, FotosPage, mime_for};
pub use gfe::{ChequeoGfe, ChequeoGfeInput, EstadoGestacion};
pub use ids::RecordId;
pub use opu::{Extraccion, ExtraccionInput, Finalidad, Grados, NuevaDonadora, SesionOpu, SesionOpuInput};
pub use transferencia::{
    SesionTransferencia, SesionTransferenciaInput, Transferencia, TransferenciaFila,
    TransferenciaInput,
};
pub use usuario::{HealthStatus, LoginResponse, Rol, Usuario};

/// Lowercases a free-text label and strips Spanish accents, so that
/// `"Preñada "` and `"prenada"` compare equal.
pub(crate) fn fold_label(s: &str) -> String {
    s.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' | 'ü' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}
