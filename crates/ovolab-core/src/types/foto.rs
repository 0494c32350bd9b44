//! Photo attachments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::RecordId;

/// The record a photo is attached to, e.g. `donadora/4`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FotoEntidad {
    /// Entity kind as understood by the backend.
    pub tipo: String,
    /// Entity id.
    pub id: RecordId,
}

impl FotoEntidad {
    /// Creates a reference to any entity kind.
    pub fn new(tipo: impl Into<String>, id: RecordId) -> Self {
        Self {
            tipo: tipo.into(),
            id,
        }
    }

    /// A donor's photos.
    pub fn donadora(id: RecordId) -> Self {
        Self::new("donadora", id)
    }

    /// A transfer's photos.
    pub fn transferencia(id: RecordId) -> Self {
        Self::new("transferencia", id)
    }
}

impl fmt::Display for FotoEntidad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.tipo, self.id)
    }
}

/// A stored photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Foto {
    /// Server id.
    pub id: RecordId,
    /// Owning entity kind.
    pub entidad_tipo: String,
    /// Owning entity id.
    pub entidad_id: RecordId,
    /// Display order.
    #[serde(default)]
    pub orden: i32,
    /// Caption.
    #[serde(default)]
    pub descripcion: Option<String>,
    /// Full-size URL.
    pub url: String,
    /// Thumbnail URL.
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    /// Storage id.
    pub public_id: String,
    /// Upload timestamp.
    #[serde(with = "crate::types::timestamp")]
    pub fecha_creacion: DateTime<Utc>,
    /// Uploading user.
    #[serde(default)]
    pub usuario_creacion_id: Option<RecordId>,
}

/// All photos of one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FotosPage {
    /// Entity kind.
    pub entidad_tipo: String,
    /// Entity id.
    pub entidad_id: RecordId,
    /// Photos in display order.
    pub fotos: Vec<Foto>,
    /// Photo count.
    pub total: u64,
}

/// Maps a file extension to the MIME type sent with an upload.
pub fn mime_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        _ => "application/octet-stream",
    }
}
