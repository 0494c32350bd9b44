//! Photo attachment endpoints.

use futures::future::join_all;
use reqwest::Method;
use reqwest::multipart::Form;

use ovolab_core::types::{Foto, FotoEntidad, FotosPage, RecordId};

use super::Photo;
use crate::api::ApiClient;
use crate::error::Result;

const PATH: &str = "fotos";

/// Photo endpoints.
#[derive(Debug, Clone)]
pub struct FotoApi {
    client: ApiClient,
}

impl FotoApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Attaches one photo to `entidad` at position `orden`.
    pub async fn upload(
        &self,
        entidad: &FotoEntidad,
        photo: Photo,
        orden: u32,
        descripcion: Option<&str>,
    ) -> Result<Foto> {
        let mut form = Form::new()
            .text("entidad_tipo", entidad.tipo.clone())
            .text("entidad_id", entidad.id.to_string())
            .text("orden", orden.to_string());
        if let Some(descripcion) = descripcion.filter(|d| !d.trim().is_empty()) {
            form = form.text("descripcion", descripcion.to_string());
        }
        form = form.part("archivo", photo.into_part()?);

        let req = self
            .client
            .request(Method::POST, &format!("{PATH}/"))?
            .multipart(form);
        self.client.send_json(req).await
    }

    /// Uploads `photos` concurrently, ordered by position.
    ///
    /// Best effort: a failed upload is logged and skipped, and the photos
    /// that were stored are returned. A rejected session still fails the
    /// whole call.
    pub async fn upload_many(&self, entidad: &FotoEntidad, photos: Vec<Photo>) -> Result<Vec<Foto>> {
        let uploads = photos.into_iter().enumerate().map(|(orden, photo)| {
            let file_name = photo.file_name.clone();
            async move {
                let result = self.upload(entidad, photo, orden as u32, None).await;
                (file_name, result)
            }
        });

        let mut stored = Vec::new();
        for (file_name, result) in join_all(uploads).await {
            match result {
                Ok(foto) => stored.push(foto),
                Err(e) if e.is_unauthorized() => return Err(e),
                Err(e) => {
                    tracing::warn!(entidad = %entidad, file = %file_name, error = %e, "photo upload failed");
                }
            }
        }
        Ok(stored)
    }

    /// Photos attached to `entidad`.
    pub async fn list_for(&self, entidad: &FotoEntidad) -> Result<FotosPage> {
        self.client.get_json(&format!("{PATH}/{entidad}")).await
    }

    /// Deletes one photo.
    pub async fn delete(&self, id: RecordId) -> Result<()> {
        self.client.delete(&format!("{PATH}/{id}")).await
    }

    /// Deletes every photo attached to `entidad`.
    pub async fn delete_all(&self, entidad: &FotoEntidad) -> Result<()> {
        self.client.delete(&format!("{PATH}/{entidad}")).await
    }
}
