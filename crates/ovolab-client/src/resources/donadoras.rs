//! Donor registry endpoints.
//!
//! Donor writes are multipart so that a photo can travel with the record.

use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use std::path::Path;

use ovolab_core::Validate;
use ovolab_core::types::{
    Donadora, DonadoraFilter, DonadoraInput, DonadoraPage, DonadoraStats, RecordId, mime_for,
};

use crate::api::ApiClient;
use crate::error::{Error, Result};

const PATH: &str = "donadoras";
const ALL_PAGE_LIMIT: u32 = 100;

/// An image file to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    /// File name sent to the backend; its extension selects the MIME type.
    pub file_name: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl Photo {
    /// A photo from memory.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Reads a photo from disk.
    pub async fn read(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("foto")
            .to_string();
        Ok(Self { file_name, bytes })
    }

    pub(crate) fn into_part(self) -> Result<Part> {
        let mime = mime_for(&self.file_name);
        Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(mime)
            .map_err(Error::from)
    }
}

/// Text parts for every non-empty field of `value`.
///
/// Nulls and blank strings are omitted so that optional fields the user
/// left empty do not reach the backend as empty strings.
pub(crate) fn multipart_fields<T: Serialize>(value: &T) -> Result<Form> {
    let serde_json::Value::Object(fields) = serde_json::to_value(value)? else {
        return Err(Error::Serialization(serde::ser::Error::custom(
            "multipart body must be an object",
        )));
    };
    let mut form = Form::new();
    for (key, value) in fields {
        let text = match value {
            serde_json::Value::Null => continue,
            serde_json::Value::String(s) if s.trim().is_empty() => continue,
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        form = form.text(key, text);
    }
    Ok(form)
}

/// Donor endpoints.
#[derive(Debug, Clone)]
pub struct DonadoraApi {
    client: ApiClient,
}

impl DonadoraApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// One page of donors matching `filter`.
    pub async fn list(&self, filter: &DonadoraFilter) -> Result<DonadoraPage> {
        self.client.get_query(&format!("{PATH}/"), filter).await
    }

    /// First page of donors whose name or registry number contains `q`.
    pub async fn search(&self, q: &str) -> Result<DonadoraPage> {
        self.list(&DonadoraFilter::default().search(q)).await
    }

    /// Every donor, active or not, fetched page by page.
    pub async fn all(&self) -> Result<Vec<Donadora>> {
        let mut filter = DonadoraFilter {
            limit: ALL_PAGE_LIMIT,
            ..Default::default()
        };
        let mut donadoras = Vec::new();
        loop {
            let page = self.list(&filter).await?;
            let fetched = page.donadoras.len();
            donadoras.extend(page.donadoras);
            if fetched == 0 || donadoras.len() as u64 >= page.total {
                return Ok(donadoras);
            }
            filter.skip += fetched as u32;
        }
    }

    /// One donor.
    pub async fn get(&self, id: RecordId) -> Result<Donadora> {
        self.client.get_json(&format!("{PATH}/{id}")).await
    }

    /// Registers a donor, optionally with a photo.
    pub async fn create(&self, input: &DonadoraInput, photo: Option<Photo>) -> Result<Donadora> {
        input.validate()?;
        let form = with_photo(multipart_fields(input)?, photo)?;
        let req = self
            .client
            .request(Method::POST, &format!("{PATH}/"))?
            .multipart(form);
        let created: Donadora = self.client.send_json(req).await?;
        tracing::info!(id = %created.id, nombre = %created.nombre, "donadora registered");
        Ok(created)
    }

    /// Replaces a donor's fields, optionally replacing its photo.
    pub async fn update(
        &self,
        id: RecordId,
        input: &DonadoraInput,
        photo: Option<Photo>,
    ) -> Result<Donadora> {
        input.validate()?;
        let form = with_photo(multipart_fields(input)?, photo)?;
        self.put_form(id, form).await
    }

    /// Activates or deactivates a donor.
    pub async fn set_active(&self, id: RecordId, activo: bool) -> Result<Donadora> {
        self.put_form(id, Form::new().text("activo", activo.to_string()))
            .await
    }

    /// Deletes a donor.
    pub async fn delete(&self, id: RecordId) -> Result<()> {
        self.client.delete(&format!("{PATH}/{id}")).await
    }

    /// Registry-wide counts by breed, herd purpose and owner.
    pub async fn stats(&self) -> Result<DonadoraStats> {
        self.client.get_json(&format!("{PATH}/stats")).await
    }

    /// The registry as CSV, optionally restricted to active or inactive
    /// donors.
    pub async fn export_csv(&self, activo: Option<bool>) -> Result<String> {
        let mut req = self
            .client
            .request(Method::GET, &format!("{PATH}/export/csv"))?;
        if let Some(activo) = activo {
            req = req.query(&[("activo", activo)]);
        }
        let csv = self.client.send(req).await?.text().await?;
        tracing::debug!(bytes = csv.len(), "donadoras exported");
        Ok(csv)
    }

    async fn put_form(&self, id: RecordId, form: Form) -> Result<Donadora> {
        let req = self
            .client
            .request(Method::PUT, &format!("{PATH}/{id}"))?
            .multipart(form);
        self.client.send_json(req).await
    }
}

fn with_photo(form: Form, photo: Option<Photo>) -> Result<Form> {
    Ok(match photo {
        Some(photo) => form.part("foto", photo.into_part()?),
        None => form,
    })
}
