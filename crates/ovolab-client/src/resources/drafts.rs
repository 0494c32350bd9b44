//! Autosaved draft endpoints.
//!
//! The backend keeps at most one open draft per user, module, record type
//! and edited record: saving again updates it in place.

use serde::Serialize;

use ovolab_core::Validate;
use ovolab_core::types::{Draft, DraftInput, RecordId};

use crate::api::ApiClient;
use crate::error::Result;

const PATH: &str = "drafts";

#[derive(Debug, Serialize)]
struct DraftQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    modulo: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tipo_registro: Option<&'a str>,
}

/// Draft endpoints.
#[derive(Debug, Clone)]
pub struct DraftApi {
    client: ApiClient,
}

impl DraftApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Creates or updates the user's draft for the input's form.
    pub async fn save(&self, input: &DraftInput) -> Result<Draft> {
        input.validate()?;
        self.client.post_json(&format!("{PATH}/"), input).await
    }

    /// The user's open drafts, optionally narrowed to one module or form.
    pub async fn list(&self, modulo: Option<&str>, tipo_registro: Option<&str>) -> Result<Vec<Draft>> {
        let query = DraftQuery {
            modulo,
            tipo_registro,
        };
        self.client.get_query(&format!("{PATH}/"), &query).await
    }

    /// Deletes a draft.
    pub async fn delete(&self, id: RecordId) -> Result<()> {
        self.client.delete(&format!("{PATH}/{id}")).await
    }

    /// Marks a draft as superseded by a committed record.
    pub async fn complete(&self, id: RecordId) -> Result<()> {
        self.client
            .post_empty(&format!("{PATH}/{id}/complete"))
            .await
    }

    /// Completes every open draft of one form. Returns how many were closed.
    pub async fn discard_matching(&self, modulo: &str, tipo_registro: &str) -> Result<usize> {
        let drafts = self.list(Some(modulo), Some(tipo_registro)).await?;
        for draft in &drafts {
            self.complete(draft.id).await?;
        }
        if !drafts.is_empty() {
            tracing::debug!(modulo, tipo_registro, count = drafts.len(), "drafts superseded");
        }
        Ok(drafts.len())
    }
}
