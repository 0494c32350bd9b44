//! Typed accessors for the backend's resources.
//!
//! Plain JSON resources share one generic [`Crud`] accessor parameterized
//! by a [`Resource`] marker. Donors, photos, drafts and health have their
//! own accessors for their multipart or non-CRUD endpoints.

mod donadoras;
mod drafts;
mod fotos;
mod health;

pub use donadoras::{DonadoraApi, Photo};
pub use drafts::DraftApi;
pub use fotos::FotoApi;
pub use health::HealthApi;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

use ovolab_core::types::{
    ChequeoGfe, ChequeoGfeInput, Fecundacion, FecundacionInput, SesionOpu, SesionOpuInput,
    SesionTransferencia, SesionTransferenciaInput, Transferencia, TransferenciaInput,
};
use ovolab_core::grouping::next_numero_secuencial;
use ovolab_core::{EntityStore, Identified, RecordId, Validate};

use crate::api::ApiClient;
use crate::error::Result;

/// A JSON resource under the API base.
pub trait Resource {
    /// Router path, e.g. `opu`.
    const PATH: &'static str;
    /// Record as returned by the backend.
    type Record: DeserializeOwned + Identified + Clone + Send;
    /// Body accepted on create and update.
    type Input: Serialize + Validate + Sync;
}

macro_rules! resource {
    ($(#[$doc:meta] $name:ident: $path:literal => $record:ty, $input:ty;)*) => {
        $(
            #[$doc]
            #[derive(Debug, Clone, Copy)]
            pub struct $name;

            impl Resource for $name {
                const PATH: &'static str = $path;
                type Record = $record;
                type Input = $input;
            }
        )*
    };
}

resource! {
    /// OPU sessions.
    OpuSessions: "opu" => SesionOpu, SesionOpuInput;
    /// Fertilization records.
    Fecundaciones: "fecundacion" => Fecundacion, FecundacionInput;
    /// Transfer sessions.
    SesionesTransferencia: "sesion-transferencia" => SesionTransferencia, SesionTransferenciaInput;
    /// Individual transfers.
    Transferencias: "transferencia" => Transferencia, TransferenciaInput;
    /// Pregnancy checks.
    ChequeosGfe: "gfe" => ChequeoGfe, ChequeoGfeInput;
}

/// Offset paging for plain list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    /// Records to skip.
    pub skip: u32,
    /// Page size.
    pub limit: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self { skip: 0, limit: 100 }
    }
}

/// Create, read, update and delete for one [`Resource`].
#[derive(Debug, Clone)]
pub struct Crud<R> {
    client: ApiClient,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Crud<R> {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    fn collection() -> String {
        format!("{}/", R::PATH)
    }

    fn item(id: RecordId) -> String {
        format!("{}/{id}", R::PATH)
    }

    /// The first page with the backend's default size.
    pub async fn list(&self) -> Result<Vec<R::Record>> {
        self.list_page(ListQuery::default()).await
    }

    /// One page of records.
    pub async fn list_page(&self, query: ListQuery) -> Result<Vec<R::Record>> {
        self.client.get_query(&Self::collection(), &query).await
    }

    /// One record.
    pub async fn get(&self, id: RecordId) -> Result<R::Record> {
        self.client.get_json(&Self::item(id)).await
    }

    /// Validates and creates a record.
    pub async fn create(&self, input: &R::Input) -> Result<R::Record> {
        input.validate()?;
        let created: R::Record = self.client.post_json(&Self::collection(), input).await?;
        tracing::info!(resource = R::PATH, id = %created.id(), "created");
        Ok(created)
    }

    /// Validates and replaces a record.
    pub async fn update(&self, id: RecordId, input: &R::Input) -> Result<R::Record> {
        input.validate()?;
        self.client.put_json(&Self::item(id), input).await
    }

    /// Deletes a record.
    pub async fn delete(&self, id: RecordId) -> Result<()> {
        self.client.delete(&Self::item(id)).await?;
        tracing::info!(resource = R::PATH, %id, "deleted");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Store-backed variants
    //
    // Each performs the request, then swaps `store` for the reduced snapshot.
    // A failed request leaves `store` untouched.
    // ------------------------------------------------------------------------

    /// Reloads the first page into `store`.
    pub async fn refresh(&self, store: &mut EntityStore<R::Record>) -> Result<()> {
        *store = store.set_all(self.list().await?);
        Ok(())
    }

    /// Creates a record and prepends it to `store`.
    pub async fn create_in(
        &self,
        store: &mut EntityStore<R::Record>,
        input: &R::Input,
    ) -> Result<R::Record> {
        let created = self.create(input).await?;
        *store = store.add(created.clone());
        Ok(created)
    }

    /// Updates a record and replaces it in `store`, adding it when the
    /// snapshot predates it.
    pub async fn update_in(
        &self,
        store: &mut EntityStore<R::Record>,
        id: RecordId,
        input: &R::Input,
    ) -> Result<R::Record> {
        let updated = self.update(id, input).await?;
        *store = store
            .update(id, updated.clone())
            .unwrap_or_else(|_| store.add(updated.clone()));
        Ok(updated)
    }

    /// Deletes a record and drops it from `store`.
    pub async fn delete_in(&self, store: &mut EntityStore<R::Record>, id: RecordId) -> Result<()> {
        self.delete(id).await?;
        if let Ok(next) = store.remove(id) {
            *store = next;
        }
        Ok(())
    }
}

impl Crud<Transferencias> {
    /// Adds a transfer to `sesion`, numbered after its highest existing
    /// transfer.
    pub async fn append_to(
        &self,
        sesion: &SesionTransferencia,
        mut input: TransferenciaInput,
    ) -> Result<Transferencia> {
        input.sesion_transferencia_id = Some(sesion.id);
        input.numero_secuencial = next_numero_secuencial(&sesion.transferencias_realizadas);
        self.create(&input).await
    }
}
