//! Record forms guarded against double submission.

use ovolab_core::{RecordId, SubmissionGuard};

use crate::error::Result;
use crate::resources::{Crud, DraftApi, Resource};

#[derive(Debug, Clone)]
struct DraftTarget {
    api: DraftApi,
    modulo: String,
    tipo_registro: String,
}

/// A create/edit form for one resource.
///
/// While a submission is in flight, further submissions return `Ok(None)`
/// without touching the network. The guard is released when the
/// submission settles, whatever the outcome.
#[derive(Debug, Clone)]
pub struct GuardedForm<R> {
    crud: Crud<R>,
    guard: SubmissionGuard,
    drafts: Option<DraftTarget>,
}

impl<R: Resource> GuardedForm<R> {
    /// A form writing through `crud`, guarded by `guard`.
    pub fn new(crud: Crud<R>, guard: SubmissionGuard) -> Self {
        Self {
            crud,
            guard,
            drafts: None,
        }
    }

    /// Closes the form's drafts after each successful create.
    pub fn with_drafts(
        mut self,
        api: DraftApi,
        modulo: impl Into<String>,
        tipo_registro: impl Into<String>,
    ) -> Self {
        self.drafts = Some(DraftTarget {
            api,
            modulo: modulo.into(),
            tipo_registro: tipo_registro.into(),
        });
        self
    }

    /// The form's guard.
    pub fn guard(&self) -> &SubmissionGuard {
        &self.guard
    }

    /// Creates a record, or returns `Ok(None)` if a submission is running.
    pub async fn submit(&self, input: &R::Input) -> Result<Option<R::Record>> {
        let Some(_ticket) = self.guard.try_begin() else {
            return Ok(None);
        };
        let created = self.crud.create(input).await?;
        self.supersede_drafts().await;
        Ok(Some(created))
    }

    /// Updates a record, or returns `Ok(None)` if a submission is running.
    pub async fn submit_update(&self, id: RecordId, input: &R::Input) -> Result<Option<R::Record>> {
        let Some(_ticket) = self.guard.try_begin() else {
            return Ok(None);
        };
        self.crud.update(id, input).await.map(Some)
    }

    async fn supersede_drafts(&self) {
        let Some(target) = &self.drafts else {
            return;
        };
        if let Err(e) = target
            .api
            .discard_matching(&target.modulo, &target.tipo_registro)
            .await
        {
            tracing::warn!(
                modulo = %target.modulo,
                tipo_registro = %target.tipo_registro,
                error = %e,
                "could not close drafts after submit"
            );
        }
    }
}
