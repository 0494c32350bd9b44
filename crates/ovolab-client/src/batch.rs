//! Session-level deletion.
//!
//! Deleting a session means deleting each of its records one request at a
//! time. The requests are independent: a failure does not stop the
//! remaining deletes and nothing already deleted is restored. The outcome
//! is reported per record so the caller can tell the user exactly what is
//! left. The parent session is removed only once all of its records are
//! gone.

use std::fmt;

use ovolab_core::RecordId;
use ovolab_core::types::SesionTransferencia;

use crate::api::ApiClient;
use crate::error::{Error, Result};
use crate::resources::{Crud, Resource};

/// A record that could not be deleted.
#[derive(Debug)]
pub struct FailedDelete {
    /// The record.
    pub id: RecordId,
    /// Why the delete failed.
    pub error: Error,
}

/// Outcome of a batch delete.
#[derive(Debug, Default)]
pub struct BatchDeleteReport {
    /// Records deleted, in request order.
    pub deleted: Vec<RecordId>,
    /// Records still present.
    pub failed: Vec<FailedDelete>,
    /// Whether the parent session was deleted.
    pub session_deleted: bool,
    /// Why the parent session could not be deleted, when that was attempted.
    pub session_error: Option<Error>,
}

impl BatchDeleteReport {
    /// Whether every record, and the session if any, was deleted.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.session_error.is_none()
    }
}

impl fmt::Display for BatchDeleteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} deleted, {} failed",
            self.deleted.len(),
            self.failed.len()
        )?;
        if self.session_deleted {
            write!(f, ", session deleted")?;
        } else {
            write!(f, ", session kept")?;
        }
        for failed in &self.failed {
            write!(f, "\n  #{}: {}", failed.id, failed.error.user_message())?;
        }
        if let Some(error) = &self.session_error {
            write!(f, "\n  session: {}", error.user_message())?;
        }
        Ok(())
    }
}

/// Deletes `ids` one by one, collecting the outcome.
///
/// A rejected session aborts the batch with [`Error::Unauthorized`]: the
/// session has been cleared and every further request would fail too.
pub async fn delete_each<R: Resource>(crud: &Crud<R>, ids: &[RecordId]) -> Result<BatchDeleteReport> {
    let mut report = BatchDeleteReport::default();
    for &id in ids {
        match crud.delete(id).await {
            Ok(()) => report.deleted.push(id),
            Err(e) if e.is_unauthorized() => return Err(e),
            Err(error) => {
                tracing::warn!(resource = R::PATH, %id, error = %error, "delete failed");
                report.failed.push(FailedDelete { id, error });
            }
        }
    }
    Ok(report)
}

/// Deletes a transfer session: its transfers first, then the session
/// itself if every transfer was deleted.
pub async fn delete_transferencia_session(
    client: &ApiClient,
    sesion: &SesionTransferencia,
) -> Result<BatchDeleteReport> {
    let ids: Vec<RecordId> = sesion
        .transferencias_realizadas
        .iter()
        .map(|t| t.id)
        .collect();
    let mut report = delete_each(&client.transferencias(), &ids).await?;

    if !report.failed.is_empty() {
        tracing::warn!(
            sesion = %sesion.id,
            failed = report.failed.len(),
            "keeping session with undeleted transfers"
        );
        return Ok(report);
    }

    match client.sesiones_transferencia().delete(sesion.id).await {
        Ok(()) => report.session_deleted = true,
        Err(e) if e.is_unauthorized() => return Err(e),
        Err(e) => {
            tracing::warn!(sesion = %sesion.id, error = %e, "session delete failed");
            report.session_error = Some(e);
        }
    }
    Ok(report)
}
