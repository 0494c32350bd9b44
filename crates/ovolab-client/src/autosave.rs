//! Debounced draft autosave.
//!
//! An [`AutosaveHandle`] is fed the current form state on every change.
//! A save fires once the state has been left alone for the configured
//! delay; each new change restarts the wait. Saves are best effort: they
//! run as detached tasks, failures are logged, and nothing is reported
//! back to the form.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use ovolab_client::{ApiClient, Autosaver, ClientConfig};
//!
//! # async fn demo() -> ovolab_client::Result<()> {
//! let client = ApiClient::new(&ClientConfig::load(None)?)?;
//! let autosave = Autosaver::spawn(
//!     Arc::new(client.drafts()),
//!     "opu",
//!     "sesion",
//!     Duration::from_secs(3),
//! );
//! let mut form = serde_json::Map::new();
//! form.insert("cliente".into(), "Hacienda Sur".into());
//! autosave.update(form);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use ovolab_core::types::{DraftInput, FormState};

use crate::error::Result;
use crate::resources::DraftApi;

/// Destination of autosaved drafts.
#[async_trait]
pub trait DraftSink: Send + Sync + 'static {
    /// Persists `datos` as the draft of form `modulo`/`tipo_registro`.
    async fn save(&self, modulo: &str, tipo_registro: &str, datos: FormState) -> Result<()>;
}

#[async_trait]
impl DraftSink for DraftApi {
    async fn save(&self, modulo: &str, tipo_registro: &str, datos: FormState) -> Result<()> {
        let draft = DraftApi::save(self, &DraftInput::new(modulo, tipo_registro, datos)).await?;
        tracing::debug!(id = %draft.id, modulo, tipo_registro, "draft autosaved");
        Ok(())
    }
}

/// Starts autosave timers.
#[derive(Debug, Clone, Copy)]
pub struct Autosaver;

impl Autosaver {
    /// Spawns the autosave task of one form on the current Tokio runtime.
    pub fn spawn<S: DraftSink>(
        sink: Arc<S>,
        modulo: impl Into<String>,
        tipo_registro: impl Into<String>,
        delay: Duration,
    ) -> AutosaveHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let form = Arc::new(FormKey {
            modulo: modulo.into(),
            tipo_registro: tipo_registro.into(),
        });
        let task = tokio::spawn(debounce(sink, form, delay, rx));
        AutosaveHandle { tx, task }
    }
}

/// Feeds one form's state to its autosave task.
///
/// Dropping the handle cancels a pending save. A save already running
/// is left to finish.
#[derive(Debug)]
pub struct AutosaveHandle {
    tx: mpsc::UnboundedSender<FormState>,
    task: JoinHandle<()>,
}

impl AutosaveHandle {
    /// Records a change and restarts the wait.
    ///
    /// An empty state cancels any pending save and schedules none.
    pub fn update(&self, state: FormState) {
        if self.tx.send(state).is_err() {
            tracing::debug!("autosave already cancelled, dropping update");
        }
    }

    /// Cancels the pending save and stops accepting updates.
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Whether the autosave task still accepts updates.
    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for AutosaveHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[derive(Debug)]
struct FormKey {
    modulo: String,
    tipo_registro: String,
}

async fn debounce<S: DraftSink>(
    sink: Arc<S>,
    form: Arc<FormKey>,
    delay: Duration,
    mut rx: mpsc::UnboundedReceiver<FormState>,
) {
    let mut pending: Option<FormState> = None;
    let timer = tokio::time::sleep(delay);
    tokio::pin!(timer);

    loop {
        tokio::select! {
            update = rx.recv() => match update {
                Some(state) if state.is_empty() => pending = None,
                Some(state) => {
                    pending = Some(state);
                    timer.as_mut().reset(Instant::now() + delay);
                }
                None => break,
            },
            () = &mut timer, if pending.is_some() => {
                if let Some(state) = pending.take() {
                    tokio::spawn(save(Arc::clone(&sink), Arc::clone(&form), state));
                }
            }
        }
    }
}

async fn save<S: DraftSink>(sink: Arc<S>, form: Arc<FormKey>, state: FormState) {
    match sink.save(&form.modulo, &form.tipo_registro, state).await {
        Ok(()) => {
            tracing::debug!(modulo = %form.modulo, tipo_registro = %form.tipo_registro, "autosave complete");
        }
        Err(e) => {
            tracing::warn!(
                modulo = %form.modulo,
                tipo_registro = %form.tipo_registro,
                error = %e,
                "autosave failed"
            );
        }
    }
}
