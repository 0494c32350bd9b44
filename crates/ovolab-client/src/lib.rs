#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

//! # Modules
//!
//! - [`config`]: TOML configuration with environment overrides
//! - [`auth`]: persisted bearer session
//! - [`api`]: the REST client
//! - [`resources`]: typed endpoint accessors
//! - [`autosave`]: debounced draft autosave
//! - [`submit`]: double-submit guarded forms
//! - [`batch`]: per-record session deletion

pub mod api;
pub mod auth;
pub mod autosave;
pub mod batch;
pub mod config;
pub mod error;
pub mod resources;
pub mod submit;

// Re-exports for convenience
pub use api::ApiClient;
pub use auth::{AuthSession, CredentialStore, StoredSession};
pub use autosave::{AutosaveHandle, Autosaver, DraftSink};
pub use batch::{BatchDeleteReport, FailedDelete, delete_each, delete_transferencia_session};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use resources::{Crud, DonadoraApi, DraftApi, FotoApi, HealthApi, ListQuery, Photo, Resource};
pub use submit::GuardedForm;
