#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

//! # ovolab-core
//!
//! Core types and pure logic for the Ovolab laboratory records client:
//!
//! - [`types`]: wire records mirroring the backend schemas
//! - [`grouping`]: the session grouper and its per-page summaries
//! - [`stats`]: per-session detail statistics
//! - [`report`]: HTML report generation
//! - [`store`]: snapshot entity stores
//! - [`guard`]: in-flight submission guard
//! - [`validate`]: client-side field validation
//! - [`pagination`]: page windows for paginated listings

pub mod error;
pub mod grouping;
pub mod guard;
pub mod pagination;
pub mod report;
pub mod stats;
pub mod store;
pub mod types;
pub mod validate;

// Re-exports for convenience
pub use error::{Error, Result};
pub use grouping::{SessionGroup, SessionKey, group_sessions, rate};
pub use guard::{FormGuards, FormId, SubmissionGuard, SubmissionTicket};
pub use report::DonorLookup;
pub use store::{DonadoraStore, EntityStore, Identified};
pub use types::RecordId;
pub use validate::{FieldError, Validate};
