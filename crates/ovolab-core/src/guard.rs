//! In-flight submission guard.
//!
//! Each record-creation form owns one [`SubmissionGuard`]. A submission
//! holds a [`SubmissionTicket`] while it runs; a second submission attempted
//! while the ticket is alive is rejected with a warning. The ticket releases
//! the guard when dropped, so the guard is reset whether the submission
//! succeeds, fails, panics or is cancelled.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

// ============================================================================
// FormId
// ============================================================================

/// Identifies one form instance, e.g. `transferencia/nueva`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormId(String);

impl FormId {
    /// Creates a form id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FormId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ============================================================================
// SubmissionGuard
// ============================================================================

/// Rejects overlapping submissions of one form.
///
/// Cheap to clone; clones share the same in-flight flag.
#[derive(Debug, Clone)]
pub struct SubmissionGuard {
    form: FormId,
    in_flight: Arc<AtomicBool>,
}

impl SubmissionGuard {
    /// Creates an idle guard for `form`.
    pub fn new(form: impl Into<FormId>) -> Self {
        Self {
            form: form.into(),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The guarded form.
    pub fn form(&self) -> &FormId {
        &self.form
    }

    /// Whether a submission is currently running.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Claims the guard, or returns `None` if a submission is already running.
    pub fn try_begin(&self) -> Option<SubmissionTicket> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!(form = %self.form, "submission already in progress, ignoring");
            return None;
        }
        Some(SubmissionTicket {
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    /// Runs `submission` while holding the guard.
    ///
    /// Returns `None` without polling `submission` when another submission
    /// is in flight.
    pub async fn run<F, T>(&self, submission: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        let _ticket = self.try_begin()?;
        Some(submission.await)
    }
}

/// Proof that a submission holds the guard. Dropping it releases the guard.
#[derive(Debug)]
#[must_use = "the guard is released as soon as the ticket is dropped"]
pub struct SubmissionTicket {
    in_flight: Arc<AtomicBool>,
}

impl Drop for SubmissionTicket {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}

// ============================================================================
// FormGuards
// ============================================================================

/// Guards for several forms, created on first use.
#[derive(Debug, Clone, Default)]
pub struct FormGuards {
    guards: Arc<Mutex<HashMap<FormId, SubmissionGuard>>>,
}

impl FormGuards {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The guard of `form`, shared with every other caller asking for it.
    pub fn guard(&self, form: impl Into<FormId>) -> SubmissionGuard {
        let form = form.into();
        let mut guards = self.guards.lock().unwrap_or_else(|e| e.into_inner());
        guards
            .entry(form.clone())
            .or_insert_with(|| SubmissionGuard::new(form))
            .clone()
    }
}
