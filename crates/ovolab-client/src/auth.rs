//! Session token storage.
//!
//! The bearer token and the logged-in user's profile are the only local
//! state the client persists. [`AuthSession`] holds them in memory and
//! mirrors every change to a [`CredentialStore`] file.

use ovolab_core::types::Usuario;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::error::Result;

/// What is persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    /// Bearer token.
    pub token: String,
    /// Profile returned at login.
    #[serde(default)]
    pub user: Option<Usuario>,
}

// ============================================================================
// CredentialStore
// ============================================================================

/// JSON file holding a [`StoredSession`].
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// A store backed by `path`. Nothing is read until [`load`](Self::load).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored session. A missing or unreadable file is no session.
    pub fn load(&self) -> Result<Option<StoredSession>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        match serde_json::from_str(&content) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring corrupt credentials file");
                Ok(None)
            }
        }
    }

    /// Writes `session`, creating parent directories as needed.
    pub fn save(&self, session: &StoredSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(session)?)?;
        Ok(())
    }

    /// Removes the file if present.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ============================================================================
// AuthSession
// ============================================================================

/// Shared, in-memory view of the current session.
///
/// Cloning is cheap; clones observe the same login and logout.
#[derive(Debug, Clone)]
pub struct AuthSession {
    current: Arc<RwLock<Option<StoredSession>>>,
    store: CredentialStore,
}

impl AuthSession {
    /// Opens the session persisted in `store`, if any.
    pub fn open(store: CredentialStore) -> Result<Self> {
        let current = store.load()?;
        Ok(Self {
            current: Arc::new(RwLock::new(current)),
            store,
        })
    }

    /// A session that starts logged out, ignoring anything on disk.
    pub fn empty(store: CredentialStore) -> Self {
        Self {
            current: Arc::new(RwLock::new(None)),
            store,
        }
    }

    /// The bearer token, when logged in.
    pub fn token(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.token.clone())
    }

    /// The logged-in user, when known.
    pub fn user(&self) -> Option<Usuario> {
        self.read().as_ref().and_then(|s| s.user.clone())
    }

    /// Whether a token is held.
    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    /// Replaces the session and persists it.
    pub fn set(&self, session: StoredSession) -> Result<()> {
        self.store.save(&session)?;
        *self.write() = Some(session);
        Ok(())
    }

    /// Updates the cached profile of the current session.
    pub fn set_user(&self, user: Usuario) -> Result<()> {
        let mut current = self.write();
        if let Some(session) = current.as_mut() {
            session.user = Some(user);
            self.store.save(session)?;
        }
        Ok(())
    }

    /// Forgets the token in memory and on disk.
    pub fn logout(&self) {
        *self.write() = None;
        if let Err(e) = self.store.clear() {
            tracing::warn!(path = %self.store.path().display(), error = %e, "failed to remove credentials file");
        }
    }

    /// The backing store.
    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Option<StoredSession>> {
        self.current.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<StoredSession>> {
        self.current.write().unwrap_or_else(|e| e.into_inner())
    }
}
