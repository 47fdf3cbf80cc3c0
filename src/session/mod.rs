//! Session store — the client-side authentication record.
//!
//! DESIGN
//! ======
//! `SessionStore` is an explicitly scoped session context: `open` reads the
//! persisted entries once (init) and `clear` removes them (teardown). There
//! is no ambient global; callers share the store through an `Arc`.
//!
//! INVARIANT
//! =========
//! `authenticated == true` iff a non-empty token is held. The in-memory
//! session and its storage sit behind one mutex, and the in-memory value is
//! swapped only after the storage write succeeds, so readers observe either
//! the old session or the new one, never a flag without its token.

pub mod storage;

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use storage::{SessionStorage, StorageError, StoredEntries};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by session store mutations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A session cannot be created from an empty token.
    #[error("refusing to save an empty session token")]
    EmptyToken,

    /// The storage backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

// =============================================================================
// SESSION
// =============================================================================

/// An authenticated session. Only constructed with a non-empty token.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
}

impl Session {
    fn from_entries(entries: &StoredEntries) -> Option<Self> {
        let token = entries.token.as_deref().filter(|t| !t.is_empty())?;
        if entries.authenticated.as_deref() != Some("true") {
            return None;
        }
        Some(Self { token: token.to_owned() })
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("token", &"<redacted>").finish()
    }
}

// =============================================================================
// STORE
// =============================================================================

struct Inner {
    storage: Box<dyn SessionStorage>,
    session: Option<Session>,
}

/// Holds and persists the session token plus its authenticated flag.
pub struct SessionStore {
    inner: Mutex<Inner>,
}

impl SessionStore {
    /// Open a session context over `storage`, restoring any persisted session.
    ///
    /// Entries with an empty token or a flag other than `"true"` restore as no
    /// session. Unreadable storage also restores as no session; the failure is
    /// logged and the next `save` overwrites it.
    pub fn open(storage: impl SessionStorage + 'static) -> Self {
        let session = match storage.load() {
            Ok(entries) => Session::from_entries(&entries),
            Err(e) => {
                warn!(error = %e, "session storage unreadable; starting signed out");
                None
            }
        };
        debug!(restored = session.is_some(), "session store opened");
        Self { inner: Mutex::new(Inner { storage: Box::new(storage), session }) }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Persist `token` and mark the session authenticated.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EmptyToken`] for an empty token, or a storage
    /// error if persisting fails. In both cases nothing changes.
    pub fn save(&self, token: &str) -> Result<(), SessionError> {
        if token.is_empty() {
            return Err(SessionError::EmptyToken);
        }
        let mut inner = self.lock();
        inner.storage.store(&StoredEntries::authenticated(token))?;
        inner.session = Some(Session { token: token.to_owned() });
        info!("session saved");
        Ok(())
    }

    /// Remove the token and mark the session unauthenticated.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the persisted entries cannot be removed. The
    /// in-memory session is dropped regardless so this process stops using it.
    pub fn clear(&self) -> Result<(), SessionError> {
        let mut inner = self.lock();
        inner.session = None;
        inner.storage.remove()?;
        info!("session cleared");
        Ok(())
    }

    /// True iff a non-empty token is currently held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.lock().session.is_some()
    }

    /// The current token, if a session exists.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.lock().session.as_ref().map(|s| s.token.clone())
    }

    /// A consistent copy of the current session.
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.lock().session.clone()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
