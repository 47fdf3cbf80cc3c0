//! Page guard for protected views.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every protected view goes through the same gate: no session, no render.
//! The guard also owns the session-destroy policy. When a protected request
//! comes back authentication-rejected, the stored token is stale and the
//! guard clears it so the next view falls back to the login path.

use std::sync::Arc;

use tracing::{info, warn};

use crate::session::SessionStore;
use crate::state::loader::FetchFailure;

/// Errors produced when entering a protected view.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuardError {
    /// No valid session exists.
    #[error("not signed in; log in first")]
    Unauthenticated,

    /// The server rejected the session but its stored copy could not be
    /// removed, so it will be restored on the next start.
    #[error("session was rejected but could not be removed from storage: {0}")]
    ClearFailed(String),
}

/// Gates protected views on a valid session.
#[derive(Debug, Clone)]
pub struct SessionGuard {
    session: Arc<SessionStore>,
}

impl SessionGuard {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self { session }
    }

    /// Token to use for the protected view's requests.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::Unauthenticated`] if no valid session exists.
    pub fn require(&self) -> Result<String, GuardError> {
        self.session.token().ok_or(GuardError::Unauthenticated)
    }

    /// Apply the session-destroy policy to a failed protected request.
    ///
    /// Returns `Ok(true)` if the failure was an authentication rejection and
    /// the session was destroyed, `Ok(false)` if the session is kept.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::ClearFailed`] if the rejected session could not
    /// be removed from storage. This process no longer uses it, but it will
    /// be restored on the next `SessionStore::open`.
    pub fn on_failure(&self, failure: &FetchFailure) -> Result<bool, GuardError> {
        if !failure.is_auth_rejected() {
            return Ok(false);
        }
        self.session.clear().map_err(|e| {
            warn!(error = %e, "could not remove rejected session from storage");
            GuardError::ClearFailed(e.to_string())
        })?;
        info!(status = ?failure.status(), "session rejected by server; signed out");
        Ok(true)
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
