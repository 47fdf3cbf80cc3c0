//! Login flow: credentials in, persisted session out.
//!
//! DESIGN
//! ======
//! `AuthFlow` owns the API seam and shares the `SessionStore`. A login
//! attempt performs exactly one store mutation on success and none on
//! failure; every outcome comes back as a `Result` the caller branches on.
//!
//! Concurrent `login` calls are not serialized. Two racing attempts each
//! save their own token and the later save wins; only one UI control can
//! trigger a login, so this is accepted rather than guarded.

use std::sync::Arc;

use tracing::{info, warn};

use crate::net::api::{AdminApi, ApiError};
use crate::net::types::{AdminUser, Credentials};
use crate::session::{SessionError, SessionStore};

/// Message shown when the server rejects a pair without saying why.
pub const DEFAULT_INVALID_CREDENTIALS: &str = "Invalid credentials";

// =============================================================================
// ERROR
// =============================================================================

/// Outcome of a failed login, carrying a message fit for direct display.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The server rejected the username/password pair.
    #[error("{0}")]
    InvalidCredentials(String),

    /// The server was unreachable or answered with something unusable.
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// Anything else, including a session that could not be persisted.
    #[error("login failed: {0}")]
    UnknownFailure(String),
}

impl AuthError {
    /// The human-readable message without the category prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidCredentials(m) | Self::NetworkFailure(m) | Self::UnknownFailure(m) => m,
        }
    }
}

impl From<ApiError> for AuthError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Status { status: 401 | 403, message } => {
                Self::InvalidCredentials(message.unwrap_or_else(|| DEFAULT_INVALID_CREDENTIALS.to_owned()))
            }
            ApiError::Status { status, message } => {
                Self::UnknownFailure(message.unwrap_or_else(|| format!("server returned status {status}")))
            }
            ApiError::Request(m) | ApiError::Parse(m) => Self::NetworkFailure(m),
            ApiError::HttpClientBuild(m) => Self::UnknownFailure(m),
        }
    }
}

impl From<SessionError> for AuthError {
    fn from(e: SessionError) -> Self {
        Self::UnknownFailure(format!("could not persist session: {e}"))
    }
}

// =============================================================================
// FLOW
// =============================================================================

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    /// Operator identity, when the server sent one.
    pub user: Option<AdminUser>,
}

/// Turns credentials into a session using an [`AdminApi`].
pub struct AuthFlow<A> {
    api: A,
    session: Arc<SessionStore>,
}

impl<A: AdminApi> AuthFlow<A> {
    pub fn new(api: A, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Attempt a login and persist the issued token on success.
    ///
    /// Both fields are expected to be non-empty; the caller enforces that.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] when the server rejects the
    /// pair, [`AuthError::NetworkFailure`] when the server is unreachable or
    /// the response is malformed, and [`AuthError::UnknownFailure`] otherwise.
    /// The session store is untouched in every error case.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginOutcome, AuthError> {
        let username = credentials.username.as_str();

        let response = self.api.login(credentials).await.map_err(|e| {
            warn!(%username, error = %e, "login failed");
            AuthError::from(e)
        })?;

        let Some(token) = response.token.filter(|t| !t.is_empty()) else {
            warn!(%username, "login response carried no token");
            return Err(AuthError::NetworkFailure("login response did not include a token".to_owned()));
        };

        self.session.save(&token)?;
        info!(%username, "login succeeded");
        Ok(LoginOutcome { user: response.user })
    }

    /// End the session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UnknownFailure`] if persisted entries cannot be
    /// removed; the in-memory session is gone either way.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.session
            .clear()
            .map_err(|e| AuthError::UnknownFailure(format!("could not clear session: {e}")))?;
        info!("logged out");
        Ok(())
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
