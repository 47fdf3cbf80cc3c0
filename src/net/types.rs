//! Wire types shared by the admin API client and its callers.

use serde::{Deserialize, Serialize};

/// A username/password pair for one login attempt. Never persisted.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The operator identity returned alongside a login token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub username: String,
    #[serde(default)]
    pub role: String,
}

/// Successful login body: `{ "token": "...", "user": { ... } }`.
///
/// `token` is optional at the decode layer so a 2xx without one surfaces as a
/// malformed response rather than a parse error deep in serde.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<AdminUser>,
}

/// Failure body: `{ "error": "..." }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Extract the server's `error` message from a raw body, verbatim.
    /// An empty message counts as absent.
    #[must_use]
    pub fn message_from(body: &str) -> Option<String> {
        serde_json::from_str::<Self>(body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.is_empty())
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
