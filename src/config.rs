//! Console configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const SESSION_DIR: &str = ".admin-console";
pub const SESSION_FILE: &str = "session.json";

/// Errors produced while building configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The API base URL is empty after trimming.
    #[error("ADMIN_API_BASE_URL must not be empty")]
    EmptyBaseUrl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub api_base_url: String,
    pub session_file: PathBuf,
    pub timeouts: HttpTimeouts,
}

impl ConsoleConfig {
    /// Build typed console config from environment variables.
    ///
    /// Optional:
    /// - `ADMIN_API_BASE_URL`: default `http://localhost:8080`
    /// - `ADMIN_SESSION_FILE`: default `$HOME/.admin-console/session.json`
    /// - `ADMIN_REQUEST_TIMEOUT_SECS`: default 30
    /// - `ADMIN_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyBaseUrl`] if the base URL is set but blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url =
            std::env::var("ADMIN_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_owned());
        let session_file = std::env::var_os("ADMIN_SESSION_FILE")
            .map_or_else(default_session_file, PathBuf::from);
        let timeouts = HttpTimeouts {
            request_secs: env_parse_u64("ADMIN_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("ADMIN_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        Self::new(&api_base_url, session_file, timeouts)
    }

    /// Build config from explicit values, normalising the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyBaseUrl`] if `api_base_url` is blank.
    pub fn new(api_base_url: &str, session_file: PathBuf, timeouts: HttpTimeouts) -> Result<Self, ConfigError> {
        let api_base_url = normalize_base_url(api_base_url)?;
        Ok(Self { api_base_url, session_file, timeouts })
    }

    /// Apply command-line overrides on top of the environment values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyBaseUrl`] if the overriding base URL is blank.
    pub fn with_overrides(
        mut self,
        base_url: Option<&str>,
        session_file: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = base_url {
            self.api_base_url = normalize_base_url(url)?;
        }
        if let Some(path) = session_file {
            self.session_file = path;
        }
        Ok(self)
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyBaseUrl);
    }
    Ok(trimmed.to_owned())
}

fn default_session_file() -> PathBuf {
    let base = std::env::var_os("HOME").map_or_else(|| PathBuf::from("."), PathBuf::from);
    base.join(SESSION_DIR).join(SESSION_FILE)
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
