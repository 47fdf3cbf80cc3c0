//! Admin API client.
//!
//! `AdminApi` is the seam between the console core and the backend service;
//! `HttpAdminApi` is the `reqwest` implementation. Response parsing lives in
//! small pure functions so it can be tested without a server.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses become `ApiError::Status` carrying the server's `error`
//! message when the body has one. Transport failures and undecodable bodies
//! are kept distinct so callers can tell "unreachable" from "rejected".

use std::time::Duration;

use serde::de::DeserializeOwned;

use super::types::{Credentials, ErrorBody, LoginResponse};
use crate::config::HttpTimeouts;
use crate::state::stats::StatsSnapshot;

pub const LOGIN_PATH: &str = "/api/admin/login";
pub const STATS_PATH: &str = "/api/admin/stats";

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by admin API calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (connect, timeout, body read).
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("server returned status {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    Status { status: u16, message: Option<String> },

    /// A success response body could not be decoded.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ApiError {
    /// True when the server refused the caller's identity.
    #[must_use]
    pub fn is_auth_rejected(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 403, .. })
    }
}

// =============================================================================
// API TRAIT
// =============================================================================

/// The backend endpoints the console depends on. Enables mocking in tests.
#[async_trait::async_trait]
pub trait AdminApi: Send + Sync {
    /// Exchange credentials for a session token.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails, the server rejects the
    /// credentials, or the body is malformed.
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError>;

    /// Fetch the aggregate stats snapshot using `token` for authorization.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails, the token is rejected, or
    /// the body is malformed.
    async fn stats(&self, token: &str) -> Result<StatsSnapshot, ApiError>;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

/// `reqwest`-backed implementation of [`AdminApi`].
#[derive(Debug, Clone)]
pub struct HttpAdminApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAdminApi {
    /// Build a client for `base_url` with the given timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the TLS backend fails to
    /// initialise.
    pub fn new(base_url: &str, timeouts: HttpTimeouts) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait::async_trait]
impl AdminApi for HttpAdminApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let response = self
            .http
            .post(self.url(LOGIN_PATH))
            .json(credentials)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        parse_response(status, &text)
    }

    async fn stats(&self, token: &str) -> Result<StatsSnapshot, ApiError> {
        let response = self
            .http
            .get(self.url(STATS_PATH))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        parse_response(status, &text)
    }
}

// =============================================================================
// PARSING
// =============================================================================

/// Turn a status and raw body into a decoded value or an [`ApiError`].
pub(crate) fn parse_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    if !(200..300).contains(&status) {
        return Err(ApiError::Status { status, message: ErrorBody::message_from(body) });
    }
    serde_json::from_str(body).map_err(|e| ApiError::Parse(e.to_string()))
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
