//! REST API client for the auth and job endpoints.
//!
//! DESIGN
//! ======
//! Stores and screens depend on the [`AuthApi`] / [`JobApi`] traits rather
//! than on `reqwest` directly, so tests can drive them with in-memory stubs.
//! [`HttpApi`] is the production implementation of both.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures, non-success statuses, and malformed bodies are all
//! mapped into [`ApiError`]; the server's `{"message": ...}` body is kept so
//! the form boundary can translate known categories for the user.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::Duration;

use serde::de::DeserializeOwned;

use super::types::{AuthResponse, ErrorBody, Job, JobDraft, LoginRequest, RegisterRequest, UserSummary};

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The server rejected the credentials or token (HTTP 401).
    #[error("{message}")]
    Unauthorized { message: String },

    /// The server refused the request (4xx other than 401).
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The server failed while handling the request (5xx).
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },

    /// The request never produced a response.
    #[error("network request failed: {0}")]
    Network(String),

    /// The response body did not match the expected schema.
    #[error("response parse failed: {0}")]
    Decode(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ApiError {
    /// Map a non-success status and its raw body into an error.
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| request_failed_message(status));
        match status {
            401 => Self::Unauthorized { message },
            400..=499 => Self::Rejected { status, message },
            _ => Self::Server { status, message },
        }
    }
}

fn request_failed_message(status: u16) -> String {
    format!("request failed: {status}")
}

// =============================================================================
// TRAITS
// =============================================================================

/// Authentication endpoints consumed by the session store.
#[async_trait::async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /login`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] for rejected credentials and
    /// [`ApiError::Network`] when the server is unreachable.
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError>;

    /// `POST /register`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] when the account cannot be created.
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError>;

    /// `GET /me`, resolving a persisted token back to its user.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] for an expired or unknown token.
    async fn current_user(&self, token: &str) -> Result<UserSummary, ApiError>;
}

/// Job CRUD endpoints consumed by the dashboard, details, and form screens.
#[async_trait::async_trait]
pub trait JobApi: Send + Sync {
    async fn list_jobs(&self, token: &str) -> Result<Vec<Job>, ApiError>;
    async fn get_job(&self, token: &str, id: &str) -> Result<Job, ApiError>;
    async fn create_job(&self, token: &str, draft: &JobDraft) -> Result<Job, ApiError>;
    async fn update_job(&self, token: &str, id: &str, draft: &JobDraft) -> Result<Job, ApiError>;
    async fn delete_job(&self, token: &str, id: &str) -> Result<(), ApiError>;
}

// =============================================================================
// ENDPOINTS
// =============================================================================

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

fn job_endpoint(base_url: &str, id: &str) -> String {
    endpoint(base_url, &format!("jobs/{id}"))
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

/// `reqwest`-backed implementation of [`AuthApi`] and [`JobApi`].
pub struct HttpApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    /// Build a client for `base_url` (e.g. `http://localhost:5000/api`).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the TLS backend fails to
    /// initialize.
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.into().trim_end_matches('/').to_owned() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send_json<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T, ApiError> {
        let text = self.send(request).await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| ApiError::Network(e.to_string()))?;
        if !(200..300).contains(&status) {
            tracing::debug!(status, "api request rejected");
            return Err(ApiError::from_status(status, &text));
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl AuthApi for HttpApi {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let url = endpoint(&self.base_url, "login");
        self.send_json(self.http.post(url).json(request)).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let url = endpoint(&self.base_url, "register");
        self.send_json(self.http.post(url).json(request)).await
    }

    async fn current_user(&self, token: &str) -> Result<UserSummary, ApiError> {
        let url = endpoint(&self.base_url, "me");
        self.send_json(self.http.get(url).header(reqwest::header::AUTHORIZATION, bearer(token)))
            .await
    }
}

#[async_trait::async_trait]
impl JobApi for HttpApi {
    async fn list_jobs(&self, token: &str) -> Result<Vec<Job>, ApiError> {
        let url = endpoint(&self.base_url, "jobs");
        self.send_json(self.http.get(url).header(reqwest::header::AUTHORIZATION, bearer(token)))
            .await
    }

    async fn get_job(&self, token: &str, id: &str) -> Result<Job, ApiError> {
        let url = job_endpoint(&self.base_url, id);
        self.send_json(self.http.get(url).header(reqwest::header::AUTHORIZATION, bearer(token)))
            .await
    }

    async fn create_job(&self, token: &str, draft: &JobDraft) -> Result<Job, ApiError> {
        let url = endpoint(&self.base_url, "jobs");
        let request = self
            .http
            .post(url)
            .header(reqwest::header::AUTHORIZATION, bearer(token))
            .json(draft);
        self.send_json(request).await
    }

    async fn update_job(&self, token: &str, id: &str, draft: &JobDraft) -> Result<Job, ApiError> {
        let url = job_endpoint(&self.base_url, id);
        let request = self
            .http
            .put(url)
            .header(reqwest::header::AUTHORIZATION, bearer(token))
            .json(draft);
        self.send_json(request).await
    }

    async fn delete_job(&self, token: &str, id: &str) -> Result<(), ApiError> {
        let url = job_endpoint(&self.base_url, id);
        self.send(self.http.delete(url).header(reqwest::header::AUTHORIZATION, bearer(token)))
            .await?;
        Ok(())
    }
}
