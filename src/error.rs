//! Client-facing error taxonomy.
//!
//! ERROR HANDLING
//! ==============
//! Every failure a screen can observe is a [`ClientError`]. Validation errors
//! stay field-scoped and never reach the network layer; API failures are
//! converted at the store boundary and translated by [`ClientError::user_message`]
//! before they are shown, so known categories never surface as raw backend text.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use crate::forms::FieldErrors;
use crate::net::api::ApiError;

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password. Please try again.";
pub const NETWORK_ERROR_MESSAGE: &str = "Unable to reach the server. Please check your connection and try again.";
pub const VALIDATION_MESSAGE: &str = "Please correct the highlighted fields.";
pub const TRANSPORT_DEGRADED_MESSAGE: &str =
    "Some features may be limited. Real-time notifications might be blocked by your network or a proxy.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// Local, field-scoped input errors.
    #[error("validation failed for {} field(s)", .0.len())]
    Validation(FieldErrors),

    /// Credentials rejected, token expired, or account conflict.
    #[error("{reason}")]
    Auth { reason: String },

    /// The API could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The API understood the request but refused or failed it.
    #[error("{0}")]
    Request(String),

    /// The real-time channel is down; core features still work.
    #[error("real-time transport degraded")]
    TransportDegraded,
}

impl ClientError {
    /// Convert an auth-endpoint failure, treating any 4xx as an auth error.
    #[must_use]
    pub fn from_auth(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized { message } | ApiError::Rejected { message, .. } => Self::Auth { reason: message },
            other => Self::from(other),
        }
    }

    /// Message suitable for a toast or a form-level error line.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(_) => VALIDATION_MESSAGE.to_owned(),
            Self::Auth { reason } => {
                if reason.to_lowercase().contains("email or password") {
                    INVALID_CREDENTIALS_MESSAGE.to_owned()
                } else {
                    reason.clone()
                }
            }
            Self::Network(_) => NETWORK_ERROR_MESSAGE.to_owned(),
            Self::Request(message) => message.clone(),
            Self::TransportDegraded => TRANSPORT_DEGRADED_MESSAGE.to_owned(),
        }
    }
}

impl From<ApiError> for ClientError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized { message } => Self::Auth { reason: message },
            ApiError::Rejected { message, .. } | ApiError::Server { message, .. } => Self::Request(message),
            ApiError::Network(detail) | ApiError::HttpClientBuild(detail) => Self::Network(detail),
            ApiError::Decode(detail) => Self::Request(format!("unexpected server response: {detail}")),
        }
    }
}
