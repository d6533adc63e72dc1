//! Auth-session state for the current user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by the route gate and user-aware screens to coordinate login
//! redirects and identity-dependent rendering. The store is the only writer
//! of the session; everything else reads snapshots or subscribes.
//!
//! ERROR HANDLING
//! ==============
//! Failed login/register calls leave the current user untouched and return a
//! [`ClientError`]. Token storage failures are logged but never fail an
//! otherwise-successful sign-in: the session simply will not survive a restart.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use super::token::TokenStorage;
use crate::error::ClientError;
use crate::net::api::{ApiError, AuthApi};
use crate::net::types::{AuthResponse, LoginRequest, RegisterRequest, UserSummary};

/// Authentication state tracking the current user and loading status.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<UserSummary>,
    /// True only while a session restore is in flight.
    pub loading: bool,
}

impl SessionState {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Session store backed by the remote auth API and durable token storage.
pub struct SessionStore {
    api: Arc<dyn AuthApi>,
    tokens: Arc<dyn TokenStorage>,
    state: watch::Sender<SessionState>,
    token: Mutex<Option<String>>,
}

impl SessionStore {
    /// Create a store in the loading state; call [`SessionStore::restore`]
    /// to resolve it.
    #[must_use]
    pub fn new(api: Arc<dyn AuthApi>, tokens: Arc<dyn TokenStorage>) -> Self {
        let (state, _) = watch::channel(SessionState { user: None, loading: true });
        Self { api, tokens, state, token: Mutex::new(None) }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<UserSummary> {
        self.state.borrow().user.clone()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// Bearer token for authenticated API calls, if signed in.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Restore a session from the persisted token.
    ///
    /// `loading` is set for the duration of the attempt and cleared
    /// unconditionally afterwards. A token the server rejects is erased; a
    /// token that could not be checked (network failure) is kept.
    pub async fn restore(&self) {
        self.state.send_modify(|s| s.loading = true);
        let restored = self.try_restore().await;
        self.state.send_modify(|s| {
            s.loading = false;
            if restored.is_some() {
                s.user = restored;
            }
        });
    }

    async fn try_restore(&self) -> Option<UserSummary> {
        let token = match self.tokens.load() {
            Ok(Some(token)) => token,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read persisted token");
                return None;
            }
        };

        match self.api.current_user(&token).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "session restored");
                self.set_token(Some(token));
                Some(user)
            }
            Err(ApiError::Unauthorized { .. }) => {
                tracing::info!("persisted token rejected; clearing");
                self.clear_persisted();
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "session restore failed");
                None
            }
        }
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Auth`] for rejected credentials and
    /// [`ClientError::Network`] when the API is unreachable. The current user
    /// is unchanged on error.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserSummary, ClientError> {
        let request = LoginRequest { email: email.to_owned(), password: password.to_owned() };
        let response = self.api.login(&request).await.map_err(ClientError::from_auth)?;
        Ok(self.establish(response))
    }

    /// Create an account and sign in as it.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Auth`] when the account is refused (e.g. the
    /// email is already registered).
    pub async fn register(&self, request: &RegisterRequest) -> Result<UserSummary, ClientError> {
        let response = self.api.register(request).await.map_err(ClientError::from_auth)?;
        Ok(self.establish(response))
    }

    /// Clear the user and the persisted token. Safe to call repeatedly.
    pub fn logout(&self) {
        self.set_token(None);
        self.clear_persisted();
        let changed = self.state.send_if_modified(|s| s.user.take().is_some());
        if changed {
            tracing::info!("logged out");
        }
    }

    fn establish(&self, response: AuthResponse) -> UserSummary {
        let AuthResponse { user, token } = response;
        if let Err(e) = self.tokens.save(&token) {
            tracing::warn!(error = %e, "failed to persist token");
        }
        self.set_token(Some(token));
        tracing::info!(user_id = %user.id, "session established");
        self.state.send_modify(|s| s.user = Some(user.clone()));
        user
    }

    fn set_token(&self, token: Option<String>) {
        *self
            .token
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = token;
    }

    fn clear_persisted(&self) {
        if let Err(e) = self.tokens.clear() {
            tracing::warn!(error = %e, "failed to clear persisted token");
        }
    }
}
