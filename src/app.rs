//! Application root: shared context, routing, and the active screen.
//!
//! ARCHITECTURE
//! ============
//! [`AppContext`] is built once at startup and owns every store; screens and
//! forms receive the pieces they need from it instead of reaching for
//! globals. [`App`] holds the current path and the screen built for it, and
//! re-runs the route gate whenever the session's authentication status
//! changes. Form submissions run off the input loop; their results come back
//! as [`AfterSubmit`] values that the loop applies with [`App::apply`].
//!
//! The real-time channel follows the session: it is started when a user is
//! signed in and stopped (clearing the degraded flag) when they are not.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::components::toast_list::render_toasts;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::forms::job::{self as job_form, JobController, JobFormMode, SESSION_EXPIRED_MESSAGE};
use crate::forms::login::{self as login_form, LoginController};
use crate::forms::register::{self as register_form, RegisterController};
use crate::forms::{FormError, SubmitOutcome};
use crate::net::api::{ApiError, AuthApi, HttpApi, JobApi};
use crate::net::realtime::{self, RealtimeHandle};
use crate::pages::dashboard::DashboardPage;
use crate::pages::job_details::{JOB_DELETED_MESSAGE, JobDetailsPage};
use crate::pages::{job_form as job_form_page, layout, login as login_page, register as register_page};
use crate::routes::{LANDING_PATH, LOGIN_PATH, Resolution, Route, settle};
use crate::state::notifications::{NotificationKind, NotificationStore};
use crate::state::session::SessionStore;
use crate::state::token::{FileTokenStorage, MemoryTokenStorage, TokenStorage};

pub const LOGGED_OUT_MESSAGE: &str = "You have been logged out.";

// =============================================================================
// CONTEXT
// =============================================================================

/// Stores and API handles shared by every screen.
#[derive(Clone)]
pub struct AppContext {
    pub config: ClientConfig,
    pub session: Arc<SessionStore>,
    pub notifications: NotificationStore,
    pub jobs: Arc<dyn JobApi>,
}

impl AppContext {
    #[must_use]
    pub fn new(
        config: ClientConfig,
        auth: Arc<dyn AuthApi>,
        jobs: Arc<dyn JobApi>,
        tokens: Arc<dyn TokenStorage>,
    ) -> Self {
        let notifications = NotificationStore::new(config.notification_ttl);
        let session = Arc::new(SessionStore::new(auth, tokens));
        Self { config, session, notifications, jobs }
    }

    /// Wire the HTTP API and token storage described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the HTTP client cannot be built.
    pub fn from_config(config: ClientConfig) -> Result<Self, ApiError> {
        let api = Arc::new(HttpApi::new(config.api_url.clone(), config.request_timeout)?);
        let tokens: Arc<dyn TokenStorage> = match &config.data_dir {
            Some(dir) => Arc::new(FileTokenStorage::new(dir)),
            None => Arc::new(MemoryTokenStorage::default()),
        };
        Ok(Self::new(config, api.clone(), api, tokens))
    }
}

// =============================================================================
// SCREENS
// =============================================================================

/// What the current path renders.
pub enum Screen {
    Loading,
    Login(LoginController),
    Register(RegisterController),
    Dashboard(DashboardPage),
    JobForm { mode: JobFormMode, form: JobController },
    JobDetails(JobDetailsPage),
    /// A protected screen whose data could not be loaded.
    LoadFailed { message: String },
    NotFound(String),
}

/// Follow-up requested by a settled form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AfterSubmit {
    Stay,
    /// Go to `to`, provided the user is still on `from`.
    Navigate { from: String, to: String },
    /// The API rejected the session token.
    SessionExpired,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("no form on this screen")]
    NoForm,
    #[error(transparent)]
    Form(#[from] FormError),
}

// =============================================================================
// APP
// =============================================================================

pub struct App {
    ctx: AppContext,
    path: String,
    screen: Screen,
    /// `(authenticated, loading)` the current screen was resolved against.
    gate: (bool, bool),
    realtime: Option<(String, RealtimeHandle)>,
}

impl App {
    #[must_use]
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx, path: "/".to_owned(), screen: Screen::Loading, gate: (false, true), realtime: None }
    }

    #[must_use]
    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Restore any persisted session, then open `path`.
    pub async fn start(&mut self, path: &str) {
        self.ctx.session.restore().await;
        self.navigate(path).await;
    }

    /// Resolve `path` through the route gate and build its screen.
    ///
    /// If building the screen changes the session (an API call rejected the
    /// token), the final path is resolved once more against the new session.
    pub async fn navigate(&mut self, path: &str) {
        let mut target = path.to_owned();
        for _ in 0..2 {
            let session = self.ctx.session.snapshot();
            let gate = (session.is_authenticated(), session.loading);
            let (resolved, resolution) = settle(gate.0, gate.1, &target);
            tracing::info!(requested = %target, path = %resolved, "navigated");
            self.path = resolved;
            self.gate = gate;
            self.screen = self.build(resolution).await;

            let after = self.ctx.session.snapshot();
            if (after.is_authenticated(), after.loading) == gate {
                break;
            }
            target.clone_from(&self.path);
        }
        self.sync_realtime();
    }

    /// Re-run the route gate if the session changed since the current screen
    /// was resolved. Returns `true` if it navigated.
    pub async fn refresh_route(&mut self) -> bool {
        let session = self.ctx.session.snapshot();
        if (session.is_authenticated(), session.loading) == self.gate {
            return false;
        }
        let path = self.path.clone();
        self.navigate(&path).await;
        true
    }

    /// Rebuild the current screen, reloading its data.
    pub async fn reload(&mut self) {
        let path = self.path.clone();
        self.navigate(&path).await;
    }

    async fn build(&self, resolution: Resolution) -> Screen {
        let notifications = self.ctx.notifications.clone();
        match resolution {
            Resolution::Loading => Screen::Loading,
            Resolution::NotFound(path) => Screen::NotFound(path),
            Resolution::Public(Route::Login) => Screen::Login(LoginController::new(notifications)),
            Resolution::Public(Route::Register) => Screen::Register(RegisterController::new(notifications)),
            Resolution::Protected(route) => self.build_protected(route).await,
            Resolution::Public(route) | Resolution::Redirect(route) => {
                tracing::warn!(path = %route.path(), "unresolved route");
                Screen::NotFound(route.path())
            }
        }
    }

    async fn build_protected(&self, route: Route) -> Screen {
        let Some(token) = self.ctx.session.token() else {
            return self.load_failed(ClientError::Auth { reason: SESSION_EXPIRED_MESSAGE.to_owned() });
        };
        let jobs = self.ctx.jobs.as_ref();
        let notifications = self.ctx.notifications.clone();

        let loaded = match route {
            Route::Dashboard => DashboardPage::load(jobs, &token).await.map(Screen::Dashboard),
            Route::JobNew => Ok(Screen::JobForm {
                mode: JobFormMode::Create,
                form: JobController::with_values(notifications, job_form::blank_values()),
            }),
            Route::JobDetails(id) => JobDetailsPage::load(jobs, &token, &id).await.map(Screen::JobDetails),
            Route::JobEdit(id) => match jobs.get_job(&token, &id).await {
                Ok(job) => Ok(Screen::JobForm {
                    mode: JobFormMode::Edit(id),
                    form: JobController::with_values(notifications, job_form::values_from_job(&job)),
                }),
                Err(e) => Err(ClientError::from(e)),
            },
            other => Ok(Screen::NotFound(other.path())),
        };
        loaded.unwrap_or_else(|err| self.load_failed(err))
    }

    fn load_failed(&self, err: ClientError) -> Screen {
        if matches!(err, ClientError::Auth { .. }) {
            self.expire_session();
            return Screen::Loading;
        }
        tracing::warn!(error = %err, path = %self.path, "screen load failed");
        let message = err.user_message();
        self.ctx.notifications.add_notification(message.clone(), NotificationKind::Error);
        Screen::LoadFailed { message }
    }

    fn expire_session(&self) {
        tracing::info!("session rejected by api; signing out");
        self.ctx.session.logout();
        self.ctx.notifications.add_notification(SESSION_EXPIRED_MESSAGE, NotificationKind::Warning);
    }

    // =========================================================================
    // ACTIONS
    // =========================================================================

    /// Update a field of the active form.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::NoForm`] when the screen has no form, or the
    /// form's error for an unknown field.
    pub fn set_field(&self, name: &str, value: impl Into<String>) -> Result<(), InputError> {
        match &self.screen {
            Screen::Login(form) => form.set_field(name, value)?,
            Screen::Register(form) => form.set_field(name, value)?,
            Screen::JobForm { form, .. } => form.set_field(name, value)?,
            _ => return Err(InputError::NoForm),
        }
        Ok(())
    }

    /// Start submitting the active form. Validation and the in-flight check
    /// run before this returns; the returned future performs the request.
    /// Returns `None` when the screen has no form.
    #[must_use]
    pub fn submit(&self) -> Option<BoxFuture<'static, AfterSubmit>> {
        let from = self.path.clone();
        match &self.screen {
            Screen::Login(form) => {
                let pending = login_form::submit(form, Arc::clone(&self.ctx.session));
                Some(Box::pin(async move {
                    match pending.await {
                        SubmitOutcome::Succeeded(_) => AfterSubmit::Navigate { from, to: LANDING_PATH.to_owned() },
                        _ => AfterSubmit::Stay,
                    }
                }))
            }
            Screen::Register(form) => {
                let pending = register_form::submit(form, Arc::clone(&self.ctx.session));
                Some(Box::pin(async move {
                    match pending.await {
                        SubmitOutcome::Succeeded(_) => AfterSubmit::Navigate { from, to: LANDING_PATH.to_owned() },
                        _ => AfterSubmit::Stay,
                    }
                }))
            }
            Screen::JobForm { mode, form } => {
                let pending =
                    job_form::submit(form, mode.clone(), Arc::clone(&self.ctx.jobs), self.ctx.session.token());
                Some(Box::pin(async move {
                    match pending.await {
                        SubmitOutcome::Succeeded(job) => AfterSubmit::Navigate { from, to: format!("/jobs/{}", job.id) },
                        SubmitOutcome::Failed(ClientError::Auth { .. }) => AfterSubmit::SessionExpired,
                        _ => AfterSubmit::Stay,
                    }
                }))
            }
            _ => None,
        }
    }

    /// Apply the follow-up of a settled submission.
    pub async fn apply(&mut self, after: AfterSubmit) {
        match after {
            AfterSubmit::Stay => {}
            AfterSubmit::Navigate { from, to } => {
                if self.path == from {
                    self.navigate(&to).await;
                } else {
                    tracing::debug!(%from, current = %self.path, "skipping stale post-submit navigation");
                }
            }
            AfterSubmit::SessionExpired => {
                self.ctx.session.logout();
                self.refresh_route().await;
            }
        }
    }

    /// Delete the job on a details screen, then return to the dashboard.
    /// Returns `false` if nothing was deleted.
    pub async fn delete_current_job(&mut self) -> bool {
        let Screen::JobDetails(page) = &self.screen else {
            return false;
        };
        let page = page.clone();
        let Some(token) = self.ctx.session.token() else {
            self.expire_session();
            self.refresh_route().await;
            return false;
        };

        match page.delete(self.ctx.jobs.as_ref(), &token).await {
            Ok(()) => {
                self.ctx.notifications.add_notification(JOB_DELETED_MESSAGE, NotificationKind::Success);
                self.navigate(LANDING_PATH).await;
                true
            }
            Err(ClientError::Auth { .. }) => {
                self.expire_session();
                self.refresh_route().await;
                false
            }
            Err(err) => {
                tracing::warn!(error = %err, job_id = %page.job.id, "delete failed");
                self.ctx.notifications.add_notification(err.user_message(), NotificationKind::Error);
                false
            }
        }
    }

    pub async fn logout(&mut self) {
        let was_signed_in = self.ctx.session.snapshot().is_authenticated();
        self.ctx.session.logout();
        if was_signed_in {
            self.ctx.notifications.add_notification(LOGGED_OUT_MESSAGE, NotificationKind::Info);
        }
        self.navigate(LOGIN_PATH).await;
    }

    pub fn dismiss(&self, id: u64) -> bool {
        self.ctx.notifications.dismiss(id)
    }

    /// Start, restart, or stop the real-time channel to match the session.
    fn sync_realtime(&mut self) {
        let token = if self.ctx.session.snapshot().is_authenticated() { self.ctx.session.token() } else { None };
        let current = self.realtime.as_ref().map(|(t, _)| t.as_str());
        if token.as_deref() == current {
            return;
        }

        if let Some((_, handle)) = self.realtime.take() {
            tracing::info!("stopping realtime channel");
            handle.stop();
            self.ctx.notifications.set_connection_error(false);
        }
        let (Some(token), Some(url)) = (token, self.ctx.config.realtime_url()) else {
            return;
        };
        let handle = realtime::spawn(&url, &token, self.ctx.notifications.clone());
        self.realtime = Some((token, handle));
    }

    #[must_use]
    pub fn realtime_active(&self) -> bool {
        self.realtime.is_some()
    }

    /// Stop background work ahead of exit.
    pub fn shutdown(&mut self) {
        if let Some((_, handle)) = self.realtime.take() {
            handle.stop();
        }
    }

    // =========================================================================
    // RENDERING
    // =========================================================================

    /// Render the current screen followed by the live toasts.
    #[must_use]
    pub fn render(&self) -> String {
        let route = Route::parse(&self.path);
        let content = match &self.screen {
            Screen::Loading => layout::loading(),
            Screen::Login(form) => login_page::render(&form.snapshot()),
            Screen::Register(form) => register_page::render(&form.snapshot()),
            Screen::NotFound(path) => layout::not_found(path),
            Screen::Dashboard(page) => self.in_shell(&route, page.render()),
            Screen::JobDetails(page) => self.in_shell(&route, page.render()),
            Screen::JobForm { mode, form } => self.in_shell(&route, job_form_page::render(mode, &form.snapshot())),
            Screen::LoadFailed { message } => {
                self.in_shell(&route, vec![format!("! {message}"), "`refresh` to try again".to_owned()])
            }
        };

        let mut lines = content;
        let toasts = render_toasts(&self.ctx.notifications.snapshot());
        if !toasts.is_empty() {
            lines.push(String::new());
            lines.extend(toasts);
        }
        lines.join("\n")
    }

    fn in_shell(&self, route: &Route, outlet: Vec<String>) -> Vec<String> {
        match self.ctx.session.user() {
            Some(user) => layout::shell(&user, route, outlet),
            None => outlet,
        }
    }
}
