//! Form controllers: field state, validation, and submission orchestration.
//!
//! DESIGN
//! ======
//! Each form is a [`FormSpec`] (its field set plus a pure `validate`) driven
//! by the generic [`FormController`]. The controller owns the `submitting`
//! flag that serializes submissions, runs the store/API operation, and routes
//! the outcome into inline errors and toasts.
//!
//! The future returned by [`FormController::submit`] holds only a weak handle
//! to the form, so a screen may be discarded while its request is in flight;
//! settlement then updates nothing but the notification queue.

pub mod job;
pub mod login;
pub mod register;

#[cfg(test)]
#[path = "form_test.rs"]
mod form_test;

use std::collections::BTreeMap;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::error::ClientError;
use crate::state::notifications::{NotificationKind, NotificationStore};

/// Key of the form-level (non-field) error.
pub const FORM_ERROR_KEY: &str = "form";

/// Field name → current value.
pub type FieldValues = BTreeMap<&'static str, String>;

/// Field name (or [`FORM_ERROR_KEY`]) → error message.
pub type FieldErrors = BTreeMap<&'static str, String>;

/// Value of `name` in `values`, or `""` when absent.
#[must_use]
pub fn field<'a>(values: &'a FieldValues, name: &str) -> &'a str {
    values.get(name).map_or("", String::as_str)
}

/// Field set and validation rules of one form.
pub trait FormSpec: 'static {
    /// Field names in display order.
    const FIELDS: &'static [&'static str];

    /// Validate every field. Pure; absent keys mean "no error".
    fn validate(values: &FieldValues) -> FieldErrors;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("unknown field `{0}`")]
    UnknownField(String),
}

/// Snapshot of one form's fields, errors, and submission flag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormState {
    pub fields: FieldValues,
    pub errors: FieldErrors,
    pub submitting: bool,
}

impl FormState {
    #[must_use]
    pub fn value(&self, name: &str) -> &str {
        field(&self.fields, name)
    }

    #[must_use]
    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn form_error(&self) -> Option<&str> {
        self.error(FORM_ERROR_KEY)
    }
}

/// How a submission attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome<T> {
    /// Validation failed; no request was made.
    Invalid(FieldErrors),
    /// A submission from this form is already in flight.
    Busy,
    Succeeded(T),
    Failed(ClientError),
}

impl<T> SubmitOutcome<T> {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }
}

enum Refusal {
    Busy,
    Invalid(FieldErrors),
}

/// Validation + submission controller bound to one form instance.
pub struct FormController<S: FormSpec> {
    state: Arc<Mutex<FormState>>,
    notifications: NotificationStore,
    _spec: PhantomData<fn() -> S>,
}

impl<S: FormSpec> FormController<S> {
    /// Empty form.
    #[must_use]
    pub fn new(notifications: NotificationStore) -> Self {
        Self::with_values(notifications, FieldValues::new())
    }

    /// Form prefilled with `values`; unknown keys are dropped, missing ones
    /// start empty.
    #[must_use]
    pub fn with_values(notifications: NotificationStore, values: FieldValues) -> Self {
        let fields = S::FIELDS
            .iter()
            .map(|&name| (name, values.get(name).cloned().unwrap_or_default()))
            .collect();
        let state = FormState { fields, ..FormState::default() };
        Self { state: Arc::new(Mutex::new(state)), notifications, _spec: PhantomData }
    }

    fn lock(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn snapshot(&self) -> FormState {
        self.lock().clone()
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.lock().submitting
    }

    /// Update one field. If the field currently shows an error, it is
    /// re-validated on its own so a corrected value clears immediately.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownField`] if `name` is not part of this form.
    pub fn set_field(&self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        let key = S::FIELDS
            .iter()
            .copied()
            .find(|f| *f == name)
            .ok_or_else(|| FormError::UnknownField(name.to_owned()))?;

        let mut state = self.lock();
        state.fields.insert(key, value.into());
        if state.errors.contains_key(key) {
            match S::validate(&state.fields).remove(key) {
                Some(message) => state.errors.insert(key, message),
                None => state.errors.remove(key),
            };
        }
        Ok(())
    }

    /// Recompute all errors from the current fields. Returns `true` if valid.
    pub fn validate(&self) -> bool {
        let mut state = self.lock();
        state.errors = S::validate(&state.fields);
        state.errors.is_empty()
    }

    fn begin(&self) -> Result<FieldValues, Refusal> {
        let mut state = self.lock();
        if state.submitting {
            return Err(Refusal::Busy);
        }
        state.errors = S::validate(&state.fields);
        if !state.errors.is_empty() {
            return Err(Refusal::Invalid(state.errors.clone()));
        }
        state.submitting = true;
        Ok(state.fields.clone())
    }

    /// Validate and, if valid, run `op` with the field values.
    ///
    /// Validation and the in-flight check happen synchronously, before this
    /// returns; the returned future performs the request and settles the
    /// form. On success `success_message` is toasted; on failure the
    /// translated error becomes both the form-level error and an error toast.
    pub fn submit<T, F, Fut>(
        &self,
        success_message: impl Into<String>,
        op: F,
    ) -> impl Future<Output = SubmitOutcome<T>> + Send + 'static
    where
        T: Send + 'static,
        F: FnOnce(FieldValues) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, ClientError>> + Send + 'static,
    {
        let begun = self.begin();
        let form: Weak<Mutex<FormState>> = Arc::downgrade(&self.state);
        let notifications = self.notifications.clone();
        let success_message = success_message.into();

        async move {
            let values = match begun {
                Ok(values) => values,
                Err(Refusal::Busy) => return SubmitOutcome::Busy,
                Err(Refusal::Invalid(errors)) => return SubmitOutcome::Invalid(errors),
            };

            let result = op(values).await;
            let form = form.upgrade();
            if form.is_none() {
                tracing::debug!("form discarded before submission settled");
            }
            let settle = |errors: FieldErrors| {
                if let Some(form) = &form {
                    let mut state = form.lock().unwrap_or_else(PoisonError::into_inner);
                    state.errors = errors;
                    state.submitting = false;
                }
            };

            match result {
                Ok(value) => {
                    settle(FieldErrors::new());
                    notifications.add_notification(success_message, NotificationKind::Success);
                    SubmitOutcome::Succeeded(value)
                }
                Err(err) => {
                    let message = err.user_message();
                    tracing::info!(error = %err, "form submission failed");
                    settle(FieldErrors::from([(FORM_ERROR_KEY, message.clone())]));
                    notifications.add_notification(message, NotificationKind::Error);
                    SubmitOutcome::Failed(err)
                }
            }
        }
    }
}

// =============================================================================
// SHARED RULES
// =============================================================================

/// True when `value` contains a `local@domain.tld` shaped run: non-blank
/// text, `@`, non-blank text, `.`, non-blank text.
#[must_use]
pub fn is_email_shaped(value: &str) -> bool {
    let chars: Vec<char> = value.chars().collect();
    chars.iter().enumerate().any(|(at, &c)| {
        if c != '@' || at == 0 || chars[at - 1].is_whitespace() {
            return false;
        }
        let domain = chars[at + 1..]
            .iter()
            .take_while(|c| !c.is_whitespace())
            .collect::<Vec<_>>();
        domain
            .iter()
            .enumerate()
            .any(|(i, &&d)| d == '.' && i > 0 && i + 1 < domain.len())
    })
}

/// Shared email rule used by the login and register forms.
pub(crate) fn check_email(values: &FieldValues, errors: &mut FieldErrors) {
    let email = field(values, "email");
    if email.trim().is_empty() {
        errors.insert("email", "Email is required".to_owned());
    } else if !is_email_shaped(email) {
        errors.insert("email", "Email is invalid".to_owned());
    }
}

pub const MIN_PASSWORD_LEN: usize = 6;

/// Shared password rule used by the login and register forms.
pub(crate) fn check_password(values: &FieldValues, errors: &mut FieldErrors) {
    let password = field(values, "password");
    if password.is_empty() {
        errors.insert("password", "Password is required".to_owned());
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.insert("password", format!("Password must be at least {MIN_PASSWORD_LEN} characters"));
    }
}
