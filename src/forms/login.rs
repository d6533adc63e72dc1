//! Login form: email + password.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use std::future::Future;
use std::sync::Arc;

use super::{FieldErrors, FieldValues, FormController, FormSpec, SubmitOutcome, check_email, check_password, field};
use crate::net::types::UserSummary;
use crate::state::session::SessionStore;

pub const LOGIN_SUCCESS_MESSAGE: &str = "Welcome back! You have successfully logged in.";

pub struct LoginForm;

impl FormSpec for LoginForm {
    const FIELDS: &'static [&'static str] = &["email", "password"];

    fn validate(values: &FieldValues) -> FieldErrors {
        let mut errors = FieldErrors::new();
        check_email(values, &mut errors);
        check_password(values, &mut errors);
        errors
    }
}

pub type LoginController = FormController<LoginForm>;

/// Submit the login form against the session store.
pub fn submit(
    form: &LoginController,
    session: Arc<SessionStore>,
) -> impl Future<Output = SubmitOutcome<UserSummary>> + Send + 'static {
    form.submit(LOGIN_SUCCESS_MESSAGE, move |values| async move {
        session
            .login(field(&values, "email").trim(), field(&values, "password"))
            .await
    })
}
