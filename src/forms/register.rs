//! Registration form: name, email, password, and confirmation.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use std::future::Future;
use std::sync::Arc;

use super::{FieldErrors, FieldValues, FormController, FormSpec, SubmitOutcome, check_email, check_password, field};
use crate::net::types::{RegisterRequest, UserSummary};
use crate::state::session::SessionStore;

pub const REGISTER_SUCCESS_MESSAGE: &str = "Account created successfully! Welcome aboard.";
pub const MIN_NAME_LEN: usize = 2;

pub struct RegisterForm;

impl FormSpec for RegisterForm {
    const FIELDS: &'static [&'static str] = &["name", "email", "password", "confirm_password"];

    fn validate(values: &FieldValues) -> FieldErrors {
        let mut errors = FieldErrors::new();

        let name = field(values, "name").trim();
        if name.is_empty() {
            errors.insert("name", "Name is required".to_owned());
        } else if name.chars().count() < MIN_NAME_LEN {
            errors.insert("name", format!("Name must be at least {MIN_NAME_LEN} characters"));
        }

        check_email(values, &mut errors);
        check_password(values, &mut errors);

        let confirm = field(values, "confirm_password");
        if confirm.is_empty() {
            errors.insert("confirm_password", "Please confirm your password".to_owned());
        } else if confirm != field(values, "password") {
            errors.insert("confirm_password", "Passwords do not match".to_owned());
        }

        errors
    }
}

pub type RegisterController = FormController<RegisterForm>;

/// Build the API request from validated field values.
#[must_use]
pub fn request_from(values: &FieldValues) -> RegisterRequest {
    RegisterRequest {
        name: field(values, "name").trim().to_owned(),
        email: field(values, "email").trim().to_owned(),
        password: field(values, "password").to_owned(),
    }
}

/// Submit the registration form against the session store.
pub fn submit(
    form: &RegisterController,
    session: Arc<SessionStore>,
) -> impl Future<Output = SubmitOutcome<UserSummary>> + Send + 'static {
    form.submit(REGISTER_SUCCESS_MESSAGE, move |values| async move {
        session.register(&request_from(&values)).await
    })
}
