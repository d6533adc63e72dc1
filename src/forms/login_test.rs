use super::*;
use crate::error::{INVALID_CREDENTIALS_MESSAGE, NETWORK_ERROR_MESSAGE};
use crate::forms::FORM_ERROR_KEY;
use crate::state::notifications::{NotificationKind, NotificationStore};
use crate::state::token::MemoryTokenStorage;
use crate::test_helpers::{STUB_EMAIL, STUB_PASSWORD, StubApi, stub_user};
use std::sync::atomic::Ordering;

fn values(email: &str, password: &str) -> FieldValues {
    FieldValues::from([("email", email.to_owned()), ("password", password.to_owned())])
}

fn fixture() -> (Arc<StubApi>, Arc<SessionStore>, NotificationStore) {
    let api = Arc::new(StubApi::default());
    let session = Arc::new(SessionStore::new(api.clone(), Arc::new(MemoryTokenStorage::default())));
    (api, session, NotificationStore::default())
}

fn filled(notifications: &NotificationStore, email: &str, password: &str) -> LoginController {
    LoginController::with_values(notifications.clone(), values(email, password))
}

// =============================================================
// validate
// =============================================================

#[test]
fn empty_fields_are_required() {
    let errors = LoginForm::validate(&values("", ""));
    assert_eq!(errors.get("email").map(String::as_str), Some("Email is required"));
    assert_eq!(errors.get("password").map(String::as_str), Some("Password is required"));
}

#[test]
fn malformed_emails_are_invalid() {
    for email in ["plainaddress", "@example.com", "user@", "user@domain", "user@.com", "user@domain.", "a @b.c"] {
        let errors = LoginForm::validate(&values(email, "secret1"));
        assert_eq!(errors.get("email").map(String::as_str), Some("Email is invalid"), "{email}");
    }
}

#[test]
fn well_formed_email_passes() {
    let errors = LoginForm::validate(&values("ada@example.com", "secret1"));
    assert!(errors.is_empty());
}

#[test]
fn short_password_is_rejected() {
    for password in ["a", "12345"] {
        let errors = LoginForm::validate(&values("ada@example.com", password));
        assert_eq!(
            errors.get("password").map(String::as_str),
            Some("Password must be at least 6 characters")
        );
    }
}

// =============================================================
// submit
// =============================================================

#[tokio::test]
async fn invalid_email_makes_no_network_call() {
    let (api, session, notifications) = fixture();
    let form = filled(&notifications, "not-an-email", STUB_PASSWORD);

    let outcome = submit(&form, session).await;
    assert!(matches!(outcome, SubmitOutcome::Invalid(ref e) if e.contains_key("email")));
    assert_eq!(api.login_calls.load(Ordering::SeqCst), 0);
    assert!(notifications.snapshot().items.is_empty());
    assert!(!form.is_submitting());
}

#[tokio::test]
async fn successful_login_sets_user_and_adds_one_success_toast() {
    let (_api, session, notifications) = fixture();
    let form = filled(&notifications, STUB_EMAIL, STUB_PASSWORD);

    let outcome = submit(&form, session.clone()).await;
    assert_eq!(outcome, SubmitOutcome::Succeeded(stub_user()));
    assert_eq!(session.user(), Some(stub_user()));

    let toasts = notifications.snapshot().items;
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].kind, NotificationKind::Success);
    assert_eq!(toasts[0].message, LOGIN_SUCCESS_MESSAGE);
    assert!(form.snapshot().errors.is_empty());
    assert!(!form.is_submitting());
}

#[tokio::test]
async fn rejected_credentials_show_localized_message() {
    let (_api, session, notifications) = fixture();
    let form = filled(&notifications, STUB_EMAIL, "wrong-password");

    let outcome = submit(&form, session.clone()).await;
    assert!(matches!(outcome, SubmitOutcome::Failed(_)));
    assert!(session.user().is_none());

    let state = form.snapshot();
    assert_eq!(state.error(FORM_ERROR_KEY), Some(INVALID_CREDENTIALS_MESSAGE));
    assert!(!state.submitting);
    assert_eq!(state.value("email"), STUB_EMAIL);

    let toasts = notifications.snapshot().items;
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].kind, NotificationKind::Error);
    assert_eq!(toasts[0].message, INVALID_CREDENTIALS_MESSAGE);
}

#[tokio::test]
async fn network_failure_keeps_values_for_retry() {
    let (api, session, notifications) = fixture();
    api.set_offline(true);
    let form = filled(&notifications, STUB_EMAIL, STUB_PASSWORD);

    let outcome = submit(&form, session).await;
    assert!(matches!(outcome, SubmitOutcome::Failed(_)));
    let state = form.snapshot();
    assert_eq!(state.form_error(), Some(NETWORK_ERROR_MESSAGE));
    assert_eq!(state.value("password"), STUB_PASSWORD);
}
