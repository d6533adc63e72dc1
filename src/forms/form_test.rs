use super::*;
use crate::forms::login::LoginForm;
use tokio::sync::oneshot;

fn controller(notifications: &NotificationStore) -> FormController<LoginForm> {
    FormController::new(notifications.clone())
}

// =============================================================
// is_email_shaped
// =============================================================

#[test]
fn email_shape_accepts_common_addresses() {
    assert!(is_email_shaped("a@b.co"));
    assert!(is_email_shaped("first.last+tag@sub.example.org"));
}

#[test]
fn email_shape_rejects_missing_parts() {
    assert!(!is_email_shaped(""));
    assert!(!is_email_shaped("a@b"));
    assert!(!is_email_shaped("a@b c.d"));
}

// =============================================================
// field editing
// =============================================================

#[test]
fn new_form_has_every_field_empty() {
    let form = controller(&NotificationStore::default());
    let state = form.snapshot();
    assert_eq!(state.fields.len(), 2);
    assert_eq!(state.value("email"), "");
    assert!(!state.submitting);
}

#[test]
fn set_field_rejects_unknown_names() {
    let form = controller(&NotificationStore::default());
    assert_eq!(form.set_field("username", "x"), Err(FormError::UnknownField("username".to_owned())));
}

#[test]
fn editing_an_errored_field_revalidates_only_that_field() {
    let form = controller(&NotificationStore::default());
    assert!(!form.validate());
    assert!(form.snapshot().error("email").is_some());
    assert!(form.snapshot().error("password").is_some());

    form.set_field("email", "ada@example.com").unwrap();
    let state = form.snapshot();
    assert!(state.error("email").is_none());
    assert_eq!(state.error("password"), Some("Password is required"));
}

#[test]
fn editing_an_errored_field_updates_its_message() {
    let form = controller(&NotificationStore::default());
    form.validate();
    form.set_field("email", "nope").unwrap();
    assert_eq!(form.snapshot().error("email"), Some("Email is invalid"));
}

#[test]
fn editing_a_clean_field_does_not_validate_it() {
    let form = controller(&NotificationStore::default());
    form.set_field("email", "nope").unwrap();
    assert!(form.snapshot().errors.is_empty());
}

#[test]
fn with_values_drops_unknown_keys() {
    let values = FieldValues::from([("email", "a@b.co".to_owned()), ("bogus", "x".to_owned())]);
    let form = FormController::<LoginForm>::with_values(NotificationStore::default(), values);
    let state = form.snapshot();
    assert_eq!(state.value("email"), "a@b.co");
    assert!(!state.fields.contains_key("bogus"));
}

// =============================================================
// submission lifecycle
// =============================================================

fn fill(form: &FormController<LoginForm>) {
    form.set_field("email", "ada@example.com").unwrap();
    form.set_field("password", "secret1").unwrap();
}

#[tokio::test]
async fn second_submit_while_in_flight_is_busy() {
    let notifications = NotificationStore::default();
    let form = controller(&notifications);
    fill(&form);

    let (release, gate) = oneshot::channel::<()>();
    let first = form.submit("ok", move |_| async move {
        let _ = gate.await;
        Ok::<_, ClientError>(1)
    });
    assert!(form.is_submitting());

    let second = form.submit("ok", |_| async { Ok::<_, ClientError>(2) }).await;
    assert_eq!(second, SubmitOutcome::Busy);

    release.send(()).unwrap();
    assert_eq!(first.await, SubmitOutcome::Succeeded(1));
    assert!(!form.is_submitting());
    assert_eq!(notifications.snapshot().items.len(), 1);
}

#[tokio::test]
async fn failure_sets_form_error_and_clears_submitting() {
    let notifications = NotificationStore::default();
    let form = controller(&notifications);
    fill(&form);

    let outcome = form
        .submit("ok", |_| async { Err::<(), _>(ClientError::Request("Server is busy".to_owned())) })
        .await;
    assert!(matches!(outcome, SubmitOutcome::Failed(_)));
    let state = form.snapshot();
    assert_eq!(state.form_error(), Some("Server is busy"));
    assert!(!state.submitting);
}

#[tokio::test]
async fn success_clears_previous_form_error() {
    let notifications = NotificationStore::default();
    let form = controller(&notifications);
    fill(&form);

    let _ = form
        .submit("ok", |_| async { Err::<(), _>(ClientError::Request("nope".to_owned())) })
        .await;
    let outcome = form.submit("ok", |_| async { Ok::<_, ClientError>(()) }).await;
    assert!(outcome.is_success());
    assert!(form.snapshot().errors.is_empty());
}

#[tokio::test]
async fn discarded_form_settles_without_panicking() {
    let notifications = NotificationStore::default();
    let form = controller(&notifications);
    fill(&form);

    let (release, gate) = oneshot::channel::<()>();
    let pending = form.submit("saved", move |_| async move {
        let _ = gate.await;
        Ok::<_, ClientError>(())
    });
    drop(form);
    release.send(()).unwrap();

    assert!(pending.await.is_success());
    assert_eq!(notifications.snapshot().items[0].message, "saved");
}

#[tokio::test]
async fn op_receives_current_field_values() {
    let form = controller(&NotificationStore::default());
    fill(&form);
    let outcome = form
        .submit("ok", |values| async move { Ok::<_, ClientError>(field(&values, "email").to_owned()) })
        .await;
    assert_eq!(outcome, SubmitOutcome::Succeeded("ada@example.com".to_owned()));
}
