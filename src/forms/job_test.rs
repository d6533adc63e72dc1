use super::*;
use crate::forms::FORM_ERROR_KEY;
use crate::state::notifications::NotificationStore;
use crate::test_helpers::{STUB_TOKEN, StubApi, job};
use std::sync::atomic::Ordering;

fn valid_values() -> FieldValues {
    FieldValues::from([
        ("company", "Acme".to_owned()),
        ("position", "Backend Engineer".to_owned()),
        ("status", "interviewing".to_owned()),
        ("location", " ".to_owned()),
        ("job_url", "https://acme.example/jobs/1".to_owned()),
        ("notes", String::new()),
    ])
}

// =============================================================
// validate
// =============================================================

#[test]
fn valid_job_has_no_errors() {
    assert!(JobForm::validate(&valid_values()).is_empty());
}

#[test]
fn company_and_position_are_required() {
    let mut values = valid_values();
    values.insert("company", "  ".to_owned());
    values.insert("position", String::new());
    let errors = JobForm::validate(&values);
    assert_eq!(errors.get("company").map(String::as_str), Some("Company is required"));
    assert_eq!(errors.get("position").map(String::as_str), Some("Position is required"));
}

#[test]
fn unknown_status_lists_allowed_values() {
    let mut values = valid_values();
    values.insert("status", "ghosted".to_owned());
    let errors = JobForm::validate(&values);
    assert_eq!(
        errors.get("status").map(String::as_str),
        Some("Status must be one of: applied, interviewing, offered, rejected")
    );
}

#[test]
fn job_url_must_be_http() {
    let mut values = valid_values();
    values.insert("job_url", "ftp://acme".to_owned());
    assert!(JobForm::validate(&values).contains_key("job_url"));
}

#[test]
fn overlong_company_is_rejected() {
    let mut values = valid_values();
    values.insert("company", "x".repeat(MAX_SHORT_FIELD_LEN + 1));
    assert_eq!(
        JobForm::validate(&values).get("company").map(String::as_str),
        Some("Company must be at most 100 characters")
    );
}

// =============================================================
// draft / prefill
// =============================================================

#[test]
fn draft_from_drops_blank_optionals() {
    let draft = draft_from(&valid_values()).unwrap();
    assert_eq!(draft.status, JobStatus::Interviewing);
    assert!(draft.location.is_none());
    assert!(draft.notes.is_none());
    assert_eq!(draft.job_url.as_deref(), Some("https://acme.example/jobs/1"));
}

#[test]
fn values_from_job_prefills_every_field() {
    let mut existing = job("j1", "Globex", JobStatus::Offered);
    existing.location = Some("Springfield".to_owned());
    let values = values_from_job(&existing);
    assert_eq!(field(&values, "company"), "Globex");
    assert_eq!(field(&values, "status"), "offered");
    assert_eq!(field(&values, "location"), "Springfield");
    assert_eq!(field(&values, "notes"), "");
}

#[test]
fn blank_values_default_status_to_applied() {
    assert_eq!(field(&blank_values(), "status"), "applied");
}

// =============================================================
// submit
// =============================================================

#[tokio::test]
async fn create_mode_posts_new_job() {
    let api = Arc::new(StubApi::default());
    let notifications = NotificationStore::default();
    let form = JobController::with_values(notifications.clone(), valid_values());

    let outcome = submit(&form, JobFormMode::Create, api.clone(), Some(STUB_TOKEN.to_owned())).await;
    let SubmitOutcome::Succeeded(created) = outcome else {
        panic!("expected success, got {outcome:?}");
    };
    assert_eq!(created.company, "Acme");
    assert_eq!(api.jobs.lock().unwrap().len(), 1);
    assert_eq!(notifications.snapshot().items[0].message, JOB_CREATED_MESSAGE);
}

#[tokio::test]
async fn edit_mode_updates_existing_job() {
    let api = Arc::new(StubApi::with_jobs(vec![job("j1", "Globex", JobStatus::Applied)]));
    let notifications = NotificationStore::default();
    let form = JobController::with_values(notifications.clone(), valid_values());

    let outcome = submit(&form, JobFormMode::Edit("j1".to_owned()), api.clone(), Some(STUB_TOKEN.to_owned())).await;
    assert!(outcome.is_success());
    let jobs = api.jobs.lock().unwrap();
    assert_eq!(jobs[0].company, "Acme");
    assert_eq!(jobs[0].status, JobStatus::Interviewing);
    assert_eq!(notifications.snapshot().items[0].message, JOB_UPDATED_MESSAGE);
}

#[tokio::test]
async fn missing_token_fails_without_request() {
    let api = Arc::new(StubApi::default());
    let notifications = NotificationStore::default();
    let form = JobController::with_values(notifications, valid_values());

    let outcome = submit(&form, JobFormMode::Create, api.clone(), None).await;
    assert!(matches!(outcome, SubmitOutcome::Failed(ClientError::Auth { .. })));
    assert_eq!(form.snapshot().error(FORM_ERROR_KEY), Some(SESSION_EXPIRED_MESSAGE));
    assert_eq!(api.job_writes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn invalid_job_makes_no_request() {
    let api = Arc::new(StubApi::default());
    let form = JobController::new(NotificationStore::default());

    let outcome = submit(&form, JobFormMode::Create, api.clone(), Some(STUB_TOKEN.to_owned())).await;
    assert!(matches!(outcome, SubmitOutcome::Invalid(_)));
    assert_eq!(api.job_writes.load(Ordering::SeqCst), 0);
}
