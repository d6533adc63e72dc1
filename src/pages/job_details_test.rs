use super::*;
use crate::net::types::JobStatus;
use crate::test_helpers::{STUB_TOKEN, StubApi, job};

#[test]
fn render_aligns_optional_fields_and_lists_actions() {
    let mut record = job("j1", "Acme", JobStatus::Offered);
    record.location = Some("Berlin".to_owned());
    record.notes = Some("Negotiate\nStart in May".to_owned());
    let lines = JobDetailsPage { job: record }.render();
    assert_eq!(lines[0], "Engineer at Acme");
    assert_eq!(lines[1], "  Status:   Offered");
    assert_eq!(lines[2], "  Location: Berlin");
    assert_eq!(lines[4], "    Negotiate");
    assert_eq!(lines.last().map(String::as_str), Some("Actions: `go /jobs/j1/edit` | `delete`"));
}

#[tokio::test]
async fn load_missing_job_is_request_error() {
    let api = StubApi::default();
    let err = JobDetailsPage::load(&api, STUB_TOKEN, "nope").await.unwrap_err();
    assert_eq!(err, ClientError::Request("Job not found".to_owned()));
}

#[tokio::test]
async fn delete_removes_job() {
    let api = StubApi::with_jobs(vec![job("j1", "Acme", JobStatus::Applied)]);
    let page = JobDetailsPage::load(&api, STUB_TOKEN, "j1").await.unwrap();
    page.delete(&api, STUB_TOKEN).await.unwrap();
    assert!(api.jobs.lock().unwrap().is_empty());
}
