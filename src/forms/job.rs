//! Job create/edit form.
//!
//! SYSTEM CONTEXT
//! ==============
//! Rendered at `/jobs/new` (create) and `/jobs/:id/edit` (edit, prefilled
//! from the existing record). Both modes share one field set and one rule set.

#[cfg(test)]
#[path = "job_test.rs"]
mod job_test;

use std::future::Future;
use std::sync::Arc;

use super::{FieldErrors, FieldValues, FormController, FormSpec, SubmitOutcome, field};
use crate::error::ClientError;
use crate::net::api::JobApi;
use crate::net::types::{Job, JobDraft, JobStatus};

pub const JOB_CREATED_MESSAGE: &str = "Job application added successfully.";
pub const JOB_UPDATED_MESSAGE: &str = "Job application updated successfully.";
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";

pub const MAX_SHORT_FIELD_LEN: usize = 100;
pub const MAX_NOTES_LEN: usize = 2000;

pub struct JobForm;

impl FormSpec for JobForm {
    const FIELDS: &'static [&'static str] = &["company", "position", "status", "location", "job_url", "notes"];

    fn validate(values: &FieldValues) -> FieldErrors {
        let mut errors = FieldErrors::new();
        check_short_field(values, "company", "Company", true, &mut errors);
        check_short_field(values, "position", "Position", true, &mut errors);
        check_short_field(values, "location", "Location", false, &mut errors);

        let status = field(values, "status");
        if status.trim().is_empty() {
            errors.insert("status", "Status is required".to_owned());
        } else if status.parse::<JobStatus>().is_err() {
            let allowed: Vec<&str> = JobStatus::ALL.iter().map(|s| s.as_str()).collect();
            errors.insert("status", format!("Status must be one of: {}", allowed.join(", ")));
        }

        let url = field(values, "job_url").trim();
        if !url.is_empty() && !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.insert("job_url", "Job URL must start with http:// or https://".to_owned());
        }

        if field(values, "notes").chars().count() > MAX_NOTES_LEN {
            errors.insert("notes", format!("Notes must be at most {MAX_NOTES_LEN} characters"));
        }
        errors
    }
}

fn check_short_field(
    values: &FieldValues,
    name: &'static str,
    label: &str,
    required: bool,
    errors: &mut FieldErrors,
) {
    let value = field(values, name).trim();
    if required && value.is_empty() {
        errors.insert(name, format!("{label} is required"));
    } else if value.chars().count() > MAX_SHORT_FIELD_LEN {
        errors.insert(name, format!("{label} must be at most {MAX_SHORT_FIELD_LEN} characters"));
    }
}

pub type JobController = FormController<JobForm>;

/// Whether the form creates a new job or edits an existing one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JobFormMode {
    Create,
    Edit(String),
}

impl JobFormMode {
    #[must_use]
    pub fn success_message(&self) -> &'static str {
        match self {
            Self::Create => JOB_CREATED_MESSAGE,
            Self::Edit(_) => JOB_UPDATED_MESSAGE,
        }
    }
}

/// Initial values for a new job.
#[must_use]
pub fn blank_values() -> FieldValues {
    FieldValues::from([("status", JobStatus::Applied.as_str().to_owned())])
}

/// Values prefilled from an existing job.
#[must_use]
pub fn values_from_job(job: &Job) -> FieldValues {
    FieldValues::from([
        ("company", job.company.clone()),
        ("position", job.position.clone()),
        ("status", job.status.as_str().to_owned()),
        ("location", job.location.clone().unwrap_or_default()),
        ("job_url", job.job_url.clone().unwrap_or_default()),
        ("notes", job.notes.clone().unwrap_or_default()),
    ])
}

fn optional(values: &FieldValues, name: &str) -> Option<String> {
    let value = field(values, name).trim();
    (!value.is_empty()).then(|| value.to_owned())
}

/// Build the API payload from validated field values.
///
/// # Errors
///
/// Returns [`ClientError::Validation`] if the status does not parse (only
/// reachable when called with unvalidated values).
pub fn draft_from(values: &FieldValues) -> Result<JobDraft, ClientError> {
    let status = field(values, "status").parse::<JobStatus>().map_err(|e| {
        ClientError::Validation(FieldErrors::from([("status", e.to_string())]))
    })?;
    Ok(JobDraft {
        company: field(values, "company").trim().to_owned(),
        position: field(values, "position").trim().to_owned(),
        status,
        location: optional(values, "location"),
        job_url: optional(values, "job_url"),
        notes: optional(values, "notes"),
    })
}

/// Submit the job form, creating or updating per `mode`.
pub fn submit(
    form: &JobController,
    mode: JobFormMode,
    jobs: Arc<dyn JobApi>,
    token: Option<String>,
) -> impl Future<Output = SubmitOutcome<Job>> + Send + 'static {
    let success_message = mode.success_message();
    form.submit(success_message, move |values| async move {
        let token = token.ok_or_else(|| ClientError::Auth { reason: SESSION_EXPIRED_MESSAGE.to_owned() })?;
        let draft = draft_from(&values)?;
        let job = match &mode {
            JobFormMode::Create => jobs.create_job(&token, &draft).await?,
            JobFormMode::Edit(id) => jobs.update_job(&token, id, &draft).await?,
        };
        tracing::info!(job_id = %job.id, "job saved");
        Ok::<Job, ClientError>(job)
    })
}
