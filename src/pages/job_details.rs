//! Single job view with edit and delete actions.

#[cfg(test)]
#[path = "job_details_test.rs"]
mod job_details_test;

use crate::error::ClientError;
use crate::net::api::JobApi;
use crate::net::types::Job;

pub const JOB_DELETED_MESSAGE: &str = "Job application deleted.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobDetailsPage {
    pub job: Job,
}

impl JobDetailsPage {
    /// Fetch job `id`.
    ///
    /// # Errors
    ///
    /// Propagates the API failure (e.g. not found) as a [`ClientError`].
    pub async fn load(api: &dyn JobApi, token: &str, id: &str) -> Result<Self, ClientError> {
        let job = api.get_job(token, id).await?;
        Ok(Self { job })
    }

    /// Delete the displayed job.
    ///
    /// # Errors
    ///
    /// Propagates the API failure as a [`ClientError`].
    pub async fn delete(&self, api: &dyn JobApi, token: &str) -> Result<(), ClientError> {
        api.delete_job(token, &self.job.id).await?;
        tracing::info!(job_id = %self.job.id, "job deleted");
        Ok(())
    }

    #[must_use]
    pub fn render(&self) -> Vec<String> {
        let job = &self.job;
        let mut lines = vec![
            format!("{} at {}", job.position, job.company),
            format!("  Status:   {}", job.status.label()),
        ];
        let optional = [
            ("Location", job.location.as_deref()),
            ("Posting", job.job_url.as_deref()),
            ("Added", job.created_at.as_deref()),
            ("Updated", job.updated_at.as_deref()),
        ];
        for (label, value) in optional {
            if let Some(value) = value {
                lines.push(format!("  {label}:{}{value}", " ".repeat(9 - label.len())));
            }
        }
        if let Some(notes) = job.notes.as_deref() {
            lines.push("  Notes:".to_owned());
            lines.extend(notes.lines().map(|l| format!("    {l}")));
        }
        lines.push(format!("Actions: `go /jobs/{}/edit` | `delete`", job.id));
        lines
    }
}
