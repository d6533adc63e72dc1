//! Dashboard listing the user's job applications.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the authenticated landing route. It loads the job list once per
//! visit and summarizes the pipeline by status.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use std::collections::BTreeMap;

use crate::error::ClientError;
use crate::net::api::JobApi;
use crate::net::types::{Job, JobStatus};

/// Loaded dashboard data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardPage {
    pub jobs: Vec<Job>,
}

impl DashboardPage {
    /// Fetch the job list.
    ///
    /// # Errors
    ///
    /// Propagates the API failure as a [`ClientError`].
    pub async fn load(api: &dyn JobApi, token: &str) -> Result<Self, ClientError> {
        let jobs = api.list_jobs(token).await?;
        tracing::debug!(count = jobs.len(), "dashboard loaded");
        Ok(Self { jobs })
    }

    #[must_use]
    pub fn render(&self) -> Vec<String> {
        let mut lines = vec!["Your Applications".to_owned()];
        let counts = status_counts(&self.jobs);
        let summary: Vec<String> = counts
            .iter()
            .map(|(status, count)| format!("{}: {count}", status.label()))
            .collect();
        lines.push(format!("Total: {}  ({})", self.jobs.len(), summary.join(", ")));

        if self.jobs.is_empty() {
            lines.push("No applications yet. `go /jobs/new` to add one.".to_owned());
            return lines;
        }
        lines.extend(self.jobs.iter().map(job_row));
        lines
    }
}

/// Number of jobs per status; every status is present, zero or not.
#[must_use]
pub fn status_counts(jobs: &[Job]) -> BTreeMap<JobStatus, usize> {
    let mut counts: BTreeMap<JobStatus, usize> = JobStatus::ALL.iter().map(|s| (*s, 0)).collect();
    for job in jobs {
        *counts.entry(job.status).or_default() += 1;
    }
    counts
}

fn job_row(job: &Job) -> String {
    let location = job.location.as_deref().map(|l| format!(" @ {l}")).unwrap_or_default();
    format!(
        "  - {} at {}{location} [{}]  (/jobs/{})",
        job.position,
        job.company,
        job.status.label(),
        job.id
    )
}
