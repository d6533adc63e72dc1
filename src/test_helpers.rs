//! In-memory API stub and fixtures shared by unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::net::api::{ApiError, AuthApi, JobApi};
use crate::net::types::{AuthResponse, Job, JobDraft, JobStatus, LoginRequest, RegisterRequest, UserSummary};

pub const STUB_EMAIL: &str = "ada@example.com";
pub const STUB_PASSWORD: &str = "secret-pass";
pub const STUB_TOKEN: &str = "stub-token";
pub const TAKEN_EMAIL: &str = "taken@example.com";

#[must_use]
pub fn stub_user() -> UserSummary {
    UserSummary { id: "u-1".to_owned(), email: STUB_EMAIL.to_owned(), display_name: "Ada".to_owned() }
}

#[must_use]
pub fn job(id: &str, company: &str, status: JobStatus) -> Job {
    Job {
        id: id.to_owned(),
        company: company.to_owned(),
        position: "Engineer".to_owned(),
        status,
        location: None,
        job_url: None,
        notes: None,
        created_at: None,
        updated_at: None,
    }
}

/// Auth + job API double: accepts [`STUB_EMAIL`]/[`STUB_PASSWORD`] and
/// issues [`STUB_TOKEN`].
#[derive(Default)]
pub struct StubApi {
    pub jobs: Mutex<Vec<Job>>,
    pub login_calls: AtomicUsize,
    pub register_calls: AtomicUsize,
    pub job_writes: AtomicUsize,
    pub offline: AtomicBool,
    next_job: AtomicUsize,
}

impl StubApi {
    #[must_use]
    pub fn with_jobs(jobs: Vec<Job>) -> Self {
        Self { jobs: Mutex::new(jobs), ..Self::default() }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), ApiError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ApiError::Network("connection refused".to_owned()));
        }
        Ok(())
    }

    fn check_token(&self, token: &str) -> Result<(), ApiError> {
        self.check_online()?;
        if token == STUB_TOKEN {
            Ok(())
        } else {
            Err(ApiError::Unauthorized { message: "Invalid token".to_owned() })
        }
    }

    fn not_found() -> ApiError {
        ApiError::Rejected { status: 404, message: "Job not found".to_owned() }
    }
}

#[async_trait::async_trait]
impl AuthApi for StubApi {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        if request.email == STUB_EMAIL && request.password == STUB_PASSWORD {
            Ok(AuthResponse { user: stub_user(), token: STUB_TOKEN.to_owned() })
        } else {
            Err(ApiError::Unauthorized { message: "Invalid email or password".to_owned() })
        }
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        if request.email == TAKEN_EMAIL {
            return Err(ApiError::Rejected { status: 409, message: "User already exists".to_owned() });
        }
        let user = UserSummary { id: "u-2".to_owned(), email: request.email.clone(), display_name: request.name.clone() };
        Ok(AuthResponse { user, token: STUB_TOKEN.to_owned() })
    }

    async fn current_user(&self, token: &str) -> Result<UserSummary, ApiError> {
        self.check_token(token)?;
        Ok(stub_user())
    }
}

#[async_trait::async_trait]
impl JobApi for StubApi {
    async fn list_jobs(&self, token: &str) -> Result<Vec<Job>, ApiError> {
        self.check_token(token)?;
        Ok(self.jobs.lock().unwrap().clone())
    }

    async fn get_job(&self, token: &str, id: &str) -> Result<Job, ApiError> {
        self.check_token(token)?;
        self.jobs
            .lock()
            .unwrap()
            .iter()
            .find(|j| j.id == id)
            .cloned()
            .ok_or_else(Self::not_found)
    }

    async fn create_job(&self, token: &str, draft: &JobDraft) -> Result<Job, ApiError> {
        self.check_token(token)?;
        self.job_writes.fetch_add(1, Ordering::SeqCst);
        let n = self.next_job.fetch_add(1, Ordering::SeqCst) + 1;
        let mut created = job(&format!("new-{n}"), &draft.company, draft.status);
        created.position.clone_from(&draft.position);
        created.location.clone_from(&draft.location);
        created.job_url.clone_from(&draft.job_url);
        created.notes.clone_from(&draft.notes);
        self.jobs.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_job(&self, token: &str, id: &str, draft: &JobDraft) -> Result<Job, ApiError> {
        self.check_token(token)?;
        self.job_writes.fetch_add(1, Ordering::SeqCst);
        let mut jobs = self.jobs.lock().unwrap();
        let existing = jobs.iter_mut().find(|j| j.id == id).ok_or_else(Self::not_found)?;
        existing.company.clone_from(&draft.company);
        existing.position.clone_from(&draft.position);
        existing.status = draft.status;
        existing.location.clone_from(&draft.location);
        existing.job_url.clone_from(&draft.job_url);
        existing.notes.clone_from(&draft.notes);
        Ok(existing.clone())
    }

    async fn delete_job(&self, token: &str, id: &str) -> Result<(), ApiError> {
        self.check_token(token)?;
        let mut jobs = self.jobs.lock().unwrap();
        let before = jobs.len();
        jobs.retain(|j| j.id != id);
        if jobs.len() == before {
            return Err(Self::not_found());
        }
        Ok(())
    }
}
