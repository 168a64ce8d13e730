use log::info;

use crate::error::Result;

use super::api::GitLabApi;
use super::types::{Job, JobAction, JobStatus};

/// What to do with a job given its current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    /// Already queued or running
    Nothing,
    Invoke(JobAction),
}

impl LifecycleAction {
    pub fn for_status(status: &JobStatus) -> Self {
        match status {
            status if status.is_in_flight() => Self::Nothing,
            JobStatus::Manual => Self::Invoke(JobAction::Play),
            _ => Self::Invoke(JobAction::Retry),
        }
    }
}

/// Play a manual job, retry a finished one, leave an in-flight one alone.
///
/// Returns the job record produced by the remote action, or `None` when the
/// job was already pending or running. Remote failures (for example a job
/// that is not retryable) are returned as-is.
pub async fn dispatch_job_action<A: GitLabApi>(
    api: &A,
    project: &str,
    job: &Job,
) -> Result<Option<Job>> {
    match LifecycleAction::for_status(&job.status) {
        LifecycleAction::Nothing => {
            info!("Job {} ({}) is already {}", job.id, job.name, job.status);
            Ok(None)
        }
        LifecycleAction::Invoke(action) => {
            info!("Job {} ({}) is {}, sending {action}", job.id, job.name, job.status);
            let updated = api.job_action(project, job.id, action).await?;
            Ok(Some(updated))
        }
    }
}
