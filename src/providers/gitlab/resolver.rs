use crate::error::{LabCiError, Result};

use super::types::{Job, JobStatus};

/// Pick the job a user means from a pipeline's jobs in creation order.
///
/// One pass fills three candidate slots:
/// - the last job named `name` (a retry supersedes the attempt before it),
/// - the last running job,
/// - the first pending job.
///
/// The name match wins, then the running job, then the pending job, and
/// failing all of those the chronologically last job. An empty `name` never
/// matches.
///
/// # Errors
///
/// Returns [`LabCiError::EmptyJobSet`] when `jobs` is empty.
pub fn select_target_job<'a>(jobs: &'a [Job], name: &str) -> Result<&'a Job> {
    let last = jobs.last().ok_or(LabCiError::EmptyJobSet)?;

    let mut named = None;
    let mut running = None;
    let mut pending = None;

    for job in jobs {
        match job.status {
            JobStatus::Running => running = Some(job),
            JobStatus::Pending if pending.is_none() => pending = Some(job),
            _ => {}
        }
        if !name.is_empty() && job.name == name {
            named = Some(job);
        }
    }

    Ok(named.or(running).or(pending).unwrap_or(last))
}
