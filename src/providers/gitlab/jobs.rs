use log::{debug, warn};

use crate::error::{LabCiError, Result};

use super::api::GitLabApi;
use super::types::Job;

/// Jobs requested per page. GitLab caps `per_page` at 100.
pub(super) const JOBS_PAGE_SIZE: u32 = 100;

/// Fetch every job of a pipeline, one page at a time.
///
/// The batch is returned in whatever order the pages delivered it (GitLab
/// lists jobs by id, newest first). Pages are requested until the current
/// page reaches the reported total. Any page failure aborts the whole
/// collection and nothing fetched so far is returned.
pub async fn collect_jobs<A: GitLabApi>(
    api: &A,
    project: &str,
    pipeline_id: u64,
) -> Result<Vec<Job>> {
    let mut all_jobs = Vec::new();
    let mut page = 1;

    loop {
        let fetched = api
            .list_pipeline_jobs(project, pipeline_id, page, JOBS_PAGE_SIZE)
            .await?;

        debug!(
            "Pipeline {pipeline_id}: page {}/{} with {} jobs",
            fetched.current_page,
            fetched
                .total_pages
                .map_or_else(|| "?".to_string(), |t| t.to_string()),
            fetched.items.len()
        );

        let is_last = fetched.is_last();
        all_jobs.extend(fetched.items);

        if is_last {
            break;
        }

        page = match (fetched.next_page, fetched.total_pages) {
            (Some(next), _) if next > fetched.current_page => next,
            // the total is authoritative, a missing cursor does not end the listing
            (_, Some(_)) => fetched.current_page + 1,
            (_, None) => {
                warn!(
                    "Pipeline {pipeline_id}: page {} has no total and no usable next page",
                    fetched.current_page
                );
                return Err(LabCiError::IncompleteJobListing {
                    pipeline_id,
                    page: fetched.current_page,
                });
            }
        };
    }

    Ok(all_jobs)
}

/// Order jobs by creation time, oldest first.
///
/// The sort is stable: jobs created at the same instant keep the order they
/// arrived in.
pub fn sort_by_creation(mut jobs: Vec<Job>) -> Vec<Job> {
    jobs.sort_by_key(|job| job.created_at);
    jobs
}
