mod core;
mod jobs;
mod pipelines;

pub use self::core::GitLabClient;

use crate::error::Result;

use super::api::GitLabApi;
use super::types::{Commit, Job, JobAction, Page, Pipeline, PipelineFilter};

impl GitLabApi for GitLabClient {
    async fn list_pipeline_jobs(
        &self,
        project: &str,
        pipeline_id: u64,
        page: u32,
        per_page: u32,
    ) -> Result<Page<Job>> {
        self.fetch_job_page(project, pipeline_id, page, per_page)
            .await
    }

    async fn search_pipelines(
        &self,
        project: &str,
        filter: &PipelineFilter,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Pipeline>> {
        GitLabClient::search_pipelines(self, project, filter, page, per_page).await
    }

    async fn get_commit(&self, project: &str, sha_or_ref: &str) -> Result<Commit> {
        self.fetch_commit(project, sha_or_ref).await
    }

    async fn job_action(&self, project: &str, job_id: u64, action: JobAction) -> Result<Job> {
        self.run_job_action(project, job_id, action).await
    }
}
