use super::core::GitLabClient;
use crate::error::Result;
use crate::providers::gitlab::types::{Job, JobAction, Page};

impl GitLabClient {
    /// One page of a pipeline's jobs, retried attempts included.
    pub async fn fetch_job_page(
        &self,
        project_path: &str,
        pipeline_id: u64,
        page: u32,
        per_page: u32,
    ) -> Result<Page<Job>> {
        let mut url =
            self.project_url(project_path, &["pipelines", &pipeline_id.to_string(), "jobs"])?;
        url.query_pairs_mut()
            .append_pair("include_retried", "true")
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &per_page.to_string());

        self.get_page(url).await
    }

    pub async fn fetch_job(&self, project_path: &str, job_id: u64) -> Result<Job> {
        let url = self.project_url(project_path, &["jobs", &job_id.to_string()])?;
        self.get_json(url).await
    }

    /// Raw log output of a job.
    pub async fn fetch_job_trace(&self, project_path: &str, job_id: u64) -> Result<String> {
        let url = self.project_url(project_path, &["jobs", &job_id.to_string(), "trace"])?;
        self.get_text(url).await
    }

    /// `POST jobs/:id/play` or `POST jobs/:id/retry`.
    pub async fn run_job_action(
        &self,
        project_path: &str,
        job_id: u64,
        action: JobAction,
    ) -> Result<Job> {
        let url = self.project_url(
            project_path,
            &["jobs", &job_id.to_string(), action.as_str()],
        )?;
        self.post_json(url).await
    }
}
