//! Remote operations the pipeline engine depends on.
//!
//! [`GitLabClient`](super::client::GitLabClient) implements this against the
//! REST API. Tests substitute an in-memory implementation.

use std::future::Future;

use crate::error::Result;

use super::types::{Commit, Job, JobAction, Page, Pipeline, PipelineFilter};

pub trait GitLabApi {
    /// Fetch one page of the jobs belonging to a pipeline.
    fn list_pipeline_jobs(
        &self,
        project: &str,
        pipeline_id: u64,
        page: u32,
        per_page: u32,
    ) -> impl Future<Output = Result<Page<Job>>> + Send;

    /// Search a project's pipelines, newest first.
    fn search_pipelines(
        &self,
        project: &str,
        filter: &PipelineFilter,
        page: u32,
        per_page: u32,
    ) -> impl Future<Output = Result<Vec<Pipeline>>> + Send;

    /// Look up a commit by SHA, branch or tag name.
    fn get_commit(
        &self,
        project: &str,
        sha_or_ref: &str,
    ) -> impl Future<Output = Result<Commit>> + Send;

    /// Play or retry a job and return the resulting job record.
    fn job_action(
        &self,
        project: &str,
        job_id: u64,
        action: JobAction,
    ) -> impl Future<Output = Result<Job>> + Send;
}
