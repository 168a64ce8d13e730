use log::info;

use crate::auth::Token;
use crate::error::{LabCiError, Result};
use crate::git::LocalGit;

use super::api::GitLabApi;
use super::client::GitLabClient;
use super::types::{Job, Pipeline};
use super::{jobs, lifecycle, pipelines, resolver};

/// Pipeline and job resolution for one GitLab project.
///
/// Every call works from fresh remote data: nothing is cached between calls,
/// failed requests are not retried, and each call owns the job batch it
/// builds.
pub struct GitLabProvider<A = GitLabClient> {
    pub api: A,
    pub project_path: String,
}

impl GitLabProvider {
    /// Creates a provider talking to the GitLab instance at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API URL cannot be constructed from `base_url`.
    pub fn new(base_url: &str, project_path: String, token: Option<Token>) -> Result<Self> {
        let api = GitLabClient::new(base_url, token)?;
        Ok(Self::with_api(api, project_path))
    }
}

impl<A: GitLabApi> GitLabProvider<A> {
    pub fn with_api(api: A, project_path: String) -> Self {
        Self { api, project_path }
    }

    /// All jobs of a pipeline, oldest first.
    pub async fn collect_pipeline_jobs(&self, pipeline_id: u64) -> Result<Vec<Job>> {
        let batch = jobs::collect_jobs(&self.api, &self.project_path, pipeline_id).await?;
        info!("Collected {} jobs for pipeline {pipeline_id}", batch.len());
        Ok(jobs::sort_by_creation(batch))
    }

    /// The job a user means by `job_name` (possibly empty) on a commit.
    ///
    /// `sha_or_ref` is resolved to its commit's most recent pipeline, whose
    /// jobs are collected in creation order and run through
    /// [`resolver::select_target_job`].
    ///
    /// # Errors
    ///
    /// [`LabCiError::NoPipelineForRef`] when the commit has no pipeline and
    /// [`LabCiError::NoJobsInPipeline`] when its pipeline has no jobs. Remote
    /// failures are returned unchanged.
    pub async fn resolve_target_job(&self, sha_or_ref: &str, job_name: &str) -> Result<Job> {
        let pipeline =
            pipelines::resolve_commit_pipeline(&self.api, &self.project_path, sha_or_ref).await?;

        let jobs = self.collect_pipeline_jobs(pipeline.id).await?;
        if jobs.is_empty() {
            return Err(LabCiError::NoJobsInPipeline(pipeline.id));
        }

        let job = resolver::select_target_job(&jobs, job_name)?;
        info!(
            "Resolved job {} ({}, {}) in pipeline {}",
            job.id, job.name, job.status, pipeline.id
        );
        Ok(job.clone())
    }

    /// Play, retry or leave alone `job` depending on its status.
    ///
    /// See [`lifecycle::dispatch_job_action`].
    pub async fn dispatch_job_action(&self, job: &Job) -> Result<Option<Job>> {
        lifecycle::dispatch_job_action(&self.api, &self.project_path, job).await
    }

    /// Most recent pipeline for `ref_`, or for the current branch when `None`.
    pub async fn resolve_latest_pipeline<G: LocalGit>(
        &self,
        ref_: Option<&str>,
        git: &G,
    ) -> Result<Pipeline> {
        pipelines::resolve_latest_pipeline(&self.api, git, &self.project_path, ref_).await
    }
}
