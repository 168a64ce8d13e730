//! Recording in-memory [`GitLabApi`] used by the engine tests.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{TimeZone, Utc};

use crate::error::{LabCiError, Result};

use super::api::GitLabApi;
use super::types::{Commit, Job, JobAction, JobPipeline, JobStatus, Page, Pipeline, PipelineFilter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListJobs { pipeline_id: u64, page: u32 },
    SearchPipelines { filter: PipelineFilter, per_page: u32 },
    GetCommit(String),
    Action { job_id: u64, action: JobAction },
}

#[derive(Default)]
pub struct MockGitLab {
    job_pages: HashMap<u64, Vec<Page<Job>>>,
    commits: HashMap<String, Commit>,
    pipelines: Vec<Pipeline>,
    failing_page: Option<u32>,
    failing_action: Option<u16>,
    calls: Mutex<Vec<Call>>,
}

impl MockGitLab {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `pages` (in order, page numbers starting at 1) for a pipeline.
    pub fn with_job_pages(mut self, pipeline_id: u64, pages: Vec<Page<Job>>) -> Self {
        self.job_pages.insert(pipeline_id, pages);
        self
    }

    /// Serve all `jobs` for a pipeline as a single page.
    pub fn with_jobs(self, pipeline_id: u64, jobs: Vec<Job>) -> Self {
        self.with_job_pages(pipeline_id, vec![page(jobs, 1, 1)])
    }

    pub fn with_commit(mut self, sha_or_ref: &str, commit: Commit) -> Self {
        self.commits.insert(sha_or_ref.to_string(), commit);
        self
    }

    pub fn with_pipelines(mut self, pipelines: Vec<Pipeline>) -> Self {
        self.pipelines = pipelines;
        self
    }

    pub fn failing_on_page(mut self, page: u32) -> Self {
        self.failing_page = Some(page);
        self
    }

    pub fn failing_actions_with(mut self, status: u16) -> Self {
        self.failing_action = Some(status);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl GitLabApi for MockGitLab {
    async fn list_pipeline_jobs(
        &self,
        _project: &str,
        pipeline_id: u64,
        page: u32,
        _per_page: u32,
    ) -> Result<Page<Job>> {
        self.record(Call::ListJobs { pipeline_id, page });

        if self.failing_page == Some(page) {
            return Err(LabCiError::Api {
                status: 502,
                message: "Bad Gateway".to_string(),
            });
        }

        let pages = self.job_pages.get(&pipeline_id).ok_or(LabCiError::Api {
            status: 404,
            message: "404 Pipeline Not Found".to_string(),
        })?;

        Ok(pages
            .get(page as usize - 1)
            .cloned()
            .unwrap_or_else(|| self::page(vec![], page, pages.len() as u32)))
    }

    async fn search_pipelines(
        &self,
        _project: &str,
        filter: &PipelineFilter,
        _page: u32,
        per_page: u32,
    ) -> Result<Vec<Pipeline>> {
        self.record(Call::SearchPipelines {
            filter: filter.clone(),
            per_page,
        });

        let mut matching: Vec<Pipeline> = self
            .pipelines
            .iter()
            .filter(|p| filter.ref_.as_ref().map_or(true, |r| &p.ref_ == r))
            .filter(|p| filter.sha.as_ref().map_or(true, |s| &p.sha == s))
            .cloned()
            .collect();

        matching.sort_by_key(|p| std::cmp::Reverse(p.id));
        matching.truncate(per_page as usize);

        Ok(matching)
    }

    async fn get_commit(&self, _project: &str, sha_or_ref: &str) -> Result<Commit> {
        self.record(Call::GetCommit(sha_or_ref.to_string()));

        self.commits
            .get(sha_or_ref)
            .cloned()
            .ok_or_else(|| LabCiError::Api {
                status: 404,
                message: "404 Commit Not Found".to_string(),
            })
    }

    async fn job_action(&self, _project: &str, job_id: u64, action: JobAction) -> Result<Job> {
        self.record(Call::Action { job_id, action });

        if let Some(status) = self.failing_action {
            return Err(LabCiError::Api {
                status,
                message: "403 Forbidden - Job is not retryable".to_string(),
            });
        }

        let new_id = match action {
            JobAction::Play => job_id,
            JobAction::Retry => job_id + 1000,
        };
        Ok(job(new_id, "triggered", JobStatus::Pending, 100))
    }
}

/// Job created `t` seconds after a fixed epoch, in pipeline 1.
pub fn job(id: u64, name: &str, status: JobStatus, t: i64) -> Job {
    Job {
        id,
        name: name.to_string(),
        stage: "test".to_string(),
        status,
        created_at: Utc.timestamp_opt(1_700_000_000 + t, 0).unwrap(),
        started_at: None,
        finished_at: None,
        duration: None,
        allow_failure: false,
        pipeline: JobPipeline {
            id: 1,
            ref_: Some("main".to_string()),
            sha: Some("abc123".to_string()),
        },
        web_url: None,
    }
}

pub fn pipeline(id: u64, ref_: &str, sha: &str) -> Pipeline {
    Pipeline {
        id,
        ref_: ref_.to_string(),
        sha: sha.to_string(),
        status: "success".to_string(),
        source: Some("push".to_string()),
        created_at: Utc.timestamp_opt(1_700_000_000 + id as i64, 0).unwrap(),
        updated_at: None,
        web_url: None,
    }
}

pub fn commit(sha: &str, last_pipeline: Option<Pipeline>) -> Commit {
    Commit {
        id: sha.to_string(),
        short_id: sha.chars().take(8).collect(),
        title: "Update .gitlab-ci.yml".to_string(),
        last_pipeline,
    }
}

pub fn page(jobs: Vec<Job>, current: u32, total: u32) -> Page<Job> {
    Page {
        items: jobs,
        current_page: current,
        total_pages: Some(total),
        next_page: (current < total).then_some(current + 1),
    }
}
