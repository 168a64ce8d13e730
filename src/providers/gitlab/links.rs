use super::types::{Job, Pipeline};

/// Web page of a pipeline, e.g. <https://gitlab.com/group/project/-/pipelines/123>.
///
/// Prefers the `web_url` GitLab returned and builds one from the instance
/// base URL and project path otherwise.
pub fn pipeline_url(base_url: &str, project_path: &str, pipeline: &Pipeline) -> String {
    pipeline
        .web_url
        .clone()
        .unwrap_or_else(|| format!("{base_url}/{project_path}/-/pipelines/{}", pipeline.id))
}

/// Web page of a job, e.g. <https://gitlab.com/group/project/-/jobs/456>.
pub fn job_url(base_url: &str, project_path: &str, job: &Job) -> String {
    job.web_url
        .clone()
        .unwrap_or_else(|| format!("{base_url}/{project_path}/-/jobs/{}", job.id))
}
