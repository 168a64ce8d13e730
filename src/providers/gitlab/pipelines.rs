use log::{debug, info};

use crate::error::{LabCiError, Result};
use crate::git::LocalGit;

use super::api::GitLabApi;
use super::types::{Pipeline, PipelineFilter};

/// Most recent pipeline for a branch or tag.
///
/// Without a ref the currently checked out branch is used. The commit at the
/// tip of the ref is looked up first since GitLab caches its last pipeline on
/// the commit record; only when that is absent do we search pipelines for
/// the ref, newest first.
///
/// # Errors
///
/// [`LabCiError::NoPipelineForRef`] when neither lookup finds a pipeline.
pub async fn resolve_latest_pipeline<A: GitLabApi, G: LocalGit>(
    api: &A,
    git: &G,
    project: &str,
    ref_: Option<&str>,
) -> Result<Pipeline> {
    let ref_ = match ref_ {
        Some(ref_) => ref_.to_string(),
        None => git.current_branch()?,
    };

    let commit = api.get_commit(project, &ref_).await?;
    if let Some(pipeline) = commit.last_pipeline {
        info!("Pipeline {} is the last pipeline of {ref_}", pipeline.id);
        return Ok(pipeline);
    }

    newest_pipeline(api, project, &PipelineFilter::for_ref(&ref_), &ref_).await
}

/// Most recent pipeline that ran for the commit `sha_or_ref` points at.
///
/// Same lookup as [`resolve_latest_pipeline`] except the fallback search is
/// pinned to the commit SHA rather than the ref.
pub async fn resolve_commit_pipeline<A: GitLabApi>(
    api: &A,
    project: &str,
    sha_or_ref: &str,
) -> Result<Pipeline> {
    let commit = api.get_commit(project, sha_or_ref).await?;
    if let Some(pipeline) = commit.last_pipeline {
        info!(
            "Pipeline {} is the last pipeline of {} ({sha_or_ref})",
            pipeline.id, commit.short_id
        );
        return Ok(pipeline);
    }

    newest_pipeline(api, project, &PipelineFilter::for_sha(&commit.id), sha_or_ref).await
}

async fn newest_pipeline<A: GitLabApi>(
    api: &A,
    project: &str,
    filter: &PipelineFilter,
    label: &str,
) -> Result<Pipeline> {
    debug!("No cached pipeline for {label}, searching with {filter:?}");

    api.search_pipelines(project, filter, 1, 1)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| LabCiError::NoPipelineForRef(label.to_string()))
}
