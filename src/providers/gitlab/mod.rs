mod api;
mod client;
mod jobs;
mod lifecycle;
mod links;
mod pipelines;
mod provider;
mod resolver;
mod types;

#[cfg(test)]
mod mock;

pub use lifecycle::LifecycleAction;
pub use links::{job_url, pipeline_url};
pub use provider::GitLabProvider;
pub use types::{Job, JobStatus, Pipeline};
