use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabCiError {
    #[error("GitLab API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("git: {0}")]
    Git(String),

    #[error("job listing of pipeline {pipeline_id} ended at page {page} without a next page")]
    IncompleteJobListing { pipeline_id: u64, page: u32 },

    #[error("no pipeline running or available for ref {0}")]
    NoPipelineForRef(String),

    #[error("no jobs found in pipeline {0}")]
    NoJobsInPipeline(u64),

    #[error("no jobs available to choose from")]
    EmptyJobSet,
}

impl LabCiError {
    /// True for the "nothing to show" class of errors, as opposed to
    /// transport or remote failures.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NoPipelineForRef(_) | Self::NoJobsInPipeline(_) | Self::EmptyJobSet
        )
    }
}

pub type Result<T> = std::result::Result<T, LabCiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_pipeline_message_names_the_ref() {
        let err = LabCiError::NoPipelineForRef("feature/login".to_string());
        assert_eq!(
            err.to_string(),
            "no pipeline running or available for ref feature/login"
        );
    }

    #[test]
    fn not_found_class_excludes_remote_failures() {
        assert!(LabCiError::EmptyJobSet.is_not_found());
        assert!(LabCiError::NoJobsInPipeline(7).is_not_found());
        assert!(!LabCiError::Api {
            status: 404,
            message: "404 Not found".to_string()
        }
        .is_not_found());
        assert!(!LabCiError::Git("detached HEAD".to_string()).is_not_found());
    }
}
