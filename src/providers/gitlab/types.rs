use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a GitLab CI job as reported by the REST API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Created,
    WaitingForResource,
    Preparing,
    Pending,
    Running,
    Success,
    Failed,
    Canceled,
    Skipped,
    Manual,
    Scheduled,
    /// Any status this client does not know about yet
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::WaitingForResource => "waiting_for_resource",
            Self::Preparing => "preparing",
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Canceled => "canceled",
            Self::Skipped => "skipped",
            Self::Manual => "manual",
            Self::Scheduled => "scheduled",
            Self::Unknown => "unknown",
        }
    }

    /// Whether the job is queued or executing right now.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Pending | Self::Running)
    }

    /// Whether the job has reached a state it will not leave on its own.
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            Self::Success | Self::Failed | Self::Canceled | Self::Skipped | Self::Manual
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pipeline reference embedded in a job record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPipeline {
    pub id: u64,
    #[serde(rename = "ref", default)]
    pub ref_: Option<String>,
    #[serde(default)]
    pub sha: Option<String>,
}

/// A GitLab CI job.
///
/// Immutable snapshot of the remote record. Names are not unique within a
/// pipeline: every retry creates a new record with a new id and the same name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub stage: String,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
    /// Execution time in seconds
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub allow_failure: bool,
    pub pipeline: JobPipeline,
    #[serde(default)]
    pub web_url: Option<String>,
}

/// A GitLab CI pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    pub id: u64,
    #[serde(rename = "ref")]
    pub ref_: String,
    pub sha: String,
    pub status: String,
    #[serde(default)]
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub web_url: Option<String>,
}

/// A repository commit, as returned by the commit lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    /// Full SHA
    pub id: String,
    #[serde(default)]
    pub short_id: String,
    #[serde(default)]
    pub title: String,
    /// Most recent pipeline GitLab has recorded for this commit
    #[serde(default)]
    pub last_pipeline: Option<Pipeline>,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: u32,
    /// Absent when GitLab declines to count very large collections
    pub total_pages: Option<u32>,
    pub next_page: Option<u32>,
}

impl<T> Page<T> {
    /// Whether this page closes the listing.
    ///
    /// `current_page == total_pages` is authoritative when GitLab reports a
    /// total. Otherwise the absence of a next-page cursor ends the listing.
    pub fn is_last(&self) -> bool {
        match self.total_pages {
            Some(total) => self.current_page >= total,
            None => self.next_page.is_none(),
        }
    }
}

/// Remote action that moves a job forward in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobAction {
    Play,
    Retry,
}

impl JobAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Retry => "retry",
        }
    }
}

impl fmt::Display for JobAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter for pipeline searches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineFilter {
    pub ref_: Option<String>,
    pub sha: Option<String>,
}

impl PipelineFilter {
    pub fn for_ref(ref_: &str) -> Self {
        Self {
            ref_: Some(ref_.to_string()),
            sha: None,
        }
    }

    pub fn for_sha(sha: &str) -> Self {
        Self {
            ref_: None,
            sha: Some(sha.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod job_status {
        use super::*;

        #[test]
        fn deserializes_snake_case_values() {
            let status: JobStatus = serde_json::from_str("\"waiting_for_resource\"").unwrap();
            assert_eq!(status, JobStatus::WaitingForResource);
        }

        #[test]
        fn unknown_values_do_not_fail_deserialization() {
            let status: JobStatus = serde_json::from_str("\"some_future_state\"").unwrap();
            assert_eq!(status, JobStatus::Unknown);
        }

        #[test]
        fn only_pending_and_running_are_in_flight() {
            assert!(JobStatus::Pending.is_in_flight());
            assert!(JobStatus::Running.is_in_flight());
            assert!(!JobStatus::Manual.is_in_flight());
            assert!(!JobStatus::Created.is_in_flight());
            assert!(!JobStatus::Failed.is_in_flight());
        }

        #[test]
        fn waiting_jobs_are_neither_in_flight_nor_finished() {
            for status in [JobStatus::Created, JobStatus::WaitingForResource, JobStatus::Scheduled] {
                assert!(!status.is_in_flight(), "{status} is not in flight");
                assert!(!status.is_finished(), "{status} is not finished");
            }
            assert!(JobStatus::Canceled.is_finished());
            assert!(JobStatus::Manual.is_finished());
        }
    }

    mod job {
        use super::*;

        #[test]
        fn deserializes_rest_payload() {
            let json = r#"{
                "id": 8,
                "name": "rspec:other",
                "stage": "test",
                "status": "failed",
                "created_at": "2015-12-24T15:51:21.802Z",
                "started_at": "2015-12-24T17:54:24.729Z",
                "finished_at": "2015-12-24T17:54:31.198Z",
                "duration": 6.469,
                "allow_failure": false,
                "pipeline": {"id": 6, "project_id": 1, "ref": "main", "sha": "0ff3ae19", "status": "pending"},
                "web_url": "https://example.com/foo/bar/-/jobs/8",
                "user": {"id": 1}
            }"#;

            let job: Job = serde_json::from_str(json).unwrap();
            assert_eq!(job.id, 8);
            assert_eq!(job.status, JobStatus::Failed);
            assert_eq!(job.pipeline.id, 6);
            assert_eq!(job.pipeline.ref_.as_deref(), Some("main"));
            assert_eq!(job.duration, Some(6.469));
        }
    }

    mod page {
        use super::*;

        fn page(current: u32, total: Option<u32>, next: Option<u32>) -> Page<u64> {
            Page {
                items: vec![],
                current_page: current,
                total_pages: total,
                next_page: next,
            }
        }

        #[test]
        fn last_when_current_equals_total() {
            assert!(page(3, Some(3), None).is_last());
        }

        #[test]
        fn total_wins_over_a_stale_next_cursor() {
            assert!(page(3, Some(3), Some(4)).is_last());
        }

        #[test]
        fn not_last_before_total() {
            assert!(!page(1, Some(3), Some(2)).is_last());
        }

        #[test]
        fn empty_listing_reports_zero_pages() {
            assert!(page(1, Some(0), None).is_last());
        }

        #[test]
        fn falls_back_to_next_cursor_without_total() {
            assert!(!page(1, None, Some(2)).is_last());
            assert!(page(2, None, None).is_last());
        }
    }
}
