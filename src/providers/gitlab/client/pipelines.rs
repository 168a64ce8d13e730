use super::core::GitLabClient;
use crate::error::Result;
use crate::providers::gitlab::types::{Commit, Pipeline, PipelineFilter};

impl GitLabClient {
    /// Search pipelines, newest first.
    ///
    /// Pipeline ids grow with creation time, so descending id order is
    /// descending creation order.
    pub async fn search_pipelines(
        &self,
        project_path: &str,
        filter: &PipelineFilter,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Pipeline>> {
        let mut url = self.project_url(project_path, &["pipelines"])?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(ref_) = &filter.ref_ {
                query.append_pair("ref", ref_);
            }
            if let Some(sha) = &filter.sha {
                query.append_pair("sha", sha);
            }
            query
                .append_pair("order_by", "id")
                .append_pair("sort", "desc")
                .append_pair("page", &page.to_string())
                .append_pair("per_page", &per_page.to_string());
        }

        self.get_json(url).await
    }

    /// Commit lookup; `sha_or_ref` may be a SHA, branch or tag.
    pub async fn fetch_commit(&self, project_path: &str, sha_or_ref: &str) -> Result<Commit> {
        let url = self.project_url(project_path, &["repository", "commits", sha_or_ref])?;
        self.get_json(url).await
    }
}
