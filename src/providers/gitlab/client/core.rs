use log::debug;
use reqwest::header::HeaderMap;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::Token;
use crate::error::{LabCiError, Result};
use crate::providers::gitlab::types::Page;

pub struct GitLabClient {
    client: Client,
    api_url: Url,
    token: Option<Token>,
}

impl GitLabClient {
    pub fn new(base_url: &str, token: Option<Token>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("labci/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LabCiError::Config(format!("Failed to create HTTP client: {e}")))?;

        // Without a trailing slash `join` would drop a sub-path install (https://host/gitlab)
        let base = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        let api_url = Url::parse(&base)
            .map_err(|e| LabCiError::Config(format!("Invalid base URL: {e}")))?
            .join("api/v4/")
            .map_err(|e| LabCiError::Config(format!("Invalid API base URL: {e}")))?;

        Ok(Self {
            client,
            api_url,
            token,
        })
    }

    /// Origin of the GitLab instance, for building web links.
    pub fn web_base(&self) -> String {
        let mut url = self.api_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().pop().pop();
        }
        url.as_str().trim_end_matches('/').to_string()
    }

    fn auth_request(&self, request: RequestBuilder) -> RequestBuilder {
        if let Some(token) = &self.token {
            request.bearer_auth(token.as_str())
        } else {
            request
        }
    }

    /// `projects/<encoded project>/<segments...>` under the API root.
    ///
    /// The project path is a single segment, so `group/project` is sent as
    /// `group%2Fproject`.
    pub(super) fn project_url(&self, project: &str, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|()| LabCiError::Config(format!("Invalid API base URL: {}", self.api_url)))?
            .pop_if_empty()
            .push("projects")
            .push(project)
            .extend(segments);
        Ok(url)
    }

    pub(super) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.send(self.client.get(url)).await?;
        decode(response).await
    }

    pub(super) async fn post_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.send(self.client.post(url)).await?;
        decode(response).await
    }

    pub(super) async fn get_text(&self, url: Url) -> Result<String> {
        let response = self.send(self.client.get(url)).await?;
        Ok(response.text().await?)
    }

    /// GET one page of a listing, reading pagination from the response headers.
    pub(super) async fn get_page<T: DeserializeOwned>(&self, url: Url) -> Result<Page<T>> {
        let response = self.send(self.client.get(url)).await?;

        let headers = response.headers();
        let current_page = header_u32(headers, "x-page").unwrap_or(1);
        let total_pages = header_u32(headers, "x-total-pages");
        let next_page = header_u32(headers, "x-next-page");

        let items = decode(response).await?;

        Ok(Page {
            items,
            current_page,
            total_pages,
            next_page,
        })
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let request = self.auth_request(request).build()?;
        debug!("{} {}", request.method(), request.url());

        let response = self.client.execute(request).await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(LabCiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Numeric pagination header; missing or empty (GitLab sends `X-Next-Page: `
/// on the last page) reads as `None`.
fn header_u32(headers: &HeaderMap, name: &str) -> Option<u32> {
    headers
        .get(name)?
        .to_str()
        .ok()
        .map(str::trim)
        .filter(|value| !value.is_empty())?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    mod header_u32 {
        use super::*;

        fn headers(name: &'static str, value: &'static str) -> HeaderMap {
            let mut headers = HeaderMap::new();
            headers.insert(name, HeaderValue::from_static(value));
            headers
        }

        #[test]
        fn parses_numeric_value() {
            assert_eq!(header_u32(&headers("x-total-pages", "3"), "x-total-pages"), Some(3));
        }

        #[test]
        fn empty_value_is_none() {
            assert_eq!(header_u32(&headers("x-next-page", ""), "x-next-page"), None);
        }

        #[test]
        fn missing_header_is_none() {
            assert_eq!(header_u32(&HeaderMap::new(), "x-page"), None);
        }

        #[test]
        fn garbage_is_none() {
            assert_eq!(header_u32(&headers("x-page", "two"), "x-page"), None);
        }
    }

    mod project_url {
        use super::*;

        #[test]
        fn encodes_project_path_as_one_segment() {
            let client = GitLabClient::new("https://gitlab.com", None).unwrap();

            let url = client
                .project_url("group/sub/project", &["pipelines", "12", "jobs"])
                .unwrap();

            assert_eq!(
                url.as_str(),
                "https://gitlab.com/api/v4/projects/group%2Fsub%2Fproject/pipelines/12/jobs"
            );
        }

        #[test]
        fn keeps_sub_path_of_self_managed_instance() {
            let client = GitLabClient::new("https://example.com/gitlab", None).unwrap();

            let url = client.project_url("42", &["jobs"]).unwrap();

            assert_eq!(url.as_str(), "https://example.com/gitlab/api/v4/projects/42/jobs");
        }

        #[test]
        fn rejects_invalid_base_url() {
            assert!(GitLabClient::new("not a url", None).is_err());
        }
    }

    #[test]
    fn web_base_strips_api_root() {
        let client = GitLabClient::new("https://example.com/gitlab/", None).unwrap();
        assert_eq!(client.web_base(), "https://example.com/gitlab");
    }
}
