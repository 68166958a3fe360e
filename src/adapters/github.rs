use crate::domain::model::{CreatedIssue, NewIssue, PullRequest, RepoFile};
use crate::domain::ports::IssueTracker;
use crate::utils::error::{PddError, Result};
use crate::utils::validation::validate_repo_slug;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = "pdd-action";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub repo: String,
}

impl FromStr for RepoSlug {
    type Err = PddError;

    fn from_str(s: &str) -> Result<Self> {
        validate_repo_slug("GITHUB_REPOSITORY", s)?;
        let (owner, repo) = s.split_once('/').unwrap_or_default();
        Ok(Self {
            owner: owner.trim().to_string(),
            repo: repo.trim().to_string(),
        })
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Deserialize)]
struct BranchRef {
    #[serde(rename = "ref")]
    git_ref: String,
}

#[derive(Deserialize)]
struct PullResponse {
    number: u64,
    #[serde(default)]
    merged: bool,
    base: BranchRef,
    head: BranchRef,
}

#[derive(Deserialize)]
struct ContentResponse {
    path: String,
    sha: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: Option<String>,
}

#[derive(Serialize)]
struct UpdateFileRequest<'a> {
    message: &'a str,
    content: String,
    sha: &'a str,
    branch: &'a str,
}

/// REST client for a single repository.
pub struct GitHubClient {
    client: Client,
    api_url: Url,
    token: String,
    repo: RepoSlug,
}

impl GitHubClient {
    pub fn new(token: &str, repo: RepoSlug, api_url: &str) -> Result<Self> {
        let api_url = Url::parse(api_url).map_err(|e| PddError::InvalidConfigValueError {
            field: "GITHUB_API_URL".to_string(),
            value: api_url.to_string(),
            reason: e.to_string(),
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        tracing::debug!("GitHub client for {} via {}", repo, api_url);

        Ok(Self {
            client,
            api_url,
            token: token.to_string(),
            repo,
        })
    }

    pub fn repo(&self) -> &RepoSlug {
        &self.repo
    }

    /// `{api_url}/repos/{owner}/{repo}/{segments...}` with each segment percent-encoded.
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| PddError::InvalidConfigValueError {
                field: "GITHUB_API_URL".to_string(),
                value: self.api_url.to_string(),
                reason: "URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .extend(["repos", self.repo.owner.as_str(), self.repo.repo.as_str()])
            .extend(segments);
        Ok(url)
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let endpoint = response.url().path().to_string();
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&text)
            .map(|body| body.message)
            .unwrap_or(text);

        tracing::debug!("GitHub API {} responded {}: {}", endpoint, status, message);
        Err(PddError::GitHubApiError {
            status: status.as_u16(),
            endpoint,
            message,
        })
    }
}

pub fn decode_content(path: &str, encoded: &str) -> Result<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| PddError::DecodeError {
            what: path.to_string(),
            reason: e.to_string(),
        })?;
    String::from_utf8(bytes).map_err(|e| PddError::DecodeError {
        what: path.to_string(),
        reason: e.to_string(),
    })
}

#[async_trait]
impl IssueTracker for GitHubClient {
    async fn create_issue(&self, issue: &NewIssue) -> Result<CreatedIssue> {
        let url = self.endpoint(["issues"])?;
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(issue)
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    async fn pull_request(&self, number: u64) -> Result<PullRequest> {
        let number_str = number.to_string();
        let url = self.endpoint(["pulls", number_str.as_str()])?;
        let response = self.client.get(url).bearer_auth(&self.token).send().await?;

        let pr: PullResponse = Self::check(response).await?.json().await?;
        Ok(PullRequest {
            number: pr.number,
            merged: pr.merged,
            base_ref: pr.base.git_ref,
            head_ref: pr.head.git_ref,
        })
    }

    async fn get_file(&self, path: &str, git_ref: &str) -> Result<RepoFile> {
        let mut url = self.endpoint(std::iter::once("contents").chain(path.split('/')))?;
        url.query_pairs_mut().append_pair("ref", git_ref);

        let response = self.client.get(url).bearer_auth(&self.token).send().await?;
        let body: ContentResponse = Self::check(response).await?.json().await?;

        match body.encoding.as_deref() {
            Some("base64") | None => {}
            Some(other) => {
                return Err(PddError::DecodeError {
                    what: path.to_string(),
                    reason: format!("unsupported content encoding '{}'", other),
                })
            }
        }

        Ok(RepoFile {
            content: decode_content(&body.path, &body.content)?,
            path: body.path,
            sha: body.sha,
        })
    }

    async fn update_file(
        &self,
        path: &str,
        branch: &str,
        content: &str,
        sha: &str,
        message: &str,
    ) -> Result<()> {
        let url = self.endpoint(std::iter::once("contents").chain(path.split('/')))?;
        let request = UpdateFileRequest {
            message,
            content: STANDARD.encode(content),
            sha,
            branch,
        };

        let response = self
            .client
            .put(url)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client(server: &MockServer) -> GitHubClient {
        GitHubClient::new("t0ken", "octo/hello".parse().unwrap(), &server.base_url()).unwrap()
    }

    #[test]
    fn test_repo_slug() {
        let slug: RepoSlug = "octo/hello".parse().unwrap();
        assert_eq!(slug.owner, "octo");
        assert_eq!(slug.repo, "hello");
        assert_eq!(slug.to_string(), "octo/hello");
        assert!("octo".parse::<RepoSlug>().is_err());
    }

    #[test]
    fn test_decode_content_with_line_breaks() {
        let encoded = "aGVsbG8g\nd29ybGQ=\n";
        assert_eq!(decode_content("a.txt", encoded).unwrap(), "hello world");
        assert!(decode_content("a.txt", "***").is_err());
    }

    #[tokio::test]
    async fn test_create_issue() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/repos/octo/hello/issues")
                .header("authorization", "Bearer t0ken")
                .header("x-github-api-version", API_VERSION)
                .json_body(serde_json::json!({
                    "title": "[PDD] Add type hints",
                    "body": "Created from TODO comment",
                    "labels": ["enhancement"]
                }));
            then.status(201)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "number": 12,
                    "html_url": "https://github.com/octo/hello/issues/12",
                    "state": "open"
                }));
        });

        let issue = NewIssue {
            title: "[PDD] Add type hints".to_string(),
            body: "Created from TODO comment".to_string(),
            labels: vec!["enhancement".to_string()],
        };
        let created = client(&server).create_issue(&issue).await.unwrap();

        mock.assert();
        assert_eq!(created.number, 12);
        assert_eq!(created.html_url, "https://github.com/octo/hello/issues/12");
    }

    #[tokio::test]
    async fn test_create_issue_error_message() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/repos/octo/hello/issues");
            then.status(403)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "message": "Resource not accessible by integration"
                }));
        });

        let issue = NewIssue {
            title: "t".to_string(),
            body: "b".to_string(),
            labels: vec![],
        };
        let err = client(&server).create_issue(&issue).await.unwrap_err();

        match err {
            PddError::GitHubApiError {
                status,
                endpoint,
                message,
            } => {
                assert_eq!(status, 403);
                assert_eq!(endpoint, "/repos/octo/hello/issues");
                assert_eq!(message, "Resource not accessible by integration");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_pull_request() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/repos/octo/hello/pulls/5");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "number": 5,
                    "merged": true,
                    "base": {"ref": "main", "sha": "abc"},
                    "head": {"ref": "feature/todo", "sha": "def"}
                }));
        });

        let pr = client(&server).pull_request(5).await.unwrap();
        assert!(pr.merged);
        assert_eq!(pr.base_ref, "main");
        assert_eq!(pr.head_ref, "feature/todo");
    }

    #[tokio::test]
    async fn test_get_and_update_file() {
        let server = MockServer::start();
        let content = "# TODO: Task\nprint(1)\n";
        let get_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/repos/octo/hello/contents/src/app.py")
                .query_param("ref", "feature/todo");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "path": "src/app.py",
                    "sha": "blob-sha",
                    "encoding": "base64",
                    "content": STANDARD.encode(content)
                }));
        });
        let put_mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/repos/octo/hello/contents/src/app.py")
                .json_body(serde_json::json!({
                    "message": "msg",
                    "content": STANDARD.encode("updated"),
                    "sha": "blob-sha",
                    "branch": "feature/todo"
                }));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"content": {}, "commit": {}}));
        });

        let client = client(&server);
        let file = client.get_file("src/app.py", "feature/todo").await.unwrap();
        assert_eq!(file.content, content);
        assert_eq!(file.sha, "blob-sha");

        client
            .update_file("src/app.py", "feature/todo", "updated", "blob-sha", "msg")
            .await
            .unwrap();

        get_mock.assert();
        put_mock.assert();
    }

    #[tokio::test]
    async fn test_api_url_with_path_prefix() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/v3/repos/octo/hello/pulls/1");
            then.status(404)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"message": "Not Found"}));
        });

        let client =
            GitHubClient::new("t", "octo/hello".parse().unwrap(), &server.url("/api/v3")).unwrap();
        let err = client.pull_request(1).await.unwrap_err();

        mock.assert();
        assert!(matches!(err, PddError::GitHubApiError { status: 404, .. }));
    }
}
