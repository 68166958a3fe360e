use crate::domain::model::{CreatedIssue, EventKind, NewIssue, PullRequest, RepoFile};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Remote side of the action: issues, pull requests and repository contents.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    async fn create_issue(&self, issue: &NewIssue) -> Result<CreatedIssue>;
    async fn pull_request(&self, number: u64) -> Result<PullRequest>;
    async fn get_file(&self, path: &str, git_ref: &str) -> Result<RepoFile>;
    async fn update_file(
        &self,
        path: &str,
        branch: &str,
        content: &str,
        sha: &str,
        message: &str,
    ) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn branch_name(&self) -> &str;
    fn issue_title_prefix(&self) -> Option<&str>;
    fn event(&self) -> EventKind;
    fn pr_number(&self) -> Option<u64>;
    fn workspace(&self) -> &Path;
    fn exclude_dirs(&self) -> &[String];
    /// Branch to write issue links to when there is no pull request.
    fn dispatch_branch(&self) -> &str;
    fn dry_run(&self) -> bool;
}
