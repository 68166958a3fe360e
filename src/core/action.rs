use crate::core::issue::new_issue;
use crate::core::language::language_for_path;
use crate::core::parser::filter_unprocessed;
use crate::core::rewrite::insert_issue_lines;
use crate::core::scanner::{exclude_paths, scan_directory};
use crate::core::{ConfigProvider, IssueTracker};
use crate::domain::model::{EventKind, RunSummary, TodoComment};
use crate::utils::error::{PddError, Result};
use crate::utils::workflow;

/// Extracts the PR number from a ref like `refs/pull/42/merge`.
pub fn extract_pr_number(git_ref: &str) -> Result<u64> {
    let parts: Vec<&str> = git_ref.split('/').collect();
    if parts.len() < 3 {
        return Err(PddError::InvalidRefError {
            git_ref: git_ref.to_string(),
        });
    }

    parts[2].parse().map_err(|_| PddError::InvalidRefError {
        git_ref: git_ref.to_string(),
    })
}

pub struct PddAction<T: IssueTracker, C: ConfigProvider> {
    tracker: T,
    config: C,
}

impl<T: IssueTracker, C: ConfigProvider> PddAction<T, C> {
    pub fn new(tracker: T, config: C) -> Self {
        Self { tracker, config }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("Running PDD action for {} event", self.config.event().as_str());

        let head_branch = match self.merge_gate().await? {
            Gate::Open(branch) => branch,
            Gate::Closed(reason) => {
                tracing::info!("{}", reason);
                return Ok(RunSummary::skipped(reason));
            }
        };

        let workspace = self.config.workspace();
        tracing::info!("Scanning for TODO comments in workspace: {}", workspace.display());
        let excludes = exclude_paths(workspace, self.config.exclude_dirs());
        let comments = scan_directory(workspace, &excludes)?;
        tracing::info!("Found {} TODO comments", comments.len());

        let scanned = comments.len();
        let unprocessed = filter_unprocessed(comments);
        tracing::info!("Found {} unprocessed TODO comments", unprocessed.len());

        let mut summary = RunSummary {
            scanned,
            unprocessed: unprocessed.len(),
            ..RunSummary::default()
        };

        if unprocessed.is_empty() {
            tracing::info!("No unprocessed TODO comments found");
            return Ok(summary);
        }

        if self.config.dry_run() {
            for comment in &unprocessed {
                tracing::info!(
                    "[dry-run] Would create issue '{}' from {}:{} labels={:?}",
                    comment.title,
                    comment.file_path,
                    comment.line_number,
                    comment.labels
                );
            }
            return Ok(summary);
        }

        summary.created = self.create_issues(unprocessed).await?;
        tracing::info!("Created {} issues from TODO comments", summary.created.len());

        for (path, comments) in group_by_file(&summary.created) {
            match self.link_file(path, &comments, &head_branch).await {
                Ok(true) => {
                    summary.updated_files += 1;
                    tracing::info!(
                        "Updated {} TODO comment(s) in {} with issue URLs",
                        comments.len(),
                        path
                    );
                }
                Ok(false) => {
                    tracing::info!("Issue URLs already present in {}, skipping", path);
                }
                Err(e) => {
                    summary.failed_updates += 1;
                    workflow::warning(&format!("Failed to update comment in file {}: {}", path, e));
                }
            }
        }

        Ok(summary)
    }

    /// Decides whether to proceed and which branch to write links to.
    async fn merge_gate(&self) -> Result<Gate> {
        match self.config.event() {
            EventKind::WorkflowDispatch => {
                tracing::info!("Running in workflow_dispatch mode, skipping PR merged check");
                Ok(Gate::Open(self.config.dispatch_branch().to_string()))
            }
            EventKind::PullRequest => {
                let number = self
                    .config
                    .pr_number()
                    .ok_or_else(|| PddError::MissingConfigError {
                        field: "GITHUB_REF (pull request number)".to_string(),
                    })?;

                if self.config.dry_run() {
                    return Ok(Gate::Open(self.config.branch_name().to_string()));
                }

                let pr = self.tracker.pull_request(number).await?;
                if pr.merged && pr.base_ref == self.config.branch_name() {
                    Ok(Gate::Open(pr.head_ref))
                } else {
                    Ok(Gate::Closed(format!(
                        "PR #{} is not merged to {} branch yet. Skipping issue creation.",
                        number,
                        self.config.branch_name()
                    )))
                }
            }
        }
    }

    async fn create_issues(&self, comments: Vec<TodoComment>) -> Result<Vec<TodoComment>> {
        let mut processed = Vec::with_capacity(comments.len());

        for mut comment in comments {
            let issue = new_issue(&comment, self.config.issue_title_prefix());
            tracing::debug!("Creating issue '{}' with labels {:?}", issue.title, issue.labels);

            let created = self.tracker.create_issue(&issue).await.map_err(|e| {
                PddError::IssueCreationError {
                    path: comment.file_path.clone(),
                    line: comment.line_number,
                    source: Box::new(e),
                }
            })?;

            tracing::info!("Created issue #{}: {}", created.number, created.html_url);
            comment.issue_url = Some(created.html_url);
            processed.push(comment);
        }

        Ok(processed)
    }

    /// Writes every issue link for `path` into the file on `branch` with a single commit.
    /// `Ok(false)` means all links were already there.
    async fn link_file(&self, path: &str, comments: &[&TodoComment], branch: &str) -> Result<bool> {
        let language = language_for_path(path).ok_or_else(|| PddError::UnsupportedFileError {
            path: path.to_string(),
        })?;

        let links: Vec<(usize, &str)> = comments
            .iter()
            .map(|c| (c.line_number, c.issue_url.as_deref().unwrap_or_default()))
            .collect();

        let file = self.tracker.get_file(path, branch).await?;
        let Some(updated) = insert_issue_lines(&file.content, path, language, &links)? else {
            return Ok(false);
        };

        let message = format!("Update TODO comment with issue URL in {}", path);
        self.tracker
            .update_file(path, branch, &updated, &file.sha, &message)
            .await?;
        Ok(true)
    }
}

/// Groups comments by file, keeping the order in which files were first seen.
fn group_by_file(comments: &[TodoComment]) -> Vec<(&str, Vec<&TodoComment>)> {
    let mut groups: Vec<(&str, Vec<&TodoComment>)> = Vec::new();
    for comment in comments {
        match groups.iter_mut().find(|(path, _)| *path == comment.file_path) {
            Some((_, group)) => group.push(comment),
            None => groups.push((comment.file_path.as_str(), vec![comment])),
        }
    }
    groups
}

enum Gate {
    Open(String),
    Closed(String),
}
